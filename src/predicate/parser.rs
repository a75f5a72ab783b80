//! Predicate expression parser
//!
//! Hand-rolled tokenizer + recursive descent over the grammar:
//!
//! ```text
//! predicate  := or_expr
//! or_expr    := and_expr (OR and_expr)*
//! and_expr   := unary (AND unary)*
//! unary      := NOT unary | primary
//! primary    := '(' or_expr ')' | comparison
//! comparison := field op literal
//! op         := '=' | '!=' | '<>' | '>' | '>=' | '<' | '<='
//! literal    := 'string' | number | TRUE | FALSE | NULL
//! ```
//!
//! Keywords are case-insensitive. String literals use single quotes with
//! `''` as the escape for an embedded quote. No other syntax is accepted:
//! anything outside the grammar is an explicit parse error, never a guess.

use serde_json::{Number, Value};

use super::ast::{CompareOp, Predicate};
use super::errors::PredicateError;

/// A lexical token with its byte offset in the source
#[derive(Debug, Clone, PartialEq)]
enum Token {
    Ident(String),
    StringLit(String),
    NumberLit(String),
    Op(CompareOp),
    LParen,
    RParen,
    And,
    Or,
    Not,
    True,
    False,
    Null,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Ident(s) => s.clone(),
            Token::StringLit(s) => format!("'{}'", s),
            Token::NumberLit(s) => s.clone(),
            Token::Op(op) => op.as_str().to_string(),
            Token::LParen => "(".to_string(),
            Token::RParen => ")".to_string(),
            Token::And => "AND".to_string(),
            Token::Or => "OR".to_string(),
            Token::Not => "NOT".to_string(),
            Token::True => "TRUE".to_string(),
            Token::False => "FALSE".to_string(),
            Token::Null => "NULL".to_string(),
        }
    }
}

/// Parse a predicate expression into its AST.
pub fn parse(input: &str) -> Result<Predicate, PredicateError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser { tokens, pos: 0 };
    let predicate = parser.or_expr()?;

    if let Some((token, offset)) = parser.peek() {
        return Err(PredicateError::TrailingInput {
            token: token.describe(),
            offset,
        });
    }

    Ok(predicate)
}

fn tokenize(input: &str) -> Result<Vec<(Token, usize)>, PredicateError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    // Offsets are byte offsets into the source. Walking char_indices keeps
    // slice boundaries valid for multi-byte field names like `café`.
    while let Some((i, c)) = chars.next() {
        match c {
            ' ' | '\t' | '\n' | '\r' => {}
            '(' => tokens.push((Token::LParen, i)),
            ')' => tokens.push((Token::RParen, i)),
            '=' => tokens.push((Token::Op(CompareOp::Eq), i)),
            '!' => {
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    tokens.push((Token::Op(CompareOp::Ne), i));
                } else {
                    return Err(PredicateError::UnexpectedToken {
                        token: "!".to_string(),
                        offset: i,
                    });
                }
            }
            '<' => {
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    tokens.push((Token::Op(CompareOp::Lte), i));
                } else if chars.next_if(|&(_, c)| c == '>').is_some() {
                    tokens.push((Token::Op(CompareOp::Ne), i));
                } else {
                    tokens.push((Token::Op(CompareOp::Lt), i));
                }
            }
            '>' => {
                if chars.next_if(|&(_, c)| c == '=').is_some() {
                    tokens.push((Token::Op(CompareOp::Gte), i));
                } else {
                    tokens.push((Token::Op(CompareOp::Gt), i));
                }
            }
            '\'' => {
                let mut literal = String::new();
                loop {
                    match chars.next() {
                        None => return Err(PredicateError::UnterminatedString { offset: i }),
                        Some((_, '\'')) => {
                            // '' escapes a single quote inside the literal
                            if chars.next_if(|&(_, c)| c == '\'').is_some() {
                                literal.push('\'');
                            } else {
                                break;
                            }
                        }
                        Some((_, ch)) => literal.push(ch),
                    }
                }
                tokens.push((Token::StringLit(literal), i));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, d)) = chars.peek() {
                    if d.is_ascii_digit() || d == '.' {
                        chars.next();
                        end = j + d.len_utf8();
                    } else {
                        break;
                    }
                }
                tokens.push((Token::NumberLit(input[i..end].to_string()), i));
            }
            c if c.is_alphabetic() || c == '_' => {
                let mut end = i + c.len_utf8();
                while let Some(&(j, d)) = chars.peek() {
                    if d.is_alphanumeric() || d == '_' || d == '.' {
                        chars.next();
                        end = j + d.len_utf8();
                    } else {
                        break;
                    }
                }
                let word = &input[i..end];
                let token = match word.to_ascii_uppercase().as_str() {
                    "AND" => Token::And,
                    "OR" => Token::Or,
                    "NOT" => Token::Not,
                    "TRUE" => Token::True,
                    "FALSE" => Token::False,
                    "NULL" => Token::Null,
                    _ => Token::Ident(word.to_string()),
                };
                tokens.push((token, i));
            }
            other => {
                return Err(PredicateError::UnexpectedToken {
                    token: other.to_string(),
                    offset: i,
                });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<(Token, usize)>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<(Token, usize)> {
        self.tokens.get(self.pos).cloned()
    }

    fn next(&mut self) -> Result<(Token, usize), PredicateError> {
        let entry = self
            .tokens
            .get(self.pos)
            .cloned()
            .ok_or(PredicateError::UnexpectedEnd)?;
        self.pos += 1;
        Ok(entry)
    }

    fn or_expr(&mut self) -> Result<Predicate, PredicateError> {
        let mut left = self.and_expr()?;
        while matches!(self.peek(), Some((Token::Or, _))) {
            self.pos += 1;
            let right = self.and_expr()?;
            left = left.or(right);
        }
        Ok(left)
    }

    fn and_expr(&mut self) -> Result<Predicate, PredicateError> {
        let mut left = self.unary()?;
        while matches!(self.peek(), Some((Token::And, _))) {
            self.pos += 1;
            let right = self.unary()?;
            left = left.and(right);
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Predicate, PredicateError> {
        if matches!(self.peek(), Some((Token::Not, _))) {
            self.pos += 1;
            let inner = self.unary()?;
            return Ok(inner.not());
        }
        self.primary()
    }

    fn primary(&mut self) -> Result<Predicate, PredicateError> {
        match self.next()? {
            (Token::LParen, _) => {
                let inner = self.or_expr()?;
                match self.next()? {
                    (Token::RParen, _) => Ok(inner),
                    (token, offset) => Err(PredicateError::UnexpectedToken {
                        token: token.describe(),
                        offset,
                    }),
                }
            }
            (Token::Ident(field), _) => self.comparison(field),
            (token, offset) => Err(PredicateError::UnexpectedToken {
                token: token.describe(),
                offset,
            }),
        }
    }

    fn comparison(&mut self, field: String) -> Result<Predicate, PredicateError> {
        let op = match self.next()? {
            (Token::Op(op), _) => op,
            (token, offset) => {
                return Err(PredicateError::UnexpectedToken {
                    token: token.describe(),
                    offset,
                })
            }
        };

        let value = match self.next()? {
            (Token::StringLit(s), _) => Value::String(s),
            (Token::NumberLit(literal), offset) => parse_number(&literal, offset)?,
            (Token::True, _) => Value::Bool(true),
            (Token::False, _) => Value::Bool(false),
            (Token::Null, _) => Value::Null,
            (token, offset) => {
                return Err(PredicateError::UnexpectedToken {
                    token: token.describe(),
                    offset,
                })
            }
        };

        Ok(Predicate::Compare { field, op, value })
    }
}

fn parse_number(literal: &str, offset: usize) -> Result<Value, PredicateError> {
    if literal.contains('.') {
        let parsed: f64 = literal.parse().map_err(|_| PredicateError::InvalidNumber {
            literal: literal.to_string(),
            offset,
        })?;
        Number::from_f64(parsed)
            .map(Value::Number)
            .ok_or_else(|| PredicateError::InvalidNumber {
                literal: literal.to_string(),
                offset,
            })
    } else {
        let parsed: i64 = literal.parse().map_err(|_| PredicateError::InvalidNumber {
            literal: literal.to_string(),
            offset,
        })?;
        Ok(Value::Number(Number::from(parsed)))
    }
}
