//! Bracket literal parser: `[1, 2, [3, 4]]`
//!
//! Scalars are any run of characters other than brackets, commas and
//! whitespace, handed to `T::from_str`.

use std::str::FromStr;

use thiserror::Error;

use super::Value;

/// Error returned when a document literal cannot be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseValueError {
    /// Input ended inside a list or before any value.
    #[error("unexpected end of input")]
    UnexpectedEnd,

    /// A structural character showed up where it is not allowed.
    #[error("unexpected character '{ch}' at offset {offset}")]
    UnexpectedChar {
        /// Offending character.
        ch: char,
        /// Byte offset into the input.
        offset: usize,
    },

    /// Scalar text rejected by the scalar type's parser.
    #[error("invalid scalar '{text}' at offset {offset}")]
    InvalidScalar {
        /// Raw scalar text.
        text: String,
        /// Byte offset into the input.
        offset: usize,
    },
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(ch) = self.peek() {
            if !ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn parse_value<T: FromStr>(&mut self) -> Result<Value<T>, ParseValueError> {
        self.skip_whitespace();
        match self.peek() {
            None => Err(ParseValueError::UnexpectedEnd),
            Some('[') => {
                self.pos += 1;
                self.parse_list()
            }
            Some(ch @ (']' | ',')) => Err(ParseValueError::UnexpectedChar {
                ch,
                offset: self.pos,
            }),
            Some(_) => self.parse_scalar(),
        }
    }

    fn parse_list<T: FromStr>(&mut self) -> Result<Value<T>, ParseValueError> {
        let mut items = Vec::new();

        self.skip_whitespace();
        if self.peek() == Some(']') {
            self.pos += 1;
            return Ok(Value::List(items));
        }

        loop {
            items.push(self.parse_value()?);
            self.skip_whitespace();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(']') => {
                    self.pos += 1;
                    return Ok(Value::List(items));
                }
                Some(ch) => {
                    return Err(ParseValueError::UnexpectedChar {
                        ch,
                        offset: self.pos,
                    })
                }
                None => return Err(ParseValueError::UnexpectedEnd),
            }
        }
    }

    fn parse_scalar<T: FromStr>(&mut self) -> Result<Value<T>, ParseValueError> {
        let start = self.pos;
        while let Some(ch) = self.peek() {
            if matches!(ch, '[' | ']' | ',') || ch.is_whitespace() {
                break;
            }
            self.pos += ch.len_utf8();
        }

        let text = &self.input[start..self.pos];
        text.parse()
            .map(Value::Scalar)
            .map_err(|_| ParseValueError::InvalidScalar {
                text: text.to_string(),
                offset: start,
            })
    }
}

/// Parses bracket literals such as `[1, [2, 3]]`. Each nesting level
/// costs one stack frame.
impl<T: FromStr> FromStr for Value<T> {
    type Err = ParseValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parser = Parser::new(s);
        let value = parser.parse_value()?;

        parser.skip_whitespace();
        match parser.peek() {
            Some(ch) => Err(ParseValueError::UnexpectedChar {
                ch,
                offset: parser.pos,
            }),
            None => Ok(value),
        }
    }
}
