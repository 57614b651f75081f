//! Recursive descent parser for the object text format
//!
//! Accepts what the engine accepts: scalar fields with a colon, message
//! fields with or without one, optional `,`/`;` separators after a field,
//! and adjacent string literals concatenated into one value (the layout
//! used for multi-line `data` blobs).

use super::lexer::{tokenize, Spanned, Token};
use super::{Document, ParseError, ParseErrorKind, Value};

/// Parse a whole source string into a [`Document`]
pub fn parse_document(src: &str) -> Result<Document, ParseError> {
    let tokens = tokenize(src)?;
    let mut parser = Parser { tokens, pos: 0 };
    parser.fields(true)
}

struct Parser {
    tokens: Vec<Spanned>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&Spanned> {
        self.tokens.get(self.pos)
    }

    fn bump(&mut self) -> Option<Spanned> {
        let t = self.tokens.get(self.pos).cloned();
        if t.is_some() {
            self.pos += 1;
        }
        t
    }

    /// Error at the end of input. Positioned on the last token since the
    /// token stream does not carry the source length.
    fn eof_error(&self, expected: &'static str) -> ParseError {
        let (line, column) = self
            .tokens
            .last()
            .map(|t| (t.line, t.column))
            .unwrap_or((1, 1));
        ParseError::new(line, column, ParseErrorKind::UnexpectedEof { expected })
    }

    fn token_error(&self, spanned: &Spanned, expected: &'static str) -> ParseError {
        ParseError::new(
            spanned.line,
            spanned.column,
            ParseErrorKind::UnexpectedToken {
                expected,
                found: spanned.token.describe(),
            },
        )
    }

    /// A field list. At the top level it runs to the end of input; inside a
    /// message it consumes the closing brace.
    fn fields(&mut self, top_level: bool) -> Result<Document, ParseError> {
        let mut doc = Document::new();
        loop {
            match self.peek() {
                None if top_level => return Ok(doc),
                None => return Err(self.eof_error("'}'")),
                Some(s) if s.token == Token::RBrace => {
                    if top_level {
                        return Err(self.token_error(s, "field name"));
                    }
                    self.bump();
                    return Ok(doc);
                }
                Some(s) => match &s.token {
                    Token::Ident(name) => {
                        let name = name.clone();
                        self.bump();
                        let value = self.field_value()?;
                        doc.push(name, value);
                        // Optional separator after a field
                        if matches!(
                            self.peek().map(|s| &s.token),
                            Some(Token::Comma) | Some(Token::Semicolon)
                        ) {
                            self.bump();
                        }
                    }
                    _ => {
                        let s = s.clone();
                        return Err(self.token_error(&s, "field name"));
                    }
                },
            }
        }
    }

    /// Everything after a field name
    fn field_value(&mut self) -> Result<Value, ParseError> {
        match self.peek().map(|s| s.token.clone()) {
            Some(Token::Colon) => {
                self.bump();
                match self.peek().map(|s| &s.token) {
                    Some(Token::LBrace) => self.message(),
                    _ => self.scalar(),
                }
            }
            Some(Token::LBrace) => self.message(),
            Some(_) => {
                let s = self.peek().unwrap().clone();
                Err(self.token_error(&s, "':' or '{'"))
            }
            None => Err(self.eof_error("':' or '{'")),
        }
    }

    fn message(&mut self) -> Result<Value, ParseError> {
        self.bump(); // opening brace
        Ok(Value::Message(self.fields(false)?))
    }

    fn scalar(&mut self) -> Result<Value, ParseError> {
        let spanned = match self.bump() {
            Some(s) => s,
            None => return Err(self.eof_error("a value")),
        };
        match spanned.token {
            Token::Str(first) => {
                // Adjacent literals concatenate into one string value
                let mut s = first;
                while let Some(Token::Str(next)) = self.peek().map(|t| t.token.clone()) {
                    s.push_str(&next);
                    self.bump();
                }
                Ok(Value::Str(s))
            }
            Token::Int(n) => Ok(Value::Int(n)),
            Token::Float(v) => Ok(Value::Float(v)),
            Token::Ident(word) => Ok(match word.as_str() {
                "true" => Value::Bool(true),
                "false" => Value::Bool(false),
                "inf" => Value::Float(f64::INFINITY),
                "nan" => Value::Float(f64::NAN),
                _ => Value::Enum(word),
            }),
            _ => Err(self.token_error(&spanned, "a value")),
        }
    }
}
