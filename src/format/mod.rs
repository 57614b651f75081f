//! Schema-free text format layer
//!
//! Game object files are written in a nested key-value text format: scalar
//! fields as `name: value`, message fields as `name { ... }`. This module
//! reads and writes that format without knowing anything about game
//! objects, so tools like the formatter work on any well-formed file.
//!
//! ```text
//! components {
//!   id: "glow"
//!   component: "/gardens/fx/firefly.particlefx"
//!   position {
//!     x: 0.0
//!     y: 12.5
//!     z: 0.0
//!   }
//! }
//! ```
//!
//! The pipeline is `parse` -> [`Document`] -> `write`. Parsing is lenient
//! where the engine is lenient (comments, optional separators, a colon
//! before an open brace, adjacent string literals); writing always produces
//! the engine's canonical layout, so `write(parse(text))` reproduces a
//! canonically formatted file byte for byte.

mod document;
mod lexer;
mod parser;
mod writer;

pub use document::{Document, Field, Value};
pub use parser::parse_document;
pub use writer::write_document;

/// Parse failure with the 1-based source position where it happened
#[derive(Debug, Clone, PartialEq)]
pub struct ParseError {
    pub line: u32,
    pub column: u32,
    pub kind: ParseErrorKind,
}

impl ParseError {
    pub(crate) fn new(line: u32, column: u32, kind: ParseErrorKind) -> Self {
        Self { line, column, kind }
    }
}

/// What went wrong while lexing or parsing
#[derive(Debug, Clone, PartialEq)]
pub enum ParseErrorKind {
    /// Character that cannot start any token
    UnexpectedChar(char),
    /// String literal with no closing quote
    UnterminatedString,
    /// Unknown or malformed escape sequence inside a string literal
    InvalidEscape(String),
    /// Numeric literal that does not parse as an integer or float
    InvalidNumber(String),
    /// Structurally valid token in the wrong place
    UnexpectedToken { expected: &'static str, found: String },
    /// Input ended where more was required
    UnexpectedEof { expected: &'static str },
}

impl std::fmt::Display for ParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}: ", self.line, self.column)?;
        match &self.kind {
            ParseErrorKind::UnexpectedChar(c) => write!(f, "unexpected character {:?}", c),
            ParseErrorKind::UnterminatedString => write!(f, "unterminated string literal"),
            ParseErrorKind::InvalidEscape(e) => write!(f, "invalid escape sequence '{}'", e),
            ParseErrorKind::InvalidNumber(n) => write!(f, "invalid number '{}'", n),
            ParseErrorKind::UnexpectedToken { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
            ParseErrorKind::UnexpectedEof { expected } => {
                write!(f, "unexpected end of input, expected {}", expected)
            }
        }
    }
}

impl std::error::Error for ParseError {}
