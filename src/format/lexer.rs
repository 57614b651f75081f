//! Tokenizer for the object text format
//!
//! Produces a flat token stream with 1-based source positions. String
//! literals are unescaped here; concatenating adjacent literals is the
//! parser's job.

use super::{ParseError, ParseErrorKind};

/// One lexical token
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Token {
    /// Bare identifier: field names, enum values, `true`/`false`
    Ident(String),
    /// One string literal, already unescaped
    Str(String),
    Int(i64),
    Float(f64),
    LBrace,
    RBrace,
    Colon,
    Comma,
    Semicolon,
}

impl Token {
    /// Short description for error messages
    pub(crate) fn describe(&self) -> String {
        match self {
            Token::Ident(s) => format!("identifier '{}'", s),
            Token::Str(_) => "string literal".to_string(),
            Token::Int(n) => format!("number {}", n),
            Token::Float(v) => format!("number {}", v),
            Token::LBrace => "'{'".to_string(),
            Token::RBrace => "'}'".to_string(),
            Token::Colon => "':'".to_string(),
            Token::Comma => "','".to_string(),
            Token::Semicolon => "';'".to_string(),
        }
    }
}

/// Token plus the position of its first character
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Spanned {
    pub token: Token,
    pub line: u32,
    pub column: u32,
}

/// Tokenize a whole source string
pub(crate) fn tokenize(src: &str) -> Result<Vec<Spanned>, ParseError> {
    Lexer::new(src).run()
}

struct Lexer {
    chars: Vec<char>,
    pos: usize,
    line: u32,
    column: u32,
}

impl Lexer {
    fn new(src: &str) -> Self {
        Self {
            chars: src.chars().collect(),
            pos: 0,
            line: 1,
            column: 1,
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += 1;
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn error(&self, line: u32, column: u32, kind: ParseErrorKind) -> ParseError {
        ParseError::new(line, column, kind)
    }

    fn run(mut self) -> Result<Vec<Spanned>, ParseError> {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let (line, column) = (self.line, self.column);
            let c = match self.peek() {
                Some(c) => c,
                None => break,
            };

            let token = match c {
                '{' => {
                    self.bump();
                    Token::LBrace
                }
                '}' => {
                    self.bump();
                    Token::RBrace
                }
                ':' => {
                    self.bump();
                    Token::Colon
                }
                ',' => {
                    self.bump();
                    Token::Comma
                }
                ';' => {
                    self.bump();
                    Token::Semicolon
                }
                '"' => self.string(line, column)?,
                '-' | '+' => self.number(line, column)?,
                c if c.is_ascii_digit() || c == '.' => self.number(line, column)?,
                c if c.is_ascii_alphabetic() || c == '_' => self.ident(),
                c => return Err(self.error(line, column, ParseErrorKind::UnexpectedChar(c))),
            };
            tokens.push(Spanned { token, line, column });
        }
        Ok(tokens)
    }

    /// Skip whitespace and `#` line comments
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(c) if c.is_whitespace() => {
                    self.bump();
                }
                Some('#') => {
                    while let Some(c) = self.peek() {
                        if c == '\n' {
                            break;
                        }
                        self.bump();
                    }
                }
                _ => break,
            }
        }
    }

    fn ident(&mut self) -> Token {
        let mut s = String::new();
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '_' {
                s.push(c);
                self.bump();
            } else {
                break;
            }
        }
        Token::Ident(s)
    }

    /// One double-quoted literal. Raw newlines are not allowed inside.
    fn string(&mut self, line: u32, column: u32) -> Result<Token, ParseError> {
        self.bump(); // opening quote
        let mut s = String::new();
        loop {
            let (esc_line, esc_column) = (self.line, self.column);
            match self.bump() {
                None | Some('\n') => {
                    return Err(self.error(line, column, ParseErrorKind::UnterminatedString))
                }
                Some('"') => return Ok(Token::Str(s)),
                Some('\\') => s.push(self.escape(esc_line, esc_column)?),
                Some(c) => s.push(c),
            }
        }
    }

    /// The character after a backslash inside a string literal
    fn escape(&mut self, line: u32, column: u32) -> Result<char, ParseError> {
        let invalid = |s: String| ParseError::new(line, column, ParseErrorKind::InvalidEscape(s));
        match self.bump() {
            Some('n') => Ok('\n'),
            Some('r') => Ok('\r'),
            Some('t') => Ok('\t'),
            Some('0') => Ok('\0'),
            Some('\\') => Ok('\\'),
            Some('"') => Ok('"'),
            Some('\'') => Ok('\''),
            Some('x') => {
                let value = self.hex_digits(2).ok_or_else(|| invalid("\\x".to_string()))?;
                // Byte escapes only cover ASCII; anything higher would not be
                // valid UTF-8 on its own.
                if value < 0x80 {
                    Ok(value as u8 as char)
                } else {
                    Err(invalid(format!("\\x{:02x}", value)))
                }
            }
            Some('u') => {
                let value = self.hex_digits(4).ok_or_else(|| invalid("\\u".to_string()))?;
                char::from_u32(value).ok_or_else(|| invalid(format!("\\u{:04x}", value)))
            }
            Some(c) => Err(invalid(format!("\\{}", c))),
            None => Err(self.error(line, column, ParseErrorKind::UnterminatedString)),
        }
    }

    /// Exactly `count` hex digits, or None
    fn hex_digits(&mut self, count: u32) -> Option<u32> {
        let mut value = 0;
        for _ in 0..count {
            let d = self.peek()?.to_digit(16)?;
            self.bump();
            value = value * 16 + d;
        }
        Some(value)
    }

    fn number(&mut self, line: u32, column: u32) -> Result<Token, ParseError> {
        let mut s = String::new();
        if matches!(self.peek(), Some('-') | Some('+')) {
            s.push(self.bump().unwrap());
        }

        // Signed special floats: "-inf", "-nan". Unsigned ones lex as plain
        // identifiers and are mapped by the parser.
        if matches!(self.peek(), Some(c) if c.is_ascii_alphabetic()) {
            let word = match self.ident() {
                Token::Ident(w) => w,
                _ => unreachable!(),
            };
            let negative = s.starts_with('-');
            return match word.as_str() {
                "inf" if negative => Ok(Token::Float(f64::NEG_INFINITY)),
                "inf" => Ok(Token::Float(f64::INFINITY)),
                "nan" => Ok(Token::Float(f64::NAN)),
                _ => Err(self.error(
                    line,
                    column,
                    ParseErrorKind::InvalidNumber(format!("{}{}", s, word)),
                )),
            };
        }

        let mut prev = ' ';
        while let Some(c) = self.peek() {
            let is_exp_sign = (c == '+' || c == '-') && (prev == 'e' || prev == 'E');
            if c.is_ascii_digit() || c == '.' || c == 'e' || c == 'E' || is_exp_sign {
                s.push(c);
                self.bump();
                prev = c;
            } else {
                break;
            }
        }

        let is_float = s.contains(['.', 'e', 'E']);
        if !is_float {
            if let Ok(n) = s.parse::<i64>() {
                return Ok(Token::Int(n));
            }
        }
        s.parse::<f64>()
            .map(Token::Float)
            .map_err(|_| self.error(line, column, ParseErrorKind::InvalidNumber(s)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<Token> {
        tokenize(src).unwrap().into_iter().map(|s| s.token).collect()
    }

    #[test]
    fn test_basic_tokens() {
        let tokens = kinds("id: \"glow\"\nposition {\n  x: 1.5\n}\n");
        assert_eq!(
            tokens,
            vec![
                Token::Ident("id".to_string()),
                Token::Colon,
                Token::Str("glow".to_string()),
                Token::Ident("position".to_string()),
                Token::LBrace,
                Token::Ident("x".to_string()),
                Token::Colon,
                Token::Float(1.5),
                Token::RBrace,
            ]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("a: 1\n  b: 2\n").unwrap();
        assert_eq!((tokens[0].line, tokens[0].column), (1, 1));
        assert_eq!((tokens[2].line, tokens[2].column), (1, 4));
        assert_eq!((tokens[3].line, tokens[3].column), (2, 3));
    }

    #[test]
    fn test_numbers() {
        assert_eq!(kinds("5"), vec![Token::Int(5)]);
        assert_eq!(kinds("-12"), vec![Token::Int(-12)]);
        assert_eq!(kinds("0.5"), vec![Token::Float(0.5)]);
        assert_eq!(kinds("-0.25"), vec![Token::Float(-0.25)]);
        assert_eq!(kinds("1e3"), vec![Token::Float(1000.0)]);
        assert_eq!(kinds("2.5e-2"), vec![Token::Float(0.025)]);
        assert_eq!(kinds(".5"), vec![Token::Float(0.5)]);
    }

    #[test]
    fn test_signed_special_floats() {
        assert_eq!(kinds("-inf"), vec![Token::Float(f64::NEG_INFINITY)]);
        match kinds("-nan")[0] {
            Token::Float(v) => assert!(v.is_nan()),
            ref t => panic!("expected float, got {:?}", t),
        }
        // Unsigned inf/nan are identifiers at this layer
        assert_eq!(kinds("inf"), vec![Token::Ident("inf".to_string())]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\"b\\c\n\t""#),
            vec![Token::Str("a\"b\\c\n\t".to_string())]
        );
        assert_eq!(kinds(r#""\x41B""#), vec![Token::Str("AB".to_string())]);
    }

    #[test]
    fn test_adjacent_strings_stay_separate() {
        // Concatenation happens in the parser, not here
        let tokens = kinds("\"a\"\n\"b\"");
        assert_eq!(
            tokens,
            vec![Token::Str("a".to_string()), Token::Str("b".to_string())]
        );
    }

    #[test]
    fn test_comments_and_separators() {
        let tokens = kinds("a: 1, b: 2; # trailing note\nc: 3");
        assert_eq!(tokens.len(), 11);
        assert_eq!(tokens[3], Token::Comma);
        assert_eq!(tokens[7], Token::Semicolon);
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize("id: \"oops\n").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnterminatedString);
        assert_eq!((err.line, err.column), (1, 5));
    }

    #[test]
    fn test_invalid_escape() {
        let err = tokenize(r#""\q""#).unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidEscape("\\q".to_string()));
    }

    #[test]
    fn test_unexpected_char() {
        let err = tokenize("id = 1").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::UnexpectedChar('='));
        assert_eq!((err.line, err.column), (1, 4));
    }

    #[test]
    fn test_invalid_number() {
        let err = tokenize("x: 1.2.3").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber("1.2.3".to_string()));
        let err = tokenize("x: -foo").unwrap_err();
        assert_eq!(err.kind, ParseErrorKind::InvalidNumber("-foo".to_string()));
    }
}
