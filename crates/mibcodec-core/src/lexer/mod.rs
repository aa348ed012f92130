//! MIB lexer module.
//!
//! Tokenizes SMIv2 MIB source text into a token stream.

// Allow truncation casts - source size is limited to u32::MAX bytes
#![allow(clippy::cast_possible_truncation)]

mod keyword;
mod token;

pub use keyword::lookup_keyword;
pub use token::{ByteOffset, Span, Token, TokenKind};

use crate::error::{Location, MibError};
use alloc::string::String;
use alloc::vec::Vec;

/// Lexer state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LexerState {
    /// Normal tokenization.
    Normal,
    /// Inside a MACRO definition; skip until END.
    InMacro,
}

/// MIB lexer.
///
/// Operates on raw bytes so that MIB files with Latin-1 or multi-byte
/// letters in identifiers and strings tokenize without transcoding. All
/// structural tokens are ASCII.
pub struct Lexer<'src> {
    /// Source text being tokenized.
    source: &'src [u8],
    /// Name of the source, for error locations.
    source_name: &'src str,
    /// Current byte position.
    pos: usize,
    /// 1-based line of `pos`.
    line: u32,
    /// 1-based column of `pos`.
    column: u32,
    /// Current lexer state.
    state: LexerState,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source bytes.
    #[must_use]
    pub fn new(source: &'src [u8], source_name: &'src str) -> Self {
        Self {
            source,
            source_name,
            pos: 0,
            line: 1,
            column: 1,
            state: LexerState::Normal,
        }
    }

    /// Tokenize the entire source.
    ///
    /// # Errors
    ///
    /// Returns [`MibError::Lex`] on the first malformed literal.
    pub fn tokenize(mut self) -> Result<Vec<Token>, MibError> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token()?;
            let is_eof = token.kind == TokenKind::Eof;
            tokens.push(token);
            if is_eof {
                break;
            }
        }
        Ok(tokens)
    }

    /// Get the next token.
    ///
    /// # Errors
    ///
    /// Returns [`MibError::Lex`] for malformed literals.
    pub fn next_token(&mut self) -> Result<Token, MibError> {
        match self.state {
            LexerState::Normal => self.next_normal_token(),
            LexerState::InMacro => Ok(self.skip_macro_body()),
        }
    }

    fn is_eof(&self) -> bool {
        self.pos >= self.source.len()
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    /// Advance by one byte, maintaining the line/column counters.
    fn advance(&mut self) -> Option<u8> {
        let b = self.source.get(self.pos).copied();
        if let Some(b) = b {
            self.pos += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        b
    }

    /// Skip whitespace and comments.
    ///
    /// A comment starts with `--` and ends at the line feed or at a second
    /// `--` on the same line.
    fn skip_trivia(&mut self) {
        loop {
            match self.peek() {
                Some(b' ' | b'\t' | b'\r' | b'\n') => {
                    self.advance();
                }
                Some(b'-') if self.peek_at(1) == Some(b'-') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None | Some(b'\n') => {
                                self.advance();
                                break;
                            }
                            Some(b'-') if self.peek_at(1) == Some(b'-') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    fn error(&self, message: &str) -> MibError {
        MibError::Lex {
            message: message.into(),
            location: Location::new(self.source_name, self.line, self.column),
        }
    }

    fn error_at(&self, line: u32, column: u32, message: String) -> MibError {
        MibError::Lex {
            message,
            location: Location::new(self.source_name, line, column),
        }
    }

    /// Make a token from a recorded start position to the current position.
    fn token(&self, kind: TokenKind, start: usize, line: u32, column: u32) -> Token {
        Token {
            kind,
            span: Span::new(start as ByteOffset, self.pos as ByteOffset, line, column),
        }
    }

    /// Letter class of the grammar: ASCII letters, `$`, `_` and any byte of
    /// a multi-byte or Latin-1 character.
    fn is_letter(b: u8) -> bool {
        b.is_ascii_alphabetic() || b == b'$' || b == b'_' || b >= 0x80
    }

    fn next_normal_token(&mut self) -> Result<Token, MibError> {
        self.skip_trivia();

        let start = self.pos;
        let (line, column) = (self.line, self.column);

        let Some(b) = self.peek() else {
            return Ok(self.token(TokenKind::Eof, start, line, column));
        };

        // Single-character tokens with no longer form
        let single = match b {
            b'{' => Some(TokenKind::LBrace),
            b'}' => Some(TokenKind::RBrace),
            b'(' => Some(TokenKind::LParen),
            b')' => Some(TokenKind::RParen),
            b',' => Some(TokenKind::Comma),
            b';' => Some(TokenKind::Semicolon),
            b'&' => Some(TokenKind::Ampersand),
            b'|' => Some(TokenKind::Pipe),
            b'<' => Some(TokenKind::Less),
            b'>' => Some(TokenKind::Greater),
            b'!' => Some(TokenKind::Exclamation),
            _ => None,
        };
        if let Some(kind) = single {
            self.advance();
            return Ok(self.token(kind, start, line, column));
        }

        match b {
            b'[' => {
                self.advance();
                if self.peek() == Some(b'[') {
                    self.advance();
                    return Ok(self.token(TokenKind::DoubleLBracket, start, line, column));
                }
                Ok(self.token(TokenKind::LBracket, start, line, column))
            }
            b']' => {
                self.advance();
                if self.peek() == Some(b']') {
                    self.advance();
                    return Ok(self.token(TokenKind::DoubleRBracket, start, line, column));
                }
                Ok(self.token(TokenKind::RBracket, start, line, column))
            }
            b':' => {
                self.advance();
                if self.peek() == Some(b':') {
                    self.advance();
                    if self.peek() == Some(b'=') {
                        self.advance();
                        return Ok(self.token(TokenKind::ColonColonEqual, start, line, column));
                    }
                    return Ok(self.token(TokenKind::ColonColon, start, line, column));
                }
                Ok(self.token(TokenKind::Colon, start, line, column))
            }
            b'.' => {
                self.advance();
                if self.peek() == Some(b'.') {
                    self.advance();
                    if self.peek() == Some(b'.') {
                        self.advance();
                        return Ok(self.token(TokenKind::Ellipsis, start, line, column));
                    }
                    return Ok(self.token(TokenKind::DotDot, start, line, column));
                }
                Ok(self.token(TokenKind::Dot, start, line, column))
            }
            b'@' => {
                self.advance();
                if self.peek() == Some(b'.') {
                    self.advance();
                    return Ok(self.token(TokenKind::AtDot, start, line, column));
                }
                Ok(self.token(TokenKind::At, start, line, column))
            }
            b'-' => {
                // Comments were consumed by skip_trivia, so a dash here must
                // start a negative number.
                if self.peek_at(1).is_some_and(|next| next.is_ascii_digit()) {
                    self.advance();
                    return self.scan_number(start, line, column);
                }
                Err(self.error("bad number literal: lone `-`"))
            }
            b'"' => self.scan_cstring(start, line, column),
            b'\'' => self.scan_hex_or_bin(start, line, column),
            _ if b.is_ascii_digit() => self.scan_number(start, line, column),
            _ if Self::is_letter(b) => Ok(self.scan_identifier_or_keyword(start, line, column)),
            _ => Err(self.error("unexpected character")),
        }
    }

    /// Skip a MACRO body until the END keyword, which is emitted.
    fn skip_macro_body(&mut self) -> Token {
        loop {
            self.skip_trivia();
            let start = self.pos;
            let (line, column) = (self.line, self.column);

            if self.is_eof() {
                self.state = LexerState::Normal;
                return self.token(TokenKind::Eof, start, line, column);
            }

            if self.source[self.pos..].starts_with(b"END") {
                let delim = self.peek_at(3);
                if !delim.is_some_and(|b| b.is_ascii_alphanumeric() || b == b'-') {
                    self.advance();
                    self.advance();
                    self.advance();
                    self.state = LexerState::Normal;
                    return self.token(TokenKind::KwEnd, start, line, column);
                }
            }

            self.advance();
        }
    }

    /// Scan an identifier or keyword. The leading byte has been validated.
    fn scan_identifier_or_keyword(&mut self, start: usize, line: u32, column: u32) -> Token {
        self.advance();

        while let Some(b) = self.peek() {
            if Self::is_letter(b) || b.is_ascii_digit() {
                self.advance();
            } else if b == b'-' {
                // A double hyphen starts a comment, never an identifier tail.
                if self.peek_at(1) == Some(b'-') {
                    break;
                }
                self.advance();
            } else {
                break;
            }
        }

        let text = core::str::from_utf8(&self.source[start..self.pos]).unwrap_or("");
        if let Some(kind) = lookup_keyword(text) {
            if kind == TokenKind::KwMacro {
                self.state = LexerState::InMacro;
            }
            return self.token(kind, start, line, column);
        }

        self.token(TokenKind::Ident, start, line, column)
    }

    /// Scan a decimal number. A leading `-` has already been consumed.
    fn scan_number(&mut self, start: usize, line: u32, column: u32) -> Result<Token, MibError> {
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.advance();
        }
        Ok(self.token(TokenKind::Number, start, line, column))
    }

    /// Scan a double-quoted string with backslash escapes.
    fn scan_cstring(&mut self, start: usize, line: u32, column: u32) -> Result<Token, MibError> {
        self.advance(); // opening quote
        loop {
            match self.peek() {
                None => return Err(self.error_at(line, column, "unterminated string literal".into())),
                Some(b'"') => {
                    self.advance();
                    return Ok(self.token(TokenKind::CString, start, line, column));
                }
                Some(b'\\') => {
                    self.advance();
                    if self.advance().is_none() {
                        return Err(self.error_at(line, column, "bad escape at end of input".into()));
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }

    /// Scan a hex (`'…'H`) or binary (`'…'B`) literal.
    fn scan_hex_or_bin(&mut self, start: usize, line: u32, column: u32) -> Result<Token, MibError> {
        self.advance(); // opening quote
        let digit_start = self.pos;
        loop {
            match self.peek() {
                None => {
                    return Err(self.error_at(line, column, "unterminated hex/binary literal".into()))
                }
                Some(b'\'') => break,
                Some(_) => {
                    self.advance();
                }
            }
        }
        let digits = &self.source[digit_start..self.pos];
        self.advance(); // closing quote

        match self.advance() {
            Some(b'H' | b'h') => {
                if let Some(&bad) = digits.iter().find(|b| !b.is_ascii_hexdigit()) {
                    return Err(self.error_at(
                        line,
                        column,
                        alloc::format!("bad number literal: `{}` in hex literal", bad as char),
                    ));
                }
                Ok(self.token(TokenKind::HexNumber, start, line, column))
            }
            Some(b'B' | b'b') => {
                if let Some(&bad) = digits.iter().find(|&&b| b != b'0' && b != b'1') {
                    return Err(self.error_at(
                        line,
                        column,
                        alloc::format!("bad number literal: `{}` in binary literal", bad as char),
                    ));
                }
                Ok(self.token(TokenKind::BinNumber, start, line, column))
            }
            _ => Err(self.error_at(
                line,
                column,
                "bad number literal: expected `H` or `B` suffix".into(),
            )),
        }
    }
}
