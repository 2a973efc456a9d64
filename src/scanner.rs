//! Tokenizer: classifies the byte stream into structural tokens and raw
//! value lexemes, tracking 1-based line numbers.

use crate::error::{Error, ErrorKind};
use crate::time::Datetime;

/// Token classification.
///
/// Every value-bearing lexeme — quoted string, timestamp, bare literal — is
/// a single `Str` token; the scanner never decodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Newline,
    Equal,
    Comma,
    Dot,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,
    Str,
    Eof,
}

/// One token: kind, 1-based source line, and the spanned input text.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Token<'a> {
    pub kind: TokenKind,
    pub line: u32,
    pub text: &'a str,
}

/// Converts the input into tokens on demand.
///
/// `.` is only a structural token while `dot_is_special` is set (key paths);
/// everywhere else it is part of a literal (floats, timestamps).
pub(crate) struct Scanner<'a> {
    input: &'a str,
    bytes: &'a [u8],
    cursor: usize,
    line: u32,
}

impl<'a> Scanner<'a> {
    pub fn new(input: &'a str) -> Self {
        Scanner {
            input,
            bytes: input.as_bytes(),
            cursor: 0,
            line: 1,
        }
    }

    /// Produces the next token, or a located lexical error.
    pub fn next(&mut self, dot_is_special: bool) -> Result<Token<'a>, Error> {
        loop {
            let Some(&b) = self.bytes.get(self.cursor) else {
                return Ok(Token {
                    kind: TokenKind::Eof,
                    line: self.line,
                    text: "",
                });
            };
            match b {
                b' ' | b'\t' | b'\r' => self.cursor += 1,
                b'#' => match memchr::memchr(b'\n', &self.bytes[self.cursor..]) {
                    Some(offset) => self.cursor += offset,
                    None => self.cursor = self.bytes.len(),
                },
                b'\n' => {
                    let token = self.single(TokenKind::Newline);
                    self.line += 1;
                    return Ok(token);
                }
                b',' => return Ok(self.single(TokenKind::Comma)),
                b'=' => return Ok(self.single(TokenKind::Equal)),
                b'{' => return Ok(self.single(TokenKind::LeftBrace)),
                b'}' => return Ok(self.single(TokenKind::RightBrace)),
                b'[' => return Ok(self.single(TokenKind::LeftBracket)),
                b']' => return Ok(self.single(TokenKind::RightBracket)),
                b'.' if dot_is_special => return Ok(self.single(TokenKind::Dot)),
                b'"' | b'\'' => return self.scan_string(b),
                _ => return self.scan_literal(dot_is_special),
            }
        }
    }

    fn single(&mut self, kind: TokenKind) -> Token<'a> {
        let start = self.cursor;
        self.cursor += 1;
        Token {
            kind,
            line: self.line,
            text: &self.input[start..self.cursor],
        }
    }

    fn token_from(&self, start: usize, line: u32) -> Token<'a> {
        Token {
            kind: TokenKind::Str,
            line,
            text: &self.input[start..self.cursor],
        }
    }

    fn error(&self, kind: ErrorKind, line: u32) -> Error {
        Error { kind, line }
    }

    /// Reads the character at the cursor for an error message and advances
    /// past it.
    fn take_char(&mut self) -> char {
        let ch = self.input[self.cursor..].chars().next().unwrap_or('\0');
        self.cursor += ch.len_utf8().max(1);
        ch
    }

    // -- literals -----------------------------------------------------------

    /// A timestamp lexeme when the cursor looks temporal, otherwise a bare
    /// literal over `A-Z a-z 0-9 _ - +` (and `.` when dots are not special).
    fn scan_literal(&mut self, dot_is_special: bool) -> Result<Token<'a>, Error> {
        let rest = &self.bytes[self.cursor..];
        let temporal = matches!(rest, [_, _, b':', _, _, ..] | [_, _, _, _, b'-', _, _, b'-', ..]);
        if temporal {
            if let Some((len, _)) = Datetime::munch(rest) {
                let start = self.cursor;
                self.cursor += len;
                return Ok(self.token_from(start, self.line));
            }
        }

        let start = self.cursor;
        while let Some(&b) = self.bytes.get(self.cursor) {
            let literal = b.is_ascii_alphanumeric()
                || b == b'_'
                || b == b'-'
                || b == b'+'
                || (b == b'.' && !dot_is_special);
            if !literal {
                break;
            }
            self.cursor += 1;
        }
        if self.cursor == start {
            let line = self.line;
            let ch = self.take_char();
            return Err(self.error(ErrorKind::Unexpected(ch), line));
        }
        Ok(self.token_from(start, self.line))
    }

    // -- strings ------------------------------------------------------------

    /// Scans a quoted string, lexically validating escapes without decoding
    /// them. The token text spans the delimiters.
    fn scan_string(&mut self, delim: u8) -> Result<Token<'a>, Error> {
        let start = self.cursor;
        let start_line = self.line;
        self.cursor += 1;

        let mut triple = false;
        if self.bytes.get(self.cursor) == Some(&delim) {
            if self.bytes.get(self.cursor + 1) == Some(&delim) {
                triple = true;
                self.cursor += 2;
            } else {
                // Empty string.
                self.cursor += 1;
                return Ok(self.token_from(start, start_line));
            }
        }

        loop {
            let Some(&b) = self.bytes.get(self.cursor) else {
                return Err(self.error(ErrorKind::UnterminatedString, start_line));
            };
            match b {
                b'\n' => {
                    if !triple {
                        return Err(self.error(ErrorKind::InvalidCharInString('\n'), self.line));
                    }
                    self.cursor += 1;
                    self.line += 1;
                }
                b'\\' if delim == b'"' => {
                    self.cursor += 1;
                    self.validate_escape(triple, start_line)?;
                }
                _ if b == delim => {
                    self.cursor += 1;
                    if !triple {
                        return Ok(self.token_from(start, start_line));
                    }
                    if self.bytes.get(self.cursor) == Some(&delim)
                        && self.bytes.get(self.cursor + 1) == Some(&delim)
                    {
                        self.cursor += 2;
                        // Up to two extra delimiters belong to the content.
                        for _ in 0..2 {
                            if self.bytes.get(self.cursor) == Some(&delim) {
                                self.cursor += 1;
                            }
                        }
                        return Ok(self.token_from(start, start_line));
                    }
                }
                _ => self.cursor += 1,
            }
        }
    }

    /// Validates the escape following a backslash: a recognized escape
    /// letter, a hex escape with the exact digit count, or (in multi-line
    /// strings) a line-ending backslash.
    fn validate_escape(&mut self, triple: bool, start_line: u32) -> Result<(), Error> {
        let Some(&esc) = self.bytes.get(self.cursor) else {
            return Err(self.error(ErrorKind::UnterminatedString, start_line));
        };
        match esc {
            b'b' | b't' | b'n' | b'f' | b'r' | b'"' | b'\\' => {
                self.cursor += 1;
                Ok(())
            }
            b'u' => {
                self.cursor += 1;
                self.expect_hex(4, start_line)
            }
            b'U' => {
                self.cursor += 1;
                self.expect_hex(8, start_line)
            }
            b' ' | b'\t' | b'\r' | b'\n' if triple => {
                // Line-ending backslash: only whitespace may follow on this
                // line.
                while matches!(self.bytes.get(self.cursor), Some(&(b' ' | b'\t'))) {
                    self.cursor += 1;
                }
                match self.bytes.get(self.cursor) {
                    Some(&b'\n') => {
                        self.cursor += 1;
                        self.line += 1;
                        Ok(())
                    }
                    Some(&b'\r') if self.bytes.get(self.cursor + 1) == Some(&b'\n') => {
                        self.cursor += 2;
                        self.line += 1;
                        Ok(())
                    }
                    _ => Err(self.error(ErrorKind::InvalidEscape(esc as char), self.line)),
                }
            }
            _ => {
                let line = self.line;
                let ch = self.take_char();
                Err(self.error(ErrorKind::InvalidEscape(ch), line))
            }
        }
    }

    fn expect_hex(&mut self, digits: usize, start_line: u32) -> Result<(), Error> {
        for _ in 0..digits {
            let Some(&b) = self.bytes.get(self.cursor) else {
                return Err(self.error(ErrorKind::UnterminatedString, start_line));
            };
            if !b.is_ascii_hexdigit() {
                let line = self.line;
                let ch = self.take_char();
                return Err(self.error(ErrorKind::InvalidHexEscape(ch), line));
            }
            self.cursor += 1;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "./scanner_tests.rs"]
mod tests;
