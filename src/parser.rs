//! Recursive-descent tree builder.
//!
//! Pulls tokens from the [`Scanner`] on demand and assembles the document
//! tree, resolving dotted and bracketed key paths and enforcing the
//! key-uniqueness and array-homogeneity invariants. All state lives in one
//! exclusively-owned [`Parser`] threaded by `&mut` through every call; any
//! error aborts the parse and discards the partially built tree.

use crate::array::{Array, ArrayKind};
use crate::error::{Error, ErrorKind};
use crate::scanner::{Scanner, Token, TokenKind};
use crate::str::Str;
use crate::table::{Slot, Table};
use crate::value;
use smallvec::SmallVec;

/// Maximum number of dotted segments in a bracketed table header.
const MAX_PATH_DEPTH: usize = 10;

/// One step from the document root towards the table a header selected.
///
/// Collection indices stay valid because the parser only appends, so the
/// current table can be re-resolved from the root for every statement.
#[derive(Clone, Copy)]
enum Step {
    /// Descend into the sub-table at this index.
    Table(usize),
    /// Descend into the last element of the table-array at this index.
    ArrayTable(usize),
}

struct Parser<'a> {
    scanner: Scanner<'a>,
    tok: Token<'a>,
}

/// Parses a complete document into its root [`Table`], or fails with the
/// first located error.
pub fn parse(input: &str) -> Result<Table<'_>, Error> {
    let mut root = Table::new();
    let mut parser = Parser::new(input)?;
    let mut path: Vec<Step> = Vec::new();

    loop {
        match parser.tok.kind {
            TokenKind::Eof => break,
            TokenKind::Newline => parser.advance(true)?,
            TokenKind::LeftBracket => path = parser.header(&mut root)?,
            TokenKind::Str => {
                let table = table_at(&mut root, &path);
                parser.keyval(table)?;
            }
            _ => return Err(parser.wanted("a key or table header")),
        }
    }
    Ok(root)
}

/// Re-resolves the current table from the root by following the header path.
fn table_at<'t, 'a>(root: &'t mut Table<'a>, path: &[Step]) -> &'t mut Table<'a> {
    let mut current = root;
    for &step in path {
        current = match step {
            Step::Table(i) => current.table_mut(i),
            Step::ArrayTable(i) => current.array_mut(i).last_table_mut().unwrap(),
        };
    }
    current
}

/// Walks one dotted key segment in a key/value statement: descend into an
/// existing sub-table, or create one. A pair or array under the name is a
/// duplicate-key error.
fn descend_dotted<'t, 'a>(
    table: &'t mut Table<'a>,
    key: Str<'a>,
    line: u32,
) -> Result<&'t mut Table<'a>, Error> {
    match table.find_slot(&key) {
        Some(Slot::Table(i)) => Ok(table.table_mut(i)),
        Some(_) => Err(Error {
            kind: ErrorKind::DuplicateKey {
                key: key.to_string(),
            },
            line,
        }),
        None => {
            let i = table
                .try_insert_table(key, Table::new())
                .map_err(|kind| Error { kind, line })?;
            Ok(table.table_mut(i))
        }
    }
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Result<Self, Error> {
        let mut scanner = Scanner::new(input);
        let tok = scanner.next(true)?;
        Ok(Parser { scanner, tok })
    }

    fn advance(&mut self, dot_is_special: bool) -> Result<(), Error> {
        self.tok = self.scanner.next(dot_is_special)?;
        Ok(())
    }

    fn skip_newlines(&mut self, dot_is_special: bool) -> Result<(), Error> {
        while self.tok.kind == TokenKind::Newline {
            self.advance(dot_is_special)?;
        }
        Ok(())
    }

    fn wanted(&self, expected: &'static str) -> Error {
        Error {
            kind: ErrorKind::Wanted {
                expected,
                found: describe(&self.tok),
            },
            line: self.tok.line,
        }
    }

    /// After a key/value pair or a header: newline, or EOF.
    fn expect_statement_end(&mut self) -> Result<(), Error> {
        match self.tok.kind {
            TokenKind::Newline => self.advance(true),
            TokenKind::Eof => Ok(()),
            _ => Err(self.wanted("a newline")),
        }
    }

    // -- keys ---------------------------------------------------------------

    /// Normalizes the current token as a key and advances past it.
    ///
    /// Bare keys are restricted to `A-Z a-z 0-9 _ -`; quoted keys follow
    /// string normalization but may not contain a newline.
    fn take_key(&mut self) -> Result<(Str<'a>, u32), Error> {
        let tok = self.tok;
        if tok.kind != TokenKind::Str {
            return Err(self.wanted("a key"));
        }
        let key = match tok.text.as_bytes()[0] {
            b'"' | b'\'' => {
                let normalized = value::decode_string(tok.text).map_err(|_| Error {
                    kind: ErrorKind::InvalidKey,
                    line: tok.line,
                })?;
                if normalized.contains('\n') {
                    return Err(Error {
                        kind: ErrorKind::MultilineStringKey,
                        line: tok.line,
                    });
                }
                normalized
            }
            _ => {
                let bare = tok
                    .text
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
                if !bare {
                    return Err(Error {
                        kind: ErrorKind::InvalidKey,
                        line: tok.line,
                    });
                }
                Str::Borrowed(tok.text)
            }
        };
        self.advance(true)?;
        Ok((key, tok.line))
    }

    // -- key/value statements -----------------------------------------------

    /// `key '=' value` with optional dotted segments, ending at a newline.
    fn keyval(&mut self, table: &mut Table<'a>) -> Result<(), Error> {
        let mut table = table;
        loop {
            let (key, key_line) = self.take_key()?;
            match self.tok.kind {
                TokenKind::Dot => {
                    self.advance(true)?;
                    table = descend_dotted(table, key, key_line)?;
                }
                TokenKind::Equal => {
                    self.advance(false)?;
                    self.parse_value(table, key, key_line)?;
                    return self.expect_statement_end();
                }
                _ => return Err(self.wanted("an equals or a period")),
            }
        }
    }

    /// The token after `=` dictates the shape: a raw scalar, an array, or an
    /// inline table. The token(s) forming the value are consumed.
    fn parse_value(
        &mut self,
        table: &mut Table<'a>,
        key: Str<'a>,
        key_line: u32,
    ) -> Result<(), Error> {
        match self.tok.kind {
            TokenKind::Str => {
                let raw = self.tok.text;
                table
                    .try_insert_pair(key, raw)
                    .map_err(|kind| Error { kind, line: key_line })?;
                self.advance(true)
            }
            TokenKind::LeftBracket => {
                let mut array = Array::new();
                self.advance(false)?;
                self.array_body(&mut array)?;
                table
                    .try_insert_array(key, array)
                    .map_err(|kind| Error { kind, line: key_line })?;
                Ok(())
            }
            TokenKind::LeftBrace => {
                let mut inline = Table::new();
                self.advance(true)?;
                self.inline_table_body(&mut inline)?;
                table
                    .try_insert_table(key, inline)
                    .map_err(|kind| Error { kind, line: key_line })?;
                Ok(())
            }
            _ => Err(self.wanted("a value")),
        }
    }

    // -- arrays -------------------------------------------------------------

    /// Elements up to the closing `]`. Newlines are permitted between
    /// elements; the first element fixes the array's kind and value type,
    /// every later element must match.
    fn array_body(&mut self, array: &mut Array<'a>) -> Result<(), Error> {
        loop {
            self.skip_newlines(false)?;
            if self.tok.kind == TokenKind::RightBracket {
                return self.advance(true);
            }
            let line = self.tok.line;
            match self.tok.kind {
                TokenKind::Str => {
                    let raw = self.tok.text;
                    let Some(vtype) = value::infer(raw) else {
                        return Err(Error {
                            kind: ErrorKind::InvalidValue,
                            line,
                        });
                    };
                    array
                        .push_value(raw, vtype)
                        .map_err(|kind| Error { kind, line })?;
                    self.advance(false)?;
                }
                TokenKind::LeftBracket => {
                    let mut child = Array::new();
                    self.advance(false)?;
                    self.array_body(&mut child)?;
                    array
                        .push_array(child)
                        .map_err(|kind| Error { kind, line })?;
                }
                TokenKind::LeftBrace => {
                    let mut inline = Table::new();
                    self.advance(true)?;
                    self.inline_table_body(&mut inline)?;
                    array
                        .push_table(inline)
                        .map_err(|kind| Error { kind, line })?;
                }
                _ => return Err(self.wanted("a value")),
            }
            self.skip_newlines(false)?;
            match self.tok.kind {
                TokenKind::Comma => self.advance(false)?,
                TokenKind::RightBracket => return self.advance(true),
                _ => return Err(self.wanted("a comma or a right bracket")),
            }
        }
    }

    // -- inline tables ------------------------------------------------------

    /// Key/value pairs up to the closing `}`. Unlike arrays, a newline
    /// anywhere before the closing brace is a syntax error, and a trailing
    /// comma is not allowed.
    fn inline_table_body(&mut self, table: &mut Table<'a>) -> Result<(), Error> {
        self.forbid_newline()?;
        if self.tok.kind == TokenKind::RightBrace {
            return self.advance(true);
        }
        loop {
            let mut target: &mut Table<'a> = &mut *table;
            loop {
                self.forbid_newline()?;
                let (key, key_line) = self.take_key()?;
                self.forbid_newline()?;
                match self.tok.kind {
                    TokenKind::Dot => {
                        self.advance(true)?;
                        target = descend_dotted(target, key, key_line)?;
                    }
                    TokenKind::Equal => {
                        self.advance(false)?;
                        self.forbid_newline()?;
                        self.parse_value(target, key, key_line)?;
                        break;
                    }
                    _ => return Err(self.wanted("an equals or a period")),
                }
            }
            self.forbid_newline()?;
            match self.tok.kind {
                TokenKind::Comma => self.advance(true)?,
                TokenKind::RightBrace => return self.advance(true),
                _ => return Err(self.wanted("a comma or a right brace")),
            }
        }
    }

    fn forbid_newline(&self) -> Result<(), Error> {
        if self.tok.kind == TokenKind::Newline {
            return Err(Error {
                kind: ErrorKind::NewlineInInlineTable,
                line: self.tok.line,
            });
        }
        Ok(())
    }

    // -- table headers ------------------------------------------------------

    /// `[a.b.c]` or `[[a.b.c]]`: collects the segments into a bounded path
    /// list, then walks it from the root, creating implicit tables along the
    /// way. Returns the steps selecting the new current table.
    fn header(&mut self, root: &mut Table<'a>) -> Result<Vec<Step>, Error> {
        self.advance(true)?;
        let is_array_header = self.tok.kind == TokenKind::LeftBracket;
        if is_array_header {
            self.advance(true)?;
        }

        let mut keys: SmallVec<[(Str<'a>, u32); MAX_PATH_DEPTH]> = SmallVec::new();
        loop {
            let (key, line) = self.take_key()?;
            if keys.len() == MAX_PATH_DEPTH {
                return Err(Error {
                    kind: ErrorKind::TablePathTooDeep,
                    line,
                });
            }
            keys.push((key, line));
            if self.tok.kind != TokenKind::Dot {
                break;
            }
            self.advance(true)?;
        }

        if self.tok.kind != TokenKind::RightBracket {
            return Err(self.wanted("a right bracket"));
        }
        self.advance(true)?;
        if is_array_header {
            if self.tok.kind != TokenKind::RightBracket {
                return Err(self.wanted("a right bracket"));
            }
            self.advance(true)?;
        }
        self.expect_statement_end()?;

        let mut path = Vec::with_capacity(keys.len());
        let mut current: &mut Table<'a> = root;
        let last = keys.len() - 1;
        for (depth, (key, line)) in keys.into_iter().enumerate() {
            if depth < last {
                current = walk_intermediate(current, key, line, &mut path)?;
            } else if is_array_header {
                open_array_table(current, key, line, &mut path)?;
            } else {
                open_table(current, key, line, &mut path)?;
            }
        }
        Ok(path)
    }
}

/// Walks one intermediate header segment: descend into an existing table or
/// the last element of a table-array, or create an implicit table.
fn walk_intermediate<'t, 'a>(
    table: &'t mut Table<'a>,
    key: Str<'a>,
    line: u32,
    path: &mut Vec<Step>,
) -> Result<&'t mut Table<'a>, Error> {
    match table.find_slot(&key) {
        Some(Slot::Table(i)) => {
            path.push(Step::Table(i));
            Ok(table.table_mut(i))
        }
        Some(Slot::Array(i)) => {
            let Some(element) = table.array_mut(i).last_table_mut() else {
                return Err(Error {
                    kind: ErrorKind::DuplicateKey {
                        key: key.to_string(),
                    },
                    line,
                });
            };
            path.push(Step::ArrayTable(i));
            Ok(element)
        }
        Some(Slot::Pair(_)) => Err(Error {
            kind: ErrorKind::DuplicateKey {
                key: key.to_string(),
            },
            line,
        }),
        None => {
            let i = table
                .try_insert_table(key, Table::new_implicit())
                .map_err(|kind| Error { kind, line })?;
            path.push(Step::Table(i));
            Ok(table.table_mut(i))
        }
    }
}

/// Final segment of `[a.b.c]`: create an explicit table, or promote an
/// implicit one. Re-declaring an explicit table is an error.
fn open_table<'a>(
    table: &mut Table<'a>,
    key: Str<'a>,
    line: u32,
    path: &mut Vec<Step>,
) -> Result<(), Error> {
    match table.find_slot(&key) {
        Some(Slot::Table(i)) => {
            let existing = table.table_mut(i);
            if !existing.is_implicit() {
                return Err(Error {
                    kind: ErrorKind::DuplicateTable {
                        name: key.to_string(),
                    },
                    line,
                });
            }
            existing.set_explicit();
            path.push(Step::Table(i));
            Ok(())
        }
        Some(_) => Err(Error {
            kind: ErrorKind::DuplicateKey {
                key: key.to_string(),
            },
            line,
        }),
        None => {
            let i = table
                .try_insert_table(key, Table::new())
                .map_err(|kind| Error { kind, line })?;
            path.push(Step::Table(i));
            Ok(())
        }
    }
}

/// Final segment of `[[a.b.c]]`: find-or-create a table-kind array under the
/// name and append a fresh table element.
fn open_array_table<'a>(
    table: &mut Table<'a>,
    key: Str<'a>,
    line: u32,
    path: &mut Vec<Step>,
) -> Result<(), Error> {
    match table.find_slot(&key) {
        Some(Slot::Array(i)) => {
            let kind = table.array_mut(i).kind();
            if kind != Some(ArrayKind::Table) {
                return Err(Error {
                    kind: ErrorKind::ArrayKindMismatch {
                        expected: kind.unwrap_or(ArrayKind::Value).name(),
                        found: ArrayKind::Table.name(),
                    },
                    line,
                });
            }
            table
                .array_mut(i)
                .push_table(Table::new())
                .map_err(|kind| Error { kind, line })?;
            path.push(Step::ArrayTable(i));
            Ok(())
        }
        Some(Slot::Table(_)) => Err(Error {
            kind: ErrorKind::RedefineAsArray,
            line,
        }),
        Some(Slot::Pair(_)) => Err(Error {
            kind: ErrorKind::DuplicateKey {
                key: key.to_string(),
            },
            line,
        }),
        None => {
            let mut array = Array::new();
            array
                .push_table(Table::new())
                .map_err(|kind| Error { kind, line })?;
            let i = table
                .try_insert_array(key, array)
                .map_err(|kind| Error { kind, line })?;
            path.push(Step::ArrayTable(i));
            Ok(())
        }
    }
}

fn describe(tok: &Token<'_>) -> &'static str {
    match tok.kind {
        TokenKind::Newline => "a newline",
        TokenKind::Equal => "an equals",
        TokenKind::Comma => "a comma",
        TokenKind::Dot => "a period",
        TokenKind::LeftBrace => "a left brace",
        TokenKind::RightBrace => "a right brace",
        TokenKind::LeftBracket => "a left bracket",
        TokenKind::RightBracket => "a right bracket",
        TokenKind::Eof => "eof",
        TokenKind::Str => match tok.text.as_bytes().first() {
            Some(&(b'"' | b'\'')) => "a string",
            _ => "an identifier",
        },
    }
}

#[cfg(test)]
#[path = "./parser_tests.rs"]
mod tests;
