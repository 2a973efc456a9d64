use std::fmt::{self, Debug, Display};

/// Error that can occur while parsing a document.
///
/// Carries a 1-based line number; no partial tree is ever returned alongside
/// an error.
#[derive(Debug, Clone)]
pub struct Error {
    /// The error kind
    pub kind: ErrorKind,
    /// 1-based line number where the error occurred.
    pub line: u32,
}

impl std::error::Error for Error {}

impl From<(ErrorKind, u32)> for Error {
    fn from((kind, line): (ErrorKind, u32)) -> Self {
        Self { kind, line }
    }
}

/// Kinds of parse errors.
///
/// Lexical errors (malformed tokens), syntax errors (grammar violations), and
/// semantic errors (duplicate keys, array mismatches) are all fatal to the
/// whole parse. Accessor-local failures use [`ConvError`] instead.
#[derive(Clone)]
pub enum ErrorKind {
    /// An invalid character not allowed in a string was found.
    InvalidCharInString(char),

    /// An invalid character was found as an escape.
    InvalidEscape(char),

    /// An invalid character was found in a hex escape.
    InvalidHexEscape(char),

    /// An unexpected character was encountered, typically when looking for
    /// the start of a token.
    Unexpected(char),

    /// An unterminated string was found where EOF was reached before the
    /// closing quote.
    UnterminatedString,

    /// Wanted one sort of token, but found another.
    Wanted {
        /// Expected token type.
        expected: &'static str,
        /// Actually found token type.
        found: &'static str,
    },

    /// A bare key contains characters outside `A-Z a-z 0-9 _ -`, or a quoted
    /// key failed to normalize.
    InvalidKey,

    /// Multiline strings are not allowed for key.
    MultilineStringKey,

    /// A newline appeared inside an inline table before the closing brace.
    NewlineInInlineTable,

    /// A bracketed table header has more than the supported number of
    /// dotted segments.
    TablePathTooDeep,

    /// An array element that decodes as no supported value type.
    InvalidValue,

    /// Duplicate key in table.
    DuplicateKey {
        /// The duplicate key
        key: String,
    },

    /// A duplicate table definition was found.
    DuplicateTable {
        /// The name of the duplicate table
        name: String,
    },

    /// A previously defined table was redefined as an array.
    RedefineAsArray,

    /// An array element whose shape (value/array/table) differs from the
    /// kind fixed by the array's first element.
    ArrayKindMismatch {
        /// Element shape fixed by the first element.
        expected: &'static str,
        /// Shape of the offending element.
        found: &'static str,
    },

    /// A value-kind array element whose inferred type differs from the type
    /// fixed by the array's first element.
    ArrayTypeMismatch {
        /// Value type fixed by the first element.
        expected: &'static str,
        /// Inferred type of the offending element.
        found: &'static str,
    },
}

impl Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::InvalidCharInString(..) => "invalid-char-in-string",
            Self::InvalidEscape(..) => "invalid-escape",
            Self::InvalidHexEscape(..) => "invalid-hex-escape",
            Self::Unexpected(..) => "unexpected",
            Self::UnterminatedString => "unterminated-string",
            Self::Wanted { .. } => "wanted",
            Self::InvalidKey => "invalid-key",
            Self::MultilineStringKey => "multiline-string-key",
            Self::NewlineInInlineTable => "newline-in-inline-table",
            Self::TablePathTooDeep => "table-path-too-deep",
            Self::InvalidValue => "invalid-value",
            Self::DuplicateKey { .. } => "duplicate-key",
            Self::DuplicateTable { .. } => "duplicate-table",
            Self::RedefineAsArray => "redefine-as-array",
            Self::ArrayKindMismatch { .. } => "array-kind-mismatch",
            Self::ArrayTypeMismatch { .. } => "array-type-mismatch",
        };
        f.write_str(text)
    }
}

impl Debug for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(self, f)
    }
}

struct Escape(char);

impl fmt::Display for Escape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use std::fmt::Write as _;

        if self.0.is_whitespace() || self.0.is_control() {
            for esc in self.0.escape_default() {
                f.write_char(esc)?;
            }
            Ok(())
        } else {
            f.write_char(self.0)
        }
    }
}

impl Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: ", self.line)?;
        match &self.kind {
            ErrorKind::InvalidCharInString(c) => {
                write!(f, "invalid character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidEscape(c) => {
                write!(f, "invalid escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::InvalidHexEscape(c) => {
                write!(f, "invalid hex escape character in string: `{}`", Escape(*c))
            }
            ErrorKind::Unexpected(c) => {
                write!(f, "unexpected character found: `{}`", Escape(*c))
            }
            ErrorKind::UnterminatedString => f.write_str("unterminated string"),
            ErrorKind::Wanted { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            ErrorKind::InvalidKey => f.write_str("invalid key"),
            ErrorKind::MultilineStringKey => {
                f.write_str("multiline strings are not allowed for key")
            }
            ErrorKind::NewlineInInlineTable => {
                f.write_str("newline is not allowed within an inline table")
            }
            ErrorKind::TablePathTooDeep => f.write_str("table path is too deep"),
            ErrorKind::InvalidValue => f.write_str("invalid value"),
            ErrorKind::DuplicateKey { key } => write!(f, "duplicate key: `{key}`"),
            ErrorKind::DuplicateTable { name } => {
                write!(f, "redefinition of table `{name}`")
            }
            ErrorKind::RedefineAsArray => f.write_str("table redefined as array"),
            ErrorKind::ArrayKindMismatch { expected, found } => {
                write!(f, "array of {expected} cannot contain {found}")
            }
            ErrorKind::ArrayTypeMismatch { expected, found } => {
                write!(f, "array of {expected} values cannot contain a {found}")
            }
        }
    }
}

/// Failure of a typed accessor, local to a single call.
///
/// Unlike [`Error`], a `ConvError` does not invalidate the document tree:
/// the raw text stays in place and other accessors are unaffected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvError {
    /// The raw text was empty.
    NoInput,
    /// The raw text does not match the requested type.
    InvalidInput,
    /// The raw text matched the requested type but its value cannot be
    /// represented (overflow, invalid escape value).
    ConversionFailed,
}

impl std::error::Error for ConvError {}

impl Display for ConvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::NoInput => "no input text",
            Self::InvalidInput => "text does not match the requested type",
            Self::ConversionFailed => "value cannot be represented",
        };
        f.write_str(text)
    }
}

#[cfg(test)]
#[path = "./error_tests.rs"]
mod tests;
