//! Stateless decoders from raw token text to typed values.
//!
//! Values in the document tree keep their raw text; these routines run on
//! demand when a typed accessor is called, and eagerly only inside arrays,
//! where the first element's inferred type fixes the element type for the
//! whole array.

use crate::error::ConvError;
use crate::str::Str;
use crate::time::Datetime;
use crate::unicode;

/// The inferred type of a scalar value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueType {
    Boolean,
    Integer,
    Float,
    String,
    Date,
    Time,
    Datetime,
}

impl ValueType {
    /// Human-readable type name, used in error messages.
    pub fn name(self) -> &'static str {
        match self {
            ValueType::Boolean => "boolean",
            ValueType::Integer => "integer",
            ValueType::Float => "float",
            ValueType::String => "string",
            ValueType::Date => "date",
            ValueType::Time => "time",
            ValueType::Datetime => "datetime",
        }
    }
}

/// Infers the type of a raw scalar, trying decoders in a fixed order:
/// a quote prefix means string, then boolean, integer, float, timestamp.
pub(crate) fn infer(raw: &str) -> Option<ValueType> {
    match raw.as_bytes().first() {
        None => return None,
        Some(&(b'"' | b'\'')) => return Some(ValueType::String),
        Some(_) => {}
    }
    if decode_bool(raw).is_ok() {
        return Some(ValueType::Boolean);
    }
    if decode_integer(raw).is_ok() {
        return Some(ValueType::Integer);
    }
    if decode_float(raw).is_ok() {
        return Some(ValueType::Float);
    }
    if let Ok(ts) = decode_datetime(raw) {
        return Some(match (ts.date().is_some(), ts.time().is_some()) {
            (true, true) => ValueType::Datetime,
            (true, false) => ValueType::Date,
            _ => ValueType::Time,
        });
    }
    None
}

/// Decodes a boolean: exactly `true` or `false`.
pub fn decode_bool(raw: &str) -> Result<bool, ConvError> {
    match raw {
        "" => Err(ConvError::NoInput),
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(ConvError::InvalidInput),
    }
}

/// Decodes an integer with an optional sign, optional `0x`/`0o`/`0b` base
/// prefix, and underscores permitted only between digits.
pub fn decode_integer(raw: &str) -> Result<i64, ConvError> {
    if raw.is_empty() {
        return Err(ConvError::NoInput);
    }
    let bytes = raw.as_bytes();
    let (negative, rest) = match bytes[0] {
        b'+' => (false, &bytes[1..]),
        b'-' => (true, &bytes[1..]),
        _ => (false, bytes),
    };
    let (radix, digits) = match rest {
        [b'0', b'x', digits @ ..] => (16, digits),
        [b'0', b'o', digits @ ..] => (8, digits),
        [b'0', b'b', digits @ ..] => (2, digits),
        digits => {
            // A bare leading zero admits no further characters.
            if digits.first() == Some(&b'0') && digits.len() > 1 {
                return Err(ConvError::InvalidInput);
            }
            (10, digits)
        }
    };
    validate_digits(digits, radix)?;

    let mut clean = String::with_capacity(raw.len());
    if negative {
        clean.push('-');
    }
    clean.extend(digits.iter().filter(|&&b| b != b'_').map(|&b| b as char));
    i64::from_str_radix(&clean, radix).map_err(|_| ConvError::ConversionFailed)
}

/// Checks that `digits` is a non-empty run of digits in `radix`, with every
/// underscore strictly between two digits.
fn validate_digits(digits: &[u8], radix: u32) -> Result<(), ConvError> {
    let mut prev_digit = false;
    for &b in digits {
        if b == b'_' {
            if !prev_digit {
                return Err(ConvError::InvalidInput);
            }
            prev_digit = false;
        } else if (b as char).is_digit(radix) {
            prev_digit = true;
        } else {
            return Err(ConvError::InvalidInput);
        }
    }
    if prev_digit { Ok(()) } else { Err(ConvError::InvalidInput) }
}

/// Decodes a float with an optional sign, a mandatory digit on each side of
/// the decimal point, an optional exponent, and underscores permitted only
/// between digits. `inf` and `nan` (optionally signed) are accepted.
pub fn decode_float(raw: &str) -> Result<f64, ConvError> {
    if raw.is_empty() {
        return Err(ConvError::NoInput);
    }
    let (negative, rest) = match raw.as_bytes()[0] {
        b'+' => (false, &raw[1..]),
        b'-' => (true, &raw[1..]),
        _ => (false, raw),
    };
    match rest {
        "inf" => {
            return Ok(if negative {
                f64::NEG_INFINITY
            } else {
                f64::INFINITY
            });
        }
        "nan" => return Ok(f64::NAN.copysign(if negative { -1.0 } else { 1.0 })),
        _ => {}
    }

    let bytes = rest.as_bytes();
    if bytes.is_empty() {
        return Err(ConvError::InvalidInput);
    }
    // A leading zero must introduce a fraction or an exponent.
    if bytes[0] == b'0' && !matches!(bytes.get(1), Some(&(b'.' | b'e' | b'E'))) {
        return Err(ConvError::InvalidInput);
    }

    let mut seen_dot = false;
    let mut seen_exp = false;
    let mut prev = 0u8;
    for (i, &b) in bytes.iter().enumerate() {
        let next = bytes.get(i + 1).copied();
        match b {
            b'0'..=b'9' => {}
            b'.' => {
                if seen_dot
                    || seen_exp
                    || !prev.is_ascii_digit()
                    || !next.is_some_and(|n| n.is_ascii_digit())
                {
                    return Err(ConvError::InvalidInput);
                }
                seen_dot = true;
            }
            b'e' | b'E' => {
                if seen_exp || !prev.is_ascii_digit() {
                    return Err(ConvError::InvalidInput);
                }
                seen_exp = true;
            }
            b'+' | b'-' => {
                if prev != b'e' && prev != b'E' {
                    return Err(ConvError::InvalidInput);
                }
            }
            b'_' => {
                if !prev.is_ascii_digit() || !next.is_some_and(|n| n.is_ascii_digit()) {
                    return Err(ConvError::InvalidInput);
                }
            }
            _ => return Err(ConvError::InvalidInput),
        }
        prev = b;
    }
    if !prev.is_ascii_digit() {
        return Err(ConvError::InvalidInput);
    }

    let clean: String = rest.chars().filter(|&c| c != '_').collect();
    let value: f64 = clean.parse().map_err(|_| ConvError::ConversionFailed)?;
    if !value.is_finite() {
        return Err(ConvError::ConversionFailed);
    }
    Ok(if negative { -value } else { value })
}

/// Decodes a quoted string, dispatching on the opening delimiter and the
/// delimiter count (1 vs 3) into basic/literal and single/multi-line modes.
///
/// Returns a borrowed slice when no normalization was needed and an owned
/// buffer when escape decoding rewrote the text.
pub fn decode_string(raw: &str) -> Result<Str<'_>, ConvError> {
    let bytes = raw.as_bytes();
    let delim = match bytes.first() {
        None => return Err(ConvError::NoInput),
        Some(&b) if b == b'"' || b == b'\'' => b,
        Some(_) => return Err(ConvError::InvalidInput),
    };
    let triple = bytes.len() >= 3 && bytes[1] == delim && bytes[2] == delim;

    let mut content = if triple {
        if bytes.len() < 6 || bytes[bytes.len() - 3..] != [delim, delim, delim] {
            return Err(ConvError::InvalidInput);
        }
        &raw[3..raw.len() - 3]
    } else {
        if bytes.len() < 2 || bytes[bytes.len() - 1] != delim {
            return Err(ConvError::InvalidInput);
        }
        &raw[1..raw.len() - 1]
    };

    // A linebreak directly after the opening triple quote is dropped.
    if triple {
        if let Some(rest) = content.strip_prefix("\r\n") {
            content = rest;
        } else if let Some(rest) = content.strip_prefix('\n') {
            content = rest;
        }
    }

    if delim == b'\'' {
        // Literal strings are verbatim.
        return Ok(Str::Borrowed(content));
    }
    normalize_basic(content, triple)
}

/// Returns `true` for a byte that may not appear raw in a basic string at
/// position `i`: control characters other than tab, except the CR/LF forms
/// permitted in multi-line strings.
fn bad_control(bytes: &[u8], i: usize, multiline: bool) -> bool {
    match bytes[i] {
        b'\t' => false,
        b'\n' => !multiline,
        b'\r' => !(multiline && bytes.get(i + 1) == Some(&b'\n')),
        0x7F => true,
        b => b < 0x20,
    }
}

fn normalize_basic(content: &str, multiline: bool) -> Result<Str<'_>, ConvError> {
    let bytes = content.as_bytes();

    // Fast path: borrow directly when no escape needs decoding.
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'\\' {
            break;
        }
        if bad_control(bytes, i, multiline) {
            return Err(ConvError::InvalidInput);
        }
        i += 1;
    }
    if i == bytes.len() {
        return Ok(Str::Borrowed(content));
    }

    let mut buf = Vec::with_capacity(content.len());
    buf.extend_from_slice(&bytes[..i]);
    while i < bytes.len() {
        let b = bytes[i];
        if b == b'\\' {
            i += 1;
            let Some(&esc) = bytes.get(i) else {
                return Err(ConvError::InvalidInput);
            };
            i += 1;
            match esc {
                b'b' => buf.push(0x08),
                b't' => buf.push(b'\t'),
                b'n' => buf.push(b'\n'),
                b'f' => buf.push(0x0C),
                b'r' => buf.push(b'\r'),
                b'"' => buf.push(b'"'),
                b'\\' => buf.push(b'\\'),
                b'u' => push_hex_escape(&mut buf, bytes, &mut i, 4)?,
                b'U' => push_hex_escape(&mut buf, bytes, &mut i, 8)?,
                b' ' | b'\t' | b'\r' | b'\n' if multiline => {
                    // Line-ending backslash: the rest of the line must be
                    // whitespace; the break and the next line's leading
                    // whitespace are elided.
                    i -= 1;
                    while matches!(bytes.get(i), Some(&(b' ' | b'\t'))) {
                        i += 1;
                    }
                    match bytes.get(i) {
                        Some(&b'\n') => i += 1,
                        Some(&b'\r') if bytes.get(i + 1) == Some(&b'\n') => i += 2,
                        _ => return Err(ConvError::InvalidInput),
                    }
                    loop {
                        match bytes.get(i) {
                            Some(&(b' ' | b'\t' | b'\n')) => i += 1,
                            Some(&b'\r') if bytes.get(i + 1) == Some(&b'\n') => i += 2,
                            _ => break,
                        }
                    }
                }
                _ => return Err(ConvError::InvalidInput),
            }
        } else if b < 0x80 {
            if bad_control(bytes, i, multiline) {
                return Err(ConvError::InvalidInput);
            }
            buf.push(b);
            i += 1;
        } else {
            // Copy one multi-byte sequence through the codec.
            let Some((code, len)) = unicode::decode(&bytes[i..]) else {
                return Err(ConvError::InvalidInput);
            };
            let mut utf8 = [0u8; 4];
            let n = unicode::encode(code, &mut utf8).ok_or(ConvError::InvalidInput)?;
            buf.extend_from_slice(&utf8[..n]);
            i += len;
        }
    }
    let owned = String::from_utf8(buf).map_err(|_| ConvError::ConversionFailed)?;
    Ok(Str::Owned(owned.into_boxed_str()))
}

fn push_hex_escape(
    buf: &mut Vec<u8>,
    bytes: &[u8],
    i: &mut usize,
    digits: usize,
) -> Result<(), ConvError> {
    let Some(hex) = bytes.get(*i..*i + digits) else {
        return Err(ConvError::InvalidInput);
    };
    let mut code = 0u32;
    for &b in hex {
        let digit = (b as char).to_digit(16).ok_or(ConvError::InvalidInput)?;
        code = (code << 4) | digit;
    }
    *i += digits;
    let mut utf8 = [0u8; 4];
    let n = unicode::encode(code, &mut utf8).ok_or(ConvError::ConversionFailed)?;
    buf.extend_from_slice(&utf8[..n]);
    Ok(())
}

/// Decodes a timestamp: date-only, time-only, or combined, with optional
/// fractional seconds and optional UTC offset. Trailing characters are an
/// error.
pub fn decode_datetime(raw: &str) -> Result<Datetime, ConvError> {
    if raw.is_empty() {
        return Err(ConvError::NoInput);
    }
    match Datetime::munch(raw.as_bytes()) {
        Some((len, value)) if len == raw.len() => Ok(value),
        _ => Err(ConvError::InvalidInput),
    }
}

#[cfg(test)]
#[path = "./value_tests.rs"]
mod tests;
