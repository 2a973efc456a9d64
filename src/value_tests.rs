use super::{decode_bool, decode_datetime, decode_float, decode_integer, decode_string, infer};
use crate::error::ConvError;
use crate::str::Str;
use crate::value::ValueType;

#[test]
fn booleans() {
    assert_eq!(decode_bool("true"), Ok(true));
    assert_eq!(decode_bool("false"), Ok(false));
    assert_eq!(decode_bool(""), Err(ConvError::NoInput));
    assert_eq!(decode_bool("True"), Err(ConvError::InvalidInput));
    assert_eq!(decode_bool("truex"), Err(ConvError::InvalidInput));
}

#[test]
fn integers() {
    assert_eq!(decode_integer("0"), Ok(0));
    assert_eq!(decode_integer("42"), Ok(42));
    assert_eq!(decode_integer("+42"), Ok(42));
    assert_eq!(decode_integer("-17"), Ok(-17));
    assert_eq!(decode_integer("1_000"), Ok(1000));
    assert_eq!(decode_integer("1_2_3"), Ok(123));
    assert_eq!(decode_integer("0xDEADBEEF"), Ok(0xDEADBEEF));
    assert_eq!(decode_integer("0xdead_beef"), Ok(0xDEADBEEF));
    assert_eq!(decode_integer("0o755"), Ok(0o755));
    assert_eq!(decode_integer("0b1101"), Ok(13));
    assert_eq!(decode_integer("-9223372036854775808"), Ok(i64::MIN));
    assert_eq!(decode_integer("9223372036854775807"), Ok(i64::MAX));
}

#[test]
fn integer_underscore_rules() {
    assert_eq!(decode_integer("_1000"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("1000_"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("1__000"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("0x_1"), Err(ConvError::InvalidInput));
}

#[test]
fn integer_rejections() {
    assert_eq!(decode_integer(""), Err(ConvError::NoInput));
    assert_eq!(decode_integer("01"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("00"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("0x"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("+"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("12a"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("0b2"), Err(ConvError::InvalidInput));
    assert_eq!(decode_integer("1.5"), Err(ConvError::InvalidInput));
    // Lexically valid but out of range.
    assert_eq!(
        decode_integer("9223372036854775808"),
        Err(ConvError::ConversionFailed)
    );
}

#[test]
fn floats() {
    assert_eq!(decode_float("3.14"), Ok(3.14));
    assert_eq!(decode_float("-0.01"), Ok(-0.01));
    assert_eq!(decode_float("+1.5"), Ok(1.5));
    assert_eq!(decode_float("6.02e23"), Ok(6.02e23));
    assert_eq!(decode_float("1E-3"), Ok(1e-3));
    assert_eq!(decode_float("1e6"), Ok(1e6));
    assert_eq!(decode_float("0.5"), Ok(0.5));
    assert_eq!(decode_float("9_224.1_0"), Ok(9224.10));
    assert_eq!(decode_float("1e0_2"), Ok(100.0));
    assert_eq!(decode_float("inf"), Ok(f64::INFINITY));
    assert_eq!(decode_float("-inf"), Ok(f64::NEG_INFINITY));
    assert!(decode_float("nan").unwrap().is_nan());
    assert!(decode_float("-nan").unwrap().is_nan());
}

#[test]
fn float_rejections() {
    assert_eq!(decode_float(""), Err(ConvError::NoInput));
    for bad in [
        "0", "03.14", ".5", "5.", "1._5", "1_.5", "1.5_", "_1.5", "1.5e", "1e+", "1ee5",
        "1.2.3", "1.5e2.0", "x", "+-1.0",
    ] {
        assert_eq!(decode_float(bad), Err(ConvError::InvalidInput), "input {bad:?}");
    }
    // Overflows to infinity.
    assert_eq!(decode_float("1e999"), Err(ConvError::ConversionFailed));
}

#[test]
fn basic_strings() {
    assert_eq!(decode_string(r#""hello""#).unwrap(), "hello");
    assert_eq!(decode_string(r#""""#).unwrap(), "");
    assert_eq!(decode_string(r#""line1\nline2""#).unwrap(), "line1\nline2");
    assert_eq!(decode_string(r#""col\tcol""#).unwrap(), "col\tcol");
    assert_eq!(decode_string(r#""say \"hi\"""#).unwrap(), "say \"hi\"");
    assert_eq!(decode_string(r#""back\\slash""#).unwrap(), "back\\slash");
    assert_eq!(decode_string(r#""\b\f\r""#).unwrap(), "\u{8}\u{c}\r");
    assert_eq!(decode_string(r#""\u0041""#).unwrap(), "A");
    assert_eq!(decode_string(r#""\u00E9""#).unwrap(), "é");
    assert_eq!(decode_string(r#""\U0001F600""#).unwrap(), "\u{1F600}");
}

#[test]
fn escape_normalization_selects_representation() {
    assert!(decode_string(r#""plain""#).unwrap().is_borrowed());
    assert!(decode_string(r#""unicode é ok""#).unwrap().is_borrowed());
    assert!(!decode_string(r#""esc\naped""#).unwrap().is_borrowed());
}

#[test]
fn bad_escapes() {
    assert_eq!(
        decode_string(r#""\uD800""#),
        Err(ConvError::ConversionFailed)
    );
    assert_eq!(
        decode_string(r#""\uDFFF""#),
        Err(ConvError::ConversionFailed)
    );
    assert_eq!(
        decode_string(r#""\uFFFE""#),
        Err(ConvError::ConversionFailed)
    );
    assert_eq!(
        decode_string(r#""\uFFFF""#),
        Err(ConvError::ConversionFailed)
    );
    assert_eq!(
        decode_string(r#""\U00110000""#),
        Err(ConvError::ConversionFailed)
    );
    assert_eq!(decode_string(r#""\q""#), Err(ConvError::InvalidInput));
    assert_eq!(decode_string(r#""\u12""#), Err(ConvError::InvalidInput));
    assert_eq!(decode_string(r#""\uZZZZ""#), Err(ConvError::InvalidInput));
}

#[test]
fn control_characters_are_rejected() {
    assert_eq!(decode_string("\"a\u{1}b\""), Err(ConvError::InvalidInput));
    assert_eq!(decode_string("\"a\u{7f}b\""), Err(ConvError::InvalidInput));
    // Tab is fine.
    assert_eq!(decode_string("\"a\tb\"").unwrap(), "a\tb");
    // A raw newline is only permitted in the multi-line form.
    assert_eq!(decode_string("\"a\nb\""), Err(ConvError::InvalidInput));
    assert_eq!(decode_string("\"\"\"a\nb\"\"\"").unwrap(), "a\nb");
}

#[test]
fn literal_strings_are_verbatim() {
    assert_eq!(decode_string(r#"'no\escape'"#).unwrap(), "no\\escape");
    assert_eq!(decode_string("'c:\\path'").unwrap(), "c:\\path");
    assert!(decode_string(r#"'anything'"#).unwrap().is_borrowed());
}

#[test]
fn multiline_strings() {
    // The linebreak right after the opening delimiter is dropped.
    assert_eq!(decode_string("\"\"\"\nhello\"\"\"").unwrap(), "hello");
    assert_eq!(decode_string("\"\"\"\r\nhello\"\"\"").unwrap(), "hello");
    assert_eq!(decode_string("'''\nhello\nworld'''").unwrap(), "hello\nworld");
    // Quotes adjacent to the closing delimiter.
    assert_eq!(decode_string("\"\"\"two \"\"\"\"\"").unwrap(), "two \"\"");
}

#[test]
fn line_ending_backslash() {
    let raw = "\"\"\"one \\\n    two\"\"\"";
    assert_eq!(decode_string(raw).unwrap(), "one two");

    let raw = "\"\"\"one \\\n\n     \n two\"\"\"";
    assert_eq!(decode_string(raw).unwrap(), "one two");

    // Trailing whitespace after the backslash is allowed, other characters
    // are not.
    let raw = "\"\"\"one \\   \ntwo\"\"\"";
    assert_eq!(decode_string(raw).unwrap(), "one two");
    let raw = "\"\"\"one \\ x\ntwo\"\"\"";
    assert_eq!(decode_string(raw), Err(ConvError::InvalidInput));
}

#[test]
fn string_shape_rejections() {
    assert_eq!(decode_string(""), Err(ConvError::NoInput));
    assert_eq!(decode_string("42"), Err(ConvError::InvalidInput));
    assert_eq!(decode_string("\"unterminated"), Err(ConvError::InvalidInput));
    assert_eq!(decode_string("\""), Err(ConvError::InvalidInput));
}

#[test]
fn datetimes() {
    let ts = decode_datetime("1979-05-27T07:32:00Z").unwrap();
    assert!(ts.date().is_some());
    assert!(ts.time().is_some());
    assert_eq!(decode_datetime(""), Err(ConvError::NoInput));
    assert_eq!(decode_datetime("1979-05-27x"), Err(ConvError::InvalidInput));
    assert_eq!(decode_datetime("1979-13-01"), Err(ConvError::InvalidInput));
}

#[test]
fn inference_order() {
    assert_eq!(infer(r#""quoted""#), Some(ValueType::String));
    assert_eq!(infer("'quoted'"), Some(ValueType::String));
    assert_eq!(infer("true"), Some(ValueType::Boolean));
    assert_eq!(infer("42"), Some(ValueType::Integer));
    assert_eq!(infer("-0x10"), Some(ValueType::Integer));
    assert_eq!(infer("3.14"), Some(ValueType::Float));
    assert_eq!(infer("1e10"), Some(ValueType::Float));
    assert_eq!(infer("inf"), Some(ValueType::Float));
    assert_eq!(infer("1979-05-27"), Some(ValueType::Date));
    assert_eq!(infer("07:32:00"), Some(ValueType::Time));
    assert_eq!(infer("1979-05-27T07:32:00"), Some(ValueType::Datetime));
    assert_eq!(infer("garbage"), None);
    assert_eq!(infer(""), None);
}

#[test]
fn decoded_strings_borrow_where_possible() {
    let raw = r#""borrowed content""#;
    let s = decode_string(raw).unwrap();
    assert!(matches!(s, Str::Borrowed(_)));
    // The borrow points into the raw text itself.
    assert_eq!(s.as_str().as_ptr(), raw[1..].as_ptr());
}
