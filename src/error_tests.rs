use super::{ConvError, Error, ErrorKind};

#[test]
fn display_includes_line_number() {
    let err = Error {
        kind: ErrorKind::DuplicateKey { key: "port".into() },
        line: 7,
    };
    assert_eq!(err.to_string(), "line 7: duplicate key: `port`");
}

#[test]
fn display_escapes_whitespace() {
    let err = Error {
        kind: ErrorKind::InvalidEscape('\t'),
        line: 2,
    };
    assert_eq!(
        err.to_string(),
        "line 2: invalid escape character in string: `\\t`"
    );
}

#[test]
fn kind_codes() {
    assert_eq!(ErrorKind::UnterminatedString.to_string(), "unterminated-string");
    assert_eq!(ErrorKind::TablePathTooDeep.to_string(), "table-path-too-deep");
    assert_eq!(
        ErrorKind::Wanted {
            expected: "a newline",
            found: "eof"
        }
        .to_string(),
        "wanted"
    );
    // Debug mirrors the code form.
    assert_eq!(format!("{:?}", ErrorKind::RedefineAsArray), "redefine-as-array");
}

#[test]
fn wanted_message() {
    let err = Error {
        kind: ErrorKind::Wanted {
            expected: "an equals",
            found: "a newline",
        },
        line: 3,
    };
    assert_eq!(err.to_string(), "line 3: expected an equals, found a newline");
}

#[test]
fn conv_error_display() {
    assert_eq!(ConvError::NoInput.to_string(), "no input text");
    assert_eq!(
        ConvError::InvalidInput.to_string(),
        "text does not match the requested type"
    );
    assert_eq!(
        ConvError::ConversionFailed.to_string(),
        "value cannot be represented"
    );
}
