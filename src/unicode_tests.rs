use super::{decode, encode};

#[test]
fn decode_standard_widths() {
    assert_eq!(decode(b"A"), Some((0x41, 1)));
    assert_eq!(decode("é".as_bytes()), Some((0xE9, 2)));
    assert_eq!(decode("€".as_bytes()), Some((0x20AC, 3)));
    assert_eq!(decode("𐍈".as_bytes()), Some((0x10348, 4)));
}

#[test]
fn decode_tolerates_wide_sequences() {
    // 5- and 6-byte forms from the original UTF-8 design.
    assert_eq!(decode(&[0xF8, 0x88, 0x80, 0x80, 0x80]), Some((0x200000, 5)));
    assert_eq!(
        decode(&[0xFC, 0x84, 0x80, 0x80, 0x80, 0x80]),
        Some((0x4000000, 6))
    );
}

#[test]
fn decode_rejects_malformed() {
    // 0xFE/0xFF are never leading bytes.
    assert_eq!(decode(&[0xFE]), None);
    assert_eq!(decode(&[0xFF]), None);
    // Bad continuation byte.
    assert_eq!(decode(&[0xC3, 0x41]), None);
    // Truncated sequence.
    assert_eq!(decode(&[0xE2, 0x82]), None);
    assert_eq!(decode(&[]), None);
}

#[test]
fn encode_round_trips_scalar_values() {
    for &code in &[0x41u32, 0xE9, 0x20AC, 0x10348, 0x10FFFF] {
        let mut buf = [0u8; 4];
        let len = encode(code, &mut buf).unwrap();
        assert_eq!(decode(&buf[..len]), Some((code, len)), "code {code:#X}");
    }
}

#[test]
fn encode_rejects_non_scalar_values() {
    let mut buf = [0u8; 4];
    assert_eq!(encode(0xD800, &mut buf), None);
    assert_eq!(encode(0xDFFF, &mut buf), None);
    assert_eq!(encode(0xFFFE, &mut buf), None);
    assert_eq!(encode(0xFFFF, &mut buf), None);
    assert_eq!(encode(0x110000, &mut buf), None);
}

#[test]
fn encode_matches_std() {
    for &code in &[0x7Fu32, 0x80, 0x7FF, 0x800, 0xFFFD, 0x10000] {
        let mut buf = [0u8; 4];
        let len = encode(code, &mut buf).unwrap();
        let ch = char::from_u32(code).unwrap();
        let mut expected = [0u8; 4];
        let std_len = ch.encode_utf8(&mut expected).len();
        assert_eq!(&buf[..len], &expected[..std_len]);
    }
}
