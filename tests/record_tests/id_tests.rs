//! Tests for record ids

use clientkeeper::record::{RecordId, ID_HEX_WIDTH};

#[test]
fn test_display_is_fixed_width_hex() {
    let id = RecordId::new(0xabc);
    let text = id.to_string();

    assert_eq!(text.len(), ID_HEX_WIDTH);
    assert_eq!(text, "000000000000000000000abc");
}

#[test]
fn test_parse_round_trip() {
    let id = RecordId::new(123_456_789);
    let parsed: RecordId = id.to_string().parse().unwrap();
    assert_eq!(parsed, id);
}

#[test]
fn test_parse_accepts_short_and_uppercase() {
    assert_eq!("ff".parse::<RecordId>().unwrap(), RecordId::new(255));
    assert_eq!("FF".parse::<RecordId>().unwrap(), RecordId::new(255));
}

#[test]
fn test_parse_rejects_garbage() {
    assert!("".parse::<RecordId>().is_err());
    assert!("xyz".parse::<RecordId>().is_err());
    assert!("+ff".parse::<RecordId>().is_err());
    assert!("0000000000000000000000001".parse::<RecordId>().is_err());
}

#[test]
fn test_parse_rejects_out_of_range() {
    // 17 significant digits cannot fit 64 bits
    assert!("100000000000000000".parse::<RecordId>().is_err());
}

#[test]
fn test_ids_are_ordered() {
    let a = RecordId::new(1);
    assert!(a < a.next());
    assert_eq!(a.next().as_u64(), 2);
}
