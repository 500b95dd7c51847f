//! Byte-exact encoding vectors and their decode inverses.

use chrono::{TimeZone, Utc};
use keeta_asn1::bigint::string_to_big_int;
use keeta_asn1_ber::{
    decode, encode, AsnContextTag, AsnData, AsnObject, AsnOid, AsnSet, Asn1BerError,
};
use rstest::rstest;

fn assert_vector(data: AsnData, expected_hex: &str) {
    let bytes = encode(&data).unwrap();
    assert_eq!(hex::encode(&bytes), expected_hex);
}

#[test]
fn booleans() {
    assert_vector(AsnData::Boolean(true), "0101ff");
    assert_vector(AsnData::Boolean(false), "010100");
    assert_eq!(decode(&hex::decode("0101ff").unwrap()).unwrap(), AsnData::Boolean(true));
    assert_eq!(decode(&hex::decode("010100").unwrap()).unwrap(), AsnData::Boolean(false));
}

#[rstest]
#[case(42, "02012a")]
#[case(-0xFFFF, "0203ff0001")]
#[case(0x80, "02020080")]
#[case(0, "020100")]
#[case(456, "020201c8")]
fn integers(#[case] value: i64, #[case] expected_hex: &str) {
    assert_vector(AsnData::Integer(value), expected_hex);
    assert_eq!(
        decode(&hex::decode(expected_hex).unwrap()).unwrap(),
        AsnData::Integer(value)
    );
}

#[test]
fn big_integers() {
    let positive = string_to_big_int("18591708106338011145").unwrap();
    assert_vector(AsnData::BigInt(positive), "0209010203040506070809");

    let negative = string_to_big_int("-18591708106338011145").unwrap();
    assert_vector(AsnData::BigInt(negative.clone()), "0209fefdfcfbfaf9f8f7f7");
    assert_eq!(
        decode(&hex::decode("0209fefdfcfbfaf9f8f7f7").unwrap()).unwrap(),
        AsnData::BigInt(negative)
    );
}

#[rstest]
#[case("test", "130474657374")]
#[case("Test_", "1605546573745f")]
#[case("Tes\u{1133}", "0c06546573e184b3")]
fn string_narrowing(#[case] text: &str, #[case] expected_hex: &str) {
    assert_vector(AsnData::String(text.to_owned()), expected_hex);
    assert_eq!(
        decode(&hex::decode(expected_hex).unwrap()).unwrap(),
        AsnData::String(text.to_owned())
    );
}

#[test]
fn symbolic_oid() {
    let data = AsnData::Object(AsnObject::Oid(AsnOid::new("sha256")));
    assert_vector(data.clone(), "0609608648016503040201");
    assert_eq!(
        decode(&hex::decode("0609608648016503040201").unwrap()).unwrap(),
        data
    );
}

#[test]
fn attribute_set() {
    let data = AsnData::Object(AsnObject::Set(AsnSet::new(
        AsnOid::new("commonName"),
        "test",
    )));
    assert_vector(data.clone(), "310d300b0603550403130474657374");
    assert_eq!(
        decode(&hex::decode("310d300b0603550403130474657374").unwrap()).unwrap(),
        data
    );
}

#[test]
fn epoch_is_utc_time() {
    let epoch = Utc.timestamp_millis_opt(0).unwrap();
    assert_vector(
        AsnData::Date(epoch),
        "170d3730303130313030303030305a",
    );
    assert_eq!(
        decode(&hex::decode("170d3730303130313030303030305a").unwrap()).unwrap(),
        AsnData::Date(epoch)
    );
}

#[test]
fn generalized_time_keeps_milliseconds() {
    let instant = Utc.timestamp_millis_opt(1655921880210).unwrap();
    let bytes = encode(&AsnData::Date(instant)).unwrap();
    assert_eq!(bytes[0], 0x18);
    assert_eq!(&bytes[2..], "20220622181800.210Z".as_bytes());
    assert_eq!(decode(&bytes).unwrap(), AsnData::Date(instant));
}

#[test]
fn explicit_context_tag() {
    let data = AsnData::Object(AsnObject::Context(AsnContextTag::new(
        3,
        AsnData::Integer(42),
    )));
    assert_vector(data.clone(), "a30302012a");
    assert_eq!(decode(&hex::decode("a30302012a").unwrap()).unwrap(), data);
}

#[test]
fn implicit_context_tag_carries_content_octets_only() {
    let data = AsnData::Object(AsnObject::Context(AsnContextTag::implicit(
        0,
        AsnData::Integer(42),
    )));
    assert_vector(data, "80012a");

    // Implicit content is opaque on the way back.
    assert_eq!(
        decode(&hex::decode("80012a").unwrap()).unwrap(),
        AsnData::Object(AsnObject::Context(AsnContextTag::implicit(
            0,
            AsnData::Bytes(vec![0x2A]),
        )))
    );
}

#[test]
fn sequences_recurse() {
    let data = AsnData::Array(vec![
        AsnData::Integer(1),
        AsnData::Array(vec![AsnData::Boolean(true)]),
        AsnData::Null,
    ]);
    assert_vector(data.clone(), "300a02010130030101ff0500");
    assert_eq!(
        decode(&hex::decode("300a02010130030101ff0500").unwrap()).unwrap(),
        data
    );
}

#[test]
fn null_and_bytes() {
    assert_vector(AsnData::Null, "0500");
    assert_vector(
        AsnData::Bytes(vec![0x01, 0x02, 0x03, 0x04, 0x05]),
        "04050102030405",
    );
}

#[test]
fn base64_surface() {
    let bytes = encode(&AsnData::Integer(42)).unwrap();
    assert_eq!(keeta_asn1_ber::to_base64(&bytes), "AgEq");
    assert_eq!(
        keeta_asn1_ber::decode_base64("AgEq").unwrap(),
        AsnData::Integer(42)
    );
    assert!(matches!(
        keeta_asn1_ber::decode_base64("!!not base64!!"),
        Err(Asn1BerError::Base64Decoding(_))
    ));
}
