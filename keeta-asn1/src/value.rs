use crate::tag::Tag;
use chrono::{DateTime, Utc};
use num_bigint_dig::BigInt;

/// Whether a context-specific tag replaces the underlying tag (implicit) or
/// wraps a complete inner object (explicit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    Implicit,
    Explicit,
}

/// BIT STRING payload: the raw bytes plus the number of unused trailing bits
/// of the last octet (0-7).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitStringValue {
    pub unused_bits: u8,
    pub bytes: Vec<u8>,
}

/// Content of a context-specific tag. The variant also fixes the tagging
/// kind: raw octets travel under a primitive (implicit) tag, a boxed child
/// under a constructed (explicit) one.
#[derive(Debug, Clone, PartialEq)]
pub enum ContextContent {
    Raw(Vec<u8>),
    Value(Box<AsnValue>),
}

/// A context-specific tag with number 0-30.
#[derive(Debug, Clone, PartialEq)]
pub struct ContextTagValue {
    pub number: u8,
    pub content: ContextContent,
}

impl ContextTagValue {
    pub fn kind(&self) -> ContextKind {
        match self.content {
            ContextContent::Raw(_) => ContextKind::Implicit,
            ContextContent::Value(_) => ContextKind::Explicit,
        }
    }
}

/// Every ASN.1 shape the codec can put on or take off the wire.
///
/// Values are plain data: produced by decoding or by the host-value
/// adapter, consumed by encoding or the adapter, never shared or mutated in
/// place.
#[derive(Debug, Clone, PartialEq)]
pub enum AsnValue {
    Bool(bool),
    Integer(BigInt),
    BitString(BitStringValue),
    OctetString(Vec<u8>),
    Null,
    /// Object identifier arcs.
    Oid(Vec<u64>),
    Utf8String(String),
    PrintableString(String),
    Ia5String(String),
    /// Second precision, year 1950-2049.
    UtcTime(DateTime<Utc>),
    /// Millisecond precision.
    GeneralizedTime(DateTime<Utc>),
    Sequence(Vec<AsnValue>),
    /// Emitted in insertion order; the ordering rules of DER are not
    /// applied.
    Set(Vec<AsnValue>),
    ContextTag(ContextTagValue),
}

impl AsnValue {
    /// The identifier octet this value encodes under.
    pub fn tag(&self) -> Tag {
        match self {
            AsnValue::Bool(_) => Tag::BOOLEAN,
            AsnValue::Integer(_) => Tag::INTEGER,
            AsnValue::BitString(_) => Tag::BIT_STRING,
            AsnValue::OctetString(_) => Tag::OCTET_STRING,
            AsnValue::Null => Tag::NULL,
            AsnValue::Oid(_) => Tag::OID,
            AsnValue::Utf8String(_) => Tag::UTF8_STRING,
            AsnValue::PrintableString(_) => Tag::PRINTABLE_STRING,
            AsnValue::Ia5String(_) => Tag::IA5_STRING,
            AsnValue::UtcTime(_) => Tag::UTC_TIME,
            AsnValue::GeneralizedTime(_) => Tag::GENERALIZED_TIME,
            AsnValue::Sequence(_) => Tag::SEQUENCE,
            AsnValue::Set(_) => Tag::SET,
            AsnValue::ContextTag(ctx) => match ctx.content {
                ContextContent::Raw(_) => Tag::context_primitive(ctx.number),
                ContextContent::Value(_) => Tag::context_constructed(ctx.number),
            },
        }
    }
}
