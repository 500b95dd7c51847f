//! Lazy decoding handle with typed accessors.

use crate::data::{self, AsnBitString, AsnContextTag, AsnData, AsnOid, AsnSet};
use crate::{de, Asn1BerError, Result};
use chrono::{DateTime, Utc};
use keeta_asn1::{AsnValue, ContextContent, ContextKind, Tag};
use num_bigint_dig::BigInt;
use num_traits::ToPrimitive;

/// A lazily-decoded BER object.
///
/// Owns the raw bytes of one complete object; each accessor parses on
/// demand and returns a fresh owned value, so a handle can be read
/// repeatedly and shared between threads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AsnDecoder {
    data: Vec<u8>,
}

impl AsnDecoder {
    pub fn new(data: Vec<u8>) -> Self {
        Self { data }
    }

    pub fn from_buffer(data: &[u8]) -> Self {
        Self::new(data.to_vec())
    }

    /// Build a handle from base64 text.
    pub fn from_base64(text: &str) -> Result<Self> {
        Ok(Self::new(base64::decode(text)?))
    }

    /// Build a handle from hex text.
    pub fn from_hex(text: &str) -> Result<Self> {
        Ok(Self::new(hex::decode(text)?))
    }

    /// The raw encoded bytes.
    pub fn raw(&self) -> &[u8] {
        &self.data
    }

    /// Identifier octet of the outermost object, when any bytes are present.
    pub fn tag(&self) -> Option<Tag> {
        self.data.first().map(|&octet| Tag::from(octet))
    }

    pub fn to_base64(&self) -> String {
        base64::encode(&self.data)
    }

    fn value(&self) -> Result<AsnValue> {
        de::from_bytes(&self.data)
    }

    pub fn into_bool(&self) -> Result<bool> {
        match self.value()? {
            AsnValue::Bool(v) => Ok(v),
            other => Err(mismatch("BOOLEAN", &other)),
        }
    }

    /// The integer as a host-width value; wider content fails with
    /// [`Asn1BerError::IntegerOverflow`].
    pub fn into_integer(&self) -> Result<i64> {
        match self.value()? {
            AsnValue::Integer(v) => v.to_i64().ok_or(Asn1BerError::IntegerOverflow),
            other => Err(mismatch("INTEGER", &other)),
        }
    }

    pub fn into_big_int(&self) -> Result<BigInt> {
        match self.value()? {
            AsnValue::Integer(v) => Ok(v),
            other => Err(mismatch("INTEGER", &other)),
        }
    }

    /// Text of any string-bearing tag, including the read-only repertoires.
    pub fn into_string(&self) -> Result<String> {
        match self.value()? {
            AsnValue::Utf8String(text)
            | AsnValue::PrintableString(text)
            | AsnValue::Ia5String(text) => Ok(text),
            other => Err(mismatch("a string", &other)),
        }
    }

    /// The instant of either date tag.
    pub fn into_date(&self) -> Result<DateTime<Utc>> {
        match self.value()? {
            AsnValue::UtcTime(instant) | AsnValue::GeneralizedTime(instant) => Ok(instant),
            other => Err(mismatch("a date", &other)),
        }
    }

    pub fn into_buffer(&self) -> Result<Vec<u8>> {
        match self.value()? {
            AsnValue::OctetString(bytes) => Ok(bytes),
            other => Err(mismatch("OCTET STRING", &other)),
        }
    }

    pub fn into_oid(&self) -> Result<AsnOid> {
        match self.value()? {
            AsnValue::Oid(arcs) => Ok(AsnOid::new(data::oid_display_form(&arcs))),
            other => Err(mismatch("OBJECT IDENTIFIER", &other)),
        }
    }

    pub fn into_set(&self) -> Result<AsnSet> {
        match self.value()? {
            AsnValue::Set(items) => data::set_back(&items),
            other => Err(mismatch("SET", &other)),
        }
    }

    pub fn into_bit_string(&self) -> Result<AsnBitString> {
        match self.value()? {
            AsnValue::BitString(bits) => Ok(AsnBitString::with_unused_bits(
                bits.bytes,
                bits.unused_bits,
            )),
            other => Err(mismatch("BIT STRING", &other)),
        }
    }

    pub fn into_context_tag(&self) -> Result<AsnContextTag> {
        match self.value()? {
            AsnValue::ContextTag(ctx) => Ok(match ctx.content {
                ContextContent::Raw(bytes) => AsnContextTag {
                    value: ctx.number,
                    kind: ContextKind::Implicit,
                    contains: Box::new(AsnData::Bytes(bytes)),
                },
                ContextContent::Value(child) => AsnContextTag {
                    value: ctx.number,
                    kind: ContextKind::Explicit,
                    contains: Box::new(data::adapt_back(&child)?),
                },
            }),
            other => Err(mismatch("a context tag", &other)),
        }
    }

    /// Elements of a SEQUENCE, adapted back to host values.
    pub fn into_array(&self) -> Result<Vec<AsnData>> {
        match self.value()? {
            AsnValue::Sequence(items) => items.iter().map(data::adapt_back).collect(),
            other => Err(mismatch("SEQUENCE", &other)),
        }
    }
}

impl From<Vec<u8>> for AsnDecoder {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

impl TryFrom<&str> for AsnDecoder {
    type Error = Asn1BerError;

    /// Accepts base64 first, then hex.
    fn try_from(text: &str) -> Result<Self> {
        match Self::from_base64(text) {
            Ok(handle) => Ok(handle),
            Err(_) => Self::from_hex(text),
        }
    }
}

fn mismatch(expected: &'static str, found: &AsnValue) -> Asn1BerError {
    Asn1BerError::TypeMismatch {
        expected,
        found: variant_name(found),
    }
}

fn variant_name(value: &AsnValue) -> &'static str {
    match value {
        AsnValue::Bool(_) => "BOOLEAN",
        AsnValue::Integer(_) => "INTEGER",
        AsnValue::BitString(_) => "BIT STRING",
        AsnValue::OctetString(_) => "OCTET STRING",
        AsnValue::Null => "NULL",
        AsnValue::Oid(_) => "OBJECT IDENTIFIER",
        AsnValue::Utf8String(_) => "UTF8String",
        AsnValue::PrintableString(_) => "PrintableString",
        AsnValue::Ia5String(_) => "IA5String",
        AsnValue::UtcTime(_) => "UTCTime",
        AsnValue::GeneralizedTime(_) => "GeneralizedTime",
        AsnValue::Sequence(_) => "SEQUENCE",
        AsnValue::Set(_) => "SET",
        AsnValue::ContextTag(_) => "a context tag",
    }
}
