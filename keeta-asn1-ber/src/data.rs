//! Host-value adapter: the bridge between idiomatic host shapes and the
//! wire value model, including canonical-form selection.
//!
//! Plain values go through inference: a string takes the narrowest legal
//! string tag, a date becomes UTCTime when whole-second and within the
//! two-digit-year window. The tagged objects below bypass inference where a
//! caller needs one exact shape, and decoding produces a tagged object
//! whenever a plain value would not re-encode to the same bytes.

use crate::{Asn1BerError, EncodeOptions, Result, MAX_DEPTH};
use chrono::{DateTime, Utc};
use keeta_asn1::{
    bigint, date, oids, restricted, AsnValue, BitStringValue, ContextContent, ContextKind,
    ContextTagValue,
};
use num_bigint_dig::BigInt;
use num_traits::ToPrimitive;
use std::str::FromStr;

/// Tagged objects carry a `type` discriminator string on the host side.
pub trait TypedObject {
    const TYPE: &'static str;
}

/// A host value: what application code hands to `encode` and receives from
/// `decode`.
#[derive(Debug, Clone, PartialEq)]
pub enum AsnData {
    Boolean(bool),
    Integer(i64),
    BigInt(BigInt),
    String(String),
    Bytes(Vec<u8>),
    Date(DateTime<Utc>),
    Array(Vec<AsnData>),
    Object(AsnObject),
    Null,
    /// JavaScript-style absent sentinel; rejected unless
    /// [`EncodeOptions::allow_undefined`] is set.
    Undefined,
}

/// The tagged objects of the host surface.
#[derive(Debug, Clone, PartialEq)]
pub enum AsnObject {
    Oid(AsnOid),
    Set(AsnSet),
    BitString(AsnBitString),
    Context(AsnContextTag),
    String(AsnString),
    Date(AsnDate),
}

impl AsnObject {
    /// Discriminator string of the wrapped object.
    pub fn type_name(&self) -> &'static str {
        match self {
            AsnObject::Oid(_) => AsnOid::TYPE,
            AsnObject::Set(_) => AsnSet::TYPE,
            AsnObject::BitString(_) => AsnBitString::TYPE,
            AsnObject::Context(_) => AsnContextTag::TYPE,
            AsnObject::String(_) => AsnString::TYPE,
            AsnObject::Date(_) => AsnDate::TYPE,
        }
    }
}

/// An object identifier by symbolic name or dotted form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsnOid {
    pub oid: String,
}

impl AsnOid {
    pub fn new<T: AsRef<str>>(oid: T) -> Self {
        Self {
            oid: oid.as_ref().to_owned(),
        }
    }
}

/// An X.501-style attribute: a SET holding one OID/string pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsnSet {
    pub name: AsnOid,
    pub value: String,
}

impl AsnSet {
    pub fn new<T: ToString>(name: AsnOid, value: T) -> Self {
        Self {
            name,
            value: value.to_string(),
        }
    }
}

/// A BIT STRING payload with its unused trailing bit count (0-7).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsnBitString {
    pub value: Vec<u8>,
    pub unused_bits: u8,
}

impl AsnBitString {
    pub fn new(value: Vec<u8>) -> Self {
        Self {
            value,
            unused_bits: 0,
        }
    }

    pub fn with_unused_bits(value: Vec<u8>, unused_bits: u8) -> Self {
        Self { value, unused_bits }
    }
}

/// A context-specific tag 0-30 around an arbitrary host value.
///
/// Explicit tags wrap the complete encoding of `contains`; implicit tags
/// carry only its content octets, so `contains` must be a byte buffer or a
/// primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct AsnContextTag {
    pub value: u8,
    pub kind: ContextKind,
    pub contains: Box<AsnData>,
}

impl AsnContextTag {
    /// Explicit tagging, the default kind.
    pub fn new(value: u8, contains: AsnData) -> Self {
        Self {
            value,
            kind: ContextKind::Explicit,
            contains: Box::new(contains),
        }
    }

    pub fn implicit(value: u8, contains: AsnData) -> Self {
        Self {
            value,
            kind: ContextKind::Implicit,
            contains: Box::new(contains),
        }
    }
}

/// A string under a caller-chosen tag, bypassing inference.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsnString {
    pub kind: StringKind,
    pub value: String,
}

impl AsnString {
    pub fn new<T: AsRef<str>>(kind: StringKind, value: T) -> Self {
        Self {
            kind,
            value: value.as_ref().to_owned(),
        }
    }
}

/// A timestamp under a caller-chosen date tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AsnDate {
    pub kind: DateKind,
    pub date: DateTime<Utc>,
}

impl AsnDate {
    pub fn new(kind: DateKind, date: DateTime<Utc>) -> Self {
        Self { kind, date }
    }
}

impl TypedObject for AsnOid {
    const TYPE: &'static str = "oid";
}

impl TypedObject for AsnSet {
    const TYPE: &'static str = "set";
}

impl TypedObject for AsnBitString {
    const TYPE: &'static str = "bitstring";
}

impl TypedObject for AsnContextTag {
    const TYPE: &'static str = "context";
}

impl TypedObject for AsnString {
    const TYPE: &'static str = "string";
}

impl TypedObject for AsnDate {
    const TYPE: &'static str = "date";
}

/// String tag selector for [`AsnString`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StringKind {
    Printable,
    Ia5,
    Utf8,
}

impl StringKind {
    pub fn as_str(self) -> &'static str {
        match self {
            StringKind::Printable => "printable",
            StringKind::Ia5 => "ia5",
            StringKind::Utf8 => "utf8",
        }
    }
}

impl FromStr for StringKind {
    type Err = Asn1BerError;

    fn from_str(kind: &str) -> Result<Self> {
        match kind {
            "printable" => Ok(StringKind::Printable),
            "ia5" => Ok(StringKind::Ia5),
            "utf8" => Ok(StringKind::Utf8),
            other => Err(Asn1BerError::UnknownTaggedType {
                name: format!("string:{other}"),
            }),
        }
    }
}

/// Date tag selector for [`AsnDate`]; `Default` applies the usual
/// canonical-form inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DateKind {
    Utc,
    General,
    Default,
}

impl DateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            DateKind::Utc => "utc",
            DateKind::General => "general",
            DateKind::Default => "default",
        }
    }
}

impl FromStr for DateKind {
    type Err = Asn1BerError;

    fn from_str(kind: &str) -> Result<Self> {
        match kind {
            "utc" => Ok(DateKind::Utc),
            "general" => Ok(DateKind::General),
            "default" => Ok(DateKind::Default),
            other => Err(Asn1BerError::UnknownTaggedType {
                name: format!("date:{other}"),
            }),
        }
    }
}

/// Adapt a host value into the wire model. `None` means the value was an
/// undefined sentinel elided under `allow_undefined`.
pub(crate) fn adapt(data: &AsnData, options: &EncodeOptions) -> Result<Option<AsnValue>> {
    let mut path = Vec::new();
    adapt_value(data, options, &mut path, 0)
}

fn adapt_value(
    data: &AsnData,
    options: &EncodeOptions,
    path: &mut Vec<String>,
    depth: usize,
) -> Result<Option<AsnValue>> {
    if depth >= MAX_DEPTH {
        return Err(Asn1BerError::DepthExceeded);
    }

    match data {
        AsnData::Boolean(v) => Ok(Some(AsnValue::Bool(*v))),
        AsnData::Integer(v) => Ok(Some(AsnValue::Integer(bigint::integer_to_big_int(*v)))),
        AsnData::BigInt(v) => Ok(Some(AsnValue::Integer(v.clone()))),
        AsnData::String(text) => Ok(Some(narrowest_string(text))),
        AsnData::Bytes(bytes) => Ok(Some(AsnValue::OctetString(bytes.clone()))),
        AsnData::Date(instant) => Ok(Some(canonical_date(*instant))),
        AsnData::Array(items) => {
            let mut children = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                path.push(format!("[{index}]"));
                if let Some(child) = adapt_value(item, options, path, depth + 1)? {
                    children.push(child);
                }
                path.pop();
            }
            Ok(Some(AsnValue::Sequence(children)))
        }
        AsnData::Object(object) => adapt_object(object, options, path, depth).map(Some),
        AsnData::Null => Ok(Some(AsnValue::Null)),
        AsnData::Undefined => {
            if options.allow_undefined {
                Ok(None)
            } else {
                Err(Asn1BerError::UndefinedRejected {
                    path: render_path(path),
                })
            }
        }
    }
}

fn adapt_object(
    object: &AsnObject,
    options: &EncodeOptions,
    path: &mut Vec<String>,
    depth: usize,
) -> Result<AsnValue> {
    match object {
        AsnObject::Oid(oid) => Ok(AsnValue::Oid(resolve_oid_arcs(&oid.oid)?)),
        AsnObject::Set(set) => {
            path.push("name".to_owned());
            let arcs = resolve_oid_arcs(&set.name.oid)?;
            path.pop();
            Ok(AsnValue::Set(vec![AsnValue::Sequence(vec![
                AsnValue::Oid(arcs),
                narrowest_string(&set.value),
            ])]))
        }
        AsnObject::BitString(bits) => {
            if bits.unused_bits > 7 {
                path.push("unusedBits".to_owned());
                return Err(Asn1BerError::UnsupportedHostType {
                    path: render_path(path),
                });
            }
            Ok(AsnValue::BitString(BitStringValue {
                unused_bits: bits.unused_bits,
                bytes: bits.value.clone(),
            }))
        }
        AsnObject::Context(context) => adapt_context(context, options, path, depth),
        AsnObject::String(string) => forced_string(string),
        AsnObject::Date(forced) => forced_date(forced),
    }
}

fn adapt_context(
    context: &AsnContextTag,
    options: &EncodeOptions,
    path: &mut Vec<String>,
    depth: usize,
) -> Result<AsnValue> {
    if context.value > 30 {
        path.push("value".to_owned());
        return Err(Asn1BerError::UnsupportedHostType {
            path: render_path(path),
        });
    }

    path.push("contains".to_owned());
    let content = match context.kind {
        ContextKind::Explicit => {
            let child = adapt_value(&context.contains, options, path, depth + 1)?.ok_or_else(
                || Asn1BerError::UndefinedRejected {
                    path: render_path(path),
                },
            )?;
            ContextContent::Value(Box::new(child))
        }
        ContextKind::Implicit => ContextContent::Raw(implicit_payload(&context.contains, path)?),
    };
    path.pop();

    Ok(AsnValue::ContextTag(ContextTagValue {
        number: context.value,
        content,
    }))
}

/// Content octets of a primitive carried under an implicit tag; the
/// underlying type's own tag and length are not written.
fn implicit_payload(data: &AsnData, path: &[String]) -> Result<Vec<u8>> {
    match data {
        AsnData::Bytes(bytes) => Ok(bytes.clone()),
        AsnData::Boolean(v) => Ok(vec![if *v { 0xFF } else { 0x00 }]),
        AsnData::Integer(v) => Ok(bigint::big_int_to_buffer(&bigint::integer_to_big_int(*v))),
        AsnData::BigInt(v) => Ok(bigint::big_int_to_buffer(v)),
        AsnData::String(text) => Ok(text.as_bytes().to_vec()),
        AsnData::Date(instant) => Ok(date_payload(*instant)),
        _ => Err(Asn1BerError::UnsupportedHostType {
            path: render_path(path),
        }),
    }
}

fn narrowest_string(text: &str) -> AsnValue {
    if restricted::is_printable(text) {
        AsnValue::PrintableString(text.to_owned())
    } else if restricted::is_ia5(text) {
        AsnValue::Ia5String(text.to_owned())
    } else {
        AsnValue::Utf8String(text.to_owned())
    }
}

fn canonical_date(instant: DateTime<Utc>) -> AsnValue {
    let instant = date::truncate_to_millis(instant);
    if date::is_whole_second(&instant) && date::fits_utc_time(&instant) {
        AsnValue::UtcTime(instant)
    } else {
        AsnValue::GeneralizedTime(instant)
    }
}

fn date_payload(instant: DateTime<Utc>) -> Vec<u8> {
    match canonical_date(instant) {
        AsnValue::UtcTime(instant) => date::format_utc_time(&instant).into_bytes(),
        _ => date::format_generalized_time(&instant).into_bytes(),
    }
}

fn forced_string(string: &AsnString) -> Result<AsnValue> {
    match string.kind {
        StringKind::Printable => {
            if !restricted::is_printable(&string.value) {
                return Err(Asn1BerError::StringCharsetViolation {
                    charset: "PrintableString",
                    offset: None,
                });
            }
            Ok(AsnValue::PrintableString(string.value.clone()))
        }
        StringKind::Ia5 => {
            if !restricted::is_ia5(&string.value) {
                return Err(Asn1BerError::StringCharsetViolation {
                    charset: "IA5String",
                    offset: None,
                });
            }
            Ok(AsnValue::Ia5String(string.value.clone()))
        }
        StringKind::Utf8 => Ok(AsnValue::Utf8String(string.value.clone())),
    }
}

fn forced_date(forced: &AsnDate) -> Result<AsnValue> {
    match forced.kind {
        DateKind::Utc => {
            let instant = date::truncate_to_seconds(forced.date);
            if !date::fits_utc_time(&instant) {
                return Err(Asn1BerError::DateOutOfRange {
                    detail: "UTCTime only covers 1950-2049",
                    offset: None,
                });
            }
            Ok(AsnValue::UtcTime(instant))
        }
        DateKind::General => Ok(AsnValue::GeneralizedTime(date::truncate_to_millis(
            forced.date,
        ))),
        DateKind::Default => Ok(canonical_date(forced.date)),
    }
}

fn resolve_oid_arcs(name: &str) -> Result<Vec<u64>> {
    let dotted = match oids::name_to_oid(name) {
        Some(dotted) => dotted,
        None if name.contains('.') => name,
        None => {
            return Err(Asn1BerError::OidUnknownName {
                name: name.to_owned(),
            })
        }
    };
    oids::parse_arcs(dotted).map_err(|err| Asn1BerError::OidMalformed {
        reason: err.0,
        offset: None,
    })
}

fn render_path(segments: &[String]) -> String {
    let mut out = String::new();
    for segment in segments {
        if !out.is_empty() && !segment.starts_with('[') {
            out.push('.');
        }
        out.push_str(segment);
    }
    if out.is_empty() {
        out.push('.');
    }
    out
}

/// Map a decoded wire value back to the host surface. Tagged objects are
/// produced only where a plain value would not re-encode losslessly.
pub(crate) fn adapt_back(value: &AsnValue) -> Result<AsnData> {
    Ok(match value {
        AsnValue::Bool(v) => AsnData::Boolean(*v),
        AsnValue::Integer(v) => match v.to_i64() {
            Some(small) => AsnData::Integer(small),
            None => AsnData::BigInt(v.clone()),
        },
        AsnValue::BitString(bits) => AsnData::Object(AsnObject::BitString(
            AsnBitString::with_unused_bits(bits.bytes.clone(), bits.unused_bits),
        )),
        AsnValue::OctetString(bytes) => AsnData::Bytes(bytes.clone()),
        AsnValue::Null => AsnData::Null,
        AsnValue::Oid(arcs) => {
            AsnData::Object(AsnObject::Oid(AsnOid::new(oid_display_form(arcs))))
        }
        AsnValue::Utf8String(text) => {
            if restricted::is_printable(text) || restricted::is_ia5(text) {
                AsnData::Object(AsnObject::String(AsnString::new(StringKind::Utf8, text)))
            } else {
                AsnData::String(text.clone())
            }
        }
        AsnValue::PrintableString(text) => AsnData::String(text.clone()),
        AsnValue::Ia5String(text) => {
            if restricted::is_printable(text) {
                AsnData::Object(AsnObject::String(AsnString::new(StringKind::Ia5, text)))
            } else {
                AsnData::String(text.clone())
            }
        }
        AsnValue::UtcTime(instant) => AsnData::Date(*instant),
        AsnValue::GeneralizedTime(instant) => {
            if date::is_whole_second(instant) && date::fits_utc_time(instant) {
                AsnData::Object(AsnObject::Date(AsnDate::new(DateKind::General, *instant)))
            } else {
                AsnData::Date(*instant)
            }
        }
        AsnValue::Sequence(items) => {
            AsnData::Array(items.iter().map(adapt_back).collect::<Result<Vec<_>>>()?)
        }
        AsnValue::Set(items) => AsnData::Object(AsnObject::Set(set_back(items)?)),
        AsnValue::ContextTag(ctx) => AsnData::Object(AsnObject::Context(match &ctx.content {
            ContextContent::Raw(bytes) => AsnContextTag {
                value: ctx.number,
                kind: ContextKind::Implicit,
                contains: Box::new(AsnData::Bytes(bytes.clone())),
            },
            ContextContent::Value(child) => AsnContextTag {
                value: ctx.number,
                kind: ContextKind::Explicit,
                contains: Box::new(adapt_back(child)?),
            },
        })),
    })
}

pub(crate) fn set_back(items: &[AsnValue]) -> Result<AsnSet> {
    if let [AsnValue::Sequence(pair)] = items {
        if let [AsnValue::Oid(arcs), value] = pair.as_slice() {
            if let Some(text) = string_content(value) {
                return Ok(AsnSet::new(AsnOid::new(oid_display_form(arcs)), text));
            }
        }
    }
    Err(Asn1BerError::SetShapeUnsupported { offset: None })
}

fn string_content(value: &AsnValue) -> Option<&str> {
    match value {
        AsnValue::Utf8String(text)
        | AsnValue::PrintableString(text)
        | AsnValue::Ia5String(text) => Some(text),
        _ => None,
    }
}

pub(crate) fn oid_display_form(arcs: &[u64]) -> String {
    let dotted = oids::arcs_to_string(arcs);
    match oids::oid_to_name(&dotted) {
        Some(name) => name.to_owned(),
        None => dotted,
    }
}
