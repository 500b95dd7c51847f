//! Recursive BER encoder over the value model.

use crate::misc::Length;
use crate::{Asn1BerError, Result, MAX_DEPTH};
use keeta_asn1::{bigint, date, oids, restricted, AsnValue, ContextContent, Tag};

/// Encode a value into its definite-length BER octets.
pub fn to_vec(value: &AsnValue) -> Result<Vec<u8>> {
    debug_log!("encode {}", value.tag());
    let mut out = Vec::new();
    write_value(value, &mut out, 0)?;
    Ok(out)
}

fn write_value(value: &AsnValue, out: &mut Vec<u8>, depth: usize) -> Result<()> {
    if depth >= MAX_DEPTH {
        return Err(Asn1BerError::DepthExceeded);
    }

    match value {
        AsnValue::Bool(v) => {
            write_primitive(Tag::BOOLEAN, &[if *v { 0xFF } else { 0x00 }], out);
        }
        AsnValue::Integer(v) => {
            write_primitive(Tag::INTEGER, &bigint::big_int_to_buffer(v), out);
        }
        AsnValue::BitString(bits) => {
            let mut content = Vec::with_capacity(bits.bytes.len() + 1);
            content.push(bits.unused_bits);
            content.extend_from_slice(&bits.bytes);
            write_primitive(Tag::BIT_STRING, &content, out);
        }
        AsnValue::OctetString(bytes) => write_primitive(Tag::OCTET_STRING, bytes, out),
        AsnValue::Null => write_primitive(Tag::NULL, &[], out),
        AsnValue::Oid(arcs) => {
            let content = oids::encode_arcs(arcs).map_err(|err| Asn1BerError::OidMalformed {
                reason: err.0,
                offset: None,
            })?;
            write_primitive(Tag::OID, &content, out);
        }
        AsnValue::Utf8String(text) => write_primitive(Tag::UTF8_STRING, text.as_bytes(), out),
        AsnValue::PrintableString(text) => {
            if !restricted::is_printable(text) {
                return Err(Asn1BerError::StringCharsetViolation {
                    charset: "PrintableString",
                    offset: None,
                });
            }
            write_primitive(Tag::PRINTABLE_STRING, text.as_bytes(), out);
        }
        AsnValue::Ia5String(text) => {
            if !restricted::is_ia5(text) {
                return Err(Asn1BerError::StringCharsetViolation {
                    charset: "IA5String",
                    offset: None,
                });
            }
            write_primitive(Tag::IA5_STRING, text.as_bytes(), out);
        }
        AsnValue::UtcTime(instant) => {
            if !date::fits_utc_time(instant) {
                return Err(Asn1BerError::DateOutOfRange {
                    detail: "UTCTime only covers 1950-2049",
                    offset: None,
                });
            }
            write_primitive(Tag::UTC_TIME, date::format_utc_time(instant).as_bytes(), out);
        }
        AsnValue::GeneralizedTime(instant) => {
            write_primitive(
                Tag::GENERALIZED_TIME,
                date::format_generalized_time(instant).as_bytes(),
                out,
            );
        }
        AsnValue::Sequence(items) => write_constructed(Tag::SEQUENCE, items, out, depth)?,
        AsnValue::Set(items) => write_constructed(Tag::SET, items, out, depth)?,
        AsnValue::ContextTag(ctx) => match &ctx.content {
            ContextContent::Raw(bytes) => {
                write_primitive(Tag::context_primitive(ctx.number), bytes, out);
            }
            ContextContent::Value(child) => {
                let mut content = Vec::new();
                write_value(child, &mut content, depth + 1)?;
                write_header(Tag::context_constructed(ctx.number), content.len(), out);
                out.extend_from_slice(&content);
            }
        },
    }
    Ok(())
}

fn write_header(tag: Tag, len: usize, out: &mut Vec<u8>) {
    out.push(tag.octet());
    Length::serialize(len, out);
}

fn write_primitive(tag: Tag, content: &[u8], out: &mut Vec<u8>) {
    write_header(tag, content.len(), out);
    out.extend_from_slice(content);
}

fn write_constructed(tag: Tag, items: &[AsnValue], out: &mut Vec<u8>, depth: usize) -> Result<()> {
    let mut content = Vec::new();
    for item in items {
        write_value(item, &mut content, depth + 1)?;
    }
    write_header(tag, content.len(), out);
    out.extend_from_slice(&content);
    Ok(())
}
