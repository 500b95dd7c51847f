//! Recursive-descent BER decoder producing the value model.

use crate::misc::{Length, Reader};
use crate::{Asn1BerError, Result, MAX_DEPTH};
use keeta_asn1::{
    bigint, date, oids, restricted, AsnValue, BitStringValue, ContextContent, ContextTagValue, Tag,
};

/// Decode a single definite-length BER object; trailing bytes are an error.
pub fn from_bytes(bytes: &[u8]) -> Result<AsnValue> {
    let mut reader = Reader::new(bytes);
    let value = read_value(&mut reader, 0)?;
    if reader.remaining() > 0 {
        return Err(Asn1BerError::TrailingBytes {
            offset: reader.offset(),
            count: reader.remaining(),
        });
    }
    Ok(value)
}

fn read_value(reader: &mut Reader<'_>, depth: usize) -> Result<AsnValue> {
    if depth >= MAX_DEPTH {
        return Err(Asn1BerError::DepthExceeded);
    }

    let tag_offset = reader.offset();
    let tag = Tag::from(reader.read_one()?);
    let len = Length::deserialized(reader)?;
    debug_log!("decode {} ({} bytes) at offset {}", tag, len, tag_offset);

    match tag {
        Tag::SEQUENCE => {
            let mut inner = reader.slice(len)?;
            Ok(AsnValue::Sequence(read_children(&mut inner, depth)?))
        }
        Tag::SET => {
            let mut inner = reader.slice(len)?;
            let items = read_children(&mut inner, depth)?;
            if !is_name_value_set(&items) {
                return Err(Asn1BerError::SetShapeUnsupported {
                    offset: Some(tag_offset),
                });
            }
            Ok(AsnValue::Set(items))
        }
        tag if tag.is_context_specific() && tag.is_constructed() => {
            let mut inner = reader.slice(len)?;
            let child = read_value(&mut inner, depth + 1)?;
            if inner.remaining() > 0 {
                return Err(Asn1BerError::TrailingBytes {
                    offset: inner.offset(),
                    count: inner.remaining(),
                });
            }
            Ok(AsnValue::ContextTag(ContextTagValue {
                number: tag.number(),
                content: ContextContent::Value(Box::new(child)),
            }))
        }
        tag if tag.is_context_specific() => {
            let content = reader.read_exact(len)?;
            Ok(AsnValue::ContextTag(ContextTagValue {
                number: tag.number(),
                content: ContextContent::Raw(content.to_vec()),
            }))
        }
        tag if !is_supported_primitive(tag) => Err(Asn1BerError::UnknownTag {
            tag: tag.octet(),
            offset: tag_offset,
        }),
        _ => {
            let content_offset = reader.offset();
            let content = reader.read_exact(len)?;
            read_primitive(tag, content, tag_offset, content_offset)
        }
    }
}

fn read_children(reader: &mut Reader<'_>, depth: usize) -> Result<Vec<AsnValue>> {
    let mut items = Vec::new();
    while reader.remaining() > 0 {
        items.push(read_value(reader, depth + 1)?);
    }
    Ok(items)
}

fn read_primitive(
    tag: Tag,
    content: &[u8],
    tag_offset: usize,
    content_offset: usize,
) -> Result<AsnValue> {
    match tag {
        Tag::BOOLEAN => {
            // Exactly one content octet; any non-zero value reads as true.
            if content.len() != 1 {
                return Err(Asn1BerError::TruncatedInput {
                    offset: content_offset,
                });
            }
            Ok(AsnValue::Bool(content[0] != 0))
        }
        Tag::INTEGER => Ok(AsnValue::Integer(bigint::buffer_to_big_int(content))),
        Tag::BIT_STRING => match content.split_first() {
            Some((&unused_bits, bytes)) => Ok(AsnValue::BitString(BitStringValue {
                unused_bits,
                bytes: bytes.to_vec(),
            })),
            None => Err(Asn1BerError::TruncatedInput {
                offset: content_offset,
            }),
        },
        Tag::OCTET_STRING => Ok(AsnValue::OctetString(content.to_vec())),
        Tag::NULL => {
            if !content.is_empty() {
                return Err(Asn1BerError::TruncatedInput {
                    offset: content_offset,
                });
            }
            Ok(AsnValue::Null)
        }
        Tag::OID => oids::decode_arcs(content)
            .map(AsnValue::Oid)
            .map_err(|err| Asn1BerError::OidMalformed {
                reason: err.0,
                offset: Some(content_offset),
            }),
        Tag::UTF8_STRING => Ok(AsnValue::Utf8String(utf8(
            content,
            "UTF8String",
            content_offset,
        )?)),
        Tag::PRINTABLE_STRING => {
            let text = utf8(content, "PrintableString", content_offset)?;
            if !restricted::is_printable(&text) {
                return Err(charset("PrintableString", content_offset));
            }
            Ok(AsnValue::PrintableString(text))
        }
        Tag::IA5_STRING => {
            let text = utf8(content, "IA5String", content_offset)?;
            if !restricted::is_ia5(&text) {
                return Err(charset("IA5String", content_offset));
            }
            Ok(AsnValue::Ia5String(text))
        }
        // Repertoires that are read for interoperability but never written
        // back under their own tag.
        Tag::GRAPHIC_STRING | Tag::GENERAL_STRING | Tag::CHARACTER_STRING => Ok(
            AsnValue::Utf8String(utf8(content, repertoire_name(tag), content_offset)?),
        ),
        Tag::BMP_STRING => {
            if content.len() % 2 != 0 {
                return Err(charset("BMPString", content_offset));
            }
            let units: Vec<u16> = content
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16(&units)
                .map(AsnValue::Utf8String)
                .map_err(|_| charset("BMPString", content_offset))
        }
        Tag::UTC_TIME => {
            let text = utf8(content, "UTCTime", content_offset)?;
            date::parse_utc_time(&text)
                .map(AsnValue::UtcTime)
                .ok_or(Asn1BerError::DateOutOfRange {
                    detail: "invalid UTCTime",
                    offset: Some(content_offset),
                })
        }
        Tag::GENERALIZED_TIME => {
            let text = utf8(content, "GeneralizedTime", content_offset)?;
            date::parse_generalized_time(&text)
                .map(AsnValue::GeneralizedTime)
                .ok_or(Asn1BerError::DateOutOfRange {
                    detail: "invalid GeneralizedTime",
                    offset: Some(content_offset),
                })
        }
        _ => Err(Asn1BerError::UnknownTag {
            tag: tag.octet(),
            offset: tag_offset,
        }),
    }
}

fn utf8(content: &[u8], charset_name: &'static str, offset: usize) -> Result<String> {
    String::from_utf8(content.to_vec()).map_err(|_| charset(charset_name, offset))
}

fn charset(charset: &'static str, offset: usize) -> Asn1BerError {
    Asn1BerError::StringCharsetViolation {
        charset,
        offset: Some(offset),
    }
}

fn is_supported_primitive(tag: Tag) -> bool {
    matches!(
        tag,
        Tag::BOOLEAN
            | Tag::INTEGER
            | Tag::BIT_STRING
            | Tag::OCTET_STRING
            | Tag::NULL
            | Tag::OID
            | Tag::UTF8_STRING
            | Tag::PRINTABLE_STRING
            | Tag::IA5_STRING
            | Tag::GRAPHIC_STRING
            | Tag::GENERAL_STRING
            | Tag::CHARACTER_STRING
            | Tag::BMP_STRING
            | Tag::UTC_TIME
            | Tag::GENERALIZED_TIME
    )
}

fn repertoire_name(tag: Tag) -> &'static str {
    match tag {
        Tag::GRAPHIC_STRING => "GraphicString",
        Tag::CHARACTER_STRING => "CharacterString",
        _ => "GeneralString",
    }
}

/// KeetaNet only uses SET for X.501-style attributes: a single SEQUENCE
/// holding an OID and a string.
fn is_name_value_set(items: &[AsnValue]) -> bool {
    match items {
        [AsnValue::Sequence(pair)] => matches!(
            pair.as_slice(),
            [
                AsnValue::Oid(_),
                AsnValue::Utf8String(_) | AsnValue::PrintableString(_) | AsnValue::Ia5String(_)
            ]
        ),
        _ => false,
    }
}
