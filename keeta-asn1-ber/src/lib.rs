//! BER codec between host values and the KeetaNet ASN.1 wire format.
//!
//! Application code describes ASN.1 structures as ordinary host values
//! ([`AsnData`]) and gets byte-exact BER back, and vice versa:
//!
//! ```
//! use keeta_asn1_ber::{decode, encode, AsnData};
//!
//! let bytes = encode(&AsnData::Integer(42)).unwrap();
//! assert_eq!(bytes, [0x02, 0x01, 0x2A]);
//! assert_eq!(decode(&bytes).unwrap(), AsnData::Integer(42));
//! ```
//!
//! Values with several legal encodings are put on the wire in canonical
//! form: a plain string takes the narrowest legal string tag, a plain date
//! becomes UTCTime when it fits and GeneralizedTime otherwise. The tagged
//! objects ([`AsnOid`], [`AsnSet`], [`AsnBitString`], [`AsnContextTag`],
//! [`AsnString`], [`AsnDate`]) bypass that inference where callers need an
//! exact shape.
//!
//! Only the definite-length form is ever produced or accepted.

#[macro_use]
mod debug_log;

mod data;
mod de;
mod decoder;
mod encoder;
mod misc;
mod ser;

pub use data::{
    AsnBitString, AsnContextTag, AsnData, AsnDate, AsnObject, AsnOid, AsnSet, AsnString, DateKind,
    StringKind, TypedObject,
};
pub use de::from_bytes;
pub use decoder::AsnDecoder;
pub use encoder::AsnEncoder;
pub use ser::to_vec;

use thiserror::Error;

/// Maximum nesting depth accepted by the encoder and decoder, bounding
/// stack growth on hostile input.
pub const MAX_DEPTH: usize = 256;

pub type Result<T> = std::result::Result<T, Asn1BerError>;

/// Errors shared by the encoder, the decoder and the host-value adapter.
///
/// Decoding errors carry the byte offset at which the problem was detected;
/// adapter errors carry the path of tagged-object keys when one exists.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Asn1BerError {
    #[error("unexpected end of input at offset {offset}")]
    TruncatedInput { offset: usize },

    #[error("length is indefinite or out of range at offset {offset}")]
    LengthOverflow { offset: usize },

    #[error("{count} trailing byte(s) after the object ending at offset {offset}")]
    TrailingBytes { offset: usize, count: usize },

    #[error("unknown tag 0x{tag:02x} at offset {offset}")]
    UnknownTag { tag: u8, offset: usize },

    #[error("integer does not fit the requested width")]
    IntegerOverflow,

    #[error("malformed object identifier: {reason}")]
    OidMalformed {
        reason: &'static str,
        offset: Option<usize>,
    },

    #[error("unknown object identifier name `{name}`")]
    OidUnknownName { name: String },

    #[error("character outside of the {charset} repertoire")]
    StringCharsetViolation {
        charset: &'static str,
        offset: Option<usize>,
    },

    #[error("date not representable: {detail}")]
    DateOutOfRange {
        detail: &'static str,
        offset: Option<usize>,
    },

    #[error("SET content is not a single OID/string attribute pair")]
    SetShapeUnsupported { offset: Option<usize> },

    #[error("expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("undefined value at `{path}`")]
    UndefinedRejected { path: String },

    #[error("unknown tagged object type `{name}`")]
    UnknownTaggedType { name: String },

    #[error("object nesting deeper than the supported maximum")]
    DepthExceeded,

    #[error("unsupported host value at `{path}`")]
    UnsupportedHostType { path: String },

    #[error("couldn't decode base64: {0}")]
    Base64Decoding(#[from] base64::DecodeError),

    #[error("couldn't decode hex: {0}")]
    HexDecoding(#[from] hex::FromHexError),
}

/// Policy knobs for the host-value adapter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EncodeOptions {
    /// Accept the undefined sentinel: arrays elide undefined elements and an
    /// undefined top-level value produces no output at all. Off by default;
    /// undefined then fails with [`Asn1BerError::UndefinedRejected`].
    pub allow_undefined: bool,
}

/// Encode a host value to BER with the default options.
pub fn encode(data: &AsnData) -> Result<Vec<u8>> {
    match encode_with_options(data, &EncodeOptions::default())? {
        Some(bytes) => Ok(bytes),
        // Not reachable with the default options.
        None => Err(Asn1BerError::UndefinedRejected { path: ".".to_owned() }),
    }
}

/// Encode a host value to BER. `None` means the whole value was elided
/// under [`EncodeOptions::allow_undefined`].
pub fn encode_with_options(data: &AsnData, options: &EncodeOptions) -> Result<Option<Vec<u8>>> {
    match data::adapt(data, options)? {
        Some(value) => Ok(Some(ser::to_vec(&value)?)),
        None => Ok(None),
    }
}

/// Decode one BER object into a host value; trailing bytes are an error.
pub fn decode(bytes: &[u8]) -> Result<AsnData> {
    data::adapt_back(&de::from_bytes(bytes)?)
}

/// Decode base64 text into a host value.
pub fn decode_base64(text: &str) -> Result<AsnData> {
    decode(&base64::decode(text)?)
}

/// Base64 of raw bytes, the inverse of [`decode_base64`]'s outer layer.
pub fn to_base64(bytes: &[u8]) -> String {
    base64::encode(bytes)
}
