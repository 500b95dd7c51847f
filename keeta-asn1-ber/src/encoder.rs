//! Encoder façade over a host value.

use crate::data::AsnData;
use crate::{encode_with_options, Asn1BerError, EncodeOptions, Result};

/// Wraps a host value and renders it on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct AsnEncoder {
    data: AsnData,
    options: EncodeOptions,
}

impl AsnEncoder {
    pub fn new(data: AsnData) -> Self {
        Self {
            data,
            options: EncodeOptions::default(),
        }
    }

    pub fn with_options(data: AsnData, options: EncodeOptions) -> Self {
        Self { data, options }
    }

    /// The BER octets of the wrapped value. A top-level value elided under
    /// `allow_undefined` has no octets and fails with
    /// [`Asn1BerError::UndefinedRejected`]; use
    /// [`encode_with_options`](crate::encode_with_options) to observe the
    /// elision itself.
    pub fn to_ber(&self) -> Result<Vec<u8>> {
        match encode_with_options(&self.data, &self.options)? {
            Some(bytes) => Ok(bytes),
            None => Err(Asn1BerError::UndefinedRejected {
                path: ".".to_owned(),
            }),
        }
    }

    /// Base64 of [`AsnEncoder::to_ber`].
    pub fn to_base64(&self) -> Result<String> {
        Ok(base64::encode(self.to_ber()?))
    }
}

impl From<AsnData> for AsnEncoder {
    fn from(data: AsnData) -> Self {
        Self::new(data)
    }
}
