//! Signed big-integer byte helpers.
//!
//! INTEGER content octets are the minimal two's-complement big-endian form:
//! no leading `0x00` unless required to keep the value positive, no leading
//! `0xFF` unless required to keep it negative. The pair below is used by the
//! INTEGER codec and is also part of the public surface, since callers
//! exchange raw integer buffers with other KeetaNet components.

use num_bigint_dig::{BigInt, ParseBigIntError, Sign};
use num_traits::{One, Zero};
use std::str::FromStr;

/// Encode a signed integer as its minimal two's-complement big-endian bytes.
///
/// Zero encodes as a single `0x00` octet.
pub fn big_int_to_buffer(value: &BigInt) -> Vec<u8> {
    match value.sign() {
        Sign::NoSign => vec![0x00],
        Sign::Plus => {
            let (_, mut bytes) = value.to_bytes_be();
            if bytes[0] & 0x80 != 0 {
                bytes.insert(0, 0x00);
            }
            bytes
        }
        Sign::Minus => {
            let (_, magnitude) = value.to_bytes_be();
            // A magnitude of exactly 0x80 00 .. 00 already fits the width;
            // anything larger needs one extra octet before complementing.
            let needs_widening = magnitude[0] > 0x80
                || (magnitude[0] == 0x80 && magnitude[1..].iter().any(|&b| b != 0));
            let mut bytes = magnitude;
            if needs_widening {
                bytes.insert(0, 0x00);
            }
            twos_complement(&mut bytes);
            bytes
        }
    }
}

/// Decode two's-complement big-endian bytes back into a signed integer.
///
/// The inverse of [`big_int_to_buffer`]; an empty buffer decodes to zero.
pub fn buffer_to_big_int(bytes: &[u8]) -> BigInt {
    if bytes.is_empty() {
        return BigInt::zero();
    }

    let unsigned = BigInt::from_bytes_be(Sign::Plus, bytes);
    if bytes[0] & 0x80 != 0 {
        unsigned - (BigInt::one() << (8 * bytes.len()))
    } else {
        unsigned
    }
}

/// Widen a host integer losslessly.
pub fn integer_to_big_int(value: i64) -> BigInt {
    BigInt::from(value)
}

/// Parse a base-10 string.
pub fn string_to_big_int(value: &str) -> Result<BigInt, ParseBigIntError> {
    BigInt::from_str(value)
}

fn twos_complement(bytes: &mut [u8]) {
    let mut carry = true;
    for byte in bytes.iter_mut().rev() {
        *byte = !*byte;
        if carry {
            let (sum, overflow) = byte.overflowing_add(1);
            *byte = sum;
            carry = overflow;
        }
    }
}
