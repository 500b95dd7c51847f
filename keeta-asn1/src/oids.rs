//! Object identifiers: the KeetaNet symbolic-name table and the dotted-form
//! codec.
//!
//! The table is fixed at compile time and consulted in both directions:
//! encoding resolves symbolic names to dotted form, decoding reports the
//! symbolic name whenever the decoded dotted form is known.

use thiserror::Error;

/// Violation of the object identifier grammar or its wire encoding.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct OidError(pub &'static str);

macro_rules! define_oids {
    ( $( $uppercase:ident => $name:literal => $dotted:literal, )+ ) => {
        $( pub const $uppercase: &str = $dotted; )+

        /// Resolve a symbolic name to its dotted form.
        pub fn name_to_oid(name: &str) -> Option<&'static str> {
            match name {
                $( $name => Some($dotted), )+
                _ => None,
            }
        }

        /// Resolve a dotted form back to its symbolic name.
        pub fn oid_to_name(dotted: &str) -> Option<&'static str> {
            match dotted {
                $( $dotted => Some($name), )+
                _ => None,
            }
        }
    };
}

define_oids! {
    SHA256 => "sha256" => "2.16.840.1.101.3.4.2.1",
    SHA3_256 => "sha3-256" => "2.16.840.1.101.3.4.2.8",
    SHA3_256_WITH_ECDSA => "sha3-256WithEcDSA" => "2.16.840.1.101.3.4.3.10",
    SHA256_WITH_ECDSA => "sha256WithEcDSA" => "1.2.840.10045.4.3.2",
    ECDSA => "ecdsa" => "1.2.840.10045.2.1",
    ED25519 => "ed25519" => "1.3.101.112",
    SECP256K1 => "secp256k1" => "1.3.132.0.10",
    ACCOUNT => "account" => "2.23.42.2.7.11",
    SERIAL_NUMBER => "serialNumber" => "2.5.4.5",
    MEMBER => "member" => "2.5.4.31",
    COMMON_NAME => "commonName" => "2.5.4.3",
    HASH => "hash" => "1.3.6.1.4.1.8301.3.2.2.1.1",
    HASH_DATA => "hashData" => "2.16.840.1.101.3.3.1.3",
}

/// Parse a dotted string into its arcs, validating the leading-arc rules:
/// the first arc is 0, 1 or 2 and the second is below 40 unless the first
/// is 2.
pub fn parse_arcs(dotted: &str) -> Result<Vec<u64>, OidError> {
    let arcs = dotted
        .split('.')
        .map(|part| part.parse::<u64>())
        .collect::<Result<Vec<u64>, _>>()
        .map_err(|_| OidError("arc is not a non-negative number"))?;
    validate_arcs(&arcs)?;
    Ok(arcs)
}

/// Render arcs back to the dotted form.
pub fn arcs_to_string(arcs: &[u64]) -> String {
    arcs.iter()
        .map(|arc| arc.to_string())
        .collect::<Vec<String>>()
        .join(".")
}

/// Encode arcs as base-128 subidentifiers; the first two arcs combine into
/// one subidentifier valued `40 * arc1 + arc2`.
pub fn encode_arcs(arcs: &[u64]) -> Result<Vec<u8>, OidError> {
    validate_arcs(arcs)?;

    let first = arcs[0]
        .checked_mul(40)
        .and_then(|v| v.checked_add(arcs[1]))
        .ok_or(OidError("subidentifier overflow"))?;

    let mut out = Vec::with_capacity(arcs.len() + 1);
    push_base128(&mut out, first);
    for &arc in &arcs[2..] {
        push_base128(&mut out, arc);
    }
    Ok(out)
}

/// Decode base-128 subidentifiers back into arcs.
pub fn decode_arcs(bytes: &[u8]) -> Result<Vec<u64>, OidError> {
    if bytes.is_empty() {
        return Err(OidError("empty encoding"));
    }

    let mut arcs = Vec::new();
    let mut value: u64 = 0;
    let mut in_group = false;
    for &byte in bytes {
        if value > u64::MAX >> 7 {
            return Err(OidError("subidentifier overflow"));
        }
        value = (value << 7) | u64::from(byte & 0x7F);
        in_group = byte & 0x80 != 0;
        if !in_group {
            if arcs.is_empty() {
                // First subidentifier folds the two leading arcs together.
                let first = if value < 40 {
                    0
                } else if value < 80 {
                    1
                } else {
                    2
                };
                arcs.push(first);
                arcs.push(value - 40 * first);
            } else {
                arcs.push(value);
            }
            value = 0;
        }
    }
    if in_group {
        return Err(OidError("truncated subidentifier"));
    }
    Ok(arcs)
}

fn validate_arcs(arcs: &[u64]) -> Result<(), OidError> {
    if arcs.len() < 2 {
        return Err(OidError("fewer than two arcs"));
    }
    if arcs[0] > 2 {
        return Err(OidError("first arc must be 0, 1 or 2"));
    }
    if arcs[0] < 2 && arcs[1] >= 40 {
        return Err(OidError("second arc must be below 40"));
    }
    Ok(())
}

fn push_base128(out: &mut Vec<u8>, value: u64) {
    let mut groups = [0u8; 10];
    let mut count = 0;
    let mut rest = value;
    loop {
        groups[count] = (rest & 0x7F) as u8;
        count += 1;
        rest >>= 7;
        if rest == 0 {
            break;
        }
    }
    for index in (0..count).rev() {
        let continuation = if index == 0 { 0x00 } else { 0x80 };
        out.push(groups[index] | continuation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_is_bidirectional() {
        assert_eq!(name_to_oid("sha256"), Some("2.16.840.1.101.3.4.2.1"));
        assert_eq!(oid_to_name("2.16.840.1.101.3.4.2.1"), Some("sha256"));
        assert_eq!(name_to_oid("commonName"), Some(COMMON_NAME));
        assert_eq!(oid_to_name("2.5.4.3"), Some("commonName"));
        assert_eq!(name_to_oid("md5"), None);
        assert_eq!(oid_to_name("1.2.3.4"), None);
    }

    #[test]
    fn sha256_wire_form() {
        let arcs = parse_arcs(SHA256).unwrap();
        assert_eq!(arcs, vec![2, 16, 840, 1, 101, 3, 4, 2, 1]);
        assert_eq!(
            encode_arcs(&arcs).unwrap(),
            hex::decode("608648016503040201").unwrap()
        );
        assert_eq!(
            decode_arcs(&hex::decode("608648016503040201").unwrap()).unwrap(),
            arcs
        );
    }

    #[test]
    fn multi_byte_subidentifiers() {
        // 2.999.3: the combined first subidentifier is 1079 and spans two
        // octets.
        let arcs = vec![2, 999, 3];
        let encoded = encode_arcs(&arcs).unwrap();
        assert_eq!(encoded, vec![0x88, 0x37, 0x03]);
        assert_eq!(decode_arcs(&encoded).unwrap(), arcs);
    }

    #[test]
    fn leading_arc_rules() {
        assert!(parse_arcs("3.1").is_err());
        assert!(parse_arcs("1.40").is_err());
        assert!(parse_arcs("2.40.1").is_ok());
        assert!(parse_arcs("1").is_err());
        assert!(parse_arcs("1.2.x").is_err());
        assert!(parse_arcs("1.2.-3").is_err());
    }

    #[test]
    fn truncated_group_is_rejected() {
        assert_eq!(
            decode_arcs(&[0x88]),
            Err(OidError("truncated subidentifier"))
        );
        assert_eq!(decode_arcs(&[]), Err(OidError("empty encoding")));
    }

    #[test]
    fn dotted_round_trip() {
        for dotted in ["1.3.101.112", "2.23.42.2.7.11", "1.3.6.1.4.1.8301.3.2.2.1.1"] {
            let arcs = parse_arcs(dotted).unwrap();
            assert_eq!(arcs_to_string(&arcs), dotted);
            assert_eq!(decode_arcs(&encode_arcs(&arcs).unwrap()).unwrap(), arcs);
        }
    }
}
