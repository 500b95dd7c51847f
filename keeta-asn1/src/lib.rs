//! ASN.1 value model shared by the KeetaNet BER codec.
//!
//! This crate holds everything the wire codec dispatches on without doing any
//! wire I/O itself: the [`AsnValue`] sum type, the single-octet [`Tag`]
//! newtype, the signed big-integer byte helpers, the symbolic object
//! identifier table with its base-128 subidentifier codec, the UTCTime and
//! GeneralizedTime string forms, and the restricted-string character sets.

pub mod bigint;
pub mod date;
pub mod oids;
pub mod restricted;
pub mod tag;
mod value;

pub use tag::Tag;
pub use value::{AsnValue, BitStringValue, ContextContent, ContextKind, ContextTagValue};
