//! Cryptographic primitives.
//!
//! This module contains cryptographic primitives as defined by
//! [Section 9 of RFC 4880]: the memory discipline for secret key
//! material, hash contexts and the framing rules for feeding packets
//! into them, the multiprecision integers that make up key and
//! signature material, and the signature generation pipeline.
//!
//! [Section 9 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-9

pub mod hash;
pub mod mem;
pub mod mpi;
mod sign;
pub use sign::Signer;
