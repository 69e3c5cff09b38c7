//! OpenPGP packet data types and associated machinery.
//!
//! This crate provides a strongly typed representation of the OpenPGP
//! packets used to store transferable keys, as defined by [RFC 4880]
//! with the ECC extensions of [RFC 6637] and the EdDSA extension for
//! Ed25519.  It converts between the binary wire format and typed
//! values for keys, user ids, and signatures, and it can produce new
//! self-signatures (user id certifications and key bindings) over the
//! transcript defined in [Section 5.2.4 of RFC 4880].
//!
//! A few features that the OpenPGP community considers to be
//! deprecated (e.g., version 3 packets) have been left out, as have
//! the encryption containers and literal data packets: this crate is
//! concerned with key material, not messages.  Signature
//! *verification* is limited to recomputing binding digests; checking
//! them against the signature MPIs is left to the caller's
//! cryptographic backend.
//!
//! Unknown packets, algorithms, and subpackets are not errors when
//! reading: they are preserved as explicit `Unknown` states so that
//! data produced by newer implementations can be inspected.  Such
//! values merely refuse to be re-encoded.
//!
//! [RFC 4880]: https://tools.ietf.org/html/rfc4880
//! [RFC 6637]: https://tools.ietf.org/html/rfc6637
//! [Section 5.2.4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.4

#![warn(missing_docs)]

pub mod wire;
pub mod types;
pub mod crypto;
pub mod packet;
pub use packet::{Key, Signature, UserID, Unknown, key};

pub mod parse;
pub mod serialize;

use crate::types::{
    HashAlgorithm,
    PublicKeyAlgorithm,
};

/// Crate result specialization.
pub type Result<T> = ::std::result::Result<T, anyhow::Error>;

#[derive(thiserror::Error, Debug, Clone)]
/// Errors returned by this crate.
///
/// Note: This enum cannot be exhaustively matched to allow future
/// extensions.
#[non_exhaustive]
pub enum Error {
    /// A read or write would cross the bounds of the underlying
    /// buffer.
    #[error("Out of range: {0}")]
    OutOfRange(String),

    /// A value violates a declared invariant, e.g. an
    /// expected-constant mismatch or a bit operation that would cross
    /// a byte boundary.
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// A malformed packet.
    #[error("Malformed packet: {0}")]
    MalformedPacket(String),

    /// Malformed MPI.
    #[error("Malformed MPI: {0}")]
    MalformedMPI(String),

    /// The requested operation cannot be performed, e.g. encoding an
    /// unknown packet or generating a DSA signature.
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Unsupported hash algorithm identifier.
    #[error("Unsupported hash algorithm: {0}")]
    UnsupportedHashAlgorithm(HashAlgorithm),

    /// Unsupported public key algorithm identifier.
    #[error("Unsupported public key algorithm: {0}")]
    UnsupportedPublicKeyAlgorithm(PublicKeyAlgorithm),

    /// An internal invariant was violated, e.g. a signing primitive
    /// returned a signature of unexpected length.
    ///
    /// This is surfaced distinctly so that it is not mistaken for a
    /// data error.
    #[error("Internal inconsistency: {0}")]
    InternalInconsistency(String),
}

/// The OpenPGP packets this crate understands.
///
/// The different OpenPGP packets are detailed in [Section 5 of RFC 4880].
///
/// The `Unknown` packet allows dealing with packets that are not
/// understood.  It is a binary blob that includes the packet's tag.
///
///   [Section 5 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5
#[derive(Debug)]
#[derive(PartialEq, Eq, Hash, Clone)]
#[non_exhaustive]
pub enum Packet {
    /// Unknown packet.
    Unknown(packet::Unknown),
    /// Signature packet.
    Signature(packet::Signature),
    /// Public key packet.
    PublicKey(key::PublicKey),
    /// Public subkey packet.
    PublicSubkey(key::PublicSubkey),
    /// Public/Secret key pair.
    SecretKey(key::SecretKey),
    /// Public/Secret subkey pair.
    SecretSubkey(key::SecretSubkey),
    /// User ID packet.
    UserID(packet::UserID),
}

impl Packet {
    /// Returns the `Packet's` corresponding OpenPGP tag.
    ///
    /// Tags are explained in [Section 4.3 of RFC 4880].
    ///
    ///   [Section 4.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.3
    pub fn tag(&self) -> packet::Tag {
        use crate::packet::Tag;
        match self {
            Packet::Unknown(packet) => packet.tag(),
            Packet::Signature(_) => Tag::Signature,
            Packet::PublicKey(_) => Tag::PublicKey,
            Packet::PublicSubkey(_) => Tag::PublicSubkey,
            Packet::SecretKey(_) => Tag::SecretKey,
            Packet::SecretSubkey(_) => Tag::SecretSubkey,
            Packet::UserID(_) => Tag::UserID,
        }
    }

    /// Returns the parsed `Packet's` corresponding OpenPGP tag.
    ///
    /// Returns the packet's tag, but only if it was successfully
    /// parsed into the corresponding packet type.  If e.g. a key
    /// packet uses an unsupported version, it is parsed into a
    /// `Packet::Unknown`.  `tag()` returns the wire tag, whereas
    /// `kind()` returns `None`.
    pub fn kind(&self) -> Option<packet::Tag> {
        use crate::packet::Tag;
        match self {
            Packet::Unknown(_) => None,
            Packet::Signature(_) => Some(Tag::Signature),
            Packet::PublicKey(_) => Some(Tag::PublicKey),
            Packet::PublicSubkey(_) => Some(Tag::PublicSubkey),
            Packet::SecretKey(_) => Some(Tag::SecretKey),
            Packet::SecretSubkey(_) => Some(Tag::SecretSubkey),
            Packet::UserID(_) => Some(Tag::UserID),
        }
    }
}

/// Holds a fingerprint.
///
/// A fingerprint uniquely identifies a public key.  For more details
/// about how a fingerprint is generated, see [Section 12.2 of RFC
/// 4880].
///
///   [Section 12.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-12.2
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub enum Fingerprint {
    /// 20 byte SHA-1 hash.
    V4([u8; 20]),
    /// Used for holding fingerprints that we don't understand.  For
    /// instance, an issuer-fingerprint subpacket may contain the
    /// wrong number of bytes.
    Invalid(Box<[u8]>),
}

impl Fingerprint {
    /// Reads a fingerprint from a byte slice.
    pub fn from_bytes(raw: &[u8]) -> Fingerprint {
        if raw.len() == 20 {
            let mut fp: [u8; 20] = Default::default();
            fp.copy_from_slice(raw);
            Fingerprint::V4(fp)
        } else {
            Fingerprint::Invalid(raw.to_vec().into_boxed_slice())
        }
    }

    /// Returns the raw fingerprint bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Fingerprint::V4(fp) => fp,
            Fingerprint::Invalid(raw) => raw,
        }
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for b in self.as_bytes() {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("Fingerprint").field(&self.to_string()).finish()
    }
}

/// Holds a KeyID.
///
/// A KeyID is a fingerprint fragment.  It identifies a public key,
/// but is easy to forge.  For more details about how a KeyID is
/// generated, see [Section 12.2 of RFC 4880].
///
///   [Section 12.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-12.2
#[derive(PartialEq, Eq, PartialOrd, Ord, Clone, Hash)]
pub enum KeyID {
    /// Lower 8 bytes of a v4 fingerprint.
    V4([u8; 8]),
    /// Used for holding key ids that we don't understand.  For
    /// instance, an issuer subpacket may contain the wrong number of
    /// bytes.
    Invalid(Box<[u8]>),
}

impl KeyID {
    /// Reads a key id from a byte slice.
    pub fn from_bytes(raw: &[u8]) -> KeyID {
        if raw.len() == 8 {
            let mut keyid: [u8; 8] = Default::default();
            keyid.copy_from_slice(raw);
            KeyID::V4(keyid)
        } else {
            KeyID::Invalid(raw.to_vec().into_boxed_slice())
        }
    }

    /// Returns the raw key id bytes.
    pub fn as_bytes(&self) -> &[u8] {
        match self {
            KeyID::V4(keyid) => keyid,
            KeyID::Invalid(raw) => raw,
        }
    }
}

impl From<&Fingerprint> for KeyID {
    fn from(fp: &Fingerprint) -> Self {
        match fp {
            Fingerprint::V4(fp) =>
                KeyID::from_bytes(&fp[12..]),
            Fingerprint::Invalid(raw) =>
                KeyID::Invalid(raw.clone()),
        }
    }
}

impl From<Fingerprint> for KeyID {
    fn from(fp: Fingerprint) -> Self {
        KeyID::from(&fp)
    }
}

impl std::fmt::Display for KeyID {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        for b in self.as_bytes() {
            write!(f, "{:02X}", b)?;
        }
        Ok(())
    }
}

impl std::fmt::Debug for KeyID {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        f.debug_tuple("KeyID").field(&self.to_string()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyid_from_fingerprint() {
        let fp = Fingerprint::V4([
            0x55, 0x3c, 0x3a, 0x86, 0xc9, 0x5b, 0x62, 0xcc, 0x01, 0x6e,
            0x7a, 0x35, 0x3e, 0xb9, 0x45, 0xeb, 0x87, 0x7e, 0xbe, 0x0d,
        ]);
        assert_eq!(KeyID::from(&fp),
                   KeyID::V4([0x3e, 0xb9, 0x45, 0xeb, 0x87, 0x7e, 0xbe, 0x0d]));
        assert_eq!(fp.to_string(),
                   "553C3A86C95B62CC016E7A353EB945EB877EBE0D");
    }

    #[test]
    fn fingerprint_of_unexpected_length() {
        let fp = Fingerprint::from_bytes(&[1, 2, 3]);
        assert!(matches!(fp, Fingerprint::Invalid(_)));
        assert!(matches!(KeyID::from(fp), KeyID::Invalid(_)));
    }
}
