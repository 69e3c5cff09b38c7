use std::fmt;

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

/// The OpenPGP packet tags as defined in [Section 4.3 of RFC 4880].
///
///   [Section 4.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.3
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum Tag {
    /// Signature Packet.
    Signature,
    /// Secret-Key Packet.
    SecretKey,
    /// Public-Key Packet.
    PublicKey,
    /// Secret-Subkey Packet.
    SecretSubkey,
    /// User ID Packet.
    UserID,
    /// Public-Subkey Packet.
    PublicSubkey,
    /// Unassigned packets (as of RFC 4880), or packets this crate
    /// does not model.
    Unknown(u8),
}

impl Tag {
    /// Whether a packet with this tag can use the old packet format.
    ///
    /// The old format stores the tag in four bits, so only tags
    /// below 16 fit.
    pub fn old_format_compatible(&self) -> bool {
        u8::from(*self) < 16
    }
}

impl From<u8> for Tag {
    fn from(u: u8) -> Self {
        match u {
            2 => Tag::Signature,
            5 => Tag::SecretKey,
            6 => Tag::PublicKey,
            7 => Tag::SecretSubkey,
            13 => Tag::UserID,
            14 => Tag::PublicSubkey,
            u => Tag::Unknown(u),
        }
    }
}

impl From<Tag> for u8 {
    fn from(t: Tag) -> u8 {
        match t {
            Tag::Signature => 2,
            Tag::SecretKey => 5,
            Tag::PublicKey => 6,
            Tag::SecretSubkey => 7,
            Tag::UserID => 13,
            Tag::PublicSubkey => 14,
            Tag::Unknown(u) => u,
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Tag::Signature => f.write_str("Signature Packet"),
            Tag::SecretKey => f.write_str("Secret-Key Packet"),
            Tag::PublicKey => f.write_str("Public-Key Packet"),
            Tag::SecretSubkey => f.write_str("Secret-Subkey Packet"),
            Tag::UserID => f.write_str("User ID Packet"),
            Tag::PublicSubkey => f.write_str("Public-Subkey Packet"),
            Tag::Unknown(u) =>
                f.write_fmt(format_args!("Unknown Packet (tag {})", u)),
        }
    }
}

#[cfg(test)]
impl Arbitrary for Tag {
    fn arbitrary(g: &mut Gen) -> Self {
        u8::arbitrary(g).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    quickcheck::quickcheck! {
        fn roundtrip(tag: Tag) -> bool {
            tag == Tag::from(u8::from(tag))
        }
    }

    #[test]
    fn old_format_compatibility() {
        assert!(Tag::Signature.old_format_compatible());
        assert!(Tag::UserID.old_format_compatible());
        assert!(Tag::PublicSubkey.old_format_compatible());
        assert!(Tag::Unknown(15).old_format_compatible());
        assert!(!Tag::Unknown(16).old_format_compatible());
        assert!(!Tag::Unknown(63).old_format_compatible());
    }
}
