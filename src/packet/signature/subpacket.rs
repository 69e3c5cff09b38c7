//! Signature subpackets.
//!
//! OpenPGP signature packets include a set of key-value attributes
//! called subpackets.  These subpackets are used to indicate when a
//! signature was created, who created the signature, user &
//! implementation preferences, etc.  The full details are in
//! [Section 5.2.3.1 of RFC 4880].
//!
//! [Section 5.2.3.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.3.1
//!
//! A v4 signature carries two subpacket areas: the hashed area is
//! covered by the signature's digest, the unhashed area is not.
//! Both are a two-octet length followed by a concatenation of
//! subpackets, each of which is a variable-length size, a type
//! octet, and a body.
//!
//! Subpacket areas preserve the order in which subpackets appear on
//! the wire, and equality is order-sensitive: the hashed area is
//! signed as an opaque byte string, so two areas with the same
//! subpackets in a different order are different signatures.

use std::fmt;

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

use crate::Fingerprint;
use crate::KeyID;
use crate::packet::Signature;
use crate::types::{
    CompressionAlgorithm,
    HashAlgorithm,
    KeyFlags,
    SymmetricAlgorithm,
};

/// The subpacket types recognized by this crate, as specified in
/// [Section 5.2.3.1 of RFC 4880].
///
/// [Section 5.2.3.1 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.3.1
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[non_exhaustive]
pub enum SubpacketTag {
    /// The time the signature was made.
    SignatureCreationTime,
    /// The validity period of the signature.
    SignatureExpirationTime,
    /// Whether a certification signature is "exportable", for use by
    /// other users than the signature's issuer.
    ExportableCertification,
    /// Signature's revocability status.
    Revocable,
    /// The validity period of the key.
    KeyExpirationTime,
    /// Symmetric algorithm numbers that indicate which algorithms
    /// the key holder prefers to use.
    PreferredSymmetricAlgorithms,
    /// The OpenPGP Key ID of the key issuing the signature.
    Issuer,
    /// Message digest algorithm numbers that indicate which
    /// algorithms the key holder prefers to receive.
    PreferredHashAlgorithms,
    /// Compression algorithm numbers that indicate which algorithms
    /// the key holder prefers to use.
    PreferredCompressionAlgorithms,
    /// A flag in a User ID's self-signature that states whether this
    /// User ID is the main User ID for this key.
    PrimaryUserID,
    /// A list of binary flags that hold information about a key.
    KeyFlags,
    /// A complete Signature packet body, used to bind a signing
    /// subkey to a primary key.
    EmbeddedSignature,
    /// The fingerprint of the key issuing the signature.
    IssuerFingerprint,
    /// Unknown subpacket tag.
    Unknown(u8),
}

impl From<u8> for SubpacketTag {
    fn from(u: u8) -> Self {
        match u {
            2 => SubpacketTag::SignatureCreationTime,
            3 => SubpacketTag::SignatureExpirationTime,
            4 => SubpacketTag::ExportableCertification,
            7 => SubpacketTag::Revocable,
            9 => SubpacketTag::KeyExpirationTime,
            11 => SubpacketTag::PreferredSymmetricAlgorithms,
            16 => SubpacketTag::Issuer,
            21 => SubpacketTag::PreferredHashAlgorithms,
            22 => SubpacketTag::PreferredCompressionAlgorithms,
            25 => SubpacketTag::PrimaryUserID,
            27 => SubpacketTag::KeyFlags,
            32 => SubpacketTag::EmbeddedSignature,
            33 => SubpacketTag::IssuerFingerprint,
            u => SubpacketTag::Unknown(u),
        }
    }
}

impl From<SubpacketTag> for u8 {
    fn from(t: SubpacketTag) -> u8 {
        match t {
            SubpacketTag::SignatureCreationTime => 2,
            SubpacketTag::SignatureExpirationTime => 3,
            SubpacketTag::ExportableCertification => 4,
            SubpacketTag::Revocable => 7,
            SubpacketTag::KeyExpirationTime => 9,
            SubpacketTag::PreferredSymmetricAlgorithms => 11,
            SubpacketTag::Issuer => 16,
            SubpacketTag::PreferredHashAlgorithms => 21,
            SubpacketTag::PreferredCompressionAlgorithms => 22,
            SubpacketTag::PrimaryUserID => 25,
            SubpacketTag::KeyFlags => 27,
            SubpacketTag::EmbeddedSignature => 32,
            SubpacketTag::IssuerFingerprint => 33,
            SubpacketTag::Unknown(u) => u,
        }
    }
}

impl fmt::Display for SubpacketTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

#[cfg(test)]
impl Arbitrary for SubpacketTag {
    fn arbitrary(g: &mut Gen) -> Self {
        u8::arbitrary(g).into()
    }
}

/// Holds a subpacket's value.
///
/// All recognized variants store their decoded form; anything else
/// is retained as an opaque body under its wire tag.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SubpacketValue {
    /// An unknown subpacket.
    Unknown {
        /// The wire tag.
        tag: u8,
        /// The opaque body.
        body: Box<[u8]>,
    },

    /// The time the signature was made, in seconds since the UNIX
    /// epoch.
    SignatureCreationTime(u32),
    /// The validity period of the signature, in seconds after its
    /// creation.
    SignatureExpirationTime(u32),
    /// Whether a certification signature is "exportable".
    ///
    /// The flag octet is preserved verbatim.
    ExportableCertification(u8),
    /// Signature's revocability status.
    ///
    /// The flag octet is preserved verbatim.
    Revocable(u8),
    /// The validity period of the key, in seconds after its
    /// creation.
    KeyExpirationTime(u32),
    /// The symmetric algorithms the key holder prefers, most
    /// preferred first.
    PreferredSymmetricAlgorithms(Vec<SymmetricAlgorithm>),
    /// The OpenPGP Key ID of the key issuing the signature.
    Issuer(KeyID),
    /// The hash algorithms the key holder prefers, most preferred
    /// first.
    PreferredHashAlgorithms(Vec<HashAlgorithm>),
    /// The compression algorithms the key holder prefers, most
    /// preferred first.
    PreferredCompressionAlgorithms(Vec<CompressionAlgorithm>),
    /// Whether the certified User ID is the main User ID for the
    /// key.
    ///
    /// The flag octet is preserved verbatim.
    PrimaryUserID(u8),
    /// The purposes the certified key may be used for.
    KeyFlags(KeyFlags),
    /// A complete nested signature.
    EmbeddedSignature(Box<Signature>),
    /// The fingerprint of the key issuing the signature, preceded by
    /// its one-octet key version.
    IssuerFingerprint(Fingerprint),
}

impl SubpacketValue {
    /// Returns the subpacket tag for this value.
    pub fn tag(&self) -> SubpacketTag {
        use self::SubpacketValue::*;
        match self {
            Unknown { tag, .. } => SubpacketTag::Unknown(*tag),
            SignatureCreationTime(_) => SubpacketTag::SignatureCreationTime,
            SignatureExpirationTime(_) =>
                SubpacketTag::SignatureExpirationTime,
            ExportableCertification(_) =>
                SubpacketTag::ExportableCertification,
            Revocable(_) => SubpacketTag::Revocable,
            KeyExpirationTime(_) => SubpacketTag::KeyExpirationTime,
            PreferredSymmetricAlgorithms(_) =>
                SubpacketTag::PreferredSymmetricAlgorithms,
            Issuer(_) => SubpacketTag::Issuer,
            PreferredHashAlgorithms(_) =>
                SubpacketTag::PreferredHashAlgorithms,
            PreferredCompressionAlgorithms(_) =>
                SubpacketTag::PreferredCompressionAlgorithms,
            PrimaryUserID(_) => SubpacketTag::PrimaryUserID,
            KeyFlags(_) => SubpacketTag::KeyFlags,
            EmbeddedSignature(_) => SubpacketTag::EmbeddedSignature,
            IssuerFingerprint(_) => SubpacketTag::IssuerFingerprint,
        }
    }
}

/// Holds an area of signature subpackets.
///
/// The area preserves the order of its subpackets; equality is
/// order-sensitive.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct SubpacketArea {
    /// The subpackets, in wire order.
    subpackets: Vec<SubpacketValue>,
}

impl SubpacketArea {
    /// Returns a new subpacket area containing the given
    /// subpackets.
    pub fn new(subpackets: Vec<SubpacketValue>) -> Self {
        SubpacketArea { subpackets }
    }

    /// Returns an empty subpacket area.
    pub fn empty() -> Self {
        Default::default()
    }

    /// Iterates over the subpackets in wire order.
    pub fn iter(&self) -> impl Iterator<Item = &SubpacketValue> {
        self.subpackets.iter()
    }

    /// Returns the number of subpackets.
    pub fn len(&self) -> usize {
        self.subpackets.len()
    }

    /// Whether the area is empty.
    pub fn is_empty(&self) -> bool {
        self.subpackets.is_empty()
    }

    /// Adds the given subpacket to the end of the area.
    pub fn add(&mut self, subpacket: SubpacketValue) {
        self.subpackets.push(subpacket);
    }

    /// Returns the first subpacket with the given tag, if any.
    pub fn lookup(&self, tag: SubpacketTag) -> Option<&SubpacketValue> {
        self.subpackets.iter().find(|sp| sp.tag() == tag)
    }
}

impl<'a> IntoIterator for &'a SubpacketArea {
    type Item = &'a SubpacketValue;
    type IntoIter = std::slice::Iter<'a, SubpacketValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.subpackets.iter()
    }
}

#[cfg(test)]
impl Arbitrary for SubpacketValue {
    fn arbitrary(g: &mut Gen) -> Self {
        use self::SubpacketValue::*;
        match u8::arbitrary(g) % 12 {
            0 => SignatureCreationTime(u32::arbitrary(g)),
            1 => SignatureExpirationTime(u32::arbitrary(g)),
            2 => ExportableCertification(u8::arbitrary(g)),
            3 => Revocable(u8::arbitrary(g)),
            4 => KeyExpirationTime(u32::arbitrary(g)),
            5 => PreferredSymmetricAlgorithms(Vec::arbitrary(g)),
            6 => Issuer(KeyID::V4(u64::arbitrary(g).to_be_bytes())),
            7 => PreferredHashAlgorithms(Vec::arbitrary(g)),
            8 => PreferredCompressionAlgorithms(Vec::arbitrary(g)),
            9 => PrimaryUserID(u8::arbitrary(g)),
            10 => KeyFlags(crate::types::KeyFlags::arbitrary(g)),
            11 => {
                // An unknown subpacket with a tag that is guaranteed
                // not to collide with a recognized one.
                let mut tag = u8::arbitrary(g);
                while !matches!(SubpacketTag::from(tag),
                                SubpacketTag::Unknown(_)) {
                    tag = tag.wrapping_add(1);
                }
                Unknown {
                    tag,
                    body: Vec::arbitrary(g).into_boxed_slice(),
                }
            },
            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
impl Arbitrary for SubpacketArea {
    fn arbitrary(g: &mut Gen) -> Self {
        let count = usize::arbitrary(g) % 8;
        SubpacketArea::new(
            (0..count).map(|_| SubpacketValue::arbitrary(g)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Parse;
    use crate::serialize::Marshal;

    #[test]
    fn area_equality_is_order_sensitive() {
        let a = SubpacketValue::SignatureCreationTime(1554103728);
        let b = SubpacketValue::PrimaryUserID(1);
        let c = SubpacketValue::KeyFlags(
            crate::types::KeyFlags::empty().set_certification(true));

        let abc = SubpacketArea::new(vec![a.clone(), b.clone(), c.clone()]);
        let bac = SubpacketArea::new(vec![b, a, c]);
        assert!(abc != bac);

        // Both round-trip preserving their order.
        for area in [&abc, &bac] {
            let buf = area.to_vec().unwrap();
            assert_eq!(SubpacketArea::from_bytes(&buf).unwrap(), *area);
        }
    }

    #[test]
    fn lookup_finds_first_match() {
        let area = SubpacketArea::new(vec![
            SubpacketValue::SignatureCreationTime(1),
            SubpacketValue::SignatureCreationTime(2),
        ]);
        assert_eq!(area.lookup(SubpacketTag::SignatureCreationTime),
                   Some(&SubpacketValue::SignatureCreationTime(1)));
        assert_eq!(area.lookup(SubpacketTag::Issuer), None);
    }

    quickcheck::quickcheck! {
        fn roundtrip(area: SubpacketArea) -> bool {
            let buf = area.to_vec().unwrap();
            SubpacketArea::from_bytes(&buf).unwrap() == area
        }
    }

    quickcheck::quickcheck! {
        fn serialized_len_matches(area: SubpacketArea) -> bool {
            area.to_vec().unwrap().len() == area.serialized_len().unwrap()
        }
    }
}
