//! Parsing OpenPGP packets.
//!
//! Every type that appears on the wire implements [`Parse`]: it
//! reads itself from a [`Decoder`] positioned at its first byte.
//! Packets are framed as described in [Section 4.2 of RFC 4880];
//! the body of a packet with a known length is spliced off into a
//! sub-decoder so that a malformed body cannot read past its
//! packet.
//!
//! Parsers fail fast at the point of violation; on error the value
//! under construction is discarded.  Unknown packet tags, key
//! algorithms, and subpacket types are *not* errors: they decode
//! into explicit `Unknown` states.
//!
//! [Section 4.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2
//! [`Decoder`]: crate::wire::Decoder

use crate::Error;
use crate::Fingerprint;
use crate::KeyID;
use crate::Packet;
use crate::Result;
use crate::crypto::mem::Protected;
use crate::crypto::mpi::{self, MPI, ProtectedMPI};
use crate::packet::key::{
    Key,
    KeyRole,
    PublicParts,
    SecretKeyMaterial,
    SecretParts,
};
use crate::packet::signature::subpacket::{
    SubpacketArea,
    SubpacketTag,
    SubpacketValue,
};
use crate::packet::{Signature, Tag, Unknown, UserID};
use crate::types::{Curve, PublicKeyAlgorithm};
use crate::wire::{self, Decoder};

/// Reading values from their wire representation.
pub trait Parse<'a>: Sized {
    /// Reads a value from the decoder.
    fn parse(dec: &mut Decoder<'a>) -> Result<Self>;

    /// Reads a value from the given byte slice.
    ///
    /// Trailing data is not an error; a byte range routinely holds a
    /// sequence of packets.
    fn from_bytes(data: &'a [u8]) -> Result<Self> {
        let mut dec = Decoder::new(data);
        Self::parse(&mut dec)
    }
}

/// Extracts a single octet and checks it against an expected
/// constant.
fn expect_u8(dec: &mut Decoder, expected: u8, what: &str) -> Result<()> {
    let value = dec.extract_u8()?;
    if value != expected {
        return Err(Error::InvalidValue(
            format!("{}: expected {}, got {}", what, expected, value)).into());
    }
    Ok(())
}

impl<'a> Parse<'a> for MPI {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        let bits = dec.extract_u16()? as usize;
        let value = dec.extract_bytes((bits + 7) / 8)?;

        // Normalize: a non-minimal encoding is accepted, but the
        // stored magnitude is always minimal.
        Ok(MPI::new(value))
    }
}

impl<'a> Parse<'a> for ProtectedMPI {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        Ok(MPI::parse(dec)?.into())
    }
}

impl<'a> Parse<'a> for Curve {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        let len = dec.extract_u8()? as usize;
        let oid = dec.extract_bytes(len)?;
        Ok(Curve::from_oid(oid))
    }
}

impl mpi::PublicKey {
    /// Parses the public key material for the given algorithm.
    ///
    /// Material for an unknown algorithm is captured wholesale.
    pub fn parse(algo: PublicKeyAlgorithm, dec: &mut Decoder)
                 -> Result<Self> {
        use crate::types::PublicKeyAlgorithm::*;

        match algo {
            RSAEncryptSign | RSAEncrypt | RSASign => {
                let n = MPI::parse(dec)?;
                let e = MPI::parse(dec)?;
                Ok(mpi::PublicKey::RSA { e, n })
            },

            DSA => {
                let p = MPI::parse(dec)?;
                let q = MPI::parse(dec)?;
                let g = MPI::parse(dec)?;
                let y = MPI::parse(dec)?;
                Ok(mpi::PublicKey::DSA { p, q, g, y })
            },

            ElgamalEncrypt => {
                let p = MPI::parse(dec)?;
                let g = MPI::parse(dec)?;
                let y = MPI::parse(dec)?;
                Ok(mpi::PublicKey::Elgamal { p, g, y })
            },

            EdDSA => {
                let curve = Curve::parse(dec)?;
                let q = MPI::parse(dec)?;
                Ok(mpi::PublicKey::EdDSA { curve, q })
            },

            ECDSA => {
                let curve = Curve::parse(dec)?;
                let q = MPI::parse(dec)?;
                Ok(mpi::PublicKey::ECDSA { curve, q })
            },

            ECDH => {
                let curve = Curve::parse(dec)?;
                let q = MPI::parse(dec)?;
                expect_u8(dec, 3, "kdf size")?;
                expect_u8(dec, 1, "kdf reserved")?;
                let hash = dec.extract_u8()?.into();
                let sym = dec.extract_u8()?.into();
                Ok(mpi::PublicKey::ECDH { curve, q, hash, sym })
            },

            Unknown(_) => {
                let rest = dec.extract_rest()?;
                Ok(mpi::PublicKey::Unknown {
                    rest: rest.to_vec().into_boxed_slice(),
                })
            },
        }
    }
}

impl mpi::SecretKeyMaterial {
    /// Parses the secret key material for the given algorithm.
    pub fn parse(algo: PublicKeyAlgorithm, dec: &mut Decoder)
                 -> Result<Self> {
        use crate::types::PublicKeyAlgorithm::*;

        match algo {
            RSAEncryptSign | RSAEncrypt | RSASign => {
                let d = ProtectedMPI::parse(dec)?;
                let p = ProtectedMPI::parse(dec)?;
                let q = ProtectedMPI::parse(dec)?;
                let u = ProtectedMPI::parse(dec)?;
                Ok(mpi::SecretKeyMaterial::RSA { d, p, q, u })
            },

            DSA => Ok(mpi::SecretKeyMaterial::DSA {
                x: ProtectedMPI::parse(dec)?,
            }),

            ElgamalEncrypt => Ok(mpi::SecretKeyMaterial::Elgamal {
                x: ProtectedMPI::parse(dec)?,
            }),

            EdDSA => Ok(mpi::SecretKeyMaterial::EdDSA {
                scalar: ProtectedMPI::parse(dec)?,
            }),

            ECDSA => Ok(mpi::SecretKeyMaterial::ECDSA {
                scalar: ProtectedMPI::parse(dec)?,
            }),

            ECDH => Ok(mpi::SecretKeyMaterial::ECDH {
                scalar: ProtectedMPI::parse(dec)?,
            }),

            Unknown(_) => {
                let rest: Protected = dec.extract_rest()?.into();
                Ok(mpi::SecretKeyMaterial::Unknown { rest })
            },
        }
    }
}

impl mpi::Signature {
    /// Parses the signature material for the given algorithm.
    pub fn parse(algo: PublicKeyAlgorithm, dec: &mut Decoder)
                 -> Result<Self> {
        use crate::types::PublicKeyAlgorithm::*;

        match algo {
            RSAEncryptSign | RSASign => Ok(mpi::Signature::RSA {
                s: MPI::parse(dec)?,
            }),

            DSA => {
                let r = MPI::parse(dec)?;
                let s = MPI::parse(dec)?;
                Ok(mpi::Signature::DSA { r, s })
            },

            EdDSA => {
                let r = MPI::parse(dec)?;
                let s = MPI::parse(dec)?;
                Ok(mpi::Signature::EdDSA { r, s })
            },

            ECDSA => {
                let r = MPI::parse(dec)?;
                let s = MPI::parse(dec)?;
                Ok(mpi::Signature::ECDSA { r, s })
            },

            _ => {
                let rest = dec.extract_rest()?;
                Ok(mpi::Signature::Unknown {
                    rest: rest.to_vec().into_boxed_slice(),
                })
            },
        }
    }
}

impl<'a> Parse<'a> for UserID {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        Ok(dec.extract_rest()?.into())
    }
}

impl<'a, R: KeyRole> Parse<'a> for Key<PublicParts, R> {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        expect_u8(dec, 4, "key version")?;
        let creation_time = dec.extract_u32()?;
        let pk_algo: PublicKeyAlgorithm = dec.extract_u8()?.into();
        let mpis = mpi::PublicKey::parse(pk_algo, dec)?;

        Ok(Key::new(creation_time, pk_algo, mpis))
    }
}

impl<'a, R: KeyRole> Parse<'a> for Key<SecretParts, R> {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        expect_u8(dec, 4, "key version")?;
        let creation_time = dec.extract_u32()?;
        let pk_algo: PublicKeyAlgorithm = dec.extract_u8()?.into();
        let mpis = mpi::PublicKey::parse(pk_algo, dec)?;

        // For an unknown algorithm the public material has already
        // captured the whole body; the string-to-key octet and the
        // checksum cannot be told apart from the key material.
        let secret = match &mpis {
            mpi::PublicKey::Unknown { .. } => None,
            _ => {
                let s2k_usage = dec.extract_u8()?;
                let sk = mpi::SecretKeyMaterial::parse(pk_algo, dec)?;
                let checksum = dec.extract_u16()?;
                Some(SecretKeyMaterial::from_parts(s2k_usage, sk, checksum))
            },
        };

        Ok(Key::from_secret_parts(creation_time, pk_algo, mpis, secret))
    }
}

impl<'a> Parse<'a> for SubpacketArea {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        let total = dec.extract_u16()? as usize;
        let mut area = dec.splice(total)?;

        let mut subpackets = Vec::new();
        while !area.is_empty() {
            let length = wire::parse_varlen(&mut area)? as usize;
            if length == 0 {
                return Err(Error::MalformedPacket(
                    "Zero-length subpacket".into()).into());
            }

            let tag = area.extract_u8()?;
            // The length includes the type octet just read.
            let mut body = area.splice(length - 1)?;
            subpackets.push(parse_subpacket(tag, &mut body)?);
        }

        Ok(SubpacketArea::new(subpackets))
    }
}

/// Parses a single subpacket body.
///
/// A typed subpacket must consume its body exactly; leftover bytes
/// mean the body does not belong to the type on the label.
fn parse_subpacket(tag: u8, dec: &mut Decoder) -> Result<SubpacketValue> {
    let value = match SubpacketTag::from(tag) {
        SubpacketTag::SignatureCreationTime =>
            SubpacketValue::SignatureCreationTime(dec.extract_u32()?),
        SubpacketTag::SignatureExpirationTime =>
            SubpacketValue::SignatureExpirationTime(dec.extract_u32()?),
        SubpacketTag::ExportableCertification =>
            SubpacketValue::ExportableCertification(dec.extract_u8()?),
        SubpacketTag::Revocable =>
            SubpacketValue::Revocable(dec.extract_u8()?),
        SubpacketTag::KeyExpirationTime =>
            SubpacketValue::KeyExpirationTime(dec.extract_u32()?),
        SubpacketTag::PreferredSymmetricAlgorithms =>
            SubpacketValue::PreferredSymmetricAlgorithms(
                dec.extract_rest()?.iter().map(|&b| b.into()).collect()),
        SubpacketTag::Issuer =>
            SubpacketValue::Issuer(KeyID::from_bytes(dec.extract_bytes(8)?)),
        SubpacketTag::PreferredHashAlgorithms =>
            SubpacketValue::PreferredHashAlgorithms(
                dec.extract_rest()?.iter().map(|&b| b.into()).collect()),
        SubpacketTag::PreferredCompressionAlgorithms =>
            SubpacketValue::PreferredCompressionAlgorithms(
                dec.extract_rest()?.iter().map(|&b| b.into()).collect()),
        SubpacketTag::PrimaryUserID =>
            SubpacketValue::PrimaryUserID(dec.extract_u8()?),
        SubpacketTag::KeyFlags =>
            SubpacketValue::KeyFlags(dec.extract_u8()?.into()),
        SubpacketTag::EmbeddedSignature =>
            SubpacketValue::EmbeddedSignature(
                Box::new(Signature::parse(dec)?)),
        SubpacketTag::IssuerFingerprint => {
            expect_u8(dec, 4, "fingerprint key version")?;
            SubpacketValue::IssuerFingerprint(
                Fingerprint::from_bytes(dec.extract_rest()?))
        },
        SubpacketTag::Unknown(tag) => SubpacketValue::Unknown {
            tag,
            body: dec.extract_rest()?.to_vec().into_boxed_slice(),
        },
    };

    if !dec.is_empty() {
        return Err(Error::MalformedPacket(
            format!("Trailing data in subpacket of type {}", tag)).into());
    }

    Ok(value)
}

impl<'a> Parse<'a> for Signature {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        expect_u8(dec, 4, "signature version")?;
        let typ = dec.extract_u8()?.into();
        let pk_algo: PublicKeyAlgorithm = dec.extract_u8()?.into();
        let hash_algo = dec.extract_u8()?.into();
        let hashed_area = SubpacketArea::parse(dec)?;
        let unhashed_area = SubpacketArea::parse(dec)?;

        let mut digest_prefix = [0u8; 2];
        digest_prefix.copy_from_slice(dec.extract_bytes(2)?);

        let mpis = mpi::Signature::parse(pk_algo, dec)?;

        Ok(Signature::new(typ, pk_algo, hash_algo, hashed_area,
                          unhashed_area, digest_prefix, mpis))
    }
}

impl<'a> Parse<'a> for Packet {
    fn parse(dec: &mut Decoder<'a>) -> Result<Self> {
        if dec.extract_bits(1)? != 1 {
            return Err(Error::MalformedPacket(
                "Required header tag bit not set".into()).into());
        }

        let new_format = dec.extract_bits(1)? == 1;
        let (tag, size) = if new_format {
            let tag = Tag::from(dec.extract_bits(6)?);
            (tag, Some(wire::parse_varlen(dec)? as usize))
        } else {
            let tag = Tag::from(dec.extract_bits(4)?);
            let size = match dec.extract_bits(2)? {
                0 => Some(dec.extract_u8()? as usize),
                1 => Some(dec.extract_u16()? as usize),
                2 => Some(dec.extract_u32()? as usize),
                // Length type 3: the body extends to wherever the
                // surrounding context ends.
                _ => None,
            };
            (tag, size)
        };

        // With a known size the body is spliced off, so that the
        // body parser cannot stray into the next packet.
        match size {
            Some(size) => {
                let mut body = dec.splice(size)?;
                parse_body(tag, &mut body)
            },
            None => parse_body(tag, dec),
        }
    }
}

fn parse_body(tag: Tag, dec: &mut Decoder) -> Result<Packet> {
    use crate::packet::key;

    match tag {
        Tag::Signature =>
            Ok(Packet::Signature(Signature::parse(dec)?)),
        Tag::SecretKey =>
            Ok(Packet::SecretKey(key::SecretKey::parse(dec)?)),
        Tag::PublicKey =>
            Ok(Packet::PublicKey(key::PublicKey::parse(dec)?)),
        Tag::SecretSubkey =>
            Ok(Packet::SecretSubkey(key::SecretSubkey::parse(dec)?)),
        Tag::UserID =>
            Ok(Packet::UserID(UserID::parse(dec)?)),
        Tag::PublicSubkey =>
            Ok(Packet::PublicSubkey(key::PublicSubkey::parse(dec)?)),
        Tag::Unknown(_) =>
            Ok(Packet::Unknown(Unknown::new(
                tag, dec.extract_rest()?.to_vec()))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn required_bit_must_be_set() {
        // 0x3f would be a valid new-format header if bit 7 were set.
        assert!(Packet::from_bytes(&[0x3f, 0x00]).is_err());
    }

    #[test]
    fn empty_input() {
        assert!(Packet::from_bytes(&[]).is_err());
    }

    #[test]
    fn old_format_indeterminate_length() {
        // Old format, user id (tag 13), length type 3: the body is
        // everything that follows.
        let data = [0b1011_0111, b'a', b'b', b'c'];
        let packet = Packet::from_bytes(&data).unwrap();
        match packet {
            Packet::UserID(uid) => assert_eq!(uid.value(), b"abc"),
            packet => panic!("expected a user id, got {:?}", packet),
        }
    }

    #[test]
    fn new_format_header() {
        // New format, user id (tag 13), one-octet length.
        let data = [0b1100_1101, 3, b'x', b'y', b'z'];
        let packet = Packet::from_bytes(&data).unwrap();
        match packet {
            Packet::UserID(uid) => assert_eq!(uid.value(), b"xyz"),
            packet => panic!("expected a user id, got {:?}", packet),
        }
    }

    #[test]
    fn unknown_tag_is_preserved() {
        // Old format, tag 4 with a two-byte body.
        let data = [0b1001_0000, 2, 0xde, 0xad];
        let packet = Packet::from_bytes(&data).unwrap();
        assert_eq!(packet.kind(), None);
        assert_eq!(packet.tag(), Tag::Unknown(4));
        match packet {
            Packet::Unknown(u) => assert_eq!(u.body(), &[0xde, 0xad]),
            packet => panic!("expected an unknown packet, got {:?}", packet),
        }
    }

    #[test]
    fn truncated_body_fails() {
        // Claims four body bytes, provides two.
        assert!(Packet::from_bytes(&[0b1000_1101, 4, b'a', b'b']).is_err());
    }

    #[test]
    fn trailing_data_is_left_alone() {
        let data = [0b1000_1101, 1, b'a', 0xff, 0xff];
        let mut dec = Decoder::new(&data);
        let packet = Packet::parse(&mut dec).unwrap();
        assert_eq!(packet.tag(), Tag::UserID);
        assert_eq!(dec.len(), 2);
    }

    #[test]
    fn key_version_is_checked() {
        // A version 3 public key must not parse.
        let data = [3, 0, 0, 0, 0, 1];
        let mut dec = Decoder::new(&data);
        assert!(Key::<PublicParts, crate::packet::key::PrimaryRole>::parse(
            &mut dec).is_err());
    }

    #[test]
    fn unknown_key_algorithm_is_captured() {
        use crate::packet::key::PrimaryRole;

        let data = [4, 0x5c, 0xa8, 0x77, 0xb0, 99, 0xca, 0xfe];
        let key = Key::<PublicParts, PrimaryRole>::from_bytes(&data).unwrap();
        assert_eq!(key.pk_algo(), PublicKeyAlgorithm::Unknown(99));
        match key.mpis() {
            mpi::PublicKey::Unknown { rest } =>
                assert_eq!(&rest[..], &[0xca, 0xfe]),
            mpis => panic!("expected unknown key material, got {:?}", mpis),
        }
    }

    #[test]
    fn subpacket_body_must_be_exact() {
        // A creation-time subpacket with five body bytes: length 6,
        // type 2, u32 plus one byte too many.
        let mut area = vec![0, 7];
        area.extend_from_slice(&[6, 2, 0, 0, 0, 1, 9]);
        assert!(SubpacketArea::from_bytes(&area).is_err());

        // The same body sized correctly parses.
        let mut area = vec![0, 6];
        area.extend_from_slice(&[5, 2, 0, 0, 0, 1]);
        let area = SubpacketArea::from_bytes(&area).unwrap();
        assert_eq!(area.lookup(SubpacketTag::SignatureCreationTime),
                   Some(&SubpacketValue::SignatureCreationTime(1)));
    }

    #[test]
    fn subpacket_area_length_is_exact() {
        // The area claims three bytes but the subpacket needs six.
        let area = [0, 3, 5, 2, 0, 0, 0, 1];
        assert!(SubpacketArea::from_bytes(&area).is_err());
    }

    #[test]
    fn mpi_accepts_non_minimal_encodings() {
        // Bit length 16 with a leading zero byte; the parsed value
        // is normalized to the minimal form.
        let mpi = MPI::from_bytes(&[0x00, 0x10, 0x00, 0x7f]).unwrap();
        assert_eq!(mpi.bits(), 7);
        assert_eq!(mpi.value(), &[0x7f]);
    }

    #[test]
    fn mpi_rejects_truncated_payload() {
        assert!(MPI::from_bytes(&[0x00, 0x10, 0x7f]).is_err());
    }
}
