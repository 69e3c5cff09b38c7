//! Serializing OpenPGP packets.
//!
//! Every type that appears on the wire implements [`Marshal`]: it
//! reports its encoded length and writes itself to an [`Encoder`].
//! The two always agree; [`to_vec`] allocates exactly
//! `serialized_len()` bytes and fills them.
//!
//! Packet framing is deterministic: a packet whose tag fits the old
//! format is framed old-style with the smallest length field that
//! fits its body, everything else is framed new-style with a
//! variable-length length.  Readers must accept both.
//!
//! `Unknown` packets and key material of unknown algorithms are
//! read-only states: both `serialized_len` and `serialize` refuse.
//!
//! [`Encoder`]: crate::wire::Encoder
//! [`to_vec`]: Marshal::to_vec

use crate::Error;
use crate::Packet;
use crate::Result;
use crate::crypto::mpi::{self, MPI, ProtectedMPI};
use crate::packet::key::{
    Key,
    KeyParts,
    KeyRole,
    PublicParts,
    SecretParts,
};
use crate::packet::signature::subpacket::{SubpacketArea, SubpacketValue};
use crate::packet::{Signature, Tag, UserID};
use crate::types::Curve;
use crate::wire::{self, Encoder};

/// Writing values into their wire representation.
pub trait Marshal {
    /// Writes the value to the encoder.
    fn serialize(&self, enc: &mut Encoder) -> Result<()>;

    /// The number of bytes the encoded value occupies.
    fn serialized_len(&self) -> Result<usize>;

    /// Encodes the value into a fresh buffer.
    fn to_vec(&self) -> Result<Vec<u8>> {
        let mut buf = vec![0; self.serialized_len()?];
        let mut enc = Encoder::new(&mut buf);
        self.serialize(&mut enc)?;
        enc.flush()?;
        debug_assert_eq!(enc.position(), buf.len());
        Ok(buf)
    }
}

impl Marshal for MPI {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u16(self.bits() as u16)?;
        enc.write_bytes(self.value())
    }

    fn serialized_len(&self) -> Result<usize> {
        Ok(2 + self.value().len())
    }
}

impl Marshal for ProtectedMPI {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u16(self.bits() as u16)?;
        enc.write_bytes(self.value())
    }

    fn serialized_len(&self) -> Result<usize> {
        Ok(2 + self.value().len())
    }
}

impl Marshal for Curve {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u8(self.oid().len() as u8)?;
        enc.write_bytes(self.oid())
    }

    fn serialized_len(&self) -> Result<usize> {
        Ok(1 + self.oid().len())
    }
}

impl Marshal for mpi::PublicKey {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        use crate::crypto::mpi::PublicKey::*;

        match self {
            RSA { e, n } => {
                n.serialize(enc)?;
                e.serialize(enc)
            },
            DSA { p, q, g, y } => {
                p.serialize(enc)?;
                q.serialize(enc)?;
                g.serialize(enc)?;
                y.serialize(enc)
            },
            Elgamal { p, g, y } => {
                p.serialize(enc)?;
                g.serialize(enc)?;
                y.serialize(enc)
            },
            EdDSA { curve, q } | ECDSA { curve, q } => {
                curve.serialize(enc)?;
                q.serialize(enc)
            },
            ECDH { curve, q, hash, sym } => {
                curve.serialize(enc)?;
                q.serialize(enc)?;
                enc.write_u8(3)?;
                enc.write_u8(1)?;
                enc.write_u8((*hash).into())?;
                enc.write_u8((*sym).into())
            },
            Unknown { .. } =>
                Err(Error::InvalidOperation(
                    "Key material of unknown algorithm cannot be encoded"
                        .into()).into()),
        }
    }

    fn serialized_len(&self) -> Result<usize> {
        use crate::crypto::mpi::PublicKey::*;

        match self {
            RSA { e, n } =>
                Ok(n.serialized_len()? + e.serialized_len()?),
            DSA { p, q, g, y } =>
                Ok(p.serialized_len()? + q.serialized_len()?
                   + g.serialized_len()? + y.serialized_len()?),
            Elgamal { p, g, y } =>
                Ok(p.serialized_len()? + g.serialized_len()?
                   + y.serialized_len()?),
            EdDSA { curve, q } | ECDSA { curve, q } =>
                Ok(curve.serialized_len()? + q.serialized_len()?),
            ECDH { curve, q, .. } =>
                // One length octet, one reserved octet, and the two
                // KDF algorithm identifiers.
                Ok(curve.serialized_len()? + q.serialized_len()? + 4),
            Unknown { .. } =>
                Err(Error::InvalidOperation(
                    "Key material of unknown algorithm has no known size"
                        .into()).into()),
        }
    }
}

impl Marshal for mpi::SecretKeyMaterial {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        use crate::crypto::mpi::SecretKeyMaterial::*;

        match self {
            RSA { d, p, q, u } => {
                d.serialize(enc)?;
                p.serialize(enc)?;
                q.serialize(enc)?;
                u.serialize(enc)
            },
            DSA { x } | Elgamal { x } => x.serialize(enc),
            EdDSA { scalar } | ECDSA { scalar } | ECDH { scalar } =>
                scalar.serialize(enc),
            Unknown { .. } =>
                Err(Error::InvalidOperation(
                    "Key material of unknown algorithm cannot be encoded"
                        .into()).into()),
        }
    }

    fn serialized_len(&self) -> Result<usize> {
        use crate::crypto::mpi::SecretKeyMaterial::*;

        match self {
            RSA { d, p, q, u } =>
                Ok(d.serialized_len()? + p.serialized_len()?
                   + q.serialized_len()? + u.serialized_len()?),
            DSA { x } | Elgamal { x } => x.serialized_len(),
            EdDSA { scalar } | ECDSA { scalar } | ECDH { scalar } =>
                scalar.serialized_len(),
            Unknown { .. } =>
                Err(Error::InvalidOperation(
                    "Key material of unknown algorithm has no known size"
                        .into()).into()),
        }
    }
}

impl Marshal for mpi::Signature {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        use crate::crypto::mpi::Signature::*;

        match self {
            RSA { s } => s.serialize(enc),
            DSA { r, s } | EdDSA { r, s } | ECDSA { r, s } => {
                r.serialize(enc)?;
                s.serialize(enc)
            },
            Unknown { .. } =>
                Err(Error::InvalidOperation(
                    "Signature material of unknown algorithm cannot be \
                     encoded".into()).into()),
        }
    }

    fn serialized_len(&self) -> Result<usize> {
        use crate::crypto::mpi::Signature::*;

        match self {
            RSA { s } => s.serialized_len(),
            DSA { r, s } | EdDSA { r, s } | ECDSA { r, s } =>
                Ok(r.serialized_len()? + s.serialized_len()?),
            Unknown { .. } =>
                Err(Error::InvalidOperation(
                    "Signature material of unknown algorithm has no known \
                     size".into()).into()),
        }
    }
}

impl Marshal for UserID {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_bytes(self.value())
    }

    fn serialized_len(&self) -> Result<usize> {
        Ok(self.value().len())
    }
}

impl<R: KeyRole> Marshal for Key<PublicParts, R> {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        serialize_key_common(self, enc)
    }

    fn serialized_len(&self) -> Result<usize> {
        Ok(1 + 4 + 1 + self.mpis().serialized_len()?)
    }
}

impl<R: KeyRole> Marshal for Key<SecretParts, R> {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        serialize_key_common(self, enc)?;

        let secret = self.secret()
            .ok_or_else(|| Error::InvalidOperation(
                "Secret key of unknown algorithm cannot be encoded".into()))?;
        enc.write_u8(secret.s2k_usage())?;
        secret.mpis().serialize(enc)?;
        enc.write_u16(secret.checksum())
    }

    fn serialized_len(&self) -> Result<usize> {
        let secret = self.secret()
            .ok_or_else(|| Error::InvalidOperation(
                "Secret key of unknown algorithm has no known size".into()))?;
        Ok(1 + 4 + 1 + self.mpis().serialized_len()?
           + 1 + secret.mpis().serialized_len()? + 2)
    }
}

fn serialize_key_common<P, R>(key: &Key<P, R>, enc: &mut Encoder)
                              -> Result<()>
where
    P: KeyParts,
    R: KeyRole,
{
    enc.write_u8(key.version())?;
    enc.write_u32(key.creation_time())?;
    enc.write_u8(key.pk_algo().into())?;
    key.mpis().serialize(enc)
}

impl Marshal for SubpacketValue {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        use crate::packet::signature::subpacket::SubpacketValue::*;

        // The variable-length size covers the type octet and the
        // body.
        let inner = 1 + self.body_len()? as u32;
        wire::write_varlen(enc, inner)?;
        enc.write_u8(self.tag().into())?;

        match self {
            Unknown { body, .. } => enc.write_bytes(body),
            SignatureCreationTime(t) | SignatureExpirationTime(t)
                | KeyExpirationTime(t) => enc.write_u32(*t),
            ExportableCertification(f) | Revocable(f) | PrimaryUserID(f) =>
                enc.write_u8(*f),
            PreferredSymmetricAlgorithms(algos) => {
                for algo in algos {
                    enc.write_u8((*algo).into())?;
                }
                Ok(())
            },
            Issuer(keyid) => enc.write_bytes(keyid.as_bytes()),
            PreferredHashAlgorithms(algos) => {
                for algo in algos {
                    enc.write_u8((*algo).into())?;
                }
                Ok(())
            },
            PreferredCompressionAlgorithms(algos) => {
                for algo in algos {
                    enc.write_u8((*algo).into())?;
                }
                Ok(())
            },
            KeyFlags(flags) => enc.write_u8(flags.bits()),
            EmbeddedSignature(sig) => sig.serialize(enc),
            IssuerFingerprint(fp) => {
                enc.write_u8(4)?;
                enc.write_bytes(fp.as_bytes())
            },
        }
    }

    fn serialized_len(&self) -> Result<usize> {
        let inner = 1 + self.body_len()?;
        Ok(wire::varlen_len(inner as u32) + inner)
    }
}

impl SubpacketValue {
    /// The length of the subpacket's body, excluding the size and
    /// the type octet.
    fn body_len(&self) -> Result<usize> {
        use crate::packet::signature::subpacket::SubpacketValue::*;

        match self {
            Unknown { body, .. } => Ok(body.len()),
            SignatureCreationTime(_) | SignatureExpirationTime(_)
                | KeyExpirationTime(_) => Ok(4),
            ExportableCertification(_) | Revocable(_) | PrimaryUserID(_)
                | KeyFlags(_) => Ok(1),
            PreferredSymmetricAlgorithms(algos) => Ok(algos.len()),
            PreferredHashAlgorithms(algos) => Ok(algos.len()),
            PreferredCompressionAlgorithms(algos) => Ok(algos.len()),
            Issuer(keyid) => Ok(keyid.as_bytes().len()),
            EmbeddedSignature(sig) => sig.serialized_len(),
            IssuerFingerprint(fp) => Ok(1 + fp.as_bytes().len()),
        }
    }
}

impl Marshal for SubpacketArea {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        let inner = self.serialized_len()? - 2;
        if inner > u16::MAX as usize {
            return Err(Error::InvalidValue(
                format!("Subpacket area of {} bytes exceeds 64 KB", inner))
                       .into());
        }

        enc.write_u16(inner as u16)?;
        for subpacket in self {
            subpacket.serialize(enc)?;
        }
        Ok(())
    }

    fn serialized_len(&self) -> Result<usize> {
        let mut len = 2;
        for subpacket in self {
            len += subpacket.serialized_len()?;
        }
        Ok(len)
    }
}

impl Marshal for Signature {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        enc.write_u8(self.version())?;
        enc.write_u8(self.typ().into())?;
        enc.write_u8(self.pk_algo().into())?;
        enc.write_u8(self.hash_algo().into())?;
        self.hashed_area().serialize(enc)?;
        self.unhashed_area().serialize(enc)?;
        enc.write_bytes(self.digest_prefix())?;
        self.mpis().serialize(enc)
    }

    fn serialized_len(&self) -> Result<usize> {
        Ok(1 + 1 + 1 + 1
           + self.hashed_area().serialized_len()?
           + self.unhashed_area().serialized_len()?
           + 2
           + self.mpis().serialized_len()?)
    }
}

impl Marshal for Packet {
    fn serialize(&self, enc: &mut Encoder) -> Result<()> {
        let body_len = self.body_len()?;
        serialize_header(enc, self.tag(), body_len)?;

        match self {
            Packet::Unknown(_) => unreachable!("body_len refused above"),
            Packet::Signature(sig) => sig.serialize(enc),
            Packet::PublicKey(key) => key.serialize(enc),
            Packet::PublicSubkey(key) => key.serialize(enc),
            Packet::SecretKey(key) => key.serialize(enc),
            Packet::SecretSubkey(key) => key.serialize(enc),
            Packet::UserID(uid) => uid.serialize(enc),
        }
    }

    fn serialized_len(&self) -> Result<usize> {
        let body_len = self.body_len()?;
        Ok(header_len(self.tag(), body_len) + body_len)
    }
}

impl Packet {
    fn body_len(&self) -> Result<usize> {
        match self {
            Packet::Unknown(u) =>
                Err(Error::InvalidOperation(
                    format!("{} cannot be encoded", u.tag())).into()),
            Packet::Signature(sig) => sig.serialized_len(),
            Packet::PublicKey(key) => key.serialized_len(),
            Packet::PublicSubkey(key) => key.serialized_len(),
            Packet::SecretKey(key) => key.serialized_len(),
            Packet::SecretSubkey(key) => key.serialized_len(),
            Packet::UserID(uid) => uid.serialized_len(),
        }
    }
}

/// Writes a packet header.
///
/// The format choice is deterministic: old format with the smallest
/// length field that fits whenever the tag allows it, new format
/// with a variable-length size otherwise.
pub(crate) fn serialize_header(enc: &mut Encoder, tag: Tag,
                               body_len: usize)
                               -> Result<()> {
    let body_len = body_len as u32;

    enc.insert_bits(1, 1)?;
    if tag.old_format_compatible() {
        enc.insert_bits(1, 0)?;
        enc.insert_bits(4, tag.into())?;

        if body_len > 65535 {
            enc.insert_bits(2, 2)?;
            enc.write_u32(body_len)
        } else if body_len > 255 {
            enc.insert_bits(2, 1)?;
            enc.write_u16(body_len as u16)
        } else {
            enc.insert_bits(2, 0)?;
            enc.write_u8(body_len as u8)
        }
    } else {
        enc.insert_bits(1, 1)?;
        enc.insert_bits(6, tag.into())?;
        wire::write_varlen(enc, body_len)
    }
}

/// The number of bytes a packet header occupies: the tag octet plus
/// the length field.
pub(crate) fn header_len(tag: Tag, body_len: usize) -> usize {
    if tag.old_format_compatible() {
        if body_len > 65535 {
            1 + 4
        } else if body_len > 255 {
            1 + 2
        } else {
            1 + 1
        }
    } else {
        1 + wire::varlen_len(body_len as u32)
    }
}
