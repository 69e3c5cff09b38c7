//! Key packets.
//!
//! All versions of keys (primary keys and subkeys, public and
//! secret) share the same layout on the wire: a version octet, the
//! creation time, the algorithm identifier, and the algorithm
//! specific key material ([Section 5.5.2 of RFC 4880]).  Which of
//! the four key packet tags a key is serialized under does not
//! change the body; it only changes the framing and the semantics.
//!
//! This module therefore provides a single [`Key`] type
//! parameterized over marker types describing which parts are
//! present ([`PublicParts`] or [`SecretParts`]) and the key's role
//! ([`PrimaryRole`] or [`SubordinateRole`]).
//!
//! [Section 5.5.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.5.2

use std::fmt;
use std::marker::PhantomData;

use crate::Fingerprint;
use crate::KeyID;
use crate::Result;
use crate::crypto::hash::Update;
use crate::crypto::mpi;
use crate::packet::Tag;
use crate::serialize::Marshal;
use crate::types::PublicKeyAlgorithm;

/// A marker trait that describes which key parts a key object
/// carries.
///
/// This is a sealed trait; its only implementations are
/// [`PublicParts`] and [`SecretParts`].
pub trait KeyParts: fmt::Debug + seal::Sealed {
    /// Whether keys with these parts carry secret key material.
    fn secret() -> bool;
}

/// A marker trait that describes a key's role.
///
/// This is a sealed trait; its only implementations are
/// [`PrimaryRole`] and [`SubordinateRole`].
pub trait KeyRole: fmt::Debug + seal::Sealed {
    /// Whether keys in this role are subkeys.
    fn subkey() -> bool;
}

mod seal {
    pub trait Sealed {}
    impl Sealed for super::PublicParts {}
    impl Sealed for super::SecretParts {}
    impl Sealed for super::PrimaryRole {}
    impl Sealed for super::SubordinateRole {}
}

/// A marker that indicates that a `Key` only carries the public key
/// material.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PublicParts;
impl KeyParts for PublicParts {
    fn secret() -> bool { false }
}

/// A marker that indicates that a `Key` also carries the secret key
/// material, the string-to-key usage octet, and the material's
/// checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SecretParts;
impl KeyParts for SecretParts {
    fn secret() -> bool { true }
}

/// A marker that indicates the key is a primary key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PrimaryRole;
impl KeyRole for PrimaryRole {
    fn subkey() -> bool { false }
}

/// A marker that indicates the key is a subkey.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubordinateRole;
impl KeyRole for SubordinateRole {
    fn subkey() -> bool { true }
}

/// A public primary key packet.
pub type PublicKey = Key<PublicParts, PrimaryRole>;
/// A public subkey packet.
pub type PublicSubkey = Key<PublicParts, SubordinateRole>;
/// A secret primary key packet.
pub type SecretKey = Key<SecretParts, PrimaryRole>;
/// A secret subkey packet.
pub type SecretSubkey = Key<SecretParts, SubordinateRole>;

/// Holds a v4 key packet.
///
/// The role parameter `R` determines the packet tag used when the
/// key is framed; the parts parameter `P` determines whether secret
/// key material is present.  Everything else is shared.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Key<P: KeyParts, R: KeyRole> {
    /// When the key was created, in seconds since the UNIX epoch.
    creation_time: u32,
    /// Public key algorithm of this key.
    pk_algo: PublicKeyAlgorithm,
    /// The public key material.  Always present, also for secret
    /// keys; the public material of a key pair is the projection the
    /// fingerprint is computed over.
    mpis: mpi::PublicKey,
    /// The secret key material.  `Some` for `SecretParts` keys of
    /// known algorithms; unknown-algorithm bodies are captured
    /// wholesale in `mpis`.
    secret: Option<SecretKeyMaterial>,

    p: PhantomData<P>,
    r: PhantomData<R>,
}

impl<P: KeyParts, R: KeyRole> fmt::Debug for Key<P, R> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Key")
            .field("creation_time", &self.creation_time)
            .field("pk_algo", &self.pk_algo)
            .field("mpis", &self.mpis)
            .field("secret", &self.secret)
            .finish()
    }
}

impl<P: KeyParts, R: KeyRole> Key<P, R> {
    /// Gets the key packet's version.  Always 4.
    pub fn version(&self) -> u8 {
        4
    }

    /// Gets the key packet's creation time.
    pub fn creation_time(&self) -> u32 {
        self.creation_time
    }

    /// Gets the public key algorithm.
    pub fn pk_algo(&self) -> PublicKeyAlgorithm {
        self.pk_algo
    }

    /// Gets the key packet's public key material.
    pub fn mpis(&self) -> &mpi::PublicKey {
        &self.mpis
    }

    /// Gets the packet tag this key is framed under.
    pub fn tag(&self) -> Tag {
        Self::role_tag()
    }

    pub(crate) fn role_tag() -> Tag {
        match (P::secret(), R::subkey()) {
            (false, false) => Tag::PublicKey,
            (false, true) => Tag::PublicSubkey,
            (true, false) => Tag::SecretKey,
            (true, true) => Tag::SecretSubkey,
        }
    }

    /// Feeds the key's hashable image into the given sink.
    ///
    /// The image is the framing used for both the v4 fingerprint and
    /// the signature transcripts ([Section 12.2 of RFC 4880]): the
    /// constant `0x99`, a two-octet length, and the serialized
    /// *public* key body.
    ///
    ///   [Section 12.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-12.2
    pub fn hash(&self, hash: &mut dyn Update) -> Result<()> {
        let mpis = self.mpis.to_vec()?;

        // We hash 6 bytes of fields plus the MPIs; the length does
        // not include the magic constant or the length itself.
        let len = (1 + 4 + 1 + mpis.len()) as u16;

        hash.update(&[0x99]);
        hash.update(&len.to_be_bytes());
        hash.update(&[4]);
        hash.update(&self.creation_time.to_be_bytes());
        hash.update(&[self.pk_algo.into()]);
        hash.update(&mpis);

        Ok(())
    }

    /// Computes the key's v4 fingerprint: the SHA-1 digest of the
    /// hashable image.
    pub fn fingerprint(&self) -> Result<Fingerprint> {
        use crate::types::HashAlgorithm;

        let mut ctx = HashAlgorithm::SHA1.context()?;
        self.hash(&mut ctx)?;
        Ok(Fingerprint::from_bytes(&ctx.into_digest()))
    }

    /// Computes the key's key id: the low 8 bytes of the
    /// fingerprint.
    pub fn keyid(&self) -> Result<KeyID> {
        Ok(self.fingerprint()?.into())
    }
}

impl<R: KeyRole> Key<PublicParts, R> {
    /// Creates a new key packet from the public key material.
    pub fn new(creation_time: u32, pk_algo: PublicKeyAlgorithm,
               mpis: mpi::PublicKey)
               -> Self {
        Key {
            creation_time,
            pk_algo,
            mpis,
            secret: None,
            p: PhantomData,
            r: PhantomData,
        }
    }

}

impl<R: KeyRole> Key<SecretParts, R> {
    /// Creates a new key packet from public and secret key material.
    ///
    /// The secret material's checksum is computed here, over its
    /// serialized form.
    pub fn with_secret(creation_time: u32, pk_algo: PublicKeyAlgorithm,
                       mpis: mpi::PublicKey, secret: mpi::SecretKeyMaterial)
                       -> Result<Self> {
        Ok(Key {
            creation_time,
            pk_algo,
            mpis,
            secret: Some(SecretKeyMaterial::new(secret)?),
            p: PhantomData,
            r: PhantomData,
        })
    }

    pub(crate) fn from_secret_parts(creation_time: u32,
                                    pk_algo: PublicKeyAlgorithm,
                                    mpis: mpi::PublicKey,
                                    secret: Option<SecretKeyMaterial>)
                                    -> Self {
        Key {
            creation_time,
            pk_algo,
            mpis,
            secret,
            p: PhantomData,
            r: PhantomData,
        }
    }

    /// Gets the secret key material.
    ///
    /// `None` if the key uses an unknown algorithm; the body is then
    /// held opaquely by the public material.
    pub fn secret(&self) -> Option<&SecretKeyMaterial> {
        self.secret.as_ref()
    }

    /// Projects this key onto its public parts.
    pub fn parts_as_public(&self) -> Key<PublicParts, R> {
        Key {
            creation_time: self.creation_time,
            pk_algo: self.pk_algo,
            mpis: self.mpis.clone(),
            secret: None,
            p: PhantomData,
            r: PhantomData,
        }
    }
}

/// Holds the secret portion of an OpenPGP secret key packet: the
/// string-to-key usage octet, the secret MPIs, and their checksum.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct SecretKeyMaterial {
    /// The string-to-key usage octet.  Only 0 ("secret data is
    /// stored in the clear") is modeled; other conventions are
    /// preserved verbatim but their parameters are not interpreted.
    s2k_usage: u8,
    /// The algorithm-specific secret integers.
    mpis: mpi::SecretKeyMaterial,
    /// Sum of all octets of the encoded secret integers, mod 65536.
    checksum: u16,
}

impl SecretKeyMaterial {
    /// Wraps cleartext secret integers, computing their checksum.
    pub fn new(mpis: mpi::SecretKeyMaterial) -> Result<Self> {
        let encoded = mpis.to_vec()?;
        let checksum = encoded.iter()
            .fold(0u16, |a, &b| a.wrapping_add(b.into()));

        Ok(SecretKeyMaterial {
            s2k_usage: 0,
            mpis,
            checksum,
        })
    }

    pub(crate) fn from_parts(s2k_usage: u8, mpis: mpi::SecretKeyMaterial,
                             checksum: u16)
                             -> Self {
        SecretKeyMaterial { s2k_usage, mpis, checksum }
    }

    /// Gets the string-to-key usage octet.
    pub fn s2k_usage(&self) -> u8 {
        self.s2k_usage
    }

    /// Gets the secret integers.
    pub fn mpis(&self) -> &mpi::SecretKeyMaterial {
        &self.mpis
    }

    /// Gets the stored checksum.
    ///
    /// The checksum is recorded when a key is constructed or parsed;
    /// it is not validated against the parsed material.
    pub fn checksum(&self) -> u16 {
        self.checksum
    }
}

#[cfg(test)]
fn algo_for(mpis: &mpi::PublicKey) -> PublicKeyAlgorithm {
    match mpis {
        mpi::PublicKey::RSA { .. } => PublicKeyAlgorithm::RSAEncryptSign,
        mpi::PublicKey::DSA { .. } => PublicKeyAlgorithm::DSA,
        mpi::PublicKey::Elgamal { .. } => PublicKeyAlgorithm::ElgamalEncrypt,
        mpi::PublicKey::EdDSA { .. } => PublicKeyAlgorithm::EdDSA,
        mpi::PublicKey::ECDSA { .. } => PublicKeyAlgorithm::ECDSA,
        mpi::PublicKey::ECDH { .. } => PublicKeyAlgorithm::ECDH,
        mpi::PublicKey::Unknown { .. } => unreachable!(),
    }
}

#[cfg(test)]
impl<R: KeyRole + Clone + 'static> quickcheck::Arbitrary
    for Key<PublicParts, R>
{
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        use quickcheck::Arbitrary;

        let mpis = mpi::PublicKey::arbitrary(g);
        Key::new(u32::arbitrary(g), algo_for(&mpis), mpis)
    }
}

#[cfg(test)]
impl<R: KeyRole + Clone + 'static> quickcheck::Arbitrary
    for Key<SecretParts, R>
{
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        use quickcheck::Arbitrary;
        use crate::crypto::mpi::{MPI, PublicKey, SecretKeyMaterial as SK};

        let mpis = PublicKey::arbitrary(g);
        let secret = match &mpis {
            PublicKey::RSA { .. } => SK::RSA {
                d: MPI::arbitrary(g).into(),
                p: MPI::arbitrary(g).into(),
                q: MPI::arbitrary(g).into(),
                u: MPI::arbitrary(g).into(),
            },
            PublicKey::DSA { .. } => SK::DSA {
                x: MPI::arbitrary(g).into(),
            },
            PublicKey::Elgamal { .. } => SK::Elgamal {
                x: MPI::arbitrary(g).into(),
            },
            PublicKey::EdDSA { .. } => SK::EdDSA {
                scalar: MPI::arbitrary(g).into(),
            },
            PublicKey::ECDSA { .. } => SK::ECDSA {
                scalar: MPI::arbitrary(g).into(),
            },
            PublicKey::ECDH { .. } => SK::ECDH {
                scalar: MPI::arbitrary(g).into(),
            },
            PublicKey::Unknown { .. } => unreachable!(),
        };

        Key::with_secret(u32::arbitrary(g), algo_for(&mpis), mpis, secret)
            .expect("cleartext secret material")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mpi::MPI;
    use crate::types::{Curve, HashAlgorithm, SymmetricAlgorithm};

    #[test]
    fn ecdh_key_id() {
        // ECDH key over Ed25519's OID with a tiny public point; the
        // key id is the low 8 bytes of the SHA-1 over the 0x99 frame.
        let key: PublicKey = Key::new(
            1554103728,
            PublicKeyAlgorithm::ECDH,
            mpi::PublicKey::ECDH {
                curve: Curve::Ed25519,
                q: MPI::new(&[0x01, 0x02, 0x04, 0x08, 0x03, 0x8f, 0x20, 0x5c]),
                hash: HashAlgorithm::SHA1,
                sym: SymmetricAlgorithm::AES256,
            });

        assert_eq!(key.keyid().unwrap(),
                   crate::KeyID::V4([0x3e, 0xb9, 0x45, 0xeb,
                                     0x87, 0x7e, 0xbe, 0x0d]));
        assert_eq!(key.fingerprint().unwrap().as_bytes().len(), 20);
    }

    #[test]
    fn role_determines_tag() {
        assert_eq!(PublicKey::role_tag(), Tag::PublicKey);
        assert_eq!(PublicSubkey::role_tag(), Tag::PublicSubkey);
        assert_eq!(SecretKey::role_tag(), Tag::SecretKey);
        assert_eq!(SecretSubkey::role_tag(), Tag::SecretSubkey);
    }

    #[test]
    fn checksum_is_byte_sum() {
        let secret = mpi::SecretKeyMaterial::EdDSA {
            scalar: MPI::new(&[0x80, 0x01]).into(),
        };
        // Encoded secret: 00 10 80 01.
        let material = SecretKeyMaterial::new(secret).unwrap();
        assert_eq!(material.checksum(), 0x0091);
        assert_eq!(material.s2k_usage(), 0);
    }

    #[test]
    fn secret_key_projects_to_public() {
        let key: SecretKey = Key::with_secret(
            1554103728,
            PublicKeyAlgorithm::EdDSA,
            mpi::PublicKey::EdDSA {
                curve: Curve::Ed25519,
                q: MPI::new(&[0x40; 33]),
            },
            mpi::SecretKeyMaterial::EdDSA {
                scalar: MPI::new(&[1; 32]).into(),
            }).unwrap();

        let public = key.parts_as_public();
        assert_eq!(public.fingerprint().unwrap(),
                   key.fingerprint().unwrap());
        assert_eq!(public.tag(), Tag::PublicKey);
        assert_eq!(key.tag(), Tag::SecretKey);
    }
}
