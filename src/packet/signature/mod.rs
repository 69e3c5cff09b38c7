//! Signature packets.
//!
//! OpenPGP signatures bind data to a key: a certification binds a
//! user id to a primary key, a subkey binding binds a subkey to a
//! primary key, and a primary key binding is the embedded
//! counter-signature a signing-capable subkey makes over its
//! primary.  The layout of the v4 signature packet is described in
//! [Section 5.2.3 of RFC 4880], the transcript that is actually
//! digested and signed in [Section 5.2.4 of RFC 4880].
//!
//! [Section 5.2.3 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.3
//! [Section 5.2.4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.4

use std::fmt;

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

use crate::Result;
use crate::crypto::Signer;
use crate::crypto::hash::Hash;
use crate::crypto::hash::Update;
use crate::crypto::mpi;
use crate::packet::UserID;
use crate::packet::key::{
    Key,
    KeyParts,
    KeyRole,
    PrimaryRole,
    SecretParts,
    SubordinateRole,
};
use crate::serialize::Marshal;
use crate::types::{
    HashAlgorithm,
    PublicKeyAlgorithm,
    SignatureType,
};

pub mod subpacket;
use subpacket::SubpacketArea;

/// Holds a v4 signature packet.
///
/// Carries the signature's metadata (type, algorithms, the hashed
/// and unhashed subpacket areas), the first two bytes of the signed
/// digest, and the algorithm-specific signature integers.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    /// Type of signature.
    typ: SignatureType,
    /// Public key algorithm used to create the signature.
    pk_algo: PublicKeyAlgorithm,
    /// Hash algorithm the transcript was digested with.
    hash_algo: HashAlgorithm,
    /// Subpackets that are covered by the signature.
    hashed_area: SubpacketArea,
    /// Subpackets that are not covered by the signature.
    unhashed_area: SubpacketArea,
    /// The first two bytes of the signed digest.
    digest_prefix: [u8; 2],
    /// The signature integers.
    mpis: mpi::Signature,
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Signature")
            .field("typ", &self.typ)
            .field("pk_algo", &self.pk_algo)
            .field("hash_algo", &self.hash_algo)
            .field("hashed_area", &self.hashed_area)
            .field("unhashed_area", &self.unhashed_area)
            .field("digest_prefix",
                   &format!("{:02X}{:02X}",
                            self.digest_prefix[0], self.digest_prefix[1]))
            .field("mpis", &self.mpis)
            .finish()
    }
}

impl Signature {
    /// Creates a signature packet from its parts.
    pub fn new(typ: SignatureType, pk_algo: PublicKeyAlgorithm,
               hash_algo: HashAlgorithm, hashed_area: SubpacketArea,
               unhashed_area: SubpacketArea, digest_prefix: [u8; 2],
               mpis: mpi::Signature)
               -> Self {
        Signature {
            typ,
            pk_algo,
            hash_algo,
            hashed_area,
            unhashed_area,
            digest_prefix,
            mpis,
        }
    }

    /// Gets the signature packet's version.  Always 4.
    pub fn version(&self) -> u8 {
        4
    }

    /// Gets the type of signature.
    pub fn typ(&self) -> SignatureType {
        self.typ
    }

    /// Gets the public key algorithm.
    pub fn pk_algo(&self) -> PublicKeyAlgorithm {
        self.pk_algo
    }

    /// Gets the hash algorithm.
    pub fn hash_algo(&self) -> HashAlgorithm {
        self.hash_algo
    }

    /// Gets the hashed subpacket area.
    pub fn hashed_area(&self) -> &SubpacketArea {
        &self.hashed_area
    }

    /// Gets the unhashed subpacket area.
    pub fn unhashed_area(&self) -> &SubpacketArea {
        &self.unhashed_area
    }

    /// Gets the two-byte digest prefix.
    pub fn digest_prefix(&self) -> &[u8; 2] {
        &self.digest_prefix
    }

    /// Gets the signature integers.
    pub fn mpis(&self) -> &mpi::Signature {
        &self.mpis
    }

    /// Certifies the binding between a user id and the given primary
    /// key.
    ///
    /// Produces a positive certification (type 0x13) signed with the
    /// primary key itself.  The transcript covers the primary key's
    /// image, the `0xB4`-framed user id, and the signature metadata.
    pub fn certify_userid(signer_key: &Key<SecretParts, PrimaryRole>,
                          userid: &UserID,
                          hashed_area: SubpacketArea,
                          unhashed_area: SubpacketArea)
                          -> Result<Signature> {
        Signature::sign(
            SignatureType::PositiveCertification,
            signer_key, hashed_area, unhashed_area,
            |signer| {
                signer_key.hash(signer)?;
                userid.hash(signer);
                Ok(())
            })
    }

    /// Binds a subkey to the given primary key.
    ///
    /// Produces a subkey binding (type 0x18) signed with the primary
    /// key.  The transcript covers both key images, the primary
    /// key's always first.
    pub fn bind_subkey<P>(signer_key: &Key<SecretParts, PrimaryRole>,
                          subkey: &Key<P, SubordinateRole>,
                          hashed_area: SubpacketArea,
                          unhashed_area: SubpacketArea)
                          -> Result<Signature>
    where
        P: KeyParts,
    {
        Signature::sign(
            SignatureType::SubkeyBinding,
            signer_key, hashed_area, unhashed_area,
            |signer| {
                signer_key.hash(signer)?;
                subkey.hash(signer)
            })
    }

    /// Binds a primary key to the given signing subkey.
    ///
    /// Produces a primary key binding (type 0x19, the "embedded
    /// signature" a signing-capable subkey makes over its primary
    /// key), signed with the subkey.  The main key is hashed first
    /// even though it is the signee here.
    pub fn bind_primary_key<P>(signer_key: &Key<SecretParts, SubordinateRole>,
                               primary: &Key<P, PrimaryRole>,
                               hashed_area: SubpacketArea,
                               unhashed_area: SubpacketArea)
                               -> Result<Signature>
    where
        P: KeyParts,
    {
        Signature::sign(
            SignatureType::PrimaryKeyBinding,
            signer_key, hashed_area, unhashed_area,
            |signer| {
                primary.hash(signer)?;
                signer_key.hash(signer)
            })
    }

    /// Streams the transcript into a fresh signer and assembles the
    /// signature packet.
    ///
    /// `feed` supplies the target bytes (key images, user id); the
    /// signature metadata and trailer follow in transcript order.
    fn sign<R, F>(typ: SignatureType, signer_key: &Key<SecretParts, R>,
                  hashed_area: SubpacketArea, unhashed_area: SubpacketArea,
                  feed: F)
                  -> Result<Signature>
    where
        R: KeyRole,
        F: FnOnce(&mut Signer) -> Result<()>,
    {
        let mut signer = Signer::new(signer_key)?;
        feed(&mut signer)?;

        let pk_algo = signer_key.pk_algo();
        let hash_algo = signer.hash_algo();
        hash_metadata(typ, pk_algo, hash_algo, &hashed_area, &mut signer)?;

        let (digest_prefix, mpis) = signer.finalize()?;

        Ok(Signature {
            typ,
            pk_algo,
            hash_algo,
            hashed_area,
            unhashed_area,
            digest_prefix,
            mpis,
        })
    }

    /// Recomputes the digest of the user id certification transcript
    /// over the given key and user id, using this signature's
    /// metadata.
    ///
    /// The first two bytes of the result equal
    /// [`digest_prefix`] for a signature that was made over these
    /// inputs.
    ///
    /// [`digest_prefix`]: Signature::digest_prefix
    pub fn userid_binding_digest<P, R>(&self, key: &Key<P, R>,
                                       userid: &UserID)
                                       -> Result<Vec<u8>>
    where
        P: KeyParts,
        R: KeyRole,
    {
        let mut ctx = self.hash_algo.context()?;
        key.hash(&mut ctx)?;
        userid.hash(&mut ctx);
        hash_metadata(self.typ, self.pk_algo, self.hash_algo,
                      &self.hashed_area, &mut ctx)?;
        Ok(ctx.into_digest())
    }

    /// Recomputes the digest of the subkey binding transcript over
    /// the given keys, using this signature's metadata.
    ///
    /// Also applies to primary key bindings; the main key is hashed
    /// first in both.
    pub fn subkey_binding_digest<PP, RP>(&self,
                                         primary: &Key<PP, PrimaryRole>,
                                         subkey: &Key<RP, SubordinateRole>)
                                         -> Result<Vec<u8>>
    where
        PP: KeyParts,
        RP: KeyParts,
    {
        let mut ctx = self.hash_algo.context()?;
        primary.hash(&mut ctx)?;
        subkey.hash(&mut ctx)?;
        hash_metadata(self.typ, self.pk_algo, self.hash_algo,
                      &self.hashed_area, &mut ctx)?;
        Ok(ctx.into_digest())
    }
}

/// Feeds the signature metadata and the v4 trailer into the sink.
///
/// A version 4 signature transcript ends with:
///
///   version - 1 byte            \
///   type - 1 byte                \
///   pk_algo - 1 byte              | the signature metadata
///   hash_algo - 1 byte            |
///   hashed area w/len - 2+n bytes/
///   version - 1 byte            \
///   0xFF - 1 byte                 | the trailer
///   length - 4 bytes             /
///
/// The trailer's length field counts the metadata bytes only.
fn hash_metadata(typ: SignatureType, pk_algo: PublicKeyAlgorithm,
                 hash_algo: HashAlgorithm, hashed_area: &SubpacketArea,
                 sink: &mut dyn Update)
                 -> Result<()> {
    let hashed = hashed_area.to_vec()?;

    sink.update(&[4, typ.into(), pk_algo.into(), hash_algo.into()]);
    sink.update(&hashed);

    sink.update(&[4, 0xff]);
    sink.update(&((4 + hashed.len()) as u32).to_be_bytes());

    Ok(())
}

#[cfg(test)]
impl Arbitrary for Signature {
    fn arbitrary(g: &mut Gen) -> Self {
        // The signature integers must match the algorithm, or the
        // value cannot round-trip.
        let (pk_algo, mpis) = match u8::arbitrary(g) % 4 {
            0 => (PublicKeyAlgorithm::RSAEncryptSign,
                  mpi::Signature::RSA {
                      s: crate::crypto::mpi::MPI::arbitrary(g),
                  }),
            1 => (PublicKeyAlgorithm::DSA,
                  mpi::Signature::DSA {
                      r: crate::crypto::mpi::MPI::arbitrary(g),
                      s: crate::crypto::mpi::MPI::arbitrary(g),
                  }),
            2 => (PublicKeyAlgorithm::EdDSA,
                  mpi::Signature::EdDSA {
                      r: crate::crypto::mpi::MPI::arbitrary(g),
                      s: crate::crypto::mpi::MPI::arbitrary(g),
                  }),
            3 => (PublicKeyAlgorithm::ECDSA,
                  mpi::Signature::ECDSA {
                      r: crate::crypto::mpi::MPI::arbitrary(g),
                      s: crate::crypto::mpi::MPI::arbitrary(g),
                  }),
            _ => unreachable!(),
        };

        Signature {
            typ: SignatureType::arbitrary(g),
            pk_algo,
            hash_algo: HashAlgorithm::arbitrary(g),
            hashed_area: SubpacketArea::arbitrary(g),
            unhashed_area: SubpacketArea::arbitrary(g),
            digest_prefix: [u8::arbitrary(g), u8::arbitrary(g)],
            mpis,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::mpi::MPI;
    use crate::packet::key::PublicSubkey;
    use crate::types::Curve;
    use subpacket::SubpacketValue;

    struct Transcript(Vec<u8>);

    impl Update for Transcript {
        fn update(&mut self, data: &[u8]) {
            self.0.extend_from_slice(data);
        }
    }

    fn ed25519_secret_key<R: KeyRole>(seed: u8) -> (Key<SecretParts, R>,
                                                    [u8; 32]) {
        use ed25519_dalek::SigningKey;

        let signing_key = SigningKey::from_bytes(&[seed; 32]);
        let vk = signing_key.verifying_key().to_bytes();

        let mut q = vec![0x40];
        q.extend_from_slice(&vk);

        (Key::with_secret(
            1554103728,
            PublicKeyAlgorithm::EdDSA,
            mpi::PublicKey::EdDSA {
                curve: Curve::Ed25519,
                q: MPI::new(&q),
            },
            mpi::SecretKeyMaterial::EdDSA {
                scalar: MPI::new(&[seed; 32]).into(),
            }).unwrap(),
         vk)
    }

    fn verify_eddsa(sig: &Signature, digest: &[u8], vk: &[u8; 32]) -> bool {
        use ed25519_dalek::VerifyingKey;

        let (r, s) = match sig.mpis() {
            mpi::Signature::EdDSA { r, s } => (r, s),
            mpis => panic!("expected EdDSA mpis, got {:?}", mpis),
        };
        let mut raw = [0u8; 64];
        raw[..32].copy_from_slice(&r.value_padded(32).unwrap());
        raw[32..].copy_from_slice(&s.value_padded(32).unwrap());

        VerifyingKey::from_bytes(vk).unwrap()
            .verify_strict(digest, &ed25519_dalek::Signature::from_bytes(&raw))
            .is_ok()
    }

    #[test]
    fn userid_certification_verifies() {
        let (key, vk) = ed25519_secret_key::<PrimaryRole>(0x42);
        let userid = UserID::from("Anne Onymous <anonymous@example.org>");

        let mut hashed = SubpacketArea::empty();
        hashed.add(SubpacketValue::SignatureCreationTime(1554103728));
        let mut unhashed = SubpacketArea::empty();
        unhashed.add(SubpacketValue::Issuer(key.keyid().unwrap()));

        let sig = Signature::certify_userid(
            &key, &userid, hashed, unhashed).unwrap();

        assert_eq!(sig.typ(), SignatureType::PositiveCertification);
        assert_eq!(sig.pk_algo(), PublicKeyAlgorithm::EdDSA);
        assert_eq!(sig.hash_algo(), HashAlgorithm::SHA256);

        let digest = sig.userid_binding_digest(&key, &userid).unwrap();
        assert_eq!(&digest[..2], sig.digest_prefix());
        assert!(verify_eddsa(&sig, &digest, &vk));
    }

    #[test]
    fn subkey_binding_verifies() {
        let (primary, vk) = ed25519_secret_key::<PrimaryRole>(0x01);
        let subkey: PublicSubkey = Key::new(
            1554103729,
            PublicKeyAlgorithm::ECDSA,
            mpi::PublicKey::ECDSA {
                curve: Curve::NistP256,
                q: MPI::new(&[0x04; 65]),
            });

        let sig = Signature::bind_subkey(
            &primary, &subkey,
            SubpacketArea::empty(), SubpacketArea::empty()).unwrap();

        assert_eq!(sig.typ(), SignatureType::SubkeyBinding);

        let digest = sig.subkey_binding_digest(&primary, &subkey).unwrap();
        assert_eq!(&digest[..2], sig.digest_prefix());
        assert!(verify_eddsa(&sig, &digest, &vk));
    }

    #[test]
    fn primary_key_binding_hashes_main_key_first() {
        let (subkey, vk) = ed25519_secret_key::<SubordinateRole>(0x07);
        let (primary, _) = ed25519_secret_key::<PrimaryRole>(0x03);
        let primary = primary.parts_as_public();

        let sig = Signature::bind_primary_key(
            &subkey, &primary,
            SubpacketArea::empty(), SubpacketArea::empty()).unwrap();

        assert_eq!(sig.typ(), SignatureType::PrimaryKeyBinding);

        // The digest helper hashes the main key first; if the
        // signature verifies against it, the signing transcript used
        // the same order.
        let digest = sig.subkey_binding_digest(&primary, &subkey).unwrap();
        assert_eq!(&digest[..2], sig.digest_prefix());
        assert!(verify_eddsa(&sig, &digest, &vk));
    }

    #[test]
    fn metadata_transcript_layout() {
        let mut hashed = SubpacketArea::empty();
        hashed.add(SubpacketValue::SignatureCreationTime(0x01020304));

        let mut sink = Transcript(Vec::new());
        hash_metadata(SignatureType::PositiveCertification,
                      PublicKeyAlgorithm::EdDSA,
                      HashAlgorithm::SHA256,
                      &hashed, &mut sink).unwrap();

        // Metadata: version, type, algorithms, then the area with
        // its two-byte length.
        assert_eq!(&sink.0[..4], &[4, 0x13, 22, 8]);
        assert_eq!(&sink.0[4..6], &[0, 6]);
        // Trailer: version, 0xFF, length of everything before it.
        let trailer_at = sink.0.len() - 6;
        assert_eq!(&sink.0[trailer_at..trailer_at + 2], &[4, 0xff]);
        assert_eq!(&sink.0[trailer_at + 2..],
                   &(trailer_at as u32).to_be_bytes());
    }

    quickcheck::quickcheck! {
        fn trailer_counts_metadata_bytes(area: SubpacketArea) -> bool {
            let mut sink = Transcript(Vec::new());
            hash_metadata(SignatureType::SubkeyBinding,
                          PublicKeyAlgorithm::EdDSA,
                          HashAlgorithm::SHA256,
                          &area, &mut sink).unwrap();

            let len = sink.0.len();
            let trailer: [u8; 4] = sink.0[len - 4..].try_into().unwrap();
            u32::from_be_bytes(trailer) as usize
                == 1 + 1 + 1 + 1 + area.serialized_len().unwrap()
        }
    }
}
