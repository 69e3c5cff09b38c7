//! Signature generation.
//!
//! A [`Signer`] is the accumulator end of the signature transcript:
//! the caller streams the bytes described in [Section 5.2.4 of RFC
//! 4880] into it, then finalizes it once to obtain the two-byte
//! digest prefix stored in the signature and the algorithm-specific
//! signature integers.
//!
//! The transcript digest is always SHA-256.  For EdDSA and ECDSA the
//! digest itself is signed; for RSA the transcript additionally
//! feeds the PKCS#1 v1.5 message accumulator.  DSA signature
//! generation is not implemented and refuses up front.
//!
//! [Section 5.2.4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.4

use sha2::Sha256;

use crate::Error;
use crate::Result;
use crate::crypto::hash::{Context, Update};
use crate::crypto::mpi::{self, MPI, ProtectedMPI};
use crate::packet::key::{Key, KeyRole, SecretParts};
use crate::types::{Curve, HashAlgorithm};

/// Accumulates a signature transcript and signs it.
///
/// Created over a secret key; consumed by [`finalize`].
///
/// [`finalize`]: Signer::finalize
pub struct Signer {
    /// SHA-256 over the transcript; yields the stored hash prefix
    /// and, for the elliptic curve algorithms, the signed digest.
    hash: Context,
    mech: Mechanism,
}

enum Mechanism {
    Rsa {
        /// The PKCS#1 v1.5 message accumulator.
        digest: Sha256,
        n: MPI,
        e: MPI,
        d: ProtectedMPI,
        p: ProtectedMPI,
        q: ProtectedMPI,
    },
    Ecdsa {
        scalar: ProtectedMPI,
    },
    EdDsa {
        scalar: ProtectedMPI,
    },
}

impl Signer {
    /// Creates a signer bound to the given secret key.
    ///
    /// Fails for algorithms this crate cannot sign with: DSA (not
    /// implemented), the encryption-only algorithms, and unknown
    /// algorithms.  ECDSA and EdDSA keys must live on the curves
    /// this crate supports (NIST P-256 and Ed25519, respectively).
    pub fn new<R: KeyRole>(key: &Key<SecretParts, R>) -> Result<Signer> {
        let secret = key.secret()
            .ok_or_else(|| Error::InvalidOperation(
                "Key material of unknown algorithm cannot sign".into()))?;

        let mech = match (key.mpis(), secret.mpis()) {
            (mpi::PublicKey::RSA { n, e },
             mpi::SecretKeyMaterial::RSA { d, p, q, .. }) => Mechanism::Rsa {
                digest: Sha256::default(),
                n: n.clone(),
                e: e.clone(),
                d: d.clone(),
                p: p.clone(),
                q: q.clone(),
            },

            (mpi::PublicKey::ECDSA { curve, .. },
             mpi::SecretKeyMaterial::ECDSA { scalar }) => {
                if *curve != Curve::NistP256 {
                    return Err(Error::InvalidOperation(
                        format!("Cannot sign with ECDSA over {}", curve))
                               .into());
                }
                Mechanism::Ecdsa { scalar: scalar.clone() }
            },

            (mpi::PublicKey::EdDSA { curve, .. },
             mpi::SecretKeyMaterial::EdDSA { scalar }) => {
                if *curve != Curve::Ed25519 {
                    return Err(Error::InvalidOperation(
                        format!("Cannot sign with EdDSA over {}", curve))
                               .into());
                }
                Mechanism::EdDsa { scalar: scalar.clone() }
            },

            (mpi::PublicKey::DSA { .. }, _) =>
                return Err(Error::InvalidOperation(
                    "Generating DSA signatures is not implemented".into())
                           .into()),

            _ => return Err(Error::UnsupportedPublicKeyAlgorithm(
                key.pk_algo()).into()),
        };

        Ok(Signer {
            hash: HashAlgorithm::SHA256.context()?,
            mech,
        })
    }

    /// The hash algorithm the transcript is digested with.
    pub fn hash_algo(&self) -> HashAlgorithm {
        HashAlgorithm::SHA256
    }

    /// Writes transcript data into the signer.
    pub fn update(&mut self, data: &[u8]) {
        self.hash.update(data);
        if let Mechanism::Rsa { digest, .. } = &mut self.mech {
            use sha2::Digest;
            digest.update(data);
        }
    }

    /// Signs the accumulated transcript.
    ///
    /// Returns the first two bytes of the transcript digest (the
    /// prefix stored in the signature packet) and the signature
    /// integers.  Consumes the signer; a transcript is signed at
    /// most once.
    pub fn finalize(self) -> Result<([u8; 2], mpi::Signature)> {
        let Signer { hash, mech } = self;
        let digest = hash.into_digest();
        let prefix = [digest[0], digest[1]];

        let mpis = match mech {
            Mechanism::EdDsa { scalar } => eddsa_sign(&scalar, &digest)?,
            Mechanism::Ecdsa { scalar } => ecdsa_sign(&scalar, &digest)?,
            Mechanism::Rsa { digest: acc, n, e, d, p, q } =>
                rsa_sign(acc, &n, &e, &d, &p, &q)?,
        };

        Ok((prefix, mpis))
    }
}

impl Update for Signer {
    fn update(&mut self, data: &[u8]) {
        Signer::update(self, data);
    }
}

fn eddsa_sign(scalar: &ProtectedMPI, digest: &[u8])
              -> Result<mpi::Signature> {
    use ed25519_dalek::{SigningKey, Signer as _};

    // The stored MPI may have shed leading zero bytes; the scalar is
    // always 32 bytes wide.
    let scalar = scalar.value_padded(32)
        .ok_or_else(|| Error::MalformedMPI(
            "Ed25519 secret scalar too large".into()))?;
    let mut scalar_bytes = [0u8; 32];
    scalar_bytes.copy_from_slice(&scalar);

    let key = SigningKey::from_bytes(&scalar_bytes);
    let sig = key.sign(digest).to_bytes();
    scalar_bytes.iter_mut().for_each(|b| *b = 0);

    Ok(mpi::Signature::EdDSA {
        r: MPI::new(&sig[..32]),
        s: MPI::new(&sig[32..]),
    })
}

fn ecdsa_sign(scalar: &ProtectedMPI, digest: &[u8])
              -> Result<mpi::Signature> {
    use ecdsa::signature::hazmat::PrehashSigner;
    use p256::ecdsa::SigningKey;

    let scalar = scalar.value_padded(32)
        .ok_or_else(|| Error::MalformedMPI(
            "P-256 secret scalar too large".into()))?;

    let key = SigningKey::from_slice(&scalar)?;
    let sig: p256::ecdsa::Signature = key.sign_prehash(digest)?;
    let (r, s) = sig.split_bytes();

    Ok(mpi::Signature::ECDSA {
        r: MPI::new(&r),
        s: MPI::new(&s),
    })
}

fn rsa_sign(digest: Sha256, n: &MPI, e: &MPI, d: &ProtectedMPI,
            p: &ProtectedMPI, q: &ProtectedMPI)
            -> Result<mpi::Signature> {
    use rsa::{BigUint, RsaPrivateKey};
    use rsa::pkcs1v15::SigningKey;
    use rsa::signature::{DigestSigner, SignatureEncoding};

    let key = RsaPrivateKey::from_components(
        BigUint::from_bytes_be(n.value()),
        BigUint::from_bytes_be(e.value()),
        BigUint::from_bytes_be(d.value()),
        vec![BigUint::from_bytes_be(p.value()),
             BigUint::from_bytes_be(q.value())])?;

    let signing_key = SigningKey::<Sha256>::new(key);
    let sig = signing_key.try_sign_digest(digest)?;
    let sig = sig.to_vec();

    // An RSA signature is exactly as wide as the modulus.
    if sig.len() != n.value().len() {
        return Err(Error::InternalInconsistency(
            format!("Unexpected RSA signature length {}", sig.len())).into());
    }

    Ok(mpi::Signature::RSA {
        s: MPI::new(&sig),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::packet::key::SecretKey;
    use crate::types::PublicKeyAlgorithm;

    fn ed25519_key(scalar: &[u8], q: &[u8]) -> SecretKey {
        Key::with_secret(
            1554103728,
            PublicKeyAlgorithm::EdDSA,
            mpi::PublicKey::EdDSA {
                curve: Curve::Ed25519,
                q: MPI::new(q),
            },
            mpi::SecretKeyMaterial::EdDSA {
                scalar: MPI::new(scalar).into(),
            }).unwrap()
    }

    #[test]
    fn eddsa_signature_verifies() {
        use ed25519_dalek::{SigningKey, VerifyingKey, Signature};

        let signing_key = SigningKey::from_bytes(&[0x42; 32]);
        let vk_bytes = signing_key.verifying_key().to_bytes();

        let mut q = vec![0x40];
        q.extend_from_slice(&vk_bytes);
        let key = ed25519_key(&[0x42; 32], &q);

        let mut signer = Signer::new(&key).unwrap();
        signer.update(b"some signed transcript");
        let (prefix, mpis) = signer.finalize().unwrap();

        let mut ctx = HashAlgorithm::SHA256.context().unwrap();
        ctx.update(b"some signed transcript");
        let digest = ctx.into_digest();
        assert_eq!(prefix, [digest[0], digest[1]]);

        let (r, s) = match mpis {
            mpi::Signature::EdDSA { r, s } => (r, s),
            mpis => panic!("expected EdDSA mpis, got {:?}", mpis),
        };
        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(&r.value_padded(32).unwrap());
        sig[32..].copy_from_slice(&s.value_padded(32).unwrap());

        let vk = VerifyingKey::from_bytes(&vk_bytes).unwrap();
        assert!(vk.verify_strict(&digest, &Signature::from_bytes(&sig))
                .is_ok());
    }

    #[test]
    fn ecdsa_signature_verifies() {
        use ecdsa::signature::hazmat::PrehashVerifier;
        use p256::ecdsa::{Signature, SigningKey};

        let scalar = [0x17; 32];
        let signing_key = SigningKey::from_slice(&scalar).unwrap();
        let verifying_key = *signing_key.verifying_key();

        let q = verifying_key.to_encoded_point(false);
        let key: SecretKey = Key::with_secret(
            1554103728,
            PublicKeyAlgorithm::ECDSA,
            mpi::PublicKey::ECDSA {
                curve: Curve::NistP256,
                q: MPI::new(q.as_bytes()),
            },
            mpi::SecretKeyMaterial::ECDSA {
                scalar: MPI::new(&scalar).into(),
            }).unwrap();

        let mut signer = Signer::new(&key).unwrap();
        signer.update(b"some signed transcript");
        let (_prefix, mpis) = signer.finalize().unwrap();

        let (r, s) = match mpis {
            mpi::Signature::ECDSA { r, s } => (r, s),
            mpis => panic!("expected ECDSA mpis, got {:?}", mpis),
        };
        let mut sig = [0u8; 64];
        sig[..32].copy_from_slice(&r.value_padded(32).unwrap());
        sig[32..].copy_from_slice(&s.value_padded(32).unwrap());

        let mut ctx = HashAlgorithm::SHA256.context().unwrap();
        ctx.update(b"some signed transcript");
        let digest = ctx.into_digest();

        let sig = Signature::from_slice(&sig).unwrap();
        assert!(verifying_key.verify_prehash(&digest, &sig).is_ok());
    }

    #[test]
    fn rsa_signature_verifies() {
        use rsa::RsaPrivateKey;
        use rsa::pkcs1v15::{Signature, VerifyingKey};
        use rsa::signature::{DigestVerifier, SignatureEncoding};
        use rsa::traits::{PrivateKeyParts, PublicKeyParts};
        use sha2::Digest;

        let mut rng = rand::rngs::OsRng;
        let private = RsaPrivateKey::new(&mut rng, 1024).unwrap();

        let key: SecretKey = Key::with_secret(
            1554103728,
            PublicKeyAlgorithm::RSAEncryptSign,
            mpi::PublicKey::RSA {
                n: MPI::new(&private.n().to_bytes_be()),
                e: MPI::new(&private.e().to_bytes_be()),
            },
            mpi::SecretKeyMaterial::RSA {
                d: MPI::new(&private.d().to_bytes_be()).into(),
                p: MPI::new(&private.primes()[0].to_bytes_be()).into(),
                q: MPI::new(&private.primes()[1].to_bytes_be()).into(),
                // p^-1 mod q plays no role when signing.
                u: MPI::new(&[1]).into(),
            }).unwrap();

        let mut signer = Signer::new(&key).unwrap();
        signer.update(b"some signed transcript");
        let (prefix, mpis) = signer.finalize().unwrap();

        let s = match mpis {
            mpi::Signature::RSA { s } => s,
            mpis => panic!("expected RSA mpis, got {:?}", mpis),
        };

        let mut digest = Sha256::default();
        digest.update(b"some signed transcript");
        let full = digest.clone().finalize();
        assert_eq!(prefix, [full[0], full[1]]);

        let vk = VerifyingKey::<Sha256>::new(private.to_public_key());
        let sig = Signature::try_from(s.value_padded(
            private.n().to_bytes_be().len()).unwrap().as_slice()).unwrap();
        assert!(vk.verify_digest(digest, &sig).is_ok());
        assert_eq!(sig.to_vec().len(), 128);
    }

    #[test]
    fn dsa_signing_refuses() {
        let key: SecretKey = Key::with_secret(
            1554103728,
            PublicKeyAlgorithm::DSA,
            mpi::PublicKey::DSA {
                p: MPI::new(&[7]),
                q: MPI::new(&[5]),
                g: MPI::new(&[2]),
                y: MPI::new(&[4]),
            },
            mpi::SecretKeyMaterial::DSA {
                x: MPI::new(&[3]).into(),
            }).unwrap();

        assert!(Signer::new(&key).is_err());
    }

    #[test]
    fn eddsa_on_wrong_curve_refuses() {
        let key: SecretKey = Key::with_secret(
            1554103728,
            PublicKeyAlgorithm::EdDSA,
            mpi::PublicKey::EdDSA {
                curve: Curve::Cv25519,
                q: MPI::new(&[0x40; 33]),
            },
            mpi::SecretKeyMaterial::EdDSA {
                scalar: MPI::new(&[1; 32]).into(),
            }).unwrap();

        assert!(Signer::new(&key).is_err());
    }
}
