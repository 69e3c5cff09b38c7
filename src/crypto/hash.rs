//! Functionality to hash packets, and generate hashes.

use digest::DynDigest;

use crate::Error;
use crate::Result;
use crate::types::HashAlgorithm;

/// A sink accepting the byte stream of a hashed transcript.
///
/// Both plain hash [`Context`]s and the algorithm-specific
/// [`Signer`]s accept transcript bytes through this trait, so the
/// framing rules below can feed either.
///
/// [`Signer`]: super::Signer
pub trait Update {
    /// Writes data into the sink.
    fn update(&mut self, data: &[u8]);
}

/// State of a hash function.
pub struct Context {
    algo: HashAlgorithm,
    ctx: Box<dyn DynDigest>,
}

impl Context {
    /// Returns the algorithm.
    pub fn algo(&self) -> HashAlgorithm {
        self.algo
    }

    /// Size of the digest in bytes.
    pub fn digest_size(&self) -> usize {
        self.ctx.output_size()
    }

    /// Writes data into the hash function.
    pub fn update<D: AsRef<[u8]>>(&mut self, data: D) {
        self.ctx.update(data.as_ref());
    }

    /// Finalizes the hash function and returns the digest.
    pub fn into_digest(self) -> Vec<u8> {
        self.ctx.finalize().into_vec()
    }
}

impl Update for Context {
    fn update(&mut self, data: &[u8]) {
        self.ctx.update(data);
    }
}

impl std::io::Write for Context {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.ctx.update(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Newtype around [`sha1collisiondetection::Sha1CD`] bridging it to
/// [`DynDigest`].
///
/// `Sha1CD` implements `FixedOutput` and `Reset` separately, but not
/// the combined `FixedOutputReset` that `DynDigest` requires.  Since
/// neither the trait nor the type live in this crate, the orphan
/// rules prevent implementing it directly on `Sha1CD`; this wrapper
/// delegates to `Sha1CD::finalize_reset_cd`, which already provides
/// finalize-and-reset semantics.
#[derive(Clone, Default)]
struct Sha1CDDigest(sha1collisiondetection::Sha1CD);

impl digest::Update for Sha1CDDigest {
    fn update(&mut self, data: &[u8]) {
        self.0.update(data);
    }
}

impl digest::OutputSizeUser for Sha1CDDigest {
    type OutputSize = digest::generic_array::typenum::consts::U20;
}

impl digest::Reset for Sha1CDDigest {
    fn reset(&mut self) {
        self.0.reset();
    }
}

impl digest::FixedOutput for Sha1CDDigest {
    fn finalize_into(self, out: &mut digest::Output<Self>) {
        let mut inner = self.0;
        let _ = inner.finalize_into_dirty_cd(out);
    }
}

impl digest::FixedOutputReset for Sha1CDDigest {
    fn finalize_into_reset(&mut self, out: &mut digest::Output<Self>) {
        let _ = self.0.finalize_reset_cd().map(|digest| out.copy_from_slice(&digest));
    }
}

impl digest::HashMarker for Sha1CDDigest {}

impl HashAlgorithm {
    /// Whether this crate supports this algorithm.
    pub fn is_supported(self) -> bool {
        matches!(self,
                 HashAlgorithm::SHA1
                 | HashAlgorithm::SHA224
                 | HashAlgorithm::SHA256
                 | HashAlgorithm::SHA384
                 | HashAlgorithm::SHA512)
    }

    /// Creates a new hash context for this algorithm.
    ///
    /// # Errors
    ///
    /// Fails with `Error::UnsupportedHashAlgorithm` if this crate
    /// does not support this algorithm.  See
    /// [`HashAlgorithm::is_supported`].
    pub fn context(self) -> Result<Context> {
        use sha2::{Sha224, Sha256, Sha384, Sha512};

        let ctx: Box<dyn DynDigest> = match self {
            HashAlgorithm::SHA1 => Box::<Sha1CDDigest>::default(),
            HashAlgorithm::SHA224 => Box::<Sha224>::default(),
            HashAlgorithm::SHA256 => Box::<Sha256>::default(),
            HashAlgorithm::SHA384 => Box::<Sha384>::default(),
            HashAlgorithm::SHA512 => Box::<Sha512>::default(),
            _ => return Err(Error::UnsupportedHashAlgorithm(self).into()),
        };

        Ok(Context { algo: self, ctx })
    }
}

/// Hashes OpenPGP packets and related types.
///
/// The framing rules for each type are defined in [Section 5.2.4 of
/// RFC 4880].
///
///   [Section 5.2.4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.2.4
pub trait Hash {
    /// Updates the given hash with this object.
    fn hash(&self, hash: &mut dyn Update);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hex(data: &[u8]) -> String {
        data.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn sha1_empty() {
        let ctx = HashAlgorithm::SHA1.context().unwrap();
        assert_eq!(ctx.digest_size(), 20);
        assert_eq!(hex(&ctx.into_digest()),
                   "da39a3ee5e6b4b0d3255bfef95601890afd80709");
    }

    #[test]
    fn sha256_abc() {
        let mut ctx = HashAlgorithm::SHA256.context().unwrap();
        assert_eq!(ctx.digest_size(), 32);
        ctx.update(b"ab");
        ctx.update(b"c");
        assert_eq!(hex(&ctx.into_digest()),
                   "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn unsupported_algorithms() {
        assert!(!HashAlgorithm::MD5.is_supported());
        assert!(HashAlgorithm::MD5.context().is_err());
        assert!(HashAlgorithm::RipeMD.context().is_err());
        assert!(HashAlgorithm::Unknown(111).context().is_err());
    }
}
