//! Multiprecision Integers.

use std::fmt;

#[cfg(test)]
use quickcheck::{Arbitrary, Gen};

use crate::crypto::hash::{Hash, Update};
use crate::crypto::mem::Protected;
use crate::types::{
    Curve,
    HashAlgorithm,
    SymmetricAlgorithm,
};

/// Holds a single MPI.
///
/// The integer is stored as its minimal big-endian magnitude: the
/// leading byte, if any, is non-zero, and the encoded bit length is
/// the position of its highest set bit.  Zero is the empty
/// magnitude.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MPI {
    /// Integer value as big-endian.
    value: Box<[u8]>,
}

impl MPI {
    /// Creates a new MPI.
    ///
    /// This function takes care of leading zeros.
    pub fn new(value: &[u8]) -> Self {
        let mut offset = 0;
        while value.get(offset) == Some(&0) {
            offset += 1;
        }

        MPI {
            value: Vec::from(&value[offset..]).into_boxed_slice(),
        }
    }

    /// Returns the length of the MPI in bits.
    pub fn bits(&self) -> usize {
        self.value.len() * 8
            - self.value.first().map(|&b| b.leading_zeros() as usize)
                  .unwrap_or(0)
    }

    /// Returns the value of this MPI.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns the value of this MPI zero-padded to the given width.
    ///
    /// Returns `None` if the magnitude does not fit.  Useful to
    /// recover the fixed-width scalars and points of the elliptic
    /// curve algorithms, which may have shed leading zero bytes when
    /// stored.
    pub fn value_padded(&self, to: usize) -> Option<Vec<u8>> {
        if self.value.len() > to {
            return None;
        }

        let mut padded = vec![0; to];
        padded[to - self.value.len()..].copy_from_slice(&self.value);
        Some(padded)
    }
}

impl From<Vec<u8>> for MPI {
    fn from(v: Vec<u8>) -> Self {
        Self::new(&v)
    }
}

impl fmt::Debug for MPI {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_fmt(format_args!(
            "{} bits: {}", self.bits(),
            self.value.iter().map(|b| format!("{:02X} ", b))
                .collect::<String>()))
    }
}

impl Hash for MPI {
    /// Update the Hash with a hash of the MPI.
    fn hash(&self, hash: &mut dyn Update) {
        let len = self.bits() as u16;

        hash.update(&len.to_be_bytes());
        hash.update(&self.value);
    }
}

#[cfg(test)]
impl Arbitrary for MPI {
    fn arbitrary(g: &mut Gen) -> Self {
        loop {
            let buf = <Vec<u8>>::arbitrary(g);

            if !buf.is_empty() && buf[0] != 0 {
                break MPI::new(&buf);
            }
        }
    }
}

/// Holds a single MPI containing secrets.
///
/// The memory is locked and will be cleared when the object is
/// dropped.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ProtectedMPI {
    /// Integer value as big-endian.
    value: Protected,
}

impl From<Vec<u8>> for ProtectedMPI {
    fn from(m: Vec<u8>) -> Self {
        MPI::from(m).into()
    }
}

impl From<Protected> for ProtectedMPI {
    fn from(m: Protected) -> Self {
        MPI::new(&m).into()
    }
}

impl From<MPI> for ProtectedMPI {
    fn from(m: MPI) -> Self {
        ProtectedMPI {
            value: m.value.into(),
        }
    }
}

impl ProtectedMPI {
    /// Returns the length of the MPI in bits.
    pub fn bits(&self) -> usize {
        self.value.len() * 8
            - self.value.first().map(|&b| b.leading_zeros() as usize)
                  .unwrap_or(0)
    }

    /// Returns the value of this MPI.
    pub fn value(&self) -> &[u8] {
        &self.value
    }

    /// Returns the value of this MPI zero-padded to the given width,
    /// in protected memory.
    pub fn value_padded(&self, to: usize) -> Option<Protected> {
        if self.value.len() > to {
            return None;
        }

        let mut padded: Protected = vec![0; to].into();
        padded[to - self.value.len()..].copy_from_slice(&self.value);
        Some(padded)
    }
}

impl fmt::Debug for ProtectedMPI {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if cfg!(debug_assertions) {
            f.write_fmt(format_args!(
                "{} bits: {}", self.bits(),
                self.value.iter().map(|b| format!("{:02X} ", b))
                    .collect::<String>()))
        } else {
            f.write_str("<Redacted>")
        }
    }
}

/// Holds a public key.
///
/// Provides a typed and structured way of storing multiple MPIs (and
/// the occasional elliptic curve) in packets.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum PublicKey {
    /// RSA public key.
    RSA {
        /// Public exponent.
        e: MPI,
        /// Public modulo N = pq.
        n: MPI,
    },

    /// NIST DSA public key.
    DSA {
        /// Prime of the ring Zp.
        p: MPI,
        /// Order of `g` in Zp.
        q: MPI,
        /// Public generator of Zp.
        g: MPI,
        /// Public key g^x mod p.
        y: MPI,
    },

    /// Elgamal public key.
    Elgamal {
        /// Prime of the ring Zp.
        p: MPI,
        /// Generator of Zp.
        g: MPI,
        /// Public key g^x mod p.
        y: MPI,
    },

    /// DJB's "Twisted" Edwards curve DSA public key.
    EdDSA {
        /// Curve we're using.  Must be curve 25519.
        curve: Curve,
        /// Public point.
        q: MPI,
    },

    /// NIST's Elliptic curve DSA public key.
    ECDSA {
        /// Curve we're using.
        curve: Curve,
        /// Public point.
        q: MPI,
    },

    /// Elliptic curve Elgamal public key.
    ECDH {
        /// Curve we're using.
        curve: Curve,
        /// Public point.
        q: MPI,
        /// Hash algorithm used for key derivation.
        hash: HashAlgorithm,
        /// Algorithm used with the derived key.
        sym: SymmetricAlgorithm,
    },

    /// Key material for an unknown algorithm.
    ///
    /// This is a read-only state; such a key refuses to be encoded.
    Unknown {
        /// The raw key material.
        rest: Box<[u8]>,
    },
}

impl Hash for PublicKey {
    /// Update the Hash with a hash of the MPIs.
    fn hash(&self, hash: &mut dyn Update) {
        use self::PublicKey::*;
        match self {
            RSA { e, n } => {
                n.hash(hash);
                e.hash(hash);
            },
            DSA { p, q, g, y } => {
                p.hash(hash);
                q.hash(hash);
                g.hash(hash);
                y.hash(hash);
            },
            Elgamal { p, g, y } => {
                p.hash(hash);
                g.hash(hash);
                y.hash(hash);
            },
            EdDSA { curve, q } | ECDSA { curve, q } => {
                hash.update(&[curve.oid().len() as u8]);
                hash.update(curve.oid());
                q.hash(hash);
            },
            ECDH { curve, q, hash: h, sym } => {
                hash.update(&[curve.oid().len() as u8]);
                hash.update(curve.oid());
                q.hash(hash);
                hash.update(&[3, 1, u8::from(*h), u8::from(*sym)]);
            },
            Unknown { rest } => {
                hash.update(rest);
            },
        }
    }
}

#[cfg(test)]
impl Arbitrary for PublicKey {
    fn arbitrary(g: &mut Gen) -> Self {
        use self::PublicKey::*;
        match u8::arbitrary(g) % 6 {
            0 => RSA {
                e: MPI::arbitrary(g),
                n: MPI::arbitrary(g),
            },

            1 => DSA {
                p: MPI::arbitrary(g),
                q: MPI::arbitrary(g),
                g: MPI::arbitrary(g),
                y: MPI::arbitrary(g),
            },

            2 => Elgamal {
                p: MPI::arbitrary(g),
                g: MPI::arbitrary(g),
                y: MPI::arbitrary(g),
            },

            3 => EdDSA {
                curve: Curve::arbitrary(g),
                q: MPI::arbitrary(g),
            },

            4 => ECDSA {
                curve: Curve::arbitrary(g),
                q: MPI::arbitrary(g),
            },

            5 => ECDH {
                curve: Curve::arbitrary(g),
                q: MPI::arbitrary(g),
                hash: HashAlgorithm::arbitrary(g),
                sym: SymmetricAlgorithm::arbitrary(g),
            },

            _ => unreachable!(),
        }
    }
}

/// Holds secret key material.
///
/// Provides a typed and structured way of storing multiple MPIs in
/// packets.  The integers live in protected memory.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum SecretKeyMaterial {
    /// RSA secret key.
    RSA {
        /// Secret exponent, inverse of e in Phi(N).
        d: ProtectedMPI,
        /// Larger secret prime.
        p: ProtectedMPI,
        /// Smaller secret prime.
        q: ProtectedMPI,
        /// Inverse of p mod q.
        u: ProtectedMPI,
    },

    /// NIST DSA secret key.
    DSA {
        /// Secret key log_g(y) in Zp.
        x: ProtectedMPI,
    },

    /// Elgamal secret key.
    Elgamal {
        /// Secret key log_g(y) in Zp.
        x: ProtectedMPI,
    },

    /// DJB's "Twisted" Edwards curve DSA secret key.
    EdDSA {
        /// Secret scalar.
        scalar: ProtectedMPI,
    },

    /// NIST's Elliptic curve DSA secret key.
    ECDSA {
        /// Secret scalar.
        scalar: ProtectedMPI,
    },

    /// Elliptic curve Elgamal secret key.
    ECDH {
        /// Secret scalar.
        scalar: ProtectedMPI,
    },

    /// Key material for an unknown algorithm.
    ///
    /// This is a read-only state; such a key refuses to be encoded.
    Unknown {
        /// The raw key material.
        rest: Protected,
    },
}

#[cfg(test)]
impl Arbitrary for SecretKeyMaterial {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 6 {
            0 => SecretKeyMaterial::RSA {
                d: MPI::arbitrary(g).into(),
                p: MPI::arbitrary(g).into(),
                q: MPI::arbitrary(g).into(),
                u: MPI::arbitrary(g).into(),
            },

            1 => SecretKeyMaterial::DSA {
                x: MPI::arbitrary(g).into(),
            },

            2 => SecretKeyMaterial::Elgamal {
                x: MPI::arbitrary(g).into(),
            },

            3 => SecretKeyMaterial::EdDSA {
                scalar: MPI::arbitrary(g).into(),
            },

            4 => SecretKeyMaterial::ECDSA {
                scalar: MPI::arbitrary(g).into(),
            },

            5 => SecretKeyMaterial::ECDH {
                scalar: MPI::arbitrary(g).into(),
            },

            _ => unreachable!(),
        }
    }
}

/// Holds a signature.
///
/// Provides a typed and structured way of storing multiple MPIs in
/// packets.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
#[non_exhaustive]
pub enum Signature {
    /// RSA signature.
    RSA {
        /// Signature m^d mod N.
        s: MPI,
    },

    /// NIST's DSA signature.
    DSA {
        /// `r` value.
        r: MPI,
        /// `s` value.
        s: MPI,
    },

    /// DJB's "Twisted" Edwards curve DSA signature.
    EdDSA {
        /// `r` value.
        r: MPI,
        /// `s` value.
        s: MPI,
    },

    /// NIST's Elliptic curve DSA signature.
    ECDSA {
        /// `r` value.
        r: MPI,
        /// `s` value.
        s: MPI,
    },

    /// Signature material for an unknown algorithm.
    ///
    /// This is a read-only state; such a signature refuses to be
    /// encoded.
    Unknown {
        /// The raw signature material.
        rest: Box<[u8]>,
    },
}

#[cfg(test)]
impl Arbitrary for Signature {
    fn arbitrary(g: &mut Gen) -> Self {
        match u8::arbitrary(g) % 4 {
            0 => Signature::RSA {
                s: MPI::arbitrary(g),
            },

            1 => Signature::DSA {
                r: MPI::arbitrary(g),
                s: MPI::arbitrary(g),
            },

            2 => Signature::EdDSA {
                r: MPI::arbitrary(g),
                s: MPI::arbitrary(g),
            },

            3 => Signature::ECDSA {
                r: MPI::arbitrary(g),
                s: MPI::arbitrary(g),
            },

            _ => unreachable!(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::Parse;
    use crate::serialize::Marshal;
    use crate::wire::Decoder;

    #[test]
    fn mpi_strips_leading_zeros() {
        let mpi = MPI::new(&[0x00, 0x00, 0x7f, 0xff]);
        assert_eq!(mpi.value(), &[0x7f, 0xff]);
        assert_eq!(mpi.bits(), 15);
        assert_eq!(mpi.to_vec().unwrap(), &[0x00, 0x0f, 0x7f, 0xff]);
    }

    #[test]
    fn mpi_zero() {
        let mpi = MPI::new(&[0x00, 0x00]);
        assert_eq!(mpi.value(), &[]);
        assert_eq!(mpi.bits(), 0);
        assert_eq!(mpi.to_vec().unwrap(), &[0x00, 0x00]);
        assert_eq!(MPI::from_bytes(&[0x00, 0x00]).unwrap(), mpi);
    }

    #[test]
    fn mpi_padding() {
        let mpi = MPI::new(&[0x01, 0x02]);
        assert_eq!(mpi.value_padded(4).unwrap(), &[0, 0, 1, 2]);
        assert!(mpi.value_padded(1).is_none());
    }

    quickcheck::quickcheck! {
        fn mpi_roundtrip(mpi: MPI) -> bool {
            let buf = mpi.to_vec().unwrap();
            let mut dec = Decoder::new(&buf);
            MPI::parse(&mut dec).unwrap() == mpi
        }
    }

    quickcheck::quickcheck! {
        fn hashing_matches_serialization(pk: PublicKey) -> bool {
            // The transcript framing of key material is its
            // serialized form.
            struct Sink(Vec<u8>);
            impl Update for Sink {
                fn update(&mut self, data: &[u8]) {
                    self.0.extend_from_slice(data);
                }
            }

            let mut sink = Sink(Vec::new());
            pk.hash(&mut sink);
            sink.0 == pk.to_vec().unwrap()
        }
    }

    quickcheck::quickcheck! {
        fn mpi_bit_length(mpi: MPI) -> bool {
            match mpi.value().first() {
                Some(&b) => b != 0
                    && mpi.bits()
                        == 8 * mpi.value().len() - b.leading_zeros() as usize,
                None => mpi.bits() == 0,
            }
        }
    }
}
