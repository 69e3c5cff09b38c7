//! Memory protection.

use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::ops::{Deref, DerefMut};

/// Protected memory.
///
/// The memory backing a `Protected` is locked against being paged
/// out where the platform supports it, and is zeroed when the object
/// is dropped.  Cloning re-protects the copy; the discipline follows
/// the value around.
pub struct Protected(Box<[u8]>);

impl Protected {
    /// Returns the inner bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl Clone for Protected {
    fn clone(&self) -> Self {
        Protected::from(&self.0[..])
    }
}

impl PartialEq for Protected {
    fn eq(&self, other: &Self) -> bool {
        secure_cmp(&self.0, &other.0) == Ordering::Equal
    }
}

impl Eq for Protected {}

impl Hash for Protected {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}

impl Deref for Protected {
    type Target = [u8];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl DerefMut for Protected {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl AsRef<[u8]> for Protected {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Protected {
    fn from(v: Vec<u8>) -> Self {
        Protected::from(v.into_boxed_slice())
    }
}

impl From<Box<[u8]>> for Protected {
    fn from(mut v: Box<[u8]>) -> Self {
        if !v.is_empty() {
            unsafe {
                memsec::mlock(v.as_mut_ptr(), v.len());
            }
        }
        Protected(v)
    }
}

impl From<&[u8]> for Protected {
    fn from(v: &[u8]) -> Self {
        Vec::from(v).into()
    }
}

impl Drop for Protected {
    fn drop(&mut self) {
        if !self.0.is_empty() {
            unsafe {
                memsec::memzero(self.0.as_mut_ptr(), self.0.len());
                memsec::munlock(self.0.as_mut_ptr(), self.0.len());
            }
        }
    }
}

impl fmt::Debug for Protected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if cfg!(debug_assertions) {
            write!(f, "{:?}", self.0)
        } else {
            f.write_str("[<Redacted>]")
        }
    }
}

/// Time-constant comparison.
pub fn secure_cmp(a: &[u8], b: &[u8]) -> Ordering {
    let cmp = unsafe {
        if a.len() == b.len() {
            memsec::memcmp(a.as_ptr(), b.as_ptr(), a.len())
        } else {
            a.len() as i32 - b.len() as i32
        }
    };

    match cmp {
        0 => Ordering::Equal,
        x if x < 0 => Ordering::Less,
        _ => Ordering::Greater,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn protected_compares_by_content() {
        let a: Protected = vec![1, 2, 3].into();
        let b: Protected = vec![1, 2, 3].into();
        let c: Protected = vec![1, 2, 4].into();
        assert_eq!(a, b);
        assert!(a != c);
        assert_eq!(a.clone(), b);
    }

    #[test]
    fn empty_protected() {
        let a: Protected = Vec::new().into();
        assert_eq!(a.as_bytes(), &[]);
        drop(a);
    }
}
