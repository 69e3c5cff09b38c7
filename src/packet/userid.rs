use std::fmt;

use crate::crypto::hash::{Hash, Update};

/// Holds a UserID packet.
///
/// The standard imposes no structure on the value; by convention it
/// is a UTF-8 encoded [RFC 2822] mailbox like `Anne Onymous
/// <anonymous@example.org>`, but this crate stores whatever bytes
/// were on the wire.
///
/// See [Section 5.11 of RFC 4880] for details.
///
///   [RFC 2822]: https://tools.ietf.org/html/rfc2822
///   [Section 5.11 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-5.11
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserID {
    /// The user id.
    value: Box<[u8]>,
}

impl UserID {
    /// Gets the user ID packet's value.
    pub fn value(&self) -> &[u8] {
        &self.value
    }
}

impl From<Vec<u8>> for UserID {
    fn from(u: Vec<u8>) -> Self {
        UserID {
            value: u.into_boxed_slice(),
        }
    }
}

impl From<&[u8]> for UserID {
    fn from(u: &[u8]) -> Self {
        u.to_vec().into()
    }
}

impl From<&str> for UserID {
    fn from(u: &str) -> Self {
        u.as_bytes().into()
    }
}

impl From<String> for UserID {
    fn from(u: String) -> Self {
        u.into_bytes().into()
    }
}

impl fmt::Display for UserID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.value))
    }
}

impl fmt::Debug for UserID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_tuple("UserID")
            .field(&String::from_utf8_lossy(&self.value))
            .finish()
    }
}

impl Hash for UserID {
    /// Update the Hash with a hash of the user id.
    ///
    /// When a user id enters a certification transcript it is
    /// prefixed with the constant `0xB4` and its length as a
    /// four-octet number.
    fn hash(&self, hash: &mut dyn Update) {
        hash.update(&[0xb4]);
        hash.update(&(self.value.len() as u32).to_be_bytes());
        hash.update(&self.value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn value_is_raw_bytes() {
        let uid = UserID::from("Anne Onymous <anonymous@example.org>");
        assert_eq!(uid.value().len(), 36);
        assert_eq!(uid.to_string(),
                   "Anne Onymous <anonymous@example.org>");
    }

    #[test]
    fn hash_framing() {
        struct Sink(Vec<u8>);
        impl Update for Sink {
            fn update(&mut self, data: &[u8]) {
                self.0.extend_from_slice(data);
            }
        }

        let uid = UserID::from("ab");
        let mut sink = Sink(Vec::new());
        uid.hash(&mut sink);
        assert_eq!(sink.0, &[0xb4, 0, 0, 0, 2, b'a', b'b']);
    }
}
