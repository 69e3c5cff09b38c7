//! Packet-related types.
//!
//! OpenPGP data is organized as a sequence of packets
//! ([Section 4 of RFC 4880]).  This module contains the packet
//! bodies this crate understands: keys, user ids, and signatures,
//! plus the `Unknown` catchall.  The [`Packet`] enum tying them
//! together lives at the crate root.
//!
//! [Section 4 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4
//! [`Packet`]: super::Packet

mod tag;
pub use self::tag::Tag;

pub mod key;
pub use self::key::Key;

pub mod signature;
pub use self::signature::Signature;
pub use self::signature::subpacket;

mod userid;
pub use self::userid::UserID;

mod unknown;
pub use self::unknown::Unknown;
