use crate::packet::Tag;

/// Holds an unknown packet.
///
/// This is used by the parser to hold packets that it doesn't
/// understand: either the tag itself is unassigned, or the body uses
/// an unsupported version.  Keeping them around preserves the
/// information for inspection; an `Unknown` packet is a read-only
/// state and refuses to be encoded.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Unknown {
    /// Packet tag.
    tag: Tag,
    /// The undecoded body.
    body: Box<[u8]>,
}

impl Unknown {
    /// Returns a new `Unknown` packet.
    pub fn new(tag: Tag, body: Vec<u8>) -> Self {
        Unknown {
            tag,
            body: body.into_boxed_slice(),
        }
    }

    /// Gets the unknown packet's tag.
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Gets the unknown packet's body.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}
