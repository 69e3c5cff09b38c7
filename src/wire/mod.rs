//! The bit-granular wire codec.
//!
//! OpenPGP's framing is big-endian and mostly byte-oriented, but the
//! packet header packs the format flag, tag, and length type into
//! single bytes.  The [`Decoder`] and [`Encoder`] therefore track a
//! sub-byte read/write position, and the fixed-width number
//! operations know how to merge with a partially consumed byte.
//!
//! This module also implements the variable-length "new format"
//! length prefix of [Section 4.2.2 of RFC 4880].
//!
//! [Section 4.2.2 of RFC 4880]: https://tools.ietf.org/html/rfc4880#section-4.2.2

mod decoder;
mod encoder;

pub use decoder::Decoder;
pub use encoder::Encoder;

use crate::{
    Error,
    Result,
};

/// Returns the number of bytes a variable-length prefix occupies.
///
/// The encoding uses one byte for values below 192, two bytes up to
/// 8383, and five bytes beyond that.
pub fn varlen_len(value: u32) -> usize {
    if value < 192 {
        1
    } else if value < 8384 {
        2
    } else {
        5
    }
}

/// Reads a variable-length prefix.
///
/// The two-octet range 224..=254 introduces a partial body length,
/// which this crate does not support.
pub fn parse_varlen(dec: &mut Decoder) -> Result<u32> {
    let first = dec.peek_u8()?;
    if first < 192 {
        Ok(dec.extract_u8()? as u32)
    } else if first < 224 {
        // Two octets; mask the upper two bits and add 192.
        Ok((dec.extract_u16()? as u32 & 0x3fff) + 192)
    } else if first == 255 {
        let _ = dec.extract_u8()?;
        dec.extract_u32()
    } else {
        Err(Error::MalformedPacket(
            "Partial body lengths are not supported".into()).into())
    }
}

/// Writes a variable-length prefix.
pub fn write_varlen(enc: &mut Encoder, value: u32) -> Result<()> {
    if value < 192 {
        enc.write_u8(value as u8)
    } else if value < 8384 {
        // Set the two most significant bits and subtract 192.
        enc.write_u16(0xc000 | (value - 192) as u16)
    } else {
        enc.write_u8(0xff)?;
        enc.write_u32(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roundtrip(value: u32) -> Vec<u8> {
        let mut buf = vec![0; varlen_len(value)];
        let mut enc = Encoder::new(&mut buf);
        write_varlen(&mut enc, value).unwrap();
        assert_eq!(enc.position(), buf.len());

        let mut dec = Decoder::new(&buf);
        assert_eq!(parse_varlen(&mut dec).unwrap(), value);
        assert!(dec.is_empty());
        buf
    }

    #[test]
    fn varlen_one_octet_boundary() {
        assert_eq!(roundtrip(0), [0x00]);
        assert_eq!(roundtrip(191), [0xbf]);
    }

    #[test]
    fn varlen_two_octet_boundary() {
        assert_eq!(roundtrip(192), [0xc0, 0x00]);
        assert_eq!(roundtrip(8383), [0xdf, 0xff]);
    }

    #[test]
    fn varlen_five_octet_boundary() {
        assert_eq!(roundtrip(8384), [0xff, 0x00, 0x00, 0x20, 0xc0]);
        assert_eq!(roundtrip(u32::MAX), [0xff, 0xff, 0xff, 0xff, 0xff]);
    }

    #[test]
    fn varlen_rejects_partial_body_lengths() {
        for first in 224..=254u8 {
            let buf = [first, 0, 0, 0, 0];
            let mut dec = Decoder::new(&buf[..]);
            assert!(parse_varlen(&mut dec).is_err());
        }
    }

    quickcheck::quickcheck! {
        fn varlen_roundtrip(value: u32) -> bool {
            let buf = roundtrip(value);
            matches!(buf.len(), 1 | 2 | 5)
        }
    }
}
