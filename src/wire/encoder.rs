//! Writing the encoded wire format.

use crate::{
    Error,
    Result,
};

/// Writes the encoded wire format used in RFC 4880 into a
/// pre-allocated range of bytes.
///
/// Like the [`Decoder`], the encoder tracks a sub-byte position:
/// bits queued with [`insert_bits`] accumulate in a staging byte
/// that is written out once full, and a fixed-width number written
/// while bits are queued is merged with them.
///
/// [`Decoder`]: super::Decoder
/// [`insert_bits`]: Encoder::insert_bits
#[derive(Debug)]
pub struct Encoder<'a> {
    /// The range to encode to.
    data: &'a mut [u8],
    /// Number of bytes written.
    position: usize,
    /// The byte we are currently filling bit by bit.
    current: u8,
    /// Number of bits of `current` that are filled.
    skip_bits: u8,
}

impl<'a> Encoder<'a> {
    /// Creates an encoder writing to the given range.
    pub fn new(data: &'a mut [u8]) -> Self {
        Encoder { data, position: 0, current: 0, skip_bits: 0 }
    }

    /// Retrieves the number of encoded bytes.
    ///
    /// A partially filled staging byte does not count until it is
    /// flushed.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Flushes the encoder, so any partially written byte is written
    /// out.  Note that after this operation, bit-wise operations
    /// start at the beginning of a byte again.
    pub fn flush(&mut self) -> Result<()> {
        if self.skip_bits > 0 {
            if self.position >= self.data.len() {
                return Err(Error::OutOfRange(
                    "Buffer too small for flushing staged bits".into()).into());
            }
            self.data[self.position] = self.current;
            self.position += 1;
            self.current = 0;
            self.skip_bits = 0;
        }
        Ok(())
    }

    /// Inserts one or more bits, packed MSB-first.
    ///
    /// `value` must fit in `count` bits, and the write may not cross
    /// a byte boundary.
    pub fn insert_bits(&mut self, count: usize, value: u8) -> Result<()> {
        if count < 1 || count > 8 || u32::from(value) > (1u32 << count) - 1 {
            return Err(Error::InvalidValue(
                format!("Cannot encode value {} in {} bits", value, count))
                       .into());
        }
        if count + self.skip_bits as usize > 8 {
            return Err(Error::InvalidValue(
                "Bit-wise write may not cross byte boundaries".into()).into());
        }
        if self.position >= self.data.len() {
            return Err(Error::OutOfRange(
                "Buffer too small for inserting bits".into()).into());
        }

        // Shift the value up against the already-queued bits.
        self.current |= value << (8 - self.skip_bits as usize - count);

        if count + self.skip_bits as usize == 8 {
            self.data[self.position] = self.current;
            self.position += 1;
            self.current = 0;
            self.skip_bits = 0;
        } else {
            self.skip_bits += count as u8;
        }

        Ok(())
    }

    /// Writes a big-endian `u8`, merging any queued bits into the
    /// top of the value.
    pub fn write_u8(&mut self, value: u8) -> Result<()> {
        let merged = self.merge(value, u8::MAX)?;
        self.write_be(&merged.to_be_bytes())
    }

    /// Writes a big-endian `u16`, merging any queued bits into the
    /// top of the value.
    pub fn write_u16(&mut self, value: u16) -> Result<()> {
        let merged = self.merge(value, u16::MAX)?;
        self.write_be(&merged.to_be_bytes())
    }

    /// Writes a big-endian `u32`, merging any queued bits into the
    /// top of the value.
    pub fn write_u32(&mut self, value: u32) -> Result<()> {
        let merged = self.merge(value, u32::MAX)?;
        self.write_be(&merged.to_be_bytes())
    }

    /// Writes a big-endian `u64`, merging any queued bits into the
    /// top of the value.
    pub fn write_u64(&mut self, value: u64) -> Result<()> {
        let merged = self.merge(value, u64::MAX)?;
        self.write_be(&merged.to_be_bytes())
    }

    /// Writes a run of raw bytes.
    ///
    /// The first byte is written with [`write_u8`] semantics so that
    /// queued bits are honored; the write is atomic, on failure the
    /// encoder state is left untouched.
    ///
    /// [`write_u8`]: Encoder::write_u8
    pub fn write_bytes(&mut self, value: &[u8]) -> Result<()> {
        let first = match value.first() {
            Some(first) => *first,
            None => return Ok(()),
        };

        if self.data.len() - self.position < value.len() {
            return Err(Error::OutOfRange(
                "Buffer too small for inserting blob".into()).into());
        }

        // Snapshot the cursor state; restore it if merging the first
        // byte fails so the caller sees an unmodified encoder.
        let snapshot = (self.position, self.current, self.skip_bits);
        if let Err(e) = self.write_u8(first) {
            let (position, current, skip_bits) = snapshot;
            self.position = position;
            self.current = current;
            self.skip_bits = skip_bits;
            return Err(e);
        }

        self.data[self.position..self.position + value.len() - 1]
            .copy_from_slice(&value[1..]);
        self.position += value.len() - 1;
        Ok(())
    }

    /// Merges the staging byte into the top byte of `value`.
    ///
    /// Fails if `value` has bits set where the queued bits already
    /// are.
    fn merge<T>(&self, value: T, max: T) -> Result<T>
    where
        T: Copy + PartialEq + std::ops::BitAnd<Output = T>
            + std::ops::BitOr<Output = T> + std::ops::Shl<usize, Output = T>
            + std::ops::Shr<u8, Output = T> + From<u8>,
    {
        if value & (max >> self.skip_bits) != value {
            return Err(Error::InvalidValue(
                "Cannot insert number, masked bits are set".into()).into());
        }

        let result = (T::from(self.current) << ((std::mem::size_of::<T>() - 1) * 8))
            | value;
        Ok(result)
    }

    fn write_be(&mut self, bytes: &[u8]) -> Result<()> {
        if self.data.len() - self.position < bytes.len() {
            return Err(Error::OutOfRange(
                "Buffer too small for inserting number".into()).into());
        }
        self.data[self.position..self.position + bytes.len()]
            .copy_from_slice(bytes);
        self.position += bytes.len();
        self.current = 0;
        self.skip_bits = 0;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bits_pack_msb_first() {
        let mut buf = [0u8; 2];
        let mut enc = Encoder::new(&mut buf);
        enc.insert_bits(1, 1).unwrap();
        enc.insert_bits(1, 0).unwrap();
        enc.insert_bits(4, 0b1101).unwrap();
        assert_eq!(enc.position(), 0);
        enc.insert_bits(2, 0b10).unwrap();
        assert_eq!(enc.position(), 1);
        enc.insert_bits(2, 0b01).unwrap();
        enc.flush().unwrap();
        assert_eq!(buf, [0b1011_0110, 0b0100_0000]);
    }

    #[test]
    fn bits_reject_oversized_values() {
        let mut buf = [0u8; 1];
        let mut enc = Encoder::new(&mut buf);
        assert!(enc.insert_bits(2, 0b100).is_err());
        assert!(enc.insert_bits(0, 0).is_err());
    }

    #[test]
    fn bits_do_not_cross_byte_boundary() {
        let mut buf = [0u8; 2];
        let mut enc = Encoder::new(&mut buf);
        enc.insert_bits(6, 0).unwrap();
        assert!(enc.insert_bits(4, 1).is_err());
        enc.insert_bits(2, 0b11).unwrap();
        assert_eq!(buf[0], 0b0000_0011);
    }

    #[test]
    fn numbers_merge_queued_bits() {
        let mut buf = [0u8; 2];
        let mut enc = Encoder::new(&mut buf);
        enc.insert_bits(2, 0b10).unwrap();
        // The top two bits of the value would collide.
        assert!(enc.write_u16(0xffff).is_err());
        enc.write_u16(0x1234).unwrap();
        assert_eq!(buf, [0x92, 0x34]);
    }

    #[test]
    fn blob_write_is_atomic() {
        let mut buf = [0u8; 4];
        let mut enc = Encoder::new(&mut buf);
        enc.insert_bits(1, 1).unwrap();
        // First element collides with the queued bit: nothing may be
        // written and the queued bit must survive.
        assert!(enc.write_bytes(&[0x80, 0x01]).is_err());
        assert_eq!(enc.position(), 0);
        enc.write_bytes(&[0x55, 0x01, 0x02]).unwrap();
        assert_eq!(&buf[..3], &[0xd5, 0x01, 0x02]);
    }

    #[test]
    fn blob_write_checks_capacity_up_front() {
        let mut buf = [0u8; 2];
        let mut enc = Encoder::new(&mut buf);
        enc.write_u8(0xaa).unwrap();
        assert!(enc.write_bytes(&[1, 2]).is_err());
        assert_eq!(enc.position(), 1);
        enc.write_u8(0xbb).unwrap();
        assert_eq!(buf, [0xaa, 0xbb]);
    }

    #[test]
    fn write_past_end_fails() {
        let mut buf = [0u8; 1];
        let mut enc = Encoder::new(&mut buf);
        assert!(enc.write_u16(1).is_err());
        enc.write_u8(7).unwrap();
        assert!(enc.write_u8(8).is_err());
        assert!(enc.insert_bits(1, 0).is_err());
    }

    #[test]
    fn flush_writes_partial_byte() {
        let mut buf = [0u8; 1];
        let mut enc = Encoder::new(&mut buf);
        enc.insert_bits(3, 0b101).unwrap();
        enc.flush().unwrap();
        assert_eq!(enc.position(), 1);
        assert_eq!(buf, [0b1010_0000]);
    }
}
