//! Consensus wire encoding primitives.
//!
//! Integers are little-endian. Lengths and counts use the CompactSize
//! variable-length integer. Decoding is strict: a varint must use its
//! shortest form, and [`Decoder::finish`] rejects unread bytes.

use crate::error::EncodeError;

/// Append a CompactSize varint to `buf`.
pub fn write_varint(buf: &mut Vec<u8>, n: u64) {
    if n < 0xfd {
        buf.push(n as u8);
    } else if n <= 0xffff {
        buf.push(0xfd);
        buf.extend_from_slice(&(n as u16).to_le_bytes());
    } else if n <= 0xffff_ffff {
        buf.push(0xfe);
        buf.extend_from_slice(&(n as u32).to_le_bytes());
    } else {
        buf.push(0xff);
        buf.extend_from_slice(&n.to_le_bytes());
    }
}

/// Append a varint length prefix followed by `bytes`.
pub fn write_var_bytes(buf: &mut Vec<u8>, bytes: &[u8]) {
    write_varint(buf, bytes.len() as u64);
    buf.extend_from_slice(bytes);
}

/// Number of bytes [`write_varint`] emits for `n`.
pub fn varint_len(n: u64) -> usize {
    match n {
        0..=0xfc => 1,
        0xfd..=0xffff => 3,
        0x1_0000..=0xffff_ffff => 5,
        _ => 9,
    }
}

/// Forward-only cursor over an encoded byte slice.
#[derive(Debug)]
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Current read offset.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left to read.
    pub fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], EncodeError> {
        if n > self.remaining() {
            return Err(EncodeError::Truncated {
                offset: self.pos,
                needed: n,
            });
        }
        let out = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], EncodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn read_u8(&mut self) -> Result<u8, EncodeError> {
        Ok(self.read_array::<1>()?[0])
    }

    pub fn read_u16_le(&mut self) -> Result<u16, EncodeError> {
        Ok(u16::from_le_bytes(self.read_array()?))
    }

    pub fn read_u32_le(&mut self) -> Result<u32, EncodeError> {
        Ok(u32::from_le_bytes(self.read_array()?))
    }

    pub fn read_u64_le(&mut self) -> Result<u64, EncodeError> {
        Ok(u64::from_le_bytes(self.read_array()?))
    }

    /// Read a CompactSize varint, rejecting non-shortest encodings.
    pub fn read_varint(&mut self) -> Result<u64, EncodeError> {
        let start = self.pos;
        let (value, min) = match self.read_u8()? {
            0xfd => (self.read_u16_le()? as u64, 0xfd),
            0xfe => (self.read_u32_le()? as u64, 0x1_0000),
            0xff => (self.read_u64_le()?, 0x1_0000_0000),
            b => return Ok(b as u64),
        };
        if value < min {
            return Err(EncodeError::NonCanonicalVarint(start));
        }
        Ok(value)
    }

    /// Read a varint used as a length or element count.
    ///
    /// Every counted element occupies at least one byte, so a count larger
    /// than the unread input is rejected before any allocation.
    pub fn read_length(&mut self) -> Result<usize, EncodeError> {
        let len = self.read_varint()?;
        let len = usize::try_from(len).map_err(|_| EncodeError::LengthTooLarge(len))?;
        if len > self.remaining() {
            return Err(EncodeError::Truncated {
                offset: self.pos,
                needed: len,
            });
        }
        Ok(len)
    }

    /// Read a varint-prefixed byte string.
    pub fn read_var_bytes(&mut self) -> Result<Vec<u8>, EncodeError> {
        let len = self.read_length()?;
        Ok(self.read_bytes(len)?.to_vec())
    }

    /// Consume the decoder, failing if any input is left unread.
    pub fn finish(self) -> Result<(), EncodeError> {
        match self.remaining() {
            0 => Ok(()),
            n => Err(EncodeError::TrailingBytes(n)),
        }
    }
}
