//! Fixed-width binary stream primitives.
//!
//! Every dump/load in the crate goes through these two traits, so the
//! structures only depend on "write/read an N-bit number" and never on the
//! underlying medium. All numbers are little-endian.

use crate::error::Result;
use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Sink for fixed-width numbers.
pub trait BinaryOutput {
    fn dump_u8(&mut self, value: u8) -> Result<()>;
    fn dump_u16(&mut self, value: u16) -> Result<()>;
    fn dump_u32(&mut self, value: u32) -> Result<()>;
}

/// Source of fixed-width numbers.
///
/// A truncated stream fails with an [`std::io::ErrorKind::UnexpectedEof`]
/// wrapped in [`crate::Error::Io`].
pub trait BinaryInput {
    fn load_u8(&mut self) -> Result<u8>;
    fn load_u16(&mut self) -> Result<u16>;
    fn load_u32(&mut self) -> Result<u32>;
}

impl<W: Write> BinaryOutput for W {
    #[inline]
    fn dump_u8(&mut self, value: u8) -> Result<()> {
        Ok(self.write_u8(value)?)
    }

    #[inline]
    fn dump_u16(&mut self, value: u16) -> Result<()> {
        Ok(self.write_u16::<LittleEndian>(value)?)
    }

    #[inline]
    fn dump_u32(&mut self, value: u32) -> Result<()> {
        Ok(self.write_u32::<LittleEndian>(value)?)
    }
}

impl<R: Read> BinaryInput for R {
    #[inline]
    fn load_u8(&mut self) -> Result<u8> {
        Ok(self.read_u8()?)
    }

    #[inline]
    fn load_u16(&mut self) -> Result<u16> {
        Ok(self.read_u16::<LittleEndian>()?)
    }

    #[inline]
    fn load_u32(&mut self) -> Result<u32> {
        Ok(self.read_u32::<LittleEndian>()?)
    }
}

/// Convert an in-memory length or offset to its 32-bit wire form.
pub(crate) fn to_u32(name: &'static str, value: usize) -> Result<u32> {
    u32::try_from(value)
        .map_err(|_| crate::Error::invalid_arg(name, format!("{} exceeds u32 range", value)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;

    #[test]
    fn test_little_endian_layout() {
        let mut buf = Vec::new();
        buf.dump_u8(0xAB).unwrap();
        buf.dump_u16(0x1234).unwrap();
        buf.dump_u32(0xDEADBEEF).unwrap();
        assert_eq!(buf, vec![0xAB, 0x34, 0x12, 0xEF, 0xBE, 0xAD, 0xDE]);

        let mut input = &buf[..];
        assert_eq!(input.load_u8().unwrap(), 0xAB);
        assert_eq!(input.load_u16().unwrap(), 0x1234);
        assert_eq!(input.load_u32().unwrap(), 0xDEADBEEF);
    }

    #[test]
    fn test_truncated_input() {
        let buf = [0x01u8, 0x02];
        let mut input = &buf[..];
        match input.load_u32() {
            Err(Error::Io(e)) => assert_eq!(e.kind(), std::io::ErrorKind::UnexpectedEof),
            other => panic!("expected eof, got {:?}", other),
        }
    }
}
