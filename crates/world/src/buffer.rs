//! Fixed-capacity byte cursors for the World wire format.
//!
//! All multi-byte integers are big-endian. The writer never grows past
//! [`MAX_SERIALIZED_LENGTH`]; the reader fails on any read past the end.

use crate::error::{WorldError, WorldResult};
use crate::world::MAX_SERIALIZED_LENGTH;

pub(crate) struct Writer {
    data: Box<[u8; MAX_SERIALIZED_LENGTH]>,
    len: usize,
}

impl Writer {
    pub(crate) fn new() -> Self {
        Self {
            data: Box::new([0u8; MAX_SERIALIZED_LENGTH]),
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn append(&mut self, bytes: &[u8]) -> WorldResult<()> {
        let end = self.len + bytes.len();
        if end > MAX_SERIALIZED_LENGTH {
            return Err(WorldError::SerializedDataTooLarge(format!(
                "{} bytes exceeds maximum of {}",
                end, MAX_SERIALIZED_LENGTH
            )));
        }
        self.data[self.len..end].copy_from_slice(bytes);
        self.len = end;
        Ok(())
    }

    pub(crate) fn append_u8(&mut self, value: u8) -> WorldResult<()> {
        self.append(&[value])
    }

    pub(crate) fn append_u16(&mut self, value: u16) -> WorldResult<()> {
        self.append(&value.to_be_bytes())
    }

    pub(crate) fn append_u64(&mut self, value: u64) -> WorldResult<()> {
        self.append(&value.to_be_bytes())
    }

    pub(crate) fn into_vec(self) -> Vec<u8> {
        self.data[..self.len].to_vec()
    }
}

pub(crate) struct Reader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    pub(crate) fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub(crate) fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    pub(crate) fn read_slice(&mut self, len: usize) -> WorldResult<&'a [u8]> {
        if self.remaining() < len {
            return Err(WorldError::Malformed(format!(
                "truncated at offset {}: needed {} bytes, {} remain",
                self.pos,
                len,
                self.remaining()
            )));
        }
        let slice = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    pub(crate) fn read_array<const N: usize>(&mut self) -> WorldResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_slice(N)?);
        Ok(out)
    }

    pub(crate) fn read_u8(&mut self) -> WorldResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    pub(crate) fn read_u16(&mut self) -> WorldResult<u16> {
        Ok(u16::from_be_bytes(self.read_array()?))
    }

    pub(crate) fn read_u64(&mut self) -> WorldResult<u64> {
        Ok(u64::from_be_bytes(self.read_array()?))
    }
}
