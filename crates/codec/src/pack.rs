//! Big-endian packing primitives for the compact codec.

use alloy_primitives::{
    Address, B256, Bytes,
    aliases::{U24, U48},
};

use crate::CodecError;

/// Largest length a `uint24` prefix can carry.
pub(crate) const MAX_U24: usize = 0xff_ffff;

/// Largest length a `uint16` prefix can carry.
pub(crate) const MAX_U16: usize = 0xffff;

/// Appends fixed-width big-endian fields to a pre-sized buffer.
#[derive(Debug)]
pub(crate) struct Packer {
    buf: Vec<u8>,
    size: usize,
}

impl Packer {
    pub(crate) fn with_capacity(size: usize) -> Self {
        Self { buf: Vec::with_capacity(size), size }
    }

    pub(crate) fn u8(&mut self, value: u8) {
        self.buf.push(value);
    }

    pub(crate) fn u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_be_bytes());
    }

    pub(crate) fn u24(&mut self, value: U24) {
        self.buf.extend_from_slice(&value.to_be_bytes::<3>());
    }

    pub(crate) fn u48(&mut self, value: U48) {
        self.buf.extend_from_slice(&value.to_be_bytes::<6>());
    }

    pub(crate) fn address(&mut self, value: &Address) {
        self.buf.extend_from_slice(value.as_slice());
    }

    pub(crate) fn b256(&mut self, value: &B256) {
        self.buf.extend_from_slice(value.as_slice());
    }

    pub(crate) fn bool(&mut self, value: bool) {
        self.u8(u8::from(value));
    }

    /// Writes an array length as a `uint24`.
    pub(crate) fn len_u24(&mut self, field: &'static str, len: usize) -> Result<(), CodecError> {
        check_len(field, len, MAX_U24)?;
        self.buf.extend_from_slice(&(len as u32).to_be_bytes()[1..]);
        Ok(())
    }

    /// Writes an array length as a `uint16`.
    pub(crate) fn len_u16(&mut self, field: &'static str, len: usize) -> Result<(), CodecError> {
        check_len(field, len, MAX_U16)?;
        self.u16(len as u16);
        Ok(())
    }

    pub(crate) fn finish(self) -> Bytes {
        debug_assert_eq!(self.buf.len(), self.size, "payload size mismatch");
        Bytes::from(self.buf)
    }
}

pub(crate) fn check_len(field: &'static str, len: usize, max: usize) -> Result<(), CodecError> {
    if len > max {
        return Err(CodecError::LengthOverflow { field, len, max });
    }
    Ok(())
}

/// Reads fixed-width big-endian fields, failing on truncated input.
#[derive(Debug)]
pub(crate) struct Unpacker<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> Unpacker<'a> {
    pub(crate) const fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// Number of bytes left to read.
    pub(crate) const fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], CodecError> {
        let remaining = self.remaining();
        if remaining < N {
            return Err(CodecError::Truncated { offset: self.pos, needed: N - remaining });
        }

        let mut out = [0u8; N];
        out.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(out)
    }

    pub(crate) fn u8(&mut self) -> Result<u8, CodecError> {
        self.take::<1>().map(|[b]| b)
    }

    pub(crate) fn u16(&mut self) -> Result<u16, CodecError> {
        self.take::<2>().map(u16::from_be_bytes)
    }

    pub(crate) fn u24(&mut self) -> Result<U24, CodecError> {
        self.take::<3>().map(U24::from_be_bytes)
    }

    pub(crate) fn u48(&mut self) -> Result<U48, CodecError> {
        self.take::<6>().map(U48::from_be_bytes)
    }

    pub(crate) fn address(&mut self) -> Result<Address, CodecError> {
        self.take::<20>().map(Address::from)
    }

    pub(crate) fn b256(&mut self) -> Result<B256, CodecError> {
        self.take::<32>().map(B256::from)
    }

    pub(crate) fn bool(&mut self) -> Result<bool, CodecError> {
        self.u8().map(|b| b != 0)
    }

    /// Reads a `uint24` array length.
    pub(crate) fn len_u24(&mut self) -> Result<usize, CodecError> {
        self.u24().map(|len| len.to::<usize>())
    }

    /// Reads a `uint16` array length.
    pub(crate) fn len_u16(&mut self) -> Result<usize, CodecError> {
        self.u16().map(usize::from)
    }

    /// Fails if any input is left unread.
    pub(crate) const fn finish(self) -> Result<(), CodecError> {
        let trailing = self.data.len() - self.pos;
        if trailing > 0 {
            return Err(CodecError::TrailingBytes(trailing));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_big_endian() {
        let mut packer = Packer::with_capacity(1 + 2 + 3 + 6);
        packer.u8(0x01);
        packer.u16(0x0203);
        packer.u24(U24::from(0x040506u32));
        packer.u48(U48::from(0x0708090a0b0cu64));
        let bytes = packer.finish();
        assert_eq!(bytes.as_ref(), (1..=12).collect::<Vec<u8>>().as_slice());

        let mut unpacker = Unpacker::new(&bytes);
        assert_eq!(unpacker.u8().unwrap(), 0x01);
        assert_eq!(unpacker.u16().unwrap(), 0x0203);
        assert_eq!(unpacker.u24().unwrap(), U24::from(0x040506u32));
        assert_eq!(unpacker.u48().unwrap(), U48::from(0x0708090a0b0cu64));
        unpacker.finish().unwrap();
    }

    #[test]
    fn truncated_reads_report_offset() {
        let mut unpacker = Unpacker::new(&[0u8; 5]);
        unpacker.u16().unwrap();
        let err = unpacker.u48().unwrap_err();
        assert!(matches!(err, CodecError::Truncated { offset: 2, needed: 3 }), "{err:?}");
    }

    #[test]
    fn lengths_are_bounded() {
        let mut packer = Packer::with_capacity(3);
        let err = packer.len_u24("hashes", MAX_U24 + 1).unwrap_err();
        assert!(matches!(err, CodecError::LengthOverflow { field: "hashes", .. }));

        packer.len_u24("hashes", MAX_U24).unwrap();
        assert_eq!(packer.finish().as_ref(), &[0xff, 0xff, 0xff]);

        let mut packer = Packer::with_capacity(0);
        assert!(packer.len_u16("bonds", MAX_U16 + 1).is_err());
    }

    #[test]
    fn trailing_bytes_are_rejected() {
        let mut unpacker = Unpacker::new(&[1, 2, 3]);
        unpacker.u16().unwrap();
        assert!(matches!(unpacker.finish(), Err(CodecError::TrailingBytes(1))));
    }
}
