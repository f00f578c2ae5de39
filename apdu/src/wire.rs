// Copyright (c) 2023 The ledger-ada Contributors

//! Big-endian field writer used to build request payloads
//!
//! ## Field encodings
//!
//! ```text
//! u8 / u16 / u32 / u64  big-endian, fixed width
//! path               u8 element count || u32 element[count]
//! bytes (variable)   u32 length || bytes
//! bytes (fixed)      bytes, width defined by the field
//! option flag        0x01 (absent) | 0x02 (present)
//! ```

use byteorder::{BigEndian, ByteOrder};

/// Option flag encoding for absent fields
pub const OPTION_NONE: u8 = 0x01;

/// Option flag encoding for present fields
pub const OPTION_SOME: u8 = 0x02;

/// Append-only writer for wire fields
pub trait WireWrite {
    /// Write a single byte
    fn put_u8(&mut self, v: u8) -> &mut Self;

    /// Write a big-endian `u16`
    fn put_u16(&mut self, v: u16) -> &mut Self;

    /// Write a big-endian `u32`
    fn put_u32(&mut self, v: u32) -> &mut Self;

    /// Write a big-endian `u64`
    fn put_u64(&mut self, v: u64) -> &mut Self;

    /// Write fixed-width bytes without a length prefix
    fn put_bytes(&mut self, v: &[u8]) -> &mut Self;

    /// Write variable length bytes with a `u32` length prefix
    fn put_var_bytes(&mut self, v: &[u8]) -> &mut Self;

    /// Write a derivation path (`u8` count followed by `u32` indices)
    fn put_path(&mut self, path: &[u32]) -> &mut Self;

    /// Write an option presence flag
    fn put_option_flag(&mut self, present: bool) -> &mut Self;
}

impl WireWrite for Vec<u8> {
    fn put_u8(&mut self, v: u8) -> &mut Self {
        self.push(v);
        self
    }

    fn put_u16(&mut self, v: u16) -> &mut Self {
        let mut b = [0u8; 2];
        BigEndian::write_u16(&mut b, v);
        self.extend_from_slice(&b);
        self
    }

    fn put_u32(&mut self, v: u32) -> &mut Self {
        let mut b = [0u8; 4];
        BigEndian::write_u32(&mut b, v);
        self.extend_from_slice(&b);
        self
    }

    fn put_u64(&mut self, v: u64) -> &mut Self {
        let mut b = [0u8; 8];
        BigEndian::write_u64(&mut b, v);
        self.extend_from_slice(&b);
        self
    }

    fn put_bytes(&mut self, v: &[u8]) -> &mut Self {
        self.extend_from_slice(v);
        self
    }

    fn put_var_bytes(&mut self, v: &[u8]) -> &mut Self {
        self.put_u32(v.len() as u32);
        self.extend_from_slice(v);
        self
    }

    fn put_path(&mut self, path: &[u32]) -> &mut Self {
        self.push(path.len() as u8);
        for i in path {
            self.put_u32(*i);
        }
        self
    }

    fn put_option_flag(&mut self, present: bool) -> &mut Self {
        self.push(match present {
            true => OPTION_SOME,
            false => OPTION_NONE,
        });
        self
    }
}

/// Read a big-endian `u32` from the start of a buffer
pub fn read_u32(buff: &[u8]) -> Option<u32> {
    buff.get(..4).map(BigEndian::read_u32)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn write_path() {
        let mut b = vec![];
        b.put_path(&[0x8000_002c, 0x8000_0717, 0x8000_0000]);

        assert_eq!(
            b,
            vec![0x03, 0x80, 0x00, 0x00, 0x2c, 0x80, 0x00, 0x07, 0x17, 0x80, 0x00, 0x00, 0x00]
        );
    }

    #[test]
    fn write_fields_big_endian() {
        let mut b = vec![];
        b.put_u8(0x01)
            .put_u32(0x0102_0304)
            .put_u64(0x0102_0304_0506_0708)
            .put_var_bytes(&[0xaa]);

        assert_eq!(
            b,
            vec![
                0x01, 0x01, 0x02, 0x03, 0x04, 0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08,
                0x00, 0x00, 0x00, 0x01, 0xaa
            ]
        );
    }

    #[test]
    fn option_flags() {
        let mut b = vec![];
        b.put_option_flag(false).put_option_flag(true);

        assert_eq!(b, vec![OPTION_NONE, OPTION_SOME]);
    }

    #[test]
    fn read_back_u32() {
        assert_eq!(read_u32(&[0x00, 0x00, 0x01, 0x00, 0xff]), Some(256));
        assert_eq!(read_u32(&[0x00, 0x01]), None);
    }
}
