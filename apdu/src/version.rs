// Copyright (c) 2023 The ledger-ada Contributors

//! Application version APDUs

use crate::{
    resp::{check_len, DecodeFixed},
    ApduError, Instruction, Request,
};

/// Fetch application version request (empty payload)
pub fn version_req() -> Request {
    Request::new(Instruction::GetVersion, 0x00, 0x00, vec![])
}

/// Fetch device serial request (empty payload)
pub fn serial_req() -> Request {
    Request::new(Instruction::GetSerial, 0x00, 0x00, vec![])
}

bitflags::bitflags! {
    /// Application version flags
    pub struct VersionFlags: u8 {
        /// App built in debug mode
        const DEBUG = 1 << 0;

        /// App running without a display (speculos / automated tests)
        const HEADLESS = 1 << 1;
    }
}

/// Application version response APDU
///
/// ## Encoding
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |     MAJOR     |     MINOR     |     PATCH     |     FLAGS     |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct VersionResp {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub flags: VersionFlags,
}

impl DecodeFixed for VersionResp {
    const LEN: usize = 4;

    fn decode_fixed(buff: &[u8]) -> Result<Self, ApduError> {
        check_len(buff, Self::LEN)?;

        Ok(Self {
            major: buff[0],
            minor: buff[1],
            patch: buff[2],
            flags: VersionFlags::from_bits_truncate(buff[3]),
        })
    }
}
