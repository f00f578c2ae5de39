// Copyright (c) 2023 The ledger-ada Contributors

//! Extended public key APDUs
//!
//! Keys are exported one path per exchange, the first request carries the
//! number of remaining paths when more than one key is requested.
//!
//! ```text
//! INIT      P1=0x01  path [|| u32 remaining]
//! NEXT_KEY  P1=0x02  path
//! ```

use num_enum::TryFromPrimitive;
use strum::Display;

use crate::{
    resp::{check_len, DecodeFixed},
    ApduError,
};

/// Extended public key sub-commands (P1)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum ExtPubKeyP1 {
    Init = 0x01,
    NextKey = 0x02,
}

/// Extended public key response APDU
///
/// ## Encoding
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                   ED25519 PUBLIC KEY (32-byte)                /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// /                       CHAIN CODE (32-byte)                    /
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct ExtendedPublicKeyResp {
    pub public_key: [u8; 32],
    pub chain_code: [u8; 32],
}

impl DecodeFixed for ExtendedPublicKeyResp {
    const LEN: usize = 64;

    fn decode_fixed(buff: &[u8]) -> Result<Self, ApduError> {
        check_len(buff, Self::LEN)?;

        let mut public_key = [0u8; 32];
        public_key.copy_from_slice(&buff[..32]);

        let mut chain_code = [0u8; 32];
        chain_code.copy_from_slice(&buff[32..64]);

        Ok(Self {
            public_key,
            chain_code,
        })
    }
}
