// Copyright (c) 2023 The ledger-ada Contributors

//! Native script hash derivation APDUs
//!
//! Scripts are walked depth-first, complex scripts open a level with the
//! number of children, simple scripts are leaves.
//!
//! ```text
//! START_COMPLEX  P1=0x01  u8 type || u32 children [|| u32 required]
//! ADD_SIMPLE     P1=0x02  u8 type || (u8 choice || path | key_hash(28)) | u64 slot
//! FINISH         P1=0x03  u8 display_format   -> script hash (28-byte)
//! ```

use num_enum::TryFromPrimitive;
use strum::Display;

/// Native script sub-commands (P1)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum ScriptP1 {
    StartComplex = 0x01,
    AddSimple = 0x02,
    Finish = 0x03,
}

/// Native script types
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum NativeScriptType {
    Pubkey = 0,
    All = 1,
    Any = 2,
    NOfK = 3,
    InvalidBefore = 4,
    InvalidHereafter = 5,
}

/// Pubkey script key encoding
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum PubkeyChoice {
    Path = 0x01,
    Hash = 0x02,
}

/// How the device displays the resulting hash
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum ScriptHashDisplay {
    Bech32 = 0x01,
    PolicyId = 0x02,
}
