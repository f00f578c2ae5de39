// Copyright (c) 2023 The ledger-ada Contributors

//! CIP-36 vote signing APDUs
//!
//! The vote cast data is length prefixed (`u32`) and streamed using
//! [crate::chunk], P1 / P2 carry the chunk position and mode. Intermediate
//! chunk responses are empty, the final chunk returns the 32-byte vote data
//! hash. The witness request then returns the signature.
//!
//! ```text
//! CHUNK    P1=flags P2=mode  u32 len || cast_data ...
//! WITNESS  P1=0x10           path           -> signature (64-byte)
//! ```

/// Witness sub-command (P1)
pub const VOTE_P1_WITNESS: u8 = 0x10;

/// Maximum vote cast data length
pub const MAX_VOTE_CAST_DATA: usize = 240 * 255;
