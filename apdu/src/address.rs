// Copyright (c) 2023 The ledger-ada Contributors

//! Address derivation APDUs and address parameter encodings
//!
//! ## Address parameters
//!
//! ```text
//! u8 header || (u32 protocol_magic | u8 network_id) || spending || staking
//!
//! spending  0x11 path | 0x22 script_hash(28) | 0x33
//! staking   0x11 | 0x22 path | 0x33 key_hash(28) | 0x44 u32 block || u32 tx || u32 cert
//! ```
//!
//! Byron addresses carry the protocol magic, all others the network id.

use num_enum::TryFromPrimitive;
use strum::Display;

/// Derive address sub-commands (P1)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum DeriveAddressP1 {
    /// Return the address to the host
    Return = 0x01,
    /// Display the address on the device
    Display = 0x02,
}

/// Address header type (upper nibble of the address header byte)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum AddressHeader {
    BasePaymentKey = 0x00,
    BasePaymentScript = 0x01,
    PointerPaymentKey = 0x04,
    PointerPaymentScript = 0x05,
    EnterprisePaymentKey = 0x06,
    EnterprisePaymentScript = 0x07,
    Byron = 0x08,
    RewardKey = 0x0e,
}

/// Spending data source selector
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum SpendingChoice {
    Path = 0x11,
    ScriptHash = 0x22,
    None = 0x33,
}

/// Staking data source selector
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum StakingChoice {
    None = 0x11,
    KeyPath = 0x22,
    KeyHash = 0x33,
    BlockchainPointer = 0x44,
}

/// Maximum Shelley network id (four bit field)
pub const MAX_NETWORK_ID: u8 = 0b1111;
