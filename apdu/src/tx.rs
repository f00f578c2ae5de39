// Copyright (c) 2023 The ledger-ada Contributors

//! Transaction signing APDUs
//!
//! Transactions are streamed to the device stage by stage, each stage
//! selected by P1, with P2 selecting a sub-stage where a stage has more
//! than one message type.
//!
//! ```text
//! INIT
//! INPUTS*
//! (OUTPUT_BASIC [ASSET_GROUP TOKEN*]* [OUTPUT_CONFIRM])*
//! FEE
//! [TTL]
//! (CERTIFICATE [POOL_INIT POOL_PARAMS POOL_OWNER* POOL_RELAY* POOL_METADATA POOL_CONFIRM])*
//! WITHDRAWAL*
//! [METADATA]
//! [VALIDITY_START]
//! CONFIRM         -> tx body hash (32-byte)
//! WITNESS*        -> signature (64-byte)
//! ```
//!
//! ## Init encoding
//! ```text
//! u8 network_id || u32 protocol_magic || u8 ttl_flag || u8 metadata_flag
//!   || [u8 validity_start_flag] || u8 signing_mode
//!   || u32 inputs || u32 outputs || u32 certificates || u32 withdrawals || u32 witnesses
//! ```

use num_enum::TryFromPrimitive;
use strum::Display;

/// Transaction signing stages (P1)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum TxStage {
    Init = 0x01,
    Inputs = 0x02,
    Outputs = 0x03,
    Fee = 0x04,
    Ttl = 0x05,
    Certificates = 0x06,
    Withdrawals = 0x07,
    Metadata = 0x08,
    ValidityIntervalStart = 0x09,
    Confirm = 0x0a,
    Witnesses = 0x0f,
}

/// P2 for stages without sub-stages
pub const P2_UNUSED: u8 = 0x00;

/// Output sub-stages (P2)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum OutputP2 {
    BasicData = 0x30,
    AssetGroup = 0x31,
    Token = 0x32,
    Confirm = 0x33,
}

/// Output destination encoding
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum OutputType {
    AddressBytes = 0x01,
    AddressParams = 0x02,
}

/// Pool registration certificate sub-stages (P2)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum PoolCertP2 {
    Init = 0x30,
    Params = 0x31,
    Owner = 0x32,
    Relay = 0x33,
    Metadata = 0x34,
    Confirm = 0x35,
}

/// Certificate types
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum CertificateType {
    StakeRegistration = 0,
    StakeDeregistration = 1,
    StakeDelegation = 2,
    StakePoolRegistration = 3,
}

/// Pool owner encodings
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum PoolOwnerType {
    Path = 0x01,
    KeyHash = 0x02,
}

/// Pool relay types
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum RelayType {
    SingleHostAddr = 0,
    SingleHostName = 1,
    MultiHostName = 2,
}

/// Transaction signing modes
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u8)]
pub enum SigningMode {
    /// Ordinary transaction, witnesses for inputs / certificates / withdrawals
    Ordinary = 0x03,
    /// Pool registration signed by a single (path) pool owner
    PoolRegistrationAsOwner = 0x04,
}

/// Transaction body hash length
pub const TX_HASH_LEN: usize = 32;

/// Key hash length (pool ids, owners, policy ids)
pub const KEY_HASH_LEN: usize = 28;

/// Reward account length (header byte plus key hash)
pub const REWARD_ACCOUNT_LEN: usize = 29;
