// Copyright (c) 2023 The ledger-ada Contributors

//! Caller-facing request and response types
//!
//! Requests are loosely typed (hex strings, decimal amount strings, raw paths)
//! and are validated before use, responses are decoded device outputs.

use serde::{Deserialize, Serialize};

mod tx;
pub use tx::*;

/// Raw BIP32 derivation path
pub type Bip32Path = Vec<u32>;

/// Hardened derivation index flag
pub const HARDENED: u32 = 0x8000_0000;

/// Harden a derivation index
pub const fn harden(i: u32) -> u32 {
    i | HARDENED
}

/// Cardano network selector
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Network {
    /// Shelley network id
    pub network_id: u8,
    /// Byron protocol magic
    pub protocol_magic: u32,
}

impl Network {
    pub const MAINNET: Network = Network {
        network_id: 0x01,
        protocol_magic: 764824073,
    };

    pub const TESTNET: Network = Network {
        network_id: 0x00,
        protocol_magic: 42,
    };
}

/// Address kinds
#[derive(
    Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum AddressType {
    Base,
    Pointer,
    Enterprise,
    Byron,
    Reward,
}

/// Payment credential for address derivation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentCredential {
    Path(Bip32Path),
    ScriptHash(String),
}

/// Staking credential for address derivation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StakingCredential {
    Path(Bip32Path),
    KeyHash(String),
    Pointer(BlockchainPointer),
}

/// Pointer to a stake registration certificate on chain
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockchainPointer {
    pub block_index: u32,
    pub tx_index: u32,
    pub certificate_index: u32,
}

/// Address parameters for derivation / display / device owned outputs
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddressParams {
    pub address_type: AddressType,
    pub network: Network,
    #[serde(default)]
    pub payment: Option<PaymentCredential>,
    #[serde(default)]
    pub staking: Option<StakingCredential>,
}

/// Stake pool operational certificate
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalCertificate {
    pub kes_public_key: String,
    pub kes_period: String,
    pub issue_counter: String,
    pub cold_key_path: Bip32Path,
}

/// Native (multisig / timelock) script
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NativeScript {
    PubkeyPath { path: Bip32Path },
    PubkeyHash { key_hash: String },
    All { scripts: Vec<NativeScript> },
    Any { scripts: Vec<NativeScript> },
    NOfK { required: u32, scripts: Vec<NativeScript> },
    InvalidBefore { slot: String },
    InvalidHereafter { slot: String },
}

/// How the device displays a derived native script hash
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NativeScriptHashDisplay {
    Bech32,
    PolicyId,
}

/// CIP-36 vote signing request
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteRequest {
    /// CBOR encoded vote cast data
    pub vote_cast_data_hex: String,
    pub witness_path: Bip32Path,
}

/// Cardano app version
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
    pub flags: DeviceFlags,
}

/// Cardano app build flags
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFlags {
    pub is_debug: bool,
    pub is_headless: bool,
}

impl DeviceVersion {
    /// Check whether this version is at least `major.minor`
    pub fn at_least(&self, major: u8, minor: u8) -> bool {
        (self.major, self.minor) >= (major, minor)
    }
}

impl std::fmt::Display for DeviceVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Device serial
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Serial {
    pub serial_hex: String,
}

/// Extended public key (ed25519 public key and chain code)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtendedPublicKey {
    pub public_key_hex: String,
    pub chain_code_hex: String,
}

/// Derived address bytes
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedAddress {
    pub address_hex: String,
}

/// Operational certificate signature
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationalCertificateSignature {
    pub signature_hex: String,
}

/// Native script hash
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeScriptHash {
    pub script_hash_hex: String,
}

/// Signed CIP-36 vote
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct VoteSignature {
    pub data_hash_hex: String,
    pub witness_path: Bip32Path,
    pub witness_signature_hex: String,
}
