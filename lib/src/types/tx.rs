// Copyright (c) 2023 The ledger-ada Contributors

//! Transaction request types

use serde::{Deserialize, Serialize};

use super::{AddressParams, Bip32Path, Network};

/// Transaction to be signed
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub network: Network,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    /// Fee in lovelace (decimal string)
    pub fee: String,
    /// Time to live slot (decimal string)
    #[serde(default)]
    pub ttl: Option<String>,
    #[serde(default)]
    pub certificates: Vec<Certificate>,
    #[serde(default)]
    pub withdrawals: Vec<Withdrawal>,
    /// Auxiliary data hash
    #[serde(default)]
    pub metadata_hash: Option<String>,
    /// Validity interval start slot (decimal string)
    #[serde(default)]
    pub validity_interval_start: Option<String>,
}

/// Transaction input, `path` is set for inputs owned by the device
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxInput {
    pub tx_hash: String,
    pub output_index: u32,
    #[serde(default)]
    pub path: Option<Bip32Path>,
}

/// Transaction output
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TxOutput {
    pub destination: TxOutputDestination,
    /// Amount in lovelace (decimal string)
    pub amount: String,
    #[serde(default)]
    pub token_bundle: Option<Vec<AssetGroup>>,
}

/// Output destination, raw address bytes or device derived parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TxOutputDestination {
    ThirdParty { address_hex: String },
    DeviceOwned { params: AddressParams },
}

/// Multi-asset group under a single policy
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetGroup {
    pub policy_id: String,
    pub tokens: Vec<Token>,
}

/// Native token amount
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub asset_name: String,
    pub amount: String,
}

/// Staking certificates
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Certificate {
    StakeRegistration { path: Bip32Path },
    StakeDeregistration { path: Bip32Path },
    StakeDelegation { path: Bip32Path, pool_key_hash: String },
    StakePoolRegistration { pool_params: PoolParams },
}

/// Stake pool registration parameters
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolParams {
    pub pool_key_hash: String,
    pub vrf_key_hash: String,
    pub pledge: String,
    pub cost: String,
    pub margin: Margin,
    pub reward_account: String,
    pub owners: Vec<PoolOwner>,
    pub relays: Vec<Relay>,
    #[serde(default)]
    pub metadata: Option<PoolMetadata>,
}

/// Pool margin as a fraction (decimal strings)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Margin {
    pub numerator: String,
    pub denominator: String,
}

/// Pool owner, a device key path or a foreign key hash
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PoolOwner {
    Path(Bip32Path),
    KeyHash(String),
}

/// Pool relay
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Relay {
    SingleHostAddr {
        #[serde(default)]
        port: Option<u32>,
        #[serde(default)]
        ipv4: Option<String>,
        #[serde(default)]
        ipv6: Option<String>,
    },
    SingleHostName {
        #[serde(default)]
        port: Option<u32>,
        dns_name: String,
    },
    MultiHostName {
        dns_name: String,
    },
}

/// Pool metadata reference
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolMetadata {
    pub url: String,
    pub hash: String,
}

/// Reward withdrawal
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Withdrawal {
    pub path: Bip32Path,
    pub amount: String,
}

/// Witness for a signed transaction
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Witness {
    pub path: Bip32Path,
    pub signature_hex: String,
}

/// Signed transaction result
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignedTransaction {
    pub tx_hash_hex: String,
    pub witnesses: Vec<Witness>,
}
