// Copyright (c) 2023 The ledger-ada Contributors

//! Device handle configuration

use serde::Deserialize;

use ledger_ada_apdu::MAX_APDU_PAYLOAD;

/// Default chunk size for streamed payloads
pub const DEFAULT_CHUNK_SIZE: usize = 240;

/// Configuration for [crate::DeviceHandle] interactions
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Maximum chunk size for streamed payloads, clamped to the APDU payload limit
    pub max_chunk_size: usize,

    /// Retry the first exchange of an interaction once if the device
    /// reports it is still in a previous call
    pub retry_still_in_call: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chunk_size: DEFAULT_CHUNK_SIZE,
            retry_still_in_call: true,
        }
    }
}

impl Config {
    /// Load configuration from a TOML string, missing fields use defaults
    pub fn from_toml_str(s: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(s)
    }

    /// Effective chunk size
    pub fn chunk_size(&self) -> usize {
        self.max_chunk_size.clamp(1, MAX_APDU_PAYLOAD)
    }
}
