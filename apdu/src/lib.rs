// Copyright (c) 2023 The ledger-ada Contributors

//! Protocol / APDU definitions for Cardano app communication
//!
//! This crate provides the wire-level pieces of the Cardano hardware wallet protocol:
//! instruction codes, command frames, status words, fixed-layout response decoding,
//! the big-endian field writer used to build request payloads, and the chunked
//! streaming splitter used for payloads larger than a single APDU.
//!
//! All multi-byte integers are big-endian. Variable length fields are prefixed
//! by a `u32` length, derivation paths by a `u8` element count.
//!
//! Validation of request contents is _not_ performed here, see `ledger-ada` for
//! the validating host library.

use ledger_apdu::APDUCommand;
use strum::Display;

pub use ledger_apdu::{APDUAnswer, APDUErrorCode};

pub mod address;
pub mod chunk;
pub mod pubkey;
pub mod resp;
pub mod script;
pub mod status;
pub mod tx;
pub mod version;
pub mod vote;
pub mod wire;

pub mod prelude;

/// Cardano APDU Class
pub const ADA_APDU_CLA: u8 = 0xd7;

/// Maximum APDU payload length (single byte LC)
pub const MAX_APDU_PAYLOAD: usize = 255;

/// APDU header length (CLA, INS, P1, P2, LC)
pub const APDU_HEADER_LEN: usize = 5;

/// Cardano APDU instruction codes
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display)]
#[repr(u8)]
pub enum Instruction {
    /// Fetch application version
    GetVersion = 0x00,

    /// Fetch device serial
    GetSerial = 0x01,

    /// Fetch one or more extended public keys
    GetExtendedPublicKeys = 0x10,

    /// Derive (and optionally display) an address
    DeriveAddress = 0x11,

    /// Derive the hash of a native script
    DeriveNativeScriptHash = 0x12,

    /// Stream a transaction for signing
    SignTx = 0x21,

    /// Sign a stake pool operational certificate
    SignOperationalCertificate = 0x22,

    /// Sign a CIP-36 vote
    SignCip36Vote = 0x23,
}

/// APDU encoding / decoding errors
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ApduError {
    /// Response length does not match the expected layout
    #[error("invalid response length (expected {expected} bytes, received {actual})")]
    InvalidLength { expected: usize, actual: usize },

    /// Request payload exceeds the single APDU limit
    #[error("request payload of {0} bytes exceeds APDU maximum")]
    PayloadTooLong(usize),

    /// Response contents could not be interpreted
    #[error("invalid response encoding")]
    InvalidEncoding,
}

/// Cardano command APDU, the CLA is fixed by the protocol
#[derive(Clone, PartialEq, Eq)]
pub struct Request {
    /// Instruction selecting the operation
    pub ins: Instruction,
    /// Operation specific sub-selector / chunk position
    pub p1: u8,
    /// Operation specific sub-selector / chunk mode
    pub p2: u8,
    /// Request payload
    pub data: Vec<u8>,
}

impl Request {
    /// Create a new request APDU
    pub fn new(ins: Instruction, p1: u8, p2: u8, data: Vec<u8>) -> Self {
        Self { ins, p1, p2, data }
    }

    /// Check the payload fits a single APDU
    pub fn check_len(&self) -> Result<(), ApduError> {
        match self.data.len() > MAX_APDU_PAYLOAD {
            true => Err(ApduError::PayloadTooLong(self.data.len())),
            false => Ok(()),
        }
    }

    /// Borrow as an [APDUCommand] for use with `ledger_transport::Exchange` transports
    pub fn command(&self) -> APDUCommand<&[u8]> {
        APDUCommand {
            cla: ADA_APDU_CLA,
            ins: self.ins as u8,
            p1: self.p1,
            p2: self.p2,
            data: self.data.as_slice(),
        }
    }

    /// Encode the complete command frame (header, length and payload)
    pub fn encode(&self) -> Result<Vec<u8>, ApduError> {
        self.check_len()?;

        let mut buff = Vec::with_capacity(APDU_HEADER_LEN + self.data.len());
        buff.extend_from_slice(&[
            ADA_APDU_CLA,
            self.ins as u8,
            self.p1,
            self.p2,
            self.data.len() as u8,
        ]);
        buff.extend_from_slice(&self.data);

        Ok(buff)
    }
}

/// Debug format requests with hex payloads
impl core::fmt::Debug for Request {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(
            f,
            "Request {{ ins: {}, p1: 0x{:02x}, p2: 0x{:02x}, data: {} }}",
            self.ins,
            self.p1,
            self.p2,
            hex::encode(&self.data)
        )
    }
}
