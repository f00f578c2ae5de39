// Copyright (c) 2023 The ledger-ada Contributors

//! Device status words
//!
//! Every response APDU ends with a two byte status word, [SW_OK] indicates
//! the preceding payload is the operation output.

use num_enum::TryFromPrimitive;
use strum::Display;

use ledger_apdu::APDUErrorCode;

/// Success status word
pub const SW_OK: u16 = 0x9000;

/// Status words reported by the Cardano app (and the device dashboard)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Display, TryFromPrimitive)]
#[repr(u16)]
pub enum DeviceStatusCode {
    /// Device still considers a prior exchange in progress
    StillInCall = 0x6e04,
    /// Request data rejected by the app parser
    InvalidData = 0x6e07,
    /// Derivation path rejected by the app
    InvalidBipPath = 0x6e08,
    /// User rejected the action on the device
    RejectedByUser = 0x6e09,
    /// App security policy rejected the action
    RejectedByPolicy = 0x6e10,
    /// Device is pin-locked
    DeviceLocked = 0x6e11,
    /// Address type not supported by this app version
    UnsupportedAddressType = 0x6e12,
    /// Class not supported, the Cardano app is probably not open
    ClaNotSupported = 0x6e00,
    /// Instruction not supported by this app version
    InsNotSupported = 0x6d00,
    /// Device locked (reported by the dashboard)
    DashboardLocked = 0x5515,
}

impl DeviceStatusCode {
    /// Human readable description of a status code
    pub fn description(&self) -> &'static str {
        use DeviceStatusCode::*;

        match self {
            StillInCall => "Ledger device is not ready (previous call is still in progress)",
            InvalidData => "Invalid data supplied to Ledger",
            InvalidBipPath => "Invalid derivation path supplied to Ledger",
            RejectedByUser => "Action rejected by user",
            RejectedByPolicy => "Action rejected by Ledger's security policy",
            DeviceLocked => "Device is locked",
            UnsupportedAddressType => "Unsupported address type",
            ClaNotSupported => "Wrong Ledger app",
            InsNotSupported => "Instruction not supported by this app version",
            DashboardLocked => "Device is locked",
        }
    }
}

/// Describe any status word, falling back to generic ISO7816 codes
pub fn describe(code: u16) -> String {
    if let Ok(c) = DeviceStatusCode::try_from(code) {
        return c.description().to_string();
    }

    match APDUErrorCode::try_from(code) {
        Ok(c) => format!("General error {c:?} (0x{code:04x})"),
        Err(_) => format!("Unknown device status 0x{code:04x}"),
    }
}
