// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::{
    status::{describe, DeviceStatusCode},
    ApduError,
};

use crate::{compat::Feature, types::DeviceVersion};

/// Ledger Cardano API Error Type
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Request data failed validation, no device exchange was attempted
    #[error("Invalid data: {0}")]
    InvalidData(InvalidDataReason),

    /// Connected app version does not support the requested feature
    #[error("Device app version {version} does not support {feature}")]
    DeviceUnsupported {
        version: DeviceVersion,
        feature: Feature,
    },

    /// Device returned a non-success status
    #[error("Device status: {0}")]
    DeviceStatus(DeviceStatusError),

    /// Response length does not match the request
    #[error("Unexpected response length (expected: {expected}, actual: {actual})")]
    UnexpectedResponseLength { expected: usize, actual: usize },

    /// Response contents could not be interpreted
    #[error("Invalid response: {0}")]
    InvalidResponse(&'static str),

    /// Encoded request exceeds the APDU payload limit
    #[error("Request payload of {0} bytes exceeds APDU maximum")]
    RequestTooLong(usize),

    /// Transport error, passed through from the underlying exchange
    #[error("Transport error: {0}")]
    Transport(anyhow::Error),
}

impl Error {
    /// Request rejected by validation
    pub fn is_validation(&self) -> bool {
        matches!(self, Error::InvalidData(_))
    }

    /// Feature unsupported by the connected app
    pub fn is_compatibility(&self) -> bool {
        matches!(self, Error::DeviceUnsupported { .. })
    }

    /// Device returned a non-success status
    pub fn is_device_status(&self) -> bool {
        matches!(self, Error::DeviceStatus(_))
    }

    /// Host and app disagree on the response format
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            Error::UnexpectedResponseLength { .. } | Error::InvalidResponse(_)
        )
    }

    /// Transport failure
    pub fn is_transport(&self) -> bool {
        matches!(self, Error::Transport(_))
    }

    /// Fetch the validation failure reason, if any
    pub fn invalid_data_reason(&self) -> Option<&InvalidDataReason> {
        match self {
            Error::InvalidData(r) => Some(r),
            _ => None,
        }
    }

    /// Fetch the raw device status code, if any
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::DeviceStatus(s) => Some(s.code),
            _ => None,
        }
    }
}

impl From<InvalidDataReason> for Error {
    fn from(r: InvalidDataReason) -> Self {
        Error::InvalidData(r)
    }
}

impl From<DeviceStatusError> for Error {
    fn from(e: DeviceStatusError) -> Self {
        Error::DeviceStatus(e)
    }
}

impl From<ApduError> for Error {
    fn from(e: ApduError) -> Self {
        match e {
            ApduError::InvalidLength { expected, actual } => {
                Error::UnexpectedResponseLength { expected, actual }
            }
            ApduError::PayloadTooLong(n) => Error::RequestTooLong(n),
            ApduError::InvalidEncoding => Error::InvalidResponse("invalid encoding"),
        }
    }
}

/// Device status error, raw status word and mapped description
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{description} (0x{code:04x})")]
pub struct DeviceStatusError {
    pub code: u16,
    pub description: String,
}

impl DeviceStatusError {
    pub fn new(code: u16) -> Self {
        Self {
            code,
            description: describe(code),
        }
    }

    /// Known Cardano app status, if recognised
    pub fn kind(&self) -> Option<DeviceStatusCode> {
        DeviceStatusCode::try_from(self.code).ok()
    }
}

/// Reasons for rejecting request data
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum InvalidDataReason {
    #[error("invalid derivation path length for {field} ({len} elements)")]
    PathLength { field: &'static str, len: usize },

    #[error("derivation path for {0} must be fully hardened")]
    PathNotHardened(&'static str),

    #[error("no extended public key paths requested")]
    ExtPubKeyPathsEmpty,

    #[error("invalid hex string for {0}")]
    InvalidHex(&'static str),

    #[error("invalid amount for {0}")]
    InvalidAmount(&'static str),

    #[error("invalid network id {0}")]
    NetworkIdInvalid(u8),

    #[error("invalid spending credential for {0} address")]
    AddressSpendingInvalid(&'static str),

    #[error("invalid staking credential for {0} address")]
    AddressStakingInvalid(&'static str),

    #[error("too many asset groups in output")]
    TooManyAssetGroups,

    #[error("too many tokens in asset group")]
    TooManyTokens,

    #[error("asset name too long")]
    AssetNameTooLong,

    #[error("pool margin numerator exceeds denominator")]
    MarginNumeratorExceedsDenominator,

    #[error("too many pool owners")]
    TooManyPoolOwners,

    #[error("too many pool relays")]
    TooManyPoolRelays,

    #[error("pool registration requires exactly one path owner")]
    PoolOwnersSinglePathRequired,

    #[error("invalid relay port")]
    RelayPortInvalid,

    #[error("invalid relay ipv4 address")]
    RelayIpv4Invalid,

    #[error("invalid relay ipv6 address")]
    RelayIpv6Invalid,

    #[error("invalid relay dns name")]
    RelayDnsNameInvalid,

    #[error("invalid pool metadata url")]
    PoolMetadataUrlInvalid,

    #[error("pool registration certificate must be the only certificate")]
    CertificatesCombinationForbidden,

    #[error("inputs with paths are not allowed when signing a pool registration as owner")]
    PoolRegistrationInputWithPath,

    #[error("device owned outputs are not allowed when signing a pool registration as owner")]
    PoolRegistrationOutputWithPath,

    #[error("withdrawals are forbidden when signing a pool registration as owner")]
    PoolRegistrationWithdrawalsNotAllowed,

    #[error("native script requires more signatures than it has children")]
    NativeScriptRequiredInvalid,

    #[error("native script nesting exceeds maximum depth")]
    NativeScriptTooDeep,

    #[error("invalid vote cast data")]
    VoteCastDataInvalid,
}
