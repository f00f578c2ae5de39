// Copyright (c) 2023 The ledger-ada Contributors

//! App version / feature compatibility
//!
//! Features are checked against the connected app version before any
//! feature-specific exchange is issued.

use crate::{types::DeviceVersion, Error};

/// Optional features gated by app version
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display, strum::EnumIter)]
pub enum Feature {
    #[strum(serialize = "this library")]
    Compatible,
    #[strum(serialize = "pool registration certificates")]
    PoolRegistration,
    #[strum(serialize = "bulk public key export")]
    BulkPublicKeyExport,
    #[strum(serialize = "multi-asset outputs")]
    MultiAssets,
    #[strum(serialize = "validity interval start")]
    ValidityIntervalStart,
    #[strum(serialize = "zero TTL")]
    ZeroTtl,
    #[strum(serialize = "operational certificate signing")]
    OperationalCertificate,
    #[strum(serialize = "script payment addresses")]
    ScriptPaymentAddresses,
    #[strum(serialize = "native script hash derivation")]
    NativeScriptHash,
    #[strum(serialize = "CIP-36 vote signing")]
    Cip36Vote,
}

impl Feature {
    /// Minimum app version (major, minor) supporting this feature
    pub fn min_version(&self) -> (u8, u8) {
        use Feature::*;

        match self {
            Compatible => (2, 0),
            PoolRegistration => (2, 1),
            BulkPublicKeyExport => (2, 1),
            MultiAssets => (2, 2),
            ValidityIntervalStart => (2, 2),
            ZeroTtl => (2, 3),
            OperationalCertificate => (2, 4),
            ScriptPaymentAddresses => (3, 0),
            NativeScriptHash => (3, 0),
            Cip36Vote => (6, 0),
        }
    }
}

/// Recommended minimum app version
pub const RECOMMENDED_VERSION: (u8, u8) = (2, 2);

/// Capabilities of a specific app version
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeviceCompatibility {
    pub is_compatible: bool,
    /// Set when an upgrade is recommended
    pub recommended_version: Option<String>,
    pub supports_pool_registration: bool,
    pub supports_bulk_export: bool,
    pub supports_multi_assets: bool,
    pub supports_validity_interval_start: bool,
    pub supports_zero_ttl: bool,
    pub supports_operational_certificate: bool,
    pub supports_script_payment_addresses: bool,
    pub supports_native_script_hash: bool,
    pub supports_cip36_vote: bool,
}

impl From<&DeviceVersion> for DeviceCompatibility {
    fn from(v: &DeviceVersion) -> Self {
        let at = |f: Feature| {
            let (major, minor) = f.min_version();
            v.at_least(major, minor)
        };

        let (rec_major, rec_minor) = RECOMMENDED_VERSION;
        let recommended_version = match v.at_least(rec_major, rec_minor) {
            true => None,
            false => Some(format!("{rec_major}.{rec_minor}")),
        };

        Self {
            is_compatible: at(Feature::Compatible),
            recommended_version,
            supports_pool_registration: at(Feature::PoolRegistration),
            supports_bulk_export: at(Feature::BulkPublicKeyExport),
            supports_multi_assets: at(Feature::MultiAssets),
            supports_validity_interval_start: at(Feature::ValidityIntervalStart),
            supports_zero_ttl: at(Feature::ZeroTtl),
            supports_operational_certificate: at(Feature::OperationalCertificate),
            supports_script_payment_addresses: at(Feature::ScriptPaymentAddresses),
            supports_native_script_hash: at(Feature::NativeScriptHash),
            supports_cip36_vote: at(Feature::Cip36Vote),
        }
    }
}

impl DeviceCompatibility {
    /// Check whether a feature is supported
    pub fn supports(&self, f: Feature) -> bool {
        use Feature::*;

        match f {
            Compatible => self.is_compatible,
            PoolRegistration => self.supports_pool_registration,
            BulkPublicKeyExport => self.supports_bulk_export,
            MultiAssets => self.supports_multi_assets,
            ValidityIntervalStart => self.supports_validity_interval_start,
            ZeroTtl => self.supports_zero_ttl,
            OperationalCertificate => self.supports_operational_certificate,
            ScriptPaymentAddresses => self.supports_script_payment_addresses,
            NativeScriptHash => self.supports_native_script_hash,
            Cip36Vote => self.supports_cip36_vote,
        }
    }
}

/// Check the app version is compatible and supports all requested features
pub fn ensure(version: &DeviceVersion, features: &[Feature]) -> Result<DeviceCompatibility, Error> {
    let compat = DeviceCompatibility::from(version);

    let unsupported = std::iter::once(&Feature::Compatible)
        .chain(features.iter())
        .find(|f| !compat.supports(**f));

    match unsupported {
        Some(f) => Err(Error::DeviceUnsupported {
            version: *version,
            feature: *f,
        }),
        None => Ok(compat),
    }
}
