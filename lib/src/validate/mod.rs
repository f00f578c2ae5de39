// Copyright (c) 2023 The ledger-ada Contributors

//! Request validation
//!
//! Raw caller requests are parsed into a validated intermediate representation
//! prior to encoding. Leaf types ([ValidBip32Path], [FixlenHex], [VarlenHex],
//! [Uint64], [AsciiString]) have private contents and may only be produced by
//! the `parse_*` functions in this module, so encoders may assume every value
//! they receive is well formed.

use crate::error::InvalidDataReason;

mod address;
pub(crate) use address::*;

mod misc;
pub(crate) use misc::*;

mod tx;
pub(crate) use tx::*;

/// Maximum derivation path length accepted by the app
pub const MAX_PATH_LENGTH: usize = 10;

/// Maximum lovelace supply (45 billion ADA)
pub const MAX_LOVELACE_SUPPLY: u64 = 45_000_000_000_000_000;

/// Bound on pool margin numerator / denominator
pub const POOL_MARGIN_DENOMINATOR_MAX: u64 = 1_000_000_000_000_000_000;

pub const MAX_ASSET_GROUPS: usize = 1000;
pub const MAX_TOKENS_PER_GROUP: usize = 1000;
pub const MAX_ASSET_NAME_LENGTH: usize = 32;
pub const MAX_POOL_OWNERS: usize = 1000;
pub const MAX_POOL_RELAYS: usize = 1000;
pub const MAX_DNS_NAME_LENGTH: usize = 64;
pub const MAX_URL_LENGTH: usize = 64;
pub const MAX_ADDRESS_BYTES: usize = 128;

/// Maximum nesting of native scripts, a lone simple script has depth 1
pub const MAX_NATIVE_SCRIPT_DEPTH: usize = 11;

/// Path shape rules, these differ per operation
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum PathSpec {
    /// Extended public key export, account level or deeper
    ExtPubKey,
    /// Addresses, witnesses, certificates and other key references
    Generic,
    /// Pool cold key (operational certificates), fixed length, fully hardened
    ColdKey,
}

impl PathSpec {
    fn bounds(&self) -> (usize, usize) {
        match self {
            PathSpec::ExtPubKey => (3, MAX_PATH_LENGTH),
            PathSpec::Generic => (1, MAX_PATH_LENGTH),
            PathSpec::ColdKey => (4, 4),
        }
    }
}

/// Validated derivation path
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) struct ValidBip32Path(Vec<u32>);

impl ValidBip32Path {
    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn to_vec(&self) -> Vec<u32> {
        self.0.clone()
    }
}

pub(crate) fn parse_path(
    path: &[u32],
    spec: PathSpec,
    field: &'static str,
) -> Result<ValidBip32Path, InvalidDataReason> {
    let (min, max) = spec.bounds();
    if path.len() < min || path.len() > max {
        return Err(InvalidDataReason::PathLength {
            field,
            len: path.len(),
        });
    }

    if spec == PathSpec::ColdKey && path.iter().any(|i| i & crate::types::HARDENED == 0) {
        return Err(InvalidDataReason::PathNotHardened(field));
    }

    Ok(ValidBip32Path(path.to_vec()))
}

/// Validated fixed length byte string (from hex)
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct FixlenHex<const N: usize>([u8; N]);

impl<const N: usize> FixlenHex<N> {
    pub fn as_bytes(&self) -> &[u8; N] {
        &self.0
    }
}

pub(crate) fn parse_hex_fixed<const N: usize>(
    s: &str,
    field: &'static str,
) -> Result<FixlenHex<N>, InvalidDataReason> {
    let mut b = [0u8; N];
    hex::decode_to_slice(s, &mut b).map_err(|_| InvalidDataReason::InvalidHex(field))?;
    Ok(FixlenHex(b))
}

/// Validated variable length byte string (from hex)
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct VarlenHex(Vec<u8>);

impl VarlenHex {
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

pub(crate) fn parse_hex_max(
    s: &str,
    max: usize,
    err: InvalidDataReason,
) -> Result<VarlenHex, InvalidDataReason> {
    let b = hex::decode(s).map_err(|_| err.clone())?;
    if b.len() > max {
        return Err(err);
    }
    Ok(VarlenHex(b))
}

/// Validated bounded unsigned integer (from a decimal string)
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct Uint64(u64);

impl Uint64 {
    pub fn value(&self) -> u64 {
        self.0
    }
}

/// Parse a decimal amount string, digits only, no sign or whitespace
pub(crate) fn parse_uint64(
    s: &str,
    max: u64,
    field: &'static str,
) -> Result<Uint64, InvalidDataReason> {
    if s.is_empty() || !s.bytes().all(|c| c.is_ascii_digit()) {
        return Err(InvalidDataReason::InvalidAmount(field));
    }

    match s.parse::<u64>() {
        Ok(v) if v <= max => Ok(Uint64(v)),
        _ => Err(InvalidDataReason::InvalidAmount(field)),
    }
}

/// Validated printable ASCII string
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct AsciiString(String);

impl AsciiString {
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

pub(crate) fn parse_ascii(
    s: &str,
    max: usize,
    err: InvalidDataReason,
) -> Result<AsciiString, InvalidDataReason> {
    if s.is_empty() || s.len() > max || !s.bytes().all(|c| (0x20..=0x7e).contains(&c)) {
        return Err(err);
    }
    Ok(AsciiString(s.to_string()))
}
