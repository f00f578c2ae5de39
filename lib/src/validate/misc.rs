// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::vote::MAX_VOTE_CAST_DATA;

use super::*;
use crate::{
    error::InvalidDataReason,
    types::{Bip32Path, NativeScript, OperationalCertificate, VoteRequest},
};

/// Validate paths for extended public key export
pub(crate) fn parse_ext_pubkey_paths(
    paths: &[Bip32Path],
) -> Result<Vec<ValidBip32Path>, InvalidDataReason> {
    if paths.is_empty() {
        return Err(InvalidDataReason::ExtPubKeyPathsEmpty);
    }

    paths
        .iter()
        .map(|p| parse_path(p, PathSpec::ExtPubKey, "extended public key path"))
        .collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedOperationalCertificate {
    pub kes_public_key: FixlenHex<32>,
    pub kes_period: Uint64,
    pub issue_counter: Uint64,
    pub cold_key_path: ValidBip32Path,
}

pub(crate) fn parse_operational_certificate(
    c: &OperationalCertificate,
) -> Result<ParsedOperationalCertificate, InvalidDataReason> {
    Ok(ParsedOperationalCertificate {
        kes_public_key: parse_hex_fixed(&c.kes_public_key, "kes public key")?,
        kes_period: parse_uint64(&c.kes_period, u64::MAX, "kes period")?,
        issue_counter: parse_uint64(&c.issue_counter, u64::MAX, "issue counter")?,
        cold_key_path: parse_path(&c.cold_key_path, PathSpec::ColdKey, "cold key path")?,
    })
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParsedNativeScript {
    PubkeyPath(ValidBip32Path),
    PubkeyHash(FixlenHex<28>),
    All(Vec<ParsedNativeScript>),
    Any(Vec<ParsedNativeScript>),
    NOfK {
        required: u32,
        scripts: Vec<ParsedNativeScript>,
    },
    InvalidBefore(Uint64),
    InvalidHereafter(Uint64),
}

fn parse_scripts(
    s: &[NativeScript],
    depth: usize,
) -> Result<Vec<ParsedNativeScript>, InvalidDataReason> {
    s.iter().map(|c| parse_script_at(c, depth)).collect()
}

pub(crate) fn parse_native_script(
    s: &NativeScript,
) -> Result<ParsedNativeScript, InvalidDataReason> {
    parse_script_at(s, 1)
}

fn parse_script_at(
    s: &NativeScript,
    depth: usize,
) -> Result<ParsedNativeScript, InvalidDataReason> {
    if depth > MAX_NATIVE_SCRIPT_DEPTH {
        return Err(InvalidDataReason::NativeScriptTooDeep);
    }

    match s {
        NativeScript::PubkeyPath { path } => Ok(ParsedNativeScript::PubkeyPath(parse_path(
            path,
            PathSpec::Generic,
            "script key path",
        )?)),
        NativeScript::PubkeyHash { key_hash } => Ok(ParsedNativeScript::PubkeyHash(
            parse_hex_fixed(key_hash, "script key hash")?,
        )),
        NativeScript::All { scripts } => Ok(ParsedNativeScript::All(parse_scripts(
            scripts,
            depth + 1,
        )?)),
        NativeScript::Any { scripts } => Ok(ParsedNativeScript::Any(parse_scripts(
            scripts,
            depth + 1,
        )?)),
        NativeScript::NOfK { required, scripts } => {
            if *required as usize > scripts.len() {
                return Err(InvalidDataReason::NativeScriptRequiredInvalid);
            }
            Ok(ParsedNativeScript::NOfK {
                required: *required,
                scripts: parse_scripts(scripts, depth + 1)?,
            })
        }
        NativeScript::InvalidBefore { slot } => Ok(ParsedNativeScript::InvalidBefore(
            parse_uint64(slot, u64::MAX, "invalid before slot")?,
        )),
        NativeScript::InvalidHereafter { slot } => Ok(ParsedNativeScript::InvalidHereafter(
            parse_uint64(slot, u64::MAX, "invalid hereafter slot")?,
        )),
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedVoteRequest {
    pub cast_data: VarlenHex,
    pub witness_path: ValidBip32Path,
}

pub(crate) fn parse_vote_request(v: &VoteRequest) -> Result<ParsedVoteRequest, InvalidDataReason> {
    let cast_data = parse_hex_max(
        &v.vote_cast_data_hex,
        MAX_VOTE_CAST_DATA,
        InvalidDataReason::VoteCastDataInvalid,
    )?;
    if cast_data.as_bytes().is_empty() {
        return Err(InvalidDataReason::VoteCastDataInvalid);
    }

    Ok(ParsedVoteRequest {
        cast_data,
        witness_path: parse_path(&v.witness_path, PathSpec::Generic, "vote witness path")?,
    })
}
