// Copyright (c) 2023 The ledger-ada Contributors

//! Request payload encoding
//!
//! Encoders take validated values only and never fail, identical inputs
//! always produce identical payloads. Field layouts are described in
//! [ledger_ada_apdu].

use ledger_ada_apdu::{
    address::{SpendingChoice, StakingChoice},
    script::{NativeScriptType, PubkeyChoice, ScriptHashDisplay},
    wire::WireWrite,
};

use crate::validate::*;

mod tx;
pub(crate) use tx::*;

/// Encode a derivation path
pub(crate) fn path(p: &ValidBip32Path) -> Vec<u8> {
    let mut buff = Vec::with_capacity(1 + p.as_slice().len() * 4);
    buff.put_path(p.as_slice());
    buff
}

/// Encode address parameters
pub(crate) fn address_params(buff: &mut Vec<u8>, p: &ParsedAddressParams) {
    buff.put_u8(p.header as u8);

    match p.network {
        NetworkSelector::ProtocolMagic(m) => buff.put_u32(m),
        NetworkSelector::NetworkId(n) => buff.put_u8(n),
    };

    match &p.spending {
        SpendingData::Path(path) => buff
            .put_u8(SpendingChoice::Path as u8)
            .put_path(path.as_slice()),
        SpendingData::ScriptHash(h) => buff
            .put_u8(SpendingChoice::ScriptHash as u8)
            .put_bytes(h.as_bytes()),
        SpendingData::None => buff.put_u8(SpendingChoice::None as u8),
    };

    match &p.staking {
        StakingData::None => buff.put_u8(StakingChoice::None as u8),
        StakingData::KeyPath(path) => buff
            .put_u8(StakingChoice::KeyPath as u8)
            .put_path(path.as_slice()),
        StakingData::KeyHash(h) => buff
            .put_u8(StakingChoice::KeyHash as u8)
            .put_bytes(h.as_bytes()),
        StakingData::Pointer(ptr) => buff
            .put_u8(StakingChoice::BlockchainPointer as u8)
            .put_u32(ptr.block_index)
            .put_u32(ptr.tx_index)
            .put_u32(ptr.certificate_index),
    };
}

/// Encode the first extended public key request, with the remaining key count for bulk exports
pub(crate) fn ext_pubkey_init(p: &ValidBip32Path, remaining: u32) -> Vec<u8> {
    let mut buff = path(p);
    if remaining > 0 {
        buff.put_u32(remaining);
    }
    buff
}

/// Encode an operational certificate signing request
pub(crate) fn operational_certificate(c: &ParsedOperationalCertificate) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_bytes(c.kes_public_key.as_bytes())
        .put_u64(c.kes_period.value())
        .put_u64(c.issue_counter.value())
        .put_path(c.cold_key_path.as_slice());
    buff
}

/// Encode the header of a complex native script (All / Any / N-of-K)
pub(crate) fn native_script_complex(s: &ParsedNativeScript) -> Option<Vec<u8>> {
    let mut buff = vec![];

    match s {
        ParsedNativeScript::All(c) => {
            buff.put_u8(NativeScriptType::All as u8).put_u32(c.len() as u32);
        }
        ParsedNativeScript::Any(c) => {
            buff.put_u8(NativeScriptType::Any as u8).put_u32(c.len() as u32);
        }
        ParsedNativeScript::NOfK { required, scripts } => {
            buff.put_u8(NativeScriptType::NOfK as u8)
                .put_u32(scripts.len() as u32)
                .put_u32(*required);
        }
        _ => return None,
    }

    Some(buff)
}

/// Encode a simple native script (pubkey / timelock)
pub(crate) fn native_script_simple(s: &ParsedNativeScript) -> Option<Vec<u8>> {
    let mut buff = vec![];

    match s {
        ParsedNativeScript::PubkeyPath(p) => {
            buff.put_u8(NativeScriptType::Pubkey as u8)
                .put_u8(PubkeyChoice::Path as u8)
                .put_path(p.as_slice());
        }
        ParsedNativeScript::PubkeyHash(h) => {
            buff.put_u8(NativeScriptType::Pubkey as u8)
                .put_u8(PubkeyChoice::Hash as u8)
                .put_bytes(h.as_bytes());
        }
        ParsedNativeScript::InvalidBefore(slot) => {
            buff.put_u8(NativeScriptType::InvalidBefore as u8)
                .put_u64(slot.value());
        }
        ParsedNativeScript::InvalidHereafter(slot) => {
            buff.put_u8(NativeScriptType::InvalidHereafter as u8)
                .put_u64(slot.value());
        }
        _ => return None,
    }

    Some(buff)
}

/// Encode the native script finish request
pub(crate) fn native_script_finish(display: ScriptHashDisplay) -> Vec<u8> {
    vec![display as u8]
}

/// Encode vote cast data for streaming
pub(crate) fn vote_cast_data(v: &ParsedVoteRequest) -> Vec<u8> {
    let mut buff = Vec::with_capacity(4 + v.cast_data.as_bytes().len());
    buff.put_var_bytes(v.cast_data.as_bytes());
    buff
}
