// Copyright (c) 2023 The ledger-ada Contributors

//! Transaction stage encoders

use ledger_ada_apdu::{
    tx::{CertificateType, OutputType, PoolOwnerType, RelayType},
    wire::WireWrite,
};

use super::address_params;
use crate::{compat::DeviceCompatibility, validate::*};

/// Encode the transaction init stage
pub(crate) fn tx_init(tx: &ParsedTransaction, compat: &DeviceCompatibility, witnesses: usize) -> Vec<u8> {
    let mut buff = vec![];

    buff.put_u8(tx.network.network_id)
        .put_u32(tx.network.protocol_magic)
        .put_option_flag(tx.ttl.is_some())
        .put_option_flag(tx.metadata_hash.is_some());

    if compat.supports_validity_interval_start {
        buff.put_option_flag(tx.validity_interval_start.is_some());
    }

    buff.put_u8(tx.signing_mode as u8)
        .put_u32(tx.inputs.len() as u32)
        .put_u32(tx.outputs.len() as u32)
        .put_u32(tx.certificates.len() as u32)
        .put_u32(tx.withdrawals.len() as u32)
        .put_u32(witnesses as u32);

    buff
}

pub(crate) fn tx_input(i: &ParsedInput) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_bytes(i.tx_hash.as_bytes()).put_u32(i.output_index);
    buff
}

/// Encode output basic data, the asset group count is only sent to multi-asset aware apps
pub(crate) fn tx_output_basic(o: &ParsedOutput, compat: &DeviceCompatibility) -> Vec<u8> {
    let mut buff = vec![];

    match &o.destination {
        ParsedOutputDestination::ThirdParty(a) => {
            buff.put_u8(OutputType::AddressBytes as u8)
                .put_var_bytes(a.as_bytes());
        }
        ParsedOutputDestination::DeviceOwned(p) => {
            buff.put_u8(OutputType::AddressParams as u8);
            address_params(&mut buff, p);
        }
    }

    buff.put_u64(o.amount.value());

    if compat.supports_multi_assets {
        buff.put_u32(o.token_bundle.len() as u32);
    }

    buff
}

pub(crate) fn tx_asset_group(g: &ParsedAssetGroup) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_bytes(g.policy_id.as_bytes())
        .put_u32(g.tokens.len() as u32);
    buff
}

pub(crate) fn tx_token(t: &ParsedToken) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_var_bytes(t.asset_name.as_bytes())
        .put_u64(t.amount.value());
    buff
}

pub(crate) fn tx_u64(v: &Uint64) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_u64(v.value());
    buff
}

/// Encode a certificate, pool registrations only carry the type here
pub(crate) fn tx_certificate(c: &ParsedCertificate) -> Vec<u8> {
    let mut buff = vec![];

    match c {
        ParsedCertificate::StakeRegistration { path } => {
            buff.put_u8(CertificateType::StakeRegistration as u8)
                .put_path(path.as_slice());
        }
        ParsedCertificate::StakeDeregistration { path } => {
            buff.put_u8(CertificateType::StakeDeregistration as u8)
                .put_path(path.as_slice());
        }
        ParsedCertificate::StakeDelegation {
            path,
            pool_key_hash,
        } => {
            buff.put_u8(CertificateType::StakeDelegation as u8)
                .put_path(path.as_slice())
                .put_bytes(pool_key_hash.as_bytes());
        }
        ParsedCertificate::StakePoolRegistration(_) => {
            buff.put_u8(CertificateType::StakePoolRegistration as u8);
        }
    }

    buff
}

pub(crate) fn pool_init(p: &ParsedPoolParams) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_u32(p.owners.len() as u32)
        .put_u32(p.relays.len() as u32);
    buff
}

pub(crate) fn pool_params(p: &ParsedPoolParams) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_bytes(p.key_hash.as_bytes())
        .put_bytes(p.vrf_key_hash.as_bytes())
        .put_u64(p.pledge.value())
        .put_u64(p.cost.value())
        .put_u64(p.margin.numerator.value())
        .put_u64(p.margin.denominator.value())
        .put_bytes(p.reward_account.as_bytes());
    buff
}

pub(crate) fn pool_owner(o: &ParsedPoolOwner) -> Vec<u8> {
    let mut buff = vec![];
    match o {
        ParsedPoolOwner::Path(p) => buff
            .put_u8(PoolOwnerType::Path as u8)
            .put_path(p.as_slice()),
        ParsedPoolOwner::KeyHash(h) => buff
            .put_u8(PoolOwnerType::KeyHash as u8)
            .put_bytes(h.as_bytes()),
    };
    buff
}

fn put_port(buff: &mut Vec<u8>, port: Option<u16>) {
    buff.put_option_flag(port.is_some());
    if let Some(p) = port {
        buff.put_u16(p);
    }
}

/// Encode a pool relay, dns names are the trailing field and carry no length prefix
pub(crate) fn pool_relay(r: &ParsedRelay) -> Vec<u8> {
    let mut buff = vec![];

    match r {
        ParsedRelay::SingleHostAddr { port, ipv4, ipv6 } => {
            buff.put_u8(RelayType::SingleHostAddr as u8);
            put_port(&mut buff, *port);

            buff.put_option_flag(ipv4.is_some());
            if let Some(a) = ipv4 {
                buff.put_bytes(a);
            }

            buff.put_option_flag(ipv6.is_some());
            if let Some(a) = ipv6 {
                buff.put_bytes(a);
            }
        }
        ParsedRelay::SingleHostName { port, dns_name } => {
            buff.put_u8(RelayType::SingleHostName as u8);
            put_port(&mut buff, *port);
            buff.put_bytes(dns_name.as_bytes());
        }
        ParsedRelay::MultiHostName { dns_name } => {
            buff.put_u8(RelayType::MultiHostName as u8)
                .put_bytes(dns_name.as_bytes());
        }
    }

    buff
}

pub(crate) fn pool_metadata(m: &Option<ParsedPoolMetadata>) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_option_flag(m.is_some());
    if let Some(m) = m {
        buff.put_bytes(m.hash.as_bytes()).put_bytes(m.url.as_bytes());
    }
    buff
}

pub(crate) fn tx_withdrawal(w: &ParsedWithdrawal) -> Vec<u8> {
    let mut buff = vec![];
    buff.put_u64(w.amount.value()).put_path(w.path.as_slice());
    buff
}
