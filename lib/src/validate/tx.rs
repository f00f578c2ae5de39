// Copyright (c) 2023 The ledger-ada Contributors

//! Transaction validation

use std::net::Ipv4Addr;

use ledger_ada_apdu::{address::MAX_NETWORK_ID, tx::SigningMode};

use super::*;
use crate::{
    error::InvalidDataReason,
    types::{
        AssetGroup, Certificate, Margin, Network, PoolMetadata, PoolOwner, PoolParams, Relay,
        Transaction, TxInput, TxOutput, TxOutputDestination, Withdrawal,
    },
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedInput {
    pub tx_hash: FixlenHex<32>,
    pub output_index: u32,
    pub path: Option<ValidBip32Path>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParsedOutputDestination {
    ThirdParty(VarlenHex),
    DeviceOwned(ParsedAddressParams),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedToken {
    pub asset_name: VarlenHex,
    pub amount: Uint64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedAssetGroup {
    pub policy_id: FixlenHex<28>,
    pub tokens: Vec<ParsedToken>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedOutput {
    pub destination: ParsedOutputDestination,
    pub amount: Uint64,
    pub token_bundle: Vec<ParsedAssetGroup>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedMargin {
    pub numerator: Uint64,
    pub denominator: Uint64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParsedPoolOwner {
    Path(ValidBip32Path),
    KeyHash(FixlenHex<28>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParsedRelay {
    SingleHostAddr {
        port: Option<u16>,
        ipv4: Option<[u8; 4]>,
        ipv6: Option<[u8; 16]>,
    },
    SingleHostName {
        port: Option<u16>,
        dns_name: AsciiString,
    },
    MultiHostName {
        dns_name: AsciiString,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedPoolMetadata {
    pub url: AsciiString,
    pub hash: FixlenHex<32>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedPoolParams {
    pub key_hash: FixlenHex<28>,
    pub vrf_key_hash: FixlenHex<32>,
    pub pledge: Uint64,
    pub cost: Uint64,
    pub margin: ParsedMargin,
    pub reward_account: FixlenHex<29>,
    pub owners: Vec<ParsedPoolOwner>,
    pub relays: Vec<ParsedRelay>,
    pub metadata: Option<ParsedPoolMetadata>,
}

impl ParsedPoolParams {
    /// The (single) device owned pool owner path
    pub fn owner_path(&self) -> Option<&ValidBip32Path> {
        self.owners.iter().find_map(|o| match o {
            ParsedPoolOwner::Path(p) => Some(p),
            _ => None,
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum ParsedCertificate {
    StakeRegistration {
        path: ValidBip32Path,
    },
    StakeDeregistration {
        path: ValidBip32Path,
    },
    StakeDelegation {
        path: ValidBip32Path,
        pool_key_hash: FixlenHex<28>,
    },
    StakePoolRegistration(Box<ParsedPoolParams>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedWithdrawal {
    pub path: ValidBip32Path,
    pub amount: Uint64,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedTransaction {
    pub network: Network,
    pub inputs: Vec<ParsedInput>,
    pub outputs: Vec<ParsedOutput>,
    pub fee: Uint64,
    pub ttl: Option<Uint64>,
    pub certificates: Vec<ParsedCertificate>,
    pub withdrawals: Vec<ParsedWithdrawal>,
    pub metadata_hash: Option<FixlenHex<32>>,
    pub validity_interval_start: Option<Uint64>,
    pub signing_mode: SigningMode,
}

impl ParsedTransaction {
    /// Pool registration certificate, if present
    pub fn pool_registration(&self) -> Option<&ParsedPoolParams> {
        self.certificates.iter().find_map(|c| match c {
            ParsedCertificate::StakePoolRegistration(p) => Some(p.as_ref()),
            _ => None,
        })
    }

    /// Unique key paths requiring a witness, in transaction order
    pub fn witness_paths(&self) -> Vec<ValidBip32Path> {
        let mut paths: Vec<ValidBip32Path> = vec![];
        let mut add = |p: &ValidBip32Path| {
            if !paths.contains(p) {
                paths.push(p.clone());
            }
        };

        for i in &self.inputs {
            if let Some(p) = &i.path {
                add(p);
            }
        }

        for c in &self.certificates {
            match c {
                ParsedCertificate::StakeDeregistration { path }
                | ParsedCertificate::StakeDelegation { path, .. } => add(path),
                ParsedCertificate::StakePoolRegistration(p) => {
                    if let Some(p) = p.owner_path() {
                        add(p);
                    }
                }
                ParsedCertificate::StakeRegistration { .. } => (),
            }
        }

        for w in &self.withdrawals {
            add(&w.path);
        }

        paths
    }

    /// Check whether any output carries native tokens
    pub fn has_tokens(&self) -> bool {
        self.outputs.iter().any(|o| !o.token_bundle.is_empty())
    }
}

fn parse_input(i: &TxInput) -> Result<ParsedInput, InvalidDataReason> {
    Ok(ParsedInput {
        tx_hash: parse_hex_fixed(&i.tx_hash, "input tx hash")?,
        output_index: i.output_index,
        path: match &i.path {
            Some(p) => Some(parse_path(p, PathSpec::Generic, "input path")?),
            None => None,
        },
    })
}

fn parse_token_bundle(
    groups: &[AssetGroup],
) -> Result<Vec<ParsedAssetGroup>, InvalidDataReason> {
    if groups.len() > MAX_ASSET_GROUPS {
        return Err(InvalidDataReason::TooManyAssetGroups);
    }

    groups
        .iter()
        .map(|g| {
            if g.tokens.len() > MAX_TOKENS_PER_GROUP {
                return Err(InvalidDataReason::TooManyTokens);
            }

            let tokens = g
                .tokens
                .iter()
                .map(|t| {
                    Ok(ParsedToken {
                        asset_name: parse_hex_max(
                            &t.asset_name,
                            MAX_ASSET_NAME_LENGTH,
                            InvalidDataReason::AssetNameTooLong,
                        )?,
                        amount: parse_uint64(&t.amount, u64::MAX, "token amount")?,
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;

            Ok(ParsedAssetGroup {
                policy_id: parse_hex_fixed(&g.policy_id, "policy id")?,
                tokens,
            })
        })
        .collect()
}

fn parse_output(o: &TxOutput) -> Result<ParsedOutput, InvalidDataReason> {
    let destination = match &o.destination {
        TxOutputDestination::ThirdParty { address_hex } => {
            ParsedOutputDestination::ThirdParty(parse_hex_max(
                address_hex,
                MAX_ADDRESS_BYTES,
                InvalidDataReason::InvalidHex("output address"),
            )?)
        }
        TxOutputDestination::DeviceOwned { params } => {
            let params = parse_address_params(params)?;
            if params.spending_path().is_none() {
                return Err(InvalidDataReason::AddressSpendingInvalid("device owned output"));
            }
            ParsedOutputDestination::DeviceOwned(params)
        }
    };

    Ok(ParsedOutput {
        destination,
        amount: parse_uint64(&o.amount, MAX_LOVELACE_SUPPLY, "output amount")?,
        token_bundle: match &o.token_bundle {
            Some(b) => parse_token_bundle(b)?,
            None => vec![],
        },
    })
}

/// Validate a pool margin fraction
pub(crate) fn parse_margin(m: &Margin) -> Result<ParsedMargin, InvalidDataReason> {
    let numerator = parse_uint64(&m.numerator, POOL_MARGIN_DENOMINATOR_MAX, "margin numerator")?;
    let denominator = parse_uint64(
        &m.denominator,
        POOL_MARGIN_DENOMINATOR_MAX,
        "margin denominator",
    )?;

    if numerator > denominator {
        return Err(InvalidDataReason::MarginNumeratorExceedsDenominator);
    }

    Ok(ParsedMargin {
        numerator,
        denominator,
    })
}

fn parse_port(port: Option<u32>) -> Result<Option<u16>, InvalidDataReason> {
    match port {
        Some(p) => u16::try_from(p)
            .map(Some)
            .map_err(|_| InvalidDataReason::RelayPortInvalid),
        None => Ok(None),
    }
}

fn parse_ipv4(s: &str) -> Result<[u8; 4], InvalidDataReason> {
    // Zero padded octets are rejected by the std parser
    s.parse::<Ipv4Addr>()
        .map(|a| a.octets())
        .map_err(|_| InvalidDataReason::RelayIpv4Invalid)
}

/// IPv6 addresses must be written in full, compressed (`::`) forms are rejected
fn parse_ipv6(s: &str) -> Result<[u8; 16], InvalidDataReason> {
    let stripped = s.replace(':', "");
    if stripped.len() != 32 {
        return Err(InvalidDataReason::RelayIpv6Invalid);
    }

    let mut b = [0u8; 16];
    hex::decode_to_slice(&stripped, &mut b).map_err(|_| InvalidDataReason::RelayIpv6Invalid)?;
    Ok(b)
}

fn parse_dns_name(s: &str) -> Result<AsciiString, InvalidDataReason> {
    parse_ascii(s, MAX_DNS_NAME_LENGTH, InvalidDataReason::RelayDnsNameInvalid)
}

// Address / port combinations per relay type are not checked
fn parse_relay(r: &Relay) -> Result<ParsedRelay, InvalidDataReason> {
    match r {
        Relay::SingleHostAddr { port, ipv4, ipv6 } => Ok(ParsedRelay::SingleHostAddr {
            port: parse_port(*port)?,
            ipv4: ipv4.as_deref().map(parse_ipv4).transpose()?,
            ipv6: ipv6.as_deref().map(parse_ipv6).transpose()?,
        }),
        Relay::SingleHostName { port, dns_name } => Ok(ParsedRelay::SingleHostName {
            port: parse_port(*port)?,
            dns_name: parse_dns_name(dns_name)?,
        }),
        Relay::MultiHostName { dns_name } => Ok(ParsedRelay::MultiHostName {
            dns_name: parse_dns_name(dns_name)?,
        }),
    }
}

fn parse_pool_owner(o: &PoolOwner) -> Result<ParsedPoolOwner, InvalidDataReason> {
    match o {
        PoolOwner::Path(p) => Ok(ParsedPoolOwner::Path(parse_path(
            p,
            PathSpec::Generic,
            "pool owner path",
        )?)),
        PoolOwner::KeyHash(h) => Ok(ParsedPoolOwner::KeyHash(parse_hex_fixed(
            h,
            "pool owner key hash",
        )?)),
    }
}

fn parse_pool_metadata(m: &PoolMetadata) -> Result<ParsedPoolMetadata, InvalidDataReason> {
    Ok(ParsedPoolMetadata {
        url: parse_ascii(&m.url, MAX_URL_LENGTH, InvalidDataReason::PoolMetadataUrlInvalid)?,
        hash: parse_hex_fixed(&m.hash, "pool metadata hash")?,
    })
}

pub(crate) fn parse_pool_params(p: &PoolParams) -> Result<ParsedPoolParams, InvalidDataReason> {
    if p.owners.len() > MAX_POOL_OWNERS {
        return Err(InvalidDataReason::TooManyPoolOwners);
    }
    if p.relays.len() > MAX_POOL_RELAYS {
        return Err(InvalidDataReason::TooManyPoolRelays);
    }

    let owners = p
        .owners
        .iter()
        .map(parse_pool_owner)
        .collect::<Result<Vec<_>, _>>()?;

    let path_owners = owners
        .iter()
        .filter(|o| matches!(o, ParsedPoolOwner::Path(_)))
        .count();
    if path_owners != 1 {
        return Err(InvalidDataReason::PoolOwnersSinglePathRequired);
    }

    Ok(ParsedPoolParams {
        key_hash: parse_hex_fixed(&p.pool_key_hash, "pool key hash")?,
        vrf_key_hash: parse_hex_fixed(&p.vrf_key_hash, "vrf key hash")?,
        pledge: parse_uint64(&p.pledge, MAX_LOVELACE_SUPPLY, "pool pledge")?,
        cost: parse_uint64(&p.cost, MAX_LOVELACE_SUPPLY, "pool cost")?,
        margin: parse_margin(&p.margin)?,
        reward_account: parse_hex_fixed(&p.reward_account, "pool reward account")?,
        owners,
        relays: p
            .relays
            .iter()
            .map(parse_relay)
            .collect::<Result<Vec<_>, _>>()?,
        metadata: p.metadata.as_ref().map(parse_pool_metadata).transpose()?,
    })
}

pub(crate) fn parse_certificate(c: &Certificate) -> Result<ParsedCertificate, InvalidDataReason> {
    let path = |p: &[u32]| parse_path(p, PathSpec::Generic, "certificate path");

    match c {
        Certificate::StakeRegistration { path: p } => {
            Ok(ParsedCertificate::StakeRegistration { path: path(p)? })
        }
        Certificate::StakeDeregistration { path: p } => {
            Ok(ParsedCertificate::StakeDeregistration { path: path(p)? })
        }
        Certificate::StakeDelegation {
            path: p,
            pool_key_hash,
        } => Ok(ParsedCertificate::StakeDelegation {
            path: path(p)?,
            pool_key_hash: parse_hex_fixed(pool_key_hash, "delegation pool key hash")?,
        }),
        Certificate::StakePoolRegistration { pool_params } => Ok(
            ParsedCertificate::StakePoolRegistration(Box::new(parse_pool_params(pool_params)?)),
        ),
    }
}

/// Validate a certificate list, a pool registration must be the only certificate
pub(crate) fn parse_certificates(
    certs: &[Certificate],
) -> Result<Vec<ParsedCertificate>, InvalidDataReason> {
    let parsed = certs
        .iter()
        .map(parse_certificate)
        .collect::<Result<Vec<_>, _>>()?;

    let has_pool = parsed
        .iter()
        .any(|c| matches!(c, ParsedCertificate::StakePoolRegistration(_)));
    if has_pool && parsed.len() != 1 {
        return Err(InvalidDataReason::CertificatesCombinationForbidden);
    }

    Ok(parsed)
}

fn parse_withdrawal(w: &Withdrawal) -> Result<ParsedWithdrawal, InvalidDataReason> {
    Ok(ParsedWithdrawal {
        path: parse_path(&w.path, PathSpec::Generic, "withdrawal path")?,
        amount: parse_uint64(&w.amount, MAX_LOVELACE_SUPPLY, "withdrawal amount")?,
    })
}

/// Validate a transaction for signing
pub(crate) fn parse_transaction(tx: &Transaction) -> Result<ParsedTransaction, InvalidDataReason> {
    if tx.network.network_id > MAX_NETWORK_ID {
        return Err(InvalidDataReason::NetworkIdInvalid(tx.network.network_id));
    }

    let inputs = tx
        .inputs
        .iter()
        .map(parse_input)
        .collect::<Result<Vec<_>, _>>()?;
    let outputs = tx
        .outputs
        .iter()
        .map(parse_output)
        .collect::<Result<Vec<_>, _>>()?;

    let fee = parse_uint64(&tx.fee, MAX_LOVELACE_SUPPLY, "fee")?;
    let ttl = tx
        .ttl
        .as_deref()
        .map(|v| parse_uint64(v, u64::MAX, "ttl"))
        .transpose()?;

    let certificates = parse_certificates(&tx.certificates)?;

    let withdrawals = tx
        .withdrawals
        .iter()
        .map(parse_withdrawal)
        .collect::<Result<Vec<_>, _>>()?;

    let metadata_hash = tx
        .metadata_hash
        .as_deref()
        .map(|h| parse_hex_fixed(h, "metadata hash"))
        .transpose()?;
    let validity_interval_start = tx
        .validity_interval_start
        .as_deref()
        .map(|v| parse_uint64(v, u64::MAX, "validity interval start"))
        .transpose()?;

    // Signing a pool registration as an owner, only the owner witness is provided
    let pool_registration = certificates
        .iter()
        .any(|c| matches!(c, ParsedCertificate::StakePoolRegistration(_)));

    let signing_mode = match pool_registration {
        true => {
            if inputs.iter().any(|i| i.path.is_some()) {
                return Err(InvalidDataReason::PoolRegistrationInputWithPath);
            }
            if outputs
                .iter()
                .any(|o| matches!(o.destination, ParsedOutputDestination::DeviceOwned(_)))
            {
                return Err(InvalidDataReason::PoolRegistrationOutputWithPath);
            }
            if !withdrawals.is_empty() {
                return Err(InvalidDataReason::PoolRegistrationWithdrawalsNotAllowed);
            }
            SigningMode::PoolRegistrationAsOwner
        }
        false => SigningMode::Ordinary,
    };

    Ok(ParsedTransaction {
        network: tx.network,
        inputs,
        outputs,
        fee,
        ttl,
        certificates,
        withdrawals,
        metadata_hash,
        validity_interval_start,
        signing_mode,
    })
}
