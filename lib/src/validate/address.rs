// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::address::{AddressHeader, MAX_NETWORK_ID};

use super::{parse_hex_fixed, parse_path, FixlenHex, PathSpec, ValidBip32Path};
use crate::{
    error::InvalidDataReason,
    types::{AddressParams, AddressType, BlockchainPointer, PaymentCredential, StakingCredential},
};

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum SpendingData {
    Path(ValidBip32Path),
    ScriptHash(FixlenHex<28>),
    None,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum StakingData {
    None,
    KeyPath(ValidBip32Path),
    KeyHash(FixlenHex<28>),
    Pointer(BlockchainPointer),
}

/// Byron addresses are bound to a protocol magic, Shelley addresses to a network id
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum NetworkSelector {
    ProtocolMagic(u32),
    NetworkId(u8),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ParsedAddressParams {
    pub header: AddressHeader,
    pub network: NetworkSelector,
    pub spending: SpendingData,
    pub staking: StakingData,
}

impl ParsedAddressParams {
    /// Payment part is a script hash (requires script address support)
    pub fn has_script_payment(&self) -> bool {
        matches!(self.spending, SpendingData::ScriptHash(_))
    }

    /// Device key path for the payment part, if any
    pub fn spending_path(&self) -> Option<&ValidBip32Path> {
        match &self.spending {
            SpendingData::Path(p) => Some(p),
            _ => None,
        }
    }
}

fn parse_spending(
    c: &Option<PaymentCredential>,
    kind: &'static str,
) -> Result<SpendingData, InvalidDataReason> {
    match c {
        Some(PaymentCredential::Path(p)) => Ok(SpendingData::Path(parse_path(
            p,
            PathSpec::Generic,
            "spending path",
        )?)),
        Some(PaymentCredential::ScriptHash(h)) => Ok(SpendingData::ScriptHash(
            parse_hex_fixed(h, "spending script hash")?,
        )),
        None => Err(InvalidDataReason::AddressSpendingInvalid(kind)),
    }
}

fn parse_staking_key(
    c: &Option<StakingCredential>,
    kind: &'static str,
) -> Result<StakingData, InvalidDataReason> {
    match c {
        Some(StakingCredential::Path(p)) => Ok(StakingData::KeyPath(parse_path(
            p,
            PathSpec::Generic,
            "staking path",
        )?)),
        Some(StakingCredential::KeyHash(h)) => Ok(StakingData::KeyHash(parse_hex_fixed(
            h,
            "staking key hash",
        )?)),
        _ => Err(InvalidDataReason::AddressStakingInvalid(kind)),
    }
}

fn parse_byron_spending(
    c: &Option<PaymentCredential>,
    kind: &'static str,
) -> Result<SpendingData, InvalidDataReason> {
    match c {
        Some(PaymentCredential::Path(path)) => Ok(SpendingData::Path(parse_path(
            path,
            PathSpec::Generic,
            "spending path",
        )?)),
        _ => Err(InvalidDataReason::AddressSpendingInvalid(kind)),
    }
}

fn network_id(p: &AddressParams) -> Result<NetworkSelector, InvalidDataReason> {
    match p.network.network_id <= MAX_NETWORK_ID {
        true => Ok(NetworkSelector::NetworkId(p.network.network_id)),
        false => Err(InvalidDataReason::NetworkIdInvalid(p.network.network_id)),
    }
}

/// Validate address parameters, checking credentials match the address type
pub(crate) fn parse_address_params(
    p: &AddressParams,
) -> Result<ParsedAddressParams, InvalidDataReason> {
    let kind: &'static str = p.address_type.into();

    let (network, spending, staking) = match p.address_type {
        AddressType::Byron => {
            let spending = parse_byron_spending(&p.payment, kind)?;
            if p.staking.is_some() {
                return Err(InvalidDataReason::AddressStakingInvalid(kind));
            }
            (
                NetworkSelector::ProtocolMagic(p.network.protocol_magic),
                spending,
                StakingData::None,
            )
        }
        AddressType::Base => (
            network_id(p)?,
            parse_spending(&p.payment, kind)?,
            parse_staking_key(&p.staking, kind)?,
        ),
        AddressType::Pointer => {
            let spending = parse_spending(&p.payment, kind)?;
            match &p.staking {
                Some(StakingCredential::Pointer(ptr)) => {
                    (network_id(p)?, spending, StakingData::Pointer(*ptr))
                }
                _ => return Err(InvalidDataReason::AddressStakingInvalid(kind)),
            }
        }
        AddressType::Enterprise => {
            let spending = parse_spending(&p.payment, kind)?;
            if p.staking.is_some() {
                return Err(InvalidDataReason::AddressStakingInvalid(kind));
            }
            (network_id(p)?, spending, StakingData::None)
        }
        AddressType::Reward => {
            if p.payment.is_some() {
                return Err(InvalidDataReason::AddressSpendingInvalid(kind));
            }
            (
                network_id(p)?,
                SpendingData::None,
                parse_staking_key(&p.staking, kind)?,
            )
        }
    };

    let script = matches!(spending, SpendingData::ScriptHash(_));
    let header = match (p.address_type, script) {
        (AddressType::Byron, _) => AddressHeader::Byron,
        (AddressType::Base, false) => AddressHeader::BasePaymentKey,
        (AddressType::Base, true) => AddressHeader::BasePaymentScript,
        (AddressType::Pointer, false) => AddressHeader::PointerPaymentKey,
        (AddressType::Pointer, true) => AddressHeader::PointerPaymentScript,
        (AddressType::Enterprise, false) => AddressHeader::EnterprisePaymentKey,
        (AddressType::Enterprise, true) => AddressHeader::EnterprisePaymentScript,
        (AddressType::Reward, _) => AddressHeader::RewardKey,
    };

    Ok(ParsedAddressParams {
        header,
        network,
        spending,
        staking,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::types::{harden, Network};

    fn account_path(role: u32) -> Vec<u32> {
        vec![harden(1852), harden(1815), harden(0), role, 0]
    }

    fn params(
        address_type: AddressType,
        payment: Option<PaymentCredential>,
        staking: Option<StakingCredential>,
    ) -> AddressParams {
        AddressParams {
            address_type,
            network: Network::MAINNET,
            payment,
            staking,
        }
    }

    #[test]
    fn base_address() {
        let p = params(
            AddressType::Base,
            Some(PaymentCredential::Path(account_path(0))),
            Some(StakingCredential::Path(account_path(2))),
        );

        let v = parse_address_params(&p).unwrap();
        assert_eq!(v.header, AddressHeader::BasePaymentKey);
        assert_eq!(v.network, NetworkSelector::NetworkId(1));
        assert!(v.spending_path().is_some());

        let p = params(
            AddressType::Base,
            Some(PaymentCredential::ScriptHash("11".repeat(28))),
            Some(StakingCredential::KeyHash("22".repeat(28))),
        );
        let v = parse_address_params(&p).unwrap();
        assert_eq!(v.header, AddressHeader::BasePaymentScript);
        assert!(v.has_script_payment());

        let p = params(
            AddressType::Base,
            Some(PaymentCredential::Path(account_path(0))),
            None,
        );
        assert_eq!(
            parse_address_params(&p),
            Err(InvalidDataReason::AddressStakingInvalid("base"))
        );
    }

    #[test]
    fn byron_address() {
        let p = params(
            AddressType::Byron,
            Some(PaymentCredential::Path(vec![harden(44), harden(1815), harden(0), 0, 1])),
            None,
        );
        let v = parse_address_params(&p).unwrap();
        assert_eq!(v.network, NetworkSelector::ProtocolMagic(764824073));

        let p = params(
            AddressType::Byron,
            Some(PaymentCredential::ScriptHash("11".repeat(28))),
            None,
        );
        assert_eq!(
            parse_address_params(&p),
            Err(InvalidDataReason::AddressSpendingInvalid("byron"))
        );
    }

    #[test]
    fn pointer_enterprise_reward() {
        let ptr = BlockchainPointer {
            block_index: 1,
            tx_index: 2,
            certificate_index: 3,
        };

        let p = params(
            AddressType::Pointer,
            Some(PaymentCredential::Path(account_path(0))),
            Some(StakingCredential::Pointer(ptr)),
        );
        assert_eq!(
            parse_address_params(&p).unwrap().staking,
            StakingData::Pointer(ptr)
        );

        let p = params(
            AddressType::Enterprise,
            Some(PaymentCredential::Path(account_path(0))),
            Some(StakingCredential::Path(account_path(2))),
        );
        assert_eq!(
            parse_address_params(&p),
            Err(InvalidDataReason::AddressStakingInvalid("enterprise"))
        );

        let p = params(
            AddressType::Reward,
            None,
            Some(StakingCredential::Path(account_path(2))),
        );
        assert_eq!(
            parse_address_params(&p).unwrap().header,
            AddressHeader::RewardKey
        );

        let p = params(
            AddressType::Reward,
            Some(PaymentCredential::Path(account_path(0))),
            Some(StakingCredential::Path(account_path(2))),
        );
        assert!(parse_address_params(&p).is_err());
    }

    #[test]
    fn network_id_bounds() {
        let mut p = params(
            AddressType::Enterprise,
            Some(PaymentCredential::Path(account_path(0))),
            None,
        );
        p.network.network_id = 0x10;

        assert_eq!(
            parse_address_params(&p),
            Err(InvalidDataReason::NetworkIdInvalid(0x10))
        );
    }
}
