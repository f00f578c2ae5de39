// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::{address::DeriveAddressP1, Instruction, Request};

use super::gated;
use crate::{
    compat::Feature, interaction::Interaction, serialize, types::DerivedAddress,
    validate::ParsedAddressParams, Error,
};

fn address_features(p: &ParsedAddressParams) -> Vec<Feature> {
    match p.has_script_payment() {
        true => vec![Feature::ScriptPaymentAddresses],
        false => vec![],
    }
}

fn address_req(p1: DeriveAddressP1, p: &ParsedAddressParams) -> Request {
    let mut data = vec![];
    serialize::address_params(&mut data, p);

    Request::new(Instruction::DeriveAddress, p1 as u8, 0, data)
}

/// Derive an address, returning the raw address bytes
pub(crate) fn derive_address(p: ParsedAddressParams) -> Interaction<DerivedAddress> {
    gated(address_features(&p), move |_| {
        Interaction::send(address_req(DeriveAddressP1::Return, &p), |resp| {
            match resp.is_empty() {
                true => Err(Error::InvalidResponse("empty address")),
                false => Ok(DerivedAddress {
                    address_hex: hex::encode(resp),
                }),
            }
        })
    })
}

/// Display an address on the device for user verification
pub(crate) fn show_address(p: ParsedAddressParams) -> Interaction<()> {
    gated(address_features(&p), move |_| {
        Interaction::send_empty(address_req(DeriveAddressP1::Display, &p))
    })
}
