// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::{resp::SignatureResp, Instruction, Request};

use super::gated;
use crate::{
    compat::Feature, interaction::Interaction, serialize, types::OperationalCertificateSignature,
    validate::ParsedOperationalCertificate,
};

/// Sign a stake pool operational certificate with the pool cold key
pub(crate) fn sign_operational_certificate(
    c: ParsedOperationalCertificate,
) -> Interaction<OperationalCertificateSignature> {
    gated(vec![Feature::OperationalCertificate], move |_| {
        let req = Request::new(
            Instruction::SignOperationalCertificate,
            0,
            0,
            serialize::operational_certificate(&c),
        );

        Interaction::<SignatureResp>::send_fixed(req).map(|s| OperationalCertificateSignature {
            signature_hex: hex::encode(s.0),
        })
    })
}
