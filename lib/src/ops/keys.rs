// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::{
    pubkey::{ExtPubKeyP1, ExtendedPublicKeyResp},
    Instruction, Request,
};

use super::gated;
use crate::{
    compat::Feature, interaction::Interaction, serialize, types::ExtendedPublicKey,
    validate::ValidBip32Path,
};

impl From<ExtendedPublicKeyResp> for ExtendedPublicKey {
    fn from(k: ExtendedPublicKeyResp) -> Self {
        Self {
            public_key_hex: hex::encode(k.public_key),
            chain_code_hex: hex::encode(k.chain_code),
        }
    }
}

/// Fetch extended public keys for each path, in order
///
/// The first request carries the number of remaining keys, exporting more
/// than one key requires bulk export support.
pub(crate) fn get_extended_public_keys(
    paths: Vec<ValidBip32Path>,
) -> Interaction<Vec<ExtendedPublicKey>> {
    let features = match paths.len() > 1 {
        true => vec![Feature::BulkPublicKeyExport],
        false => vec![],
    };

    gated(features, move |_| {
        let remaining = paths.len().saturating_sub(1) as u32;
        let keys = Vec::with_capacity(paths.len());

        Interaction::for_each(
            paths.into_iter().enumerate(),
            keys,
            move |mut keys, (i, p)| {
                let (p1, data) = match i {
                    0 => (ExtPubKeyP1::Init, serialize::ext_pubkey_init(&p, remaining)),
                    _ => (ExtPubKeyP1::NextKey, serialize::path(&p)),
                };
                let req = Request::new(Instruction::GetExtendedPublicKeys, p1 as u8, 0, data);

                Interaction::<ExtendedPublicKeyResp>::send_fixed(req).map(move |k| {
                    keys.push(k.into());
                    keys
                })
            },
        )
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ops::test::{drive, with_version},
        types::harden,
        validate::{parse_path, PathSpec},
        Error,
    };

    fn path(account: u32) -> ValidBip32Path {
        parse_path(
            &[harden(1852), harden(1815), harden(account)],
            PathSpec::ExtPubKey,
            "test",
        )
        .unwrap()
    }

    fn respond(r: &Request) -> Vec<u8> {
        // Key bytes derived from the last path element
        let n = r.data[12];
        [vec![n; 32], vec![!n; 32]].concat()
    }

    #[test]
    fn single_key() {
        let (sent, keys) = drive(
            get_extended_public_keys(vec![path(0)]),
            with_version(2, 0, respond),
        );

        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].p1, ExtPubKeyP1::Init as u8);
        assert_eq!(sent[1].data.len(), 13);

        let keys = keys.unwrap();
        assert_eq!(keys[0].public_key_hex, "00".repeat(32));
        assert_eq!(keys[0].chain_code_hex, "ff".repeat(32));
    }

    #[test]
    fn bulk_keys() {
        let paths = vec![path(0), path(1), path(2)];

        let (sent, keys) = drive(
            get_extended_public_keys(paths),
            with_version(2, 1, respond),
        );

        assert_eq!(sent.len(), 4);
        assert_eq!(&sent[1].data[13..], &[0, 0, 0, 2]);
        assert_eq!(sent[2].p1, ExtPubKeyP1::NextKey as u8);
        assert_eq!(sent[3].p1, ExtPubKeyP1::NextKey as u8);

        let keys = keys.unwrap();
        assert_eq!(keys.len(), 3);
        assert_eq!(keys[2].public_key_hex, "02".repeat(32));
    }

    #[test]
    fn bulk_keys_unsupported() {
        let (sent, keys) = drive(
            get_extended_public_keys(vec![path(0), path(1)]),
            with_version(2, 0, respond),
        );

        assert_eq!(sent.len(), 1);
        assert!(matches!(
            keys,
            Err(Error::DeviceUnsupported {
                feature: Feature::BulkPublicKeyExport,
                ..
            })
        ));
    }
}
