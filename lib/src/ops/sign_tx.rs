// Copyright (c) 2023 The ledger-ada Contributors

use log::debug;

use ledger_ada_apdu::{
    resp::{HashResp, SignatureResp},
    tx::{OutputP2, PoolCertP2, TxStage, P2_UNUSED},
    Instruction, Request,
};

use super::gated;
use crate::{
    compat::{DeviceCompatibility, Feature},
    interaction::Interaction,
    serialize,
    types::{SignedTransaction, Witness},
    validate::{ParsedCertificate, ParsedTransaction},
};

fn stage(s: TxStage, p2: u8, data: Vec<u8>) -> Request {
    Request::new(Instruction::SignTx, s as u8, p2, data)
}

/// Features required by the contents of a transaction
pub(crate) fn tx_features(tx: &ParsedTransaction) -> Vec<Feature> {
    let mut features = vec![];

    if tx.pool_registration().is_some() {
        features.push(Feature::PoolRegistration);
    }
    if tx.has_tokens() {
        features.push(Feature::MultiAssets);
    }
    if tx.validity_interval_start.is_some() {
        features.push(Feature::ValidityIntervalStart);
    }
    if matches!(&tx.ttl, Some(t) if t.value() == 0) {
        features.push(Feature::ZeroTtl);
    }

    features
}

/// Build the transaction body requests (everything before confirmation),
/// each of which expects an empty response
fn body_requests(
    tx: &ParsedTransaction,
    compat: &DeviceCompatibility,
    witnesses: usize,
) -> Vec<Request> {
    let mut r = vec![stage(
        TxStage::Init,
        P2_UNUSED,
        serialize::tx_init(tx, compat, witnesses),
    )];

    for i in &tx.inputs {
        r.push(stage(TxStage::Inputs, P2_UNUSED, serialize::tx_input(i)));
    }

    for o in &tx.outputs {
        let basic = serialize::tx_output_basic(o, compat);
        r.push(stage(TxStage::Outputs, OutputP2::BasicData as u8, basic));

        // Legacy apps take the basic output data only
        if !compat.supports_multi_assets {
            continue;
        }

        for g in &o.token_bundle {
            r.push(stage(
                TxStage::Outputs,
                OutputP2::AssetGroup as u8,
                serialize::tx_asset_group(g),
            ));
            for t in &g.tokens {
                r.push(stage(
                    TxStage::Outputs,
                    OutputP2::Token as u8,
                    serialize::tx_token(t),
                ));
            }
        }

        r.push(stage(TxStage::Outputs, OutputP2::Confirm as u8, vec![]));
    }

    r.push(stage(TxStage::Fee, P2_UNUSED, serialize::tx_u64(&tx.fee)));

    if let Some(ttl) = &tx.ttl {
        r.push(stage(TxStage::Ttl, P2_UNUSED, serialize::tx_u64(ttl)));
    }

    for c in &tx.certificates {
        r.push(stage(
            TxStage::Certificates,
            P2_UNUSED,
            serialize::tx_certificate(c),
        ));

        let p = match c {
            ParsedCertificate::StakePoolRegistration(p) => p,
            _ => continue,
        };

        let pool = |p2: PoolCertP2, data| stage(TxStage::Certificates, p2 as u8, data);

        r.push(pool(PoolCertP2::Init, serialize::pool_init(p)));
        r.push(pool(PoolCertP2::Params, serialize::pool_params(p)));
        for o in &p.owners {
            r.push(pool(PoolCertP2::Owner, serialize::pool_owner(o)));
        }
        for relay in &p.relays {
            r.push(pool(PoolCertP2::Relay, serialize::pool_relay(relay)));
        }
        r.push(pool(PoolCertP2::Metadata, serialize::pool_metadata(&p.metadata)));
        r.push(pool(PoolCertP2::Confirm, vec![]));
    }

    for w in &tx.withdrawals {
        r.push(stage(
            TxStage::Withdrawals,
            P2_UNUSED,
            serialize::tx_withdrawal(w),
        ));
    }

    if let Some(h) = &tx.metadata_hash {
        r.push(stage(TxStage::Metadata, P2_UNUSED, h.as_bytes().to_vec()));
    }

    if let Some(v) = &tx.validity_interval_start {
        r.push(stage(
            TxStage::ValidityIntervalStart,
            P2_UNUSED,
            serialize::tx_u64(v),
        ));
    }

    r
}

/// Stream a transaction to the device, confirm it, then fetch a witness
/// for each unique signing path
pub(crate) fn sign_transaction(tx: ParsedTransaction) -> Interaction<SignedTransaction> {
    gated(tx_features(&tx), move |compat| {
        let witness_paths = tx.witness_paths();
        let requests = body_requests(&tx, &compat, witness_paths.len());

        debug!(
            "Signing transaction ({} body requests, {} witnesses)",
            requests.len(),
            witness_paths.len()
        );

        Interaction::for_each(requests.into_iter(), (), |_, r| Interaction::send_empty(r))
            .and_then(|_| {
                Interaction::<HashResp>::send_fixed(stage(TxStage::Confirm, P2_UNUSED, vec![]))
            })
            .and_then(move |hash| {
                Interaction::for_each(witness_paths.into_iter(), vec![], |mut w, p| {
                    let req = stage(TxStage::Witnesses, P2_UNUSED, serialize::path(&p));

                    Interaction::<SignatureResp>::send_fixed(req).map(move |s| {
                        w.push(Witness {
                            path: p.to_vec(),
                            signature_hex: hex::encode(s.0),
                        });
                        w
                    })
                })
                .map(move |witnesses| SignedTransaction {
                    tx_hash_hex: hex::encode(hash.0),
                    witnesses,
                })
            })
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ops::test::{drive, with_version},
        types::{
            harden, AssetGroup, Certificate, Margin, Network, PoolMetadata, PoolOwner, PoolParams,
            Relay, Token, Transaction, TxInput, TxOutput, TxOutputDestination, Withdrawal,
        },
        validate::parse_transaction,
        Error,
    };

    fn account_path(role: u32, index: u32) -> Vec<u32> {
        vec![harden(1852), harden(1815), harden(0), role, index]
    }

    fn base_tx() -> Transaction {
        Transaction {
            network: Network::MAINNET,
            inputs: vec![TxInput {
                tx_hash: "3b40265111d8bb3c3c608d95b3a0bf83461ace32d79336579a1939b3aad1c0b7"
                    .to_string(),
                output_index: 0,
                path: Some(account_path(0, 0)),
            }],
            outputs: vec![TxOutput {
                destination: TxOutputDestination::ThirdParty {
                    address_hex: "01".repeat(57),
                },
                amount: "3003112".to_string(),
                token_bundle: None,
            }],
            fee: "42".to_string(),
            ttl: Some("10".to_string()),
            certificates: vec![],
            withdrawals: vec![],
            metadata_hash: None,
            validity_interval_start: None,
        }
    }

    /// Respond with a hash to confirm, signatures to witnesses and empty otherwise
    fn respond(r: &Request) -> Vec<u8> {
        match r.p1 {
            p1 if p1 == TxStage::Confirm as u8 => vec![0xaa; 32],
            p1 if p1 == TxStage::Witnesses as u8 => vec![0x55; 64],
            _ => vec![],
        }
    }

    fn stages(sent: &[Request]) -> Vec<(u8, u8)> {
        sent.iter().skip(1).map(|r| (r.p1, r.p2)).collect()
    }

    #[test]
    fn sign_ordinary() {
        let mut tx = base_tx();
        tx.withdrawals = vec![Withdrawal {
            path: account_path(2, 0),
            amount: "1000".to_string(),
        }];
        let tx = parse_transaction(&tx).unwrap();

        let (sent, r) = drive(sign_transaction(tx), with_version(2, 2, respond));

        assert_eq!(
            stages(&sent),
            vec![
                (0x01, 0x00),
                (0x02, 0x00),
                (0x03, 0x30),
                (0x03, 0x33),
                (0x04, 0x00),
                (0x05, 0x00),
                (0x07, 0x00),
                (0x0a, 0x00),
                (0x0f, 0x00),
                (0x0f, 0x00),
            ]
        );

        let r = r.unwrap();
        assert_eq!(r.tx_hash_hex, "aa".repeat(32));
        assert_eq!(r.witnesses.len(), 2);
        assert_eq!(r.witnesses[0].path, account_path(0, 0));
        assert_eq!(r.witnesses[1].path, account_path(2, 0));
    }

    #[test]
    fn sign_legacy_outputs() {
        let tx = parse_transaction(&base_tx()).unwrap();

        let (sent, r) = drive(sign_transaction(tx), with_version(2, 0, respond));

        assert!(r.is_ok());
        assert!(!stages(&sent).contains(&(0x03, 0x33)));
    }

    #[test]
    fn sign_multi_asset() {
        let mut tx = base_tx();
        tx.outputs[0].token_bundle = Some(vec![AssetGroup {
            policy_id: "95a292ffee938be03e9bae5657982a74e9014eb4960108c9e23a5b39".to_string(),
            tokens: vec![
                Token {
                    asset_name: "74652474436f696e".to_string(),
                    amount: "7878754".to_string(),
                },
                Token {
                    asset_name: "".to_string(),
                    amount: "1".to_string(),
                },
            ],
        }]);
        tx.metadata_hash = Some("de".repeat(32));
        tx.validity_interval_start = Some("47".to_string());
        let tx = parse_transaction(&tx).unwrap();

        let (_sent, r) = drive(sign_transaction(tx.clone()), with_version(2, 1, respond));
        assert!(matches!(
            r,
            Err(Error::DeviceUnsupported {
                feature: Feature::MultiAssets,
                ..
            })
        ));

        let (sent, r) = drive(sign_transaction(tx), with_version(2, 2, respond));
        assert!(r.is_ok());
        assert_eq!(
            &stages(&sent)[2..10],
            &[
                (0x03, 0x30),
                (0x03, 0x31),
                (0x03, 0x32),
                (0x03, 0x32),
                (0x03, 0x33),
                (0x04, 0x00),
                (0x05, 0x00),
                (0x08, 0x00),
            ]
        );
        assert_eq!(stages(&sent)[10], (0x09, 0x00));
    }

    #[test]
    fn sign_pool_registration() {
        let mut tx = base_tx();
        tx.inputs[0].path = None;
        tx.certificates = vec![Certificate::StakePoolRegistration {
            pool_params: PoolParams {
                pool_key_hash: "13381d918ec0283ceeff60f7f4fc21e1540e053ccf8a77307a7a32ad"
                    .to_string(),
                vrf_key_hash: "07821cd344d7fd7e3ae5f2ed863218cb979ff1d59e50c4276bdc479b0d084450"
                    .to_string(),
                pledge: "50000000000".to_string(),
                cost: "340000000".to_string(),
                margin: Margin {
                    numerator: "3".to_string(),
                    denominator: "100".to_string(),
                },
                reward_account: "e1".to_string() + &"79".repeat(28),
                owners: vec![PoolOwner::Path(account_path(2, 0))],
                relays: vec![
                    Relay::SingleHostAddr {
                        port: Some(3000),
                        ipv4: Some("54.228.75.154".to_string()),
                        ipv6: None,
                    },
                    Relay::MultiHostName {
                        dns_name: "aaaa.bbbb.com".to_string(),
                    },
                ],
                metadata: Some(PoolMetadata {
                    url: "https://www.vacuumlabs.com/sampleUrl.json".to_string(),
                    hash: "cdb714fd722c24aeb10c93dbb0ff03bd4783441cd5ba2a8b6f373390520535bb"
                        .to_string(),
                }),
            },
        }];
        let tx = parse_transaction(&tx).unwrap();

        let (_sent, r) = drive(sign_transaction(tx.clone()), with_version(2, 0, respond));
        assert!(r.unwrap_err().is_compatibility());

        let (sent, r) = drive(sign_transaction(tx), with_version(2, 1, respond));

        let s = stages(&sent);
        let certs: Vec<_> = s.iter().filter(|(p1, _)| *p1 == 0x06).map(|(_, p2)| *p2).collect();
        assert_eq!(certs, vec![0x00, 0x30, 0x31, 0x32, 0x33, 0x33, 0x34, 0x35]);

        // Init carries pool registration signing mode
        assert_eq!(sent[1].data[7], 0x04);

        let r = r.unwrap();
        assert_eq!(r.witnesses.len(), 1);
        assert_eq!(r.witnesses[0].path, account_path(2, 0));
    }

    #[test]
    fn zero_ttl_gate() {
        let mut tx = base_tx();
        tx.ttl = Some("0".to_string());
        let tx = parse_transaction(&tx).unwrap();

        assert_eq!(tx_features(&tx), vec![Feature::ZeroTtl]);

        let (sent, r) = drive(sign_transaction(tx), with_version(2, 2, respond));
        assert_eq!(sent.len(), 1);
        assert!(r.unwrap_err().is_compatibility());
    }

    #[test]
    fn witness_length_mismatch() {
        let tx = parse_transaction(&base_tx()).unwrap();

        let (_sent, r) = drive(
            sign_transaction(tx),
            with_version(2, 2, |r| match r.p1 {
                0x0f => vec![0x55; 63],
                _ => respond(r),
            }),
        );

        assert!(matches!(
            r,
            Err(Error::UnexpectedResponseLength {
                expected: 64,
                actual: 63
            })
        ));
    }
}
