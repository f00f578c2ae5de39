// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::{
    resp::ScriptHashResp,
    script::{ScriptHashDisplay, ScriptP1},
    Instruction, Request,
};

use super::gated;
use crate::{
    compat::Feature,
    interaction::Interaction,
    serialize,
    types::{NativeScriptHash, NativeScriptHashDisplay},
    validate::ParsedNativeScript,
    Error,
};

impl From<NativeScriptHashDisplay> for ScriptHashDisplay {
    fn from(d: NativeScriptHashDisplay) -> Self {
        match d {
            NativeScriptHashDisplay::Bech32 => ScriptHashDisplay::Bech32,
            NativeScriptHashDisplay::PolicyId => ScriptHashDisplay::PolicyId,
        }
    }
}

fn script_req(p1: ScriptP1, data: Vec<u8>) -> Request {
    Request::new(Instruction::DeriveNativeScriptHash, p1 as u8, 0, data)
}

/// Send a script, complex scripts are followed by each of their children
fn send_script(s: ParsedNativeScript) -> Interaction<()> {
    if let Some(data) = serialize::native_script_simple(&s) {
        return Interaction::send_empty(script_req(ScriptP1::AddSimple, data));
    }

    let header = serialize::native_script_complex(&s);
    let children = match s {
        ParsedNativeScript::All(c) | ParsedNativeScript::Any(c) => c,
        ParsedNativeScript::NOfK { scripts, .. } => scripts,
        _ => vec![],
    };

    match header {
        Some(data) => Interaction::send_empty(script_req(ScriptP1::StartComplex, data))
            .and_then(move |_| {
                Interaction::for_each(children.into_iter(), (), |_, c| send_script(c))
            }),
        None => Interaction::Failed(Error::InvalidResponse("unencodable native script")),
    }
}

/// Derive the hash of a native script, displayed in the requested format
pub(crate) fn derive_native_script_hash(
    s: ParsedNativeScript,
    display: NativeScriptHashDisplay,
) -> Interaction<NativeScriptHash> {
    gated(vec![Feature::NativeScriptHash], move |_| {
        send_script(s).and_then(move |_| {
            let req = script_req(
                ScriptP1::Finish,
                serialize::native_script_finish(display.into()),
            );

            Interaction::<ScriptHashResp>::send_fixed(req).map(|h| NativeScriptHash {
                script_hash_hex: hex::encode(h.0),
            })
        })
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        ops::test::{drive, with_version},
        types::{harden, NativeScript},
        validate::parse_native_script,
    };

    fn respond(r: &Request) -> Vec<u8> {
        match r.p1 {
            0x03 => vec![0x2c; 28],
            _ => vec![],
        }
    }

    #[test]
    fn nested_script() {
        let s = parse_native_script(&NativeScript::All {
            scripts: vec![
                NativeScript::PubkeyPath {
                    path: vec![harden(1854), harden(1815), harden(0), 0, 0],
                },
                NativeScript::Any {
                    scripts: vec![
                        NativeScript::InvalidBefore {
                            slot: "42".to_string(),
                        },
                        NativeScript::PubkeyHash {
                            key_hash: "c4b9265645fde9536c0795adbcc5291767a0c61fd62448341d7e0386"
                                .to_string(),
                        },
                    ],
                },
            ],
        })
        .unwrap();

        let (sent, r) = drive(
            derive_native_script_hash(s, NativeScriptHashDisplay::PolicyId),
            with_version(3, 0, respond),
        );

        let p1: Vec<_> = sent.iter().skip(1).map(|r| r.p1).collect();
        assert_eq!(p1, vec![0x01, 0x02, 0x01, 0x02, 0x02, 0x03]);
        assert_eq!(sent[6].data, vec![ScriptHashDisplay::PolicyId as u8]);

        assert_eq!(r.unwrap().script_hash_hex, "2c".repeat(28));
    }

    #[test]
    fn empty_complex_script() {
        let s = parse_native_script(&NativeScript::Any { scripts: vec![] }).unwrap();

        let (sent, r) = drive(
            derive_native_script_hash(s, NativeScriptHashDisplay::Bech32),
            with_version(3, 0, respond),
        );

        assert_eq!(sent.len(), 3);
        assert_eq!(sent[1].data, vec![0x02, 0, 0, 0, 0]);
        assert!(r.is_ok());
    }

    #[test]
    fn script_hash_gate() {
        let s = parse_native_script(&NativeScript::InvalidHereafter {
            slot: "1".to_string(),
        })
        .unwrap();

        let (sent, r) = drive(
            derive_native_script_hash(s, NativeScriptHashDisplay::Bech32),
            with_version(2, 4, respond),
        );

        assert_eq!(sent.len(), 1);
        assert!(r.unwrap_err().is_compatibility());
    }
}
