// Copyright (c) 2023 The ledger-ada Contributors

//! Prelude to simplify downstream use of APDU objects
//!

pub use crate::{
    address::{AddressHeader, DeriveAddressP1, SpendingChoice, StakingChoice},
    chunk::{chunks, Chunk, ChunkFlags, FrameMode},
    pubkey::{ExtPubKeyP1, ExtendedPublicKeyResp},
    resp::{
        decode_exact, DecodeFixed, HashResp, ScriptHashResp, SerialResp, SignatureResp,
    },
    script::{NativeScriptType, PubkeyChoice, ScriptHashDisplay, ScriptP1},
    status::{DeviceStatusCode, SW_OK},
    tx::{
        CertificateType, OutputP2, OutputType, PoolCertP2, PoolOwnerType, RelayType,
        SigningMode, TxStage, P2_UNUSED,
    },
    version::{VersionFlags, VersionResp},
    vote::VOTE_P1_WITNESS,
    wire::WireWrite,
    ApduError, Instruction, Request,
};
