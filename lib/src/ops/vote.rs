// Copyright (c) 2023 The ledger-ada Contributors

use ledger_ada_apdu::{
    resp::{check_len, decode_exact, HashResp, SignatureResp},
    vote::VOTE_P1_WITNESS,
    Instruction, Request,
};

use super::gated;
use crate::{
    compat::Feature, interaction::Interaction, serialize, stream::stream_chunks,
    types::VoteSignature, validate::ParsedVoteRequest, Error,
};

/// Stream CIP-36 vote cast data to the device then fetch the witness signature
///
/// Only the final chunk returns data (the vote cast data hash).
pub(crate) fn sign_cip36_vote(
    v: ParsedVoteRequest,
    chunk_size: usize,
) -> Interaction<VoteSignature> {
    gated(vec![Feature::Cip36Vote], move |_| {
        let payload = serialize::vote_cast_data(&v);

        stream_chunks(
            Instruction::SignCip36Vote,
            &payload,
            chunk_size,
            None,
            |hash, last, resp| match last {
                false => {
                    check_len(&resp, 0)?;
                    Ok(hash)
                }
                true => Ok(Some(decode_exact::<HashResp>(&resp)?)),
            },
        )
        .and_then(move |hash| {
            let hash = match hash {
                Some(h) => h,
                None => return Interaction::Failed(Error::InvalidResponse("missing vote hash")),
            };

            let req = Request::new(
                Instruction::SignCip36Vote,
                VOTE_P1_WITNESS,
                0,
                serialize::path(&v.witness_path),
            );

            Interaction::<SignatureResp>::send_fixed(req).map(move |s| VoteSignature {
                data_hash_hex: hex::encode(hash.0),
                witness_path: v.witness_path.to_vec(),
                witness_signature_hex: hex::encode(s.0),
            })
        })
    })
}
