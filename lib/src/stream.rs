// Copyright (c) 2023 The ledger-ada Contributors

//! Chunked payload streaming
//!
//! Splits a payload with [ledger_ada_apdu::chunk::chunks] and sends each
//! chunk as a separate request, strictly in order, folding responses into
//! an accumulator.

use std::sync::Arc;

use ledger_ada_apdu::{chunk::chunks, Instruction, Request};

use crate::{interaction::Interaction, Error};

/// Stream `payload` in chunks of at most `max` bytes
///
/// `fold` is called with the accumulator, whether the chunk was the last
/// one, and the response payload for that chunk.
pub fn stream_chunks<A, F>(
    ins: Instruction,
    payload: &[u8],
    max: usize,
    init: A,
    fold: F,
) -> Interaction<A>
where
    A: Send + 'static,
    F: Fn(A, bool, Vec<u8>) -> Result<A, Error> + Send + Sync + 'static,
{
    let requests: Vec<_> = chunks(payload, max)
        .map(|c| {
            (
                c.is_last(),
                Request::new(ins, c.p1(), c.p2(), c.data.to_vec()),
            )
        })
        .collect();

    let fold = Arc::new(fold);

    Interaction::for_each(requests.into_iter(), init, move |acc, (last, req)| {
        let fold = fold.clone();
        Interaction::send(req, move |resp| (*fold)(acc, last, resp))
    })
}
