// Copyright (c) 2023 The ledger-ada Contributors

//! Device interactions
//!
//! An [Interaction] describes a multi-round APDU conversation without
//! performing any I/O. Each step is either complete, failed, or waiting on
//! the response to a pending [Request]. Interactions compose with
//! [Interaction::and_then] so operations are built from smaller fragments
//! (fetch version, check compatibility, run the operation) and executed
//! by a single driver (see [crate::driver::run]).

use ledger_ada_apdu::{
    resp::{check_len, decode_exact, DecodeFixed},
    Request,
};

use crate::Error;

/// Continuation called with the response payload for a pending request
pub type Resume<T> = Box<dyn FnOnce(Vec<u8>) -> Result<Interaction<T>, Error> + Send>;

/// Resumable device conversation producing a value of type `T`
pub enum Interaction<T> {
    /// Interaction complete
    Done(T),
    /// Interaction failed
    Failed(Error),
    /// Waiting on the response to `request`
    Exchange { request: Request, then: Resume<T> },
}

impl<T: Send + 'static> Interaction<T> {
    /// Completed interaction
    pub fn done(v: T) -> Self {
        Interaction::Done(v)
    }

    /// Issue a request and decode the response payload
    pub fn send(
        request: Request,
        decode: impl FnOnce(Vec<u8>) -> Result<T, Error> + Send + 'static,
    ) -> Self {
        Interaction::Exchange {
            request,
            then: Box::new(move |resp| decode(resp).map(Interaction::Done)),
        }
    }

    /// Chain a follow-on interaction using the result of this one
    pub fn and_then<U: Send + 'static>(
        self,
        f: impl FnOnce(T) -> Interaction<U> + Send + 'static,
    ) -> Interaction<U> {
        match self {
            Interaction::Done(v) => f(v),
            Interaction::Failed(e) => Interaction::Failed(e),
            Interaction::Exchange { request, then } => Interaction::Exchange {
                request,
                then: Box::new(move |resp| Ok(then(resp)?.and_then(f))),
            },
        }
    }

    /// Map the result of this interaction
    pub fn map<U: Send + 'static>(self, f: impl FnOnce(T) -> U + Send + 'static) -> Interaction<U> {
        self.and_then(|v| Interaction::Done(f(v)))
    }

    /// Run `step` for each item in order, threading an accumulator through
    ///
    /// Each step is chained only once the previous completes, so continuation
    /// depth does not grow with the number of items.
    pub fn for_each<I, F>(items: I, init: T, step: F) -> Self
    where
        I: Iterator + Send + 'static,
        I::Item: Send + 'static,
        F: Fn(T, I::Item) -> Interaction<T> + Send + 'static,
    {
        Self::for_each_next(items, init, step)
    }

    fn for_each_next<I, F>(mut items: I, mut acc: T, step: F) -> Self
    where
        I: Iterator + Send + 'static,
        I::Item: Send + 'static,
        F: Fn(T, I::Item) -> Interaction<T> + Send + 'static,
    {
        loop {
            let item = match items.next() {
                Some(v) => v,
                None => return Interaction::Done(acc),
            };

            match step(acc, item) {
                Interaction::Done(v) => acc = v,
                Interaction::Failed(e) => return Interaction::Failed(e),
                pending => {
                    return pending.and_then(move |acc| Self::for_each_next(items, acc, step))
                }
            }
        }
    }

    /// Fetch the pending request, if any
    pub fn pending(&self) -> Option<&Request> {
        match self {
            Interaction::Exchange { request, .. } => Some(request),
            _ => None,
        }
    }

    /// Resume with the response payload for the pending request
    pub fn resume(self, resp: Vec<u8>) -> Self {
        match self {
            Interaction::Exchange { then, .. } => match then(resp) {
                Ok(i) => i,
                Err(e) => Interaction::Failed(e),
            },
            _ => Interaction::Failed(Error::InvalidResponse("interaction not pending")),
        }
    }

    /// Check whether the interaction has completed (successfully or otherwise)
    pub fn is_complete(&self) -> bool {
        !matches!(self, Interaction::Exchange { .. })
    }
}

impl<T: DecodeFixed + Send + 'static> Interaction<T> {
    /// Issue a request expecting a fixed-length response
    pub fn send_fixed(request: Request) -> Self {
        Interaction::send(request, |resp| Ok(decode_exact::<T>(&resp)?))
    }
}

impl Interaction<()> {
    /// Issue a request expecting an empty response
    pub fn send_empty(request: Request) -> Self {
        Interaction::send(request, |resp| Ok(check_len(&resp, 0)?))
    }
}

impl<T> std::fmt::Debug for Interaction<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Interaction::Done(_) => write!(f, "Done"),
            Interaction::Failed(e) => write!(f, "Failed({e})"),
            Interaction::Exchange { request, .. } => write!(f, "Exchange({request:?})"),
        }
    }
}
