// Copyright (c) 2023 The ledger-ada Contributors

//! Device operations
//!
//! Each operation builds an [Interaction] from validated request data.
//! Operations fetch the app version first and check the features they
//! require before issuing any operation-specific request.

use crate::{
    compat::{self, DeviceCompatibility, Feature},
    interaction::Interaction,
};

mod version;
pub(crate) use version::*;

mod keys;
pub(crate) use keys::*;

mod address;
pub(crate) use address::*;

mod sign_tx;
pub(crate) use sign_tx::*;

mod opcert;
pub(crate) use opcert::*;

mod script;
pub(crate) use script::*;

mod vote;
pub(crate) use vote::*;

/// Fetch the app version, check the provided features are supported,
/// then continue with `op`
pub(crate) fn gated<T: Send + 'static>(
    features: Vec<Feature>,
    op: impl FnOnce(DeviceCompatibility) -> Interaction<T> + Send + 'static,
) -> Interaction<T> {
    get_version().and_then(move |v| match compat::ensure(&v, &features) {
        Ok(c) => op(c),
        Err(e) => Interaction::Failed(e),
    })
}
