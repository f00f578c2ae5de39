// Copyright (c) 2023 The ledger-ada Contributors

//! Interaction driver
//!
//! The single place requests reach the transport. Drives an [Interaction]
//! to completion, translating device status words into [Error]s and
//! retrying the first exchange once when the device reports it is still
//! busy with an earlier, abandoned conversation.

use log::{trace, warn};

use ledger_ada_apdu::{
    status::{DeviceStatusCode, SW_OK},
    Request,
};
use ledger_transport::Exchange;

use crate::{config::Config, error::DeviceStatusError, interaction::Interaction, Error};

/// Run an interaction against the provided transport
pub async fn run<T, V>(t: &T, cfg: &Config, mut i: Interaction<V>) -> Result<V, Error>
where
    T: Exchange + Send + Sync,
    T::Error: std::error::Error + Send + Sync + 'static,
    V: Send + 'static,
{
    let mut first = true;

    loop {
        let request = match &i {
            Interaction::Done(_) | Interaction::Failed(_) => break,
            Interaction::Exchange { request, .. } => request.clone(),
        };

        let resp = match exchange(t, &request).await {
            Err(Error::DeviceStatus(e))
                if first
                    && cfg.retry_still_in_call
                    && e.kind() == Some(DeviceStatusCode::StillInCall) =>
            {
                warn!("Device still in call, retrying {:?}", request.ins);
                exchange(t, &request).await?
            }
            r => r?,
        };

        first = false;
        i = i.resume(resp);
    }

    match i {
        Interaction::Done(v) => Ok(v),
        Interaction::Failed(e) => Err(e),
        Interaction::Exchange { .. } => Err(Error::InvalidResponse("interaction incomplete")),
    }
}

/// Exchange a single request, returning the response payload on success
async fn exchange<T>(t: &T, req: &Request) -> Result<Vec<u8>, Error>
where
    T: Exchange + Send + Sync,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    req.check_len()?;

    trace!("TX: {:?}", req);

    let resp = t
        .exchange(&req.command())
        .await
        .map_err(|e| Error::Transport(anyhow::Error::new(e)))?;

    trace!(
        "RX: {} (0x{:04x})",
        hex::encode(resp.data()),
        resp.retcode()
    );

    match resp.retcode() {
        SW_OK => Ok(resp.data().to_vec()),
        code => Err(DeviceStatusError::new(code).into()),
    }
}
