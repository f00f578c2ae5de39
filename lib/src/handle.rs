// Copyright (c) 2023 The ledger-ada Contributors

//! Handle for connected ledger devices
//!
//! This provides methods for interacting with the Cardano app
//! and is generic over [ledger_transport::Exchange] transports.
//! Request data is validated before the device is locked, each operation
//! then holds the device for the whole interaction.

use std::{ops::Deref, sync::Arc};

use ledger_transport::{async_trait, APDUAnswer, APDUCommand, Exchange};
use log::debug;
use tokio::sync::Mutex;

use crate::{
    compat::DeviceCompatibility,
    config::Config,
    driver,
    interaction::Interaction,
    ops,
    types::*,
    validate::{
        parse_address_params, parse_ext_pubkey_paths, parse_native_script,
        parse_operational_certificate, parse_transaction, parse_vote_request,
    },
    Error,
};

/// Cardano handle for a connected ledger device.
///
/// This is generic over [Exchange] types to support different
/// underlying transports / providers
pub struct DeviceHandle<T: Exchange> {
    /// Device handle for communication
    t: Arc<Mutex<T>>,
    /// Interaction configuration
    config: Config,
}

/// Create a [DeviceHandle] wrapper from a type implementing [Exchange]
impl<T: Exchange> From<T> for DeviceHandle<T> {
    fn from(t: T) -> Self {
        Self {
            t: Arc::new(Mutex::new(t)),
            config: Config::default(),
        }
    }
}

/// Clones share the underlying device (and lock)
impl<T: Exchange> Clone for DeviceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            t: self.t.clone(),
            config: self.config.clone(),
        }
    }
}

impl<T> DeviceHandle<T>
where
    T: Exchange + Send + Sync,
    T::Error: std::error::Error + Send + Sync + 'static,
{
    /// Override the interaction configuration
    pub fn with_config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Fetch the active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lock the device and drive an interaction to completion
    async fn run<V: Send + 'static>(&self, i: Interaction<V>) -> Result<V, Error> {
        let t = self.t.lock().await;
        driver::run(&*t, &self.config, i).await
    }

    /// Fetch the Cardano app version
    pub async fn get_version(&self) -> Result<DeviceVersion, Error> {
        debug!("Requesting app version");

        self.run(ops::get_version()).await
    }

    /// Fetch the Cardano app version and the features it supports
    pub async fn get_compatibility(&self) -> Result<DeviceCompatibility, Error> {
        let v = self.get_version().await?;
        Ok(DeviceCompatibility::from(&v))
    }

    /// Fetch the device serial
    pub async fn get_serial(&self) -> Result<Serial, Error> {
        debug!("Requesting device serial");

        self.run(ops::get_serial()).await
    }

    /// Fetch the extended public key for a single path
    pub async fn get_extended_public_key(
        &self,
        path: &Bip32Path,
    ) -> Result<ExtendedPublicKey, Error> {
        let mut keys = self
            .get_extended_public_keys(std::slice::from_ref(path))
            .await?;

        keys.pop()
            .ok_or(Error::InvalidResponse("missing extended public key"))
    }

    /// Fetch extended public keys for each path, in request order
    pub async fn get_extended_public_keys(
        &self,
        paths: &[Bip32Path],
    ) -> Result<Vec<ExtendedPublicKey>, Error> {
        let paths = parse_ext_pubkey_paths(paths)?;

        debug!("Requesting {} extended public key(s)", paths.len());

        self.run(ops::get_extended_public_keys(paths)).await
    }

    /// Derive an address, returning it to the host
    pub async fn derive_address(&self, params: &AddressParams) -> Result<DerivedAddress, Error> {
        let params = parse_address_params(params)?;

        debug!("Deriving address (header: {})", params.header);

        self.run(ops::derive_address(params)).await
    }

    /// Display an address on the device for user verification
    pub async fn show_address(&self, params: &AddressParams) -> Result<(), Error> {
        let params = parse_address_params(params)?;

        debug!("Showing address (header: {})", params.header);

        self.run(ops::show_address(params)).await
    }

    /// Sign a transaction, returning the transaction hash and witnesses
    pub async fn sign_transaction(&self, tx: &Transaction) -> Result<SignedTransaction, Error> {
        let tx = parse_transaction(tx)?;

        debug!(
            "Signing transaction (mode: {}, inputs: {}, outputs: {}, certificates: {}, withdrawals: {})",
            tx.signing_mode,
            tx.inputs.len(),
            tx.outputs.len(),
            tx.certificates.len(),
            tx.withdrawals.len()
        );

        self.run(ops::sign_transaction(tx)).await
    }

    /// Sign a stake pool operational certificate
    pub async fn sign_operational_certificate(
        &self,
        c: &OperationalCertificate,
    ) -> Result<OperationalCertificateSignature, Error> {
        let c = parse_operational_certificate(c)?;

        debug!("Signing operational certificate");

        self.run(ops::sign_operational_certificate(c)).await
    }

    /// Derive the hash of a native script
    pub async fn derive_native_script_hash(
        &self,
        script: &NativeScript,
        display: NativeScriptHashDisplay,
    ) -> Result<NativeScriptHash, Error> {
        let script = parse_native_script(script)?;

        debug!("Deriving native script hash ({:?})", display);

        self.run(ops::derive_native_script_hash(script, display))
            .await
    }

    /// Sign a CIP-36 vote
    pub async fn sign_cip36_vote(&self, vote: &VoteRequest) -> Result<VoteSignature, Error> {
        let vote = parse_vote_request(vote)?;

        debug!(
            "Signing CIP-36 vote ({} bytes of cast data)",
            vote.cast_data.as_bytes().len()
        );

        self.run(ops::sign_cip36_vote(vote, self.config.chunk_size()))
            .await
    }
}

/// Raw APDU exchange, serialised with other operations on the same device
#[async_trait]
impl<T> Exchange for DeviceHandle<T>
where
    T: Exchange + Send + Sync,
{
    type Error = T::Error;
    type AnswerType = T::AnswerType;

    async fn exchange<I>(
        &self,
        command: &APDUCommand<I>,
    ) -> Result<APDUAnswer<Self::AnswerType>, Self::Error>
    where
        I: Deref<Target = [u8]> + Send + Sync,
    {
        self.t.lock().await.exchange(command).await
    }
}
