// Copyright (c) 2023 The ledger-ada Contributors

//! Ledger Cardano API Library
//!
//! Host side protocol engine for the Cardano ledger app. Requests are
//! validated, encoded into APDUs, and driven through multi-round device
//! interactions over any [Exchange] transport, see [DeviceHandle].
//!
//! ```no_run
//! # async fn example<T>(t: T) -> Result<(), ledger_ada::Error>
//! # where T: ledger_ada::Exchange + Send + Sync, T::Error: std::error::Error + Send + Sync + 'static {
//! use ledger_ada::{types::harden, DeviceHandle};
//!
//! let d = DeviceHandle::from(t);
//!
//! let v = d.get_version().await?;
//! let k = d
//!     .get_extended_public_key(&vec![harden(1852), harden(1815), harden(0)])
//!     .await?;
//!
//! println!("app: {v}, account key: {}", k.public_key_hex);
//! # Ok(())
//! # }
//! ```

pub use ledger_transport::Exchange;

/// Re-export `ledger-ada-apdu` for consumers
pub use ledger_ada_apdu::{self as apdu};

mod error;
pub use error::{DeviceStatusError, Error, InvalidDataReason};

pub mod types;

pub(crate) mod validate;

pub(crate) mod serialize;

pub mod compat;
pub use compat::{DeviceCompatibility, Feature};

pub mod interaction;

pub mod stream;

pub mod driver;

mod config;
pub use config::{Config, DEFAULT_CHUNK_SIZE};

pub(crate) mod ops;

mod handle;
pub use handle::DeviceHandle;
