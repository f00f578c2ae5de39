// Copyright (c) 2023 The ledger-ada Contributors

//! Fixed-layout response decoding
//!
//! Response payloads (with the trailing status word already removed) must match
//! the expected length exactly, any mismatch indicates the host and app disagree
//! on the protocol version.

use crate::ApduError;

/// Decode trait for fixed-length response payloads
pub trait DecodeFixed: Sized {
    /// Encoded length in bytes
    const LEN: usize;

    /// Decode from a buffer of exactly [DecodeFixed::LEN] bytes,
    /// other lengths return [ApduError::InvalidLength]
    fn decode_fixed(buff: &[u8]) -> Result<Self, ApduError>;
}

/// Decode a fixed-length response
pub fn decode_exact<R: DecodeFixed>(buff: &[u8]) -> Result<R, ApduError> {
    R::decode_fixed(buff)
}

/// Check a response payload has the expected length
pub fn check_len(buff: &[u8], expected: usize) -> Result<(), ApduError> {
    match buff.len() == expected {
        true => Ok(()),
        false => Err(ApduError::InvalidLength {
            expected,
            actual: buff.len(),
        }),
    }
}

/// Opaque fixed-length response (hashes, signatures, serials)
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct FixedResp<const N: usize>(pub [u8; N]);

impl<const N: usize> DecodeFixed for FixedResp<N> {
    const LEN: usize = N;

    fn decode_fixed(buff: &[u8]) -> Result<Self, ApduError> {
        check_len(buff, N)?;

        let mut b = [0u8; N];
        b.copy_from_slice(buff);
        Ok(Self(b))
    }
}

impl<const N: usize> AsRef<[u8]> for FixedResp<N> {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

/// Device serial response (7 bytes)
pub type SerialResp = FixedResp<7>;

/// Blake2b-256 hash response (transaction body / vote cast data)
pub type HashResp = FixedResp<32>;

/// Ed25519 signature response
pub type SignatureResp = FixedResp<64>;

/// Blake2b-224 native script hash response
pub type ScriptHashResp = FixedResp<28>;
