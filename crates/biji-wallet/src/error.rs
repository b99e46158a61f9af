//! Wallet error types.

use std::time::Duration;

use biji_core::error::{AddressError, AmountError, CryptoError, EncodeError};
use thiserror::Error;

/// Failures of a history oracle query.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    #[error("history query timed out after {0:?}")] Timeout(Duration),
    #[error("history server unreachable: {0}")] Unreachable(String),
    #[error("invalid history response: {0}")] InvalidResponse(String),
}

/// Failures of a broadcast submission.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BroadcastError {
    #[error("transaction rejected: {0}")] Rejected(String),
    #[error("broadcast server unreachable: {0}")] Unreachable(String),
}

/// Errors that can occur in wallet operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WalletError {
    /// Unspent outputs do not cover the requested amount.
    #[error("insufficient funds: have {have}, need {need}")]
    InsufficientFunds {
        /// Total unspent value in satoshis.
        have: u64,
        /// Required amount in satoshis.
        need: u64,
    },

    /// No owned key unlocks the given outpoint.
    #[error("no key for input {0}")]
    UnknownKey(String),

    /// Invalid monetary amount.
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Invalid address string or network.
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Transaction build error.
    #[error("build error: {0}")]
    BuildError(String),

    /// Send operation asked to move between states it cannot.
    #[error("invalid state transition: {from} -> {to}")]
    InvalidState { from: String, to: String },

    /// Send operation cancelled by the user.
    #[error("cancelled")]
    Cancelled,

    #[error(transparent)]
    Oracle(#[from] OracleError),

    #[error(transparent)]
    Broadcast(#[from] BroadcastError),

    /// Key file could not be read, parsed or written.
    #[error("key file: {0}")]
    KeyFile(String),

    /// Secret key material is unusable.
    #[error("invalid key: {0}")]
    InvalidKey(String),

    /// Cryptographic error from biji-core.
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// Transaction decoding error from biji-core.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl From<AddressError> for WalletError {
    fn from(e: AddressError) -> Self {
        Self::InvalidAddress(e.to_string())
    }
}

impl From<AmountError> for WalletError {
    fn from(e: AmountError) -> Self {
        Self::InvalidAmount(e.to_string())
    }
}
