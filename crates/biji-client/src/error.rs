//! Client construction errors.
//!
//! Request failures are reported as the wallet's `OracleError` and
//! `BroadcastError`; this type only covers setting the client up.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("failed to start client runtime: {0}")] Runtime(#[from] std::io::Error),
    #[error("failed to build HTTP client: {0}")] Http(#[from] reqwest::Error),
}
