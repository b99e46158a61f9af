//! # biji-client: HTTP history oracle and broadcast gateway.
//!
//! Talks to an Esplora-compatible REST server and exposes it to the wallet
//! as a blocking [`HistoryOracle`](biji_wallet::HistoryOracle) and
//! [`BroadcastGateway`](biji_wallet::BroadcastGateway) with a bounded wait.
//!
//! # Modules
//!
//! - [`api`]: Esplora response types
//! - [`config`]: Server URL and timeout
//! - [`error`]: `ClientError`
//! - [`history`]: Parallel per-address history fetch
//! - [`broadcast`]: Raw transaction submission
//! - [`client`]: `EsploraClient`, the blocking facade

pub mod api;
pub mod broadcast;
pub mod client;
pub mod config;
pub mod error;
pub mod history;

pub use client::EsploraClient;
pub use config::ClientConfig;
pub use error::ClientError;
