//! Blocking facade over the async Esplora calls.

use std::fmt;
use std::time::Duration;

use reqwest::Client;
use tokio::runtime::{Builder, Runtime};
use tracing::{debug, info};

use biji_core::address::Address;
use biji_core::types::Hash256;
use biji_wallet::{
    BroadcastError, BroadcastGateway, HistoryMap, HistoryOracle, OracleError, SignedTransaction,
    WalletConfig,
};

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::{broadcast, history};

/// Esplora-backed history oracle and broadcast gateway.
///
/// Owns a small runtime so the wallet can call it synchronously. Each query
/// or submission is bounded by the configured timeout and never retried.
pub struct EsploraClient {
    config: ClientConfig,
    http: Client,
    runtime: Runtime,
}

impl EsploraClient {
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(2)
            .thread_name("biji-client")
            .enable_all()
            .build()?;
        let http = Client::builder()
            .user_agent(concat!("biji/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            config,
            http,
            runtime,
        })
    }

    pub fn from_wallet_config(config: &WalletConfig) -> Result<Self, ClientError> {
        Self::new(ClientConfig::from(config))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn timeout(&self) -> Duration {
        self.config.timeout
    }

    /// Fetch history for `addresses`, failing with
    /// [`OracleError::Timeout`] once the configured wait has elapsed.
    pub async fn fetch_history(&self, addresses: &[Address]) -> Result<HistoryMap, OracleError> {
        let timeout = self.config.timeout;
        debug!(addresses = addresses.len(), server = %self.config.base_url, "querying history");
        tokio::time::timeout(
            timeout,
            history::fetch_history(&self.http, &self.config.base_url, addresses),
        )
        .await
        .map_err(|_| OracleError::Timeout(timeout))?
    }

    /// Submit a signed transaction.
    pub async fn submit_tx(&self, signed: &SignedTransaction) -> Result<Hash256, BroadcastError> {
        let txid = tokio::time::timeout(
            self.config.timeout,
            broadcast::submit_tx(&self.http, &self.config.base_url, signed),
        )
        .await
        .map_err(|_| BroadcastError::Unreachable("timed out".into()))??;
        info!(%txid, server = %self.config.base_url, "transaction submitted");
        Ok(txid)
    }
}

impl HistoryOracle for EsploraClient {
    fn query(&self, addresses: &[Address]) -> Result<HistoryMap, OracleError> {
        self.runtime.block_on(self.fetch_history(addresses))
    }
}

impl BroadcastGateway for EsploraClient {
    fn submit(&self, tx: &SignedTransaction) -> Result<Hash256, BroadcastError> {
        self.runtime.block_on(self.submit_tx(tx))
    }
}

impl fmt::Debug for EsploraClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EsploraClient")
            .field("base_url", &self.config.base_url)
            .field("timeout", &self.config.timeout)
            .finish_non_exhaustive()
    }
}
