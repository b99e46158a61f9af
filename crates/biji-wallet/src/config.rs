//! Wallet configuration.
//!
//! Provides [`WalletConfig`] with defaults for the network, history server,
//! query timeout, key file location and coin selection policy. The CLI
//! layers a TOML file, `BIJI_*` environment variables and flags on top.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

use biji_core::address::Network;

use crate::coin_selection::SelectionPolicy;

/// Default wait for one history query or broadcast.
pub const DEFAULT_TIMEOUT_SECS: u64 = 4;

/// Esplora-compatible API base for mainnet.
pub const MAINNET_SERVER_URL: &str = "https://blockstream.info/api";

/// Esplora-compatible API base for testnet.
pub const TESTNET_SERVER_URL: &str = "https://blockstream.info/testnet/api";

/// Configuration shared by the key ring, the history oracle and the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WalletConfig {
    /// Network for addresses and WIF keys.
    pub network: Network,
    /// History/broadcast server base URL. `None` picks the network default.
    pub server_url: Option<String>,
    /// Seconds to wait for a history query or broadcast.
    pub timeout_secs: u64,
    /// Path of the hex key file.
    pub key_file: PathBuf,
    /// Coin selection order.
    pub selection_policy: SelectionPolicy,
    /// Log level filter string (e.g. "info", "debug", "biji_wallet=trace").
    pub log_level: String,
}

impl Default for WalletConfig {
    fn default() -> Self {
        Self {
            network: Network::Testnet,
            server_url: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            key_file: default_key_file(),
            selection_policy: SelectionPolicy::default(),
            log_level: "info".to_string(),
        }
    }
}

impl WalletConfig {
    /// Server base URL without a trailing slash.
    pub fn server_url(&self) -> String {
        let url = match &self.server_url {
            Some(url) => url.as_str(),
            None => match self.network {
                Network::Mainnet => MAINNET_SERVER_URL,
                Network::Testnet => TESTNET_SERVER_URL,
            },
        };
        url.trim_end_matches('/').to_string()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// `~/.biji/keys.txt`, or `./.biji/keys.txt` without a home directory.
pub fn default_key_file() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".biji")
        .join("keys.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_network_is_testnet() {
        assert_eq!(WalletConfig::default().network, Network::Testnet);
    }

    #[test]
    fn default_timeout_is_four_seconds() {
        assert_eq!(WalletConfig::default().timeout(), Duration::from_secs(4));
    }

    #[test]
    fn default_key_file_in_biji_dir() {
        let cfg = WalletConfig::default();
        assert!(cfg.key_file.ends_with(".biji/keys.txt"));
    }

    #[test]
    fn server_url_follows_network() {
        let mut cfg = WalletConfig::default();
        assert_eq!(cfg.server_url(), TESTNET_SERVER_URL);
        cfg.network = Network::Mainnet;
        assert_eq!(cfg.server_url(), MAINNET_SERVER_URL);
    }

    #[test]
    fn server_url_override_trims_slash() {
        let cfg = WalletConfig {
            server_url: Some("http://127.0.0.1:3002/".into()),
            ..Default::default()
        };
        assert_eq!(cfg.server_url(), "http://127.0.0.1:3002");
    }

    #[test]
    fn deserialize_partial_uses_defaults() {
        let cfg: WalletConfig =
            serde_json::from_str(r#"{"network":"mainnet","selection_policy":"largest-first"}"#)
                .unwrap();
        assert_eq!(cfg.network, Network::Mainnet);
        assert_eq!(cfg.selection_policy, SelectionPolicy::LargestFirst);
        assert_eq!(cfg.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert_eq!(cfg.log_level, "info");
    }
}
