//! Client configuration.

use std::time::Duration;

use biji_wallet::WalletConfig;

/// Where the server lives and how long to wait for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// API base URL without a trailing slash.
    pub base_url: String,
    /// Bound on one whole history query or one broadcast.
    pub timeout: Duration,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { base_url, timeout }
    }
}

impl From<&WalletConfig> for ClientConfig {
    fn from(config: &WalletConfig) -> Self {
        Self::new(config.server_url(), config.timeout())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use biji_core::address::Network;

    #[test]
    fn new_trims_trailing_slashes() {
        let cfg = ClientConfig::new("http://localhost:3000//", Duration::from_secs(1));
        assert_eq!(cfg.base_url, "http://localhost:3000");
    }

    #[test]
    fn from_wallet_config() {
        let wallet = WalletConfig {
            network: Network::Mainnet,
            timeout_secs: 9,
            ..Default::default()
        };
        let cfg = ClientConfig::from(&wallet);
        assert_eq!(cfg.base_url, "https://blockstream.info/api");
        assert_eq!(cfg.timeout, Duration::from_secs(9));
    }
}
