//! Wallet composition: key ring, configuration, history and sending.
//!
//! The [`Wallet`] ties the key ring to its key file and configuration,
//! fetches history snapshots and starts send operations. It holds no UTXO
//! state between calls; every query goes to the oracle.

use std::collections::BTreeSet;

use biji_core::address::{Address, Network};
use biji_core::constants::UNCONFIRMED_HEIGHT;

use crate::coin_selection::SelectionPolicy;
use crate::config::WalletConfig;
use crate::error::WalletError;
use crate::keys::KeyRing;
use crate::oracle::{HistoryMap, HistoryOracle};
use crate::send::SendOperation;

/// Balance summary of a history snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalletBalance {
    /// Unspent value in confirmed outputs, in satoshis.
    pub confirmed: u64,
    /// Unspent value in unconfirmed outputs, in satoshis.
    pub unconfirmed: u64,
    /// Number of unspent outputs.
    pub utxo_count: usize,
}

impl WalletBalance {
    pub fn total(&self) -> u64 {
        self.confirmed.saturating_add(self.unconfirmed)
    }
}

/// A key ring bound to its key file and configuration.
pub struct Wallet {
    keys: KeyRing,
    config: WalletConfig,
    dirty: bool,
}

impl Wallet {
    /// Open the wallet described by `config`, loading its key file.
    pub fn open(config: WalletConfig) -> Result<Self, WalletError> {
        let keys = KeyRing::load(&config.key_file, config.network)?;
        Ok(Self::from_keys(keys, config))
    }

    /// Wrap an existing key ring. The ring's network wins over the config's.
    pub fn from_keys(keys: KeyRing, mut config: WalletConfig) -> Self {
        config.network = keys.network();
        Self {
            keys,
            config,
            dirty: false,
        }
    }

    pub fn keys(&self) -> &KeyRing {
        &self.keys
    }

    pub fn config(&self) -> &WalletConfig {
        &self.config
    }

    pub fn network(&self) -> Network {
        self.keys.network()
    }

    pub fn addresses(&self) -> Vec<Address> {
        self.keys.addresses()
    }

    /// Generate and add a new key.
    pub fn new_key(&mut self) -> Result<Address, WalletError> {
        let address = self.keys.generate_key()?;
        self.dirty = true;
        Ok(address)
    }

    /// Import a WIF key.
    pub fn import_wif(&mut self, wif: &str) -> Result<Address, WalletError> {
        let before = self.keys.len();
        let address = self.keys.import_wif(wif)?;
        self.dirty |= self.keys.len() != before;
        Ok(address)
    }

    /// Whether keys were added since the last load or save.
    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    /// Write the key ring to the configured key file.
    pub fn save(&mut self) -> Result<(), WalletError> {
        self.keys.save(&self.config.key_file)?;
        self.dirty = false;
        Ok(())
    }

    /// One history snapshot for every owned address.
    pub fn history(&self, oracle: &dyn HistoryOracle) -> Result<HistoryMap, WalletError> {
        let addresses = self.keys.addresses();
        if addresses.is_empty() {
            return Ok(HistoryMap::new());
        }
        Ok(oracle.query(&addresses)?)
    }

    /// Balance of the owned addresses in `history`.
    ///
    /// An outpoint reported more than once counts once, matching what coin
    /// selection can spend.
    pub fn balance(&self, history: &HistoryMap) -> WalletBalance {
        let mut balance = WalletBalance::default();
        let mut seen = BTreeSet::new();
        for row in history
            .iter()
            .filter(|(address, _)| self.keys.contains(address))
            .flat_map(|(_, rows)| rows)
            .filter(|r| !r.is_spent())
            .filter(|r| seen.insert(r.output))
        {
            if row.output_height == UNCONFIRMED_HEIGHT {
                balance.unconfirmed = balance.unconfirmed.saturating_add(row.value);
            } else {
                balance.confirmed = balance.confirmed.saturating_add(row.value);
            }
            balance.utxo_count += 1;
        }
        balance
    }

    /// Start a send using the configured selection policy.
    pub fn send(&self) -> SendOperation<'_> {
        self.send_with_policy(self.config.selection_policy)
    }

    pub fn send_with_policy(&self, policy: SelectionPolicy) -> SendOperation<'_> {
        SendOperation::new(&self.keys, policy)
    }
}

impl std::fmt::Debug for Wallet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Wallet")
            .field("network", &self.network())
            .field("keys", &self.keys.len())
            .field("key_file", &self.config.key_file)
            .field("dirty", &self.dirty)
            .finish()
    }
}
