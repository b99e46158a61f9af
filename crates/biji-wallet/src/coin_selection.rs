//! Greedy coin selection over an oracle history snapshot.
//!
//! Candidates are the unspent rows of owned addresses. They are accumulated
//! one by one until the running total reaches the target; there is no
//! minimization pass, so the last selected output may overshoot.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use biji_core::address::Address;
use biji_core::crypto::KeyPair;
use biji_core::script::Script;
use biji_core::types::OutPoint;
use tracing::{debug, warn};

use crate::error::WalletError;
use crate::keys::KeyRing;
use crate::oracle::{HistoryMap, HistoryOracle};

/// Order in which candidate outputs are accumulated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Addresses in key-ring order, rows in the order the oracle returned them.
    #[default]
    OracleOrder,
    /// Largest value first. Ties keep oracle order.
    LargestFirst,
    /// Smallest value first. Ties keep oracle order.
    SmallestFirst,
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::OracleOrder => "oracle-order",
            Self::LargestFirst => "largest-first",
            Self::SmallestFirst => "smallest-first",
        })
    }
}

impl FromStr for SelectionPolicy {
    type Err = WalletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace('_', "-").as_str() {
            "oracle-order" | "oracle" => Ok(Self::OracleOrder),
            "largest-first" | "largest" => Ok(Self::LargestFirst),
            "smallest-first" | "smallest" => Ok(Self::SmallestFirst),
            other => Err(WalletError::BuildError(format!(
                "unknown selection policy: {other}"
            ))),
        }
    }
}

/// An unspent output chosen for spending, with the key that unlocks it.
#[derive(Debug, Clone)]
pub struct SelectedOutput {
    pub outpoint: OutPoint,
    /// Value in satoshis.
    pub value: u64,
    /// Address the output pays to.
    pub address: Address,
    /// Key from which `address` was derived.
    pub key: KeyPair,
}

impl SelectedOutput {
    /// The locking script of the spent output, rebuilt from the key.
    pub fn prev_script(&self) -> Script {
        self.key.script_pubkey()
    }
}

/// Result of coin selection.
///
/// `total >= target` and `change == total - target`.
#[derive(Debug, Clone)]
pub struct CoinSelection {
    /// Selected outputs, in accumulation order.
    pub selected: Vec<SelectedOutput>,
    /// Sum of selected values.
    pub total: u64,
    /// Amount the selection was made for.
    pub target: u64,
    /// Leftover returned as change.
    pub change: u64,
}

impl CoinSelection {
    /// The selected output spending `outpoint`, if any.
    pub fn find(&self, outpoint: &OutPoint) -> Option<&SelectedOutput> {
        self.selected.iter().find(|s| &s.outpoint == outpoint)
    }

    pub fn outpoints(&self) -> Vec<OutPoint> {
        self.selected.iter().map(|s| s.outpoint).collect()
    }
}

/// Greedy coin selector.
pub struct CoinSelector;

impl CoinSelector {
    /// Query `oracle` once for every owned address, then select from the
    /// returned snapshot.
    pub fn select(
        keys: &KeyRing,
        oracle: &dyn HistoryOracle,
        target: u64,
        policy: SelectionPolicy,
    ) -> Result<CoinSelection, WalletError> {
        if target == 0 {
            return Err(WalletError::InvalidAmount("target must be non-zero".into()));
        }
        let addresses = keys.addresses();
        debug!(addresses = addresses.len(), "querying history");
        let history = oracle.query(&addresses)?;
        Self::select_from_history(keys, &history, target, policy)
    }

    /// Select from an existing history snapshot.
    ///
    /// Rows whose spend marker says spent are never candidates. Rows for
    /// addresses not in `keys` are ignored. The same outpoint reported twice
    /// is considered once.
    pub fn select_from_history(
        keys: &KeyRing,
        history: &HistoryMap,
        target: u64,
        policy: SelectionPolicy,
    ) -> Result<CoinSelection, WalletError> {
        if target == 0 {
            return Err(WalletError::InvalidAmount("target must be non-zero".into()));
        }

        for (address, rows) in history {
            if !keys.contains(address) && !rows.is_empty() {
                warn!(%address, rows = rows.len(), "ignoring history for unowned address");
            }
        }

        let mut seen = BTreeSet::new();
        let mut candidates = Vec::new();
        for key in keys.keys() {
            let address = key.address(keys.network());
            let Some(rows) = history.get(&address) else {
                continue;
            };
            for row in rows.iter().filter(|r| !r.is_spent()) {
                if !seen.insert(row.output) {
                    continue;
                }
                candidates.push(SelectedOutput {
                    outpoint: row.output,
                    value: row.value,
                    address,
                    key: key.clone(),
                });
            }
        }

        match policy {
            SelectionPolicy::OracleOrder => {}
            SelectionPolicy::LargestFirst => candidates.sort_by(|a, b| b.value.cmp(&a.value)),
            SelectionPolicy::SmallestFirst => candidates.sort_by_key(|c| c.value),
        }

        let mut selected = Vec::new();
        let mut total: u64 = 0;
        for candidate in candidates {
            total = total
                .checked_add(candidate.value)
                .ok_or_else(|| WalletError::BuildError("selected value overflow".into()))?;
            debug!(outpoint = %candidate.outpoint, value = candidate.value, total, "selected output");
            selected.push(candidate);

            if total >= target {
                return Ok(CoinSelection {
                    selected,
                    total,
                    target,
                    change: total - target,
                });
            }
        }

        Err(WalletError::InsufficientFunds {
            have: total,
            need: target,
        })
    }
}
