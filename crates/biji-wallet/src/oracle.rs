//! History rows and the two remote collaborators of a send: the history
//! oracle that reports outputs per address, and the broadcast gateway that
//! relays a finished transaction.
//!
//! Both are blocking calls from the wallet's point of view. Implementations
//! own their transport, concurrency and timeout.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use biji_core::address::Address;
use biji_core::constants::NOT_SPENT;
use biji_core::types::{Hash256, OutPoint};

use crate::error::{BroadcastError, OracleError};
use crate::signer::SignedTransaction;

/// One output received by an address, and its spend if any.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryRow {
    /// The output itself.
    pub output: OutPoint,
    /// Confirmation height of the output, `0` while unconfirmed.
    pub output_height: u64,
    /// Value in satoshis.
    pub value: u64,
    /// The input that spends this output, if known.
    pub spend: Option<OutPoint>,
    /// Height of the spend, `0` while unconfirmed, [`NOT_SPENT`] if unspent.
    pub spend_height: u64,
}

impl HistoryRow {
    /// An unspent output.
    pub fn unspent(output: OutPoint, output_height: u64, value: u64) -> Self {
        Self {
            output,
            output_height,
            value,
            spend: None,
            spend_height: NOT_SPENT,
        }
    }

    /// Mark this output as spent by `spend` at `spend_height`.
    pub fn spent_by(mut self, spend: OutPoint, spend_height: u64) -> Self {
        self.spend = Some(spend);
        self.spend_height = spend_height;
        self
    }

    /// Whether the spend marker says this output is spent.
    ///
    /// Only the height sentinel is consulted, so an unconfirmed spend
    /// (height `0`) counts as spent.
    pub fn is_spent(&self) -> bool {
        self.spend_height != NOT_SPENT
    }
}

/// History per address, as returned by one oracle query.
pub type HistoryMap = BTreeMap<Address, Vec<HistoryRow>>;

/// Sum of unspent values across a history map.
pub fn unspent_total(history: &HistoryMap) -> u64 {
    history
        .values()
        .flatten()
        .filter(|r| !r.is_spent())
        .fold(0u64, |acc, r| acc.saturating_add(r.value))
}

/// Source of address history.
pub trait HistoryOracle {
    /// Fetch the history of every address in `addresses`.
    ///
    /// Addresses with no history may be absent from the map or map to an
    /// empty list. The call either returns the whole snapshot or fails.
    fn query(&self, addresses: &[Address]) -> Result<HistoryMap, OracleError>;
}

/// Relay for fully signed transactions.
pub trait BroadcastGateway {
    /// Submit a signed transaction, returning the txid the network accepted.
    fn submit(&self, tx: &SignedTransaction) -> Result<Hash256, BroadcastError>;
}

impl<T: HistoryOracle + ?Sized> HistoryOracle for &T {
    fn query(&self, addresses: &[Address]) -> Result<HistoryMap, OracleError> {
        (**self).query(addresses)
    }
}

impl<T: BroadcastGateway + ?Sized> BroadcastGateway for &T {
    fn submit(&self, tx: &SignedTransaction) -> Result<Hash256, BroadcastError> {
        (**self).submit(tx)
    }
}
