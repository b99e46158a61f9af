//! Shared test helpers: scripted oracles, recording gateways, row builders.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use biji_core::address::{Address, Network};
use biji_core::crypto::KeyPair;
use biji_core::types::{Hash256, OutPoint};
use biji_wallet::{
    BroadcastError, BroadcastGateway, HistoryMap, HistoryOracle, HistoryRow, KeyRing,
    OracleError, SignedTransaction,
};

/// Outpoint `index` of a transaction whose txid is `seed` repeated.
pub fn outpoint(seed: u8, index: u32) -> OutPoint {
    OutPoint::new(Hash256([seed; 32]), index)
}

/// A confirmed, unspent row.
pub fn unspent(seed: u8, value: u64) -> HistoryRow {
    HistoryRow::unspent(outpoint(seed, 0), 100, value)
}

/// A confirmed row spent by some other transaction.
pub fn spent(seed: u8, value: u64) -> HistoryRow {
    unspent(seed, value).spent_by(outpoint(seed.wrapping_add(128), 0), 101)
}

/// A fresh address nobody in the test owns.
pub fn recipient() -> Address {
    KeyPair::generate().address(Network::Testnet)
}

/// One testnet key owning one unspent row per value.
pub fn funded_ring(values: &[u64]) -> (KeyRing, HistoryMap) {
    let mut keys = KeyRing::new(Network::Testnet);
    let address = keys.generate_key().expect("key generation");
    let rows = values
        .iter()
        .enumerate()
        .map(|(i, &v)| unspent(i as u8 + 1, v))
        .collect();
    let mut history = HistoryMap::new();
    history.insert(address, rows);
    (keys, history)
}

/// Oracle that replays a fixed snapshot and counts queries.
#[derive(Default)]
pub struct MockOracle {
    pub history: HistoryMap,
    pub calls: Cell<usize>,
}

impl MockOracle {
    pub fn new(history: HistoryMap) -> Self {
        Self {
            history,
            calls: Cell::new(0),
        }
    }
}

impl HistoryOracle for MockOracle {
    fn query(&self, _addresses: &[Address]) -> Result<HistoryMap, OracleError> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.history.clone())
    }
}

/// Oracle that never answers in time.
pub struct TimeoutOracle(pub Duration);

impl HistoryOracle for TimeoutOracle {
    fn query(&self, _addresses: &[Address]) -> Result<HistoryMap, OracleError> {
        Err(OracleError::Timeout(self.0))
    }
}

/// Gateway that accepts everything and keeps what it saw.
#[derive(Default)]
pub struct RecordingGateway {
    pub submitted: RefCell<Vec<SignedTransaction>>,
}

impl BroadcastGateway for RecordingGateway {
    fn submit(&self, tx: &SignedTransaction) -> Result<Hash256, BroadcastError> {
        self.submitted.borrow_mut().push(tx.clone());
        Ok(tx.txid())
    }
}

/// Gateway that rejects everything with a fixed reason.
pub struct RejectingGateway(pub String);

impl BroadcastGateway for RejectingGateway {
    fn submit(&self, _tx: &SignedTransaction) -> Result<Hash256, BroadcastError> {
        Err(BroadcastError::Rejected(self.0.clone()))
    }
}
