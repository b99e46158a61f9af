//! State machine for one send operation.
//!
//! ```text
//! COLLECTING_DESTINATIONS -> SELECTING_COINS -> BUILDING -> SIGNING
//!     -> AWAITING_CONFIRMATION -> BROADCASTING -> DONE
//! ```
//!
//! `FAILED(reason)` is entered when selection, building, signing or
//! broadcasting fails, or when the user cancels between building and
//! broadcasting. `DONE` and `FAILED` are terminal. Nothing is persisted
//! by a send; dropping the operation discards it.

use std::fmt;

use biji_core::address::Address;
use biji_core::types::Hash256;
use tracing::{info, warn};

use crate::builder::{TransactionBuilder, UnsignedTransaction};
use crate::coin_selection::{CoinSelection, CoinSelector, SelectionPolicy};
use crate::destination::Destination;
use crate::error::WalletError;
use crate::keys::KeyRing;
use crate::oracle::{BroadcastGateway, HistoryOracle};
use crate::signer::{SignedTransaction, TransactionSigner};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendState {
    CollectingDestinations,
    SelectingCoins,
    Building,
    Signing,
    AwaitingConfirmation,
    Broadcasting,
    Done,
    Failed(String),
}

impl SendState {
    fn name(&self) -> &'static str {
        match self {
            Self::CollectingDestinations => "COLLECTING_DESTINATIONS",
            Self::SelectingCoins => "SELECTING_COINS",
            Self::Building => "BUILDING",
            Self::Signing => "SIGNING",
            Self::AwaitingConfirmation => "AWAITING_CONFIRMATION",
            Self::Broadcasting => "BROADCASTING",
            Self::Done => "DONE",
            Self::Failed(_) => "FAILED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Failed(_))
    }

    fn can_move_to(&self, next: &SendState) -> bool {
        use SendState::*;
        match (self, next) {
            (CollectingDestinations, SelectingCoins) => true,
            (SelectingCoins, Building) => true,
            (Building, Signing) => true,
            (Signing, AwaitingConfirmation) => true,
            (AwaitingConfirmation, Broadcasting) => true,
            (Broadcasting, Done) => true,
            (SelectingCoins | Building | Signing | AwaitingConfirmation | Broadcasting, Failed(_)) => {
                true
            }
            _ => false,
        }
    }
}

impl fmt::Display for SendState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Failed(reason) => write!(f, "FAILED({reason})"),
            other => f.write_str(other.name()),
        }
    }
}

/// One send: destinations in, broadcast txid out.
pub struct SendOperation<'a> {
    keys: &'a KeyRing,
    policy: SelectionPolicy,
    state: SendState,
    builder: TransactionBuilder,
    change_address: Option<Address>,
    selection: Option<CoinSelection>,
    unsigned: Option<UnsignedTransaction>,
    signed: Option<SignedTransaction>,
}

impl<'a> SendOperation<'a> {
    pub fn new(keys: &'a KeyRing, policy: SelectionPolicy) -> Self {
        Self {
            keys,
            policy,
            state: SendState::CollectingDestinations,
            builder: TransactionBuilder::new(),
            change_address: None,
            selection: None,
            unsigned: None,
            signed: None,
        }
    }

    pub fn state(&self) -> &SendState {
        &self.state
    }

    pub fn destinations(&self) -> &[Destination] {
        self.builder.destinations()
    }

    pub fn selection(&self) -> Option<&CoinSelection> {
        self.selection.as_ref()
    }

    pub fn unsigned(&self) -> Option<&UnsignedTransaction> {
        self.unsigned.as_ref()
    }

    pub fn signed(&self) -> Option<&SignedTransaction> {
        self.signed.as_ref()
    }

    /// Add a destination. Only allowed while collecting destinations.
    pub fn add_destination(&mut self, destination: Destination) -> Result<(), WalletError> {
        self.require(SendState::CollectingDestinations, "ADD_DESTINATION")?;
        info!(state = %self.state, %destination, "destination added");
        self.builder.add_destination(destination);
        Ok(())
    }

    /// Override the change address. Defaults to the first owned address.
    pub fn set_change_address(&mut self, address: Address) -> Result<(), WalletError> {
        self.require(SendState::CollectingDestinations, "SET_CHANGE_ADDRESS")?;
        self.change_address = Some(address);
        Ok(())
    }

    /// Query the oracle and select coins covering all destinations.
    pub fn select_coins(&mut self, oracle: &dyn HistoryOracle) -> Result<&CoinSelection, WalletError> {
        if self.builder.destinations().is_empty() {
            return Err(WalletError::BuildError("no destinations".into()));
        }
        let target = self.builder.total()?;
        self.transition(SendState::SelectingCoins)?;

        match CoinSelector::select(self.keys, oracle, target, self.policy) {
            Ok(selection) => {
                info!(
                    state = %self.state,
                    inputs = selection.selected.len(),
                    total = selection.total,
                    change = selection.change,
                    "coins selected"
                );
                Ok(self.selection.insert(selection))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Build the unsigned transaction from the current selection.
    pub fn build(&mut self) -> Result<&UnsignedTransaction, WalletError> {
        self.transition(SendState::Building)?;
        let result = self.change_address().and_then(|change| {
            let selection = self
                .selection
                .as_ref()
                .ok_or_else(|| WalletError::BuildError("no coin selection".into()))?;
            self.builder.build(selection, &change)
        });
        match result {
            Ok(unsigned) => {
                info!(state = %self.state, outputs = unsigned.transaction().outputs.len(), "transaction built");
                Ok(self.unsigned.insert(unsigned))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Sign every input. On success the operation awaits confirmation.
    pub fn sign(&mut self) -> Result<&SignedTransaction, WalletError> {
        self.transition(SendState::Signing)?;
        let result = match (&self.unsigned, &self.selection) {
            (Some(unsigned), Some(selection)) => TransactionSigner::sign(unsigned, selection),
            _ => Err(WalletError::BuildError("nothing to sign".into())),
        };
        match result {
            Ok(signed) => {
                self.transition(SendState::AwaitingConfirmation)?;
                info!(state = %self.state, txid = %signed.txid(), "transaction signed");
                Ok(self.signed.insert(signed))
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Select, build and sign in one step.
    pub fn prepare(&mut self, oracle: &dyn HistoryOracle) -> Result<&SignedTransaction, WalletError> {
        self.select_coins(oracle)?;
        self.build()?;
        self.sign()
    }

    /// Abandon the operation. Allowed from BUILDING up to AWAITING_CONFIRMATION.
    pub fn cancel(&mut self) -> Result<(), WalletError> {
        match self.state {
            SendState::Building | SendState::Signing | SendState::AwaitingConfirmation => {
                self.signed = None;
                self.unsigned = None;
                self.fail(WalletError::Cancelled);
                Ok(())
            }
            _ => Err(self.invalid("CANCEL")),
        }
    }

    /// Submit the signed transaction through `gateway`.
    pub fn broadcast(&mut self, gateway: &dyn BroadcastGateway) -> Result<Hash256, WalletError> {
        self.transition(SendState::Broadcasting)?;
        let Some(signed) = self.signed.clone() else {
            return Err(self.fail(WalletError::BuildError("nothing to broadcast".into())));
        };
        match gateway.submit(&signed) {
            Ok(txid) => {
                self.transition(SendState::Done)?;
                info!(state = %self.state, %txid, "transaction broadcast");
                Ok(txid)
            }
            Err(e) => Err(self.fail(e.into())),
        }
    }

    fn change_address(&self) -> Result<Address, WalletError> {
        match self.change_address {
            Some(address) => Ok(address),
            None => self
                .keys
                .first_address()
                .ok_or_else(|| WalletError::BuildError("wallet has no keys for change".into())),
        }
    }

    fn require(&self, expected: SendState, action: &str) -> Result<(), WalletError> {
        if self.state == expected {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    fn invalid(&self, to: &str) -> WalletError {
        WalletError::InvalidState {
            from: self.state.to_string(),
            to: to.to_string(),
        }
    }

    fn transition(&mut self, next: SendState) -> Result<(), WalletError> {
        if !self.state.can_move_to(&next) {
            return Err(self.invalid(next.name()));
        }
        info!(from = %self.state, to = %next, "send state");
        self.state = next;
        Ok(())
    }

    /// Move to FAILED with the error's message and hand the error back.
    fn fail(&mut self, error: WalletError) -> WalletError {
        let next = SendState::Failed(error.to_string());
        if self.state.can_move_to(&next) {
            warn!(state = %self.state, %error, "send failed");
            self.state = next;
        }
        error
    }
}

impl fmt::Debug for SendOperation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SendOperation")
            .field("state", &self.state)
            .field("destinations", &self.builder.destinations().len())
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BroadcastError, OracleError};
    use crate::oracle::{HistoryMap, HistoryRow};
    use biji_core::address::Network;
    use biji_core::crypto::KeyPair;
    use biji_core::types::OutPoint;
    use std::cell::RefCell;
    use std::time::Duration;

    struct FixedOracle(Result<HistoryMap, OracleError>);

    impl HistoryOracle for FixedOracle {
        fn query(&self, _: &[Address]) -> Result<HistoryMap, OracleError> {
            self.0.clone()
        }
    }

    #[derive(Default)]
    struct RecordingGateway {
        submitted: RefCell<Vec<Hash256>>,
        reject: bool,
    }

    impl BroadcastGateway for RecordingGateway {
        fn submit(&self, tx: &SignedTransaction) -> Result<Hash256, BroadcastError> {
            if self.reject {
                return Err(BroadcastError::Rejected("mandatory-script-verify-flag-failed".into()));
            }
            self.submitted.borrow_mut().push(tx.txid());
            Ok(tx.txid())
        }
    }

    fn funded(value: u64) -> (KeyRing, FixedOracle) {
        let mut keys = KeyRing::new(Network::Testnet);
        let addr = keys.generate_key().unwrap();
        let mut history = HistoryMap::new();
        history.insert(addr, vec![HistoryRow::unspent(OutPoint::new(Hash256([5; 32]), 1), 1, value)]);
        (keys, FixedOracle(Ok(history)))
    }

    fn payment(amount: u64) -> Destination {
        Destination::new(KeyPair::generate().address(Network::Testnet), amount).unwrap()
    }

    #[test]
    fn happy_path_reaches_done() {
        let (keys, oracle) = funded(100_000);
        let gateway = RecordingGateway::default();
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        assert_eq!(op.state(), &SendState::CollectingDestinations);

        op.add_destination(payment(60_000)).unwrap();
        let txid = op.prepare(&oracle).unwrap().txid();
        assert_eq!(op.state(), &SendState::AwaitingConfirmation);

        assert_eq!(op.broadcast(&gateway).unwrap(), txid);
        assert_eq!(op.state(), &SendState::Done);
        assert_eq!(gateway.submitted.borrow().as_slice(), &[txid]);
    }

    #[test]
    fn change_goes_to_first_address_by_default() {
        let (keys, oracle) = funded(100_000);
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        op.add_destination(payment(60_000)).unwrap();
        let tx = op.prepare(&oracle).unwrap().transaction().clone();
        assert_eq!(tx.outputs[1].value, 40_000);
        assert_eq!(
            tx.outputs[1].script_pubkey,
            keys.first_address().unwrap().script_pubkey()
        );
    }

    #[test]
    fn change_address_override() {
        let (keys, oracle) = funded(100_000);
        let change = KeyPair::generate().address(Network::Testnet);
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        op.add_destination(payment(60_000)).unwrap();
        op.set_change_address(change).unwrap();
        let tx = op.prepare(&oracle).unwrap().transaction().clone();
        assert_eq!(tx.outputs[1].script_pubkey, change.script_pubkey());
    }

    #[test]
    fn insufficient_funds_fails_operation() {
        let (keys, oracle) = funded(50_000);
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        op.add_destination(payment(60_000)).unwrap();
        let err = op.prepare(&oracle).unwrap_err();
        assert_eq!(err, WalletError::InsufficientFunds { have: 50_000, need: 60_000 });
        assert!(matches!(op.state(), SendState::Failed(_)));
        assert!(op.signed().is_none());
    }

    #[test]
    fn oracle_timeout_fails_operation() {
        let keys = funded(1).0;
        let oracle = FixedOracle(Err(OracleError::Timeout(Duration::from_secs(4))));
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        op.add_destination(payment(1)).unwrap();
        assert!(matches!(
            op.select_coins(&oracle),
            Err(WalletError::Oracle(OracleError::Timeout(_)))
        ));
        assert!(op.state().is_terminal());
    }

    #[test]
    fn cancel_before_broadcast() {
        let (keys, oracle) = funded(100_000);
        let gateway = RecordingGateway::default();
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        op.add_destination(payment(60_000)).unwrap();
        op.prepare(&oracle).unwrap();
        op.cancel().unwrap();
        assert_eq!(op.state(), &SendState::Failed("cancelled".into()));
        assert!(op.signed().is_none());
        assert!(matches!(op.broadcast(&gateway), Err(WalletError::InvalidState { .. })));
        assert!(gateway.submitted.borrow().is_empty());
    }

    #[test]
    fn cancel_not_allowed_while_collecting() {
        let (keys, _) = funded(1);
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        assert!(matches!(op.cancel(), Err(WalletError::InvalidState { .. })));
    }

    #[test]
    fn broadcast_rejection_fails_operation() {
        let (keys, oracle) = funded(100_000);
        let gateway = RecordingGateway {
            reject: true,
            ..Default::default()
        };
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        op.add_destination(payment(60_000)).unwrap();
        op.prepare(&oracle).unwrap();
        assert!(matches!(
            op.broadcast(&gateway),
            Err(WalletError::Broadcast(BroadcastError::Rejected(_)))
        ));
        assert!(matches!(op.state(), SendState::Failed(_)));
    }

    #[test]
    fn illegal_transitions_rejected() {
        let (keys, oracle) = funded(100_000);
        let gateway = RecordingGateway::default();
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        op.add_destination(payment(1_000)).unwrap();

        assert!(matches!(op.build(), Err(WalletError::InvalidState { .. })));
        assert!(matches!(op.sign(), Err(WalletError::InvalidState { .. })));
        assert!(matches!(op.broadcast(&gateway), Err(WalletError::InvalidState { .. })));
        assert_eq!(op.state(), &SendState::CollectingDestinations);

        op.select_coins(&oracle).unwrap();
        assert!(matches!(
            op.add_destination(payment(5)),
            Err(WalletError::InvalidState { .. })
        ));
    }

    #[test]
    fn select_without_destinations() {
        let (keys, oracle) = funded(100_000);
        let mut op = SendOperation::new(&keys, SelectionPolicy::default());
        assert!(matches!(op.select_coins(&oracle), Err(WalletError::BuildError(_))));
        assert_eq!(op.state(), &SendState::CollectingDestinations);
    }

    #[test]
    fn state_display() {
        assert_eq!(SendState::AwaitingConfirmation.to_string(), "AWAITING_CONFIRMATION");
        assert_eq!(SendState::Failed("x".into()).to_string(), "FAILED(x)");
    }
}
