//! Unsigned transaction assembly.
//!
//! Provides a builder pattern for constructing transactions:
//! 1. Add destinations (address + amount)
//! 2. Build an unsigned transaction from a coin selection and a change address
//! 3. Hand the result to [`TransactionSigner`](crate::signer::TransactionSigner)

use biji_core::address::Address;
use biji_core::constants::{TX_LOCK_TIME, TX_VERSION};
use biji_core::types::{Transaction, TxInput, TxOutput};
use tracing::debug;

use crate::coin_selection::CoinSelection;
use crate::destination::{Destination, total_amount};
use crate::error::WalletError;

/// A transaction whose inputs all have empty unlocking scripts.
///
/// Inputs follow the selection order; outputs are the destinations in order,
/// then the change output if any. Nothing downstream reorders them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsignedTransaction {
    tx: Transaction,
}

impl UnsignedTransaction {
    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn into_inner(self) -> Transaction {
        self.tx
    }
}

/// Builder for unsigned payment transactions.
///
/// # Example
/// ```ignore
/// let mut builder = TransactionBuilder::new();
/// builder.add_destination(Destination::new(address, 60_000)?);
/// let selection = CoinSelector::select(&keys, &oracle, builder.total()?, policy)?;
/// let unsigned = builder.build(&selection, &change_address)?;
/// ```
#[derive(Debug, Clone, Default)]
pub struct TransactionBuilder {
    destinations: Vec<Destination>,
}

impl TransactionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder over an existing destination list.
    pub fn with_destinations(destinations: Vec<Destination>) -> Self {
        Self { destinations }
    }

    /// Add a destination to the transaction.
    pub fn add_destination(&mut self, destination: Destination) -> &mut Self {
        self.destinations.push(destination);
        self
    }

    pub fn destinations(&self) -> &[Destination] {
        &self.destinations
    }

    /// Total paid to destinations.
    pub fn total(&self) -> Result<u64, WalletError> {
        total_amount(&self.destinations)
    }

    /// Build the unsigned transaction.
    ///
    /// Rejects an empty destination list and a selection whose totals do not
    /// add up to this builder's destinations. A change output paying
    /// `change_address` is appended only when the selection has leftover.
    pub fn build(
        &self,
        selection: &CoinSelection,
        change_address: &Address,
    ) -> Result<UnsignedTransaction, WalletError> {
        if self.destinations.is_empty() {
            return Err(WalletError::BuildError("no destinations".into()));
        }
        if selection.selected.is_empty() {
            return Err(WalletError::BuildError("selection has no inputs".into()));
        }

        let total_send = self.total()?;
        let selected_sum = selection
            .selected
            .iter()
            .try_fold(0u64, |acc, s| acc.checked_add(s.value))
            .ok_or_else(|| WalletError::BuildError("selected value overflow".into()))?;
        if selected_sum != selection.total
            || selection.total < total_send
            || selection.change != selection.total - total_send
        {
            return Err(WalletError::BuildError(format!(
                "selection does not match destinations: selected {selected_sum}, \
                 change {}, destinations {total_send}",
                selection.change
            )));
        }

        let inputs: Vec<TxInput> = selection
            .selected
            .iter()
            .map(|s| TxInput::unsigned(s.outpoint))
            .collect();

        let mut outputs = Vec::with_capacity(self.destinations.len() + 1);
        for d in &self.destinations {
            outputs.push(TxOutput {
                value: d.amount(),
                script_pubkey: d.script_pubkey(),
            });
        }
        if selection.change > 0 {
            outputs.push(TxOutput {
                value: selection.change,
                script_pubkey: change_address.script_pubkey(),
            });
        }

        debug!(
            inputs = inputs.len(),
            outputs = outputs.len(),
            change = selection.change,
            "built unsigned transaction"
        );

        Ok(UnsignedTransaction {
            tx: Transaction {
                version: TX_VERSION,
                inputs,
                outputs,
                lock_time: TX_LOCK_TIME,
            },
        })
    }
}
