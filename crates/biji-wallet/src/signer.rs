//! Signing of unsigned transactions.
//!
//! Every input is signed against the same unsigned base transaction with
//! legacy `SIGHASH_ALL`, then each signature is checked before the signed
//! transaction is handed out. A [`SignedTransaction`] therefore always has
//! every input unlocked.

use biji_core::crypto::{unlocking_script, verify_input};
use biji_core::types::{Hash256, Transaction};
use tracing::debug;

use crate::builder::UnsignedTransaction;
use crate::coin_selection::CoinSelection;
use crate::error::WalletError;

/// A transaction with an unlocking script on every input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    tx: Transaction,
    txid: Hash256,
}

impl SignedTransaction {
    fn new(tx: Transaction) -> Self {
        let txid = tx.txid();
        Self { tx, txid }
    }

    pub fn transaction(&self) -> &Transaction {
        &self.tx
    }

    pub fn txid(&self) -> Hash256 {
        self.txid
    }

    /// Legacy wire serialization.
    pub fn to_bytes(&self) -> Vec<u8> {
        self.tx.to_bytes()
    }

    pub fn to_hex(&self) -> String {
        self.tx.to_hex()
    }

    pub fn into_inner(self) -> Transaction {
        self.tx
    }

    /// Decode a serialized transaction that has inputs, all of them carrying
    /// a non-empty unlocking script. Signatures are not verified.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, WalletError> {
        let tx = Transaction::from_bytes(bytes)?;
        if tx.inputs.is_empty() {
            return Err(WalletError::BuildError("transaction has no inputs".into()));
        }
        if let Some(i) = tx.inputs.iter().position(|i| i.script_sig.is_empty()) {
            return Err(WalletError::BuildError(format!("input {i} is unsigned")));
        }
        Ok(Self::new(tx))
    }

    pub fn from_hex(s: &str) -> Result<Self, WalletError> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| WalletError::BuildError(format!("invalid hex: {e}")))?;
        Self::from_bytes(&bytes)
    }
}

/// Signs every input of an [`UnsignedTransaction`].
pub struct TransactionSigner;

impl TransactionSigner {
    /// Sign each input with the key paired with its outpoint in `selection`.
    ///
    /// Fails with [`WalletError::UnknownKey`] if an input's outpoint is not
    /// in the selection. No partially signed transaction is ever returned.
    pub fn sign(
        unsigned: &UnsignedTransaction,
        selection: &CoinSelection,
    ) -> Result<SignedTransaction, WalletError> {
        let base = unsigned.transaction();

        let mut prev_scripts = Vec::with_capacity(base.inputs.len());
        let mut script_sigs = Vec::with_capacity(base.inputs.len());
        for (i, input) in base.inputs.iter().enumerate() {
            let outpoint = &input.previous_output;
            let selected = selection
                .find(outpoint)
                .ok_or_else(|| WalletError::UnknownKey(outpoint.to_string()))?;
            let prev_script = selected.prev_script();
            script_sigs.push(unlocking_script(base, i, &prev_script, &selected.key)?);
            prev_scripts.push(prev_script);
        }

        let mut tx = base.clone();
        for (input, script_sig) in tx.inputs.iter_mut().zip(script_sigs) {
            input.script_sig = script_sig;
        }

        for (i, prev_script) in prev_scripts.iter().enumerate() {
            verify_input(&tx, i, prev_script)?;
        }

        let signed = SignedTransaction::new(tx);
        debug!(txid = %signed.txid(), inputs = prev_scripts.len(), "signed transaction");
        Ok(signed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::TransactionBuilder;
    use crate::coin_selection::{CoinSelector, SelectionPolicy};
    use crate::destination::Destination;
    use crate::keys::KeyRing;
    use crate::oracle::{HistoryMap, HistoryRow};
    use biji_core::address::Network;
    use biji_core::crypto::KeyPair;
    use biji_core::types::OutPoint;

    struct Fixture {
        keys: KeyRing,
        selection: CoinSelection,
        unsigned: UnsignedTransaction,
    }

    /// Two keys, one output each, spending both.
    fn fixture() -> Fixture {
        let mut keys = KeyRing::new(Network::Testnet);
        let a = keys.generate_key().unwrap();
        let b = keys.generate_key().unwrap();
        let mut history = HistoryMap::new();
        history.insert(a, vec![HistoryRow::unspent(OutPoint::new(Hash256([1; 32]), 0), 1, 40_000)]);
        history.insert(b, vec![HistoryRow::unspent(OutPoint::new(Hash256([2; 32]), 3), 1, 30_000)]);

        let mut builder = TransactionBuilder::new();
        builder.add_destination(
            Destination::new(KeyPair::generate().address(Network::Testnet), 60_000).unwrap(),
        );
        let selection =
            CoinSelector::select_from_history(&keys, &history, 60_000, SelectionPolicy::default())
                .unwrap();
        let unsigned = builder.build(&selection, &a).unwrap();
        Fixture {
            keys,
            selection,
            unsigned,
        }
    }

    #[test]
    fn sign_all_inputs_verify() {
        let f = fixture();
        let signed = TransactionSigner::sign(&f.unsigned, &f.selection).unwrap();
        let tx = signed.transaction();
        assert_eq!(tx.inputs.len(), 2);
        for (i, sel) in f.selection.selected.iter().enumerate() {
            verify_input(tx, i, &sel.address.script_pubkey()).unwrap();
        }
        assert_eq!(f.keys.len(), 2);
    }

    #[test]
    fn sign_is_deterministic() {
        let f = fixture();
        let a = TransactionSigner::sign(&f.unsigned, &f.selection).unwrap();
        let b = TransactionSigner::sign(&f.unsigned, &f.selection).unwrap();
        assert_eq!(a, b);
        assert_eq!(a.txid(), b.txid());
    }

    #[test]
    fn sign_keeps_structure() {
        let f = fixture();
        let signed = TransactionSigner::sign(&f.unsigned, &f.selection).unwrap();
        let base = f.unsigned.transaction();
        let tx = signed.transaction();
        assert_eq!(tx.outputs, base.outputs);
        for (s, u) in tx.inputs.iter().zip(&base.inputs) {
            assert_eq!(s.previous_output, u.previous_output);
            assert_eq!(s.sequence, u.sequence);
        }
    }

    #[test]
    fn sign_missing_key_fails() {
        let mut f = fixture();
        let missing = f.selection.selected.remove(1).outpoint;
        assert_eq!(
            TransactionSigner::sign(&f.unsigned, &f.selection).unwrap_err(),
            WalletError::UnknownKey(missing.to_string())
        );
    }

    #[test]
    fn signed_roundtrip_bytes() {
        let f = fixture();
        let signed = TransactionSigner::sign(&f.unsigned, &f.selection).unwrap();
        let bytes = signed.to_bytes();
        let back = SignedTransaction::from_bytes(&bytes).unwrap();
        assert_eq!(back, signed);
        assert_eq!(back.to_bytes(), bytes);
        assert_eq!(SignedTransaction::from_hex(&signed.to_hex()).unwrap(), signed);
    }

    #[test]
    fn from_bytes_rejects_unsigned() {
        let f = fixture();
        let bytes = f.unsigned.transaction().to_bytes();
        assert!(matches!(
            SignedTransaction::from_bytes(&bytes),
            Err(WalletError::BuildError(_))
        ));
    }

    #[test]
    fn txid_matches_transaction() {
        let f = fixture();
        let signed = TransactionSigner::sign(&f.unsigned, &f.selection).unwrap();
        assert_eq!(signed.txid(), signed.transaction().txid());
    }
}
