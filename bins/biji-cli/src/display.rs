//! Terminal rendering of history, balances and transactions.

use std::io::{self, Write};

use biji_core::address::{Address, Network};
use biji_core::amount::format_amount;
use biji_wallet::{HistoryMap, SignedTransaction, WalletBalance};

/// `== address ==` blocks with `+value txid:index` receipts and
/// `-value txid:index` spends.
pub fn write_history<W: Write>(out: &mut W, history: &HistoryMap) -> io::Result<()> {
    for (address, rows) in history {
        writeln!(out, "== {address} ==")?;
        for row in rows {
            writeln!(out, "+{}\t{}", format_amount(row.value), row.output)?;
            if let Some(spend) = row.spend.filter(|_| row.is_spent()) {
                writeln!(out, "-{}\t{}", format_amount(row.value), spend)?;
            }
        }
    }
    Ok(())
}

pub fn write_balance<W: Write>(out: &mut W, balance: &WalletBalance) -> io::Result<()> {
    writeln!(out, "Balance: {}", format_amount(balance.total()))?;
    if balance.unconfirmed > 0 {
        writeln!(
            out,
            "  confirmed {} / unconfirmed {}",
            format_amount(balance.confirmed),
            format_amount(balance.unconfirmed)
        )?;
    }
    writeln!(out, "Unspent outputs: {}", balance.utxo_count)
}

/// Everything the user should see before agreeing to broadcast.
pub fn write_transaction<W: Write>(
    out: &mut W,
    signed: &SignedTransaction,
    network: Network,
) -> io::Result<()> {
    let tx = signed.transaction();
    writeln!(out)?;
    writeln!(out, "tx hash: {}", signed.txid())?;
    for input in &tx.inputs {
        writeln!(out, "Prevout: {}", input.previous_output)?;
        writeln!(out, "Input script: {}", input.script_sig)?;
    }
    for output in &tx.outputs {
        writeln!(out, "Value: {}", format_amount(output.value))?;
        match output.script_pubkey.p2pkh_hash() {
            Some(hash) => writeln!(
                out,
                "Output script: {} ({})",
                output.script_pubkey,
                Address::from_pubkey_hash(hash, network)
            )?,
            None => writeln!(out, "Output script: {}", output.script_pubkey)?,
        }
    }
    writeln!(out, "Size: {} bytes", tx.size())?;
    writeln!(out)
}
