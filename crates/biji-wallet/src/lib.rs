//! # biji-wallet: key ring, coin selection, transaction building and signing.
//!
//! Turns owned secp256k1 keys, a history snapshot from a remote oracle and a
//! list of payments into one fully signed P2PKH transaction with correct
//! change handling.
//!
//! # Modules
//!
//! - [`error`]: `WalletError`, `OracleError`, `BroadcastError`
//! - [`keys`]: Seed, master-key derivation, KeyRing, key file persistence
//! - [`destination`]: Validated (address, amount) payments
//! - [`oracle`]: History rows and the oracle/gateway traits
//! - [`coin_selection`]: Greedy selection over unspent history rows
//! - [`builder`]: Unsigned transaction assembly with change output
//! - [`signer`]: Legacy SIGHASH_ALL signing of every input
//! - [`send`]: Send-operation state machine
//! - [`wallet`]: High-level wallet composition
//! - [`config`]: Wallet configuration

pub mod builder;
pub mod coin_selection;
pub mod config;
pub mod destination;
pub mod error;
pub mod keys;
pub mod oracle;
pub mod send;
pub mod signer;
pub mod wallet;

// Re-exports for convenient access
pub use builder::{TransactionBuilder, UnsignedTransaction};
pub use coin_selection::{CoinSelection, CoinSelector, SelectedOutput, SelectionPolicy};
pub use config::WalletConfig;
pub use destination::Destination;
pub use error::{BroadcastError, OracleError, WalletError};
pub use keys::{KeyRing, Seed};
pub use oracle::{BroadcastGateway, HistoryMap, HistoryOracle, HistoryRow};
pub use send::{SendOperation, SendState};
pub use signer::{SignedTransaction, TransactionSigner};
pub use wallet::{Wallet, WalletBalance};
