//! # biji-core
//! Protocol types for the Biji wallet: hashes, transactions and their legacy
//! wire encoding, scripts, secp256k1 keys, Base58Check addresses and amounts.

pub mod address;
pub mod amount;
pub mod constants;
pub mod crypto;
pub mod encode;
pub mod error;
pub mod script;
pub mod types;
