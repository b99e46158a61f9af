//! Protocol constants. All monetary values in satoshis (1 BTC = 10^8 sat).

pub const COIN: u64 = 100_000_000;

/// Upper bound on any amount the wallet will parse or spend.
pub const MAX_MONEY: u64 = 21_000_000 * COIN;

/// Number of decimal places in a displayed amount.
pub const AMOUNT_DECIMALS: usize = 8;

/// Transaction version written by the builder.
pub const TX_VERSION: u32 = 1;

/// Lock time written by the builder (no time lock).
pub const TX_LOCK_TIME: u32 = 0;

/// Input sequence number that disables relative lock time and replacement.
pub const SEQUENCE_FINAL: u32 = 0xffff_ffff;

/// Legacy signature hash type committing to all inputs and outputs.
pub const SIGHASH_ALL: u8 = 0x01;

/// Spend-height sentinel for an output that has not been spent.
pub const NOT_SPENT: u64 = u64::MAX;

/// Height reported for an unconfirmed receipt or spend.
pub const UNCONFIRMED_HEIGHT: u64 = 0;

/// Base58Check version byte of a mainnet P2PKH address.
pub const MAINNET_P2PKH_VERSION: u8 = 0x00;
/// Base58Check version byte of a testnet P2PKH address.
pub const TESTNET_P2PKH_VERSION: u8 = 0x6f;
/// Base58Check version byte of a mainnet WIF secret key.
pub const MAINNET_WIF_VERSION: u8 = 0x80;
/// Base58Check version byte of a testnet WIF secret key.
pub const TESTNET_WIF_VERSION: u8 = 0xef;
/// Suffix marking a WIF key whose public key is compressed.
pub const WIF_COMPRESSED_FLAG: u8 = 0x01;

/// Length of a compressed SEC1 public key.
pub const COMPRESSED_PUBKEY_LEN: usize = 33;
