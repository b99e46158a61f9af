//! Error types for the Biji protocol layer.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    #[error("invalid secret key")] InvalidSecretKey,
    #[error("invalid public key bytes")] InvalidPublicKey,
    #[error("invalid signature bytes")] InvalidSignature,
    #[error("signature verification failed")] VerificationFailed,
    #[error("pubkey hash does not match expected")] PubkeyHashMismatch,
    #[error("input index out of bounds: {index} >= {len}")] InputIndexOutOfBounds { index: usize, len: usize },
    #[error("unsupported sighash type: {0:#04x}")] UnsupportedSighashType(u8),
    #[error("prior locking script is not P2PKH")] NotP2pkh,
    #[error("malformed unlocking script")] MalformedUnlockingScript,
    #[error("invalid WIF: {0}")] InvalidWif(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("invalid base58: {0}")] InvalidBase58(String),
    #[error("invalid checksum")] InvalidChecksum,
    #[error("invalid length: {0}")] InvalidLength(usize),
    #[error("unknown version byte: {0:#04x}")] UnknownVersion(u8),
    #[error("unknown network: {0}")] UnknownNetwork(String),
    #[error("address is for {found}, expected {expected}")] NetworkMismatch { expected: String, found: String },
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    #[error("truncated input: needed {needed} bytes at offset {offset}")] Truncated { offset: usize, needed: usize },
    #[error("trailing bytes: {0}")] TrailingBytes(usize),
    #[error("non-canonical varint at offset {0}")] NonCanonicalVarint(usize),
    #[error("length too large: {0}")] LengthTooLarge(u64),
    #[error("invalid hex: {0}")] InvalidHex(String),
    #[error("invalid hash length: {0}")] InvalidHashLength(usize),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AmountError {
    #[error("empty amount")] Empty,
    #[error("invalid character in amount: {0}")] InvalidCharacter(char),
    #[error("too many decimal places: {0}")] TooManyDecimals(usize),
    #[error("amount overflow")] Overflow,
    #[error("amount exceeds maximum: {0}")] ExceedsMaxMoney(u64),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScriptError {
    #[error("push of {len} bytes runs past end of script at offset {offset}")] PushPastEnd { offset: usize, len: usize },
    #[error("push too large: {0}")] PushTooLarge(usize),
}

#[derive(Error, Debug)]
pub enum BijiError {
    #[error(transparent)] Crypto(#[from] CryptoError),
    #[error(transparent)] Address(#[from] AddressError),
    #[error(transparent)] Encode(#[from] EncodeError),
    #[error(transparent)] Amount(#[from] AmountError),
    #[error(transparent)] Script(#[from] ScriptError),
}
