//! Core protocol types: hashes, outpoints and legacy transactions.
//!
//! All monetary values are in satoshis (1 BTC = 10^8 sat).
//! Transactions encode to the legacy (non-witness) wire format.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};
use std::fmt;
use std::str::FromStr;

use crate::constants::SEQUENCE_FINAL;
use crate::encode::{Decoder, varint_len, write_var_bytes, write_varint};
use crate::error::EncodeError;
use crate::script::Script;

/// A 32-byte double-SHA256 digest.
///
/// Bytes are kept in internal (wire) order. [`Display`](fmt::Display) and
/// [`FromStr`] use the conventional byte-reversed hex form, so a txid prints
/// the same way block explorers show it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Hash256(pub [u8; 32]);

impl Hash256 {
    /// The zero hash.
    pub const ZERO: Self = Self([0u8; 32]);

    pub fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == [0u8; 32]
    }

    /// SHA256(SHA256(data)).
    pub fn sha256d(data: &[u8]) -> Self {
        let first = Sha256::digest(data);
        Self(Sha256::digest(first).into())
    }
}

impl fmt::Display for Hash256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0.iter().rev() {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl FromStr for Hash256 {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s).map_err(|e| EncodeError::InvalidHex(e.to_string()))?;
        let mut out: [u8; 32] = bytes
            .as_slice()
            .try_into()
            .map_err(|_| EncodeError::InvalidHashLength(bytes.len()))?;
        out.reverse();
        Ok(Self(out))
    }
}

impl From<[u8; 32]> for Hash256 {
    fn from(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }
}

impl AsRef<[u8]> for Hash256 {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl Serialize for Hash256 {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Hash256 {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// HASH160 of a compressed public key: RIPEMD160(SHA256(pubkey)).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct PubkeyHash(pub [u8; 20]);

impl PubkeyHash {
    pub fn as_bytes(&self) -> &[u8; 20] {
        &self.0
    }

    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        bytes.try_into().ok().map(Self)
    }
}

impl fmt::Display for PubkeyHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

/// Reference to a specific output of a previous transaction.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OutPoint {
    /// Transaction ID containing the referenced output.
    pub txid: Hash256,
    /// Index of the output within the transaction.
    pub index: u32,
}

impl OutPoint {
    pub fn new(txid: Hash256, index: u32) -> Self {
        Self { txid, index }
    }
}

impl fmt::Display for OutPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.txid, self.index)
    }
}

impl FromStr for OutPoint {
    type Err = EncodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (txid, index) = s
            .split_once(':')
            .ok_or_else(|| EncodeError::InvalidHex(format!("missing ':' in outpoint {s}")))?;
        let index = index
            .parse()
            .map_err(|_| EncodeError::InvalidHex(format!("bad output index {index}")))?;
        Ok(Self::new(txid.parse()?, index))
    }
}

/// A transaction input, spending a previous output.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxInput {
    /// The outpoint being spent.
    pub previous_output: OutPoint,
    /// Unlocking script. Empty until the input is signed.
    pub script_sig: Script,
    pub sequence: u32,
}

impl TxInput {
    /// An unsigned input with a final sequence number.
    pub fn unsigned(previous_output: OutPoint) -> Self {
        Self {
            previous_output,
            script_sig: Script::new(),
            sequence: SEQUENCE_FINAL,
        }
    }
}

/// A transaction output.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct TxOutput {
    /// Value in satoshis.
    pub value: u64,
    /// Locking script.
    pub script_pubkey: Script,
}

/// A legacy Bitcoin transaction.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Transaction {
    pub version: u32,
    pub inputs: Vec<TxInput>,
    pub outputs: Vec<TxOutput>,
    pub lock_time: u32,
}

impl Transaction {
    /// Compute the transaction ID (double-SHA256 of the legacy encoding).
    pub fn txid(&self) -> Hash256 {
        Hash256::sha256d(&self.to_bytes())
    }

    /// Sum of output values, or `None` on overflow.
    pub fn total_output_value(&self) -> Option<u64> {
        self.outputs
            .iter()
            .try_fold(0u64, |acc, o| acc.checked_add(o.value))
    }

    /// Encoded size in bytes.
    pub fn size(&self) -> usize {
        let inputs: usize = self
            .inputs
            .iter()
            .map(|i| 32 + 4 + varint_len(i.script_sig.len() as u64) + i.script_sig.len() + 4)
            .sum();
        let outputs: usize = self
            .outputs
            .iter()
            .map(|o| 8 + varint_len(o.script_pubkey.len() as u64) + o.script_pubkey.len())
            .sum();
        4 + varint_len(self.inputs.len() as u64)
            + inputs
            + varint_len(self.outputs.len() as u64)
            + outputs
            + 4
    }

    pub fn encode_to(&self, buf: &mut Vec<u8>) {
        buf.extend_from_slice(&self.version.to_le_bytes());
        write_varint(buf, self.inputs.len() as u64);
        for input in &self.inputs {
            buf.extend_from_slice(input.previous_output.txid.as_bytes());
            buf.extend_from_slice(&input.previous_output.index.to_le_bytes());
            write_var_bytes(buf, input.script_sig.as_bytes());
            buf.extend_from_slice(&input.sequence.to_le_bytes());
        }
        write_varint(buf, self.outputs.len() as u64);
        for output in &self.outputs {
            buf.extend_from_slice(&output.value.to_le_bytes());
            write_var_bytes(buf, output.script_pubkey.as_bytes());
        }
        buf.extend_from_slice(&self.lock_time.to_le_bytes());
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.size());
        self.encode_to(&mut buf);
        buf
    }

    pub fn decode_from(dec: &mut Decoder<'_>) -> Result<Self, EncodeError> {
        let version = dec.read_u32_le()?;
        let n_in = dec.read_length()?;
        let mut inputs = Vec::with_capacity(n_in);
        for _ in 0..n_in {
            let txid = Hash256(dec.read_array()?);
            let index = dec.read_u32_le()?;
            let script_sig = Script::from_bytes(dec.read_var_bytes()?);
            let sequence = dec.read_u32_le()?;
            inputs.push(TxInput {
                previous_output: OutPoint::new(txid, index),
                script_sig,
                sequence,
            });
        }
        let n_out = dec.read_length()?;
        let mut outputs = Vec::with_capacity(n_out);
        for _ in 0..n_out {
            let value = dec.read_u64_le()?;
            let script_pubkey = Script::from_bytes(dec.read_var_bytes()?);
            outputs.push(TxOutput {
                value,
                script_pubkey,
            });
        }
        let lock_time = dec.read_u32_le()?;
        Ok(Self {
            version,
            inputs,
            outputs,
            lock_time,
        })
    }

    /// Decode a complete transaction. Trailing bytes are an error.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodeError> {
        let mut dec = Decoder::new(bytes);
        let tx = Self::decode_from(&mut dec)?;
        dec.finish()?;
        Ok(tx)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.to_bytes())
    }

    pub fn from_hex(s: &str) -> Result<Self, EncodeError> {
        let bytes = hex::decode(s.trim()).map_err(|e| EncodeError::InvalidHex(e.to_string()))?;
        Self::from_bytes(&bytes)
    }
}
