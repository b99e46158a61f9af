//! Legacy P2PKH address encoding.
//!
//! An address is the Base58Check encoding of a one-byte network version
//! followed by the 20-byte HASH160 of a compressed public key:
//! - Mainnet: version `0x00`, addresses start with `1`
//! - Testnet: version `0x6f`, addresses start with `m` or `n`
//!
//! The 4-byte double-SHA256 checksum rejects typos before any funds move.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    MAINNET_P2PKH_VERSION, MAINNET_WIF_VERSION, TESTNET_P2PKH_VERSION, TESTNET_WIF_VERSION,
};
use crate::crypto::PublicKey;
use crate::error::AddressError;
use crate::script::Script;
use crate::types::PubkeyHash;

/// Network identifier determining address and WIF version bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Network {
    /// Bitcoin mainnet.
    Mainnet,
    /// Bitcoin testnet3.
    Testnet,
}

impl Network {
    /// Base58Check version byte of a P2PKH address.
    pub fn p2pkh_version(&self) -> u8 {
        match self {
            Self::Mainnet => MAINNET_P2PKH_VERSION,
            Self::Testnet => TESTNET_P2PKH_VERSION,
        }
    }

    /// Base58Check version byte of a WIF secret key.
    pub fn wif_version(&self) -> u8 {
        match self {
            Self::Mainnet => MAINNET_WIF_VERSION,
            Self::Testnet => TESTNET_WIF_VERSION,
        }
    }

    pub fn from_p2pkh_version(version: u8) -> Result<Self, AddressError> {
        match version {
            MAINNET_P2PKH_VERSION => Ok(Self::Mainnet),
            TESTNET_P2PKH_VERSION => Ok(Self::Testnet),
            other => Err(AddressError::UnknownVersion(other)),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Network {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mainnet" | "main" | "bitcoin" => Ok(Self::Mainnet),
            "testnet" | "test" | "testnet3" => Ok(Self::Testnet),
            other => Err(AddressError::UnknownNetwork(other.to_string())),
        }
    }
}

/// A P2PKH address.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address {
    network: Network,
    pubkey_hash: PubkeyHash,
}

impl Address {
    pub fn from_pubkey_hash(pubkey_hash: PubkeyHash, network: Network) -> Self {
        Self {
            network,
            pubkey_hash,
        }
    }

    /// Derive the address of a compressed public key.
    pub fn from_public_key(public_key: &PublicKey, network: Network) -> Self {
        Self::from_pubkey_hash(public_key.pubkey_hash(), network)
    }

    pub fn pubkey_hash(&self) -> PubkeyHash {
        self.pubkey_hash
    }

    pub fn network(&self) -> Network {
        self.network
    }

    /// The P2PKH locking script paying to this address.
    pub fn script_pubkey(&self) -> Script {
        Script::p2pkh(&self.pubkey_hash)
    }

    /// Fail unless the address belongs to `expected`.
    pub fn require_network(&self, expected: Network) -> Result<(), AddressError> {
        if self.network == expected {
            Ok(())
        } else {
            Err(AddressError::NetworkMismatch {
                expected: expected.to_string(),
                found: self.network.to_string(),
            })
        }
    }

    /// Encode as a Base58Check string.
    pub fn encode(&self) -> String {
        let mut payload = Vec::with_capacity(21);
        payload.push(self.network.p2pkh_version());
        payload.extend_from_slice(self.pubkey_hash.as_bytes());
        bs58::encode(payload).with_check().into_string()
    }

    /// Decode a Base58Check address string.
    pub fn decode(s: &str) -> Result<Self, AddressError> {
        let payload = decode_check(s)?;
        if payload.len() != 21 {
            return Err(AddressError::InvalidLength(payload.len()));
        }
        let network = Network::from_p2pkh_version(payload[0])?;
        let pubkey_hash =
            PubkeyHash::from_slice(&payload[1..]).ok_or(AddressError::InvalidLength(payload.len()))?;
        Ok(Self {
            network,
            pubkey_hash,
        })
    }
}

/// Base58Check-decode `s`, returning the payload including its version byte.
pub(crate) fn decode_check(s: &str) -> Result<Vec<u8>, AddressError> {
    bs58::decode(s.trim())
        .with_check(None)
        .into_vec()
        .map_err(|e| match e {
            bs58::decode::Error::InvalidChecksum { .. } => AddressError::InvalidChecksum,
            other => AddressError::InvalidBase58(other.to_string()),
        })
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for Address {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.encode())
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::decode(&s).map_err(serde::de::Error::custom)
    }
}
