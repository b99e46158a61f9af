//! Payment destinations: a P2PKH address and a non-zero amount.

use serde::{Deserialize, Deserializer, Serialize};

use biji_core::address::{Address, Network};
use biji_core::amount::{format_amount, parse_amount};
use biji_core::script::Script;

use crate::error::WalletError;

/// One payment of `amount` satoshis to `address`.
///
/// Deserializing goes through [`Destination::new`], so a zero amount is
/// rejected there too.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    address: Address,
    amount: u64,
}

impl Destination {
    /// Create a destination. A zero amount is rejected.
    pub fn new(address: Address, amount: u64) -> Result<Self, WalletError> {
        if amount == 0 {
            return Err(WalletError::InvalidAmount(format!(
                "zero amount for {address}"
            )));
        }
        Ok(Self { address, amount })
    }

    /// Parse an address string and a decimal BTC amount, requiring the
    /// address to belong to `network`.
    pub fn parse(address: &str, amount: &str, network: Network) -> Result<Self, WalletError> {
        let address: Address = address.trim().parse()?;
        address.require_network(network)?;
        Self::new(address, parse_amount(amount)?)
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    /// Amount in satoshis.
    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn script_pubkey(&self) -> Script {
        self.address.script_pubkey()
    }
}

impl<'de> Deserialize<'de> for Destination {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct Raw {
            address: Address,
            amount: u64,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::new(raw.address, raw.amount).map_err(serde::de::Error::custom)
    }
}

impl std::fmt::Display for Destination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", format_amount(self.amount), self.address)
    }
}

/// Sum of all destination amounts, failing on overflow.
pub fn total_amount(destinations: &[Destination]) -> Result<u64, WalletError> {
    destinations.iter().try_fold(0u64, |acc, d| {
        acc.checked_add(d.amount)
            .ok_or_else(|| WalletError::InvalidAmount("total amount overflow".into()))
    })
}
