//! Esplora REST response types.
//!
//! Only the fields the wallet reads are modelled; everything else in the
//! server's JSON is ignored.

use serde::{Deserialize, Serialize};

use biji_core::constants::UNCONFIRMED_HEIGHT;
use biji_core::types::{Hash256, OutPoint};
use biji_wallet::OracleError;

/// Confirmed transactions per `/txs/chain` page.
pub const CHAIN_PAGE_SIZE: usize = 25;

/// A transaction as listed by `/address/{addr}/txs`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraTx {
    pub txid: String,
    #[serde(default)]
    pub vout: Vec<EsploraVout>,
    pub status: EsploraStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraVout {
    /// Locking script, hex.
    pub scriptpubkey: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scriptpubkey_address: Option<String>,
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraStatus {
    pub confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block_height: Option<u64>,
}

impl EsploraStatus {
    pub fn confirmed_at(height: u64) -> Self {
        Self {
            confirmed: true,
            block_height: Some(height),
        }
    }

    pub fn unconfirmed() -> Self {
        Self {
            confirmed: false,
            block_height: None,
        }
    }

    /// Block height, or `0` while unconfirmed.
    pub fn height(&self) -> u64 {
        match (self.confirmed, self.block_height) {
            (true, Some(height)) => height,
            _ => UNCONFIRMED_HEIGHT,
        }
    }
}

/// Reply of `/tx/{txid}/outspend/{vout}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EsploraOutspend {
    pub spent: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub txid: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vin: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<EsploraStatus>,
}

impl EsploraOutspend {
    pub fn unspent() -> Self {
        Self {
            spent: false,
            txid: None,
            vin: None,
            status: None,
        }
    }

    /// The spending input and its height, if spent.
    pub fn spend(&self) -> Result<Option<(OutPoint, u64)>, OracleError> {
        if !self.spent {
            return Ok(None);
        }
        let (Some(txid), Some(vin)) = (&self.txid, self.vin) else {
            return Err(OracleError::InvalidResponse(
                "spent outspend without txid/vin".into(),
            ));
        };
        let height = self.status.map_or(UNCONFIRMED_HEIGHT, |s| s.height());
        Ok(Some((OutPoint::new(parse_txid(txid)?, vin), height)))
    }
}

pub fn parse_txid(s: &str) -> Result<Hash256, OracleError> {
    s.parse()
        .map_err(|e| OracleError::InvalidResponse(format!("bad txid {s:?}: {e}")))
}
