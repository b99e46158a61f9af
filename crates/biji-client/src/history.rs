//! Address history over Esplora.
//!
//! One task per address pages through its transactions, then one task per
//! received output asks whether it has been spent. Finished addresses are
//! merged into a single map behind a mutex. The caller bounds the whole
//! fetch with a timeout; dropping the future aborts every task.

use std::sync::Arc;

use parking_lot::Mutex;
use reqwest::Client;
use serde::de::DeserializeOwned;
use tokio::task::JoinSet;
use tracing::debug;

use biji_core::address::Address;
use biji_core::types::OutPoint;
use biji_wallet::{HistoryMap, HistoryRow, OracleError};

use crate::api::{CHAIN_PAGE_SIZE, EsploraOutspend, EsploraTx, parse_txid};

/// Fetch the history of every address concurrently.
pub async fn fetch_history(
    http: &Client,
    base_url: &str,
    addresses: &[Address],
) -> Result<HistoryMap, OracleError> {
    let merged = Arc::new(Mutex::new(HistoryMap::new()));
    let mut tasks = JoinSet::new();

    for &address in addresses {
        let http = http.clone();
        let base_url = base_url.to_string();
        let merged = Arc::clone(&merged);
        tasks.spawn(async move {
            let rows = address_history(&http, &base_url, &address).await?;
            debug!(%address, rows = rows.len(), "address history fetched");
            merged.lock().insert(address, rows);
            Ok::<_, OracleError>(())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        joined.map_err(|e| OracleError::InvalidResponse(format!("history task failed: {e}")))??;
    }

    let history = std::mem::take(&mut *merged.lock());
    Ok(history)
}

/// Rows for one address, oldest transaction first.
pub async fn address_history(
    http: &Client,
    base_url: &str,
    address: &Address,
) -> Result<Vec<HistoryRow>, OracleError> {
    let script_hex = hex::encode(address.script_pubkey().as_bytes());
    let txs = address_txs(http, base_url, address).await?;

    let mut rows = Vec::new();
    for tx in txs.iter().rev() {
        let txid = parse_txid(&tx.txid)?;
        for (vout, output) in tx.vout.iter().enumerate() {
            if !output.scriptpubkey.eq_ignore_ascii_case(&script_hex) {
                continue;
            }
            let index = u32::try_from(vout)
                .map_err(|_| OracleError::InvalidResponse(format!("output index {vout} too large")))?;
            rows.push(HistoryRow::unspent(
                OutPoint::new(txid, index),
                tx.status.height(),
                output.value,
            ));
        }
    }

    let mut lookups = JoinSet::new();
    for (i, row) in rows.iter().enumerate() {
        let http = http.clone();
        let url = format!(
            "{base_url}/tx/{}/outspend/{}",
            row.output.txid, row.output.index
        );
        lookups.spawn(async move { (i, get_json::<EsploraOutspend>(&http, &url).await) });
    }
    while let Some(joined) = lookups.join_next().await {
        let (i, outspend) = joined
            .map_err(|e| OracleError::InvalidResponse(format!("outspend task failed: {e}")))?;
        if let Some((spend, height)) = outspend?.spend()? {
            rows[i].spend = Some(spend);
            rows[i].spend_height = height;
        }
    }

    Ok(rows)
}

/// Every transaction touching `address`, newest first as the server lists them.
async fn address_txs(
    http: &Client,
    base_url: &str,
    address: &Address,
) -> Result<Vec<EsploraTx>, OracleError> {
    let mut url = format!("{base_url}/address/{address}/txs");
    let mut all = Vec::new();
    let mut last_seen: Option<String> = None;

    loop {
        let page: Vec<EsploraTx> = get_json(http, &url).await?;
        let confirmed = page.iter().filter(|t| t.status.confirmed).count();
        let last = page
            .iter()
            .rev()
            .find(|t| t.status.confirmed)
            .map(|t| t.txid.clone());
        all.extend(page);

        match last {
            Some(last) if confirmed == CHAIN_PAGE_SIZE => {
                if last_seen.as_deref() == Some(last.as_str()) {
                    return Err(OracleError::InvalidResponse(format!(
                        "history of {address} repeats page ending at {last}"
                    )));
                }
                url = format!("{base_url}/address/{address}/txs/chain/{last}");
                last_seen = Some(last);
            }
            _ => break,
        }
    }
    Ok(all)
}

async fn get_json<T: DeserializeOwned>(http: &Client, url: &str) -> Result<T, OracleError> {
    let resp = http
        .get(url)
        .send()
        .await
        .map_err(|e| OracleError::Unreachable(e.to_string()))?;
    let status = resp.status();
    if !status.is_success() {
        let body = resp.text().await.unwrap_or_default();
        return Err(OracleError::InvalidResponse(format!(
            "GET {url}: HTTP {status}: {}",
            body.trim()
        )));
    }
    resp.json()
        .await
        .map_err(|e| OracleError::InvalidResponse(format!("GET {url}: {e}")))
}
