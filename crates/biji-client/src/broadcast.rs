//! Raw transaction submission over Esplora.

use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::warn;

use biji_core::types::Hash256;
use biji_wallet::{BroadcastError, SignedTransaction};

/// `POST {base}/tx` with the hex serialization as body.
///
/// A non-success status is a rejection carrying the server's message. The
/// accepted txid is the one the server echoes back, or the local one if the
/// reply cannot be parsed.
pub async fn submit_tx(
    http: &Client,
    base_url: &str,
    signed: &SignedTransaction,
) -> Result<Hash256, BroadcastError> {
    let url = format!("{base_url}/tx");
    let resp = http
        .post(&url)
        .header(CONTENT_TYPE, "text/plain")
        .body(signed.to_hex())
        .send()
        .await
        .map_err(|e| BroadcastError::Unreachable(e.to_string()))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .map_err(|e| BroadcastError::Unreachable(e.to_string()))?;
    let body = body.trim();

    if !status.is_success() {
        let reason = if body.is_empty() {
            format!("HTTP {status}")
        } else {
            body.to_string()
        };
        return Err(BroadcastError::Rejected(reason));
    }

    let local = signed.txid();
    match body.parse::<Hash256>() {
        Ok(txid) => {
            if txid != local {
                warn!(%txid, %local, "server reported a different txid");
            }
            Ok(txid)
        }
        Err(e) => {
            warn!(%local, error = %e, "unparseable broadcast reply");
            Ok(local)
        }
    }
}
