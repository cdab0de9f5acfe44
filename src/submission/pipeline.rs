use std::net::IpAddr;

use axum::http::HeaderMap;
use chrono::Utc;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::merchant::validation;
use crate::state::SharedState;

use super::fields;
use super::metadata;

/// Append one received record to the sheet.
pub async fn run(
    state: &SharedState,
    headers: &HeaderMap,
    peer_addr: Option<IpAddr>,
    record: Map<String, Value>,
) -> Result<(), AppError> {
    let meta = metadata::extract(headers, peer_addr, &state.config.trusted_proxies);

    if let Err(retry_after) = state.append_limiter.check(meta.ip) {
        return Err(AppError::RateLimited(format!(
            "Rate limited. Retry after {retry_after}s"
        )));
    }

    let unknown = fields::unknown_keys(&record);
    if !unknown.is_empty() {
        tracing::debug!("Ignoring unknown fields from {}: {:?}", meta.ip, unknown);
    }

    let cells = fields::to_cells(&record, Utc::now());

    let warnings = validation::row_warnings(&fields::as_sheet_row(&cells));
    if !warnings.is_empty() {
        tracing::debug!("Validation warnings for row from {}: {:?}", meta.ip, warnings);
    }

    state.store.append_row(cells).await?;

    tracing::info!(
        ip = %meta.ip,
        user_agent = %meta.user_agent,
        store = state.store.kind(),
        "Appended merchant submission"
    );

    Ok(())
}
