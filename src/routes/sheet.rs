use std::net::SocketAddr;

use axum::Json;
use axum::body::Bytes;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};

use crate::error::AppError;
use crate::models::{AppendResponse, SheetData};
use crate::state::SharedState;
use crate::submission::{parser, pipeline};

/// Write call: append one record as a new sheet row.
pub async fn append(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok());

    let result = match parser::parse_body(content_type, &body) {
        Ok(record) => pipeline::run(&state, &headers, Some(addr.ip()), record).await,
        Err(e) => Err(AppError::BadRequest(e)),
    };

    match result {
        Ok(()) => (
            StatusCode::OK,
            Json(AppendResponse {
                success: true,
                error: None,
            }),
        )
            .into_response(),
        Err(e) => {
            let status = e.status();
            (
                status,
                Json(AppendResponse {
                    success: false,
                    error: Some(e.public_message()),
                }),
            )
                .into_response()
        }
    }
}

/// Read call: the whole sheet as headers plus keyed rows.
pub async fn read(State(state): State<SharedState>) -> Result<Json<SheetData>, AppError> {
    let rows = state.store.read_rows().await?;
    Ok(Json(SheetData::from_rows(&rows)))
}

pub async fn preflight(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let origin = headers.get("origin").and_then(|v| v.to_str().ok());
    let Some(allowed) = state.config.allowed_origin(origin) else {
        return StatusCode::NO_CONTENT.into_response();
    };

    (
        [
            ("Access-Control-Allow-Origin", allowed),
            ("Access-Control-Allow-Methods", "GET, POST, OPTIONS".to_string()),
            ("Access-Control-Allow-Headers", "Content-Type".to_string()),
            ("Access-Control-Max-Age", "86400".to_string()),
        ],
        StatusCode::NO_CONTENT,
    )
        .into_response()
}
