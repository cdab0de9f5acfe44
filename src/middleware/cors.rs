use axum::extract::{Request, State};
use axum::http::{HeaderValue, header};
use axum::middleware::Next;
use axum::response::Response;

use crate::state::SharedState;

/// Adds `Access-Control-Allow-Origin` to sheet endpoint responses that do
/// not set it themselves.
pub async fn allow_origin(State(state): State<SharedState>, req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(header::ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let mut response = next.run(req).await;

    if !response.headers().contains_key(header::ACCESS_CONTROL_ALLOW_ORIGIN) {
        if let Some(value) = state
            .config
            .allowed_origin(origin.as_deref())
            .and_then(|o| HeaderValue::from_str(&o).ok())
        {
            response
                .headers_mut()
                .insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, value);
            response
                .headers_mut()
                .append(header::VARY, HeaderValue::from_static("Origin"));
        }
    }

    response
}
