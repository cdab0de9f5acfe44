pub mod sheet;

use axum::Router;
use axum::routing::get;

use crate::state::SharedState;

pub fn sheet_routes() -> Router<SharedState> {
    Router::new().route(
        "/api/sheet",
        get(sheet::read)
            .post(sheet::append)
            .options(sheet::preflight),
    )
}
