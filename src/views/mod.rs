pub mod dashboard;
pub mod form;

use axum::Router;
use axum::routing::get;

use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/form", get(form::show).post(form::submit))
}
