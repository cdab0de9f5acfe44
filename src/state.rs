use std::sync::Arc;

use crate::client::SheetClient;
use crate::config::Config;
use crate::db::SheetStore;
use crate::rate_limit::AppendRateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn SheetStore>,
    pub config: Config,
    pub sheet_client: SheetClient,
    pub append_limiter: AppendRateLimiter,
}
