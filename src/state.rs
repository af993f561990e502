use std::sync::Arc;

use crate::config::Config;
use crate::db::Database;
use crate::hooks::HookRegistry;
use crate::rate_limit::LoginRateLimiter;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub db: Database,
    pub config: Config,
    pub hooks: HookRegistry,
    pub login_limiter: LoginRateLimiter,
}
