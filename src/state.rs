use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::email::Notifier;
use crate::rate_limit::LoginRateLimiter;
use crate::storage::ImageStore;

pub type SharedState = Arc<AppState>;

pub struct AppState {
    pub store: Arc<dyn Store>,
    pub notifier: Arc<dyn Notifier>,
    pub images: Arc<dyn ImageStore>,
    pub config: Config,
    pub login_limiter: LoginRateLimiter,
}
