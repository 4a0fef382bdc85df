use std::sync::Arc;

use crate::config::Config;
use crate::db::store::QrStore;

pub struct AppState {
    pub store: Arc<dyn QrStore>,
    pub config: Config,
}
