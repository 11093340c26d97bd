pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod schema;
pub mod seed;
pub mod services;
pub mod validation;

use crate::config::Config;
use crate::db::store::Store;
use crate::middleware::auth::{IdentityProvider, identity_provider};
use crate::services::notifications_service::NotificationEmitter;
use std::sync::Arc;
use tracing::Level;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub emitter: NotificationEmitter,
    pub identity: Arc<dyn IdentityProvider>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the emitter and the configured identity provider around `store`.
    pub fn new(store: Arc<dyn Store>, config: Config) -> Self {
        let identity = identity_provider(&config.auth(), store.clone());
        Self::with_identity(store, identity, config)
    }

    pub fn with_identity(
        store: Arc<dyn Store>,
        identity: Arc<dyn IdentityProvider>,
        config: Config,
    ) -> Self {
        Self {
            emitter: NotificationEmitter::new(store.clone()),
            store,
            identity,
            config: Arc::new(config),
        }
    }
}

pub fn init_tracing(config: &Config) {
    let logging = config.logging();
    let level = match logging.level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = tracing_subscriber::fmt().with_max_level(level);
    // try_init so tests that build several apps do not panic
    let _ = match logging.format.as_str() {
        "json" => builder.json().try_init(),
        _ => builder.pretty().try_init(),
    };
}
