//! Application state shared across handlers.

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::Notifier;

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. Repositories and services borrow the pool
/// from here per request.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: AppConfig,
    pool: PgPool,
    notifier: Notifier,
}

impl AppState {
    /// Create a new application state.
    ///
    /// Telegram delivery is enabled when the configuration carries a bot
    /// token and chat id.
    #[must_use]
    pub fn new(config: AppConfig, pool: PgPool) -> Self {
        let notifier = Notifier::new(config.telegram.as_ref());
        Self::with_notifier(config, pool, notifier)
    }

    #[must_use]
    pub fn with_notifier(config: AppConfig, pool: PgPool, notifier: Notifier) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                notifier,
            }),
        }
    }

    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }
}
