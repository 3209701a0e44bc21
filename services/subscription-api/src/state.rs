//! Application state for the Subscription API service.

use std::sync::Arc;

use vitrina_db::pg::{
    PgNotificationRepository, PgPaymentLedgerRepository, PgSubscriberRepository, Repositories,
};
use vitrina_db::DbPool;
use vitrina_subscription_core::SubscriptionService;

use crate::config::Config;

/// Concrete service type used by all handlers
pub type Service =
    SubscriptionService<PgSubscriberRepository, PgPaymentLedgerRepository, PgNotificationRepository>;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Subscription service (registration, reconciliation, gate, status)
    pub service: Arc<Service>,
    /// Database pool (readiness checks)
    pub pool: DbPool,
    /// Configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Create new application state
    pub fn new(repos: Repositories, pool: DbPool, config: Config) -> Self {
        let service = SubscriptionService::new(
            Arc::new(repos.subscribers),
            Arc::new(repos.payments),
            Arc::new(repos.notifications),
            config.subscription.clone(),
        );

        Self {
            service: Arc::new(service),
            pool,
            config: Arc::new(config),
        }
    }

    /// Get request timeout from config
    pub fn request_timeout(&self) -> std::time::Duration {
        self.config.request_timeout
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
