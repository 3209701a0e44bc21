//! PostgreSQL repository implementations

mod notification;
mod payment;
mod subscriber;

pub use notification::PgNotificationRepository;
pub use payment::PgPaymentLedgerRepository;
pub use subscriber::PgSubscriberRepository;

use crate::DbPool;

/// All repositories bundled together
#[derive(Clone)]
pub struct Repositories {
    pub subscribers: PgSubscriberRepository,
    pub payments: PgPaymentLedgerRepository,
    pub notifications: PgNotificationRepository,
}

impl Repositories {
    /// Create all repositories from a database pool
    pub fn new(pool: DbPool) -> Self {
        Self {
            subscribers: PgSubscriberRepository::new(pool.clone()),
            payments: PgPaymentLedgerRepository::new(pool.clone()),
            notifications: PgNotificationRepository::new(pool),
        }
    }
}
