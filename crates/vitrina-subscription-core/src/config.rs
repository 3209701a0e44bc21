//! Subscription lifecycle configuration

use crate::state::GRACE_PERIOD_DAYS;

/// Subscription service configuration
#[derive(Debug, Clone)]
pub struct SubscriptionConfig {
    /// Days of grace after a missed due date before the public catalog
    /// is blocked
    pub grace_period_days: i32,
    /// How many days before the due date a preventive notice is staged
    pub preventive_lead_days: i64,
    /// Default page size for ledger history reads
    pub ledger_page_size: i64,
}

impl Default for SubscriptionConfig {
    fn default() -> Self {
        Self {
            grace_period_days: GRACE_PERIOD_DAYS,
            preventive_lead_days: 5,
            ledger_page_size: 50,
        }
    }
}

impl SubscriptionConfig {
    /// Set the grace period length
    pub fn with_grace_period_days(mut self, days: i32) -> Self {
        self.grace_period_days = days;
        self
    }

    /// Set the preventive notice lead time
    pub fn with_preventive_lead_days(mut self, days: i64) -> Self {
        self.preventive_lead_days = days;
        self
    }
}
