//! Admin-facing subscription status projection

use chrono::NaiveDate;
use serde::Serialize;
use vitrina_types::{SubscriptionState, SubscriberId};

use crate::config::SubscriptionConfig;

/// Read-only subscription status for the admin dashboard
#[derive(Debug, Clone, Serialize)]
pub struct SubscriptionStatus {
    /// Subscriber ID
    pub subscriber_id: SubscriberId,
    /// Current lifecycle state
    pub state: SubscriptionState,
    /// Next expected payment date, if managed
    pub next_due_date: Option<NaiveDate>,
    /// Grace days remaining, meaningful in the grace window
    pub grace_days_remaining: Option<i32>,
    /// Human-readable, state-specific message
    pub message: String,
    /// Whether the public storefront currently renders
    pub can_access_public_catalog: bool,
}

/// Build the state-specific status message shown to administrators
pub fn status_message(
    state: SubscriptionState,
    next_due_date: Option<NaiveDate>,
    grace_days_remaining: i32,
    today: NaiveDate,
    config: &SubscriptionConfig,
) -> String {
    match state {
        SubscriptionState::Active => match next_due_date {
            Some(due) => {
                let days_left = (due - today).num_days();
                if (0..=config.preventive_lead_days).contains(&days_left) {
                    format!(
                        "Subscription active. Payment due on {due} ({days_left} day(s) from now)."
                    )
                } else {
                    format!("Subscription active. Next payment due on {due}.")
                }
            }
            None => "Subscription active. No payment registered yet.".to_string(),
        },
        SubscriptionState::PastDue => format!(
            "Payment was due today. Your store stays online during the \
             {}-day grace period.",
            config.grace_period_days
        ),
        SubscriptionState::InGrace => format!(
            "Payment overdue. {grace_days_remaining} grace day(s) remaining \
             before the public catalog is suspended."
        ),
        SubscriptionState::PartiallyBlocked => {
            "Public catalog suspended for non-payment. The admin dashboard \
             remains available; register a payment to restore public access."
                .to_string()
        }
    }
}
