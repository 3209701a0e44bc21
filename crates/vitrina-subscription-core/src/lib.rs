//! Vitrina Subscription Core - Subscription lifecycle logic
//!
//! The subscription lifecycle state machine and the workflows built on it:
//! payment registration, batch reconciliation, the public access gate, and
//! the admin status projection.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use vitrina_db::Repositories;
//! use vitrina_subscription_core::{SubscriptionConfig, SubscriptionService};
//!
//! let repos = Repositories::new(pool);
//! let service = SubscriptionService::new(
//!     Arc::new(repos.subscribers),
//!     Arc::new(repos.payments),
//!     Arc::new(repos.notifications),
//!     SubscriptionConfig::default(),
//! );
//!
//! // Register a payment (always returns the subscriber to Active)
//! service.register_payment(request).await?;
//!
//! // Advance overdue subscribers (daily job or admin trigger)
//! let report = service.reconcile_all().await?;
//! ```

pub mod calendar;
pub mod clock;
pub mod config;
pub mod error;
pub mod service;
pub mod state;
pub mod status;

pub use clock::{Clock, FixedClock, SystemClock};
pub use config::SubscriptionConfig;
pub use error::SubscriptionError;
pub use service::{
    PaymentReceipt, ReconciliationReport, RegisterPaymentRequest, SubscriptionService,
};
pub use state::advance;
pub use status::SubscriptionStatus;
