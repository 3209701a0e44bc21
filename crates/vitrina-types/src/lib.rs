//! Vitrina Types - Shared domain types
//!
//! This crate contains domain types used across Vitrina services:
//! - Subscriber identity and subscription lifecycle state
//! - Payment ledger entries
//! - Staged subscription notifications
//! - Billing calendar arithmetic (month-anchored due dates)

pub mod calendar;
pub mod notification;
pub mod payment;
pub mod subscriber;

pub use notification::*;
pub use payment::*;
pub use subscriber::*;
