//! Staged subscription notifications
//!
//! The reconciliation job stages notification records; it never delivers
//! anything. A separate sender may drain unsent records later.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::SubscriberId;

/// Unique notification record identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NotificationId(pub Uuid);

impl NotificationId {
    /// Generate a new random notification ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NotificationId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NotificationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What kind of subscription event a notification describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    /// Payment is due soon (a few days ahead of the due date)
    Preventive,
    /// Due date reached; grace window opened
    DueNotice,
    /// Inside the grace window, days counting down
    Grace,
    /// Grace exhausted; public catalog blocked
    Suspension,
}

impl NotificationKind {
    /// Database/API string form
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preventive => "preventive",
            Self::DueNotice => "due_notice",
            Self::Grace => "grace",
            Self::Suspension => "suspension",
        }
    }
}

impl std::fmt::Display for NotificationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for NotificationKind {
    type Err = ParseKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "preventive" => Ok(Self::Preventive),
            "due_notice" => Ok(Self::DueNotice),
            "grace" => Ok(Self::Grace),
            "suspension" => Ok(Self::Suspension),
            other => Err(ParseKindError(other.to_string())),
        }
    }
}

/// Error parsing a notification kind string
#[derive(Debug, Clone, thiserror::Error)]
#[error("unknown notification kind: {0}")]
pub struct ParseKindError(pub String);

/// A staged notification record
///
/// At most one record exists per `(subscriber_id, kind, notification_date)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Notification ID
    pub id: NotificationId,
    /// Subscriber the notification is for
    pub subscriber_id: SubscriberId,
    /// Notification kind
    pub kind: NotificationKind,
    /// Calendar date the notification refers to
    pub notification_date: NaiveDate,
    /// Grace days remaining, where applicable
    pub days_remaining: Option<i32>,
    /// Human-readable message
    pub message: String,
    /// Whether the record has been delivered by a sender
    pub sent: bool,
    /// When it was delivered, if it was
    pub sent_at: Option<DateTime<Utc>>,
}
