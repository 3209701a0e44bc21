//! Subscription service - ties together the state machine, payment
//! registration, batch reconciliation, and the public access gate

use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use vitrina_db::{
    ApplyTransition, CreateNotification, DbError, NotificationRepository, PaymentLedgerRepository,
    RegisterPayment, SubscriberRepository, SubscriberRow,
};
use vitrina_types::{
    NotificationKind, Payment, PaymentId, PaymentMethod, SubscriberId, SubscriptionState,
};

use crate::calendar;
use crate::clock::{Clock, SystemClock};
use crate::config::SubscriptionConfig;
use crate::error::SubscriptionError;
use crate::state::advance;
use crate::status::{status_message, SubscriptionStatus};

/// Payment registration input
#[derive(Debug, Clone)]
pub struct RegisterPaymentRequest {
    /// Subscriber the payment is for
    pub subscriber_id: SubscriberId,
    /// Payment date, strict `YYYY-MM-DD`
    pub payment_date: String,
    /// Amount in minor currency units; must be positive
    pub amount_cents: i64,
}

/// Result of a successful payment registration
#[derive(Debug, Clone, Serialize)]
pub struct PaymentReceipt {
    /// Ledger entry written for this payment
    pub payment_id: PaymentId,
    /// Subscriber the payment was registered for
    pub subscriber_id: SubscriberId,
    /// Billing period covered, `YYYY-MM`
    pub period_paid: String,
    /// Lifecycle state before registration
    pub state_before: SubscriptionState,
    /// Always `Active`
    pub state_after: SubscriptionState,
    /// New next due date, one month after the payment date
    pub next_due_date: NaiveDate,
}

/// Aggregate counts returned by a reconciliation run
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ReconciliationReport {
    /// Subscribers evaluated
    pub processed: u64,
    /// Subscribers whose state or grace count actually changed
    pub updated: u64,
    /// Updates that resulted in `PastDue`
    pub past_due: u64,
    /// Updates that resulted in `InGrace` (including grace refreshes)
    pub in_grace: u64,
    /// Updates that resulted in `PartiallyBlocked`
    pub partially_blocked: u64,
    /// Preventive notices staged this run
    pub preventive_staged: u64,
    /// Subscribers skipped because of a per-row failure
    pub failed: u64,
}

/// Per-subscriber outcome of one reconciliation step
#[derive(Debug, Default)]
struct RowOutcome {
    transitioned_to: Option<SubscriptionState>,
    preventive_staged: bool,
}

/// Subscription service
///
/// All mutation of subscription state flows through here: payment
/// registration always forces `Active`, the reconciliation job only moves
/// state forward, and the access gate never writes.
pub struct SubscriptionService<S, P, N>
where
    S: SubscriberRepository,
    P: PaymentLedgerRepository,
    N: NotificationRepository,
{
    subscribers: Arc<S>,
    payments: Arc<P>,
    notifications: Arc<N>,
    config: SubscriptionConfig,
    clock: Arc<dyn Clock>,
}

impl<S, P, N> SubscriptionService<S, P, N>
where
    S: SubscriberRepository,
    P: PaymentLedgerRepository,
    N: NotificationRepository,
{
    /// Create a new subscription service with the system clock
    pub fn new(
        subscribers: Arc<S>,
        payments: Arc<P>,
        notifications: Arc<N>,
        config: SubscriptionConfig,
    ) -> Self {
        Self {
            subscribers,
            payments,
            notifications,
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replace the evaluation clock
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    // =========================================================================
    // Payment Registration
    // =========================================================================

    /// Register a payment for a subscriber.
    ///
    /// Validates input before any mutation, then atomically updates the
    /// subscriber and appends the ledger entry. The repository reads the
    /// subscriber under a row lock and derives `state_before` and the due
    /// day from that locked row, so a concurrent reconciliation run or
    /// first payment cannot slip between read and write. The subscriber
    /// always comes out `Active` with the next due date one month after the
    /// payment date (payment-date-anchored, not due-date-anchored: a late
    /// payment pushes the next due date a full month from when it was
    /// actually made).
    pub async fn register_payment(
        &self,
        req: RegisterPaymentRequest,
    ) -> Result<PaymentReceipt, SubscriptionError> {
        if req.amount_cents <= 0 {
            return Err(SubscriptionError::InvalidInput(
                "amount must be positive".to_string(),
            ));
        }

        let payment_date = calendar::parse_date(&req.payment_date)?;
        let today = self.clock.today();
        if payment_date > today {
            return Err(SubscriptionError::InvalidInput(format!(
                "payment date {payment_date} is in the future"
            )));
        }

        let period_paid = calendar::billing_period(payment_date);

        let payment = RegisterPayment {
            payment_id: Uuid::new_v4(),
            subscriber_id: req.subscriber_id.0,
            payment_date,
            amount_cents: req.amount_cents,
            method: PaymentMethod::Manual.as_str().to_string(),
            period_paid: period_paid.clone(),
            state_after: SubscriptionState::Active.as_str().to_string(),
        };

        let registration = match self.subscribers.register_payment(payment).await {
            Ok(registration) => registration,
            Err(DbError::NotFound) => return Err(SubscriptionError::SubscriberNotFound),
            Err(e) => return Err(e.into()),
        };

        let state_before = parse_state(&registration.payment.state_before)?;

        info!(
            subscriber_id = %req.subscriber_id,
            payment_id = %registration.payment.id,
            period = %period_paid,
            next_due_date = %registration.next_due_date,
            state_before = %state_before,
            "Payment registered"
        );

        Ok(PaymentReceipt {
            payment_id: PaymentId(registration.payment.id),
            subscriber_id: req.subscriber_id,
            period_paid,
            state_before,
            state_after: SubscriptionState::Active,
            next_due_date: registration.next_due_date,
        })
    }

    // =========================================================================
    // Batch Reconciliation
    // =========================================================================

    /// Advance all managed subscribers by elapsed time.
    ///
    /// Safe to re-run at any time: writes only happen when the computed
    /// `(state, grace)` pair differs from the stored one, and staged
    /// notifications are keyed by `(subscriber, kind, date)`. A failing
    /// subscriber is counted and skipped, never aborting the batch.
    pub async fn reconcile_all(&self) -> Result<ReconciliationReport, SubscriptionError> {
        let today = self.clock.today();
        let rows = self.subscribers.list_with_due_date().await?;

        let mut report = ReconciliationReport::default();

        for row in rows {
            report.processed += 1;
            match self.reconcile_one(&row, today).await {
                Ok(outcome) => {
                    if outcome.preventive_staged {
                        report.preventive_staged += 1;
                    }
                    if let Some(new_state) = outcome.transitioned_to {
                        report.updated += 1;
                        match new_state {
                            SubscriptionState::PastDue => report.past_due += 1,
                            SubscriptionState::InGrace => report.in_grace += 1,
                            SubscriptionState::PartiallyBlocked => report.partially_blocked += 1,
                            SubscriptionState::Active => {}
                        }
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    warn!(
                        subscriber_id = %row.id,
                        error = %e,
                        "Reconciliation step failed; continuing with next subscriber"
                    );
                }
            }
        }

        info!(
            processed = report.processed,
            updated = report.updated,
            past_due = report.past_due,
            in_grace = report.in_grace,
            partially_blocked = report.partially_blocked,
            preventive_staged = report.preventive_staged,
            failed = report.failed,
            "Reconciliation run complete"
        );

        Ok(report)
    }

    /// Evaluate and persist one subscriber's transition
    async fn reconcile_one(
        &self,
        row: &SubscriberRow,
        today: NaiveDate,
    ) -> Result<RowOutcome, SubscriptionError> {
        let state = parse_state(&row.subscription_state)?;
        let next_due = row
            .next_due_date
            .ok_or_else(|| SubscriptionError::Internal("subscriber has no due date".to_string()))?;

        let mut outcome = RowOutcome::default();

        // Preventive notice for active subscribers approaching the due date
        let days_until_due = (next_due - today).num_days();
        if state == SubscriptionState::Active && days_until_due == self.config.preventive_lead_days
        {
            outcome.preventive_staged = self
                .stage_notification(
                    row.id,
                    NotificationKind::Preventive,
                    today,
                    Some(self.config.preventive_lead_days as i32),
                    format!(
                        "Payment due on {next_due}. Pay within {days_until_due} day(s) \
                         to keep your store online."
                    ),
                )
                .await?;
        }

        let overdue = calendar::days_overdue(today, next_due);
        let (new_state, new_grace) = advance(
            state,
            row.grace_days_remaining,
            overdue,
            self.config.grace_period_days,
        );

        if (new_state, new_grace) == (state, row.grace_days_remaining) {
            return Ok(outcome);
        }

        // Single conditional write; loses quietly to a concurrent payment
        let applied = self
            .subscribers
            .apply_transition(ApplyTransition {
                subscriber_id: row.id,
                from_state: state.as_str().to_string(),
                from_grace_days: row.grace_days_remaining,
                to_state: new_state.as_str().to_string(),
                to_grace_days: new_grace,
            })
            .await?;

        if !applied {
            debug!(
                subscriber_id = %row.id,
                "Transition skipped; subscriber changed concurrently"
            );
            return Ok(outcome);
        }

        outcome.transitioned_to = Some(new_state);
        info!(
            subscriber_id = %row.id,
            from = %state,
            to = %new_state,
            days_overdue = overdue,
            grace_days_remaining = new_grace,
            "Subscription state advanced"
        );

        if new_state != state {
            if let Some((kind, days_remaining, message)) =
                transition_notice(new_state, new_grace, self.config.grace_period_days)
            {
                self.stage_notification(row.id, kind, today, days_remaining, message)
                    .await?;
            }
        }

        Ok(outcome)
    }

    /// Stage a notification unless one with the same key exists.
    /// Returns whether a record was created.
    async fn stage_notification(
        &self,
        subscriber_id: Uuid,
        kind: NotificationKind,
        date: NaiveDate,
        days_remaining: Option<i32>,
        message: String,
    ) -> Result<bool, SubscriptionError> {
        if self
            .notifications
            .exists(subscriber_id, kind.as_str(), date)
            .await?
        {
            return Ok(false);
        }

        self.notifications
            .create(CreateNotification {
                id: Uuid::new_v4(),
                subscriber_id,
                kind: kind.as_str().to_string(),
                notification_date: date,
                days_remaining,
                message,
            })
            .await?;

        Ok(true)
    }

    // =========================================================================
    // Access Gate
    // =========================================================================

    /// Whether the public storefront may render for this subscriber.
    ///
    /// Read-only and side-effect-free: never triggers a transition. Fails
    /// closed when the state cannot be determined; a missing subscriber is
    /// the caller's 404 to produce.
    pub async fn can_access_public_catalog(&self, subscriber_id: SubscriberId) -> bool {
        match self.subscribers.find_by_id(subscriber_id.0).await {
            Ok(Some(row)) => match parse_state(&row.subscription_state) {
                Ok(state) => state.allows_public_access(),
                Err(e) => {
                    error!(subscriber_id = %subscriber_id, error = %e, "Corrupt subscription state; denying access");
                    false
                }
            },
            Ok(None) => {
                debug!(subscriber_id = %subscriber_id, "Unknown subscriber; denying access");
                false
            }
            Err(e) => {
                error!(subscriber_id = %subscriber_id, error = %e, "Access gate lookup failed; denying access");
                false
            }
        }
    }

    // =========================================================================
    // Status Projection & Ledger History
    // =========================================================================

    /// Read-only status projection for the admin dashboard
    pub async fn subscription_status(
        &self,
        subscriber_id: SubscriberId,
    ) -> Result<SubscriptionStatus, SubscriptionError> {
        let row = self
            .subscribers
            .find_by_id(subscriber_id.0)
            .await?
            .ok_or(SubscriptionError::SubscriberNotFound)?;

        let state = parse_state(&row.subscription_state)?;
        let message = status_message(
            state,
            row.next_due_date,
            row.grace_days_remaining,
            self.clock.today(),
            &self.config,
        );

        let grace_days_remaining = match state {
            SubscriptionState::PastDue | SubscriptionState::InGrace => {
                Some(row.grace_days_remaining)
            }
            _ => None,
        };

        Ok(SubscriptionStatus {
            subscriber_id,
            state,
            next_due_date: row.next_due_date,
            grace_days_remaining,
            message,
            can_access_public_catalog: state.allows_public_access(),
        })
    }

    /// Payment ledger history for a subscriber, most recent first
    pub async fn payment_history(
        &self,
        subscriber_id: SubscriberId,
    ) -> Result<Vec<Payment>, SubscriptionError> {
        self.subscribers
            .find_by_id(subscriber_id.0)
            .await?
            .ok_or(SubscriptionError::SubscriberNotFound)?;

        let rows = self
            .payments
            .list_for_subscriber(subscriber_id.0, self.config.ledger_page_size)
            .await?;

        rows.into_iter()
            .map(|row| {
                Ok(Payment {
                    id: PaymentId(row.id),
                    subscriber_id: SubscriberId(row.subscriber_id),
                    payment_date: row.payment_date,
                    amount_cents: row.amount_cents,
                    method: row
                        .method
                        .parse::<PaymentMethod>()
                        .map_err(|e| SubscriptionError::Internal(e.to_string()))?,
                    period_paid: row.period_paid,
                    state_before: parse_state(&row.state_before)?,
                    state_after: parse_state(&row.state_after)?,
                    created_at: row.created_at,
                })
            })
            .collect()
    }
}

/// Parse a stored state string, surfacing corruption as an internal error
fn parse_state(s: &str) -> Result<SubscriptionState, SubscriptionError> {
    s.parse::<SubscriptionState>()
        .map_err(|e| SubscriptionError::Internal(e.to_string()))
}

/// Notification staged when a subscriber enters a new state
fn transition_notice(
    new_state: SubscriptionState,
    grace_days: i32,
    grace_period: i32,
) -> Option<(NotificationKind, Option<i32>, String)> {
    match new_state {
        SubscriptionState::PastDue => Some((
            NotificationKind::DueNotice,
            Some(grace_period),
            format!("Payment due today. A {grace_period}-day grace period has started."),
        )),
        SubscriptionState::InGrace => Some((
            NotificationKind::Grace,
            Some(grace_days),
            format!(
                "Payment overdue. {grace_days} grace day(s) remaining before \
                 the public catalog is suspended."
            ),
        )),
        SubscriptionState::PartiallyBlocked => Some((
            NotificationKind::Suspension,
            None,
            "Grace period exhausted. The public catalog is suspended until a \
             payment is registered."
                .to_string(),
        )),
        SubscriptionState::Active => None,
    }
}
