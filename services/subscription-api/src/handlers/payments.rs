//! Payment registration and ledger history handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use vitrina_subscription_core::RegisterPaymentRequest;
use vitrina_types::{Payment, SubscriberId};

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct RegisterPaymentBody {
    pub subscriber_id: String,
    /// Strict `YYYY-MM-DD`
    pub payment_date: String,
    /// Minor currency units, must be positive
    pub amount_cents: i64,
}

#[derive(Debug, Serialize)]
pub struct PaymentReceiptResponse {
    pub payment_id: String,
    pub subscriber_id: String,
    pub period_paid: String,
    pub state_before: String,
    pub state_after: String,
    pub next_due_date: String,
}

#[derive(Debug, Serialize)]
pub struct PaymentResponse {
    pub id: String,
    pub payment_date: String,
    pub amount_cents: i64,
    pub method: String,
    pub period_paid: String,
    pub state_before: String,
    pub state_after: String,
}

impl From<Payment> for PaymentResponse {
    fn from(p: Payment) -> Self {
        Self {
            id: p.id.to_string(),
            payment_date: p.payment_date.to_string(),
            amount_cents: p.amount_cents,
            method: p.method.to_string(),
            period_paid: p.period_paid,
            state_before: p.state_before.to_string(),
            state_after: p.state_after.to_string(),
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /api/v1/subscription/payments
pub async fn register_payment(
    State(state): State<AppState>,
    Json(body): Json<RegisterPaymentBody>,
) -> ApiResult<Json<PaymentReceiptResponse>> {
    let start = Instant::now();

    let subscriber_id = SubscriberId::parse(&body.subscriber_id)
        .map_err(|_| ApiError::BadRequest("Invalid subscriber_id".to_string()))?;

    let receipt = state
        .service
        .register_payment(RegisterPaymentRequest {
            subscriber_id,
            payment_date: body.payment_date,
            amount_cents: body.amount_cents,
        })
        .await?;

    metrics::counter!("subscription_payments_registered_total").increment(1);
    metrics::histogram!("subscription_operation_duration_seconds", "operation" => "register_payment")
        .record(start.elapsed().as_secs_f64());

    tracing::info!(
        subscriber_id = %receipt.subscriber_id,
        period = %receipt.period_paid,
        "Payment registered via API"
    );

    Ok(Json(PaymentReceiptResponse {
        payment_id: receipt.payment_id.to_string(),
        subscriber_id: receipt.subscriber_id.to_string(),
        period_paid: receipt.period_paid,
        state_before: receipt.state_before.to_string(),
        state_after: receipt.state_after.to_string(),
        next_due_date: receipt.next_due_date.to_string(),
    }))
}

/// GET /api/v1/subscription/{id}/payments
pub async fn payment_history(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Vec<PaymentResponse>>> {
    let start = Instant::now();

    let subscriber_id = SubscriberId::parse(&id)
        .map_err(|_| ApiError::BadRequest("Invalid subscriber id".to_string()))?;

    let history = state.service.payment_history(subscriber_id).await?;

    metrics::histogram!("subscription_operation_duration_seconds", "operation" => "payment_history")
        .record(start.elapsed().as_secs_f64());

    Ok(Json(history.into_iter().map(PaymentResponse::from).collect()))
}
