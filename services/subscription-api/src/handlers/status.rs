//! Subscription status projection handler

use axum::extract::{Path, State};
use axum::Json;
use std::time::Instant;

use vitrina_subscription_core::SubscriptionStatus;
use vitrina_types::SubscriberId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// GET /api/v1/subscription/{id}/status
pub async fn subscription_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<SubscriptionStatus>> {
    let start = Instant::now();

    let subscriber_id = SubscriberId::parse(&id)
        .map_err(|_| ApiError::BadRequest("Invalid subscriber id".to_string()))?;

    let status = state.service.subscription_status(subscriber_id).await?;

    metrics::histogram!("subscription_operation_duration_seconds", "operation" => "status")
        .record(start.elapsed().as_secs_f64());

    Ok(Json(status))
}
