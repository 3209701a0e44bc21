//! Public storefront availability handler
//!
//! Consulted by the storefront renderer on every public request. A blocked
//! store answers with a neutral "temporarily unavailable" body so customers
//! can tell it apart from a store that does not exist (plain 404).

use axum::extract::{Path, State};
use axum::Json;
use serde::Serialize;

use vitrina_subscription_core::SubscriptionError;
use vitrina_types::SubscriberId;

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AvailabilityResponse {
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

/// GET /public/stores/{id}/availability
pub async fn store_availability(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<AvailabilityResponse>> {
    let subscriber_id = SubscriberId::parse(&id).map_err(|_| ApiError::StoreNotFound)?;

    if state.service.can_access_public_catalog(subscriber_id).await {
        return Ok(Json(AvailabilityResponse {
            available: true,
            message: None,
        }));
    }

    // The gate fails closed for unknown subscribers and lookup failures;
    // only a genuinely missing store becomes a 404 here.
    match state.service.subscription_status(subscriber_id).await {
        Err(SubscriptionError::SubscriberNotFound) => Err(ApiError::StoreNotFound),
        _ => Ok(Json(AvailabilityResponse {
            available: false,
            message: Some("This store is temporarily unavailable. Please try again later."),
        })),
    }
}
