//! Admin-triggered reconciliation handler
//!
//! The same reconciliation function also runs from a daily scheduler; this
//! endpoint exists so an administrator can force a run and read the counts.

use axum::extract::State;
use axum::Json;
use std::time::Instant;

use vitrina_subscription_core::ReconciliationReport;

use crate::error::ApiResult;
use crate::state::AppState;

/// PUT /api/v1/subscription/reconcile
pub async fn trigger_reconciliation(
    State(state): State<AppState>,
) -> ApiResult<Json<ReconciliationReport>> {
    let start = Instant::now();

    let report = state.service.reconcile_all().await?;

    metrics::counter!("subscription_reconcile_runs_total").increment(1);
    metrics::counter!("subscription_transitions_total", "state" => "past_due")
        .increment(report.past_due);
    metrics::counter!("subscription_transitions_total", "state" => "in_grace")
        .increment(report.in_grace);
    metrics::counter!("subscription_transitions_total", "state" => "partially_blocked")
        .increment(report.partially_blocked);
    metrics::histogram!("subscription_operation_duration_seconds", "operation" => "reconcile")
        .record(start.elapsed().as_secs_f64());

    tracing::info!(
        processed = report.processed,
        updated = report.updated,
        failed = report.failed,
        "Reconciliation triggered via API"
    );

    Ok(Json(report))
}
