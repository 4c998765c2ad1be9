use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::poll_stats::StatsReport;
use crate::state::AppState;

/// Poller counters. Failures never reach the dashboard itself, so this is
/// the place to look when the view seems stale.
#[utoipa::path(
    get,
    path = "/stats",
    responses(
        (status = 200, body = StatsReport)
    )
)]
pub async fn stats_handler(State(app): State<Arc<AppState>>) -> Json<StatsReport> {
    Json(app.stats.report())
}
