use std::sync::Arc;

use askama::Template;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Html;

use crate::render::render;
use crate::state::AppState;
use crate::templates::DashboardTemplate;

#[utoipa::path(
    get,
    path = "/",
    description = "Dashboard page; keeps itself current over /events",
    responses(
        (status = 200, content_type = "text/html", body = String),
        (status = 500, description = "Template rendering failed")
    )
)]
pub async fn dashboard_handler(
    State(app): State<Arc<AppState>>,
) -> Result<Html<String>, StatusCode> {
    let view = render(&app.current());
    let page = DashboardTemplate {
        view: &view,
        reconnect_ms: app.poll_interval.as_millis() as u64,
    };

    page.render().map(Html).map_err(|e| {
        tracing::error!("failed to render dashboard: {e}");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}
