use std::sync::Arc;

use axum::extract::State;
use axum::Json;

use crate::render::{render, View};
use crate::state::AppState;

#[utoipa::path(
    get,
    path = "/view",
    description = "Current container rows with their health classification",
    responses(
        (status = 200, body = View)
    )
)]
pub async fn view_handler(State(app): State<Arc<AppState>>) -> Json<View> {
    Json(render(&app.current()))
}
