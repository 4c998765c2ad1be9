use std::sync::Arc;

use axum::{routing::get, Router};
use utoipa::OpenApi;

use crate::routes::dashboard::dashboard_handler;
use crate::routes::events_ws::events_ws;
use crate::routes::health::health_handler;
use crate::routes::stats::stats_handler;
use crate::routes::view::view_handler;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    info(description = "Container dashboard"),
    paths(
        crate::routes::dashboard::dashboard_handler,
        crate::routes::view::view_handler,
        crate::routes::events_ws::events_ws,
        crate::routes::health::health_handler,
        crate::routes::stats::stats_handler
    )
)]
struct ApiDoc;

pub(crate) fn build_router(app: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(dashboard_handler))
        .route("/view", get(view_handler))
        .route("/events", get(events_ws))
        .route("/health", get(health_handler))
        .route("/stats", get(stats_handler))
        .with_state(app)
        .merge(
            utoipa_swagger_ui::SwaggerUi::new("/swagger")
                .url("/api/openapi.json", ApiDoc::openapi()),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use serde_json::Value;
    use tokio::sync::watch;
    use tower::ServiceExt;

    use crate::model::{Entity, Snapshot};
    use crate::poll_stats::PollStats;
    use crate::render::TITLE;

    fn app_with(entities: Vec<Entity>) -> (Router, watch::Sender<Arc<Snapshot>>, PollStats) {
        let (tx, rx) = watch::channel(Arc::new(Snapshot::from(entities)));
        let stats = PollStats::default();
        let state = Arc::new(AppState {
            snapshots: rx,
            stats: stats.clone(),
            poll_interval: Duration::from_millis(5000),
        });
        (build_router(state), tx, stats)
    }

    async fn get_body(app: &Router, uri: &str) -> (StatusCode, Option<String>, Vec<u8>) {
        let response = app
            .clone()
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_owned());
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, content_type, body.to_vec())
    }

    #[tokio::test]
    async fn health_reports_healthy() {
        let (app, _tx, _) = app_with(vec![]);
        let (status, _, body) = get_body(&app, "/health").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "healthy" }));
    }

    #[tokio::test]
    async fn view_lists_rows_with_health() {
        let (app, _tx, _) = app_with(vec![
            Entity::new("web", "running"),
            Entity::new("db", "exited"),
        ]);
        let (status, _, body) = get_body(&app, "/view").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["title"], TITLE);
        assert_eq!(json["rows"][0]["key"], "web");
        assert_eq!(json["rows"][0]["health"], "healthy");
        assert_eq!(json["rows"][1]["key"], "db");
        assert_eq!(json["rows"][1]["health"], "unhealthy");
    }

    #[tokio::test]
    async fn view_follows_snapshot_replacement() {
        let (app, tx, _) = app_with(vec![Entity::new("web", "running")]);

        tx.send_replace(Arc::new(Snapshot::default()));
        let (_, _, body) = get_body(&app, "/view").await;

        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["rows"].as_array().unwrap().len(), 0);
    }

    #[tokio::test]
    async fn dashboard_serves_html_page() {
        let (app, _tx, _) = app_with(vec![Entity::new("web", "running")]);
        let (status, content_type, body) = get_body(&app, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(content_type.unwrap().starts_with("text/html"));
        let html = String::from_utf8(body).unwrap();
        assert!(html.contains(TITLE));
        assert!(html.contains("<strong>web</strong> - running"));
    }

    #[tokio::test]
    async fn stats_exposes_poll_counters() {
        let (app, _tx, stats) = app_with(vec![]);
        stats.record_attempt();
        stats.record_failure(chrono::Utc::now());

        let (status, _, body) = get_body(&app, "/stats").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["attempts"], 1);
        assert_eq!(json["failures"], 1);
        assert_eq!(json["successes"], 0);
        assert!(json["last_failure"].is_string());
        assert!(json["last_success"].is_null());
    }

    #[tokio::test]
    async fn openapi_document_lists_routes() {
        let (app, _tx, _) = app_with(vec![]);
        let (status, _, body) = get_body(&app, "/api/openapi.json").await;

        assert_eq!(status, StatusCode::OK);
        let json: Value = serde_json::from_slice(&body).unwrap();
        for path in ["/", "/view", "/events", "/health", "/stats"] {
            assert!(json["paths"].get(path).is_some(), "missing {path}");
        }
    }
}
