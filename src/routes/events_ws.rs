use std::sync::Arc;

use askama::Template;
use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
};
use tokio::sync::watch;

use crate::model::Snapshot;
use crate::render::render;
use crate::state::AppState;
use crate::templates::PanelTemplate;

#[utoipa::path(
    get,
    path = "/events",
    description = "Pushes the re-rendered panel HTML on every snapshot change",
    responses(
        (status = 101, description = "WebSocket upgrade initiated")
    ),
    tag = "Streaming"
)]
pub async fn events_ws(
    State(app): State<Arc<AppState>>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    let rx = app.snapshots.clone();
    ws.on_upgrade(move |socket| push_panels(socket, rx))
}

async fn push_panels(mut socket: WebSocket, mut rx: watch::Receiver<Arc<Snapshot>>) {
    loop {
        let snapshot = rx.borrow_and_update().clone();
        let view = render(&snapshot);

        match (PanelTemplate { view: &view }).render() {
            Ok(html) => {
                if socket.send(Message::Text(html.into())).await.is_err() {
                    break;
                }
            }
            Err(e) => tracing::error!("failed to render panel: {e}"),
        }

        tokio::select! {
            changed = rx.changed() => {
                if changed.is_err() {
                    // poller gone
                    break;
                }
            }
            _ = client_closed(&mut socket) => break,
        }
    }

    tracing::debug!("dashboard client disconnected");
}

async fn client_closed(socket: &mut WebSocket) {
    while let Some(Ok(msg)) = socket.recv().await {
        if let Message::Close(_) = msg {
            return;
        }
    }
}
