//! Axum WebSocket upgrade handler.

use std::sync::Arc;

use axum::extract::State;
use axum::extract::ws::WebSocketUpgrade;
use axum::response::IntoResponse;

use super::connection::run_connection;
use crate::app_state::AppState;

/// `GET /ws`: upgrades to a WebSocket streaming ledger events.
///
/// The event receiver is taken before the upgrade completes, so no event
/// published after the handshake is missed.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    let event_rx = state.event_bus.subscribe();
    let ledger = Arc::clone(&state.ledger);
    tracing::debug!(
        subscribers = state.event_bus.receiver_count(),
        "ws client connecting"
    );

    ws.on_upgrade(move |socket| run_connection(socket, event_rx, ledger))
}
