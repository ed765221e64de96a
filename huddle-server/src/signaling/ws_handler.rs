use crate::app::AppState;
use axum::extract::State;
use axum::extract::WebSocketUpgrade;
use axum::extract::ws::{Message, WebSocket};
use axum::response::IntoResponse;
use futures::{SinkExt, StreamExt};
use huddle_core::{ClientSignal, MemberId, ServerSignal};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<AppState>) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

async fn handle_socket(socket: WebSocket, state: AppState) {
    let member_id = MemberId::new();
    info!("New WebSocket connection: {}", member_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel();

    state.signaling.add_connection(member_id, tx);
    state
        .signaling
        .send(member_id, &ServerSignal::Welcome { member_id });

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(msg).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let registry = state.registry.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientSignal>(&text) {
                        Ok(signal) => {
                            if let Err(e) = registry.handle_signal(member_id, signal).await {
                                warn!("Rejected frame from {}: {}", member_id, e);
                            }
                        }
                        Err(e) => warn!("Invalid client signal from {}: {}", member_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    if let Err(e) = state.registry.leave(member_id).await {
        error!("Failed to release membership of {}: {}", member_id, e);
    }
    state.signaling.remove_connection(&member_id);
    info!("WebSocket disconnected: {}", member_id);
}
