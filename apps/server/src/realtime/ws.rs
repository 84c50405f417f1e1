//! WebSocket endpoint: upgrade, announce handling, and the socket loop.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::IntoResponse;
use serde::Deserialize;
use tokio::sync::mpsc;
use tracing::debug;

use crate::main_lib::AppState;

use super::hub::ConnectionId;

/// Client-to-server messages. Only `announce` is understood; anything else
/// is ignored.
#[derive(Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
enum ClientMessage {
    Announce {
        #[serde(rename = "userId")]
        user_id: String,
        #[serde(rename = "tripId")]
        trip_id: Option<String>,
    },
}

pub async fn handler_ws(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| ws_loop(socket, state))
}

async fn ws_loop(mut socket: WebSocket, state: Arc<AppState>) {
    let (tx, mut rx) = mpsc::unbounded_channel::<String>();
    let id: ConnectionId = state.hub.register(tx);
    debug!(connection = id, "websocket connected");

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                match outbound {
                    Some(msg) => {
                        if socket.send(Message::Text(msg.into())).await.is_err() {
                            break;
                        }
                    }
                    None => break,
                }
            }
            inbound = socket.recv() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if let Ok(ClientMessage::Announce { user_id, trip_id }) =
                            serde_json::from_str::<ClientMessage>(&text)
                        {
                            state.hub.assign(id, user_id, trip_id);
                        }
                    }
                    Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                    Some(Ok(_)) => {}
                }
            }
        }
    }

    state.hub.remove(id);
    debug!(connection = id, "websocket disconnected");
}
