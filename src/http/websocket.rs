//! WebSocket chat endpoint.
//!
//! # Data Flow
//! ```text
//! Client ──text frames──▶ reader loop ──▶ ChatSession::handle_text ──▶ backend legs
//! Client ◀──text frames── writer task ◀── outbound queue ◀── greeting + backend replies
//! ```
//!
//! # Design Decisions
//! - Writer runs in its own task; the reader loop owns the session
//! - On disconnect the session is closed (backend streams half-closed) and the writer aborted

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State;
use axum::response::Response;
use futures_util::{SinkExt, StreamExt};

use crate::chat::ChatMultiplexer;
use crate::http::server::AppState;

/// `GET /chat` (WebSocket upgrade)
pub async fn chat(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    let chat = state.chat.clone();
    ws.on_upgrade(move |socket| run_chat_session(socket, chat))
}

async fn run_chat_session(socket: WebSocket, chat: ChatMultiplexer) {
    let (session, mut outbound) = chat.open();
    let session_id = session.id();
    let (mut ws_tx, mut ws_rx) = socket.split();

    let writer = tokio::spawn(async move {
        while let Some(envelope) = outbound.recv().await {
            let text = match serde_json::to_string(&envelope) {
                Ok(text) => text,
                Err(err) => {
                    tracing::warn!(session = %session_id, error = %err, "Failed to encode chat message");
                    continue;
                }
            };
            if ws_tx.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(frame) = ws_rx.next().await {
        match frame {
            Ok(Message::Text(text)) => {
                session.handle_text(text.as_str()).await;
            }
            Ok(Message::Binary(data)) => match std::str::from_utf8(&data) {
                Ok(text) => {
                    session.handle_text(text).await;
                }
                Err(_) => {
                    tracing::warn!(session = %session_id, len = data.len(), "Dropping non-UTF8 binary frame");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(Message::Ping(_) | Message::Pong(_)) => {}
            Err(err) => {
                tracing::debug!(session = %session_id, error = %err, "WebSocket read failed");
                break;
            }
        }
    }

    session.close();
    writer.abort();
}
