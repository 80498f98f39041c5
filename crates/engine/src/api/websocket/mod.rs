//! WebSocket handling for roll observers.
//!
//! Every connection is an observer: it receives each completed roll and may
//! send heartbeats. Nothing else flows from client to server. An observer the
//! relay drops for falling behind is closed with `1013 Try Again Later` so the
//! client knows to reconnect.

use std::sync::Arc;

use axum::{
    extract::{
        ws::{close_code, CloseFrame, Message, Utf8Bytes, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;

use spiritdice_shared::{ClientMessage, ServerMessage};

use super::relay::RollBroadcastRelay;

/// State shared by WebSocket handlers.
pub struct WsState {
    pub relay: Arc<RollBroadcastRelay>,
    /// Buffer size for each connection's direct-reply channel
    pub channel_buffer: usize,
}

/// WebSocket upgrade handler - entry point for new connections.
pub async fn ws_handler(ws: WebSocketUpgrade, State(state): State<Arc<WsState>>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state))
}

/// How the outbound half of a connection ended.
enum SendEnd {
    /// The relay stopped feeding this observer
    Dropped,
    /// The socket or the reply channel went away
    Closed,
}

/// Handle an individual WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<WsState>) {
    let (mut ws_sender, mut ws_receiver) = socket.split();

    // Rolls come from the relay; pongs and errors go through a local channel
    let (observer_id, mut broadcasts) = state.relay.subscribe().await;
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(state.channel_buffer.max(1));

    tracing::info!(observer_id = %observer_id, "Observer connected");

    let mut send_task = tokio::spawn(async move {
        loop {
            let msg = tokio::select! {
                broadcast = broadcasts.recv() => match broadcast {
                    Some(msg) => msg,
                    None => {
                        let close = Message::Close(Some(CloseFrame {
                            code: close_code::AGAIN,
                            reason: Utf8Bytes::from_static("Observer dropped, reconnect to resume"),
                        }));
                        let _ = ws_sender.send(close).await;
                        return SendEnd::Dropped;
                    }
                },
                reply = rx.recv() => match reply {
                    Some(msg) => msg,
                    None => return SendEnd::Closed,
                },
            };

            match serde_json::to_string(&msg) {
                Ok(json) => {
                    if ws_sender.send(Message::Text(json.into())).await.is_err() {
                        return SendEnd::Closed;
                    }
                }
                Err(e) => tracing::error!(error = %e, "Failed to serialize server message"),
            }
        }
    });

    let receive = async {
        while let Some(result) = ws_receiver.next().await {
            match result {
                Ok(Message::Text(text)) => {
                    match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(msg) => {
                            let response = handle_message(msg);
                            if tx.try_send(response).is_err() {
                                tracing::warn!(
                                    observer_id = %observer_id,
                                    "Failed to send response, channel full or closed"
                                );
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                observer_id = %observer_id,
                                error = %e,
                                "Failed to parse message"
                            );
                            let _ = tx.try_send(ServerMessage::parse_error(format!(
                                "Invalid message format: {e}"
                            )));
                        }
                    }
                }
                Ok(Message::Ping(_)) => {
                    let _ = tx.try_send(ServerMessage::Pong);
                }
                Ok(Message::Close(_)) => {
                    tracing::info!(observer_id = %observer_id, "WebSocket closed by client");
                    break;
                }
                Err(e) => {
                    tracing::error!(observer_id = %observer_id, error = %e, "WebSocket error");
                    break;
                }
                _ => {}
            }
        }
    };

    tokio::select! {
        end = &mut send_task => {
            if matches!(end, Ok(SendEnd::Dropped)) {
                tracing::warn!(
                    observer_id = %observer_id,
                    "Observer dropped by relay, closing connection"
                );
            }
        }
        () = receive => {}
    }

    state.relay.unsubscribe(observer_id).await;
    send_task.abort();

    tracing::info!(observer_id = %observer_id, "Observer disconnected");
}

fn handle_message(msg: ClientMessage) -> ServerMessage {
    match msg {
        ClientMessage::Heartbeat => ServerMessage::Pong,
    }
}

#[cfg(test)]
pub(crate) mod test_support;

#[cfg(test)]
mod observer_tests;
