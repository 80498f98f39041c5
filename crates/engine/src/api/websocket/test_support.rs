use std::{net::SocketAddr, sync::Arc, time::Duration};

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpListener;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use spiritdice_shared::{ClientMessage, ServerMessage};

use crate::app::App;

pub(crate) type TestSocket =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Serve the full router on an ephemeral port.
pub(crate) async fn spawn_server(app: Arc<App>) -> (SocketAddr, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let router = crate::api::router(app);

    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (addr, handle)
}

pub(crate) async fn ws_connect(addr: SocketAddr) -> TestSocket {
    let url = format!("ws://{}/ws", addr);
    let (ws, _resp) = connect_async(url).await.unwrap();
    ws
}

pub(crate) async fn ws_send_client(ws: &mut TestSocket, msg: &ClientMessage) {
    let json = serde_json::to_string(msg).unwrap();
    ws.send(WsMessage::Text(json)).await.unwrap();
}

pub(crate) async fn ws_send_raw(ws: &mut TestSocket, text: &str) {
    ws.send(WsMessage::Text(text.to_string())).await.unwrap();
}

pub(crate) async fn ws_recv_server(ws: &mut TestSocket) -> ServerMessage {
    loop {
        let msg = ws.next().await.unwrap().unwrap();
        match msg {
            WsMessage::Text(text) => {
                return serde_json::from_str::<ServerMessage>(&text).unwrap();
            }
            WsMessage::Binary(bin) => {
                let text = String::from_utf8(bin).unwrap();
                return serde_json::from_str::<ServerMessage>(&text).unwrap();
            }
            _ => {}
        }
    }
}

pub(crate) async fn ws_expect_message<F>(
    ws: &mut TestSocket,
    timeout: Duration,
    mut predicate: F,
) -> ServerMessage
where
    F: FnMut(&ServerMessage) -> bool,
{
    tokio::time::timeout(timeout, async {
        loop {
            let msg = ws_recv_server(ws).await;
            if predicate(&msg) {
                return msg;
            }
        }
    })
    .await
    .unwrap()
}

pub(crate) async fn ws_expect_no_message(ws: &mut TestSocket, timeout: Duration) {
    let result = tokio::time::timeout(timeout, ws_recv_server(ws)).await;
    assert!(result.is_err(), "unexpected message: {:?}", result.ok());
}

/// Wait for the server to close the socket and return the close code it sent.
pub(crate) async fn ws_expect_close(ws: &mut TestSocket, timeout: Duration) -> Option<u16> {
    tokio::time::timeout(timeout, async {
        while let Some(frame) = ws.next().await {
            match frame {
                Ok(WsMessage::Close(close)) => return close.map(|c| u16::from(c.code)),
                Ok(_) => continue,
                Err(_) => return None,
            }
        }
        None
    })
    .await
    .unwrap()
}

/// Wait until the relay has `count` observers attached.
pub(crate) async fn wait_for_observers(app: &App, count: usize) {
    tokio::time::timeout(Duration::from_secs(2), async {
        while app.relay.observer_count().await < count {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();
}

/// POST a JSON body through the router bound to `app` and return the status.
pub(crate) async fn http_post(app: Arc<App>, path: &str, body: &str) -> axum::http::StatusCode {
    use tower::ServiceExt;

    let request = axum::http::Request::builder()
        .method("POST")
        .uri(path)
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body.to_string()))
        .unwrap();
    crate::api::router(app)
        .oneshot(request)
        .await
        .unwrap()
        .status()
}
