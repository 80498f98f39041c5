use super::*;

#[tokio::test]
async fn heartbeat_gets_pong() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _repos) = test_app(dir.path(), 1);
    let (addr, server) = spawn_server(app).await;
    let mut ws = ws_connect(addr).await;

    ws_send_client(&mut ws, &ClientMessage::Heartbeat).await;
    let msg = ws_expect_message(&mut ws, TIMEOUT, |_| true).await;
    assert_eq!(msg, ServerMessage::Pong);

    server.abort();
}

#[tokio::test]
async fn malformed_frame_gets_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _repos) = test_app(dir.path(), 1);
    let (addr, server) = spawn_server(app).await;
    let mut ws = ws_connect(addr).await;

    ws_send_raw(&mut ws, r#"{"type":"launch_missiles"}"#).await;
    let msg = ws_expect_message(&mut ws, TIMEOUT, |_| true).await;
    match msg {
        ServerMessage::Error { code, .. } => assert_eq!(code, "PARSE_ERROR"),
        other => panic!("unexpected message: {other:?}"),
    }

    // connection stays usable
    ws_send_client(&mut ws, &ClientMessage::Heartbeat).await;
    let msg = ws_expect_message(&mut ws, TIMEOUT, |_| true).await;
    assert_eq!(msg, ServerMessage::Pong);

    server.abort();
}
