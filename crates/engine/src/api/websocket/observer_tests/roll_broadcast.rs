use super::*;

#[tokio::test]
async fn roll_reaches_every_observer() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _repos) = test_app(dir.path(), 6);
    let character = app.use_cases.character.create(raan()).await.unwrap();

    let (addr, server) = spawn_server(app.clone()).await;
    let mut first = ws_connect(addr).await;
    let mut second = ws_connect(addr).await;
    wait_for_observers(&app, 2).await;

    let status = http_post(
        app.clone(),
        &format!("/api/character/{}/roll", character.id()),
        r#"{"spInvestment": 4, "dieIndex": 1}"#,
    )
    .await;
    assert!(status.is_success());

    for ws in [&mut first, &mut second] {
        let msg = ws_expect_message(ws, TIMEOUT, |m| {
            matches!(m, ServerMessage::SpiritDieRoll(_))
        })
        .await;
        let ServerMessage::SpiritDieRoll(event) = msg else {
            unreachable!()
        };
        assert_eq!(event.character.id, character.id().to_uuid());
        assert_eq!(event.character.name, "R'aan Fames");
        assert_eq!(event.roll.sp_investment, 4);
        assert_eq!(event.roll.die_index, 1);
        assert_eq!(event.roll.value, 6);
        assert!(event.roll.success);
    }

    server.abort();
}

#[tokio::test]
async fn rejected_roll_is_not_broadcast() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _repos) = test_app(dir.path(), 6);
    let character = app.use_cases.character.create(raan()).await.unwrap();

    let (addr, server) = spawn_server(app.clone()).await;
    let mut ws = ws_connect(addr).await;
    wait_for_observers(&app, 1).await;

    let status = http_post(
        app.clone(),
        &format!("/api/character/{}/roll", character.id()),
        r#"{"spInvestment": 0}"#,
    )
    .await;
    assert_eq!(status.as_u16(), 400);

    ws_expect_no_message(&mut ws, Duration::from_millis(200)).await;
    server.abort();
}

#[tokio::test]
async fn disconnected_observer_is_released() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _repos) = test_app(dir.path(), 6);

    let (addr, server) = spawn_server(app.clone()).await;
    let ws = ws_connect(addr).await;
    wait_for_observers(&app, 1).await;

    drop(ws);
    tokio::time::timeout(TIMEOUT, async {
        while app.relay.observer_count().await > 0 {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap();

    server.abort();
}

#[tokio::test]
async fn observer_dropped_by_relay_is_closed() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _repos) = test_app(dir.path(), 6);

    let (addr, server) = spawn_server(app.clone()).await;
    let mut ws = ws_connect(addr).await;
    wait_for_observers(&app, 1).await;

    for id in app.relay.observer_ids().await {
        app.relay.unsubscribe(id).await;
    }

    assert_eq!(ws_expect_close(&mut ws, TIMEOUT).await, Some(1013));
    assert_eq!(app.relay.observer_count().await, 0);

    server.abort();
}
