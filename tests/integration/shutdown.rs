use crate::support::{start_server, TestClient, WAIT};
use tokio::net::TcpStream;

#[tokio::test]
async fn test_shutdown_says_bye_to_every_session() {
    let server = start_server(10).await;

    let mut registered = TestClient::connect(server.addr).await;
    registered.register("resident", &[("s", "t")]).await;
    server.wait_for_agent("resident").await;

    let mut handshaking = TestClient::connect(server.addr).await;
    handshaking.send("[HELLO;name=newcomer]").await;
    handshaking.expect("[HI]").await;
    handshaking.expect("[TELLMESKILLS]").await;

    server.shutdown.cancel();

    registered.expect("[BYE]").await;
    registered.expect_closed().await;
    handshaking.expect("[BYE]").await;
    handshaking.expect_closed().await;
    server.wait_for_departure("resident").await;
    assert!(server.directory.is_empty());
}

#[tokio::test]
async fn test_listener_stops_accepting_after_shutdown() {
    let server = start_server(10).await;
    let addr = server.addr;

    server.shutdown.cancel();
    tokio::time::timeout(WAIT, server.task)
        .await
        .expect("listener should return after shutdown")
        .unwrap();

    assert!(TcpStream::connect(addr).await.is_err());
}

#[tokio::test]
async fn test_shutdown_wait_covers_handshaking_sessions() {
    let server = start_server(10).await;

    // Nobody registers, so the directory alone says nothing is running
    let mut client = TestClient::connect(server.addr).await;
    client.send("[HELLO;name=midway]").await;
    client.expect("[HI]").await;
    client.expect("[TELLMESKILLS]").await;
    assert!(server.directory.is_empty());
    assert_eq!(server.sessions.len(), 1);

    server.shutdown.cancel();
    tokio::time::timeout(WAIT, server.sessions.wait())
        .await
        .expect("session tasks should finish after shutdown");

    client.expect("[BYE]").await;
    client.expect_closed().await;
}
