use crate::support::{start_server, TestClient};
use std::time::Duration;

#[tokio::test]
async fn test_heartbeats_keep_agent_registered() {
    let server = start_server(1).await;
    let mut client = TestClient::connect(server.addr).await;
    client.register("steady", &[("s", "t")]).await;
    server.wait_for_agent("steady").await;

    // Well past one deadline in total, never past it between heartbeats
    for _ in 0..6 {
        tokio::time::sleep(Duration::from_millis(300)).await;
        client.send("[IAMSTILLHERE]").await;
    }

    server.wait_for_agent("steady").await;
}

#[tokio::test]
async fn test_silent_agent_is_dropped_with_bye() {
    let server = start_server(1).await;
    let mut client = TestClient::connect(server.addr).await;
    client.register("quiet", &[("s", "t")]).await;
    server.wait_for_agent("quiet").await;

    client.expect("[BYE]").await;
    client.expect_closed().await;
    server.wait_for_departure("quiet").await;
}

#[tokio::test]
async fn test_handshake_has_no_deadline() {
    let server = start_server(1).await;
    let mut client = TestClient::connect(server.addr).await;
    client.send("[HELLO;name=thinking]").await;
    client.expect("[HI]").await;
    client.expect("[TELLMESKILLS]").await;

    tokio::time::sleep(Duration::from_millis(1500)).await;

    client.send("[SKILL;name=s;type=t]").await;
    client.send("[THATSALL]").await;
    client.expect("[THANKS]").await;
    server.wait_for_agent("thinking").await;
}

#[tokio::test]
async fn test_unexpected_frame_after_registration_gets_bye() {
    let server = start_server(10).await;
    let mut client = TestClient::connect(server.addr).await;
    client.register("confused", &[("s", "t")]).await;
    server.wait_for_agent("confused").await;

    client.send("[HELLO;name=confused]").await;
    client.expect("[BYE]").await;
    client.expect_closed().await;
    server.wait_for_departure("confused").await;
}
