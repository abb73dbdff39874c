use crate::support::{start_server, TestClient};
use std::time::Duration;

#[tokio::test]
async fn test_agent_registers_over_tcp() {
    let server = start_server(10).await;
    let mut client = TestClient::connect(server.addr).await;

    client
        .register("alpha", &[("translate", "nlp"), ("resize", "image")])
        .await;

    let agent = server.wait_for_agent("alpha").await;
    assert_eq!(agent.traits.get("os").map(String::as_str), Some("linux"));
    assert_eq!(agent.skills.len(), 2);
    assert_eq!(agent.skills[0].name, "translate");
    assert_eq!(agent.skills[0].kind, "nlp");
    assert_eq!(agent.skills[1].name, "resize");
    assert_eq!(server.directory.get_by_id(agent.id).unwrap(), agent);
}

#[tokio::test]
async fn test_concurrent_agents_get_distinct_ids() {
    let server = start_server(10).await;
    let mut first = TestClient::connect(server.addr).await;
    let mut second = TestClient::connect(server.addr).await;

    // Interleave the two handshakes
    first.send("[HELLO;name=one]").await;
    second.send("[HELLO;name=two]").await;
    first.expect("[HI]").await;
    second.expect("[HI]").await;
    first.expect("[TELLMESKILLS]").await;
    second.expect("[TELLMESKILLS]").await;
    second.send("[SKILL;name=b;type=t]").await;
    first.send("[SKILL;name=a;type=t]").await;
    second.send("[THATSALL]").await;
    first.send("[THATSALL]").await;
    first.expect("[THANKS]").await;
    second.expect("[THANKS]").await;

    let one = server.wait_for_agent("one").await;
    let two = server.wait_for_agent("two").await;
    assert_ne!(one.id, two.id);
    assert_eq!(one.skills[0].name, "a");
    assert_eq!(two.skills[0].name, "b");
    assert_eq!(server.directory.len(), 2);
}

#[tokio::test]
async fn test_frames_split_across_packets() {
    let server = start_server(10).await;
    let mut client = TestClient::connect(server.addr).await;

    client.send("[HEL").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    client.send("LO;name=slow;").await;
    tokio::time::sleep(Duration::from_millis(20)).await;
    client.send("os=linux]").await;
    client.expect("[HI]").await;
    client.expect("[TELLMESKILLS]").await;

    client.send("[SKILL;name=s;type=t][THATSALL]").await;
    client.expect("[THANKS]").await;

    let agent = server.wait_for_agent("slow").await;
    assert_eq!(agent.skills.len(), 1);
}

#[tokio::test]
async fn test_client_bye_unregisters_without_reply() {
    let server = start_server(10).await;
    let mut client = TestClient::connect(server.addr).await;
    client.register("leaving", &[("s", "t")]).await;
    server.wait_for_agent("leaving").await;

    client.send("[BYE]").await;
    client.expect_closed().await;
    server.wait_for_departure("leaving").await;
}

#[tokio::test]
async fn test_malformed_hello_gets_bye() {
    let server = start_server(10).await;
    let mut client = TestClient::connect(server.addr).await;

    client.send("[HELLO;os=linux]").await;
    client.expect("[BYE]").await;
    client.expect_closed().await;
    assert!(server.directory.is_empty());
}

#[tokio::test]
async fn test_skill_before_hello_gets_bye() {
    let server = start_server(10).await;
    let mut client = TestClient::connect(server.addr).await;

    client.send("[SKILL;name=s;type=t]").await;
    client.expect("[BYE]").await;
    client.expect_closed().await;
}

#[tokio::test]
async fn test_disconnect_mid_handshake_registers_nothing() {
    let server = start_server(10).await;
    let mut client = TestClient::connect(server.addr).await;

    client.send("[HELLO;name=ghost]").await;
    client.expect("[HI]").await;
    client.expect("[TELLMESKILLS]").await;
    client.send("[SKILL;name=s;type=t]").await;
    drop(client);

    // A later agent still registers; the dropped one never does
    let mut other = TestClient::connect(server.addr).await;
    other.register("witness", &[("s", "t")]).await;
    server.wait_for_agent("witness").await;
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(server
        .directory
        .list_all()
        .iter()
        .all(|agent| agent.name != "ghost"));
}
