//! Shared fixtures: a listener on an ephemeral port and a framed test client.

use roster::config::ServerSettings;
use roster::directory::{Agent, Directory};
use roster::server::Listener;
use roster::session::{Inbound, Session, SessionSettings};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

/// Upper bound for anything a test waits on
pub const WAIT: Duration = Duration::from_secs(5);

pub struct TestServer {
    pub addr: SocketAddr,
    pub directory: Arc<Directory>,
    pub shutdown: CancellationToken,
    pub sessions: TaskTracker,
    pub task: JoinHandle<()>,
}

pub async fn start_server(heartbeat_timeout_secs: u64) -> TestServer {
    let settings = ServerSettings {
        listen_addr: "127.0.0.1:0".to_string(),
        heartbeat_timeout_secs,
        ..ServerSettings::default()
    };
    let directory = Arc::new(Directory::new());
    let shutdown = CancellationToken::new();

    let listener = Listener::bind(&settings, directory.clone(), shutdown.clone())
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();
    let sessions = listener.sessions();
    let task = tokio::spawn(listener.run());

    TestServer {
        addr,
        directory,
        shutdown,
        sessions,
        task,
    }
}

impl TestServer {
    /// Poll the directory until an agent with this name shows up
    pub async fn wait_for_agent(&self, name: &str) -> Agent {
        let directory = self.directory.clone();
        tokio::time::timeout(WAIT, async move {
            loop {
                if let Some(agent) = directory.list_all().into_iter().find(|a| a.name == name) {
                    return agent;
                }
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("agent {name} never registered"))
    }

    /// Poll the directory until no agent with this name is left
    pub async fn wait_for_departure(&self, name: &str) {
        let directory = self.directory.clone();
        tokio::time::timeout(WAIT, async move {
            while directory.list_all().iter().any(|a| a.name == name) {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .unwrap_or_else(|_| panic!("agent {name} never left"));
    }
}

/// Agent side of a connection, framed the same way the server frames
pub struct TestClient {
    session: Session<TcpStream>,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Self {
        let stream = TcpStream::connect(addr).await.unwrap();
        let session = Session::new(
            u64::MAX,
            stream,
            &SessionSettings::default(),
            CancellationToken::new(),
        );
        Self { session }
    }

    pub async fn send(&mut self, frame: &str) {
        self.session.write_frame(frame).await.unwrap();
    }

    pub async fn recv(&mut self) -> Inbound {
        tokio::time::timeout(WAIT, self.session.read_frame())
            .await
            .expect("server should answer or close")
    }

    pub async fn expect(&mut self, frame: &str) {
        assert_eq!(self.recv().await, Inbound::Frame(frame.to_string()));
    }

    pub async fn expect_closed(&mut self) {
        assert_eq!(self.recv().await, Inbound::Closed);
    }

    /// HELLO through THANKS
    pub async fn register(&mut self, name: &str, skills: &[(&str, &str)]) {
        self.send(&format!("[HELLO;name={name};os=linux]")).await;
        self.expect("[HI]").await;
        self.expect("[TELLMESKILLS]").await;
        for (skill, kind) in skills {
            self.send(&format!("[SKILL;name={skill};type={kind}]")).await;
        }
        self.send("[THATSALL]").await;
        self.expect("[THANKS]").await;
    }
}
