//! Roster Server Binary
//!
//! Loads configuration, installs logging and serves agents until SIGINT,
//! SIGTERM, SIGHUP or SIGQUIT.

use anyhow::Context;
use clap::Parser;
use roster::config::ConfigLoader;
use roster::directory::Directory;
use roster::logging::init_logging;
use roster::server::Listener;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Upper bound on waiting for session tasks to say goodbye after shutdown
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

#[derive(Parser, Debug)]
#[command(name = "roster", version, about = "Agent directory server")]
struct Cli {
    /// Configuration file (default: $XDG_CONFIG_HOME/roster/config.toml)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Address to accept agent connections on
    #[arg(long, value_name = "ADDR")]
    listen: Option<String>,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config =
        ConfigLoader::load(cli.config.as_deref()).context("Failed to load configuration")?;
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen;
    }
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }

    init_logging(&config.logging).context("Failed to initialise logging")?;

    let directory = Arc::new(Directory::new());
    let shutdown = CancellationToken::new();

    let listener = Listener::bind(&config.server, directory.clone(), shutdown.clone())
        .await
        .context("Failed to start agent listener")?;

    let sessions = listener.sessions();
    tokio::spawn(cancel_on_signal(shutdown.clone()));
    listener.run().await;

    info!(agents = directory.len(), sessions = sessions.len(), "Shutting down");
    if let Ok(snapshot) = serde_json::to_string(&directory.list_all()) {
        debug!(agents = %snapshot, "Directory at shutdown");
    }

    if tokio::time::timeout(SHUTDOWN_GRACE, sessions.wait()).await.is_err() {
        warn!(sessions = sessions.len(), "Sessions still running at exit");
    }

    Ok(())
}

#[cfg(unix)]
async fn cancel_on_signal(shutdown: CancellationToken) {
    use tokio::signal::unix::{signal, SignalKind};

    let streams = (
        signal(SignalKind::terminate()),
        signal(SignalKind::hangup()),
        signal(SignalKind::quit()),
    );
    let (mut terminate, mut hangup, mut quit) = match streams {
        (Ok(terminate), Ok(hangup), Ok(quit)) => (terminate, hangup, quit),
        (Err(e), _, _) | (_, Err(e), _) | (_, _, Err(e)) => {
            warn!("Cannot listen for termination signals: {}", e);
            if tokio::signal::ctrl_c().await.is_ok() {
                shutdown.cancel();
            }
            return;
        }
    };

    tokio::select! {
        _ = tokio::signal::ctrl_c() => info!("Received SIGINT"),
        _ = terminate.recv() => info!("Received SIGTERM"),
        _ = hangup.recv() => info!("Received SIGHUP"),
        _ = quit.recv() => info!("Received SIGQUIT"),
    }
    shutdown.cancel();
}

#[cfg(not(unix))]
async fn cancel_on_signal(shutdown: CancellationToken) {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            info!("Received Ctrl-C");
            shutdown.cancel();
        }
        Err(e) => warn!("Cannot listen for Ctrl-C: {}", e),
    }
}
