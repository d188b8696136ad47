use std::future::IntoFuture;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use formrelay_core::ProcessEnv;
use formrelay_server::api::{self, AppState};
use formrelay_server::config::FormRelayConfig;
use tokio::sync::Notify;
use tracing::{error, info, warn};

/// Relay registration form submissions to a Telegram chat.
#[derive(Parser, Debug)]
#[command(name = "formrelay-server", about = "Form submission to Telegram relay")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long, default_value = "formrelay.toml")]
    config: String,

    /// Override the bind host.
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config_path = Path::new(&cli.config);
    let config = FormRelayConfig::load(config_path)?;

    // Must run before any tracing call.
    let telemetry_guard = formrelay_server::telemetry::init(&config.telemetry);

    if !config_path.exists() {
        info!(path = %cli.config, "config file not found, using defaults");
    }

    // Per-call deadlines are set by the Telegram client.
    let http = reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(config.telegram.timeout_seconds))
        .build()?;

    let state = AppState::new(
        Arc::new(ProcessEnv),
        http,
        &config.telegram,
        config.limits.clone(),
    );
    let app = api::router(state, &config);

    let host = cli.host.unwrap_or_else(|| config.server.host.clone());
    let port = cli.port.unwrap_or(config.server.port);
    let addr = format!("{host}:{port}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        address = %addr,
        submit_path = %config.server.submit_path,
        "formrelay-server listening"
    );

    // Once a signal arrives, in-flight submissions get a bounded drain window.
    let signalled = Arc::new(Notify::new());
    let server = axum::serve(listener, app).with_graceful_shutdown({
        let signalled = Arc::clone(&signalled);
        async move {
            shutdown_signal().await;
            signalled.notify_one();
        }
    });
    let drain_timeout = Duration::from_secs(config.server.shutdown_timeout_seconds);
    let drain_deadline = async {
        signalled.notified().await;
        tokio::time::sleep(drain_timeout).await;
    };

    let served = tokio::select! {
        result = server.into_future() => result,
        () = drain_deadline => {
            warn!(
                timeout_secs = config.server.shutdown_timeout_seconds,
                "shutdown timeout exceeded, abandoning in-flight submissions"
            );
            Ok(())
        }
    };

    if let Err(e) = &served {
        error!(error = %e, "server stopped with an error");
    }
    telemetry_guard.finish(served)?;

    info!("formrelay-server shut down");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received SIGINT"),
        () = terminate => info!("received SIGTERM"),
    }
}
