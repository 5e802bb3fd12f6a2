//! Wisp dashboard server binary.
//!
//! Serves the Discord login flow and the guild settings API on one listener.
//! Configuration comes from the environment (and `.env`); the flags below
//! override the listener and redirect settings.

use clap::Parser;
use tracing::{error, info, warn};
use wisp_api::config::ApiConfig;

const DEFAULT_LOG_FILTER: &str = "info,wisp_api=debug,wisp_core=debug";

/// CLI arguments for the dashboard server.
#[derive(Parser, Debug)]
#[command(name = "wisp_server", about = "Wisp moderation bot dashboard server")]
struct Args {
    /// Address to listen on. Overrides `BIND_ADDR`.
    #[arg(long)]
    bind_addr: Option<String>,

    /// Listen on 127.0.0.1 at this port (0 = ephemeral). Ignored when
    /// `--bind-addr` is given.
    #[arg(long)]
    port: Option<u16>,

    /// OAuth2 callback address registered with Discord. Overrides
    /// `DISCORD_REDIRECT_URI`.
    #[arg(long)]
    redirect_uri: Option<String>,

    /// Where a completed login redirects to. Overrides `LANDING_PATH`.
    #[arg(long)]
    landing_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    // Logs go to stderr.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let args = Args::parse();

    let mut config = match ApiConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            return Err(e.into());
        }
    };
    apply_overrides(&mut config, args);
    if let Err(e) = config.validate() {
        error!(error = %e, "invalid configuration");
        return Err(e.into());
    }

    info!(config = ?config.dashboard, "starting wisp_server");
    if !config.dashboard.registration.redirect_uri.starts_with("https://") {
        warn!(
            redirect_uri = %config.dashboard.registration.redirect_uri,
            "redirect URI is not HTTPS; Secure session cookies only survive on localhost"
        );
    }

    let state = wisp_api::AppState::from_config(config.clone())?;
    let app = wisp_api::router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    let local_addr = listener.local_addr()?;
    info!(addr = %local_addr, "dashboard listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("dashboard stopped");
    Ok(())
}

fn apply_overrides(config: &mut ApiConfig, args: Args) {
    if let Some(addr) = args.bind_addr {
        config.bind_addr = addr;
    } else if let Some(port) = args.port {
        config.bind_addr = format!("127.0.0.1:{port}");
    }
    if let Some(uri) = args.redirect_uri {
        config.dashboard.registration.redirect_uri = uri;
    }
    if let Some(path) = args.landing_path {
        config.landing_path = path;
    }
}

async fn shutdown_signal() {
    wait_for_shutdown(tokio::signal::ctrl_c()).await
}

/// Resolves once `signal` fires. If the signal handler cannot be installed,
/// never resolves and the server runs until killed.
async fn wait_for_shutdown<F>(signal: F)
where
    F: Future<Output = std::io::Result<()>>,
{
    match signal.await {
        Ok(()) => info!("shutdown signal received"),
        Err(e) => {
            error!(error = %e, "failed to listen for shutdown signal; running until killed");
            std::future::pending::<()>().await;
        }
    }
}
