use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use tokio::net::TcpListener;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use cc_server::AppState;
use cc_server::auth::AuthSettings;
use cc_server::database::SqliteAccountStore;
use cc_server::handlers::http::build_api_router;
use cc_server::notifier::LogNotifier;
use cc_shared::config::load_config;

const MAX_DB_CONNECTIONS: u32 = 5;

#[derive(Debug, Parser)]
#[command(name = "cc-server", about = "CC account and authorization API")]
struct Args {
    /// Path to the TOML configuration file.
    #[arg(long, default_value = "cc.toml")]
    config: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = load_config(&args.config)
        .with_context(|| format!("Failed to load config from {}", args.config.display()))?;
    let settings = AuthSettings::from_config(&config.auth).context("Invalid auth settings")?;

    let store = SqliteAccountStore::connect(&config.database.resolved_url(), MAX_DB_CONNECTIONS)
        .await
        .context("Failed to open account store")?;

    let state = AppState::new(settings, Arc::new(store), Arc::new(LogNotifier));
    let router = Arc::new(build_api_router());

    let addr = config.server.addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                error!("Failed to accept connection: {}", e);
                continue;
            }
        };
        let io = TokioIo::new(stream);
        let router = router.clone();
        let state = state.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| {
                let router = router.clone();
                let state = state.clone();
                async move { Ok::<_, Infallible>(router.handle(req, state).await) }
            });

            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await
            {
                error!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}
