use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gemrelay::{cli, config, router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "gemrelay=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    match args.command {
        Some(cli::Commands::Serve { port }) => run_server(cfg, port).await,
        Some(cli::Commands::Check) => check_config(&cfg),
        None => run_server(cfg, None).await,
    }
}

async fn run_server(cfg: config::Config, port_override: Option<u16>) -> anyhow::Result<()> {
    let port = port_override.unwrap_or(cfg.port);
    let state = Arc::new(AppState::new(cfg));
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("gemrelay listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Report whether the relay is usable. Prints set/not-set only — never the
/// credential itself.
fn check_config(cfg: &config::Config) -> anyhow::Result<()> {
    println!("upstream:   {}", cfg.upstream_url());
    println!("port:       {}", cfg.port);
    match &cfg.api_key {
        Some(_) => {
            println!("credential: set");
            Ok(())
        }
        None => {
            println!("credential: NOT SET");
            anyhow::bail!("GEMINI_API_KEY is not configured")
        }
    }
}
