use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use bistro::auth::token::TokenService;
use bistro::payments::provider::StripeClient;
use bistro::store::MemStore;
use bistro::{api, config, jobs, AppState};

#[derive(Parser)]
#[command(name = "bistro", about = "Restaurant ordering backend")]
struct Cli {
    /// Listen port; overrides the PORT environment variable.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "bistro=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = Cli::parse();
    let port = args.port.unwrap_or(cfg.port);

    tracing::info!("Initializing store...");
    let store = MemStore::new();

    tracing::info!("Initializing token service and payment provider...");
    let tokens = TokenService::new(&cfg.jwt_secret);
    let provider = StripeClient::new(&cfg.stripe_secret_key, &cfg.stripe_api_base);

    let state = Arc::new(AppState {
        store: store.clone(),
        tokens,
        provider,
        config: cfg,
    });

    jobs::reconcile::spawn(store);
    tracing::info!("Cart reconciler started (stale-line sweep every 5m)");

    let app = api::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Bistro server listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
