//! Card Ledger - Main Application Entry Point
//!
//! # Startup Flow
//!
//! 1. Load configuration from environment variables
//! 2. Create database connection pool
//! 3. Run database migrations
//! 4. Wire the Postgres stores into the services
//! 5. Build the HTTP router and start serving

use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use card_ledger::services::{CardService, TransactionService};
use card_ledger::store::postgres::{PgBalanceStore, PgCardStore, PgTransactionStore};
use card_ledger::{AppState, config, db, router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Reads RUST_LOG, defaults to "info"
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = config::Config::from_env()?;
    tracing::info!("Configuration loaded");

    let pool = db::create_pool(&config.database_url).await?;
    tracing::info!("Database pool created");

    db::run_migrations(&pool).await?;
    tracing::info!("Database migrations complete");

    let balances = Arc::new(PgBalanceStore::new(pool.clone()));
    let cards = Arc::new(PgCardStore::new(pool.clone()));
    let transactions = Arc::new(PgTransactionStore::new(pool));

    let state = AppState {
        cards: CardService::new(cards.clone(), balances.clone()),
        transactions: TransactionService::new(transactions, cards, balances),
    };

    let app = router(state).layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.server_port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
