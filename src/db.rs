//! Postgres pool construction and schema migrations.

use sqlx::{Pool, Postgres};

/// Shorthand for the Postgres pool handed to the stores.
pub type DbPool = Pool<Postgres>;

/// Open a pool against the given connection string. Connections are
/// established lazily and capped at five.
///
/// # Errors
///
/// Fails when the connection string does not parse or the server is
/// unreachable.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await
}

/// Apply pending schema migrations. sqlx records applied files in its
/// `_sqlx_migrations` table, so reruns are no-ops.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    // Embedded at compile time from ./migrations
    sqlx::migrate!("./migrations").run(pool).await
}
