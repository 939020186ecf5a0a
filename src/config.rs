//! Runtime configuration, read from the process environment via `envy`.

use serde::Deserialize;

/// Settings the server needs at startup.
///
/// # Environment Variables
///
/// - `DATABASE_URL` (required): PostgreSQL connection string
/// - `SERVER_PORT` (optional): listen port, 3000 when unset
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub database_url: String,

    #[serde(default = "default_port")]
    pub server_port: u16,
}

fn default_port() -> u16 {
    3000
}

impl Config {
    /// Read settings from the environment, sourcing a `.env` file first
    /// when one is present.
    ///
    /// # Errors
    ///
    /// Fails when `DATABASE_URL` is absent or a variable does not parse
    /// into its field's type.
    pub fn from_env() -> Result<Self, envy::Error> {
        dotenvy::dotenv().ok();

        envy::from_env::<Config>()
    }
}
