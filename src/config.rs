use std::time::Duration;

use anyhow::Result;
use compute::TenureBasis;
use sea_orm::Database;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error;
use crate::schemas::AppState;

/// Application configuration.
///
/// Built-in defaults, then an optional `rhapi.toml` (or any format the
/// `config` crate recognizes under the name `rhapi`), then environment
/// variables prefixed with `RHAPI__`, e.g. `RHAPI__DATABASE__URL`.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub reports: ReportsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// IP:PORT to listen on
    pub bind_address: String,
    pub request_timeout_secs: u64,
    /// Include internal error details in 500 responses (development only)
    pub expose_error_details: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReportsConfig {
    /// `approximate365` or `calendar`
    pub tenure_basis: TenureBasis,
}

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:3000";
const DEFAULT_DATABASE_URL: &str = "sqlite://rhapi.db?mode=rwc";
const DEFAULT_REQUEST_TIMEOUT_SECS: i64 = 30;

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let config = Self::defaults()?
            .add_source(config::File::with_name("rhapi").required(false))
            .add_source(
                config::Environment::with_prefix("RHAPI")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }

    fn defaults() -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("server.bind_address", DEFAULT_BIND_ADDRESS)?
            .set_default("server.request_timeout_secs", DEFAULT_REQUEST_TIMEOUT_SECS)?
            .set_default("server.expose_error_details", false)?
            .set_default("database.url", DEFAULT_DATABASE_URL)?
            .set_default("reports.tenure_basis", "approximate365")
    }

    /// Configuration from defaults and explicit overrides only.
    #[cfg(test)]
    pub fn load_for_test(overrides: &[(&str, &str)]) -> Result<Self, config::ConfigError> {
        let mut builder = Self::defaults()?;
        for (key, value) in overrides {
            builder = builder.set_override(*key, *value)?;
        }
        builder.build()?.try_deserialize()
    }

    /// Applies command-line values on top of the loaded configuration.
    pub fn with_overrides(mut self, database_url: Option<String>, bind_address: Option<String>) -> Self {
        if let Some(url) = database_url {
            self.database.url = url;
        }
        if let Some(address) = bind_address {
            self.server.bind_address = address;
        }
        self
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.server.request_timeout_secs)
    }
}

/// Connects to the database and builds the shared application state.
pub async fn initialize_app_state(config: &AppConfig) -> Result<AppState> {
    info!("Connecting to database");
    debug!("Database URL: {}", config.database.url);
    let db = Database::connect(&config.database.url).await?;

    debug!(
        "Tenure basis: {:?}, error details exposed: {}",
        config.reports.tenure_basis, config.server.expose_error_details
    );

    Ok(AppState {
        db,
        tenure_basis: config.reports.tenure_basis,
        request_timeout: config.request_timeout(),
        expose_error_details: config.server.expose_error_details,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::load_for_test(&[]).unwrap();
        assert_eq!(config.server.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.server.request_timeout_secs, 30);
        assert!(!config.server.expose_error_details);
        assert_eq!(config.database.url, DEFAULT_DATABASE_URL);
        assert_eq!(config.reports.tenure_basis, TenureBasis::Approximate365);
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::load_for_test(&[
            ("reports.tenure_basis", "calendar"),
            ("server.expose_error_details", "true"),
            ("server.request_timeout_secs", "5"),
        ])
        .unwrap();
        assert_eq!(config.reports.tenure_basis, TenureBasis::Calendar);
        assert!(config.server.expose_error_details);
        assert_eq!(config.request_timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_unknown_tenure_basis_is_rejected() {
        assert!(AppConfig::load_for_test(&[("reports.tenure_basis", "weekly")]).is_err());
    }

    #[test]
    fn test_cli_values_win() {
        let config = AppConfig::load_for_test(&[])
            .unwrap()
            .with_overrides(Some("sqlite::memory:".to_string()), None);
        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.server.bind_address, DEFAULT_BIND_ADDRESS);
    }
}
