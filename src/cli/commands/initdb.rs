use anyhow::Result;
use migration::{Migrator, MigratorTrait};
use sea_orm::Database;
use tracing::{debug, error, info, trace};

use crate::config::AppConfig;

/// Brings the configured database up to the current schema.
///
/// Returns the number of migrations applied; `0` when the schema was
/// already current.
pub async fn init_database(config: &AppConfig) -> Result<usize> {
    trace!("Entering init_database function");
    let database_url = &config.database.url;
    debug!("Database URL: {}", database_url);

    let db = Database::connect(database_url).await.inspect_err(|e| {
        error!("Failed to connect to database '{}': {}", database_url, e);
    })?;

    let pending = Migrator::get_pending_migrations(&db).await?.len();
    if pending == 0 {
        info!("RH schema already up to date");
        return Ok(0);
    }

    info!("Applying {} pending migration(s)", pending);
    Migrator::up(&db, None)
        .await
        .inspect_err(|e| error!("Failed to run database migrations: {}", e))?;

    info!("Tables servidores, enderecos, ferias and users are ready");
    Ok(pending)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_init_database_applies_schema() {
        let config = AppConfig::load_for_test(&[])
            .unwrap()
            .with_overrides(Some("sqlite::memory:".to_string()), None);

        let applied = init_database(&config).await.unwrap();

        assert_eq!(applied, Migrator::migrations().len());
    }

    #[tokio::test]
    async fn test_init_database_reports_bad_url() {
        let config = AppConfig::load_for_test(&[])
            .unwrap()
            .with_overrides(Some("nosuchdriver://nowhere".to_string()), None);

        assert!(init_database(&config).await.is_err());
    }
}
