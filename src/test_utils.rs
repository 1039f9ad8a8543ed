#[cfg(test)]
pub mod test_utils {
    use crate::router::create_router;
    use crate::schemas::AppState;
    use axum::Router;
    use compute::TenureBasis;
    use migration::{Migrator, MigratorTrait};
    use sea_orm::{Database, DatabaseConnection};
    use std::time::Duration;
    use tracing::Level;

    /// Create an in-memory SQLite database for testing
    pub async fn setup_test_db() -> DatabaseConnection {
        let db = Database::connect("sqlite::memory:")
            .await
            .expect("Failed to connect to in-memory database");

        Migrator::up(&db, None)
            .await
            .expect("Failed to run migrations");

        db
    }

    /// Create AppState for testing
    pub async fn setup_test_app_state() -> AppState {
        AppState {
            db: setup_test_db().await,
            tenure_basis: TenureBasis::default(),
            request_timeout: Duration::from_secs(30),
            expose_error_details: false,
        }
    }

    /// Test log level from RUST_LOG (default WARN).
    fn test_log_level() -> Level {
        std::env::var("RUST_LOG")
            .ok()
            .and_then(|level| level.parse().ok())
            .unwrap_or(Level::WARN)
    }

    /// Installs test tracing to STDERR once per test binary.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(test_log_level())
            .with_writer(std::io::stderr)
            .try_init();
    }

    /// Create axum app for testing
    pub async fn setup_test_app() -> Router {
        init_test_tracing();

        let state = setup_test_app_state().await;
        create_router(state)
    }

    #[test]
    fn test_tracing_stays_installed() {
        init_test_tracing();
        init_test_tracing();
        assert!(tracing::dispatcher::has_been_set());
    }
}
