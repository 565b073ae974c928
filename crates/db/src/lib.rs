pub mod company;
pub mod sync;
pub mod user;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use vitrine_common::error::{VitrineError, VitrineResult};

/// Create a Postgres connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> VitrineResult<PgPool> {
    tracing::info!("connecting to database");
    PgPoolOptions::new()
        .max_connections(10)
        .connect(database_url)
        .await
        .map_err(|e| VitrineError::Database(e.to_string()))
}

// Postgres-backed tests share one database; they serialize on this lock
// because their fixtures truncate the shared tables.
#[cfg(test)]
pub(crate) mod test_support {
    pub static DB_LOCK: tokio::sync::Mutex<()> = tokio::sync::Mutex::const_new(());
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_pool_fails_with_invalid_url() {
        let result = create_pool("postgres://invalid:5432/nonexistent").await;
        assert!(result.is_err());
    }
}
