use async_trait::async_trait;
use sqlx::{PgPool, Row};

use crate::sync::models::{Watermark, SINCE_KEY};
use crate::sync::repositories::WatermarkRepository;
use vitrine_common::error::{VitrineError, VitrineResult};

#[derive(Clone)]
pub struct PgWatermarkRepository {
    pool: PgPool,
}

impl PgWatermarkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl WatermarkRepository for PgWatermarkRepository {
    async fn get_or_seed(&self, default_val: &str) -> VitrineResult<Watermark> {
        sqlx::query("insert into pairs (key, val) values ($1, $2) on conflict (key) do nothing")
            .bind(SINCE_KEY)
            .bind(default_val)
            .execute(&self.pool)
            .await
            .map_err(|e| VitrineError::Database(e.to_string()))?;

        let row = sqlx::query("select key, val, updated_at from pairs where key = $1")
            .bind(SINCE_KEY)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| VitrineError::Database(e.to_string()))?;

        Ok(Watermark {
            key: row.get("key"),
            val: row.get("val"),
            updated_at: row.get("updated_at"),
        })
    }
}
