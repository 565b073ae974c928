use async_trait::async_trait;
use sqlx::{postgres::PgRow, PgPool, Row};

use crate::user::models::User;
use crate::user::repositories::UserRepository;
use vitrine_common::error::{VitrineError, VitrineResult};

#[derive(Clone)]
pub struct PgUserRepository {
    pool: PgPool,
}

impl PgUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    fn map_row(row: PgRow) -> User {
        User {
            id: row.get("id"),
            login: row.get("login"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn find_by_login(&self, login: &str) -> VitrineResult<Option<User>> {
        let row = sqlx::query(
            "select id, login, email, password_hash, created_at from users where login = $1",
        )
        .bind(login)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| VitrineError::Database(e.to_string()))?;

        Ok(row.map(Self::map_row))
    }

    async fn create(&self, user: User) -> VitrineResult<User> {
        let row = sqlx::query(
            "insert into users (id, login, email, password_hash, created_at)
             values ($1, $2, $3, $4, $5)
             returning id, login, email, password_hash, created_at",
        )
        .bind(user.id)
        .bind(&user.login)
        .bind(&user.email)
        .bind(&user.password_hash)
        .bind(user.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            let msg = e.to_string();
            if msg.contains("duplicate key") || msg.contains("unique constraint") {
                VitrineError::Validation(format!("login already taken: {}", user.login))
            } else {
                VitrineError::Database(msg)
            }
        })?;

        Ok(Self::map_row(row))
    }
}
