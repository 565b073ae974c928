use async_trait::async_trait;

use crate::user::models::User;
use vitrine_common::error::VitrineResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_login(&self, login: &str) -> VitrineResult<Option<User>>;
    async fn create(&self, user: User) -> VitrineResult<User>;
}
