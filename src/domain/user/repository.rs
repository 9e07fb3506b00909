use async_trait::async_trait;

use super::User;
use crate::domain::DomainResult;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: User) -> DomainResult<()>;

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<User>>;

    /// Match on username or email
    async fn find_by_login(&self, login: &str) -> DomainResult<Option<User>>;

    async fn exists(&self, username: &str, email: &str) -> DomainResult<bool>;

    async fn count(&self) -> DomainResult<u64>;

    async fn touch_last_login(&self, id: &str) -> DomainResult<()>;
}
