//! Persistence for blogs and users.
//!
//! Handlers never touch a driver directly: they receive a `web::Data<dyn BlogStore>`
//! built once in `main` (or per test) and closed when the server stops.

mod memory;
mod mongo;

pub use memory::MemoryStore;
pub use mongo::MongoDB;

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{Blog, BlogUpdate, User};

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("duplicate key on {model}.{field}: {value}")]
    DuplicateKey {
        model: &'static str,
        field: &'static str,
        value: String,
    },

    #[error("{0}")]
    Database(String),
}

impl From<mongodb::error::Error> for StoreError {
    fn from(err: mongodb::error::Error) -> Self {
        StoreError::Database(err.to_string())
    }
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    /// All blogs in store iteration order.
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError>;

    async fn find_blog(&self, id: ObjectId) -> Result<Option<Blog>, StoreError>;

    async fn find_blogs(&self, ids: &[ObjectId]) -> Result<Vec<Blog>, StoreError>;

    async fn insert_blog(&self, blog: &Blog) -> Result<(), StoreError>;

    /// Returns the document after the update, or `None` if `id` is unknown.
    async fn update_blog(
        &self,
        id: ObjectId,
        update: &BlogUpdate,
    ) -> Result<Option<Blog>, StoreError>;

    /// Returns whether a document was removed.
    async fn delete_blog(&self, id: ObjectId) -> Result<bool, StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError>;

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, StoreError>;

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    /// Fails with `StoreError::DuplicateKey` when the username is taken.
    async fn insert_user(&self, user: &User) -> Result<(), StoreError>;

    async fn push_user_blog(&self, user: ObjectId, blog: ObjectId) -> Result<(), StoreError>;

    async fn pull_user_blog(&self, user: ObjectId, blog: ObjectId) -> Result<(), StoreError>;

    /// Removes every blog and user.
    async fn clear(&self) -> Result<(), StoreError>;

    async fn ping(&self) -> Result<(), StoreError>;

    async fn close(&self);
}
