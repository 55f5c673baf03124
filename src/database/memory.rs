//! In-process store with the same semantics as the MongoDB backend.
//!
//! Documents are kept in insertion order, which is also the iteration order
//! reported by `list_*`. Used by the integration tests and by
//! `STORE_BACKEND=memory`.

use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::{BlogStore, StoreError};
use crate::models::{Blog, BlogUpdate, User};

#[derive(Debug, Default)]
struct Inner {
    blogs: Vec<Blog>,
    users: Vec<User>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BlogStore for MemoryStore {
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        Ok(self.inner.read().await.blogs.clone())
    }

    async fn find_blog(&self, id: ObjectId) -> Result<Option<Blog>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.blogs.iter().find(|b| b.id == id).cloned())
    }

    async fn find_blogs(&self, ids: &[ObjectId]) -> Result<Vec<Blog>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .blogs
            .iter()
            .filter(|b| ids.contains(&b.id))
            .cloned()
            .collect())
    }

    async fn insert_blog(&self, blog: &Blog) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.blogs.iter().any(|b| b.id == blog.id) {
            return Err(StoreError::DuplicateKey {
                model: "Blog",
                field: "_id",
                value: blog.id.to_hex(),
            });
        }
        inner.blogs.push(blog.clone());
        Ok(())
    }

    async fn update_blog(
        &self,
        id: ObjectId,
        update: &BlogUpdate,
    ) -> Result<Option<Blog>, StoreError> {
        let mut inner = self.inner.write().await;
        Ok(inner.blogs.iter_mut().find(|b| b.id == id).map(|blog| {
            update.apply(blog);
            blog.clone()
        }))
    }

    async fn delete_blog(&self, id: ObjectId) -> Result<bool, StoreError> {
        let mut inner = self.inner.write().await;
        let before = inner.blogs.len();
        inner.blogs.retain(|b| b.id != id);
        Ok(inner.blogs.len() < before)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.inner.read().await.users.clone())
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.id == id).cloned())
    }

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner
            .users
            .iter()
            .filter(|u| ids.contains(&u.id))
            .cloned()
            .collect())
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        let inner = self.inner.read().await;
        Ok(inner.users.iter().find(|u| u.username == username).cloned())
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if inner.users.iter().any(|u| u.username == user.username) {
            return Err(StoreError::DuplicateKey {
                model: "User",
                field: "username",
                value: user.username.clone(),
            });
        }
        inner.users.push(user.clone());
        Ok(())
    }

    async fn push_user_blog(&self, user: ObjectId, blog: ObjectId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(u) = inner.users.iter_mut().find(|u| u.id == user) {
            u.blogs.push(blog);
        }
        Ok(())
    }

    async fn pull_user_blog(&self, user: ObjectId, blog: ObjectId) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        if let Some(u) = inner.users.iter_mut().find(|u| u.id == user) {
            u.blogs.retain(|b| *b != blog);
        }
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        let mut inner = self.inner.write().await;
        inner.blogs.clear();
        inner.users.clear();
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn close(&self) {}
}
