use std::time::Duration;

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::options::{ClientOptions, IndexOptions, ReturnDocument};
use mongodb::{Client, Collection, Database, IndexModel};

use super::{BlogStore, StoreError};
use crate::models::{Blog, BlogUpdate, User};

const BLOGS: &str = "blogs";
const USERS: &str = "users";
const DEFAULT_DATABASE: &str = "bloglist";
const DUPLICATE_KEY: i32 = 11000;

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    /// Connects, verifies the connection and ensures indexes. The database
    /// name comes from `database`, then the URI path, then the default.
    pub async fn new(uri: &str, database: Option<&str>) -> Result<Self, StoreError> {
        let mut client_options = ClientOptions::parse(uri).await?;

        client_options.app_name = Some("bloglist-service".to_string());
        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));
        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let db_name = database
            .map(str::to_string)
            .or_else(|| client_options.default_database.clone())
            .unwrap_or_else(|| DEFAULT_DATABASE.to_string());

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);

        db.run_command(doc! { "ping": 1 }).await?;
        log::info!("✅ Connected to MongoDB database: {}", db_name);

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    async fn ensure_indexes(&self) -> Result<(), StoreError> {
        log::info!("🔧 Creating database indexes...");

        let username_index = IndexModel::builder()
            .keys(doc! { "username": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        self.users().create_index(username_index).await?;
        log::info!("   ✅ Index ready: users(username) unique");

        Ok(())
    }

    fn blogs(&self) -> Collection<Blog> {
        self.db.collection(BLOGS)
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }
}

fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error)) if write_error.code == DUPLICATE_KEY
    )
}

fn set_document(update: &BlogUpdate) -> Document {
    let mut set = Document::new();

    if let Some(title) = &update.title {
        set.insert("title", title.as_str());
    }
    if let Some(author) = &update.author {
        set.insert("author", author.as_str());
    }
    if let Some(url) = &update.url {
        set.insert("url", url.as_str());
    }
    if let Some(likes) = update.likes {
        set.insert("likes", likes);
    }
    if let Some(user) = update.user {
        set.insert("user", user);
    }

    set
}

#[async_trait]
impl BlogStore for MongoDB {
    async fn list_blogs(&self) -> Result<Vec<Blog>, StoreError> {
        let cursor = self.blogs().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_blog(&self, id: ObjectId) -> Result<Option<Blog>, StoreError> {
        Ok(self.blogs().find_one(doc! { "_id": id }).await?)
    }

    async fn find_blogs(&self, ids: &[ObjectId]) -> Result<Vec<Blog>, StoreError> {
        let cursor = self
            .blogs()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn insert_blog(&self, blog: &Blog) -> Result<(), StoreError> {
        self.blogs().insert_one(blog).await?;
        Ok(())
    }

    async fn update_blog(
        &self,
        id: ObjectId,
        update: &BlogUpdate,
    ) -> Result<Option<Blog>, StoreError> {
        if update.is_empty() {
            return self.find_blog(id).await;
        }

        let updated = self
            .blogs()
            .find_one_and_update(doc! { "_id": id }, doc! { "$set": set_document(update) })
            .return_document(ReturnDocument::After)
            .await?;

        Ok(updated)
    }

    async fn delete_blog(&self, id: ObjectId) -> Result<bool, StoreError> {
        let result = self.blogs().delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let cursor = self.users().find(doc! {}).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_user(&self, id: ObjectId) -> Result<Option<User>, StoreError> {
        Ok(self.users().find_one(doc! { "_id": id }).await?)
    }

    async fn find_users(&self, ids: &[ObjectId]) -> Result<Vec<User>, StoreError> {
        let cursor = self
            .users()
            .find(doc! { "_id": { "$in": ids.to_vec() } })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn find_user_by_username(&self, username: &str) -> Result<Option<User>, StoreError> {
        Ok(self
            .users()
            .find_one(doc! { "username": username })
            .await?)
    }

    async fn insert_user(&self, user: &User) -> Result<(), StoreError> {
        match self.users().insert_one(user).await {
            Ok(_) => Ok(()),
            Err(e) if is_duplicate_key(&e) => Err(StoreError::DuplicateKey {
                model: "User",
                field: "username",
                value: user.username.clone(),
            }),
            Err(e) => Err(e.into()),
        }
    }

    async fn push_user_blog(&self, user: ObjectId, blog: ObjectId) -> Result<(), StoreError> {
        self.users()
            .update_one(doc! { "_id": user }, doc! { "$push": { "blogs": blog } })
            .await?;
        Ok(())
    }

    async fn pull_user_blog(&self, user: ObjectId, blog: ObjectId) -> Result<(), StoreError> {
        self.users()
            .update_one(doc! { "_id": user }, doc! { "$pull": { "blogs": blog } })
            .await?;
        Ok(())
    }

    async fn clear(&self) -> Result<(), StoreError> {
        self.blogs().delete_many(doc! {}).await?;
        self.users().delete_many(doc! {}).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }

    async fn close(&self) {
        log::info!("🔌 Closing MongoDB connection");
        self.client.clone().shutdown().await;
    }
}
