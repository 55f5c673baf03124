#![allow(dead_code)]

use std::sync::Arc;

use bloglist_service::app::AppState;
use bloglist_service::database::{BlogStore, MemoryStore};
use bloglist_service::models::{Blog, User};
use bloglist_service::services::AuthSettings;
use mongodb::bson::oid::ObjectId;

pub const PASSWORD: &str = "sekret";
const BCRYPT_TEST_COST: u32 = 4;

/// (title, author, url, likes)
pub const INITIAL_BLOGS: &[(&str, &str, &str, i64)] = &[
    ("React patterns", "Michael Chan", "https://reactpatterns.com/", 7),
    (
        "Go To Statement Considered Harmful",
        "Edsger W. Dijkstra",
        "http://www.u.arizona.edu/~rubinson/copyright_violations/Go_To_Considered_Harmful.html",
        5,
    ),
    (
        "Canonical string reduction",
        "Edsger W. Dijkstra",
        "http://www.cs.utexas.edu/~EWD/transcriptions/EWD08xx/EWD808.html",
        12,
    ),
    (
        "First class tests",
        "Robert C. Martin",
        "http://blog.cleancoder.com/uncle-bob/2017/05/05/TestDefinitions.htmll",
        10,
    ),
];

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub auth: AuthSettings,
    /// Owns every seeded blog.
    pub root: User,
    /// Owns nothing.
    pub other: User,
}

impl TestContext {
    pub fn state(&self) -> AppState {
        let store: Arc<dyn BlogStore> = self.store.clone();
        AppState::new(store, self.auth.clone())
    }

    pub fn token_for(&self, user: &User) -> String {
        self.auth.generate_token(user).unwrap()
    }

    pub fn bearer(&self, user: &User) -> String {
        format!("Bearer {}", self.token_for(user))
    }

    pub async fn blogs_in_db(&self) -> Vec<Blog> {
        self.store.list_blogs().await.unwrap()
    }

    pub async fn store_user(&self, id: ObjectId) -> User {
        self.store.find_user(id).await.unwrap().unwrap()
    }

    pub async fn users_in_db(&self) -> Vec<User> {
        self.store.list_users().await.unwrap()
    }
}

fn user(username: &str, name: &str) -> User {
    User {
        id: ObjectId::new(),
        username: username.to_string(),
        name: Some(name.to_string()),
        password_hash: bcrypt::hash(PASSWORD, BCRYPT_TEST_COST).unwrap(),
        blogs: Vec::new(),
    }
}

/// Fresh store with two users and `INITIAL_BLOGS` owned by `root`.
pub async fn setup() -> TestContext {
    let store = Arc::new(MemoryStore::new());
    let auth = AuthSettings::new("integration-test-secret", 3600, BCRYPT_TEST_COST);

    let root = user("root", "Superuser");
    let other = user("mluukkai", "Matti Luukkainen");
    store.insert_user(&root).await.unwrap();
    store.insert_user(&other).await.unwrap();

    for (title, author, url, likes) in INITIAL_BLOGS {
        let blog = Blog {
            id: ObjectId::new(),
            title: title.to_string(),
            author: Some(author.to_string()),
            url: url.to_string(),
            likes: *likes,
            user: Some(root.id),
        };
        store.insert_blog(&blog).await.unwrap();
        store.push_user_blog(root.id, blog.id).await.unwrap();
    }

    let root = store.find_user(root.id).await.unwrap().unwrap();

    TestContext {
        store,
        auth,
        root,
        other,
    }
}
