use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use super::{Blog, FieldError, SchemaCheck};

pub const USERNAME_MIN_LENGTH: usize = 3;
pub const PASSWORD_MIN_LENGTH: usize = 3;

/// Account as stored in the `users` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(rename = "passwordHash")]
    pub password_hash: String,

    /// Blogs this user created. Kept in sync on create/delete only.
    #[serde(default)]
    pub blogs: Vec<ObjectId>,
}

/// Body of `POST /api/users`.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub name: Option<String>,
    pub password: Option<String>,
}

impl CreateUserRequest {
    /// Password rules live outside the schema: the plaintext is never stored.
    pub fn password_policy(&self) -> Vec<FieldError> {
        match self.password.as_deref() {
            None | Some("") => vec![FieldError::new("password", "password is required")],
            Some(p) if p.chars().count() < PASSWORD_MIN_LENGTH => vec![FieldError::new(
                "password",
                format!(
                    "password must be at least {} characters long",
                    PASSWORD_MIN_LENGTH
                ),
            )],
            Some(_) => Vec::new(),
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        SchemaCheck::new("User")
            .required("username", self.username.as_deref())
            .min_length("username", self.username.as_deref(), USERNAME_MIN_LENGTH)
            .finish()
    }
}

/// A user's blog as embedded in a user response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum BlogRef {
    Id(String),
    Blog(BlogSummary),
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BlogSummary {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
}

impl From<&Blog> for BlogSummary {
    fn from(blog: &Blog) -> Self {
        BlogSummary {
            id: blog.id.to_hex(),
            title: blog.title.clone(),
            author: blog.author.clone(),
            url: blog.url.clone(),
            likes: blog.likes,
        }
    }
}

/// User as returned to clients. Never carries the password hash.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub blogs: Vec<BlogRef>,
}

impl UserResponse {
    pub fn unexpanded(user: User) -> Self {
        UserResponse {
            id: user.id.to_hex(),
            username: user.username,
            name: user.name,
            blogs: user
                .blogs
                .iter()
                .map(|id| BlogRef::Id(id.to_hex()))
                .collect(),
        }
    }

    /// `blogs` must hold the documents referenced by `user.blogs`; references
    /// that no longer resolve are dropped.
    pub fn expanded(user: User, blogs: &[Blog]) -> Self {
        let expanded = user
            .blogs
            .iter()
            .filter_map(|id| blogs.iter().find(|b| &b.id == id))
            .map(|b| BlogRef::Blog(BlogSummary::from(b)))
            .collect();

        UserResponse {
            id: user.id.to_hex(),
            username: user.username,
            name: user.name,
            blogs: expanded,
        }
    }
}
