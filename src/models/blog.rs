use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Deserializer, Serialize};

use super::{SchemaCheck, User};

/// Keeps an explicit `null` apart from an absent key: absent is `None`,
/// `null` is `Some(None)`.
fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Blog post as stored in the `blogs` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Blog {
    #[serde(rename = "_id")]
    pub id: ObjectId,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    pub url: String,

    #[serde(default)]
    pub likes: i64,

    /// Owning user. Absent for blogs created before ownership existed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<ObjectId>,
}

/// Body of `POST /api/blogs`. Every field is optional at the parsing
/// level so that missing required fields surface as schema errors.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct CreateBlogRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
}

impl CreateBlogRequest {
    pub fn validate(&self) -> Result<(), String> {
        SchemaCheck::new("Blog")
            .required("title", self.title.as_deref())
            .required("url", self.url.as_deref())
            .finish()
    }

    /// Builds the document for `owner`. Call `validate` first.
    pub fn into_blog(self, owner: ObjectId) -> Blog {
        Blog {
            id: ObjectId::new(),
            title: self.title.unwrap_or_default(),
            author: self.author,
            url: self.url.unwrap_or_default(),
            likes: self.likes.unwrap_or(0),
            user: Some(owner),
        }
    }
}

/// Body of `PUT /api/blogs/{id}`. A client usually sends back the document
/// it received, so an `id` field is accepted and ignored.
#[derive(Debug, Default, Deserialize, utoipa::ToSchema)]
pub struct UpdateBlogRequest {
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub title: Option<Option<String>>,
    pub author: Option<String>,
    #[serde(default, deserialize_with = "present")]
    #[schema(value_type = Option<String>)]
    pub url: Option<Option<String>>,
    pub likes: Option<i64>,
    pub user: Option<String>,
}

impl UpdateBlogRequest {
    /// Validators only run on the paths being written. A required path
    /// written as `null` fails like an empty one.
    pub fn validate(&self) -> Result<(), String> {
        let mut check = SchemaCheck::new("Blog");
        if let Some(title) = &self.title {
            check.required("title", title.as_deref());
        }
        if let Some(url) = &self.url {
            check.required("url", url.as_deref());
        }
        check.finish()
    }
}

/// Fields to overwrite on an existing blog; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BlogUpdate {
    pub title: Option<String>,
    pub author: Option<String>,
    pub url: Option<String>,
    pub likes: Option<i64>,
    pub user: Option<ObjectId>,
}

impl BlogUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.url.is_none()
            && self.likes.is_none()
            && self.user.is_none()
    }

    pub fn apply(&self, blog: &mut Blog) {
        if let Some(title) = &self.title {
            blog.title = title.clone();
        }
        if let Some(author) = &self.author {
            blog.author = Some(author.clone());
        }
        if let Some(url) = &self.url {
            blog.url = url.clone();
        }
        if let Some(likes) = self.likes {
            blog.likes = likes;
        }
        if let Some(user) = self.user {
            blog.user = Some(user);
        }
    }
}

/// Owner as embedded in a blog response.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
#[serde(untagged)]
pub enum OwnerRef {
    Id(String),
    User(UserSummary),
}

#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&User> for UserSummary {
    fn from(user: &User) -> Self {
        UserSummary {
            id: user.id.to_hex(),
            username: user.username.clone(),
            name: user.name.clone(),
        }
    }
}

/// Blog as returned to clients: `_id` becomes `id`.
#[derive(Debug, Clone, Serialize, utoipa::ToSchema)]
pub struct BlogResponse {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    pub url: String,
    pub likes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerRef>,
}

impl BlogResponse {
    /// Owner expanded to `{id, username, name}` when it still exists.
    pub fn expanded(blog: Blog, owner: Option<&User>) -> Self {
        let user = owner.map(|u| OwnerRef::User(UserSummary::from(u)));
        Self::with_owner(blog, user)
    }

    /// Owner left as its id string.
    pub fn unexpanded(blog: Blog) -> Self {
        let user = blog.user.map(|id| OwnerRef::Id(id.to_hex()));
        Self::with_owner(blog, user)
    }

    fn with_owner(blog: Blog, user: Option<OwnerRef>) -> Self {
        BlogResponse {
            id: blog.id.to_hex(),
            title: blog.title,
            author: blog.author,
            url: blog.url,
            likes: blog.likes,
            user,
        }
    }
}
