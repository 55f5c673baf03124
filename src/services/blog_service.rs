use mongodb::bson::oid::ObjectId;

use crate::database::BlogStore;
use crate::models::{BlogResponse, BlogUpdate, CreateBlogRequest, UpdateBlogRequest, User};
use crate::utils::AppError;

fn parse_id(id: &str) -> Result<ObjectId, AppError> {
    ObjectId::parse_str(id).map_err(|_| AppError::Cast)
}

/// Every blog with its owner expanded to `{id, username, name}`.
pub async fn list_blogs(store: &dyn BlogStore) -> Result<Vec<BlogResponse>, AppError> {
    let blogs = store.list_blogs().await?;

    let mut owner_ids: Vec<ObjectId> = blogs.iter().filter_map(|b| b.user).collect();
    owner_ids.sort();
    owner_ids.dedup();

    let owners = if owner_ids.is_empty() {
        Vec::new()
    } else {
        store.find_users(&owner_ids).await?
    };

    Ok(blogs
        .into_iter()
        .map(|blog| {
            let owner = blog
                .user
                .and_then(|id| owners.iter().find(|u| u.id == id));
            BlogResponse::expanded(blog, owner)
        })
        .collect())
}

/// Stores the blog and links it to its owner. If linking fails the blog is
/// removed again so no unowned-but-referenced document is left behind.
pub async fn create_blog(
    store: &dyn BlogStore,
    owner: &User,
    request: CreateBlogRequest,
) -> Result<BlogResponse, AppError> {
    request.validate().map_err(AppError::Validation)?;

    let blog = request.into_blog(owner.id);
    store.insert_blog(&blog).await?;

    if let Err(e) = store.push_user_blog(owner.id, blog.id).await {
        log::error!(
            "❌ Failed to link blog {} to user {}: {}",
            blog.id,
            owner.username,
            e
        );
        if let Err(rollback) = store.delete_blog(blog.id).await {
            log::error!("❌ Rollback of blog {} failed: {}", blog.id, rollback);
        }
        return Err(e.into());
    }

    log::info!("✅ Blog {} created by {}", blog.id, owner.username);

    Ok(BlogResponse::expanded(blog, Some(owner)))
}

/// Overwrites the supplied fields. No ownership check is made here.
pub async fn update_blog(
    store: &dyn BlogStore,
    id: &str,
    request: UpdateBlogRequest,
) -> Result<BlogResponse, AppError> {
    let blog_id = parse_id(id)?;
    request.validate().map_err(AppError::Validation)?;

    let user = match request.user.as_deref() {
        Some(user) => Some(parse_id(user)?),
        None => None,
    };

    let update = BlogUpdate {
        title: request.title.flatten(),
        author: request.author,
        url: request.url.flatten(),
        likes: request.likes,
        user,
    };

    let blog = store
        .update_blog(blog_id, &update)
        .await?
        .ok_or(AppError::NotFound("blog"))?;

    Ok(BlogResponse::unexpanded(blog))
}

/// Deletes a blog owned by `requester` and returns its id.
pub async fn delete_blog(
    store: &dyn BlogStore,
    id: &str,
    requester: &User,
) -> Result<String, AppError> {
    let blog_id = parse_id(id)?;

    let blog = store
        .find_blog(blog_id)
        .await?
        .ok_or(AppError::NotFound("blog"))?;

    if blog.user != Some(requester.id) {
        return Err(AppError::Forbidden);
    }

    store.delete_blog(blog_id).await?;

    if let Err(e) = store.pull_user_blog(requester.id, blog_id).await {
        log::warn!(
            "⚠️  Blog {} deleted but still listed on user {}: {}",
            blog_id,
            requester.username,
            e
        );
    }

    Ok(blog_id.to_hex())
}
