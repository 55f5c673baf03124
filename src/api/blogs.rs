use actix_web::{web, HttpResponse};

use crate::database::BlogStore;
use crate::models::{BlogResponse, CreateBlogRequest, UpdateBlogRequest};
use crate::services::{auth_service, blog_service, Claims};
use crate::utils::AppError;

/// Header naming the id of a blog removed by `DELETE /api/blogs/{id}`.
pub const DELETED_RESOURCE_HEADER: &str = "X-Deleted-Resource";

#[utoipa::path(
    get,
    path = "/api/blogs",
    tag = "Blogs",
    responses(
        (status = 200, description = "All blogs, owners expanded", body = Vec<BlogResponse>)
    )
)]
pub async fn list_blogs(store: web::Data<dyn BlogStore>) -> Result<HttpResponse, AppError> {
    log::info!("📚 GET /api/blogs");

    let blogs = blog_service::list_blogs(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(blogs))
}

#[utoipa::path(
    post,
    path = "/api/blogs",
    tag = "Blogs",
    request_body = CreateBlogRequest,
    responses(
        (status = 201, description = "Blog created", body = BlogResponse),
        (status = 400, description = "Blog validation failed"),
        (status = 401, description = "Missing or invalid token")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_blog(
    store: web::Data<dyn BlogStore>,
    claims: Option<web::ReqData<Claims>>,
    body: web::Json<CreateBlogRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("📝 POST /api/blogs");

    let user = auth_service::authenticated_user(store.get_ref(), claims.as_deref()).await?;
    let blog = blog_service::create_blog(store.get_ref(), &user, body.into_inner()).await?;

    Ok(HttpResponse::Created().json(blog))
}

#[utoipa::path(
    put,
    path = "/api/blogs/{id}",
    tag = "Blogs",
    params(
        ("id" = String, Path, description = "Blog id")
    ),
    request_body = UpdateBlogRequest,
    responses(
        (status = 200, description = "Updated blog", body = BlogResponse),
        (status = 400, description = "Malformatted id or validation failure"),
        (status = 404, description = "Blog not found")
    )
)]
pub async fn update_blog(
    store: web::Data<dyn BlogStore>,
    path: web::Path<String>,
    body: web::Json<UpdateBlogRequest>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("✏️  PUT /api/blogs/{}", id);

    let blog = blog_service::update_blog(store.get_ref(), &id, body.into_inner()).await?;
    Ok(HttpResponse::Ok().json(blog))
}

#[utoipa::path(
    delete,
    path = "/api/blogs/{id}",
    tag = "Blogs",
    params(
        ("id" = String, Path, description = "Blog id")
    ),
    responses(
        (status = 204, description = "Blog deleted"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Blog belongs to another user"),
        (status = 404, description = "Blog not found")
    ),
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_blog(
    store: web::Data<dyn BlogStore>,
    claims: Option<web::ReqData<Claims>>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = path.into_inner();
    log::info!("🗑️ DELETE /api/blogs/{}", id);

    let user = auth_service::authenticated_user(store.get_ref(), claims.as_deref()).await?;
    let deleted = blog_service::delete_blog(store.get_ref(), &id, &user).await?;

    log::info!("✅ Blog {} deleted by {}", deleted, user.username);

    Ok(HttpResponse::NoContent()
        .insert_header((DELETED_RESOURCE_HEADER, deleted))
        .finish())
}
