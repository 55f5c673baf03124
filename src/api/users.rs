use actix_web::{web, HttpResponse};

use crate::database::BlogStore;
use crate::models::{CreateUserRequest, UserResponse};
use crate::services::{user_service, AuthSettings};
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "All users, blogs expanded", body = Vec<UserResponse>)
    )
)]
pub async fn list_users(store: web::Data<dyn BlogStore>) -> Result<HttpResponse, AppError> {
    log::info!("👥 GET /api/users");

    let users = user_service::list_users(store.get_ref()).await?;
    Ok(HttpResponse::Ok().json(users))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = UserResponse),
        (status = 400, description = "Username or password rejected")
    )
)]
pub async fn create_user(
    store: web::Data<dyn BlogStore>,
    auth: web::Data<AuthSettings>,
    body: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let username = body.username.as_deref().unwrap_or("N/A").to_string();
    log::info!("📝 POST /api/users - username: {}", username);

    let user = user_service::create_user(store.get_ref(), &auth, body.into_inner()).await?;
    Ok(HttpResponse::Created().json(user))
}
