use actix_web::{web, HttpResponse};

use crate::database::BlogStore;
use crate::services::auth_service::{self, LoginRequest, LoginResponse};
use crate::services::AuthSettings;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/api/login",
    tag = "Auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 401, description = "Invalid username or password")
    )
)]
pub async fn login(
    store: web::Data<dyn BlogStore>,
    auth: web::Data<AuthSettings>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let username = request.username.as_deref().unwrap_or("N/A").to_string();
    log::info!("🔐 POST /api/login - username: {}", username);

    let response = auth_service::login(store.get_ref(), &auth, request.into_inner()).await?;

    log::info!("✅ Login successful: {}", response.username);
    Ok(HttpResponse::Ok().json(response))
}
