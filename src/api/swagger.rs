use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Bloglist API",
        version = "1.0.0",
        description = "Blog list with per-user ownership.\n\n**Authentication:** creating and deleting blogs requires a JWT Bearer token obtained from `/api/login`."
    ),
    paths(
        crate::api::blogs::list_blogs,
        crate::api::blogs::create_blog,
        crate::api::blogs::update_blog,
        crate::api::blogs::delete_blog,
        crate::api::users::list_users,
        crate::api::users::create_user,
        crate::api::login::login,
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::models::BlogResponse,
            crate::models::OwnerRef,
            crate::models::UserSummary,
            crate::models::CreateBlogRequest,
            crate::models::UpdateBlogRequest,
            crate::models::UserResponse,
            crate::models::BlogRef,
            crate::models::BlogSummary,
            crate::models::CreateUserRequest,
            crate::models::FieldError,
            crate::services::auth_service::LoginRequest,
            crate::services::auth_service::LoginResponse,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Blogs", description = "Blog listing, creation, update and deletion."),
        (name = "Users", description = "User registration and listing."),
        (name = "Auth", description = "Token issuing."),
        (name = "Health", description = "Service health."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /api/login"))
                        .build(),
                ),
            );
        }
    }
}
