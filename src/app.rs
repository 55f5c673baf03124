use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    http::header::{self, HeaderName},
    middleware::Logger,
    web, App, Error,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::api;
use crate::database::BlogStore;
use crate::middleware::BearerAuth;
use crate::services::AuthSettings;
use crate::utils::AppError;

/// Everything a worker needs to build its `App`.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn BlogStore>,
    pub auth: AuthSettings,
}

impl AppState {
    pub fn new(store: Arc<dyn BlogStore>, auth: AuthSettings) -> Self {
        Self { store, auth }
    }
}

fn cors() -> Cors {
    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
        .allowed_headers(vec![header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![HeaderName::from_static("x-deleted-resource")])
        .max_age(3600)
}

/// Malformed or mistyped JSON bodies get the same `{error}` shape as
/// every other failure.
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| AppError::BadRequest(err.to_string()).into())
}

pub fn build_app(
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::from(state.store))
        .app_data(web::Data::new(state.auth.clone()))
        .app_data(json_config())
        .wrap(BearerAuth::new(state.auth))
        .wrap(cors())
        .wrap(Logger::default())
        .service(
            SwaggerUi::new("/swagger-ui/{_:.*}")
                .url("/api-docs/openapi.json", api::swagger::ApiDoc::openapi()),
        )
        .route("/health", web::get().to(api::health::health_check))
        .service(
            web::scope("/api/blogs")
                .route("", web::get().to(api::blogs::list_blogs))
                .route("", web::post().to(api::blogs::create_blog))
                .route("/{id}", web::put().to(api::blogs::update_blog))
                .route("/{id}", web::delete().to(api::blogs::delete_blog)),
        )
        .service(
            web::scope("/api/users")
                .route("", web::get().to(api::users::list_users))
                .route("", web::post().to(api::users::create_user)),
        )
        .route("/api/login", web::post().to(api::login::login))
        .default_service(web::route().to(api::unknown_endpoint))
}
