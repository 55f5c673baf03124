pub mod blogs;
pub mod health;
pub mod login;
pub mod swagger;
pub mod users;

use actix_web::HttpResponse;

pub async fn unknown_endpoint() -> HttpResponse {
    HttpResponse::NotFound().json(serde_json::json!({
        "error": "unknown endpoint"
    }))
}
