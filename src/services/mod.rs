pub mod auth_service;
pub mod blog_service;
pub mod user_service;

pub use auth_service::{AuthSettings, Claims};
