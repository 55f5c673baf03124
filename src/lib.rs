//! Blog list service: blogs owned by users, bearer-token authentication,
//! MongoDB persistence.

pub mod api;
pub mod app;
pub mod config;
pub mod database;
pub mod middleware;
pub mod models;
pub mod services;
pub mod utils;
