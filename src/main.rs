use std::io;
use std::sync::Arc;

use actix_web::HttpServer;
use bloglist_service::app::{build_app, AppState};
use bloglist_service::config::{Config, StoreBackend};
use bloglist_service::database::{BlogStore, MemoryStore, MongoDB};
use bloglist_service::services::AuthSettings;
use dotenv::dotenv;

#[actix_web::main]
async fn main() -> io::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(|e| {
        log::error!("❌ Invalid configuration: {}", e);
        io::Error::other(e)
    })?;

    log::info!("🚀 Starting Bloglist Service...");

    let store: Arc<dyn BlogStore> = match config.store {
        StoreBackend::Mongo => {
            let uri = config
                .mongodb_uri
                .as_deref()
                .ok_or_else(|| io::Error::other("MONGODB_URI must be set"))?;
            let db = MongoDB::new(uri, config.mongodb_database.as_deref())
                .await
                .map_err(|e| {
                    log::error!("❌ Failed to connect to MongoDB: {}", e);
                    io::Error::other(e)
                })?;
            Arc::new(db)
        }
        StoreBackend::Memory => {
            log::warn!("⚠️  Using in-memory store, data is lost on shutdown");
            Arc::new(MemoryStore::new())
        }
    };

    let state = AppState::new(Arc::clone(&store), AuthSettings::from_config(&config));
    let address = config.bind_address();

    log::info!("🌐 Server starting on {}", address);
    log::info!("📚 Swagger UI available at: http://{}/swagger-ui/", address);

    let result = HttpServer::new(move || build_app(state.clone()))
        .bind(&address)?
        .run()
        .await;

    store.close().await;
    log::info!("👋 Server stopped");

    result
}
