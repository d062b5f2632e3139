use std::sync::Arc;

use actix_files::Files;
use actix_web::{web, App, HttpServer};
use tracing::info;
use tracing_subscriber::EnvFilter;

use userhub::auth::TokenCodec;
use userhub::config::AppConfig;
use userhub::db::{MemoryStore, UserStore};
use userhub::handlers;
use userhub::storage::{DiskStore, FileStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let addr = format!("0.0.0.0:{}", config.port);

    let codec = web::Data::new(TokenCodec::new(&config.secret));
    let store: Arc<dyn UserStore> = Arc::new(MemoryStore::new());
    let store = web::Data::from(store);
    let files: Arc<dyn FileStore> = Arc::new(DiskStore::new(config.upload_dir.clone())?);
    let files = web::Data::from(files);
    let upload_dir = config.upload_dir.clone();

    info!("Listening on: {}", addr);

    HttpServer::new(move || {
        App::new()
            .app_data(codec.clone())
            .app_data(store.clone())
            .app_data(files.clone())
            .configure(handlers::routes)
            .service(Files::new("/uploads", upload_dir.clone()))
    })
    .bind(addr)?
    .run()
    .await
}
