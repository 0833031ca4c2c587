use actix_web::{App, HttpServer, web};
use anyhow::Context;
use staybook_api::application::photo_service::PhotoService;
use staybook_api::data::store::InMemoryStore;
use staybook_api::infrastructure::blob_storage::{HttpFetcher, LocalBlobStorage};
use staybook_api::infrastructure::config::AppConfig;
use staybook_api::infrastructure::logging::init_logging;
use staybook_api::presentation::handlers::AppState;
use staybook_api::presentation::middleware::{
    JwtAuthMiddleware, RequestIdMiddleware, TimingMiddleware,
};
use staybook_api::presentation::routes::{ROUTES, configure};
use std::sync::Arc;
use tracing::{info, instrument};

#[tokio::main]
#[instrument]
async fn main() -> anyhow::Result<()> {
    init_logging();

    let config = AppConfig::from_env().context("failed to load configuration")?;
    info!(
        bind_address = %config.bind_address,
        upload_dir = %config.upload_dir.display(),
        snapshot = config.data_file.is_some(),
        "Configuration loaded"
    );

    let store = InMemoryStore::open(config.data_file.clone())
        .await
        .context("failed to open store")?;

    let photo_service = PhotoService::new(
        Arc::new(LocalBlobStorage::new(
            config.upload_dir.clone(),
            config.public_base_url.clone(),
        )),
        Arc::new(HttpFetcher::new(config.max_upload_bytes)),
        config.max_upload_bytes,
    );
    let state = web::Data::new(AppState::new(
        &store,
        config.jwt_secret.clone(),
        config.token_ttl_secs,
        photo_service,
    ));

    let jwt_secret = config.jwt_secret.clone();
    let max_upload_bytes = config.max_upload_bytes;
    let server = HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .wrap(JwtAuthMiddleware::new(jwt_secret.as_str()))
            .wrap(TimingMiddleware)
            .wrap(RequestIdMiddleware)
            .configure(|cfg| configure(cfg, max_upload_bytes))
    })
    .bind(config.bind_address.as_str())
    .with_context(|| format!("failed to bind {}", config.bind_address))?;

    info!(address = %config.bind_address, routes = %ROUTES, "Starting HTTP server");
    let served = server.run().await;

    info!("HTTP server stopped, closing store");
    store.close().await?;
    served.context("HTTP server failed")
}
