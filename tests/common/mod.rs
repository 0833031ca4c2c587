#![allow(dead_code)]

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use staybook_api::infrastructure::blob_storage::RemoteFetcher;

pub const JWT_SECRET: &str = "test-secret-key-for-integration-tests";
pub const MAX_UPLOAD_BYTES: usize = 1024 * 1024;
pub const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nfake-png-body";

/// Serves a fixed body for links under `https://img.test/`, fails otherwise.
pub struct StubFetcher;

#[async_trait]
impl RemoteFetcher for StubFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>> {
        if url.starts_with("https://img.test/") {
            Ok(PNG_BYTES.to_vec())
        } else {
            Err(anyhow!("connection refused: {}", url))
        }
    }
}

/// Builds the full app over an empty store. Evaluates to `(app, upload_dir)`;
/// keep `upload_dir` alive for the duration of the test.
macro_rules! setup_app {
    () => {{
        let store = staybook_api::data::store::InMemoryStore::ephemeral();
        let upload_dir = tempfile::tempdir().unwrap();
        let photo_service = staybook_api::application::photo_service::PhotoService::new(
            std::sync::Arc::new(staybook_api::infrastructure::blob_storage::LocalBlobStorage::new(
                upload_dir.path(),
                "http://test",
            )),
            std::sync::Arc::new(common::StubFetcher),
            common::MAX_UPLOAD_BYTES,
        );
        let state = actix_web::web::Data::new(staybook_api::presentation::handlers::AppState::new(
            &store,
            common::JWT_SECRET.to_string(),
            3600,
            photo_service,
        ));

        let app = actix_web::test::init_service(
            actix_web::App::new()
                .app_data(state.clone())
                .wrap(staybook_api::presentation::middleware::JwtAuthMiddleware::new(
                    common::JWT_SECRET,
                ))
                .configure(|cfg| {
                    staybook_api::presentation::routes::configure(cfg, common::MAX_UPLOAD_BYTES)
                }),
        )
        .await;

        (app, upload_dir)
    }};
}

/// Registers `$name` (email `<name>@example.com`, password `pw`) and logs in.
/// Evaluates to `(access_token, user_id)`.
macro_rules! login_as {
    ($app:expr, $name:expr) => {{
        let name: &str = $name;
        let email = format!("{}@example.com", name.to_lowercase());

        let req = actix_web::test::TestRequest::post()
            .uri("/api/register")
            .set_json(serde_json::json!({ "name": name, "email": email, "password": "pw" }))
            .to_request();
        let resp = actix_web::test::call_service(&$app, req).await;
        assert_eq!(resp.status(), actix_web::http::StatusCode::CREATED);
        let user: serde_json::Value = actix_web::test::read_body_json(resp).await;

        let req = actix_web::test::TestRequest::post()
            .uri("/api/login")
            .set_json(serde_json::json!({ "email": email, "password": "pw" }))
            .to_request();
        let body: serde_json::Value = actix_web::test::call_and_read_body_json(&$app, req).await;

        (
            body["access_token"].as_str().unwrap().to_string(),
            user["id"].as_str().unwrap().to_string(),
        )
    }};
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn cabin() -> serde_json::Value {
    serde_json::json!({
        "title": "Cabin",
        "description": "Pine cabin by the lake",
        "addedPhotos": ["http://test/uploads/cabin.jpg"],
        "address": "1 Lake Rd",
        "perks": ["wifi", "parking"],
        "extraInfo": "No pets",
        "checkIn": "14:00",
        "checkOut": "11:00",
        "maxGuests": 4,
        "price": 100
    })
}
