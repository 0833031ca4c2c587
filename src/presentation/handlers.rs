use crate::application::auth_service::AuthService;
use crate::application::booking_service::BookingService;
use crate::application::listing_service::ListingService;
use crate::application::photo_service::PhotoService;
use crate::data::booking_repository::InMemoryBookingRepository;
use crate::data::listing_repository::InMemoryListingRepository;
use crate::data::store::InMemoryStore;
use crate::data::user_repository::InMemoryUserRepository;
use crate::domain::error::DomainError;
use crate::presentation::middleware::{AuthenticatedUser, CredentialRejected};
use actix_web::error::JsonPayloadError;
use actix_web::{FromRequest, HttpMessage, HttpRequest, HttpResponse, ResponseError, web};
use chrono::Utc;
use serde::Serialize;
use std::future::{Ready, ready};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

const GENERIC_FAILURE: &str = "Something went wrong";

pub struct AppState {
    pub auth_service: Arc<AuthService<InMemoryUserRepository>>,
    pub listing_service: ListingService<InMemoryListingRepository, InMemoryUserRepository>,
    pub booking_service: BookingService<InMemoryBookingRepository, InMemoryListingRepository>,
    pub photo_service: PhotoService,
}

impl AppState {
    pub fn new(
        store: &InMemoryStore,
        jwt_secret: String,
        token_ttl_secs: u64,
        photo_service: PhotoService,
    ) -> Self {
        let auth_service = Arc::new(AuthService::new(
            store.users.clone(),
            jwt_secret,
            token_ttl_secs,
        ));
        Self {
            listing_service: ListingService::new(store.listings.clone(), auth_service.clone()),
            booking_service: BookingService::new(store.bookings.clone(), store.listings.clone()),
            auth_service,
            photo_service,
        }
    }
}

// Uniform error response format
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    details: serde_json::Value,
}

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();

        let (kind, message) = match self {
            ApiError::Validation(msg) => {
                warn!(error = %msg, status = %status, "Validation error");
                ("validation", msg.as_str())
            }
            ApiError::NotFound(msg) => {
                warn!(error = %msg, status = %status, "Resource not found");
                ("not_found", msg.as_str())
            }
            ApiError::Unauthorized(msg) => {
                warn!(error = %msg, status = %status, "Unauthorized");
                ("unauthorized", msg.as_str())
            }
            // Internal detail stays in the log.
            ApiError::Internal(msg) => {
                error!(error = %msg, status = %status, "Internal error");
                ("internal", GENERIC_FAILURE)
            }
        };

        HttpResponse::build(status).json(ErrorResponse {
            error: kind.to_string(),
            details: serde_json::json!({ "message": message }),
        })
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast_ref::<DomainError>() {
            Some(DomainError::Validation(msg)) => ApiError::Validation(msg.clone()),
            Some(DomainError::NotFound(msg)) => ApiError::NotFound(msg.clone()),
            Some(DomainError::Unauthorized(msg)) => ApiError::Unauthorized(msg.clone()),
            Some(DomainError::Internal(msg)) => ApiError::Internal(msg.clone()),
            None => ApiError::Internal(format!("{:#}", err)),
        }
    }
}

/// Turns malformed or incomplete JSON bodies into validation errors.
pub fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    ApiError::Validation(format!("Invalid request body: {}", err)).into()
}

fn rejection(req: &HttpRequest) -> Option<String> {
    req.extensions()
        .get::<CredentialRejected>()
        .map(|r| r.0.clone())
}

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(user.ok_or_else(|| {
            ApiError::Unauthorized(
                rejection(req).unwrap_or_else(|| "missing bearer credential".to_string()),
            )
        }))
    }
}

/// The caller's identity when a credential was sent. A credential that fails
/// verification is still an error.
pub struct OptionalUser(pub Option<AuthenticatedUser>);

impl FromRequest for OptionalUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        if let Some(reason) = rejection(req) {
            return ready(Err(ApiError::Unauthorized(reason)));
        }
        let user = req.extensions().get::<AuthenticatedUser>().cloned();
        ready(Ok(OptionalUser(user)))
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: String,
    timestamp: String,
}

#[instrument]
pub async fn health_check() -> HttpResponse {
    info!("Health check requested");
    HttpResponse::Ok().json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}
