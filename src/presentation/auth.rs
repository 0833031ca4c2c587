use crate::domain::user::{CreateUser, LoginRequest, UserProfile};
use crate::presentation::handlers::{ApiError, AppState, OptionalUser};
use actix_web::{HttpResponse, web};
use serde::Serialize;
use tracing::{error, info, instrument};

#[derive(Serialize)]
pub struct LoginResponse {
    pub user: UserProfile,
    pub access_token: String,
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn register(
    state: web::Data<AppState>,
    req: web::Json<CreateUser>,
) -> Result<HttpResponse, ApiError> {
    info!("Registration request received");

    let user = state
        .auth_service
        .register_user(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to register user");
            ApiError::from(e)
        })?;

    info!(user_id = %user.id, "User registered successfully");
    Ok(HttpResponse::Created().json(user))
}

#[instrument(skip(state, req), fields(email = %req.email))]
pub async fn login(
    state: web::Data<AppState>,
    req: web::Json<LoginRequest>,
) -> Result<HttpResponse, ApiError> {
    info!("Login request received");

    let (user, access_token) = state
        .auth_service
        .login(req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to login");
            ApiError::from(e)
        })?;

    Ok(HttpResponse::Ok().json(LoginResponse { user, access_token }))
}

#[instrument(skip(state, caller))]
pub async fn profile(
    state: web::Data<AppState>,
    caller: OptionalUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = caller.0.as_ref().map(|u| u.user_id.as_str());
    let profile = state.auth_service.profile(user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}
