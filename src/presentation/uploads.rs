use crate::application::photo_service::content_type_for;
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::http::header::CONTENT_TYPE;
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Deserialize;
use tracing::instrument;

#[derive(Debug, Deserialize)]
pub struct UploadByLink {
    pub link: String,
}

#[instrument(skip(state, caller, req, body), fields(user_id = %caller.user_id))]
pub async fn upload(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    req: HttpRequest,
    body: web::Bytes,
) -> Result<HttpResponse, ApiError> {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());
    let url = state.photo_service.upload(content_type, &body).await?;
    Ok(HttpResponse::Ok().json(vec![url]))
}

#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn upload_by_link(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    req: web::Json<UploadByLink>,
) -> Result<HttpResponse, ApiError> {
    let url = state.photo_service.upload_by_link(&req.link).await?;
    Ok(HttpResponse::Ok().json(url))
}

#[instrument(skip(state))]
pub async fn serve_upload(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let file_name = path.into_inner();
    match state.photo_service.read(&file_name).await? {
        Some(bytes) => Ok(HttpResponse::Ok()
            .content_type(content_type_for(&file_name))
            .body(bytes)),
        None => Err(ApiError::NotFound(format!("Upload not found: {}", file_name))),
    }
}
