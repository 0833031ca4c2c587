use crate::domain::listing::ListingDetails;
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::{error, info, instrument};

#[instrument(skip(state, caller, req), fields(user_id = %caller.user_id, listing_id))]
pub async fn create_listing(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    req: web::Json<ListingDetails>,
) -> Result<HttpResponse, ApiError> {
    info!(title = %req.title, "Creating listing");
    let listing = state
        .listing_service
        .create_listing(&caller.user_id, req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create listing");
            e
        })?;
    tracing::Span::current().record("listing_id", listing.id.as_str());
    Ok(HttpResponse::Created().json(listing))
}

#[instrument(skip(state, caller, req), fields(user_id = %caller.user_id, listing_id = %*path))]
pub async fn update_listing(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<ListingDetails>,
) -> Result<HttpResponse, ApiError> {
    let listing_id = path.into_inner();
    let listing = state
        .listing_service
        .update_listing(&caller.user_id, &listing_id, req.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(skip(state), fields(listing_id = %*path))]
pub async fn get_listing(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let listing = state.listing_service.get_listing(&path).await?;
    Ok(HttpResponse::Ok().json(listing))
}

#[instrument(skip(state))]
pub async fn list_listings(state: web::Data<AppState>) -> Result<HttpResponse, ApiError> {
    let listings = state.listing_service.list_listings().await?;
    info!(count = listings.len(), "Listings retrieved");
    Ok(HttpResponse::Ok().json(listings))
}

#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn list_my_listings(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let listings = state
        .listing_service
        .list_owned_listings(&caller.user_id)
        .await?;
    info!(count = listings.len(), "Owned listings retrieved");
    Ok(HttpResponse::Ok().json(listings))
}
