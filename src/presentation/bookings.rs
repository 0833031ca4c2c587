use crate::domain::booking::CreateBooking;
use crate::presentation::handlers::{ApiError, AppState};
use crate::presentation::middleware::AuthenticatedUser;
use actix_web::{HttpResponse, web};
use tracing::{error, info, instrument};

#[instrument(skip(state, caller, req), fields(user_id = %caller.user_id, place = %req.place))]
pub async fn create_booking(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
    req: web::Json<CreateBooking>,
) -> Result<HttpResponse, ApiError> {
    let booking = state
        .booking_service
        .create_booking(&caller.user_id, req.into_inner())
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create booking");
            e
        })?;
    info!(booking_id = %booking.id, "Booking created");
    Ok(HttpResponse::Created().json(booking))
}

#[instrument(skip(state, caller), fields(user_id = %caller.user_id))]
pub async fn list_my_bookings(
    state: web::Data<AppState>,
    caller: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let bookings = state.booking_service.list_bookings(&caller.user_id).await?;
    info!(count = bookings.len(), "Bookings retrieved");
    Ok(HttpResponse::Ok().json(bookings))
}
