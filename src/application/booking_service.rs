use crate::domain::booking::{Booking, BookingWithPlace, CreateBooking};
use crate::domain::error::DomainError;
use crate::domain::repository::{BookingRepository, ListingRepository};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

pub struct BookingService<B: BookingRepository, L: ListingRepository> {
    bookings: Arc<B>,
    listings: Arc<L>,
}

impl<B: BookingRepository, L: ListingRepository> BookingService<B, L> {
    pub fn new(bookings: Arc<B>, listings: Arc<L>) -> Self {
        Self { bookings, listings }
    }

    /// Books a listing for `caller`. The referenced listing must exist;
    /// overlapping stays on the same listing are accepted.
    #[instrument(skip(self, req), fields(place = %req.place))]
    pub async fn create_booking(&self, caller: &str, req: CreateBooking) -> Result<Booking> {
        req.validate()?;

        if self.listings.find_listing_by_id(&req.place).await?.is_none() {
            warn!(place = %req.place, "Booking references an unknown listing");
            return Err(DomainError::NotFound(format!("Listing not found: {}", req.place)).into());
        }

        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            place: req.place,
            user: caller.to_string(),
            stay: req.stay,
        };
        self.bookings.create_booking(booking.clone()).await?;

        info!(
            booking_id = %booking.id,
            check_in = %booking.stay.check_in,
            check_out = %booking.stay.check_out,
            "Booking created"
        );
        Ok(booking)
    }

    /// The caller's bookings with each listing expanded.
    #[instrument(skip(self))]
    pub async fn list_bookings(&self, caller: &str) -> Result<Vec<BookingWithPlace>> {
        let bookings = self.bookings.list_bookings_by_user(caller).await?;

        let mut expanded = Vec::with_capacity(bookings.len());
        for booking in bookings {
            match self.listings.find_listing_by_id(&booking.place).await? {
                Some(place) => expanded.push(BookingWithPlace::new(booking, place)),
                None => {
                    warn!(booking_id = %booking.id, place = %booking.place, "Booked listing is missing, skipping");
                }
            }
        }
        Ok(expanded)
    }
}
