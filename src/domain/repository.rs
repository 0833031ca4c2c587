use crate::domain::booking::Booking;
use crate::domain::listing::{Listing, ListingDetails};
use crate::domain::user::User;
use anyhow::Result;
use async_trait::async_trait;

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Inserts a new user. Fails with a validation error when the email is taken.
    async fn create_user(&self, user: User) -> Result<()>;
    async fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn find_user_by_id(&self, id: &str) -> Result<Option<User>>;
}

#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn create_listing(&self, listing: Listing) -> Result<()>;
    async fn find_listing_by_id(&self, id: &str) -> Result<Option<Listing>>;
    /// Replaces the details of the listing matching both `id` and `owner`.
    /// Returns the updated listing, or `None` when nothing matched.
    async fn update_owned_listing(
        &self,
        id: &str,
        owner: &str,
        details: ListingDetails,
    ) -> Result<Option<Listing>>;
    async fn list_listings(&self) -> Result<Vec<Listing>>;
    async fn list_listings_by_owner(&self, owner: &str) -> Result<Vec<Listing>>;
}

#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn create_booking(&self, booking: Booking) -> Result<()>;
    async fn list_bookings_by_user(&self, user_id: &str) -> Result<Vec<Booking>>;
}
