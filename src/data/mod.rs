pub mod booking_repository;
pub mod listing_repository;
pub mod store;
pub mod user_repository;
