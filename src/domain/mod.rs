pub mod booking;
pub mod error;
pub mod listing;
pub mod repository;
pub mod user;
