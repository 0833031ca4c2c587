pub mod auth;
pub mod bookings;
pub mod handlers;
pub mod listings;
pub mod middleware;
pub mod routes;
pub mod uploads;
