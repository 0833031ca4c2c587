use crate::presentation::auth::{login, profile, register};
use crate::presentation::bookings::{create_booking, list_my_bookings};
use crate::presentation::handlers::{health_check, json_error_handler};
use crate::presentation::listings::{
    create_listing, get_listing, list_listings, list_my_listings, update_listing,
};
use crate::presentation::uploads::{serve_upload, upload, upload_by_link};
use actix_web::web;

pub const ROUTES: &str = "GET /api/health, POST /api/register, POST /api/login, GET /api/profile, \
    POST /api/upload, POST /api/upload-by-link, GET /uploads/{file}, \
    POST|GET /api/places, GET|PUT /api/places/{id}, GET /api/user-places, \
    POST|GET /api/bookings";

/// Registers every route plus the JSON and payload extractor settings.
pub fn configure(cfg: &mut web::ServiceConfig, max_upload_bytes: usize) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .app_data(web::PayloadConfig::new(max_upload_bytes))
        .route("/uploads/{file}", web::get().to(serve_upload))
        .service(
            web::scope("/api")
                .route("/health", web::get().to(health_check))
                .route("/register", web::post().to(register))
                .route("/login", web::post().to(login))
                .route("/profile", web::get().to(profile))
                .route("/upload", web::post().to(upload))
                .route("/upload-by-link", web::post().to(upload_by_link))
                .route("/places", web::post().to(create_listing))
                .route("/places", web::get().to(list_listings))
                .route("/places/{id}", web::get().to(get_listing))
                .route("/places/{id}", web::put().to(update_listing))
                .route("/user-places", web::get().to(list_my_listings))
                .route("/bookings", web::post().to(create_booking))
                .route("/bookings", web::get().to(list_my_bookings)),
        );
}
