pub mod blob_storage;
pub mod config;
pub mod logging;
pub mod security;
