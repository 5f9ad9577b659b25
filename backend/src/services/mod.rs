//! Business logic services for the Plant Health Scanner Platform

pub mod auth;
pub mod scan;

pub use auth::AuthService;
pub use scan::ScanService;
