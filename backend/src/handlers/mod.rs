//! HTTP handlers for the Plant Health Scanner Platform

pub mod auth;
pub mod disease;
pub mod health;
pub mod scan;

pub use auth::*;
pub use disease::*;
pub use health::*;
pub use scan::*;
