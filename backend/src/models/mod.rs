//! Database models for the Plant Health Scanner Platform
//!
//! Re-exports models from the shared crate and adds backend-specific models

pub use shared::models::*;
