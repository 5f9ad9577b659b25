//! Shared types and models for the Plant Health Scanner Platform
//!
//! This crate contains the leaf-image analysis pipeline and the types shared
//! between the backend, frontend (via WASM), and other components of the
//! system. Everything here is pure computation: no I/O, no async, no
//! database, so it compiles for both native and wasm32 targets.

pub mod analyzer;
pub mod models;
pub mod types;
pub mod validation;

pub use analyzer::*;
pub use models::*;
pub use types::*;
pub use validation::*;
