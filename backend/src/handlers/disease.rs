//! HTTP handlers for the disease catalog
//!
//! The catalog is static reference data; these endpoints exist so the
//! client renders treatment and prevention copy from one source of truth.

use axum::{extract::Path, Json};

use crate::error::{AppError, AppResult};
use shared::models::{disease_catalog, find_disease, DiseaseRecord};

/// List the disease catalog
pub async fn list_diseases() -> Json<Vec<DiseaseRecord>> {
    Json(disease_catalog())
}

/// Get one catalog entry by slug (including the synthesized healthy entry)
pub async fn get_disease(Path(slug): Path<String>) -> AppResult<Json<DiseaseRecord>> {
    find_disease(&slug)
        .map(Json)
        .ok_or_else(|| AppError::NotFound("Disease".to_string()))
}
