//! HTTP handlers for leaf scan endpoints

use axum::{
    extract::{Multipart, Path, Query, State},
    http::header,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::middleware::CurrentUser;
use crate::services::scan::{ScanReport, ScanService};
use crate::AppState;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use shared::models::ScanRecord;
use shared::types::{PaginatedResponse, Pagination};

/// Camera capture payload: a JPEG frame the client re-encoded at quality
/// 0.8 before upload
#[derive(Deserialize)]
pub struct CaptureRequest {
    pub image_base64: String,
}

#[derive(Deserialize)]
pub struct ScanListQuery {
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// Run a scan on an uploaded image file (multipart field `image`)
pub async fn submit_scan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    mut multipart: Multipart,
) -> AppResult<Json<ScanReport>> {
    let mut image_bytes: Option<Vec<u8>> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::Validation {
            field: "image".to_string(),
            message: format!("Invalid multipart upload: {}", e),
            message_th: "ไฟล์ที่อัปโหลดไม่ถูกต้อง".to_string(),
        }
    })? {
        if field.name() == Some("image") {
            let bytes = field.bytes().await.map_err(|e| AppError::Validation {
                field: "image".to_string(),
                message: format!("Could not read the uploaded file: {}", e),
                message_th: "ไม่สามารถอ่านไฟล์ที่อัปโหลดได้".to_string(),
            })?;
            image_bytes = Some(bytes.to_vec());
        }
    }

    let image_bytes = image_bytes.ok_or_else(|| AppError::Validation {
        field: "image".to_string(),
        message: "An image is required for scanning".to_string(),
        message_th: "ต้องมีรูปภาพเพื่อทำการสแกน".to_string(),
    })?;

    let service = ScanService::new(state.db);
    let report = service
        .analyze_and_record(current_user.0.user_id, &image_bytes)
        .await?;
    Ok(Json(report))
}

/// Run a scan on a captured camera frame sent as base64 JSON
pub async fn submit_capture(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(body): Json<CaptureRequest>,
) -> AppResult<Json<ScanReport>> {
    let image_bytes = BASE64.decode(body.image_base64.as_bytes()).map_err(|e| {
        AppError::Validation {
            field: "image_base64".to_string(),
            message: format!("Invalid base64 image payload: {}", e),
            message_th: "ข้อมูลรูปภาพ base64 ไม่ถูกต้อง".to_string(),
        }
    })?;

    let service = ScanService::new(state.db);
    let report = service
        .analyze_and_record(current_user.0.user_id, &image_bytes)
        .await?;
    Ok(Json(report))
}

/// Get the most recent scans for the history panel
pub async fn get_recent_scans(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<Vec<ScanRecord>>> {
    let service = ScanService::new(state.db);
    let scans = service.recent_scans(current_user.0.user_id).await?;
    Ok(Json(scans))
}

/// List scan history with pagination
pub async fn list_scans(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Query(query): Query<ScanListQuery>,
) -> AppResult<Json<PaginatedResponse<ScanRecord>>> {
    let defaults = Pagination::default();
    let pagination = Pagination {
        page: query.page.unwrap_or(defaults.page),
        per_page: query.per_page.unwrap_or(defaults.per_page),
    };

    let service = ScanService::new(state.db);
    let scans = service
        .list_scans(current_user.0.user_id, pagination)
        .await?;
    Ok(Json(scans))
}

/// Get a single scan by id
pub async fn get_scan(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(scan_id): Path<Uuid>,
) -> AppResult<Json<ScanRecord>> {
    let service = ScanService::new(state.db);
    let scan = service.get_scan(current_user.0.user_id, scan_id).await?;
    Ok(Json(scan))
}

/// Export scan history as CSV
pub async fn export_scans(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<impl IntoResponse> {
    let service = ScanService::new(state.db);
    let csv = service.export_csv(current_user.0.user_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"scan_history.csv\"",
            ),
        ],
        csv,
    ))
}
