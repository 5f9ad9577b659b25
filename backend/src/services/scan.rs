//! Leaf scan service: the full analysis pipeline plus scan history
//!
//! One scan is one sequential chain: decode, analyze, assess, select a
//! disease, persist, respond. Persistence is fire-and-forget relative to
//! the response: the computed report is returned even when the insert
//! fails, with the failure carried as a non-fatal warning. No stage is
//! retried; the user retries by scanning again.

use std::time::Instant;

use sqlx::PgPool;
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::imaging;
use crate::models::{
    alternative_diagnoses, select_disease, AlternativeDiagnosis, AnalysisResult, DiseaseMatch,
    HealthAssessment, ScanCsvRow, ScanRecord,
};
use serde::Serialize;
use shared::analyzer::{PlantImageAnalyzer, RgbaFrame};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};

/// Most-recent list size for the history panel
const RECENT_SCANS_LIMIT: i64 = 5;

/// Scan service for running analyses and reading scan history
#[derive(Clone)]
pub struct ScanService {
    db: PgPool,
}

/// Presentation aggregate for one completed scan
#[derive(Debug, Serialize)]
pub struct ScanReport {
    pub analysis: AnalysisResult,
    pub assessment: HealthAssessment,
    pub disease: DiseaseMatch,
    pub alternative_diagnoses: Vec<AlternativeDiagnosis>,
    /// Always the computed health score; clients must not substitute a
    /// display-only value here
    pub plant_health_percentage: i32,
    /// Present when the scan was persisted
    pub scan_id: Option<Uuid>,
    /// Present when persistence failed non-fatally
    #[serde(skip_serializing_if = "Option::is_none")]
    pub storage_warning: Option<String>,
}

/// Database row for a persisted scan
#[derive(Debug, sqlx::FromRow)]
struct ScanRow {
    id: Uuid,
    user_id: Uuid,
    disease_name: String,
    confidence: f32,
    treatments: Option<serde_json::Value>,
    severity: String,
    has_black_spots: bool,
    damage_percentage: f64,
    health_score: i32,
    image_quality: f64,
    created_at: chrono::DateTime<chrono::Utc>,
}

impl From<ScanRow> for ScanRecord {
    fn from(row: ScanRow) -> Self {
        let treatments: Vec<String> = row
            .treatments
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default();

        ScanRecord {
            id: row.id,
            user_id: row.user_id,
            disease_name: row.disease_name,
            confidence: row.confidence,
            treatments,
            severity: row.severity,
            has_black_spots: row.has_black_spots,
            damage_percentage: row.damage_percentage,
            health_score: row.health_score,
            image_quality: row.image_quality,
            created_at: row.created_at,
        }
    }
}

impl ScanService {
    /// Create a new ScanService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Run the full scan pipeline on uploaded image bytes and record the
    /// result in the user's history
    pub async fn analyze_and_record(
        &self,
        user_id: Uuid,
        image_bytes: &[u8],
    ) -> AppResult<ScanReport> {
        if image_bytes.is_empty() {
            return Err(AppError::Validation {
                field: "image".to_string(),
                message: "An image is required for scanning".to_string(),
                message_th: "ต้องมีรูปภาพเพื่อทำการสแกน".to_string(),
            });
        }

        // Decode failures are terminal for this scan attempt
        let frame_image = imaging::decode_for_analysis(image_bytes)?;
        let frame = RgbaFrame::new(
            frame_image.as_raw(),
            frame_image.width(),
            frame_image.height(),
        )
        .map_err(|e| AppError::Internal(e.to_string()))?;

        let analyzer = PlantImageAnalyzer::new();
        let started = Instant::now();
        let mut analysis = analyzer.analyze(&frame);
        analysis.analysis_time_secs = started.elapsed().as_secs_f64();

        let assessment = HealthAssessment::from_analysis(&analysis);
        let disease = select_disease(&analysis);

        // Fire-and-forget persistence: the report stands even if the insert
        // fails. The known benign schema-mismatch class is swallowed; other
        // failures surface as a warning on the report.
        let (scan_id, storage_warning) = match self.insert_scan(user_id, &analysis, &disease).await
        {
            Ok(id) => (Some(id), None),
            Err(e) if is_benign_schema_error(&e) => {
                tracing::warn!("Ignoring known schema mismatch while saving scan: {}", e);
                (None, None)
            }
            Err(e) => {
                tracing::warn!("Failed to save scan for user {}: {}", user_id, e);
                (
                    None,
                    Some("The result could not be saved to your scan history".to_string()),
                )
            }
        };

        let plant_health_percentage = analysis.health_score;

        Ok(ScanReport {
            analysis,
            assessment,
            disease,
            alternative_diagnoses: alternative_diagnoses(),
            plant_health_percentage,
            scan_id,
            storage_warning,
        })
    }

    /// Insert one scan row and return its id
    async fn insert_scan(
        &self,
        user_id: Uuid,
        analysis: &AnalysisResult,
        disease: &DiseaseMatch,
    ) -> AppResult<Uuid> {
        let treatments_json = serde_json::to_value(&disease.record.treatments)
            .map_err(|e| AppError::Internal(e.to_string()))?;

        let scan_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO leaf_scans (
                user_id, disease_name, confidence, treatments, severity,
                has_black_spots, damage_percentage, health_score, image_quality
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            "#,
        )
        .bind(user_id)
        .bind(&disease.record.name)
        .bind(disease.confidence)
        .bind(&treatments_json)
        .bind(disease.record.severity.to_string())
        .bind(analysis.has_black_spots)
        .bind(analysis.damage_percentage)
        .bind(analysis.health_score)
        .bind(analysis.image_quality)
        .fetch_one(&self.db)
        .await?;

        Ok(scan_id)
    }

    /// Most recent scans for the history panel, newest first
    pub async fn recent_scans(&self, user_id: Uuid) -> AppResult<Vec<ScanRecord>> {
        let rows = sqlx::query_as::<_, ScanRow>(
            r#"
            SELECT id, user_id, disease_name, confidence, treatments, severity,
                   has_black_spots, damage_percentage, health_score, image_quality,
                   created_at
            FROM leaf_scans
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
            "#,
        )
        .bind(user_id)
        .bind(RECENT_SCANS_LIMIT)
        .fetch_all(&self.db)
        .await?;

        Ok(rows.into_iter().map(|r| r.into()).collect())
    }

    /// Paginated scan history, newest first
    pub async fn list_scans(
        &self,
        user_id: Uuid,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<ScanRecord>> {
        let total_items =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM leaf_scans WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;

        let rows = sqlx::query_as::<_, ScanRow>(
            r#"
            SELECT id, user_id, disease_name, confidence, treatments, severity,
                   has_black_spots, damage_percentage, health_score, image_quality,
                   created_at
            FROM leaf_scans
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: rows.into_iter().map(|r| r.into()).collect(),
            pagination: PaginationMeta::new(&pagination, total_items as u64),
        })
    }

    /// Get a single scan by id
    pub async fn get_scan(&self, user_id: Uuid, scan_id: Uuid) -> AppResult<ScanRecord> {
        let row = sqlx::query_as::<_, ScanRow>(
            r#"
            SELECT id, user_id, disease_name, confidence, treatments, severity,
                   has_black_spots, damage_percentage, health_score, image_quality,
                   created_at
            FROM leaf_scans
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(scan_id)
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Scan".to_string()))?;

        Ok(row.into())
    }

    /// Export the user's full scan history as CSV
    pub async fn export_csv(&self, user_id: Uuid) -> AppResult<String> {
        let rows = sqlx::query_as::<_, ScanRow>(
            r#"
            SELECT id, user_id, disease_name, confidence, treatments, severity,
                   has_black_spots, damage_percentage, health_score, image_quality,
                   created_at
            FROM leaf_scans
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.db)
        .await?;

        let records: Vec<ScanRecord> = rows.into_iter().map(|r| r.into()).collect();

        let mut wtr = csv::Writer::from_writer(vec![]);
        for record in &records {
            wtr.serialize(ScanCsvRow::from(record))
                .map_err(|e| AppError::StorageError(e.to_string()))?;
        }

        let csv_data = String::from_utf8(
            wtr.into_inner()
                .map_err(|e| AppError::StorageError(e.to_string()))?,
        )
        .map_err(|e| AppError::StorageError(e.to_string()))?;

        Ok(csv_data)
    }
}

/// The one persistence error class that is swallowed rather than surfaced:
/// a known client/schema drift where an optional column is missing
fn is_benign_schema_error(err: &AppError) -> bool {
    match err {
        AppError::DatabaseError(sqlx::Error::Database(db_err)) => {
            is_benign_schema_message(&db_err.message().to_lowercase())
        }
        _ => false,
    }
}

fn is_benign_schema_message(message: &str) -> bool {
    message.contains("column") && message.contains("does not exist")
}
