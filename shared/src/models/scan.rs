//! Persisted scan records

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One persisted scan row
///
/// Written once on a successful scan, never updated or deleted by the
/// application; read back most-recent-first.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub disease_name: String,
    /// Selector confidence in [0, 1]
    pub confidence: f32,
    pub treatments: Vec<String>,
    pub severity: String,
    pub has_black_spots: bool,
    pub damage_percentage: f64,
    pub health_score: i32,
    pub image_quality: f64,
    pub created_at: DateTime<Utc>,
}

/// Flat row shape for CSV export
#[derive(Debug, Serialize)]
pub struct ScanCsvRow {
    pub scanned_at: String,
    pub disease_name: String,
    pub confidence: f32,
    pub severity: String,
    pub health_score: i32,
    pub has_black_spots: bool,
    pub damage_percentage: f64,
    pub image_quality: f64,
    pub treatments: String,
}

impl From<&ScanRecord> for ScanCsvRow {
    fn from(record: &ScanRecord) -> Self {
        Self {
            scanned_at: record.created_at.to_rfc3339(),
            disease_name: record.disease_name.clone(),
            confidence: record.confidence,
            severity: record.severity.clone(),
            health_score: record.health_score,
            has_black_spots: record.has_black_spots,
            damage_percentage: record.damage_percentage,
            image_quality: record.image_quality,
            treatments: record.treatments.join("; "),
        }
    }
}
