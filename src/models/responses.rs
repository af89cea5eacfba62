use serde::{Deserialize, Serialize};
use crate::models::domain::ScoredProperty;

/// Response for the search and recommended endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListingsResponse {
    pub listings: Vec<ScoredProperty>,
    #[serde(rename = "totalCandidates")]
    pub total_candidates: usize,
    #[serde(rename = "totalMatched")]
    pub total_matched: usize,
    #[serde(rename = "snapshotSequence")]
    pub snapshot_sequence: u64,
}

/// Response for a snapshot refresh
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// False when a newer fetch had already been applied
    pub applied: bool,
    #[serde(rename = "snapshotSequence")]
    pub snapshot_sequence: u64,
    #[serde(rename = "listingCount")]
    pub listing_count: usize,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    #[serde(rename = "snapshotSequence")]
    pub snapshot_sequence: u64,
    #[serde(rename = "listingCount")]
    pub listing_count: usize,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}
