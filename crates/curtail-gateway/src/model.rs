use curtail_core::LinkRecord;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkRequest {
    pub original_url: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkResponse {
    pub short_code: String,
    pub short_url: String,
    pub original_url: String,
    pub created_at: Timestamp,
    pub hit_count: u64,
}

impl LinkResponse {
    pub fn from_record(record: &LinkRecord, base_url: &str) -> Self {
        Self {
            short_code: record.code.as_str().to_string(),
            short_url: record.code.to_url(base_url),
            original_url: record.original_url.clone(),
            created_at: record.created_at,
            hit_count: record.hit_count,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
}
