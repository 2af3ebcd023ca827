use axum::extract::State;
use axum::http::HeaderMap;
use axum::Json;
use curtail_core::OwnerId;

use crate::error::Result;
use crate::model::{CreateLinkRequest, LinkResponse};
use crate::state::AppState;

/// Header carrying the trusted caller identity, attached upstream by the
/// authentication layer. Absent or blank means anonymous.
pub const OWNER_HEADER: &str = "x-owner-id";

pub fn owner_from_headers(headers: &HeaderMap) -> Option<OwnerId> {
    headers
        .get(OWNER_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(OwnerId::new)
}

pub async fn create_link_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<CreateLinkRequest>,
) -> Result<Json<LinkResponse>> {
    let owner = owner_from_headers(&headers);
    let record = state.links().create(&request.original_url, owner).await?;
    Ok(Json(LinkResponse::from_record(&record, state.base_url())))
}

pub async fn list_links_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<LinkResponse>>> {
    let owner = owner_from_headers(&headers);
    let records = state.links().list_for_owner(owner.as_ref()).await?;
    Ok(Json(
        records
            .iter()
            .map(|record| LinkResponse::from_record(record, state.base_url()))
            .collect(),
    ))
}
