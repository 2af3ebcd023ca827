use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;

use crate::error::Result;
use crate::model::ErrorResponse;
use crate::state::AppState;

pub async fn redirect_handler(
    Path(code): Path<String>,
    State(state): State<AppState>,
) -> Result<Response> {
    match state.links().resolve(&code).await? {
        Some(url) => Ok(Redirect::temporary(&url).into_response()),
        None => Ok((
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                message: "short link not found".to_string(),
            }),
        )
            .into_response()),
    }
}
