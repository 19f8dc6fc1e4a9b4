use axum::Json;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

use super::with_cache_header;

pub async fn list_authors(State(state): State<AppState>) -> Result<Response, ApiError> {
    let authors = state.blog.get_bloggers().await.map_err(ApiError::from)?;
    let response = Json(authors.data).into_response();
    Ok(with_cache_header(response, authors.cache_hit))
}
