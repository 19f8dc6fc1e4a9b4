mod authors;
mod posts;

pub use authors::list_authors;
pub use posts::{create_post, get_post, list_posts, unpublish_post};

use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};

use super::state::AppState;

/// Response header signalling whether the read was served from cache.
pub const CACHE_HIT_HEADER: HeaderName = HeaderName::from_static("x-cache-hit");

pub(super) fn with_cache_header(mut response: Response, cache_hit: bool) -> Response {
    let value = if cache_hit {
        HeaderValue::from_static("true")
    } else {
        HeaderValue::from_static("false")
    };
    response.headers_mut().insert(CACHE_HIT_HEADER, value);
    response
}

pub async fn health(State(state): State<AppState>) -> StatusCode {
    if state.probe.healthy().await {
        StatusCode::NO_CONTENT
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
