use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::application::blog::BlogError;
use crate::application::repos::StoreError;

pub mod codes {
    pub const NOTIFY_FAILED: &str = "notify_failed";
    pub const DB_TIMEOUT: &str = "db_timeout";
    pub const STORE: &str = "store_error";
}

#[derive(Debug, Serialize)]
pub struct ApiErrorBody {
    pub error: ApiErrorMessage,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorMessage {
    pub code: String,
    pub message: String,
}

#[derive(Debug)]
pub enum ApiError {
    /// 404 with the body shape clients depend on:
    /// `{ "blogId": ..., "message": "Blog post not found" }`.
    BlogNotFound { blog_id: Uuid },
    /// The write committed but the record notification failed and the
    /// deployment asked for propagation.
    NotifyFailed,
    Unavailable,
    Internal,
}

impl From<BlogError> for ApiError {
    fn from(err: BlogError) -> Self {
        match err {
            BlogError::NotFound { blog_id } => ApiError::BlogNotFound { blog_id },
            BlogError::Notify(notify) => {
                error!(target: "foglio::http", error = %notify, "record notification failed");
                ApiError::NotifyFailed
            }
            BlogError::Store(StoreError::Timeout) => {
                error!(target: "foglio::http", "store timed out");
                ApiError::Unavailable
            }
            BlogError::Store(store) => {
                error!(target: "foglio::http", error = %store, "store failure");
                ApiError::Internal
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BlogNotFound { blog_id } => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "blogId": blog_id,
                    "message": "Blog post not found",
                })),
            )
                .into_response(),
            ApiError::NotifyFailed => error_response(
                StatusCode::BAD_GATEWAY,
                codes::NOTIFY_FAILED,
                "Record notification failed",
            ),
            ApiError::Unavailable => error_response(
                StatusCode::SERVICE_UNAVAILABLE,
                codes::DB_TIMEOUT,
                "Service temporarily unavailable",
            ),
            ApiError::Internal => error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                codes::STORE,
                "Persistence error",
            ),
        }
    }
}

fn error_response(status: StatusCode, code: &str, message: &str) -> Response {
    let body = ApiErrorBody {
        error: ApiErrorMessage {
            code: code.to_string(),
            message: message.to_string(),
        },
    };
    (status, Json(body)).into_response()
}
