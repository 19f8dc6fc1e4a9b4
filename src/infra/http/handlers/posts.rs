use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::repos::{BlogListQuery, NewBlogPost};
use crate::infra::http::error::ApiError;
use crate::infra::http::state::AppState;

use super::with_cache_header;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBlogRequest {
    pub title: String,
    pub content: Option<String>,
}

pub async fn list_posts(
    State(state): State<AppState>,
    Query(query): Query<BlogListQuery>,
) -> Result<Response, ApiError> {
    let posts = state.blog.get_blogs(&query).await.map_err(ApiError::from)?;
    let response = Json(posts.data).into_response();
    Ok(with_cache_header(response, posts.cache_hit))
}

pub async fn get_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let post = state.blog.get_blog(id).await.map_err(ApiError::from)?;
    let response = Json(post.data).into_response();
    Ok(with_cache_header(response, post.cache_hit))
}

pub async fn create_post(
    State(state): State<AppState>,
    Json(payload): Json<CreateBlogRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let params = NewBlogPost {
        title: payload.title,
        content: payload.content,
    };
    let post = state.blog.create_blog(params).await.map_err(ApiError::from)?;
    Ok((StatusCode::CREATED, Json(post)))
}

pub async fn unpublish_post(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let post = state.blog.unpublish_blog(id).await.map_err(ApiError::from)?;
    Ok(Json(post))
}
