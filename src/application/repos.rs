//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::{AuthorRecord, PostRecord};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("duplicate record violates unique constraint `{constraint}`")]
    Duplicate { constraint: String },
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database timeout")]
    Timeout,
}

impl StoreError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[derive(Debug, Clone)]
pub struct NewBlogPost {
    pub title: String,
    pub content: Option<String>,
}

/// Filter for post listings. An absent `published` value means no filter.
///
/// Also serves as the HTTP query-string shape and as input to list cache
/// keys, so serialization must stay deterministic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogListQuery {
    pub published: Option<bool>,
}

#[async_trait]
pub trait BlogStore: Send + Sync {
    /// Insert a post row. New posts are always created published.
    async fn create_post(&self, params: NewBlogPost) -> Result<PostRecord, StoreError>;

    /// Update the published flag. Returns `None` when no row matches `id`;
    /// callers must check rather than rely on the store to signal missing
    /// rows any other way.
    async fn update_post_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> Result<Option<PostRecord>, StoreError>;

    async fn find_post_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, StoreError>;

    async fn find_posts(&self, query: &BlogListQuery) -> Result<Vec<PostRecord>, StoreError>;

    async fn find_authors(&self) -> Result<Vec<AuthorRecord>, StoreError>;
}
