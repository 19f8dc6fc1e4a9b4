use std::sync::Arc;
use std::time::Duration;

use metrics::counter;
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::application::records::NotifyError;
use crate::application::repos::{BlogListQuery, BlogStore, NewBlogPost, StoreError};
use crate::cache::{BlogCache, keys};
use crate::domain::entities::{AuthorRecord, PostRecord};

#[derive(Debug, Error)]
pub enum BlogError {
    #[error("blog post `{blog_id}` not found")]
    NotFound { blog_id: Uuid },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error(transparent)]
    Notify(#[from] NotifyError),
}

/// A read result annotated with whether it came from the cache.
///
/// `cache_hit` is `false` exactly when the call performed a store read.
#[derive(Debug, Clone, PartialEq)]
pub struct Cached<T> {
    pub data: T,
    pub cache_hit: bool,
}

impl<T> Cached<T> {
    fn hit(data: T) -> Self {
        Self {
            data,
            cache_hit: true,
        }
    }

    fn miss(data: T) -> Self {
        Self {
            data,
            cache_hit: false,
        }
    }
}

/// Cache-aside orchestration over the store, for both author and post
/// resources. Reads check the cache first and write through on miss; the
/// only write that touches the cache is unpublish, which deletes the
/// blog-by-id entry before mutating the row.
pub struct BlogRepository {
    store: Arc<dyn BlogStore>,
    cache: Arc<dyn BlogCache>,
    ttl: Duration,
}

impl BlogRepository {
    pub fn new(store: Arc<dyn BlogStore>, cache: Arc<dyn BlogCache>, ttl: Duration) -> Self {
        Self { store, cache, ttl }
    }

    /// Create a post row, published. List caches are left to expire by TTL;
    /// the staleness window is accepted rather than invalidated.
    pub async fn create_blog(&self, params: NewBlogPost) -> Result<PostRecord, BlogError> {
        debug!(target: "foglio::blog", title = %params.title, "creating blog post");
        let post = self.store.create_post(params).await?;
        debug!(target: "foglio::blog", blog_id = %post.id, "blog post created");
        Ok(post)
    }

    /// Set `published = false` on a post. The id-keyed cache entry is
    /// deleted before the store update so no later read can observe a
    /// cached published snapshot once this returns.
    pub async fn unpublish_blog(&self, blog_id: Uuid) -> Result<PostRecord, BlogError> {
        debug!(target: "foglio::blog", %blog_id, "unpublishing blog post");
        self.cache.delete(&keys::blog(blog_id)).await;

        let updated = self.store.update_post_published(blog_id, false).await?;
        match updated {
            Some(post) => {
                debug!(target: "foglio::blog", %blog_id, "blog post unpublished");
                Ok(post)
            }
            None => Err(BlogError::NotFound { blog_id }),
        }
    }

    pub async fn get_blog(&self, blog_id: Uuid) -> Result<Cached<PostRecord>, BlogError> {
        let key = keys::blog(blog_id);
        if let Some(post) = self.read_cache::<PostRecord>(&key).await {
            record_hit("blog");
            return Ok(Cached::hit(post));
        }
        record_miss("blog");

        let post = self
            .store
            .find_post_by_id(blog_id)
            .await?
            .ok_or(BlogError::NotFound { blog_id })?;
        self.write_cache(&key, &post).await;
        Ok(Cached::miss(post))
    }

    pub async fn get_blogs(&self, query: &BlogListQuery) -> Result<Cached<Vec<PostRecord>>, BlogError> {
        let key = keys::blog_list(query);
        if let Some(posts) = self.read_cache::<Vec<PostRecord>>(&key).await {
            record_hit("blog_list");
            return Ok(Cached::hit(posts));
        }
        record_miss("blog_list");

        let posts = self.store.find_posts(query).await?;
        self.write_cache(&key, &posts).await;
        Ok(Cached::miss(posts))
    }

    pub async fn get_bloggers(&self) -> Result<Cached<Vec<AuthorRecord>>, BlogError> {
        if let Some(authors) = self.read_cache::<Vec<AuthorRecord>>(keys::BLOGGERS).await {
            record_hit("bloggers");
            return Ok(Cached::hit(authors));
        }
        record_miss("bloggers");

        let authors = self.store.find_authors().await?;
        self.write_cache(keys::BLOGGERS, &authors).await;
        Ok(Cached::miss(authors))
    }

    /// Fetch and validate a cached payload. A payload that no longer
    /// deserializes into the expected shape is treated as a miss, never
    /// surfaced to the caller.
    async fn read_cache<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let payload = self.cache.get(key).await?;
        match serde_json::from_str(&payload) {
            Ok(value) => {
                debug!(target: "foglio::blog", key, "cache hit");
                Some(value)
            }
            Err(error) => {
                warn!(target: "foglio::blog", key, %error, "discarding cache payload that failed validation");
                None
            }
        }
    }

    async fn write_cache<T: Serialize>(&self, key: &str, value: &T) {
        match serde_json::to_string(value) {
            Ok(payload) => self.cache.set(key, payload, self.ttl).await,
            Err(error) => {
                warn!(target: "foglio::blog", key, %error, "skipping cache write for unserializable value");
            }
        }
    }
}

fn record_hit(resource: &'static str) {
    counter!("foglio_cache_hit_total", "resource" => resource).increment(1);
}

fn record_miss(resource: &'static str) {
    counter!("foglio_cache_miss_total", "resource" => resource).increment(1);
}
