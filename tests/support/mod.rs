//! In-memory collaborators for exercising the blog core without Postgres
//! or a live records endpoint.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;
use uuid::Uuid;

use foglio::application::blog::{BlogRepository, BlogService, NotifyFailurePolicy};
use foglio::application::records::{
    NotifyError, RecordEvent, RecordReceipt, RecordsNotifier,
};
use foglio::application::repos::{
    BlogListQuery, BlogStore, NewBlogPost, StoreError,
};
use foglio::cache::BlogCache;
use foglio::domain::entities::{AuthorRecord, PostRecord};
use foglio::infra::cache::MemoryCache;
use foglio::infra::http::{AppState, HealthProbe};

pub const TEST_TTL: Duration = Duration::from_millis(60_000);

#[derive(Default)]
pub struct FakeStore {
    pub posts: Mutex<Vec<PostRecord>>,
    pub authors: Mutex<Vec<AuthorRecord>>,
}

impl FakeStore {
    pub async fn seed_author(&self, name: Option<&str>, email: &str) -> AuthorRecord {
        let now = OffsetDateTime::now_utc();
        let author = AuthorRecord {
            id: Uuid::new_v4(),
            name: name.map(str::to_string),
            email: email.to_string(),
            created_at: now,
            updated_at: now,
        };
        self.authors.lock().await.push(author.clone());
        author
    }
}

#[async_trait]
impl BlogStore for FakeStore {
    async fn create_post(&self, params: NewBlogPost) -> Result<PostRecord, StoreError> {
        let now = OffsetDateTime::now_utc();
        let post = PostRecord {
            id: Uuid::new_v4(),
            title: params.title,
            content: params.content,
            published: true,
            created_at: now,
            updated_at: now,
        };
        self.posts.lock().await.push(post.clone());
        Ok(post)
    }

    async fn update_post_published(
        &self,
        id: Uuid,
        published: bool,
    ) -> Result<Option<PostRecord>, StoreError> {
        let mut posts = self.posts.lock().await;
        match posts.iter_mut().find(|post| post.id == id) {
            Some(post) => {
                post.published = published;
                post.updated_at = OffsetDateTime::now_utc();
                Ok(Some(post.clone()))
            }
            None => Ok(None),
        }
    }

    async fn find_post_by_id(&self, id: Uuid) -> Result<Option<PostRecord>, StoreError> {
        let posts = self.posts.lock().await;
        Ok(posts.iter().find(|post| post.id == id).cloned())
    }

    async fn find_posts(&self, query: &BlogListQuery) -> Result<Vec<PostRecord>, StoreError> {
        let posts = self.posts.lock().await;
        Ok(posts
            .iter()
            .filter(|post| query.published.is_none_or(|wanted| post.published == wanted))
            .cloned()
            .collect())
    }

    async fn find_authors(&self) -> Result<Vec<AuthorRecord>, StoreError> {
        Ok(self.authors.lock().await.clone())
    }
}

/// Records every event it receives; flips to failure mode on demand.
#[derive(Default)]
pub struct RecordingNotifier {
    pub events: Mutex<Vec<RecordEvent>>,
    pub fail: AtomicBool,
}

impl RecordingNotifier {
    pub fn fail_next_calls(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    pub async fn recorded(&self) -> Vec<RecordEvent> {
        self.events.lock().await.clone()
    }
}

#[async_trait]
impl RecordsNotifier for RecordingNotifier {
    async fn put_record(&self, event: &RecordEvent) -> Result<RecordReceipt, NotifyError> {
        if self.fail.load(Ordering::SeqCst) {
            return Err(NotifyError::Upstream {
                status: 503,
                message: "records endpoint unavailable".to_string(),
            });
        }
        let mut events = self.events.lock().await;
        events.push(event.clone());
        Ok(RecordReceipt {
            id: format!("record-{}", events.len()),
            message: None,
        })
    }
}

pub struct StubProbe(pub bool);

#[async_trait]
impl HealthProbe for StubProbe {
    async fn healthy(&self) -> bool {
        self.0
    }
}

pub struct TestApp {
    pub store: Arc<FakeStore>,
    pub cache: Arc<MemoryCache>,
    pub notifier: Arc<RecordingNotifier>,
    pub service: Arc<BlogService>,
}

pub fn build_app(policy: NotifyFailurePolicy) -> TestApp {
    let store = Arc::new(FakeStore::default());
    let cache = Arc::new(MemoryCache::new());
    let notifier = Arc::new(RecordingNotifier::default());

    let repository = BlogRepository::new(
        store.clone() as Arc<dyn BlogStore>,
        cache.clone() as Arc<dyn BlogCache>,
        TEST_TTL,
    );
    let service = Arc::new(BlogService::new(
        repository,
        notifier.clone() as Arc<dyn RecordsNotifier>,
        policy,
    ));

    TestApp {
        store,
        cache,
        notifier,
        service,
    }
}

pub fn app_state(app: &TestApp, healthy: bool) -> AppState {
    AppState {
        blog: app.service.clone(),
        probe: Arc::new(StubProbe(healthy)),
    }
}
