use std::sync::Arc;

use async_trait::async_trait;

use crate::application::blog::BlogService;

/// Liveness of the backing store, answered by whatever the deployment
/// wired in (Postgres in production, a stub in router tests).
#[async_trait]
pub trait HealthProbe: Send + Sync {
    async fn healthy(&self) -> bool;
}

#[derive(Clone)]
pub struct AppState {
    pub blog: Arc<BlogService>,
    pub probe: Arc<dyn HealthProbe>,
}
