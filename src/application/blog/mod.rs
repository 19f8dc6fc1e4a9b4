//! Blog read/write orchestration.
//!
//! [`BlogRepository`] owns the cache-aside policy over the store;
//! [`BlogService`] layers the outbound record notification on top of the
//! repository's writes.

mod repository;
mod service;

pub use repository::{BlogError, BlogRepository, Cached};
pub use service::{BlogService, NotifyFailurePolicy};
