use std::str::FromStr;
use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

use crate::application::blog::repository::{BlogError, BlogRepository, Cached};
use crate::application::records::{RecordEvent, RecordKind, RecordsNotifier};
use crate::application::repos::{BlogListQuery, NewBlogPost};
use crate::domain::entities::{AuthorRecord, PostRecord};

/// What to do when the record notification fails after the store write
/// already committed. `Log` keeps the write result Ok and warns;
/// `Propagate` surfaces the notify error to the caller. Neither rolls the
/// write back.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotifyFailurePolicy {
    #[default]
    Log,
    Propagate,
}

impl FromStr for NotifyFailurePolicy {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "log" => Ok(Self::Log),
            "propagate" => Ok(Self::Propagate),
            other => Err(format!(
                "unknown notify failure policy `{other}` (expected `log` or `propagate`)"
            )),
        }
    }
}

/// Write orchestration above [`BlogRepository`]: each successful mutation
/// publishes a record event, strictly after the store write. Reads pass
/// through untouched.
pub struct BlogService {
    repository: BlogRepository,
    notifier: Arc<dyn RecordsNotifier>,
    notify_policy: NotifyFailurePolicy,
}

impl BlogService {
    pub fn new(
        repository: BlogRepository,
        notifier: Arc<dyn RecordsNotifier>,
        notify_policy: NotifyFailurePolicy,
    ) -> Self {
        Self {
            repository,
            notifier,
            notify_policy,
        }
    }

    pub async fn create_blog(&self, params: NewBlogPost) -> Result<PostRecord, BlogError> {
        let post = self.repository.create_blog(params).await?;
        self.notify(RecordKind::Create, &post).await?;
        Ok(post)
    }

    pub async fn unpublish_blog(&self, blog_id: Uuid) -> Result<PostRecord, BlogError> {
        let post = self.repository.unpublish_blog(blog_id).await?;
        self.notify(RecordKind::Delete, &post).await?;
        Ok(post)
    }

    pub async fn get_blog(&self, blog_id: Uuid) -> Result<Cached<PostRecord>, BlogError> {
        self.repository.get_blog(blog_id).await
    }

    pub async fn get_blogs(
        &self,
        query: &BlogListQuery,
    ) -> Result<Cached<Vec<PostRecord>>, BlogError> {
        self.repository.get_blogs(query).await
    }

    pub async fn get_bloggers(&self) -> Result<Cached<Vec<AuthorRecord>>, BlogError> {
        self.repository.get_bloggers().await
    }

    async fn notify(&self, kind: RecordKind, post: &PostRecord) -> Result<(), BlogError> {
        counter!("foglio_records_attempt_total").increment(1);
        let data = match serde_json::to_string(post) {
            Ok(data) => data,
            Err(error) => {
                warn!(target: "foglio::blog", blog_id = %post.id, %error, "record payload failed to serialize");
                return Ok(());
            }
        };

        let event = RecordEvent { kind, data };
        match self.notifier.put_record(&event).await {
            Ok(receipt) => {
                info!(target: "foglio::blog", blog_id = %post.id, record_id = %receipt.id, ?kind, "record published");
                Ok(())
            }
            Err(error) => {
                counter!("foglio_records_failure_total").increment(1);
                match self.notify_policy {
                    NotifyFailurePolicy::Log => {
                        warn!(target: "foglio::blog", blog_id = %post.id, %error, ?kind, "record notification failed");
                        Ok(())
                    }
                    NotifyFailurePolicy::Propagate => Err(BlogError::Notify(error)),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn policy_parses_known_values() {
        assert_eq!(
            "log".parse::<NotifyFailurePolicy>(),
            Ok(NotifyFailurePolicy::Log)
        );
        assert_eq!(
            "propagate".parse::<NotifyFailurePolicy>(),
            Ok(NotifyFailurePolicy::Propagate)
        );
    }

    #[test]
    fn policy_rejects_unknown_values() {
        assert!("retry".parse::<NotifyFailurePolicy>().is_err());
    }
}
