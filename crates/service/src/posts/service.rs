use std::sync::Arc;

use tracing::{debug, info, instrument, warn};

use super::domain::{Post, PostRequest, StoredPost};
use super::errors::IngestError;
use super::index::{Ownership, TripKeyIndex};
use super::repository::PostRepository;
use crate::errors::ServiceError;

/// Ingest policy
#[derive(Debug, Clone)]
pub struct IngestPolicy {
    /// When false, any trip key is accepted for any `user_id`.
    pub enforce_trip_key: bool,
}

impl Default for IngestPolicy {
    fn default() -> Self { Self { enforce_trip_key: true } }
}

/// Appends posts to a repository after the trip-key ownership check.
pub struct PostService<R: PostRepository> {
    repo: Arc<R>,
    policy: IngestPolicy,
}

impl<R: PostRepository> PostService<R> {
    pub fn new(repo: Arc<R>, policy: IngestPolicy) -> Self { Self { repo, policy } }

    /// Check ownership of `request.user_id`, append a fresh post and persist
    /// the full list.
    ///
    /// An unreadable store (or one that is not a JSON array) is treated as
    /// empty. Existing records are written back exactly as loaded. A failed
    /// save is returned as an error and nothing is reported as stored.
    ///
    /// # Examples
    /// ```
    /// use service::posts::{service::{PostService, IngestPolicy}, repository::mock::MockPostRepository};
    /// use service::posts::domain::PostRequest;
    /// use std::sync::Arc;
    /// let repo = Arc::new(MockPostRepository::default());
    /// let svc = PostService::new(repo.clone(), IngestPolicy::default());
    /// let req = PostRequest { user_id: "alice".into(), trip_key: "k1".into(), body: "hello".into() };
    /// let post = tokio_test::block_on(svc.submit(req)).unwrap();
    /// assert_eq!(post.user_id, "alice");
    /// assert_eq!(repo.snapshot().len(), 1);
    /// ```
    #[instrument(skip(self, request), fields(user_id = %request.user_id))]
    pub async fn submit(&self, request: PostRequest) -> Result<Post, IngestError> {
        let mut posts = match self.repo.load().await {
            Ok(posts) => posts,
            Err(e) => {
                warn!(error = %e, "failed to load posts; starting with empty list");
                Vec::new()
            }
        };

        if self.policy.enforce_trip_key {
            let ownership = TripKeyIndex::build(&posts).check(&request.user_id, &request.trip_key);
            match ownership {
                Ownership::Mismatched => {
                    warn!("trip key mismatch; rejecting post");
                    return Err(IngestError::TripKeyMismatch { user_id: request.user_id });
                }
                Ownership::Unclaimed => info!("user_id registered"),
                Ownership::Matched => debug!("trip key verified"),
            }
        }

        let post = Post::from_request(request);
        let record = StoredPost::try_from(&post).map_err(|e| ServiceError::Serialization(e.to_string()))?;
        posts.push(record);
        self.repo.save(&posts).await?;
        info!(post_id = %post.id, index = posts.len() - 1, "post_appended");
        Ok(post)
    }
}
