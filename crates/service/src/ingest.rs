//! One ingest invocation: event file -> validated request -> stored post.

use std::path::Path;

use tracing::instrument;

use crate::event::TriggerEvent;
use crate::posts::domain::{Post, PostRequest};
use crate::posts::errors::IngestError;
use crate::posts::repository::PostRepository;
use crate::posts::PostService;

/// Read the event at `event_path`, validate the payload in its issue body and
/// submit it. Nothing is written unless every check passes.
#[instrument(skip_all, fields(event_path = %event_path.display()))]
pub async fn ingest_event<R: PostRepository>(svc: &PostService<R>, event_path: &Path) -> Result<Post, IngestError> {
    let event = TriggerEvent::load(event_path).await?;
    let request = PostRequest::from_issue_body(event.issue_body())?;
    svc.submit(request).await
}
