use std::path::PathBuf;

use async_trait::async_trait;

use super::domain::StoredPost;
use crate::errors::ServiceError;
use crate::storage::json_list_store::JsonListStore;

/// Repository abstraction over the persisted post list.
///
/// The list is always read and written whole; `save` replaces whatever was
/// stored before. `load` fails only when the store as a whole is unusable
/// (unreadable, or not a JSON array); individual records are never rejected.
#[async_trait]
pub trait PostRepository: Send + Sync {
    async fn load(&self) -> Result<Vec<StoredPost>, ServiceError>;
    async fn save(&self, posts: &[StoredPost]) -> Result<(), ServiceError>;
}

/// Post list kept in a single JSON array file.
#[derive(Clone)]
pub struct FilePostRepository {
    store: JsonListStore<StoredPost>,
}

impl FilePostRepository {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { store: JsonListStore::new(path) }
    }
}

#[async_trait]
impl PostRepository for FilePostRepository {
    async fn load(&self) -> Result<Vec<StoredPost>, ServiceError> { self.store.load().await }
    async fn save(&self, posts: &[StoredPost]) -> Result<(), ServiceError> { self.store.save(posts).await }
}

/// Simple in-memory mock repository for tests and doc examples
pub mod mock {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    pub struct MockPostRepository {
        posts: Mutex<Vec<StoredPost>>,
        fail_load: bool,
        fail_save: bool,
        saves: AtomicUsize,
    }

    impl MockPostRepository {
        pub fn with_posts(posts: Vec<StoredPost>) -> Self {
            Self { posts: Mutex::new(posts), ..Default::default() }
        }

        /// Every `load` fails; stored posts are still kept for inspection.
        pub fn failing_load(mut self) -> Self {
            self.fail_load = true;
            self
        }

        /// Every `save` fails and leaves the stored posts untouched.
        pub fn failing_save(mut self) -> Self {
            self.fail_save = true;
            self
        }

        pub fn snapshot(&self) -> Vec<StoredPost> {
            self.posts.lock().unwrap().clone()
        }

        pub fn save_count(&self) -> usize {
            self.saves.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PostRepository for MockPostRepository {
        async fn load(&self) -> Result<Vec<StoredPost>, ServiceError> {
            if self.fail_load {
                return Err(ServiceError::Serialization("mock: unreadable store".into()));
            }
            Ok(self.posts.lock().unwrap().clone())
        }

        async fn save(&self, posts: &[StoredPost]) -> Result<(), ServiceError> {
            if self.fail_save {
                return Err(ServiceError::Io("mock: read-only store".into()));
            }
            *self.posts.lock().unwrap() = posts.to_vec();
            self.saves.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }
}
