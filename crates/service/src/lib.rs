//! Service layer for issue-driven post ingestion.
//! - `posts`: domain types, ownership check and the ingest service.
//! - `storage`: JSON file-backed list store.
//! - `event`: trigger event loading.

pub mod errors;
pub mod event;
pub mod ingest;
pub mod posts;
pub mod storage;
