//! Posts module: domain, repository and service layers for issue-driven
//! post ingestion.
//!
//! A request arrives as JSON inside an issue body, is checked against the
//! trip key registered for its `user_id`, and is appended to the store.

pub mod domain;
pub mod errors;
pub mod index;
pub mod repository;
pub mod service;

pub use service::PostService;
