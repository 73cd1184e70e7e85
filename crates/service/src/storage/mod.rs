//! Storage abstractions for service layer
//!
//! File-backed stores that persist small collections as a single JSON
//! document, rewritten in full on every save.

pub mod json_list_store;
