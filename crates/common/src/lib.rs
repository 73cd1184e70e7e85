//! Shared runtime plumbing for the ingest workspace: logging setup and
//! filesystem environment helpers.

pub mod env;
pub mod utils;
