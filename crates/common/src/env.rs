//! Environment/runtime helpers
//!
//! Filesystem preparation needed before the store file can be written.

use std::path::Path;

use tracing::debug;

/// Ensure the parent directory of `file` exists, creating it (and any
/// missing ancestors) when needed. Paths without a parent are a no-op.
pub async fn ensure_parent_dir(file: &Path) -> anyhow::Result<()> {
    let Some(parent) = file.parent() else { return Ok(()) };
    if parent.as_os_str().is_empty() {
        return Ok(());
    }
    if tokio::fs::metadata(parent).await.is_err() {
        debug!(dir = %parent.display(), "creating data directory");
    }
    tokio::fs::create_dir_all(parent)
        .await
        .map_err(|e| anyhow::anyhow!("cannot create {}: {e}", parent.display()))?;
    Ok(())
}
