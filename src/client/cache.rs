//! Durable read-fallback snapshot of the task list.
//!
//! Written after every successful fetch, read only when a fetch fails. It is
//! never merged with live state and never written on mutation.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::storage::TaskRow;

pub struct SnapshotCache {
    path: PathBuf,
}

impl SnapshotCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join("tasks.json"),
        }
    }

    pub fn store(&self, tasks: &[TaskRow]) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string(tasks)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    /// Last snapshot, or `None` if there is none or it cannot be parsed.
    pub fn load(&self) -> Option<Vec<TaskRow>> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&contents) {
            Ok(tasks) => Some(tasks),
            Err(e) => {
                warn!(path = %self.path.display(), err = %e, "discarding unreadable task snapshot");
                None
            }
        }
    }
}
