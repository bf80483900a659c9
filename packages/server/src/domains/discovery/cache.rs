//! File-backed discovery cache
//!
//! The snapshot is stored as pretty-printed JSON. Saves write a sibling temp
//! file and rename it over the target, so readers see the old or the new
//! snapshot, never a partial one.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use crate::domains::discovery::models::DiscoverySnapshot;
use crate::kernel::BaseDiscoveryCache;

#[derive(Debug, Clone)]
pub struct FileDiscoveryCache {
    path: PathBuf,
}

impl FileDiscoveryCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "discovery-cache".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

#[async_trait]
impl BaseDiscoveryCache for FileDiscoveryCache {
    async fn load(&self) -> Result<Option<DiscoverySnapshot>> {
        let bytes = match tokio::fs::read(&self.path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "No discovery cache yet");
                return Ok(None);
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", self.path.display()))
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(snapshot) => Ok(Some(snapshot)),
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Discovery cache is unreadable, ignoring it");
                Ok(None)
            }
        }
    }

    async fn save(&self, snapshot: &DiscoverySnapshot) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }

        let json = serde_json::to_vec_pretty(snapshot).context("Failed to serialize snapshot")?;
        let temp = self.temp_path();

        tokio::fs::write(&temp, &json)
            .await
            .with_context(|| format!("Failed to write {}", temp.display()))?;
        tokio::fs::rename(&temp, &self.path)
            .await
            .with_context(|| format!("Failed to replace {}", self.path.display()))?;

        info!(
            path = %self.path.display(),
            companies = snapshot.companies.len(),
            "Discovery cache saved"
        );
        Ok(())
    }
}
