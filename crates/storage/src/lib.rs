use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use sprout_core::JobResult;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Job id of the listing run; its result lands in [`LINKS_FILE`].
pub const LINKS_JOB_ID: &str = "links";
pub const LINKS_FILE: &str = "links.json";

/// On-disk shape of every output file.
#[derive(Debug, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[async_trait]
pub trait Storage: Send + Sync {
    /// Persists `value` as `{"data": value}` under `file_name`.
    async fn write(&self, file_name: &str, value: &serde_json::Value) -> Result<()>;

    async fn save_result(&self, result: &JobResult) -> Result<()> {
        self.write(&format!("{}.json", result.job_id), &result.output).await
    }
}

pub struct JsonFileStorage {
    pub folder: PathBuf,
}

impl JsonFileStorage {
    pub fn new(folder: impl AsRef<Path>) -> Self {
        let folder = folder.as_ref().to_path_buf();
        std::fs::create_dir_all(&folder).ok(); // ensure folder exists
        Self { folder }
    }

    /// Storage rooted at a subfolder of this one.
    pub fn child(&self, name: &str) -> Self {
        Self::new(self.folder.join(name))
    }

    pub fn path(&self, file_name: &str) -> PathBuf {
        self.folder.join(file_name)
    }

    /// Reads back the `data` field of a file written by [`Storage::write`].
    /// `Ok(None)` when the file does not exist.
    pub async fn read<T: DeserializeOwned>(&self, file_name: &str) -> Result<Option<T>> {
        let path = self.path(file_name);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        let envelope: Envelope<T> = serde_json::from_str(&raw)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(Some(envelope.data))
    }

    pub async fn read_links(&self) -> Result<Option<Vec<String>>> {
        self.read(LINKS_FILE).await
    }
}

#[async_trait]
impl Storage for JsonFileStorage {
    async fn write(&self, file_name: &str, value: &serde_json::Value) -> Result<()> {
        let path = self.path(file_name);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let mut data = serde_json::to_string_pretty(&Envelope { data: value })?;
        data.push('\n');
        tokio::fs::write(&path, data)
            .await
            .with_context(|| format!("writing {}", path.display()))?;
        debug!(path = %path.display(), "wrote output file");
        Ok(())
    }
}
