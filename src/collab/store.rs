use crate::{HarvestError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use tokio::sync::Mutex;
use tracing::{debug, info};

/// One persisted object: a key and its bytes
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub key: String,
    pub bytes: Vec<u8>,
}

/// Destination for emitted documents
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn put(&self, objects: Vec<StoredObject>) -> Result<()>;
}

/// Writes each object as a file under a root directory
#[derive(Debug, Clone)]
pub struct DirectoryStore {
    root: PathBuf,
}

impl DirectoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Path an object key is written to
    ///
    /// Keys are flattened to a single file name so they cannot escape the root.
    pub fn path_for(&self, key: &str) -> Result<PathBuf> {
        let file_name: String = key
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '\0' => '_',
                c => c,
            })
            .collect();
        let file_name = file_name.trim().trim_start_matches('.');

        if file_name.is_empty() {
            return Err(HarvestError::Store(format!("invalid object key '{}'", key)));
        }

        Ok(self.root.join(file_name))
    }
}

#[async_trait]
impl DocumentStore for DirectoryStore {
    async fn put(&self, objects: Vec<StoredObject>) -> Result<()> {
        tokio::fs::create_dir_all(&self.root).await?;

        let count = objects.len();
        for object in objects {
            let path = self.path_for(&object.key)?;
            debug!("Writing {}", path.display());
            tokio::fs::write(&path, &object.bytes).await?;
        }

        info!("Stored {} objects in {}", count, self.root.display());
        Ok(())
    }
}

/// Keeps objects in memory; used for dry runs
#[derive(Debug, Default)]
pub struct MemoryStore {
    objects: Mutex<Vec<StoredObject>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn objects(&self) -> Vec<StoredObject> {
        self.objects.lock().await.clone()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn put(&self, objects: Vec<StoredObject>) -> Result<()> {
        self.objects.lock().await.extend(objects);
        Ok(())
    }
}
