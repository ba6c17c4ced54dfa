//! Filesystem collaborators.
//!
//! Signed documents are written under a root directory and addressed by a
//! configured public base URL. Contract records live in a single JSON file.
//! Notifications are only logged; delivery belongs to an outbound service.

use async_trait::async_trait;
use std::path::{Component, Path, PathBuf};

use contractsign_core::{
    BlobStore, ContractId, ContractPatch, ContractRecord, DocumentError, DocumentRenderer,
    NotificationService, PersistenceError, RecordStore, RenderedDocument, TemplateVariables,
};
use contractsign_settings::StorageSettings;

/// Blob store writing `<root>/<key>`
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
    public_base_url: String,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>, public_base_url: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            public_base_url: public_base_url.into(),
        }
    }

    pub fn from_settings(settings: &StorageSettings) -> Self {
        Self::new(&settings.root, &settings.public_base_url)
    }

    /// Location of `key` on disk; keys may not escape the root
    pub fn path_for(&self, key: &str) -> Option<PathBuf> {
        let relative = Path::new(key);
        let clean = relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));
        (clean && !key.is_empty()).then(|| self.root.join(relative))
    }

    fn resolve(&self, key: &str) -> Result<PathBuf, PersistenceError> {
        self.path_for(key).ok_or_else(|| PersistenceError::Upload {
            key: key.to_string(),
            reason: "key must be a relative path without '..'".to_string(),
        })
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        let path = self.resolve(key)?;
        let upload_err = |e: std::io::Error| PersistenceError::Upload {
            key: key.to_string(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await.map_err(upload_err)?;
        }
        tokio::fs::write(&path, bytes).await.map_err(upload_err)?;
        tracing::debug!("Wrote {}", path.display());
        Ok(())
    }

    async fn public_url_for(&self, key: &str) -> Result<String, PersistenceError> {
        let path = self.resolve(key)?;
        tokio::fs::metadata(&path)
            .await
            .map_err(|e| PersistenceError::PublicUrl {
                key: key.to_string(),
                reason: e.to_string(),
            })?;
        Ok(format!(
            "{}/{}",
            self.public_base_url.trim_end_matches('/'),
            key
        ))
    }
}

/// Record store over a JSON array of records
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
}

impl JsonRecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All records; a missing file is an empty store
    pub async fn load(&self) -> Result<Vec<ContractRecord>, PersistenceError> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => serde_json::from_slice(&bytes).map_err(|e| PersistenceError::Io {
                reason: format!("{}: {}", self.path.display(), e),
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(PersistenceError::Io {
                reason: format!("{}: {}", self.path.display(), e),
            }),
        }
    }

    /// Replace the file contents; written to a sibling file then renamed
    pub async fn store(&self, records: &[ContractRecord]) -> Result<(), PersistenceError> {
        let io_err = |e: String| PersistenceError::Io {
            reason: format!("{}: {}", self.path.display(), e),
        };
        let json = serde_json::to_vec_pretty(records).map_err(|e| io_err(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| io_err(e.to_string()))?;
        }
        let tmp = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp, json)
            .await
            .map_err(|e| io_err(e.to_string()))?;
        tokio::fs::rename(&tmp, &self.path)
            .await
            .map_err(|e| io_err(e.to_string()))
    }
}

#[async_trait]
impl RecordStore for JsonRecordStore {
    async fn get_by_id(&self, id: &ContractId) -> Result<ContractRecord, PersistenceError> {
        self.load()
            .await?
            .into_iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| PersistenceError::RecordNotFound { id: id.to_string() })
    }

    async fn update(&self, id: &ContractId, patch: ContractPatch) -> Result<(), PersistenceError> {
        let mut records = self.load().await?;
        let record = records
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| PersistenceError::RecordNotFound { id: id.to_string() })?;
        record.apply(&patch);
        self.store(&records)
            .await
            .map_err(|e| PersistenceError::RecordUpdate {
                id: id.to_string(),
                reason: e.to_string(),
            })
    }
}

/// Renderer reading `<dir>/<contract-id>.pdf`
#[derive(Debug, Clone)]
pub struct FsDocumentRenderer {
    dir: PathBuf,
}

impl FsDocumentRenderer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// File holding the unsigned document for `id`
    pub fn path_for(&self, id: &ContractId) -> PathBuf {
        self.dir.join(id.storage_key(""))
    }
}

#[async_trait]
impl DocumentRenderer for FsDocumentRenderer {
    async fn render(
        &self,
        record: &ContractRecord,
        render_width: f64,
    ) -> Result<RenderedDocument, DocumentError> {
        let path = self.path_for(&record.id);
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|e| DocumentError::Load {
                reason: format!("{}: {}", path.display(), e),
            })?;
        contractsign_document::render_preview(bytes, render_width)
    }
}

/// Notification service that only logs
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

#[async_trait]
impl NotificationService for TracingNotifier {
    async fn send(
        &self,
        template_id: &str,
        recipient: &str,
        variables: &TemplateVariables,
    ) -> Result<(), PersistenceError> {
        tracing::info!(
            template = template_id,
            recipient = recipient,
            variables = ?variables,
            "Notification queued"
        );
        Ok(())
    }
}
