//! In-memory collaborators.
//!
//! Each store can be told to fail its next N calls, which is how retry and
//! hold behaviour is exercised without a network.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use contractsign_core::{
    BlobStore, ContractId, ContractPatch, ContractRecord, DocumentError, DocumentRenderer,
    NotificationService, PersistenceError, RecordStore, RenderedDocument, TemplateVariables,
};

/// Counts down injected failures; true while one should be produced
#[derive(Debug, Default)]
struct FailureBudget(AtomicUsize);

impl FailureBudget {
    fn set(&self, count: usize) {
        self.0.store(count, Ordering::SeqCst);
    }

    fn take(&self) -> bool {
        self.0
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

/// Documents keyed by contract id
#[derive(Debug, Default)]
pub struct InMemoryDocumentRenderer {
    documents: RwLock<BTreeMap<ContractId, Arc<[u8]>>>,
}

impl InMemoryDocumentRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the unsigned document for a contract
    pub fn insert(&self, id: impl Into<ContractId>, bytes: impl Into<Arc<[u8]>>) {
        self.documents.write().insert(id.into(), bytes.into());
    }
}

#[async_trait]
impl DocumentRenderer for InMemoryDocumentRenderer {
    async fn render(
        &self,
        record: &ContractRecord,
        render_width: f64,
    ) -> Result<RenderedDocument, DocumentError> {
        let bytes = self
            .documents
            .read()
            .get(&record.id)
            .cloned()
            .ok_or_else(|| DocumentError::Load {
                reason: format!("no document for contract {}", record.id),
            })?;
        contractsign_document::render_preview(bytes, render_width)
    }
}

/// Blob store backed by a map
#[derive(Debug)]
pub struct InMemoryBlobStore {
    base_url: String,
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
    puts: AtomicUsize,
    failing_puts: FailureBudget,
}

impl InMemoryBlobStore {
    /// Public URLs are `{base_url}/{key}`
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            objects: RwLock::new(BTreeMap::new()),
            puts: AtomicUsize::new(0),
            failing_puts: FailureBudget::default(),
        }
    }

    /// Make the next `count` uploads fail
    pub fn fail_next_puts(&self, count: usize) {
        self.failing_puts.set(count);
    }

    /// Stored object
    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().get(key).cloned()
    }

    /// Number of stored objects
    pub fn len(&self) -> usize {
        self.objects.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.read().is_empty()
    }

    /// Upload attempts, failed ones included
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }
}

impl Default for InMemoryBlobStore {
    fn default() -> Self {
        Self::new("memory://blobs")
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        if self.failing_puts.take() {
            return Err(PersistenceError::Upload {
                key: key.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.objects.write().insert(key.to_string(), bytes);
        Ok(())
    }

    async fn public_url_for(&self, key: &str) -> Result<String, PersistenceError> {
        if !self.objects.read().contains_key(key) {
            return Err(PersistenceError::PublicUrl {
                key: key.to_string(),
                reason: "no such object".to_string(),
            });
        }
        Ok(format!("{}/{}", self.base_url.trim_end_matches('/'), key))
    }
}

/// One delivered notification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentNotification {
    pub template_id: String,
    pub recipient: String,
    pub variables: TemplateVariables,
}

/// Notification service that records what it was asked to send
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    sent: RwLock<Vec<SentNotification>>,
    failing: FailureBudget,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `count` sends fail
    pub fn fail_next(&self, count: usize) {
        self.failing.set(count);
    }

    /// Successful sends, oldest first
    pub fn sent(&self) -> Vec<SentNotification> {
        self.sent.read().clone()
    }
}

#[async_trait]
impl NotificationService for RecordingNotifier {
    async fn send(
        &self,
        template_id: &str,
        recipient: &str,
        variables: &TemplateVariables,
    ) -> Result<(), PersistenceError> {
        if self.failing.take() {
            return Err(PersistenceError::Notify {
                recipient: recipient.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        self.sent.write().push(SentNotification {
            template_id: template_id.to_string(),
            recipient: recipient.to_string(),
            variables: variables.clone(),
        });
        Ok(())
    }
}

/// Record store backed by a map; keeps a log of applied patches
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<BTreeMap<ContractId, ContractRecord>>,
    updates: RwLock<Vec<(ContractId, ContractPatch)>>,
    failing_updates: FailureBudget,
}

impl InMemoryRecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, record: ContractRecord) {
        self.records.write().insert(record.id.clone(), record);
    }

    pub fn get(&self, id: &ContractId) -> Option<ContractRecord> {
        self.records.read().get(id).cloned()
    }

    /// Make the next `count` updates fail
    pub fn fail_next_updates(&self, count: usize) {
        self.failing_updates.set(count);
    }

    /// Successfully applied patches, oldest first
    pub fn updates(&self) -> Vec<(ContractId, ContractPatch)> {
        self.updates.read().clone()
    }
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn get_by_id(&self, id: &ContractId) -> Result<ContractRecord, PersistenceError> {
        self.get(id).ok_or_else(|| PersistenceError::RecordNotFound {
            id: id.to_string(),
        })
    }

    async fn update(&self, id: &ContractId, patch: ContractPatch) -> Result<(), PersistenceError> {
        if self.failing_updates.take() {
            return Err(PersistenceError::RecordUpdate {
                id: id.to_string(),
                reason: "injected failure".to_string(),
            });
        }
        let mut records = self.records.write();
        let record = records
            .get_mut(id)
            .ok_or_else(|| PersistenceError::RecordNotFound { id: id.to_string() })?;
        record.apply(&patch);
        self.updates.write().push((id.clone(), patch));
        Ok(())
    }
}
