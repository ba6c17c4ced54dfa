//! Collaborator interfaces
//!
//! The workflow drives these services but does not implement them. Each is
//! an async trait so adapters can sit on top of remote APIs; callers await
//! them one at a time.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::data::{ContractId, ContractPatch, ContractRecord};
use crate::error::{DocumentError, PersistenceError};
use crate::units::{DocumentSize, ViewportSize};

/// Variables substituted into a notification template
pub type TemplateVariables = BTreeMap<String, String>;

/// A document ready for display and signing
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    /// Source document bytes; shared, never mutated
    pub bytes: Arc<[u8]>,
    /// Number of pages
    pub page_count: u32,
    /// Native size of page 1 in document units
    pub page_size: DocumentSize,
    /// Pixel size of page 1 as displayed
    pub preview_size: ViewportSize,
}

/// Turns a contract record into a displayable document
#[async_trait]
pub trait DocumentRenderer: Send + Sync {
    /// Render the record's document with page 1 displayed `render_width` pixels wide
    async fn render(
        &self,
        record: &ContractRecord,
        render_width: f64,
    ) -> Result<RenderedDocument, DocumentError>;
}

/// Object storage for signed documents
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store bytes under `key`, overwriting any existing object
    async fn put(&self, key: &str, bytes: Vec<u8>) -> Result<(), PersistenceError>;

    /// Durable, externally fetchable address for `key`
    async fn public_url_for(&self, key: &str) -> Result<String, PersistenceError>;
}

/// Outbound notification delivery
#[async_trait]
pub trait NotificationService: Send + Sync {
    /// Send `template_id` to `recipient`
    async fn send(
        &self,
        template_id: &str,
        recipient: &str,
        variables: &TemplateVariables,
    ) -> Result<(), PersistenceError>;
}

/// Contract record storage
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Fetch a record by id
    async fn get_by_id(&self, id: &ContractId) -> Result<ContractRecord, PersistenceError>;

    /// Apply a partial update
    async fn update(&self, id: &ContractId, patch: ContractPatch) -> Result<(), PersistenceError>;
}
