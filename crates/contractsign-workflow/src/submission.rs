//! Submission pipeline
//!
//! Runs the fixed confirm sequence against the collaborators:
//!
//! 1. merge the signature into the document
//! 2. upload the merged bytes under the contract's deterministic key
//! 3. resolve the public address of the upload
//! 4. notify the signer, then the internal recipient
//! 5. mark the record signed
//!
//! Steps run strictly one after another. The first failure aborts the rest
//! and nothing already done is rolled back; a retry runs all five again.
//! Upload overwrites, so a retry never leaves two documents behind, but
//! notifications that went out before the failure are sent again.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use contractsign_core::event_bus::SubmissionEvent;
use contractsign_core::{
    BlobStore, ContractPatch, DocumentRenderer, Error, EventBus, NotificationService,
    PersistenceError, RecordStore, TemplateVariables, WorkflowError, WorkflowEvent,
};
use contractsign_settings::SubmissionSettings;

use crate::session::WorkflowSession;

/// Result of a completed submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    /// Key the signed document was stored under
    pub storage_key: String,
    /// Public address sent to recipients
    pub document_url: String,
    /// Recipients notified, in order
    pub notified: Vec<String>,
}

/// External services the workflow drives
#[derive(Clone)]
pub struct Collaborators {
    pub renderer: Arc<dyn DocumentRenderer>,
    pub blobs: Arc<dyn BlobStore>,
    pub notifier: Arc<dyn NotificationService>,
    pub records: Arc<dyn RecordStore>,
}

impl std::fmt::Debug for Collaborators {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Collaborators").finish_non_exhaustive()
    }
}

/// Drives the confirm sequence for a session in `Confirm`
#[derive(Debug, Clone)]
pub struct SubmissionPipeline {
    collaborators: Collaborators,
    settings: SubmissionSettings,
    events: Arc<EventBus>,
}

impl SubmissionPipeline {
    pub fn new(
        collaborators: Collaborators,
        settings: SubmissionSettings,
        events: Arc<EventBus>,
    ) -> Self {
        Self {
            collaborators,
            settings,
            events,
        }
    }

    pub fn collaborators(&self) -> &Collaborators {
        &self.collaborators
    }

    pub fn settings(&self) -> &SubmissionSettings {
        &self.settings
    }

    /// Run the sequence, bounded by the configured timeout if there is one
    ///
    /// Expiry abandons the in-flight step and yields
    /// [`PersistenceError::Timeout`]; steps already completed stay done.
    pub async fn run(&self, session: &WorkflowSession) -> Result<SubmissionReceipt, Error> {
        match self.settings.timeout_ms {
            Some(timeout_ms) => {
                tokio::time::timeout(Duration::from_millis(timeout_ms), self.submit(session))
                    .await
                    .map_err(|_| PersistenceError::Timeout { timeout_ms })?
            }
            None => self.submit(session).await,
        }
    }

    /// Run the sequence without a time limit
    pub async fn submit(&self, session: &WorkflowSession) -> Result<SubmissionReceipt, Error> {
        let (signature, placement) = match (session.signature(), session.document_placement()) {
            (Some(signature), Some(placement)) => (signature, placement),
            _ => {
                return Err(WorkflowError::InvalidTransition {
                    current: session.stage(),
                    requested: "submit".to_string(),
                }
                .into())
            }
        };
        let record = session.record();
        let id = &record.id;

        let merged = contractsign_document::merge(&session.document().bytes, signature, &placement)?;
        tracing::debug!(contract = %id, bytes = merged.len(), "Signature merged");
        self.publish(SubmissionEvent::Merged {
            bytes: merged.len(),
        });

        let key = id.storage_key(&self.settings.key_prefix);
        self.collaborators.blobs.put(&key, merged).await?;
        tracing::info!(contract = %id, key = %key, "Signed document uploaded");
        self.publish(SubmissionEvent::Uploaded { key: key.clone() });

        let document_url = self.collaborators.blobs.public_url_for(&key).await?;

        let mut variables = TemplateVariables::new();
        variables.insert("contract_id".to_string(), id.to_string());
        variables.insert("signer_name".to_string(), record.signer.name.clone());
        variables.insert("document_url".to_string(), document_url.clone());

        let recipients = [
            (&self.settings.signer_template, &record.signer.email),
            (
                &self.settings.internal_template,
                &self.settings.internal_recipient,
            ),
        ];
        let mut notified = Vec::with_capacity(recipients.len());
        for (template, recipient) in recipients {
            self.collaborators
                .notifier
                .send(template, recipient, &variables)
                .await?;
            tracing::info!(contract = %id, recipient = %recipient, "Notification sent");
            self.publish(SubmissionEvent::Notified {
                recipient: recipient.clone(),
            });
            notified.push(recipient.clone());
        }

        self.collaborators
            .records
            .update(id, ContractPatch::signed())
            .await?;
        tracing::info!(contract = %id, "Contract marked signed");
        self.publish(SubmissionEvent::RecordSigned {
            contract_id: id.to_string(),
        });

        Ok(SubmissionReceipt {
            storage_key: key,
            document_url,
            notified,
        })
    }

    fn publish(&self, event: SubmissionEvent) {
        self.events.publish(WorkflowEvent::Submission(event));
    }
}
