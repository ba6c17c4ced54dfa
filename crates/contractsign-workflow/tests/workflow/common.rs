//! Shared fixtures for workflow tests

use std::sync::Arc;

use contractsign_capture::PointerEvent;
use contractsign_core::{
    ContractRecord, DocumentSize, EventBus, EventBusConfig, Signer, ViewportPoint,
};
use contractsign_document::blank_document;
use contractsign_settings::Config;
use contractsign_workflow::adapters::{
    InMemoryBlobStore, InMemoryDocumentRenderer, InMemoryRecordStore, RecordingNotifier,
};
use contractsign_workflow::{Collaborators, GestureStatus, WorkflowController};

pub const CONTRACT: &str = "c-42";
pub const SIGNER_EMAIL: &str = "ada@example.com";

pub fn signer() -> Signer {
    Signer {
        name: "Ada Lovelace".to_string(),
        email: SIGNER_EMAIL.to_string(),
    }
}

/// Capture 200x80, page 1 shown at native size
pub fn config() -> Config {
    let mut config = Config::new();
    config.capture.width = 200;
    config.capture.height = 80;
    config.preview.render_width = 595.0;
    config
}

pub struct Harness {
    pub renderer: Arc<InMemoryDocumentRenderer>,
    pub blobs: Arc<InMemoryBlobStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub records: Arc<InMemoryRecordStore>,
    pub events: Arc<EventBus>,
    pub source: Vec<u8>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_page(DocumentSize::A4)
    }

    pub fn with_page(page: DocumentSize) -> Self {
        let source = blank_document(page, 1).unwrap();
        let renderer = Arc::new(InMemoryDocumentRenderer::new());
        renderer.insert(CONTRACT, source.clone());
        let records = Arc::new(InMemoryRecordStore::new());
        records.insert(ContractRecord::new(CONTRACT, signer()).with_field("amount", "1200"));

        Self {
            renderer,
            blobs: Arc::new(InMemoryBlobStore::new("https://files.example.com")),
            notifier: Arc::new(RecordingNotifier::new()),
            records,
            events: Arc::new(EventBus::with_config(EventBusConfig {
                history_size: 64,
                ..Default::default()
            })),
            source,
        }
    }

    pub fn collaborators(&self) -> Collaborators {
        Collaborators {
            renderer: self.renderer.clone(),
            blobs: self.blobs.clone(),
            notifier: self.notifier.clone(),
            records: self.records.clone(),
        }
    }

    pub async fn open(&self, config: &Config) -> WorkflowController {
        WorkflowController::open(
            CONTRACT.into(),
            self.collaborators(),
            config,
            self.events.clone(),
        )
        .await
        .unwrap()
    }

    /// Open and drive the session up to `Confirm` with a drawn signature at `at`
    pub async fn at_confirm(&self, config: &Config, at: ViewportPoint) -> WorkflowController {
        let mut controller = self.open(config).await;
        controller.confirm_preview().unwrap();
        draw(&mut controller);
        assert_eq!(
            controller.gesture_progress(100.0).unwrap(),
            GestureStatus::Accepted
        );
        controller.place(at).unwrap();
        controller
    }
}

/// A short zig-zag across the surface
pub fn draw(controller: &mut WorkflowController) {
    controller.pointer(PointerEvent::down(20.0, 60.0)).unwrap();
    controller.pointer(PointerEvent::moved(60.0, 20.0)).unwrap();
    controller.pointer(PointerEvent::moved(100.0, 60.0)).unwrap();
    controller.pointer(PointerEvent::up(180.0, 30.0)).unwrap();
}
