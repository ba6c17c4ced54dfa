//! # ContractSign Core
//!
//! Core types, traits, and events for the contract e-signature workflow.
//! Provides the contract data model, the viewport and document unit types,
//! the error taxonomy, the collaborator service traits and the event bus.

pub mod data;
pub mod error;
pub mod event_bus;
pub mod services;
pub mod units;

pub use data::{
    ContractId, ContractPatch, ContractRecord, ContractStatus, SignatureImage, Signer, Stage,
};

pub use error::{
    CaptureError, DocumentError, EmbedError, Error, PersistenceError, Result, WorkflowError,
};

pub use event_bus::{
    event_bus, EventBus, EventBusConfig, EventCategory, EventFilter, SubscriptionId, WorkflowEvent,
};

pub use services::{
    BlobStore, DocumentRenderer, NotificationService, RecordStore, RenderedDocument,
    TemplateVariables,
};

pub use units::{
    DocumentPoint, DocumentRect, DocumentSize, PlacementPoint, ViewportPoint, ViewportSize,
};
