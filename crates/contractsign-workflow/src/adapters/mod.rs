//! Collaborator adapters
//!
//! `memory` keeps everything in process and supports fault injection;
//! `fs` stores documents and records on the local filesystem.

pub mod fs;
pub mod memory;

pub use fs::{FsBlobStore, FsDocumentRenderer, JsonRecordStore, TracingNotifier};
pub use memory::{
    InMemoryBlobStore, InMemoryDocumentRenderer, InMemoryRecordStore, RecordingNotifier,
    SentNotification,
};
