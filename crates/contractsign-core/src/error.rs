//! Error handling for ContractSign
//!
//! Provides error types for every layer of the signing workflow:
//! - Document errors (loading/inspecting the source PDF)
//! - Capture errors (drawing surface and signature raster)
//! - Embed errors (placing the raster into the document)
//! - Persistence errors (upload, notification, record update)
//! - Workflow errors (stage machine guard violations)
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

use crate::data::Stage;

/// Document error type
///
/// Raised when the source document bytes cannot be loaded or inspected.
/// Fatal to the session when it happens at open time.
#[derive(Error, Debug, Clone)]
pub enum DocumentError {
    /// Bytes could not be parsed as a document
    #[error("Failed to load document: {reason}")]
    Load {
        /// The reason the load failed.
        reason: String,
    },

    /// The requested page does not exist
    #[error("Page {page} not found in document")]
    MissingPage {
        /// The 1-based page number.
        page: u32,
    },

    /// The modified document could not be written back out
    #[error("Failed to serialize document: {reason}")]
    Serialize {
        /// The reason serialization failed.
        reason: String,
    },
}

/// Capture error type
///
/// Represents errors raised by the signature drawing surface.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CaptureError {
    /// Pointer device or surface cannot be used for capture
    #[error("Signature capture unavailable: {reason}")]
    Unavailable {
        /// Why capture is unavailable.
        reason: String,
    },

    /// Rasterized surface could not be encoded
    #[error("Failed to encode signature: {reason}")]
    Encode {
        /// The reason encoding failed.
        reason: String,
    },
}

/// Embed error type
///
/// Represents failures embedding the signature raster into the document.
#[derive(Error, Debug, Clone)]
pub enum EmbedError {
    /// Raster bytes could not be decoded as an image
    #[error("Invalid signature image: {reason}")]
    InvalidImage {
        /// The reason decoding failed.
        reason: String,
    },

    /// Raster has no pixels
    #[error("Signature image is empty")]
    EmptyImage,

    /// Target rectangle has no drawable area
    #[error("Invalid signature placement: {reason}")]
    InvalidPlacement {
        /// What is wrong with the rectangle.
        reason: String,
    },
}

/// Persistence error type
///
/// Represents failures of the blob store, notification service and
/// record store collaborators.
#[derive(Error, Debug, Clone)]
pub enum PersistenceError {
    /// Upload of the signed document failed
    #[error("Upload of {key} failed: {reason}")]
    Upload {
        /// Storage key being written.
        key: String,
        /// The reason the upload failed.
        reason: String,
    },

    /// No public address could be produced for a stored object
    #[error("No public address for {key}: {reason}")]
    PublicUrl {
        /// Storage key being resolved.
        key: String,
        /// The reason resolution failed.
        reason: String,
    },

    /// Notification dispatch failed
    #[error("Notification to {recipient} failed: {reason}")]
    Notify {
        /// Recipient address.
        recipient: String,
        /// The reason the dispatch failed.
        reason: String,
    },

    /// Contract record could not be updated
    #[error("Update of contract {id} failed: {reason}")]
    RecordUpdate {
        /// Contract id.
        id: String,
        /// The reason the update failed.
        reason: String,
    },

    /// Contract record does not exist
    #[error("Contract {id} not found")]
    RecordNotFound {
        /// Contract id.
        id: String,
    },

    /// Sequence did not finish in time
    #[error("Submission timed out after {timeout_ms}ms")]
    Timeout {
        /// The timeout duration in milliseconds.
        timeout_ms: u64,
    },

    /// I/O error from a local adapter
    #[error("I/O error: {reason}")]
    Io {
        /// The reason for the I/O error.
        reason: String,
    },
}

/// Workflow error type
///
/// Guard violations of the signing stage machine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum WorkflowError {
    /// Action is not valid in the current stage
    #[error("Invalid transition from {current} on {requested}")]
    InvalidTransition {
        /// The current stage.
        current: Stage,
        /// The requested action name.
        requested: String,
    },

    /// Gesture completed but nothing was drawn
    #[error("Signature is empty")]
    EmptySignature,

    /// Placement click lies outside the rendered page
    #[error("Placement ({x:.1}, {y:.1}) outside page preview {width:.1}x{height:.1}")]
    PlacementOutOfBounds {
        /// Clicked viewport x.
        x: f64,
        /// Clicked viewport y.
        y: f64,
        /// Preview width in pixels.
        width: f64,
        /// Preview height in pixels.
        height: f64,
    },

    /// Contract was already signed
    #[error("Contract {id} is already signed")]
    AlreadySigned {
        /// Contract id.
        id: String,
    },

    /// Session reached its terminal stage
    #[error("Signing session is finished")]
    Finished,
}

/// Main error type for ContractSign
///
/// A unified error type that can represent any error from all layers.
#[derive(Error, Debug)]
pub enum Error {
    /// Document error
    #[error(transparent)]
    Document(#[from] DocumentError),

    /// Capture error
    #[error(transparent)]
    Capture(#[from] CaptureError),

    /// Embed error
    #[error(transparent)]
    Embed(#[from] EmbedError),

    /// Persistence error
    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    /// Workflow error
    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if the user can retry the action that produced this error
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Document(_) => false,
            Error::Workflow(WorkflowError::AlreadySigned { .. } | WorkflowError::Finished) => false,
            Error::Capture(CaptureError::Unavailable { .. }) => false,
            _ => true,
        }
    }

    /// Check if this is a timeout error
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Persistence(PersistenceError::Timeout { .. }))
    }

    /// Message safe to show to the person signing
    ///
    /// Persistence causes are not exposed verbatim.
    pub fn user_message(&self) -> String {
        match self {
            Error::Document(_) => "Cannot preview this contract.".to_string(),
            Error::Workflow(WorkflowError::EmptySignature) => {
                "Please draw your signature before confirming.".to_string()
            }
            Error::Capture(CaptureError::Unavailable { .. }) => {
                "Signature capture is unavailable on this device.".to_string()
            }
            Error::Capture(CaptureError::Encode { .. }) | Error::Embed(_) => {
                "The signature could not be applied. Please try again.".to_string()
            }
            Error::Persistence(_) | Error::Io(_) | Error::Other(_) => {
                "Signing could not be completed. Please try again.".to_string()
            }
            Error::Workflow(e) => e.to_string(),
        }
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
