//! Event type definitions for the event bus.
//!
//! Events are organized by category and are cloneable and serializable so
//! they can be logged or replayed.

use serde::{Deserialize, Serialize};

use crate::data::Stage;

/// Root event enum for all workflow events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorkflowEvent {
    /// Stage machine transitions
    Stage(StageEvent),
    /// Signature capture surface
    Capture(CaptureEvent),
    /// Placement, merge and persistence steps
    Submission(SubmissionEvent),
    /// Error and diagnostic events
    Error(ErrorEvent),
}

impl WorkflowEvent {
    /// Get the category of this event
    pub fn category(&self) -> EventCategory {
        match self {
            WorkflowEvent::Stage(_) => EventCategory::Stage,
            WorkflowEvent::Capture(_) => EventCategory::Capture,
            WorkflowEvent::Submission(_) => EventCategory::Submission,
            WorkflowEvent::Error(_) => EventCategory::Error,
        }
    }

    /// Get a short description of this event for logging
    pub fn description(&self) -> String {
        match self {
            WorkflowEvent::Stage(e) => e.description(),
            WorkflowEvent::Capture(e) => e.description(),
            WorkflowEvent::Submission(e) => e.description(),
            WorkflowEvent::Error(e) => e.description(),
        }
    }
}

/// Event category for filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventCategory {
    /// Stage machine transitions.
    Stage,
    /// Signature capture events.
    Capture,
    /// Merge and persistence events.
    Submission,
    /// Error and diagnostic events.
    Error,
}

impl std::fmt::Display for EventCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventCategory::Stage => write!(f, "Stage"),
            EventCategory::Capture => write!(f, "Capture"),
            EventCategory::Submission => write!(f, "Submission"),
            EventCategory::Error => write!(f, "Error"),
        }
    }
}

/// Stage machine events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StageEvent {
    /// A signing session was opened.
    Opened {
        /// Contract being signed.
        contract_id: String,
    },
    /// The session moved to a new stage.
    Changed {
        /// Contract being signed.
        contract_id: String,
        /// Stage left.
        from: Stage,
        /// Stage entered.
        to: Stage,
    },
}

impl StageEvent {
    fn description(&self) -> String {
        match self {
            StageEvent::Opened { contract_id } => format!("Session opened for {}", contract_id),
            StageEvent::Changed {
                contract_id,
                from,
                to,
            } => format!("{}: {} -> {}", contract_id, from, to),
        }
    }
}

/// Signature capture events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CaptureEvent {
    /// Drawing surface cleared and gesture reset.
    Started,
    /// Confirmation gesture reached 100 % and the surface was read.
    Completed {
        /// Raster width in pixels.
        width: u32,
        /// Raster height in pixels.
        height: u32,
    },
    /// Completed raster had no ink.
    Rejected,
}

impl CaptureEvent {
    fn description(&self) -> String {
        match self {
            CaptureEvent::Started => "Capture started".to_string(),
            CaptureEvent::Completed { width, height } => {
                format!("Signature captured ({}x{})", width, height)
            }
            CaptureEvent::Rejected => "Blank signature rejected".to_string(),
        }
    }
}

/// Placement, merge and persistence events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubmissionEvent {
    /// Signature position chosen on the preview.
    Placed {
        /// Viewport x in pixels.
        x: f64,
        /// Viewport y in pixels.
        y: f64,
    },
    /// Signature merged into the document.
    Merged {
        /// Size of the merged document in bytes.
        bytes: usize,
    },
    /// Signed document stored.
    Uploaded {
        /// Storage key.
        key: String,
    },
    /// Notification sent.
    Notified {
        /// Recipient address.
        recipient: String,
    },
    /// Contract record marked as signed.
    RecordSigned {
        /// Contract id.
        contract_id: String,
    },
}

impl SubmissionEvent {
    fn description(&self) -> String {
        match self {
            SubmissionEvent::Placed { x, y } => format!("Placed at ({:.1}, {:.1})", x, y),
            SubmissionEvent::Merged { bytes } => format!("Merged document ({} bytes)", bytes),
            SubmissionEvent::Uploaded { key } => format!("Uploaded {}", key),
            SubmissionEvent::Notified { recipient } => format!("Notified {}", recipient),
            SubmissionEvent::RecordSigned { contract_id } => {
                format!("Contract {} marked signed", contract_id)
            }
        }
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorSeverity {
    /// Recoverable by retrying or redrawing.
    Recoverable,
    /// Session cannot continue.
    Fatal,
}

/// Error and diagnostic events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ErrorEvent {
    /// A user action was rejected and the stage held.
    Held {
        /// Stage the session stayed in.
        stage: Stage,
        /// User-visible message.
        message: String,
    },
    /// The session cannot continue.
    Fatal {
        /// Human-readable message.
        message: String,
    },
}

impl ErrorEvent {
    fn description(&self) -> String {
        match self {
            ErrorEvent::Held { stage, message } => format!("Held at {}: {}", stage, message),
            ErrorEvent::Fatal { message } => format!("Fatal: {}", message),
        }
    }

    /// Get the severity of this error event
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ErrorEvent::Held { .. } => ErrorSeverity::Recoverable,
            ErrorEvent::Fatal { .. } => ErrorSeverity::Fatal,
        }
    }
}
