//! Data models for the signing workflow
//!
//! Provides the contract record read from storage, the workflow stage enum
//! and the in-memory signature raster.

mod contract;
mod signature;

pub use contract::{ContractId, ContractPatch, ContractRecord, ContractStatus, Signer};
pub use signature::SignatureImage;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Stage of the signing workflow
///
/// Stages are strictly ordered and only ever advance by one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stage {
    /// Rendered contract shown for review
    Preview,
    /// Signature being drawn
    Create,
    /// Signature being positioned on the page
    Place,
    /// Waiting for the final confirm action
    Confirm,
    /// Signed; nothing left to do
    Done,
}

impl Stage {
    /// All stages in order
    pub const ALL: [Stage; 5] = [
        Stage::Preview,
        Stage::Create,
        Stage::Place,
        Stage::Confirm,
        Stage::Done,
    ];

    /// Zero-based position in the pipeline
    pub fn index(self) -> usize {
        match self {
            Stage::Preview => 0,
            Stage::Create => 1,
            Stage::Place => 2,
            Stage::Confirm => 3,
            Stage::Done => 4,
        }
    }

    /// The stage that follows this one, `None` for `Done`
    pub fn next(self) -> Option<Stage> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Whether this is the terminal stage
    pub fn is_terminal(self) -> bool {
        matches!(self, Stage::Done)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Preview => write!(f, "Preview"),
            Stage::Create => write!(f, "Create"),
            Stage::Place => write!(f, "Place"),
            Stage::Confirm => write!(f, "Confirm"),
            Stage::Done => write!(f, "Done"),
        }
    }
}
