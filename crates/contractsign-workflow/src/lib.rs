//! # ContractSign Workflow
//!
//! The signing stage machine (`Preview -> Create -> Place -> Confirm -> Done`),
//! the controller that feeds user input into it, the submission pipeline that
//! drives the external collaborators, and ready-made collaborator adapters.

pub mod adapters;
pub mod controller;
pub mod session;
pub mod submission;

pub use controller::{ConfirmOutcome, GestureStatus, WorkflowController};
pub use session::{Action, WorkflowSession};
pub use submission::{Collaborators, SubmissionPipeline, SubmissionReceipt};
