//! Signing session state.
//!
//! A session only moves forward. Transitions are computed by
//! [`WorkflowSession::apply`], which never modifies the session it is called
//! on; a rejected action leaves the caller holding the previous state.

use contractsign_core::{
    ContractId, ContractRecord, DocumentError, DocumentRect, PlacementPoint, RenderedDocument,
    SignatureImage, Stage, WorkflowError,
};
use contractsign_document::PreviewTransform;

use crate::submission::SubmissionReceipt;

/// User or pipeline input that advances the session
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Preview accepted
    ConfirmPreview,
    /// Gesture completed with this raster
    SignatureCaptured(SignatureImage),
    /// Signature box dropped on the preview
    PlacementChosen(PlacementPoint),
    /// Submission sequence finished
    Submitted(SubmissionReceipt),
}

impl Action {
    /// Short name used in transition errors
    pub fn name(&self) -> &'static str {
        match self {
            Action::ConfirmPreview => "confirm_preview",
            Action::SignatureCaptured(_) => "signature_captured",
            Action::PlacementChosen(_) => "placement_chosen",
            Action::Submitted(_) => "submitted",
        }
    }
}

// Signature exists from Place on, placement from Confirm on.
#[derive(Debug, Clone)]
enum Progress {
    Preview,
    Create,
    Place {
        signature: SignatureImage,
    },
    Confirm {
        signature: SignatureImage,
        placement: PlacementPoint,
    },
    Done {
        signature: SignatureImage,
        placement: PlacementPoint,
        receipt: SubmissionReceipt,
    },
}

/// State of one signing session
#[derive(Debug, Clone)]
pub struct WorkflowSession {
    record: ContractRecord,
    document: RenderedDocument,
    transform: PreviewTransform,
    progress: Progress,
    last_error: Option<String>,
    confirm_attempts: u32,
}

impl WorkflowSession {
    /// Start a session in `Preview` for a rendered document
    ///
    /// Fails when the document has no pages or a degenerate page or preview size.
    pub fn new(record: ContractRecord, document: RenderedDocument) -> Result<Self, DocumentError> {
        if document.page_count == 0 {
            return Err(DocumentError::MissingPage { page: 1 });
        }
        let transform = PreviewTransform::new(document.preview_size, document.page_size)
            .ok_or_else(|| DocumentError::Load {
                reason: format!(
                    "cannot map preview {} onto page {}",
                    document.preview_size, document.page_size
                ),
            })?;
        Ok(Self {
            record,
            document,
            transform,
            progress: Progress::Preview,
            last_error: None,
            confirm_attempts: 0,
        })
    }

    pub fn stage(&self) -> Stage {
        match self.progress {
            Progress::Preview => Stage::Preview,
            Progress::Create => Stage::Create,
            Progress::Place { .. } => Stage::Place,
            Progress::Confirm { .. } => Stage::Confirm,
            Progress::Done { .. } => Stage::Done,
        }
    }

    pub fn record(&self) -> &ContractRecord {
        &self.record
    }

    pub fn contract_id(&self) -> &ContractId {
        &self.record.id
    }

    pub fn document(&self) -> &RenderedDocument {
        &self.document
    }

    pub fn transform(&self) -> &PreviewTransform {
        &self.transform
    }

    /// Captured signature; present from `Place` onwards
    pub fn signature(&self) -> Option<&SignatureImage> {
        match &self.progress {
            Progress::Place { signature }
            | Progress::Confirm { signature, .. }
            | Progress::Done { signature, .. } => Some(signature),
            Progress::Preview | Progress::Create => None,
        }
    }

    /// Chosen placement; present from `Confirm` onwards
    pub fn placement(&self) -> Option<&PlacementPoint> {
        match &self.progress {
            Progress::Confirm { placement, .. } | Progress::Done { placement, .. } => {
                Some(placement)
            }
            _ => None,
        }
    }

    /// Placement mapped into page units
    pub fn document_placement(&self) -> Option<DocumentRect> {
        self.placement()
            .map(|p| self.transform.placement_to_document(p))
    }

    /// Submission result; present only in `Done`
    pub fn receipt(&self) -> Option<&SubmissionReceipt> {
        match &self.progress {
            Progress::Done { receipt, .. } => Some(receipt),
            _ => None,
        }
    }

    /// Message to show the user about the last failure, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// How many times the submission sequence was started
    pub fn confirm_attempts(&self) -> u32 {
        self.confirm_attempts
    }

    pub(crate) fn set_last_error(&mut self, message: impl Into<String>) {
        self.last_error = Some(message.into());
    }

    pub(crate) fn record_confirm_attempt(&mut self) {
        self.confirm_attempts += 1;
    }

    /// Compute the session that results from `action`
    pub fn apply(&self, action: Action) -> Result<Self, WorkflowError> {
        let progress = match (&self.progress, action) {
            (Progress::Done { .. }, _) => return Err(WorkflowError::Finished),
            (Progress::Preview, Action::ConfirmPreview) => Progress::Create,
            (Progress::Create, Action::SignatureCaptured(signature)) => {
                if signature.is_blank() {
                    return Err(WorkflowError::EmptySignature);
                }
                Progress::Place { signature }
            }
            (Progress::Place { signature }, Action::PlacementChosen(placement)) => {
                if !self.transform.contains(placement.origin) {
                    let preview = self.transform.preview_size();
                    return Err(WorkflowError::PlacementOutOfBounds {
                        x: placement.origin.x,
                        y: placement.origin.y,
                        width: preview.width,
                        height: preview.height,
                    });
                }
                Progress::Confirm {
                    signature: signature.clone(),
                    placement,
                }
            }
            (
                Progress::Confirm {
                    signature,
                    placement,
                },
                Action::Submitted(receipt),
            ) => Progress::Done {
                signature: signature.clone(),
                placement: *placement,
                receipt,
            },
            (_, action) => {
                return Err(WorkflowError::InvalidTransition {
                    current: self.stage(),
                    requested: action.name().to_string(),
                })
            }
        };

        Ok(Self {
            record: self.record.clone(),
            document: self.document.clone(),
            transform: self.transform,
            progress,
            last_error: None,
            confirm_attempts: self.confirm_attempts,
        })
    }
}
