//! Workflow controller
//!
//! Owns one signing session together with the capture surface and the
//! submission pipeline, and turns user input into session actions. Every
//! method takes `&mut self`; a session is driven from a single logical
//! thread and no operation is re-entrant.

use std::sync::Arc;

use contractsign_capture::{CaptureOutcome, CaptureSurface, Pen, PointerEvent, SurfaceConfig};
use contractsign_core::event_bus::{CaptureEvent, ErrorEvent, StageEvent, SubmissionEvent};
use contractsign_core::{
    ContractId, ContractStatus, Error, EventBus, PlacementPoint, Stage, ViewportPoint,
    ViewportSize, WorkflowError, WorkflowEvent,
};
use contractsign_settings::{Config, PlacementSettings};

use crate::session::{Action, WorkflowSession};
use crate::submission::{Collaborators, SubmissionPipeline, SubmissionReceipt};

/// Result of feeding the confirmation slider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GestureStatus {
    /// Slider moved below 100 %
    Progress(u8),
    /// Signature accepted; session is now in `Place`
    Accepted,
    /// Signature refused; capture restarted in `Create`
    Rejected { message: String },
    /// Gesture already completed for this capture
    Ignored,
}

/// Result of a confirm attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// Every step succeeded; session is `Done`
    Signed(SubmissionReceipt),
    /// A step failed; session stays in `Confirm` and may be retried
    Held { message: String },
}

/// Drives a single signing session
#[derive(Debug)]
pub struct WorkflowController {
    session: WorkflowSession,
    surface: CaptureSurface,
    pipeline: SubmissionPipeline,
    placement: PlacementSettings,
    events: Arc<EventBus>,
}

impl WorkflowController {
    /// Open a session for `contract_id`
    ///
    /// Reads the record once and renders its document. Fails when the
    /// record cannot be read, is already signed, or the document cannot be
    /// rendered.
    pub async fn open(
        contract_id: ContractId,
        collaborators: Collaborators,
        config: &Config,
        events: Arc<EventBus>,
    ) -> Result<Self, Error> {
        let record = collaborators
            .records
            .get_by_id(&contract_id)
            .await
            .map_err(|e| {
                tracing::error!(contract = %contract_id, "Failed to read contract record: {}", e);
                e
            })?;

        if record.status == ContractStatus::Signed {
            tracing::warn!(contract = %contract_id, "Contract already signed");
            return Err(WorkflowError::AlreadySigned {
                id: contract_id.to_string(),
            }
            .into());
        }

        let document = collaborators
            .renderer
            .render(&record, config.preview.render_width)
            .await
            .map_err(|e| {
                tracing::error!(contract = %contract_id, "Failed to render contract: {}", e);
                e
            })?;
        let session = WorkflowSession::new(record, document)?;

        let capture = &config.capture;
        let surface = CaptureSurface::new(SurfaceConfig {
            width: capture.width,
            height: capture.height,
            pen: Pen {
                width: capture.stroke_width,
                color: capture.ink_color,
            },
        });

        tracing::info!(
            contract = %contract_id,
            pages = session.document().page_count,
            transform = %session.transform(),
            "Signing session opened"
        );
        events.publish(WorkflowEvent::Stage(StageEvent::Opened {
            contract_id: contract_id.to_string(),
        }));

        Ok(Self {
            session,
            surface,
            pipeline: SubmissionPipeline::new(
                collaborators,
                config.submission.clone(),
                events.clone(),
            ),
            placement: config.placement.clone(),
            events,
        })
    }

    pub fn stage(&self) -> Stage {
        self.session.stage()
    }

    pub fn session(&self) -> &WorkflowSession {
        &self.session
    }

    /// Capture surface, for drawing the strokes and gesture state
    pub fn surface(&self) -> &CaptureSurface {
        &self.surface
    }

    pub fn last_error(&self) -> Option<&str> {
        self.session.last_error()
    }

    /// Accept the preview and start capturing
    pub fn confirm_preview(&mut self) -> Result<(), WorkflowError> {
        self.transition(Action::ConfirmPreview)?;
        self.begin_capture();
        Ok(())
    }

    /// Forward pointer input to the capture surface
    ///
    /// Capture failures are reported through [`last_error`](Self::last_error)
    /// and never change the stage.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<(), WorkflowError> {
        self.require(Stage::Create, "pointer")?;
        if let Err(e) = self.surface.pointer(event) {
            tracing::warn!("Pointer input rejected: {}", e);
            self.session.set_last_error(Error::from(e).user_message());
        }
        Ok(())
    }

    /// Forward the confirmation slider value
    ///
    /// When the slider completes, a signature with ink advances the session
    /// to `Place`; a blank one keeps it in `Create` and restarts capture.
    pub fn gesture_progress(&mut self, value: f64) -> Result<GestureStatus, WorkflowError> {
        self.require(Stage::Create, "gesture")?;
        let signature = match self.surface.on_gesture_progress(value) {
            Ok(CaptureOutcome::Progress(p)) => return Ok(GestureStatus::Progress(p)),
            Ok(CaptureOutcome::Ignored) => return Ok(GestureStatus::Ignored),
            Ok(CaptureOutcome::Completed(signature)) => signature,
            Err(e) => return Ok(self.reject_capture(Error::from(e))),
        };

        let (width, height) = (signature.width(), signature.height());
        match self.session.apply(Action::SignatureCaptured(signature)) {
            Ok(next) => {
                self.events
                    .publish(WorkflowEvent::Capture(CaptureEvent::Completed { width, height }));
                self.commit(next);
                Ok(GestureStatus::Accepted)
            }
            Err(WorkflowError::EmptySignature) => {
                self.events
                    .publish(WorkflowEvent::Capture(CaptureEvent::Rejected));
                Ok(self.reject_capture(WorkflowError::EmptySignature.into()))
            }
            Err(e) => Err(e),
        }
    }

    /// Slider released before completion
    pub fn release_gesture(&mut self) {
        self.surface.release_gesture();
    }

    /// Default overlay box: bottom-right of the preview, inset by the margin
    pub fn overlay_placement(&self) -> PlacementPoint {
        let preview = self.session.transform().preview_size();
        let size = self.box_size();
        let x = (preview.width - size.width - self.placement.margin).max(0.0);
        let y = (preview.height - size.height - self.placement.margin).max(0.0);
        PlacementPoint::new(ViewportPoint::new(x, y), size)
    }

    /// Drop the signature box with its top-left corner at `point`
    pub fn place(&mut self, point: ViewportPoint) -> Result<PlacementPoint, WorkflowError> {
        let placement = PlacementPoint::new(point, self.box_size());
        if let Err(e) = self.transition(Action::PlacementChosen(placement)) {
            if matches!(e, WorkflowError::PlacementOutOfBounds { .. }) {
                self.session.set_last_error(e.to_string());
            }
            return Err(e);
        }
        self.events
            .publish(WorkflowEvent::Submission(SubmissionEvent::Placed {
                x: point.x,
                y: point.y,
            }));
        Ok(placement)
    }

    /// Run the submission sequence
    ///
    /// Collaborator failures hold the session in `Confirm` and come back as
    /// [`ConfirmOutcome::Held`]; only calling this outside `Confirm` is an
    /// `Err`.
    pub async fn confirm(&mut self) -> Result<ConfirmOutcome, WorkflowError> {
        self.require(Stage::Confirm, "confirm")?;
        self.session.record_confirm_attempt();
        let attempt = self.session.confirm_attempts();

        match self.pipeline.run(&self.session).await {
            Ok(receipt) => {
                self.transition(Action::Submitted(receipt.clone()))?;
                tracing::info!(
                    contract = %self.session.contract_id(),
                    attempt,
                    url = %receipt.document_url,
                    "Contract signed"
                );
                Ok(ConfirmOutcome::Signed(receipt))
            }
            Err(e) => {
                tracing::error!(
                    contract = %self.session.contract_id(),
                    attempt,
                    retryable = e.is_retryable(),
                    "Submission failed: {}",
                    e
                );
                let message = e.user_message();
                self.session.set_last_error(message.clone());
                self.events.publish(WorkflowEvent::Error(ErrorEvent::Held {
                    stage: Stage::Confirm,
                    message: message.clone(),
                }));
                Ok(ConfirmOutcome::Held { message })
            }
        }
    }

    /// Success message, available once the session is `Done`
    pub fn acknowledgment(&self) -> Option<String> {
        self.session.receipt().map(|_| {
            let signer = &self.session.record().signer;
            format!(
                "Thank you, {}. The signed contract has been sent to {}.",
                signer.name, signer.email
            )
        })
    }

    fn box_size(&self) -> ViewportSize {
        ViewportSize::new(self.placement.box_width, self.placement.box_height)
    }

    fn require(&self, stage: Stage, requested: &str) -> Result<(), WorkflowError> {
        match self.stage() {
            current if current == stage => Ok(()),
            Stage::Done => Err(WorkflowError::Finished),
            current => Err(WorkflowError::InvalidTransition {
                current,
                requested: requested.to_string(),
            }),
        }
    }

    fn transition(&mut self, action: Action) -> Result<(), WorkflowError> {
        let next = self.session.apply(action)?;
        self.commit(next);
        Ok(())
    }

    fn commit(&mut self, next: WorkflowSession) {
        let from = self.session.stage();
        let to = next.stage();
        self.session = next;
        tracing::debug!(contract = %self.session.contract_id(), "Stage {} -> {}", from, to);
        self.events.publish(WorkflowEvent::Stage(StageEvent::Changed {
            contract_id: self.session.contract_id().to_string(),
            from,
            to,
        }));
    }

    fn begin_capture(&mut self) {
        self.surface.begin_capture();
        self.events
            .publish(WorkflowEvent::Capture(CaptureEvent::Started));
    }

    fn reject_capture(&mut self, error: Error) -> GestureStatus {
        tracing::warn!("Signature not accepted: {}", error);
        let message = error.user_message();
        self.begin_capture();
        self.session.set_last_error(message.clone());
        self.events.publish(WorkflowEvent::Error(ErrorEvent::Held {
            stage: Stage::Create,
            message: message.clone(),
        }));
        GestureStatus::Rejected { message }
    }
}
