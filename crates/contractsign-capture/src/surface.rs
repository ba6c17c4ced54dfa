//! Signature capture surface
//!
//! A fixed-size drawing area fed with pointer events. Acceptance is gated
//! behind the slide-to-confirm gesture: the drawing is read out as a raster
//! exactly once per capture session, when the gesture first reaches 100 %.
//! The surface never judges whether the raster contains ink.

use contractsign_core::{CaptureError, SignatureImage};

use crate::gesture::{ConfirmGesture, GestureUpdate};
use crate::pointer::{PointerEvent, PointerKind, PointerPhase, Stroke};
use crate::raster::{rasterize, Pen};

/// Surface dimensions and pen
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceConfig {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Pen used for every stroke.
    pub pen: Pen,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            width: 600,
            height: 200,
            pen: Pen::default(),
        }
    }
}

/// Outcome of a gesture progress update
#[derive(Debug, Clone, PartialEq)]
pub enum CaptureOutcome {
    /// Progress indicator moved; no effect on the signature
    Progress(u8),
    /// Gesture completed; the surface was read out
    Completed(SignatureImage),
    /// Gesture locked or capture not started
    Ignored,
}

/// Pointer-tracked drawing surface
#[derive(Debug, Clone)]
pub struct CaptureSurface {
    config: SurfaceConfig,
    strokes: Vec<Stroke>,
    active: Option<Stroke>,
    gesture: ConfirmGesture,
    unavailable: Option<String>,
    session: u64,
}

impl CaptureSurface {
    /// Create an idle surface; call [`begin_capture`](Self::begin_capture) before drawing
    pub fn new(config: SurfaceConfig) -> Self {
        Self {
            config,
            strokes: Vec::new(),
            active: None,
            gesture: ConfirmGesture::new(),
            unavailable: None,
            session: 0,
        }
    }

    /// Surface configuration
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// Clear strokes and reset the gesture to 0 %
    pub fn begin_capture(&mut self) {
        self.strokes.clear();
        self.active = None;
        self.gesture.reset();
        self.unavailable = None;
        self.session += 1;
        tracing::debug!(session = self.session, "Signature capture started");
    }

    /// Number of `begin_capture` calls so far
    pub fn session(&self) -> u64 {
        self.session
    }

    /// Why capture is unavailable, if it is
    pub fn unavailable_reason(&self) -> Option<&str> {
        self.unavailable.as_deref()
    }

    /// Completed strokes plus the one in progress
    pub fn strokes(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter().chain(self.active.iter())
    }

    /// Current gesture percentage
    pub fn gesture_progress(&self) -> u8 {
        self.gesture.progress()
    }

    /// Whether the gesture fired and the surface is locked
    pub fn is_locked(&self) -> bool {
        self.gesture.is_locked()
    }

    /// Feed a pointer event
    ///
    /// Points are clamped to the surface. Input after the gesture locked is
    /// ignored. An unsupported device marks capture unavailable until the
    /// next `begin_capture`.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<(), CaptureError> {
        if event.kind == PointerKind::Unsupported {
            let reason = "unsupported pointer device".to_string();
            tracing::warn!("Signature capture unavailable: {}", reason);
            self.active = None;
            self.unavailable = Some(reason.clone());
            return Err(CaptureError::Unavailable { reason });
        }
        if let Some(reason) = &self.unavailable {
            return Err(CaptureError::Unavailable {
                reason: reason.clone(),
            });
        }
        if self.session == 0 || self.gesture.is_locked() {
            return Ok(());
        }

        let x = clamp_coord(event.x, self.config.width);
        let y = clamp_coord(event.y, self.config.height);
        match event.phase {
            PointerPhase::Down => {
                if let Some(stroke) = self.active.take() {
                    self.strokes.push(stroke);
                }
                self.active = Some(Stroke::starting_at(x, y));
            }
            PointerPhase::Move => {
                if let Some(stroke) = self.active.as_mut() {
                    stroke.push(x, y);
                }
            }
            PointerPhase::Up | PointerPhase::Cancel => {
                if let Some(mut stroke) = self.active.take() {
                    if event.phase == PointerPhase::Up {
                        stroke.push(x, y);
                    }
                    self.strokes.push(stroke);
                }
            }
        }
        Ok(())
    }

    /// Feed the confirmation slider value
    ///
    /// Below 100 only the progress indicator changes. The first value that
    /// reaches 100 reads the surface and returns the raster; the gesture is
    /// then locked and later calls return [`CaptureOutcome::Ignored`].
    pub fn on_gesture_progress(&mut self, value: f64) -> Result<CaptureOutcome, CaptureError> {
        if self.session == 0 {
            return Ok(CaptureOutcome::Ignored);
        }
        match self.gesture.update(value) {
            GestureUpdate::Progress(p) => Ok(CaptureOutcome::Progress(p)),
            GestureUpdate::Ignored => Ok(CaptureOutcome::Ignored),
            GestureUpdate::Completed => self.on_gesture_complete().map(CaptureOutcome::Completed),
        }
    }

    /// Slider released before completion
    pub fn release_gesture(&mut self) {
        self.gesture.release();
    }

    fn on_gesture_complete(&mut self) -> Result<SignatureImage, CaptureError> {
        if let Some(stroke) = self.active.take() {
            self.strokes.push(stroke);
        }
        let image = self.rasterize();
        let signature = SignatureImage::from_rgba(&image)?;
        tracing::info!(
            session = self.session,
            strokes = self.strokes.len(),
            "Signature gesture completed"
        );
        Ok(signature)
    }

    /// Render the current drawing without affecting the gesture
    pub fn rasterize(&self) -> image::RgbaImage {
        let strokes: Vec<Stroke> = self.strokes().cloned().collect();
        rasterize(&strokes, self.config.width, self.config.height, &self.config.pen)
    }
}

fn clamp_coord(value: f32, extent: u32) -> f32 {
    if !value.is_finite() {
        return 0.0;
    }
    value.clamp(0.0, extent.saturating_sub(1) as f32)
}
