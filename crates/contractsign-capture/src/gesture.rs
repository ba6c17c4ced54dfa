//! Slide-to-confirm gesture.
//!
//! The signature is only accepted once a slider has been dragged all the
//! way to 100 %. Completion is reported as a single discrete outcome and the
//! control then locks until it is explicitly reset.

/// Result of feeding a slider value to the gesture
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureUpdate {
    /// Progress changed; value is the clamped percentage
    Progress(u8),
    /// Slider reached 100 % for the first time since the last reset
    Completed,
    /// Gesture is locked; the value was ignored
    Ignored,
}

/// Slide-to-confirm control state
#[derive(Debug, Clone, Default)]
pub struct ConfirmGesture {
    progress: u8,
    locked: bool,
}

impl ConfirmGesture {
    /// Completion threshold
    pub const COMPLETE: u8 = 100;

    /// New gesture at 0 %, unlocked
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to 0 % and unlocked
    pub fn reset(&mut self) {
        self.progress = 0;
        self.locked = false;
    }

    /// Current percentage
    pub fn progress(&self) -> u8 {
        self.progress
    }

    /// Whether completion already fired
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// Feed a slider position; values are clamped to `0..=100`
    ///
    /// Non-finite values are treated as 0.
    pub fn update(&mut self, value: f64) -> GestureUpdate {
        if self.locked {
            return GestureUpdate::Ignored;
        }
        let clamped = if value.is_finite() {
            value.clamp(0.0, f64::from(Self::COMPLETE))
        } else {
            0.0
        };
        // Only an exact 100 completes; 99.6 must not round up into a signature.
        let percent = clamped.floor() as u8;
        self.progress = percent;
        if percent >= Self::COMPLETE {
            self.locked = true;
            GestureUpdate::Completed
        } else {
            GestureUpdate::Progress(percent)
        }
    }

    /// Slider let go before completion snaps back to 0
    pub fn release(&mut self) {
        if !self.locked {
            self.progress = 0;
        }
    }
}
