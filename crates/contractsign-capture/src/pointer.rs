//! Pointer input and stroke storage.

use serde::{Deserialize, Serialize};

/// Kind of device that produced a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    /// Mouse or trackpad
    Mouse,
    /// Stylus
    Pen,
    /// Finger on a touch screen
    Touch,
    /// Anything the surface cannot draw with
    Unsupported,
}

/// Phase of a pointer interaction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Contact started
    Down,
    /// Contact moved
    Move,
    /// Contact ended
    Up,
    /// Contact cancelled by the platform
    Cancel,
}

/// A pointer event in surface pixel coordinates (origin top-left)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Interaction phase.
    pub phase: PointerPhase,
    /// Device kind.
    pub kind: PointerKind,
    /// Horizontal position in surface pixels.
    pub x: f32,
    /// Vertical position in surface pixels.
    pub y: f32,
}

impl PointerEvent {
    /// Mouse-down at `(x, y)`
    pub fn down(x: f32, y: f32) -> Self {
        Self::mouse(PointerPhase::Down, x, y)
    }

    /// Mouse-move to `(x, y)`
    pub fn moved(x: f32, y: f32) -> Self {
        Self::mouse(PointerPhase::Move, x, y)
    }

    /// Mouse-up at `(x, y)`
    pub fn up(x: f32, y: f32) -> Self {
        Self::mouse(PointerPhase::Up, x, y)
    }

    fn mouse(phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            phase,
            kind: PointerKind::Mouse,
            x,
            y,
        }
    }

    /// Same event reported by a different device kind
    pub fn with_kind(mut self, kind: PointerKind) -> Self {
        self.kind = kind;
        self
    }
}

/// One continuous pen-down to pen-up trace
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    points: Vec<(f32, f32)>,
}

impl Stroke {
    /// Start a stroke at a point
    pub fn starting_at(x: f32, y: f32) -> Self {
        Self {
            points: vec![(x, y)],
        }
    }

    /// Extend the stroke, skipping exact repeats of the last point
    pub fn push(&mut self, x: f32, y: f32) {
        if self.points.last() != Some(&(x, y)) {
            self.points.push((x, y));
        }
    }

    /// Recorded points
    pub fn points(&self) -> &[(f32, f32)] {
        &self.points
    }

    /// True for a tap with no movement
    pub fn is_dot(&self) -> bool {
        self.points.len() == 1
    }
}
