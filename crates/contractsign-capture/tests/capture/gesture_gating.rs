//! Slide-to-confirm gating on the capture surface

use contractsign_capture::{CaptureOutcome, CaptureSurface, PointerEvent, SurfaceConfig};
use proptest::prelude::*;

fn started() -> CaptureSurface {
    let mut surface = CaptureSurface::new(SurfaceConfig {
        width: 120,
        height: 40,
        ..Default::default()
    });
    surface.begin_capture();
    surface
}

proptest! {
    #[test]
    fn values_below_full_never_emit(values in prop::collection::vec(-50.0f64..99.999, 0..40)) {
        let mut surface = started();
        for value in values {
            let outcome = surface.on_gesture_progress(value).unwrap();
            prop_assert!(matches!(outcome, CaptureOutcome::Progress(p) if p < 100));
        }
        prop_assert!(!surface.is_locked());
    }

    #[test]
    fn emits_at_most_once_per_session(values in prop::collection::vec(0.0f64..=150.0, 1..60)) {
        let mut surface = started();
        let completions = values
            .iter()
            .filter(|v| matches!(surface.on_gesture_progress(**v), Ok(CaptureOutcome::Completed(_))))
            .count();
        let reached = values.iter().any(|v| *v >= 100.0);
        prop_assert_eq!(completions, usize::from(reached));
    }
}

#[test]
fn test_restart_allows_second_capture() {
    let mut surface = started();
    assert!(matches!(
        surface.on_gesture_progress(100.0).unwrap(),
        CaptureOutcome::Completed(_)
    ));
    surface.begin_capture();
    surface.pointer(PointerEvent::down(5.0, 5.0)).unwrap();
    surface.pointer(PointerEvent::up(60.0, 30.0)).unwrap();
    match surface.on_gesture_progress(100.0).unwrap() {
        CaptureOutcome::Completed(signature) => assert!(!signature.is_blank()),
        other => panic!("expected completion, got {:?}", other),
    }
}

#[test]
fn test_release_before_completion() {
    let mut surface = started();
    surface.on_gesture_progress(75.0).unwrap();
    surface.release_gesture();
    assert_eq!(surface.gesture_progress(), 0);
    assert!(!surface.is_locked());
}
