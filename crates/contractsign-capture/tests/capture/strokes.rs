use contractsign_capture::{
    CaptureOutcome, CaptureSurface, Pen, PointerEvent, PointerKind, PointerPhase, SurfaceConfig,
};

#[test]
fn test_touch_and_pen_draw() {
    let mut surface = CaptureSurface::new(SurfaceConfig::default());
    surface.begin_capture();
    surface
        .pointer(PointerEvent::down(10.0, 10.0).with_kind(PointerKind::Touch))
        .unwrap();
    surface
        .pointer(PointerEvent::up(90.0, 90.0).with_kind(PointerKind::Touch))
        .unwrap();
    surface
        .pointer(PointerEvent::down(200.0, 20.0).with_kind(PointerKind::Pen))
        .unwrap();
    surface
        .pointer(PointerEvent::up(300.0, 150.0).with_kind(PointerKind::Pen))
        .unwrap();
    assert_eq!(surface.strokes().count(), 2);
}

#[test]
fn test_cancel_keeps_partial_stroke() {
    let mut surface = CaptureSurface::new(SurfaceConfig::default());
    surface.begin_capture();
    surface.pointer(PointerEvent::down(10.0, 10.0)).unwrap();
    surface.pointer(PointerEvent::moved(20.0, 15.0)).unwrap();
    let mut cancel = PointerEvent::moved(500.0, 500.0);
    cancel.phase = PointerPhase::Cancel;
    surface.pointer(cancel).unwrap();

    let strokes: Vec<_> = surface.strokes().collect();
    assert_eq!(strokes.len(), 1);
    assert_eq!(strokes[0].points(), &[(10.0, 10.0), (20.0, 15.0)]);
}

#[test]
fn test_open_stroke_included_at_completion() {
    let mut surface = CaptureSurface::new(SurfaceConfig {
        width: 100,
        height: 50,
        pen: Pen {
            width: 4.0,
            color: [0, 0, 0, 255],
        },
    });
    surface.begin_capture();
    surface.pointer(PointerEvent::down(10.0, 25.0)).unwrap();
    surface.pointer(PointerEvent::moved(90.0, 25.0)).unwrap();

    match surface.on_gesture_progress(100.0).unwrap() {
        CaptureOutcome::Completed(signature) => {
            let image = signature.decode().unwrap();
            assert_eq!(image.dimensions(), (100, 50));
            assert!(image.get_pixel(50, 25)[3] > 0);
            assert_eq!(image.get_pixel(50, 2)[3], 0);
        }
        other => panic!("expected completion, got {:?}", other),
    }
}

#[test]
fn test_pointer_event_json() {
    let event: PointerEvent =
        serde_json::from_str(r#"{"phase":"down","kind":"pen","x":1.5,"y":2.0}"#).unwrap();
    assert_eq!(event.phase, PointerPhase::Down);
    assert_eq!(event.kind, PointerKind::Pen);
}
