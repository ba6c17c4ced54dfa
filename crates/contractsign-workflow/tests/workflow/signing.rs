//! Preview, capture and placement through the controller

use contractsign_capture::{PointerEvent, PointerKind};
use contractsign_core::{
    ContractRecord, ContractStatus, DocumentSize, Error, EventCategory, Stage, ViewportPoint,
    WorkflowError, WorkflowEvent,
};
use contractsign_core::event_bus::StageEvent;
use contractsign_workflow::{GestureStatus, WorkflowController};

use crate::common::{config, draw, signer, Harness, CONTRACT};

#[tokio::test]
async fn test_open_starts_in_preview() {
    let harness = Harness::new();
    let controller = harness.open(&config()).await;

    assert_eq!(controller.stage(), Stage::Preview);
    let document = controller.session().document();
    assert_eq!(document.page_count, 1);
    assert_eq!(document.page_size, DocumentSize::A4);
    assert!((document.preview_size.height - 842.0).abs() < 0.01);
    assert!(controller.session().signature().is_none());
}

#[tokio::test]
async fn test_open_rejects_signed_contract() {
    let harness = Harness::new();
    let mut record = ContractRecord::new(CONTRACT, signer());
    record.status = ContractStatus::Signed;
    harness.records.insert(record);

    let err = WorkflowController::open(
        CONTRACT.into(),
        harness.collaborators(),
        &config(),
        harness.events.clone(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Workflow(WorkflowError::AlreadySigned { .. })));
}

#[tokio::test]
async fn test_open_fails_without_document() {
    let harness = Harness::new();
    harness
        .records
        .insert(ContractRecord::new("c-missing", signer()));

    let err = WorkflowController::open(
        "c-missing".into(),
        harness.collaborators(),
        &config(),
        harness.events.clone(),
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Document(_)));
    assert_eq!(err.user_message(), "Cannot preview this contract.");
}

#[tokio::test]
async fn test_blank_gesture_keeps_create() {
    let harness = Harness::new();
    let mut controller = harness.open(&config()).await;
    controller.confirm_preview().unwrap();
    let first_capture = controller.surface().session();

    assert_eq!(
        controller.gesture_progress(40.0).unwrap(),
        GestureStatus::Progress(40)
    );
    let status = controller.gesture_progress(100.0).unwrap();
    assert!(matches!(status, GestureStatus::Rejected { .. }));
    assert_eq!(controller.stage(), Stage::Create);
    assert!(controller.last_error().is_some());
    assert!(controller.session().signature().is_none());

    // Capture restarted with the gesture unlocked.
    assert_eq!(controller.surface().session(), first_capture + 1);
    assert_eq!(controller.surface().gesture_progress(), 0);

    draw(&mut controller);
    assert_eq!(
        controller.gesture_progress(100.0).unwrap(),
        GestureStatus::Accepted
    );
    assert_eq!(controller.stage(), Stage::Place);
    assert!(controller.last_error().is_none());
}

#[tokio::test]
async fn test_gesture_outside_create() {
    let harness = Harness::new();
    let mut controller = harness.open(&config()).await;
    assert!(matches!(
        controller.gesture_progress(100.0),
        Err(WorkflowError::InvalidTransition {
            current: Stage::Preview,
            ..
        })
    ));
    assert!(controller.pointer(PointerEvent::down(1.0, 1.0)).is_err());
}

#[tokio::test]
async fn test_unsupported_pointer_degrades() {
    let harness = Harness::new();
    let mut controller = harness.open(&config()).await;
    controller.confirm_preview().unwrap();

    controller
        .pointer(PointerEvent::down(5.0, 5.0).with_kind(PointerKind::Unsupported))
        .unwrap();
    assert_eq!(controller.stage(), Stage::Create);
    assert_eq!(
        controller.last_error(),
        Some("Signature capture is unavailable on this device.")
    );
}

#[tokio::test]
async fn test_overlay_default_position() {
    let harness = Harness::new();
    let controller = harness.open(&config()).await;
    let overlay = controller.overlay_placement();
    // 595x842 preview, 150x50 box, 24 px margin.
    assert!((overlay.origin.x - 421.0).abs() < 0.01);
    assert!((overlay.origin.y - 768.0).abs() < 0.01);
    assert!((overlay.size.width - 150.0).abs() < 0.01);
}

#[tokio::test]
async fn test_place_outside_preview() {
    let harness = Harness::new();
    let mut controller = harness.open(&config()).await;
    controller.confirm_preview().unwrap();
    draw(&mut controller);
    controller.gesture_progress(100.0).unwrap();

    let err = controller.place(ViewportPoint::new(600.0, 10.0)).unwrap_err();
    assert!(matches!(err, WorkflowError::PlacementOutOfBounds { .. }));
    assert_eq!(controller.stage(), Stage::Place);
    assert!(controller.last_error().is_some());

    controller.place(ViewportPoint::new(100.0, 100.0)).unwrap();
    assert_eq!(controller.stage(), Stage::Confirm);
}

#[tokio::test]
async fn test_square_page_placement() {
    let harness = Harness::with_page(DocumentSize::new(842.0, 842.0));
    let mut cfg = config();
    cfg.preview.render_width = 1000.0;
    cfg.placement.box_width = 100.0;
    cfg.placement.box_height = 100.0;

    let controller = harness.at_confirm(&cfg, ViewportPoint::new(100.0, 200.0)).await;
    let rect = controller.session().document_placement().unwrap();
    assert!((rect.origin.x - 84.2).abs() < 0.01);
    assert!((rect.size.height - 84.2).abs() < 0.01);
    assert!((rect.origin.y - 589.4).abs() < 0.01);
}

#[tokio::test]
async fn test_stage_events_published() {
    let harness = Harness::new();
    let _controller = harness.at_confirm(&config(), ViewportPoint::new(50.0, 50.0)).await;

    let stages: Vec<Stage> = harness
        .events
        .history()
        .into_iter()
        .filter(|e| e.category() == EventCategory::Stage)
        .filter_map(|e| match e {
            WorkflowEvent::Stage(StageEvent::Changed { to, .. }) => Some(to),
            _ => None,
        })
        .collect();
    assert_eq!(stages, vec![Stage::Create, Stage::Place, Stage::Confirm]);
}
