//! Confirm sequence: ordering, holds, retries and timeouts

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use contractsign_core::{
    ContractId, ContractStatus, NotificationService, PersistenceError, Stage, TemplateVariables,
    ViewportPoint, WorkflowError, WorkflowEvent,
};
use contractsign_core::event_bus::ErrorEvent;
use contractsign_document::inspect;
use contractsign_workflow::{ConfirmOutcome, WorkflowController};

use crate::common::{config, Harness, CONTRACT, SIGNER_EMAIL};

fn contract() -> ContractId {
    ContractId::new(CONTRACT)
}

const KEY: &str = "contracts/signed/c-42.pdf";

#[tokio::test]
async fn test_confirm_signs_contract() {
    let harness = Harness::new();
    let cfg = config();
    let mut controller = harness.at_confirm(&cfg, ViewportPoint::new(100.0, 200.0)).await;

    let receipt = match controller.confirm().await.unwrap() {
        ConfirmOutcome::Signed(receipt) => receipt,
        other => panic!("expected signed, got {:?}", other),
    };
    assert_eq!(receipt.storage_key, KEY);
    assert_eq!(
        receipt.document_url,
        format!("https://files.example.com/{}", KEY)
    );
    assert_eq!(
        receipt.notified,
        vec![
            SIGNER_EMAIL.to_string(),
            cfg.submission.internal_recipient.clone()
        ]
    );

    assert_eq!(controller.stage(), Stage::Done);
    assert!(controller.acknowledgment().unwrap().contains("Ada Lovelace"));

    let stored = harness.blobs.get(KEY).unwrap();
    assert_ne!(stored, harness.source);
    assert_eq!(inspect(&stored).unwrap().page_count, 1);

    let sent = harness.notifier.sent();
    assert_eq!(sent.len(), 2);
    assert_eq!(sent[0].recipient, SIGNER_EMAIL);
    assert_eq!(sent[0].template_id, cfg.submission.signer_template);
    assert_eq!(sent[1].template_id, cfg.submission.internal_template);
    assert_eq!(sent[0].variables["document_url"], receipt.document_url);
    assert_eq!(sent[0].variables["contract_id"], CONTRACT);
    assert_eq!(sent[0].variables["signer_name"], "Ada Lovelace");

    assert_eq!(
        harness.records.get(&contract()).unwrap().status,
        ContractStatus::Signed
    );
}

#[tokio::test]
async fn test_upload_failure_holds_then_retry_succeeds() {
    let harness = Harness::new();
    let mut controller = harness.at_confirm(&config(), ViewportPoint::new(100.0, 200.0)).await;
    harness.blobs.fail_next_puts(1);

    let outcome = controller.confirm().await.unwrap();
    let message = match outcome {
        ConfirmOutcome::Held { message } => message,
        other => panic!("expected hold, got {:?}", other),
    };
    assert!(!message.contains("injected"));
    assert_eq!(controller.stage(), Stage::Confirm);
    assert_eq!(controller.last_error(), Some(message.as_str()));
    assert!(harness.notifier.sent().is_empty());
    assert!(harness.records.updates().is_empty());
    assert_eq!(
        harness.records.get(&contract()).unwrap().status,
        ContractStatus::Draft
    );

    assert!(matches!(
        controller.confirm().await.unwrap(),
        ConfirmOutcome::Signed(_)
    ));
    assert_eq!(harness.blobs.put_count(), 2);
    assert_eq!(harness.blobs.len(), 1);
    assert_eq!(harness.notifier.sent().len(), 2);
    assert_eq!(controller.session().confirm_attempts(), 2);
    assert!(controller.last_error().is_none());
}

#[tokio::test]
async fn test_single_terminal_write_across_retries() {
    let harness = Harness::new();
    let mut controller = harness.at_confirm(&config(), ViewportPoint::new(10.0, 10.0)).await;

    harness.blobs.fail_next_puts(1);
    assert!(matches!(
        controller.confirm().await.unwrap(),
        ConfirmOutcome::Held { .. }
    ));

    harness.records.fail_next_updates(1);
    assert!(matches!(
        controller.confirm().await.unwrap(),
        ConfirmOutcome::Held { .. }
    ));
    assert_eq!(controller.stage(), Stage::Confirm);

    assert!(matches!(
        controller.confirm().await.unwrap(),
        ConfirmOutcome::Signed(_)
    ));
    assert_eq!(harness.records.updates().len(), 1);
    // Notifications from the attempt that failed at the record update are resent.
    assert_eq!(harness.notifier.sent().len(), 4);
    assert_eq!(controller.session().confirm_attempts(), 3);
}

#[tokio::test]
async fn test_notification_failure_stops_sequence() {
    let harness = Harness::new();
    let mut controller = harness.at_confirm(&config(), ViewportPoint::new(10.0, 10.0)).await;
    harness.notifier.fail_next(1);

    assert!(matches!(
        controller.confirm().await.unwrap(),
        ConfirmOutcome::Held { .. }
    ));
    assert_eq!(harness.blobs.len(), 1);
    assert!(harness.notifier.sent().is_empty());
    assert!(harness.records.updates().is_empty());
}

#[tokio::test]
async fn test_confirm_misuse() {
    let harness = Harness::new();
    let mut controller = harness.open(&config()).await;
    assert!(matches!(
        controller.confirm().await,
        Err(WorkflowError::InvalidTransition {
            current: Stage::Preview,
            ..
        })
    ));
    assert!(controller.acknowledgment().is_none());

    let mut controller = harness.at_confirm(&config(), ViewportPoint::new(10.0, 10.0)).await;
    controller.confirm().await.unwrap();
    assert_eq!(controller.confirm().await, Err(WorkflowError::Finished));
    assert_eq!(harness.records.updates().len(), 1);
}

struct StalledNotifier;

#[async_trait]
impl NotificationService for StalledNotifier {
    async fn send(
        &self,
        _template_id: &str,
        _recipient: &str,
        _variables: &TemplateVariables,
    ) -> Result<(), PersistenceError> {
        tokio::time::sleep(Duration::from_secs(30)).await;
        Ok(())
    }
}

#[tokio::test]
async fn test_timeout_holds_at_confirm() {
    let harness = Harness::new();
    let mut cfg = config();
    cfg.submission.timeout_ms = Some(50);

    let mut collaborators = harness.collaborators();
    collaborators.notifier = Arc::new(StalledNotifier);
    let mut controller = WorkflowController::open(
        CONTRACT.into(),
        collaborators,
        &cfg,
        harness.events.clone(),
    )
    .await
    .unwrap();
    controller.confirm_preview().unwrap();
    crate::common::draw(&mut controller);
    controller.gesture_progress(100.0).unwrap();
    controller.place(ViewportPoint::new(10.0, 10.0)).unwrap();

    let outcome = controller.confirm().await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Held { .. }));
    assert_eq!(controller.stage(), Stage::Confirm);
    // Upload happened before the stall; the record was never touched.
    assert_eq!(harness.blobs.len(), 1);
    assert!(harness.records.updates().is_empty());
}

#[tokio::test]
async fn test_hold_is_published() {
    let harness = Harness::new();
    let mut controller = harness.at_confirm(&config(), ViewportPoint::new(10.0, 10.0)).await;
    harness.blobs.fail_next_puts(1);
    controller.confirm().await.unwrap();

    let held = harness.events.history().into_iter().any(|event| {
        matches!(
            event,
            WorkflowEvent::Error(ErrorEvent::Held {
                stage: Stage::Confirm,
                ..
            })
        )
    });
    assert!(held);
}
