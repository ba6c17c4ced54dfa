//! Filesystem collaborators, alone and behind the controller

use std::sync::Arc;

use contractsign_core::{
    BlobStore, ContractId, ContractPatch, ContractRecord, ContractStatus, DocumentRenderer,
    DocumentSize, EventBus, PersistenceError, RecordStore, Stage, ViewportPoint,
};
use contractsign_document::{blank_document, inspect};
use contractsign_workflow::adapters::{
    FsBlobStore, FsDocumentRenderer, JsonRecordStore, TracingNotifier,
};
use contractsign_workflow::{Collaborators, ConfirmOutcome, GestureStatus, WorkflowController};
use tempfile::TempDir;

use crate::common::{config, draw, signer};

#[tokio::test]
async fn test_blob_store_writes_under_root() {
    let dir = TempDir::new().unwrap();
    let store = FsBlobStore::new(dir.path(), "https://files.example.com/");
    let key = "contracts/signed/c-1.pdf";

    assert!(matches!(
        store.public_url_for(key).await,
        Err(PersistenceError::PublicUrl { .. })
    ));
    store.put(key, b"%PDF-1.5".to_vec()).await.unwrap();
    store.put(key, b"%PDF-1.7".to_vec()).await.unwrap();

    let on_disk = std::fs::read(dir.path().join(key)).unwrap();
    assert_eq!(on_disk, b"%PDF-1.7");
    assert_eq!(
        store.public_url_for(key).await.unwrap(),
        "https://files.example.com/contracts/signed/c-1.pdf"
    );
    assert!(matches!(
        store.put("../escape.pdf", Vec::new()).await,
        Err(PersistenceError::Upload { .. })
    ));
}

#[tokio::test]
async fn test_record_store_round_trip() {
    let dir = TempDir::new().unwrap();
    let store = JsonRecordStore::new(dir.path().join("db").join("contracts.json"));
    assert!(store.load().await.unwrap().is_empty());

    store
        .store(&[ContractRecord::new("c-1", signer()).with_field("amount", "90")])
        .await
        .unwrap();
    let id = ContractId::new("c-1");
    let record = store.get_by_id(&id).await.unwrap();
    assert_eq!(record.status, ContractStatus::Draft);
    assert_eq!(record.fields["amount"], "90");

    store.update(&id, ContractPatch::signed()).await.unwrap();
    assert_eq!(store.get_by_id(&id).await.unwrap().status, ContractStatus::Signed);

    assert!(matches!(
        store.update(&ContractId::new("c-2"), ContractPatch::signed()).await,
        Err(PersistenceError::RecordNotFound { .. })
    ));
}

#[tokio::test]
async fn test_record_store_rejects_corrupt_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("contracts.json");
    std::fs::write(&path, "{ not json").unwrap();
    let store = JsonRecordStore::new(&path);
    assert!(matches!(
        store.get_by_id(&ContractId::new("c-1")).await,
        Err(PersistenceError::Io { .. })
    ));
}

#[tokio::test]
async fn test_renderer_reads_contract_document() {
    let dir = TempDir::new().unwrap();
    let renderer = FsDocumentRenderer::new(dir.path());
    let record = ContractRecord::new("c-1", signer());

    assert!(renderer.render(&record, 600.0).await.is_err());

    let bytes = blank_document(DocumentSize::new(612.0, 792.0), 2).unwrap();
    std::fs::write(renderer.path_for(&record.id), &bytes).unwrap();
    let rendered = renderer.render(&record, 612.0).await.unwrap();
    assert_eq!(rendered.page_count, 2);
    assert_eq!(rendered.page_size, DocumentSize::new(612.0, 792.0));
    assert!((rendered.preview_size.height - 792.0).abs() < 0.01);
}

#[tokio::test]
async fn test_signing_against_filesystem() {
    let dir = TempDir::new().unwrap();
    let docs = dir.path().join("documents");
    std::fs::create_dir_all(&docs).unwrap();

    let renderer = FsDocumentRenderer::new(&docs);
    let record = ContractRecord::new("c-fs", signer());
    let source = blank_document(DocumentSize::A4, 1).unwrap();
    std::fs::write(renderer.path_for(&record.id), &source).unwrap();

    let records = JsonRecordStore::new(dir.path().join("contracts.json"));
    records.store(&[record.clone()]).await.unwrap();

    let collaborators = Collaborators {
        renderer: Arc::new(renderer),
        blobs: Arc::new(FsBlobStore::new(
            dir.path().join("signed"),
            "https://files.example.com",
        )),
        notifier: Arc::new(TracingNotifier),
        records: Arc::new(records.clone()),
    };

    let mut controller = WorkflowController::open(
        record.id.clone(),
        collaborators,
        &config(),
        Arc::new(EventBus::new()),
    )
    .await
    .unwrap();
    controller.confirm_preview().unwrap();
    draw(&mut controller);
    assert_eq!(
        controller.gesture_progress(100.0).unwrap(),
        GestureStatus::Accepted
    );
    let overlay = controller.overlay_placement();
    controller.place(overlay.origin).unwrap();
    controller.place(ViewportPoint::new(1.0, 1.0)).unwrap_err();

    let receipt = match controller.confirm().await.unwrap() {
        ConfirmOutcome::Signed(receipt) => receipt,
        other => panic!("expected signed, got {:?}", other),
    };
    assert_eq!(controller.stage(), Stage::Done);

    let signed = std::fs::read(dir.path().join("signed").join(&receipt.storage_key)).unwrap();
    assert_ne!(signed, source);
    assert_eq!(inspect(&signed).unwrap().page_count, 1);
    assert_eq!(
        records.get_by_id(&record.id).await.unwrap().status,
        ContractStatus::Signed
    );
}
