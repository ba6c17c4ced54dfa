//! Stages only move forward, whatever order actions arrive in

use std::sync::Arc;

use contractsign_core::{
    ContractRecord, DocumentSize, PlacementPoint, RenderedDocument, SignatureImage, Stage,
    ViewportPoint, ViewportSize,
};
use contractsign_workflow::{Action, SubmissionReceipt, WorkflowSession};
use image::{Rgba, RgbaImage};
use proptest::prelude::*;

use crate::common::signer;

fn session() -> WorkflowSession {
    let document = RenderedDocument {
        bytes: Arc::from(Vec::new()),
        page_count: 1,
        page_size: DocumentSize::A4,
        preview_size: ViewportSize::new(595.0, 842.0),
    };
    WorkflowSession::new(ContractRecord::new("c-7", signer()), document).unwrap()
}

fn signature(inked: bool) -> SignatureImage {
    let mut img = RgbaImage::new(4, 4);
    if inked {
        img.put_pixel(1, 1, Rgba([0, 0, 0, 255]));
    }
    SignatureImage::from_rgba(&img).unwrap()
}

fn action() -> impl Strategy<Value = Action> {
    prop_oneof![
        Just(Action::ConfirmPreview),
        any::<bool>().prop_map(|inked| Action::SignatureCaptured(signature(inked))),
        (-100.0..700.0f64, -100.0..900.0f64).prop_map(|(x, y)| {
            Action::PlacementChosen(PlacementPoint::new(
                ViewportPoint::new(x, y),
                ViewportSize::new(150.0, 50.0),
            ))
        }),
        Just(Action::Submitted(SubmissionReceipt {
            storage_key: "contracts/signed/c-7.pdf".to_string(),
            document_url: "memory://blobs/contracts/signed/c-7.pdf".to_string(),
            notified: Vec::new(),
        })),
    ]
}

proptest! {
    #[test]
    fn stage_never_regresses(actions in prop::collection::vec(action(), 0..40)) {
        let mut current = session();
        for action in actions {
            let before = current.stage().index();
            match current.apply(action) {
                Ok(next) => {
                    let after = next.stage().index();
                    prop_assert_eq!(after, before + 1);
                    prop_assert!(next.last_error().is_none());
                    current = next;
                }
                Err(_) => {
                    prop_assert_eq!(current.stage().index(), before);
                }
            }
        }
    }

    #[test]
    fn done_is_absorbing(actions in prop::collection::vec(action(), 1..10)) {
        let done = session()
            .apply(Action::ConfirmPreview).unwrap()
            .apply(Action::SignatureCaptured(signature(true))).unwrap()
            .apply(Action::PlacementChosen(PlacementPoint::new(
                ViewportPoint::new(10.0, 10.0),
                ViewportSize::new(150.0, 50.0),
            ))).unwrap()
            .apply(Action::Submitted(SubmissionReceipt {
                storage_key: "k".to_string(),
                document_url: "u".to_string(),
                notified: Vec::new(),
            })).unwrap();
        for action in actions {
            prop_assert_eq!(
                done.apply(action).unwrap_err(),
                contractsign_core::WorkflowError::Finished
            );
        }
        prop_assert_eq!(done.stage(), Stage::Done);
    }
}
