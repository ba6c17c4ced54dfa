//! Preview transform properties

use contractsign_core::{DocumentSize, PlacementPoint, ViewportPoint, ViewportSize};
use contractsign_document::PreviewTransform;
use proptest::prelude::*;

#[test]
fn test_square_page_click() {
    // 842-unit page shown 1000 px high, 100 px box clicked at (100, 200).
    let t = PreviewTransform::new(
        ViewportSize::new(1000.0, 1000.0),
        DocumentSize::new(842.0, 842.0),
    )
    .unwrap();
    let rect = t.placement_to_document(&PlacementPoint::new(
        ViewportPoint::new(100.0, 200.0),
        ViewportSize::new(100.0, 100.0),
    ));

    assert!((rect.origin.x - 84.2).abs() < 0.01);
    assert!((rect.size.height - 84.2).abs() < 0.01);
    assert!((rect.origin.y - (842.0 * (1.0 - 200.0 / 1000.0) - 84.2)).abs() < 0.01);
    assert!((rect.origin.y - 589.4).abs() < 0.01);
}

#[test]
fn test_scale_then_invert() {
    // Inverting before scaling would put the box at 842 - 200 - h instead.
    let t = PreviewTransform::new(ViewportSize::new(500.0, 500.0), DocumentSize::new(1000.0, 1000.0))
        .unwrap();
    let rect = t.placement_to_document(&PlacementPoint::new(
        ViewportPoint::new(0.0, 100.0),
        ViewportSize::new(10.0, 10.0),
    ));
    assert!((rect.origin.y - (1000.0 - 200.0 - 20.0)).abs() < 0.01);
}

proptest! {
    #[test]
    fn flip_round_trips(
        preview_w in 100.0f64..2000.0,
        page_w in 100.0f64..2000.0,
        page_h in 100.0f64..2000.0,
        fx in 0.0f64..1.0,
        fy in 0.0f64..1.0,
        box_w in 1.0f64..300.0,
        box_h in 1.0f64..300.0,
    ) {
        let preview_h = preview_w * page_h / page_w;
        let t = PreviewTransform::new(
            ViewportSize::new(preview_w, preview_h),
            DocumentSize::new(page_w, page_h),
        ).unwrap();
        let placement = PlacementPoint::new(
            ViewportPoint::new(fx * preview_w, fy * preview_h),
            ViewportSize::new(box_w, box_h),
        );

        let rect = t.placement_to_document(&placement);
        let (_, sy) = t.scale();
        // H - y_doc - h equals the scaled viewport y.
        let recovered = page_h - rect.origin.y - rect.size.height;
        prop_assert!((recovered - placement.origin.y * sy).abs() < 1e-6);

        let back = t.document_to_viewport(&rect);
        prop_assert!((back.origin.x - placement.origin.x).abs() < 1e-6);
        prop_assert!((back.origin.y - placement.origin.y).abs() < 1e-6);
        prop_assert!((back.size.width - box_w).abs() < 1e-6);
        prop_assert!((back.size.height - box_h).abs() < 1e-6);
    }
}
