#![allow(dead_code)]

use boxlabel::annotation::Rectangle;
use boxlabel::geometry::Rect;
use proptest::prelude::*;
use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence};

/// Round-trip tolerance in pixels for sidecars written with 6 decimals.
pub fn eps_yolo(image_w: u32, image_h: u32) -> f64 {
    (image_w.max(image_h) as f64 * 2e-6).max(1e-9)
}

pub fn proptest_config() -> ProptestConfig {
    let cases = std::env::var("PROPTEST_CASES")
        .ok()
        .and_then(|v| v.parse::<u32>().ok())
        .unwrap_or(64);

    let mut config = ProptestConfig::with_failure_persistence(FileFailurePersistence::WithSource(
        "proptest-regressions",
    ));
    config.cases = cases;
    config.max_shrink_iters = 1024;
    config
}

pub fn arb_image_dims() -> impl Strategy<Value = (u32, u32)> {
    (1u32..=4096, 1u32..=4096)
}

/// A rectangle lying fully inside a `width` x `height` image.
pub fn arb_rect_inside(width: u32, height: u32) -> impl Strategy<Value = Rectangle> {
    let w = width as f64;
    let h = height as f64;
    (0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0.0..=1.0f64, 0u32..80).prop_map(
        move |(fx, fy, fw, fh, class_id)| {
            let x = fx * w;
            let y = fy * h;
            let rect_w = fw * (w - x);
            let rect_h = fh * (h - y);
            Rectangle::new(Rect::from_xywh(x, y, rect_w, rect_h), class_id)
        },
    )
}

/// Image dimensions together with up to `max_boxes` rectangles inside them.
pub fn arb_annotated_image(max_boxes: usize) -> impl Strategy<Value = (u32, u32, Vec<Rectangle>)> {
    arb_image_dims().prop_flat_map(move |(width, height)| {
        (
            Just(width),
            Just(height),
            prop::collection::vec(arb_rect_inside(width, height), 0..=max_boxes),
        )
    })
}

/// Compares geometry within `eps` and class ids exactly, in order.
pub fn assert_rectangles_equivalent(
    expected: &[Rectangle],
    actual: &[Rectangle],
    eps: f64,
) -> Result<(), String> {
    if expected.len() != actual.len() {
        return Err(format!(
            "rectangle count mismatch: expected={} actual={}",
            expected.len(),
            actual.len()
        ));
    }

    for (idx, (a, b)) in expected.iter().zip(actual).enumerate() {
        if a.class_id != b.class_id {
            return Err(format!(
                "rectangle {idx}: class mismatch {} vs {}",
                a.class_id, b.class_id
            ));
        }
        let pairs = [
            ("x", a.bbox.x(), b.bbox.x()),
            ("y", a.bbox.y(), b.bbox.y()),
            ("width", a.bbox.width, b.bbox.width),
            ("height", a.bbox.height, b.bbox.height),
        ];
        for (field, left, right) in pairs {
            if (left - right).abs() > eps {
                return Err(format!(
                    "rectangle {idx}: {field} differs by more than {eps}: {left} vs {right}"
                ));
            }
        }
    }

    Ok(())
}
