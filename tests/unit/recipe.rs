use super::*;

use crate::canvas::RasterCanvas;
use crate::compose::border::BorderShape;
use crate::foundation::core::{MID_GRAY, QuarterTurns, Size};
use image::RgbaImage;

#[test]
fn omitted_fields_take_defaults() {
    let r = Recipe::from_json(
        r#"{ "steps": [
            { "op": "mirror", "vertical": false },
            { "op": "fibonacci_spiral", "quarter_turn": -1 },
            { "op": "jagged_border", "shape": "elliptical" },
            { "op": "scale_to_fibonacci" },
            { "op": "flatten" }
        ] }"#,
    )
    .unwrap();
    assert_eq!(r.steps.len(), 5);
    let Step::Mirror(m) = &r.steps[0] else {
        panic!("expected mirror, got {:?}", r.steps[0]);
    };
    assert!(m.horizontal && !m.vertical);
    let Step::FibonacciSpiral(s) = &r.steps[1] else {
        panic!("expected spiral");
    };
    assert_eq!(s.quarter_turn, QuarterTurns::CCW);
    assert_eq!(s.opacity, 100.0);
    let Step::JaggedBorder(b) = &r.steps[2] else {
        panic!("expected border");
    };
    assert_eq!(b.shape, BorderShape::Elliptical);
    assert_eq!(b.size, 50);
    assert_eq!(r.steps[3], Step::ScaleToFibonacci { make_square: false });
    r.validate().unwrap();
}

#[test]
fn unknown_op_is_a_recipe_error() {
    let err = Recipe::from_json(r#"{ "steps": [ { "op": "explode" } ] }"#).unwrap_err();
    assert!(matches!(err, FoldError::Recipe(_)));
}

#[test]
fn validation_names_the_failing_step() {
    let r = Recipe {
        steps: vec![
            Step::Flatten,
            Step::PanToBow(BowOptions {
                angle_degrees: 10.0,
                arc_up: false,
            }),
        ],
    };
    let msg = r.validate().unwrap_err().to_string();
    assert!(msg.contains("step 1 (pan_to_bow)"), "{msg}");
    assert!(Recipe::default().validate().is_err());
}

#[test]
fn invalid_recipe_leaves_canvas_untouched() {
    let mut c = RasterCanvas::from_image(RgbaImage::from_pixel(8, 4, MID_GRAY)).unwrap();
    let r = Recipe {
        steps: vec![
            Step::Mirror(MirrorOptions::default()),
            Step::Stretch { opacity: 300.0 },
        ],
    };
    assert!(r.apply(&mut c).is_err());
    assert_eq!(c.size(), Size::new(8, 4).unwrap());
    assert_eq!(c.undo_steps(), 0);
}

#[test]
fn steps_apply_in_order_with_one_undo_each() {
    let mut c = RasterCanvas::from_image(RgbaImage::from_pixel(8, 4, MID_GRAY)).unwrap();
    let r = Recipe {
        steps: vec![
            Step::Accordion(AccordionOptions {
                horizontal: 3,
                vertical: 1,
                ..AccordionOptions::default()
            }),
            Step::Flatten,
        ],
    };
    let advisories = r.apply(&mut c).unwrap();
    assert!(advisories.is_empty());
    assert_eq!(c.size(), Size::new(24, 4).unwrap());
    assert_eq!(c.layers().len(), 1);
    assert_eq!(c.undo_steps(), 2);
}

#[test]
fn recipe_round_trips_through_json() {
    let r = Recipe {
        steps: vec![Step::WideBlur { radius: 12.0 }, Step::ScaleLayerToImage],
    };
    let text = serde_json::to_string(&r).unwrap();
    assert!(text.contains(r#""op":"wide_blur""#));
    assert_eq!(Recipe::from_json(&text).unwrap(), r);
}
