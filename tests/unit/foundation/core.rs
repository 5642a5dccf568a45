use super::*;

#[test]
fn size_rejects_zero_sides() {
    assert!(Size::new(0, 4).is_err());
    assert!(Size::new(4, 0).is_err());
    assert_eq!(Size::new(3, 4).unwrap().area(), 12);
}

#[test]
fn size_repeats_along_one_axis_only() {
    let s = Size::new(10, 4).unwrap();
    assert_eq!(s.repeated(Axis::Horizontal, 3), Size::new(30, 4).unwrap());
    assert_eq!(s.repeated(Axis::Vertical, 3), Size::new(10, 12).unwrap());
    assert_eq!(s.along(Axis::Vertical), 4);
}

#[test]
fn quarter_turns_normalise_modulo_four() {
    assert_eq!(QuarterTurns::new(5), QuarterTurns::CW);
    assert_eq!(QuarterTurns::new(-1), QuarterTurns::CCW);
    assert_eq!(QuarterTurns::CW.times(6), QuarterTurns::HALF);
    assert_eq!(QuarterTurns::CCW.inverse(), QuarterTurns::CW);
}

#[test]
fn odd_quarter_turns_transpose_size() {
    let s = Size::new(8, 3).unwrap();
    assert_eq!(QuarterTurns::CW.rotate_size(s), Size::new(3, 8).unwrap());
    assert_eq!(QuarterTurns::HALF.rotate_size(s), s);
}

#[test]
fn golden_ratio_matches_closed_form() {
    assert!((GOLDEN_RATIO - (5f64.sqrt() + 1.0) / 2.0).abs() < 1e-12);
}

#[test]
fn blend_mode_serde_is_snake_case() {
    let json = serde_json::to_string(&BlendMode::LegacyAddition).unwrap();
    assert_eq!(json, "\"legacy_addition\"");
    let back: BlendMode = serde_json::from_str("\"darken_only\"").unwrap();
    assert_eq!(back, BlendMode::DarkenOnly);
}
