use super::*;

use crate::canvas::RasterCanvas;
use crate::foundation::core::MID_GRAY;
use image::RgbaImage;

fn size(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

fn is_fibonacci(n: u32) -> bool {
    let (mut a, mut b) = (1u32, 1u32);
    while b < n {
        (a, b) = (b, a + b);
    }
    b == n
}

#[test]
fn landscape_fit_uses_largest_pair_below_the_long_side() {
    assert_eq!(fibonacci_fit(size(400, 200)), size(377, 233));
    assert_eq!(fibonacci_fit(size(377, 10)), size(377, 233));
    assert_eq!(fibonacci_fit(size(200, 400)), size(233, 377));
}

#[test]
fn square_fit_uses_one_term_twice() {
    assert_eq!(fibonacci_fit(size(100, 100)), size(89, 89));
    assert_eq!(fibonacci_fit(size(1, 1)), size(1, 1));
}

#[test]
fn fit_sides_are_consecutive_terms_not_exceeding_the_input() {
    for (w, h) in [(2, 1), (13, 7), (640, 480), (1000, 999), (3, 50)] {
        let fit = fibonacci_fit(size(w, h));
        assert!(is_fibonacci(fit.width) && is_fibonacci(fit.height), "{fit:?}");
        assert!(fit.max_side() <= w.max(h));
        let (lo, hi) = (fit.min_side(), fit.max_side());
        assert!(lo == hi || fibonacci_next(lo) == hi || (lo, hi) == (1, 2), "{fit:?}");
    }
}

#[test]
fn square_of_equal_area_rounds() {
    assert_eq!(square_of_equal_area(size(400, 200)), size(283, 283));
    assert_eq!(square_of_equal_area(size(9, 4)), size(6, 6));
}

#[test]
fn square_spiral_plan_nests_tiles() {
    let plan = plan_spiral(size(233, 233), true, QuarterTurns::CW, BlendMode::Multiply, 10.0);
    let head: Vec<_> = plan
        .tiles
        .iter()
        .take(4)
        .map(|t| (t.offset.x, t.offset.y, t.size.width))
        .collect();
    assert_eq!(
        head,
        vec![(233, 0, 144), (288, 144, 89), (233, 178, 55), (233, 144, 34)]
    );
    assert!(plan.tiles.iter().all(|t| t.mode == BlendMode::Normal && t.opacity == 100.0));
    assert_eq!(plan.tiles[1].turns, QuarterTurns::HALF);
}

#[test]
fn spiral_tiles_shrink_and_terminate() {
    let plan = plan_spiral(size(377, 233), false, QuarterTurns::CW, BlendMode::Normal, 100.0);
    let widths: Vec<_> = plan.tiles.iter().map(|t| t.size.width).collect();
    assert!(widths.windows(2).all(|w| w[0] >= w[1]), "{widths:?}");
    assert_eq!(plan.tiles.first().map(|t| t.size), Some(size(233, 144)));
    let last = plan.tiles.last().unwrap();
    assert_eq!(last.size, size(1, 1));
    assert!(plan.tiles.len() < 20);
}

#[test]
fn spiral_canvas_bounds_every_tile() {
    let mut c = RasterCanvas::from_image(RgbaImage::from_pixel(40, 30, MID_GRAY)).unwrap();
    let out = fibonacci_spiral(&mut c, &SpiralOptions::default()).unwrap();
    let (l, t, r, b) = out.plan.bounds();
    assert_eq!((l, t), (0, 0));
    assert_eq!(out.size, size((r - l) as u32, (b - t) as u32));
    assert_eq!(c.size(), out.size);
}

#[test]
fn rectangular_spiral_coerces_even_turns() {
    let mut c = RasterCanvas::from_image(RgbaImage::from_pixel(40, 30, MID_GRAY)).unwrap();
    let opts = SpiralOptions {
        aspect: SpiralAspect::Rectangle,
        quarter_turn: QuarterTurns::HALF,
        flatten: true,
        ..SpiralOptions::default()
    };
    let out = fibonacci_spiral(&mut c, &opts).unwrap();
    assert_eq!(out.plan.tiles[0].turns, QuarterTurns::CW);
    assert_eq!(out.layers.len(), 1);
}

#[test]
fn portrait_canvas_is_restored_to_portrait() {
    let mut c = RasterCanvas::from_image(RgbaImage::from_pixel(30, 40, MID_GRAY)).unwrap();
    let out = fibonacci_spiral(&mut c, &SpiralOptions::default()).unwrap();
    assert!(out.size.is_portrait());
    assert_eq!(out.plan.canvas, size(34, 34));
    assert_eq!(out.size, size(34, 55));
}

#[test]
fn bad_opacity_is_rejected_before_mutation() {
    let mut c = RasterCanvas::from_image(RgbaImage::from_pixel(8, 5, MID_GRAY)).unwrap();
    let opts = SpiralOptions {
        opacity: 150.0,
        ..SpiralOptions::default()
    };
    assert!(fibonacci_spiral(&mut c, &opts).unwrap_err().is_invalid_parameter());
    assert_eq!(c.size(), size(8, 5));
}
