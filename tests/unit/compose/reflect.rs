use super::*;

use crate::canvas::RasterCanvas;
use crate::foundation::core::Color;
use image::{Rgba, RgbaImage};

const RED: Color = Rgba([255, 0, 0, 255]);
const BLUE: Color = Rgba([0, 0, 255, 255]);

fn size(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

/// Red left column, blue elsewhere.
fn marked(w: u32, h: u32) -> RasterCanvas {
    let mut img = RgbaImage::from_pixel(w, h, BLUE);
    for y in 0..h {
        img.put_pixel(0, y, RED);
    }
    RasterCanvas::from_image(img).unwrap()
}

#[test]
fn accordion_plan_alternates_flips() {
    let plan = plan_accordion(size(3, 2), Axis::Vertical, 3, true).unwrap();
    let offsets: Vec<_> = plan.iter().map(|p| p.offset).collect();
    assert_eq!(
        offsets,
        vec![Offset::new(0, 0), Offset::new(0, 2), Offset::new(0, 4)]
    );
    let flips: Vec<_> = plan.iter().map(|p| p.flip_vertical).collect();
    assert_eq!(flips, vec![false, true, false]);
    assert!(plan.iter().all(|p| !p.flip_horizontal));
}

#[test]
fn accordion_plan_without_flip_keeps_tiles_identical() {
    let plan = plan_accordion(size(5, 1), Axis::Horizontal, 4, false).unwrap();
    assert_eq!(plan.len(), 4);
    assert!(plan.iter().all(|p| !p.flip_horizontal && !p.flip_vertical));
    assert_eq!(plan[3].offset, Offset::new(15, 0));
}

#[test]
fn zero_tiles_is_rejected() {
    assert!(plan_accordion(size(1, 1), Axis::Horizontal, 0, true).is_err());
    let opts = AccordionOptions {
        vertical: 0,
        ..AccordionOptions::default()
    };
    let mut c = marked(2, 2);
    let err = accordion(&mut c, &opts).unwrap_err();
    assert!(err.is_invalid_parameter());
    assert_eq!(c.layers().len(), 1);
}

#[test]
fn reflection_is_a_flipped_pair() {
    let plan = plan_reflection(size(4, 4), Axis::Horizontal).unwrap();
    assert_eq!(plan.len(), 2);
    assert!(!plan[0].flip_horizontal);
    assert!(plan[1].flip_horizontal);
    assert_eq!(plan[1].offset, Offset::new(4, 0));
}

#[test]
fn horizontal_mirror_places_reflection_on_the_right() {
    let mut c = marked(3, 2);
    let opts = MirrorOptions {
        vertical: false,
        ..MirrorOptions::default()
    };
    let id = mirror(&mut c, &opts).unwrap();
    assert_eq!(c.size(), size(6, 2));
    let px = c.layer_pixels(id).unwrap();
    assert_eq!(*px.get_pixel(0, 1), RED);
    assert_eq!(*px.get_pixel(5, 1), RED);
    assert_eq!(*px.get_pixel(2, 0), BLUE);
    assert_eq!(*px.get_pixel(3, 0), BLUE);
}

#[test]
fn upper_left_flip_applies_before_tiling() {
    let mut c = marked(3, 1);
    let opts = AccordionOptions {
        horizontal: 2,
        vertical: 1,
        flip_alternate: false,
        flip_upper_left_horizontal: true,
        ..AccordionOptions::default()
    };
    let id = accordion(&mut c, &opts).unwrap();
    let px = c.layer_pixels(id).unwrap();
    assert_eq!(px.dimensions(), (6, 1));
    assert_eq!(*px.get_pixel(2, 0), RED);
    assert_eq!(*px.get_pixel(5, 0), RED);
    assert_eq!(*px.get_pixel(0, 0), BLUE);
}

#[test]
fn single_tile_accordion_is_a_copy() {
    let mut c = marked(3, 3);
    let opts = AccordionOptions {
        horizontal: 1,
        vertical: 1,
        ..AccordionOptions::default()
    };
    accordion(&mut c, &opts).unwrap();
    assert_eq!(c.size(), size(3, 3));
    assert_eq!(c.undo_steps(), 1);
}
