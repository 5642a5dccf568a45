use super::*;

use crate::canvas::RasterCanvas;
use crate::foundation::core::Color;
use image::{Rgba, RgbaImage};

const RED: Color = Rgba([255, 0, 0, 255]);
const BLUE: Color = Rgba([0, 0, 255, 255]);

fn size(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

#[test]
fn extent_follows_rotation() {
    let mut p = TilePlacement::new(0, size(3, 2), Offset::new(1, 1));
    assert_eq!(p.extent(), size(3, 2));
    p.turns = QuarterTurns::CW;
    assert_eq!(p.extent(), size(2, 3));
    assert_eq!(p.right(), 3);
    assert_eq!(p.bottom(), 4);
}

#[test]
fn materialize_places_scaled_rotated_tiles() {
    let mut c = RasterCanvas::new(size(8, 8));
    let base = c.new_layer("base", size(4, 2), RED).unwrap();
    let mut p = TilePlacement::new(1, size(2, 1), Offset::new(5, 3));
    p.turns = QuarterTurns::CW;
    p.mode = BlendMode::Multiply;
    p.opacity = 40.0;

    let ids = materialize(&mut c, base, &[p]).unwrap();
    assert_eq!(ids.len(), 1);
    let info = c.layer(ids[0]).unwrap();
    assert_eq!(info.size, size(1, 2));
    assert_eq!(info.offset, Offset::new(5, 3));
    assert_eq!(info.mode, BlendMode::Multiply);
    assert_eq!(info.opacity, 40.0);
    assert_eq!(c.layers().last(), Some(&ids[0]));
}

#[test]
fn merged_tiles_fold_into_the_base() {
    let mut img = RgbaImage::from_pixel(2, 1, BLUE);
    img.put_pixel(0, 0, RED);
    let mut c = RasterCanvas::from_image(img).unwrap();
    let base = c.layers()[0];
    let plan = vec![
        TilePlacement::new(0, size(2, 1), Offset::ZERO),
        TilePlacement::new(1, size(2, 1), Offset::new(2, 0)).flipped(Axis::Horizontal),
    ];
    let merged = materialize_merged(&mut c, base, &plan).unwrap();
    assert_eq!(merged, base);
    assert_eq!(c.layers(), vec![base]);
    let px = c.layer_pixels(base).unwrap();
    assert_eq!(px.dimensions(), (4, 1));
    assert_eq!(*px.get_pixel(0, 0), RED);
    assert_eq!(*px.get_pixel(2, 0), BLUE);
    assert_eq!(*px.get_pixel(3, 0), RED);
}

#[test]
fn merging_requires_base_on_top() {
    let mut c = RasterCanvas::new(size(4, 4));
    let base = c.new_layer("base", size(1, 1), RED).unwrap();
    c.new_layer("above", size(1, 1), BLUE).unwrap();
    let err = materialize_merged(&mut c, base, &[]).unwrap_err();
    assert!(matches!(err, FoldError::Canvas(_)));
}
