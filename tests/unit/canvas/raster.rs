use super::*;

const RED: Color = Rgba([255, 0, 0, 255]);
const BLUE: Color = Rgba([0, 0, 255, 255]);

fn size(w: u32, h: u32) -> Size {
    Size::new(w, h).unwrap()
}

fn two_tone(w: u32, h: u32) -> RasterCanvas {
    let mut img = RgbaImage::from_pixel(w, h, BLUE);
    for y in 0..h {
        img.put_pixel(0, y, RED);
    }
    RasterCanvas::from_image(img).unwrap()
}

#[test]
fn layer_from_visible_is_canvas_sized_and_on_top() {
    let mut c = two_tone(4, 3);
    let id = c.layer_from_visible("copy").unwrap();
    assert_eq!(c.layers().last(), Some(&id));
    let info = c.layer(id).unwrap();
    assert_eq!(info.size, size(4, 3));
    assert_eq!(info.offset, Offset::ZERO);
    assert_eq!(*c.layer_pixels(id).unwrap().get_pixel(0, 0), RED);
}

#[test]
fn hidden_layers_do_not_contribute_to_visible() {
    let mut c = two_tone(2, 2);
    let bottom = c.layers()[0];
    c.set_visible(bottom, false).unwrap();
    let id = c.layer_from_visible("v").unwrap();
    assert_eq!(c.layer_pixels(id).unwrap().get_pixel(0, 0)[3], 0);
}

#[test]
fn merge_down_expands_to_union() {
    let mut c = RasterCanvas::new(size(10, 10));
    let a = c.new_layer("a", size(2, 2), RED).unwrap();
    let b = c.new_layer("b", size(2, 2), BLUE).unwrap();
    c.set_offset(b, Offset::new(4, 1)).unwrap();
    let merged = c.merge_down(b).unwrap();
    assert_eq!(merged, a);
    let info = c.layer(a).unwrap();
    assert_eq!(info.size, size(6, 3));
    assert_eq!(info.offset, Offset::ZERO);
    let px = c.layer_pixels(a).unwrap();
    assert_eq!(*px.get_pixel(0, 0), RED);
    assert_eq!(*px.get_pixel(5, 2), BLUE);
    assert_eq!(px.get_pixel(3, 0)[3], 0);
    assert_eq!(c.layers().len(), 1);
}

#[test]
fn merge_down_of_bottom_layer_fails() {
    let mut c = two_tone(2, 2);
    let bottom = c.layers()[0];
    assert!(c.merge_down(bottom).is_err());
}

#[test]
fn rotate_canvas_quarter_turn_moves_offsets() {
    let mut c = RasterCanvas::new(size(10, 4));
    let id = c.new_layer("a", size(2, 1), RED).unwrap();
    c.set_offset(id, Offset::new(1, 0)).unwrap();
    c.rotate(QuarterTurns::CW).unwrap();
    assert_eq!(c.size(), size(4, 10));
    let info = c.layer(id).unwrap();
    assert_eq!(info.size, size(1, 2));
    assert_eq!(info.offset, Offset::new(3, 1));

    c.rotate(QuarterTurns::CCW).unwrap();
    assert_eq!(c.size(), size(10, 4));
    assert_eq!(c.layer(id).unwrap().offset, Offset::new(1, 0));
}

#[test]
fn crop_clips_layers_and_drops_outsiders() {
    let mut c = RasterCanvas::new(size(10, 10));
    let a = c.new_layer("a", size(10, 10), RED).unwrap();
    let b = c.new_layer("b", size(2, 2), BLUE).unwrap();
    c.set_offset(b, Offset::new(8, 8)).unwrap();
    c.crop(size(4, 4), Offset::new(2, 2)).unwrap();
    assert_eq!(c.size(), size(4, 4));
    assert_eq!(c.layers(), vec![a]);
    let info = c.layer(a).unwrap();
    assert_eq!(info.size, size(4, 4));
    assert_eq!(info.offset, Offset::ZERO);
}

#[test]
fn resize_to_layers_covers_negative_offsets() {
    let mut c = RasterCanvas::new(size(4, 4));
    let a = c.new_layer("a", size(4, 4), RED).unwrap();
    let b = c.new_layer("b", size(3, 3), BLUE).unwrap();
    c.set_offset(b, Offset::new(-2, 3)).unwrap();
    let s = c.resize_to_layers().unwrap();
    assert_eq!(s, size(6, 6));
    assert_eq!(c.layer(a).unwrap().offset, Offset::new(2, 0));
    assert_eq!(c.layer(b).unwrap().offset, Offset::new(0, 3));
}

#[test]
fn resize_layer_keeps_pixels_in_place() {
    let mut c = RasterCanvas::new(size(8, 8));
    let a = c.new_layer("a", size(2, 2), RED).unwrap();
    c.resize_layer(a, size(6, 2), Offset::new(2, 0)).unwrap();
    let info = c.layer(a).unwrap();
    assert_eq!(info.offset, Offset::new(-2, 0));
    assert_eq!(*c.layer_pixels(a).unwrap().get_pixel(2, 0), RED);
    assert_eq!(c.layer_pixels(a).unwrap().get_pixel(0, 0)[3], 0);
}

#[test]
fn invert_respects_selection() {
    let mut c = RasterCanvas::new(size(4, 1));
    let a = c.new_layer("a", size(4, 1), Rgba([0, 0, 0, 255])).unwrap();
    c.select(
        SelectOp::Replace,
        SelectShape::Rectangle,
        Rect::new(0.0, 0.0, 2.0, 1.0),
    )
    .unwrap();
    c.invert(a).unwrap();
    let px = c.layer_pixels(a).unwrap();
    assert_eq!(*px.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    assert_eq!(*px.get_pixel(3, 0), Rgba([0, 0, 0, 255]));
}

#[test]
fn invert_selection_of_nothing_selects_everything() {
    let mut c = RasterCanvas::new(size(3, 3));
    assert!(!c.has_selection());
    c.invert_selection();
    assert!(c.has_selection());
    c.select_none();
    assert!(!c.has_selection());
}

#[test]
fn desaturate_lightness_averages_extremes() {
    let mut c = RasterCanvas::new(size(1, 1));
    let a = c.new_layer("a", size(1, 1), Rgba([200, 100, 0, 255])).unwrap();
    c.desaturate(a, Desaturate::Lightness).unwrap();
    assert_eq!(*c.layer_pixels(a).unwrap().get_pixel(0, 0), Rgba([100, 100, 100, 255]));
}

#[test]
fn stretch_levels_spans_full_range() {
    let mut img = RgbaImage::from_pixel(2, 1, Rgba([50, 50, 50, 255]));
    img.put_pixel(1, 0, Rgba([150, 150, 150, 255]));
    let mut c = RasterCanvas::from_image(img).unwrap();
    let a = c.layers()[0];
    c.stretch_levels(a).unwrap();
    let px = c.layer_pixels(a).unwrap();
    assert_eq!(px.get_pixel(0, 0)[0], 0);
    assert_eq!(px.get_pixel(1, 0)[0], 255);
}

#[test]
fn scale_resamples_layers_and_offsets() {
    let mut c = RasterCanvas::new(size(10, 10));
    let a = c.new_layer("a", size(4, 4), RED).unwrap();
    c.set_offset(a, Offset::new(2, 2)).unwrap();
    c.scale(size(5, 20)).unwrap();
    let info = c.layer(a).unwrap();
    assert_eq!(info.size, size(2, 8));
    assert_eq!(info.offset, Offset::new(1, 4));
}
