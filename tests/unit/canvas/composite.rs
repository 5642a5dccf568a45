use super::*;

use image::Rgba;

#[test]
fn normal_opacity_0_is_noop() {
    let dst = Rgba([1, 2, 3, 4]);
    let src = Rgba([200, 200, 200, 200]);
    assert_eq!(blend_pixel(dst, src, BlendMode::Normal, 0.0), dst);
}

#[test]
fn src_alpha_0_is_noop() {
    let dst = Rgba([10, 20, 30, 40]);
    let src = Rgba([255, 255, 255, 0]);
    assert_eq!(blend_pixel(dst, src, BlendMode::Multiply, 1.0), dst);
}

#[test]
fn normal_opaque_src_replaces_dst() {
    let dst = Rgba([0, 0, 0, 255]);
    let src = Rgba([255, 0, 0, 255]);
    assert_eq!(blend_pixel(dst, src, BlendMode::Normal, 1.0), src);
}

#[test]
fn modes_over_transparent_backdrop_show_source() {
    let dst = Rgba([0, 0, 0, 0]);
    let src = Rgba([100, 110, 120, 255]);
    for mode in [
        BlendMode::Multiply,
        BlendMode::Addition,
        BlendMode::DarkenOnly,
        BlendMode::Overlay,
        BlendMode::Burn,
    ] {
        assert_eq!(blend_pixel(dst, src, mode, 1.0), src, "{mode:?}");
    }
}

#[test]
fn addition_saturates_and_multiply_darkens() {
    let dst = Rgba([200, 100, 0, 255]);
    let src = Rgba([100, 100, 100, 255]);
    assert_eq!(
        blend_pixel(dst, src, BlendMode::Addition, 1.0),
        Rgba([255, 200, 100, 255])
    );
    let m = blend_pixel(dst, src, BlendMode::Multiply, 1.0);
    assert!(m[0] < 200 && m[1] < 100 && m[2] == 0);
}

#[test]
fn legacy_addition_keeps_backdrop_coverage() {
    let dst = Rgba([0, 0, 0, 0]);
    let src = Rgba([90, 90, 90, 255]);
    assert_eq!(blend_pixel(dst, src, BlendMode::LegacyAddition, 1.0)[3], 0);
    assert_eq!(blend_pixel(dst, src, BlendMode::Addition, 1.0)[3], 255);

    let dst = Rgba([10, 20, 30, 255]);
    assert_eq!(
        blend_pixel(dst, src, BlendMode::LegacyAddition, 1.0),
        Rgba([100, 110, 120, 255])
    );
}

#[test]
fn darken_and_lighten_pick_extremes() {
    let dst = Rgba([50, 200, 120, 255]);
    let src = Rgba([100, 100, 120, 255]);
    assert_eq!(
        blend_pixel(dst, src, BlendMode::DarkenOnly, 1.0),
        Rgba([50, 100, 120, 255])
    );
    assert_eq!(
        blend_pixel(dst, src, BlendMode::LightenOnly, 1.0),
        Rgba([100, 200, 120, 255])
    );
}

#[test]
fn composite_onto_only_touches_overlap() {
    let mut dst = RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 255]));
    let src = RgbaImage::from_pixel(2, 2, Rgba([255, 255, 255, 255]));
    composite_onto(
        &mut dst,
        Offset::ZERO,
        &src,
        Offset::new(3, 3),
        BlendMode::Normal,
        1.0,
    );
    assert_eq!(*dst.get_pixel(3, 3), Rgba([255, 255, 255, 255]));
    assert_eq!(*dst.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
}

#[test]
fn blit_copies_transparency_verbatim() {
    let mut dst = RgbaImage::from_pixel(2, 1, Rgba([9, 9, 9, 255]));
    let src = RgbaImage::from_pixel(1, 1, Rgba([0, 0, 0, 0]));
    blit(&mut dst, Offset::ZERO, &src, Offset::new(1, 0));
    assert_eq!(*dst.get_pixel(1, 0), Rgba([0, 0, 0, 0]));
    assert_eq!(*dst.get_pixel(0, 0), Rgba([9, 9, 9, 255]));
}
