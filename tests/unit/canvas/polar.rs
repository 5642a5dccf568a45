use super::*;

use image::Rgba;

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const BLUE: Rgba<u8> = Rgba([0, 0, 255, 255]);

#[test]
fn corners_outside_the_disc_are_transparent() {
    let src = RgbaImage::from_pixel(20, 20, RED);
    let out = rect_to_polar(&src);
    assert_eq!(out.get_pixel(0, 0)[3], 0);
    assert_eq!(out.get_pixel(19, 19)[3], 0);
    assert_eq!(*out.get_pixel(10, 10), RED);
}

#[test]
fn top_row_maps_to_rim_and_bottom_row_to_centre() {
    let mut src = RgbaImage::from_pixel(40, 40, BLUE);
    for x in 0..40 {
        src.put_pixel(x, 0, RED);
        src.put_pixel(x, 1, RED);
    }
    let out = rect_to_polar(&src);
    assert_eq!(*out.get_pixel(20, 0), RED);
    assert_eq!(*out.get_pixel(20, 20), BLUE);
}

#[test]
fn horizontal_centre_of_strip_lands_on_top() {
    let mut src = RgbaImage::from_pixel(40, 40, BLUE);
    for y in 0..40 {
        for x in 18..22 {
            src.put_pixel(x, y, RED);
        }
    }
    let out = rect_to_polar(&src);
    assert_eq!(*out.get_pixel(20, 5), RED);
    assert_eq!(*out.get_pixel(20, 34), BLUE);
}

#[test]
fn wide_buffer_uses_height_limited_radius() {
    let src = RgbaImage::from_pixel(60, 20, RED);
    let out = rect_to_polar(&src);
    assert_eq!(out.get_pixel(5, 10)[3], 0);
    assert_eq!(*out.get_pixel(30, 10), RED);
}
