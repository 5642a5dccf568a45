use std::f64::consts::TAU;

use image::RgbaImage;

/// Rectangular-to-polar remap of a whole buffer.
///
/// The output disc is centred in the buffer with radius `min(width, height) / 2`. Going
/// clockwise from the bottom of the disc sweeps the source from its left edge to its right edge,
/// so the source's horizontal centre lands at the top. Source row 0 maps to the rim and the last
/// row to the centre. Pixels outside the disc become transparent.
pub fn rect_to_polar(src: &RgbaImage) -> RgbaImage {
    let (w, h) = src.dimensions();
    let mut out = RgbaImage::new(w, h);
    if w == 0 || h == 0 {
        return out;
    }

    let cx = f64::from(w) / 2.0;
    let cy = f64::from(h) / 2.0;
    let radius = cx.min(cy);

    for (x, y, px) in out.enumerate_pixels_mut() {
        let dx = f64::from(x) + 0.5 - cx;
        let dy = f64::from(y) + 0.5 - cy;
        let d = dx.hypot(dy);
        if d > radius {
            continue;
        }
        let theta = (-dx).atan2(dy).rem_euclid(TAU);
        let sx = ((theta / TAU) * f64::from(w)).floor() as u32;
        let sy = ((1.0 - d / radius) * f64::from(h)).floor() as u32;
        *px = *src.get_pixel(sx.min(w - 1), sy.min(h - 1));
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/polar.rs"]
mod tests;
