use image::RgbaImage;

use crate::foundation::core::{BlendMode, Color, Offset};

/// Composite one straight-alpha pixel `src` onto `dst`.
///
/// `opacity` is a 0..=1 factor applied to the source alpha. Every mode except
/// [`BlendMode::LegacyAddition`] produces the union coverage `sa + da * (1 - sa)`; the legacy
/// additive mode keeps the coverage of `dst`.
pub fn blend_pixel(dst: Color, src: Color, mode: BlendMode, opacity: f32) -> Color {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let sa = unit(src[3]) * opacity;
    let da = unit(dst[3]);

    if mode == BlendMode::LegacyAddition {
        let mut out = dst;
        for i in 0..3 {
            let d = unit(dst[i]);
            let b = (d + unit(src[i])).min(1.0);
            out[i] = to_u8(d + (b - d) * sa);
        }
        return out;
    }

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return image::Rgba([0, 0, 0, 0]);
    }

    let mut out = [0u8; 4];
    for i in 0..3 {
        let s = unit(src[i]);
        let d = unit(dst[i]);
        let b = blend_channel(mode, d, s);
        // Where the backdrop is empty the source shows through unblended.
        let c = sa * (1.0 - da) * s + sa * da * b + (1.0 - sa) * da * d;
        out[i] = to_u8(c / out_a);
    }
    out[3] = to_u8(out_a);
    image::Rgba(out)
}

fn blend_channel(mode: BlendMode, d: f32, s: f32) -> f32 {
    match mode {
        BlendMode::Normal => s,
        BlendMode::Multiply => d * s,
        BlendMode::Addition | BlendMode::LegacyAddition => (d + s).min(1.0),
        BlendMode::DarkenOnly => d.min(s),
        BlendMode::LightenOnly => d.max(s),
        BlendMode::Overlay => {
            if d < 0.5 {
                2.0 * d * s
            } else {
                1.0 - 2.0 * (1.0 - d) * (1.0 - s)
            }
        }
        BlendMode::Dodge => {
            if s >= 1.0 {
                1.0
            } else {
                (d / (1.0 - s)).min(1.0)
            }
        }
        BlendMode::Burn => {
            if s <= 0.0 {
                0.0
            } else {
                1.0 - ((1.0 - d) / s).min(1.0)
            }
        }
    }
}

/// Composite `src` (placed at `src_origin`) onto `dst` (placed at `dst_origin`). Both origins
/// are in the same coordinate space; only the overlap is touched.
pub fn composite_onto(
    dst: &mut RgbaImage,
    dst_origin: Offset,
    src: &RgbaImage,
    src_origin: Offset,
    mode: BlendMode,
    opacity: f32,
) {
    let Some((x0, y0, x1, y1)) = overlap(dst, dst_origin, src, src_origin) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let dx = (x - dst_origin.x) as u32;
            let dy = (y - dst_origin.y) as u32;
            let sx = (x - src_origin.x) as u32;
            let sy = (y - src_origin.y) as u32;
            let out = blend_pixel(*dst.get_pixel(dx, dy), *src.get_pixel(sx, sy), mode, opacity);
            dst.put_pixel(dx, dy, out);
        }
    }
}

/// Copy `src` pixels verbatim onto `dst` over their overlap.
pub fn blit(dst: &mut RgbaImage, dst_origin: Offset, src: &RgbaImage, src_origin: Offset) {
    let Some((x0, y0, x1, y1)) = overlap(dst, dst_origin, src, src_origin) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let px = *src.get_pixel((x - src_origin.x) as u32, (y - src_origin.y) as u32);
            dst.put_pixel((x - dst_origin.x) as u32, (y - dst_origin.y) as u32, px);
        }
    }
}

fn overlap(
    a: &RgbaImage,
    a_origin: Offset,
    b: &RgbaImage,
    b_origin: Offset,
) -> Option<(i32, i32, i32, i32)> {
    let x0 = a_origin.x.max(b_origin.x);
    let y0 = a_origin.y.max(b_origin.y);
    let x1 = (a_origin.x + a.width() as i32).min(b_origin.x + b.width() as i32);
    let y1 = (a_origin.y + a.height() as i32).min(b_origin.y + b.height() as i32);
    (x0 < x1 && y0 < y1).then_some((x0, y0, x1, y1))
}

fn unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}

fn to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/composite.rs"]
mod tests;
