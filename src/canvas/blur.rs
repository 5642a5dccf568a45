use image::{Rgba, RgbaImage};

use crate::foundation::core::Axis;
use crate::foundation::error::{FoldError, FoldResult};

/// Largest radius applied in a single Gaussian pass; wider blurs are split into several passes.
pub const MAX_SINGLE_PASS_RADIUS: f64 = 500.0;

const ONE_Q16: u64 = 1 << 16;

/// Sigma whose kernel falls to 1/255 of its peak at `radius`, so a "radius" behaves like the
/// radius field of a classic Gaussian blur dialog.
pub fn sigma_for_radius(radius: f64) -> f64 {
    (radius / (2.0 * 255f64.ln()).sqrt()).max(1e-3)
}

/// Split a blur radius into `(passes, per_pass_radius)`.
///
/// Two Gaussians compose by adding variances, so `n` passes of radius `r / sqrt(n)` match one
/// pass of radius `r`.
pub fn split_wide_radius(radius: f64) -> (u32, f64) {
    let passes = (radius / MAX_SINGLE_PASS_RADIUS).powi(2).ceil().max(1.0) as u32;
    if passes > 1 {
        (passes, (radius * radius / f64::from(passes)).sqrt().floor())
    } else {
        (1, radius)
    }
}

/// Symmetric 1-D Gaussian in Q16 fixed point. The taps sum to exactly one.
#[derive(Clone, Debug, PartialEq)]
pub struct GaussianKernel {
    taps: Vec<u32>,
}

impl GaussianKernel {
    pub fn for_radius(radius: f64) -> FoldResult<Self> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(FoldError::invalid(format!(
                "blur radius must be finite and >= 0, got {radius}"
            )));
        }
        let reach = radius.ceil() as i64;
        if reach == 0 {
            return Ok(Self {
                taps: vec![ONE_Q16 as u32],
            });
        }

        let two_var = 2.0 * sigma_for_radius(radius).powi(2);
        let raw: Vec<f64> = (-reach..=reach)
            .map(|i| (-((i * i) as f64) / two_var).exp())
            .collect();
        let total: f64 = raw.iter().sum();
        let mut taps: Vec<u32> = raw
            .iter()
            .map(|w| (w / total * ONE_Q16 as f64).round() as u32)
            .collect();

        // rounding drift goes to the centre tap
        let sum: u64 = taps.iter().map(|&t| u64::from(t)).sum();
        let centre = &mut taps[reach as usize];
        *centre = (i64::from(*centre) + ONE_Q16 as i64 - sum as i64).max(0) as u32;
        Ok(Self { taps })
    }

    pub fn reach(&self) -> usize {
        self.taps.len() / 2
    }

    /// One pass along `axis` over a premultiplied image, clamping samples at the edges.
    pub fn convolve(&self, src: &RgbaImage, axis: Axis) -> RgbaImage {
        let (w, h) = src.dimensions();
        let reach = self.reach() as i64;
        let last = match axis {
            Axis::Horizontal => i64::from(w) - 1,
            Axis::Vertical => i64::from(h) - 1,
        };
        RgbaImage::from_fn(w, h, |x, y| {
            let along = match axis {
                Axis::Horizontal => i64::from(x),
                Axis::Vertical => i64::from(y),
            };
            let mut acc = [0u64; 4];
            for (k, &tap) in self.taps.iter().enumerate() {
                let at = (along + k as i64 - reach).clamp(0, last) as u32;
                let p = match axis {
                    Axis::Horizontal => src.get_pixel(at, y),
                    Axis::Vertical => src.get_pixel(x, at),
                };
                for (a, &c) in acc.iter_mut().zip(p.0.iter()) {
                    *a += u64::from(tap) * u64::from(c);
                }
            }
            Rgba(acc.map(|a| ((a + ONE_Q16 / 2) >> 16).min(255) as u8))
        })
    }
}

/// Gaussian blur of a straight-alpha image, done in premultiplied space so transparent pixels
/// do not bleed their colour.
pub fn gaussian_blur(src: &RgbaImage, radius: f64) -> FoldResult<RgbaImage> {
    let kernel = GaussianKernel::for_radius(radius)?;
    if kernel.reach() == 0 {
        return Ok(src.clone());
    }
    let mut img = src.clone();
    premultiply(&mut img);
    let mut out = kernel.convolve(&kernel.convolve(&img, Axis::Horizontal), Axis::Vertical);
    unpremultiply(&mut out);
    Ok(out)
}

pub fn premultiply(img: &mut RgbaImage) {
    for p in img.pixels_mut() {
        let a = u16::from(p[3]);
        for c in &mut p.0[..3] {
            *c = ((u16::from(*c) * a + 127) / 255) as u8;
        }
    }
}

pub fn unpremultiply(img: &mut RgbaImage) {
    for p in img.pixels_mut().filter(|p| p[3] != 0) {
        let a = u32::from(p[3]);
        for c in &mut p.0[..3] {
            *c = ((u32::from(*c) * 255 + a / 2) / a).min(255) as u8;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/blur.rs"]
mod tests;
