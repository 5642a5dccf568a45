//! Tonal helpers built from the same primitives: wide blurs, vignette, cheap HDR, sharpen and
//! levels stretch. Each adds one new layer over the visible image.

use crate::canvas::blur::split_wide_radius;
use crate::canvas::{CanvasBackend, Desaturate, LayerId, SelectOp, SelectShape, transaction};
use crate::compose::visible_base;
use crate::foundation::core::{BLACK, BlendMode, MID_GRAY, Offset, WHITE};
use crate::foundation::error::{FoldError, FoldResult};

fn check_opacity(what: &str, opacity: f64) -> FoldResult<()> {
    if !(0.0..=100.0).contains(&opacity) {
        return Err(FoldError::invalid(format!(
            "{what} opacity must be within 0..=100, got {opacity}"
        )));
    }
    Ok(())
}

fn check_radius(what: &str, radius: f64) -> FoldResult<()> {
    if !radius.is_finite() || radius < 0.0 {
        return Err(FoldError::invalid(format!(
            "{what} radius must be finite and >= 0, got {radius}"
        )));
    }
    Ok(())
}

/// Gaussian blur that stays accurate at large radii by splitting into several narrower passes.
#[tracing::instrument(skip(canvas))]
pub fn wide_blur<C: CanvasBackend>(canvas: &mut C, layer: LayerId, radius: f64) -> FoldResult<()> {
    check_radius("blur", radius)?;
    let (passes, per_pass) = split_wide_radius(radius);
    transaction(canvas, |canvas| {
        for _ in 0..passes {
            canvas.gaussian_blur(layer, per_pass)?;
        }
        Ok(())
    })
}

/// Resample a layer to cover the whole canvas.
#[tracing::instrument(skip(canvas))]
pub fn scale_layer_to_image<C: CanvasBackend>(canvas: &mut C, layer: LayerId) -> FoldResult<()> {
    transaction(canvas, |canvas| {
        let size = canvas.size();
        canvas.scale_layer(layer, size)?;
        canvas.set_offset(layer, Offset::ZERO)
    })
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct VignetteOptions {
    pub lighten_corners: bool,
    pub blur_radius: f64,
    pub opacity: f64,
}

impl Default for VignetteOptions {
    fn default() -> Self {
        Self {
            lighten_corners: false,
            blur_radius: 500.0,
            opacity: 50.0,
        }
    }
}

impl VignetteOptions {
    pub fn validate(&self) -> FoldResult<()> {
        check_radius("vignette", self.blur_radius)?;
        check_opacity("vignette", self.opacity)
    }
}

/// Overlay layer that darkens (or lightens) the corners around a neutral inscribed ellipse.
#[tracing::instrument(skip(canvas))]
pub fn vignette<C: CanvasBackend>(canvas: &mut C, opts: &VignetteOptions) -> FoldResult<LayerId> {
    opts.validate()?;
    transaction(canvas, |canvas| {
        let size = canvas.size();
        let corners = if opts.lighten_corners { WHITE } else { BLACK };
        let layer = canvas.new_layer("Vignette", size, corners)?;
        canvas.set_blend_mode(layer, BlendMode::Overlay)?;
        canvas.set_opacity(layer, opts.opacity)?;
        canvas.select(
            SelectOp::Replace,
            SelectShape::Ellipse,
            size.to_rect(Offset::ZERO),
        )?;
        canvas.fill(layer, MID_GRAY, true)?;
        canvas.select_none();
        wide_blur(canvas, layer, opts.blur_radius)?;
        Ok(layer)
    })
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CheapHdrOptions {
    pub radius: f64,
    pub opacity: f64,
}

impl Default for CheapHdrOptions {
    fn default() -> Self {
        Self {
            radius: 500.0,
            opacity: 50.0,
        }
    }
}

impl CheapHdrOptions {
    pub fn validate(&self) -> FoldResult<()> {
        check_radius("hdr", self.radius)?;
        check_opacity("hdr", self.opacity)
    }
}

/// Lower global contrast while keeping local contrast: an inverted, blurred grey copy in
/// Overlay mode.
#[tracing::instrument(skip(canvas))]
pub fn cheap_hdr<C: CanvasBackend>(canvas: &mut C, opts: &CheapHdrOptions) -> FoldResult<LayerId> {
    opts.validate()?;
    transaction(canvas, |canvas| {
        let layer = visible_base(canvas, "Cheap HDR", false, false)?;
        wide_blur(canvas, layer, opts.radius)?;
        canvas.desaturate(layer, Desaturate::Luminance)?;
        canvas.invert(layer)?;
        canvas.set_blend_mode(layer, BlendMode::Overlay)?;
        canvas.set_opacity(layer, opts.opacity)?;
        Ok(layer)
    })
}

/// Unsharp-mask amount used by [`sharpen`].
pub const SHARPEN_AMOUNT: f64 = 0.5;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SharpenOptions {
    pub radius: f64,
    pub mode: BlendMode,
}

impl Default for SharpenOptions {
    fn default() -> Self {
        Self {
            radius: 9.0,
            mode: BlendMode::DarkenOnly,
        }
    }
}

impl SharpenOptions {
    pub fn validate(&self) -> FoldResult<()> {
        check_radius("sharpen", self.radius)
    }
}

#[tracing::instrument(skip(canvas))]
pub fn sharpen<C: CanvasBackend>(canvas: &mut C, opts: &SharpenOptions) -> FoldResult<LayerId> {
    opts.validate()?;
    transaction(canvas, |canvas| {
        let layer = visible_base(canvas, "Sharpened", false, false)?;
        canvas.unsharp_mask(layer, opts.radius, SHARPEN_AMOUNT)?;
        canvas.set_blend_mode(layer, opts.mode)?;
        Ok(layer)
    })
}

/// Copy of the visible image with every channel stretched to the full range.
#[tracing::instrument(skip(canvas))]
pub fn stretch<C: CanvasBackend>(canvas: &mut C, opacity: f64) -> FoldResult<LayerId> {
    check_opacity("stretch", opacity)?;
    transaction(canvas, |canvas| {
        let layer = visible_base(canvas, "Stretched", false, false)?;
        canvas.stretch_levels(layer)?;
        canvas.set_opacity(layer, opacity)?;
        Ok(layer)
    })
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct QuickEnhanceOptions {
    pub hdr: CheapHdrOptions,
    pub sharpen: SharpenOptions,
    /// Opacity of the stretched layer; zero adds a plain visible copy instead.
    pub stretch_opacity: f64,
}

impl Default for QuickEnhanceOptions {
    fn default() -> Self {
        Self {
            hdr: CheapHdrOptions {
                radius: 750.0,
                opacity: 50.0,
            },
            sharpen: SharpenOptions::default(),
            stretch_opacity: 50.0,
        }
    }
}

impl QuickEnhanceOptions {
    pub fn validate(&self) -> FoldResult<()> {
        self.hdr.validate()?;
        self.sharpen.validate()?;
        check_opacity("stretch", self.stretch_opacity)
    }
}

/// Cheap HDR, then sharpen, then stretch, as one undoable step. Returns the top layer.
#[tracing::instrument(skip(canvas))]
pub fn quick_enhance<C: CanvasBackend>(
    canvas: &mut C,
    opts: &QuickEnhanceOptions,
) -> FoldResult<LayerId> {
    opts.validate()?;
    transaction(canvas, |canvas| {
        cheap_hdr(canvas, &opts.hdr)?;
        sharpen(canvas, &opts.sharpen)?;
        if opts.stretch_opacity > 0.0 {
            stretch(canvas, opts.stretch_opacity)
        } else {
            visible_base(canvas, "Quick Enhanced", false, false)
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/enhance.rs"]
mod tests;
