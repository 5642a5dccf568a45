//! Jagged border masks.
//!
//! A soft band is grown inward from the chosen edges and added to a grey copy of the image, so
//! the band's fall-off is roughened by the image content. Flood-selecting from the corners then
//! cuts a hard, irregular edge through it.

use crate::canvas::{CanvasBackend, Desaturate, LayerId, SelectOp, SelectShape, transaction};
use crate::compose::enhance::wide_blur;
use crate::foundation::core::{BLACK, BlendMode, Offset, Rect, Size, WHITE};
use crate::foundation::error::FoldResult;

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BorderShape {
    /// Both bands in two passes, which keeps the corners square.
    #[default]
    Rectangular,
    /// Top and bottom bands.
    HorizontalOnly,
    /// Left and right bands.
    VerticalOnly,
    Elliptical,
    /// All four sides in a single pass; the blur rounds the corners.
    RoundedRectangular,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BorderOptions {
    pub shape: BorderShape,
    /// Draw a white border instead of a black one.
    pub white: bool,
    /// Band width in pixels.
    pub size: u32,
    /// Flood-select tolerance per channel.
    pub threshold: u8,
    /// Close border-coloured islands inside the image.
    pub fill_islands: bool,
    /// Force a crisp 1-pixel edge around the canvas.
    pub one_pixel_border: bool,
}

impl Default for BorderOptions {
    fn default() -> Self {
        Self {
            shape: BorderShape::Rectangular,
            white: false,
            size: 50,
            threshold: 1,
            fill_islands: true,
            one_pixel_border: true,
        }
    }
}

impl BorderOptions {
    pub fn validate(&self) -> FoldResult<()> {
        Ok(())
    }
}

/// One mask-building pass: the inset region whose complement seeds the band.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BorderPass {
    pub shape: BorderShape,
    #[serde(skip)]
    pub select: SelectShape,
    pub inset: Rect,
    pub blur_radius: f64,
}

fn inset_for(canvas: Size, shape: BorderShape, border: u32) -> BorderPass {
    let (w, h, s) = (
        f64::from(canvas.width),
        f64::from(canvas.height),
        f64::from(border),
    );
    let (mut x0, mut y0, mut x1, mut y1) = (0.0, 0.0, w, h);
    match shape {
        BorderShape::HorizontalOnly => {
            y0 += s;
            y1 -= s;
        }
        BorderShape::VerticalOnly => {
            x0 += s;
            x1 -= s;
        }
        _ => {
            x0 += s;
            x1 -= s;
            y0 += s;
            y1 -= s;
        }
    }
    BorderPass {
        shape,
        select: if shape == BorderShape::Elliptical {
            SelectShape::Ellipse
        } else {
            SelectShape::Rectangle
        },
        inset: Rect::new(x0, y0, x1.max(x0), y1.max(y0)),
        blur_radius: 2.0 * s,
    }
}

/// Passes run for `opts` on a canvas of size `canvas`.
pub fn border_passes(canvas: Size, opts: &BorderOptions) -> Vec<BorderPass> {
    match opts.shape {
        BorderShape::Rectangular => vec![
            inset_for(canvas, BorderShape::HorizontalOnly, opts.size),
            inset_for(canvas, BorderShape::VerticalOnly, opts.size),
        ],
        shape => vec![inset_for(canvas, shape, opts.size)],
    }
}

/// Add one jagged border mask per pass.
///
/// A white border yields a white-on-black mask in Addition mode; a black border yields the
/// inverse in Multiply mode.
#[tracing::instrument(skip(canvas))]
pub fn jagged_border<C: CanvasBackend>(
    canvas: &mut C,
    opts: &BorderOptions,
) -> FoldResult<Vec<LayerId>> {
    opts.validate()?;
    transaction(canvas, |canvas| {
        let passes = border_passes(canvas.size(), opts);
        passes
            .iter()
            .map(|pass| border_pass(canvas, pass, opts))
            .collect()
    })
}

fn border_pass<C: CanvasBackend>(
    canvas: &mut C,
    pass: &BorderPass,
    opts: &BorderOptions,
) -> FoldResult<LayerId> {
    let size = canvas.size();
    tracing::debug!(shape = ?pass.shape, inset = ?pass.inset, "border pass");

    // soft band: white outside the inset, blurred inward
    let band = canvas.layer_from_visible("tmp")?;
    let grey = canvas.layer_from_visible("border")?;
    canvas.fill(band, BLACK, false)?;
    canvas.select(SelectOp::Replace, pass.select, pass.inset)?;
    canvas.invert_selection();
    canvas.fill(band, WHITE, true)?;
    canvas.select_none();
    wide_blur(canvas, band, pass.blur_radius)?;

    canvas.desaturate(grey, Desaturate::Lightness)?;
    if !opts.white {
        canvas.invert(grey)?;
    }
    if opts.one_pixel_border {
        canvas.select(
            SelectOp::Replace,
            SelectShape::Rectangle,
            size.to_rect(Offset::ZERO),
        )?;
        canvas.shrink_selection(1);
        canvas.invert_selection();
        canvas.fill(grey, WHITE, true)?;
        canvas.select_none();
    }

    // the legacy mode keeps the band's coverage; later modes only see binary masks
    canvas.set_blend_mode(grey, BlendMode::LegacyAddition)?;
    let merged = canvas.merge_down(grey)?;
    let (right, bottom) = (size.width - 1, size.height - 1);
    canvas.flood_select(
        merged,
        &[(0, 0), (right, 0), (0, bottom), (right, bottom)],
        opts.threshold,
        SelectOp::Replace,
    )?;
    canvas.remove_layer(merged)?;

    let mask = canvas.new_layer("Border", size, WHITE)?;
    canvas.invert_selection();
    canvas.invert(mask)?;
    canvas.select_none();
    canvas.set_blend_mode(mask, BlendMode::Addition)?;

    if opts.fill_islands {
        canvas.flood_select(
            mask,
            &[(size.width / 2, size.height / 2)],
            opts.threshold,
            SelectOp::Replace,
        )?;
        canvas.invert_selection();
        canvas.fill(mask, WHITE, true)?;
        canvas.select_none();
    }

    if !opts.white {
        canvas.invert(mask)?;
        canvas.set_blend_mode(mask, BlendMode::Multiply)?;
    }
    Ok(mask)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/border.rs"]
mod tests;
