//! Mirror and accordion tiling.
//!
//! Both are built from one-axis passes: the canvas grows N× along the axis, N copies of the
//! current base are laid end to end (odd copies flipped when folding), and the copies are merged
//! back into the base before the next axis runs.

use crate::canvas::{CanvasBackend, LayerId, transaction};
use crate::compose::plan::{TilePlacement, materialize_merged};
use crate::compose::visible_base;
use crate::foundation::core::{Axis, Offset, Size};
use crate::foundation::error::{FoldError, FoldResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct MirrorOptions {
    pub horizontal: bool,
    pub vertical: bool,
    /// Flip the upper-left reference tile before mirroring.
    pub flip_upper_left_horizontal: bool,
    pub flip_upper_left_vertical: bool,
}

impl Default for MirrorOptions {
    fn default() -> Self {
        Self {
            horizontal: true,
            vertical: true,
            flip_upper_left_horizontal: false,
            flip_upper_left_vertical: false,
        }
    }
}

impl MirrorOptions {
    pub fn validate(&self) -> FoldResult<()> {
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct AccordionOptions {
    /// Tiles along the horizontal axis.
    pub horizontal: u32,
    /// Tiles along the vertical axis.
    pub vertical: u32,
    /// Flip every odd tile so neighbours meet at a fold.
    pub flip_alternate: bool,
    pub flip_upper_left_horizontal: bool,
    pub flip_upper_left_vertical: bool,
}

impl Default for AccordionOptions {
    fn default() -> Self {
        Self {
            horizontal: 2,
            vertical: 2,
            flip_alternate: true,
            flip_upper_left_horizontal: false,
            flip_upper_left_vertical: false,
        }
    }
}

impl AccordionOptions {
    pub fn validate(&self) -> FoldResult<()> {
        if self.horizontal < 1 || self.vertical < 1 {
            return Err(FoldError::invalid(format!(
                "accordion tile counts must be >= 1, got {}x{}",
                self.horizontal, self.vertical
            )));
        }
        Ok(())
    }
}

/// Lay `count` copies of a `tile`-sized base end to end along `axis`.
///
/// Tile `i` sits at `i * extent`; with `flip_alternate` every odd tile is mirrored along the
/// axis. A count of one yields a single unflipped tile at the origin.
pub fn plan_accordion(
    tile: Size,
    axis: Axis,
    count: u32,
    flip_alternate: bool,
) -> FoldResult<Vec<TilePlacement>> {
    if count < 1 {
        return Err(FoldError::invalid("accordion tile count must be >= 1"));
    }
    let step = i32::try_from(tile.along(axis))
        .map_err(|_| FoldError::invalid("tile extent does not fit canvas coordinates"))?;
    (0..count)
        .map(|i| {
            let distance = i32::try_from(i)
                .ok()
                .and_then(|i| i.checked_mul(step))
                .ok_or_else(|| FoldError::invalid("accordion extent overflows"))?;
            let placement = TilePlacement::new(i, tile, Offset::along(axis, distance));
            Ok(if flip_alternate && i % 2 == 1 {
                placement.flipped(axis)
            } else {
                placement
            })
        })
        .collect()
}

/// A single reflection: the tile followed by its mirror image along `axis`.
pub fn plan_reflection(tile: Size, axis: Axis) -> FoldResult<Vec<TilePlacement>> {
    plan_accordion(tile, axis, 2, true)
}

/// Mirror the visible image along the requested axes, leaving one merged layer.
#[tracing::instrument(skip(canvas))]
pub fn mirror<C: CanvasBackend>(canvas: &mut C, opts: &MirrorOptions) -> FoldResult<LayerId> {
    opts.validate()?;
    transaction(canvas, |canvas| {
        let mut base = visible_base(
            canvas,
            "Mirror",
            opts.flip_upper_left_horizontal,
            opts.flip_upper_left_vertical,
        )?;
        for (axis, wanted) in [
            (Axis::Horizontal, opts.horizontal),
            (Axis::Vertical, opts.vertical),
        ] {
            if wanted {
                base = fold_pass(canvas, base, axis, 2, true)?;
            }
        }
        Ok(base)
    })
}

/// Repeat the visible image `horizontal × vertical` times, leaving one merged layer.
#[tracing::instrument(skip(canvas))]
pub fn accordion<C: CanvasBackend>(
    canvas: &mut C,
    opts: &AccordionOptions,
) -> FoldResult<LayerId> {
    opts.validate()?;
    transaction(canvas, |canvas| {
        let mut base = visible_base(
            canvas,
            "Accordion",
            opts.flip_upper_left_horizontal,
            opts.flip_upper_left_vertical,
        )?;
        for (axis, count) in [
            (Axis::Horizontal, opts.horizontal),
            (Axis::Vertical, opts.vertical),
        ] {
            base = fold_pass(canvas, base, axis, count, opts.flip_alternate)?;
        }
        Ok(base)
    })
}

fn fold_pass<C: CanvasBackend>(
    canvas: &mut C,
    base: LayerId,
    axis: Axis,
    count: u32,
    flip_alternate: bool,
) -> FoldResult<LayerId> {
    if count == 1 {
        return Ok(base);
    }
    let tile = canvas.layer(base)?.size;
    let placements = plan_accordion(tile, axis, count, flip_alternate)?;
    let target = tile.repeated(axis, count);
    tracing::debug!(?axis, count, ?tile, ?target, "accordion pass");
    canvas.resize(target, Offset::ZERO)?;
    canvas.set_offset(base, Offset::ZERO)?;
    materialize_merged(canvas, base, &placements)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/reflect.rs"]
mod tests;
