//! Tile placement records and their materialisation.
//!
//! Planners are pure functions of sizes and options; nothing here looks at pixels. A plan is
//! turned into layers in one pass by [`materialize`], optionally merged down into the base.

use crate::canvas::{CanvasBackend, LayerId};
use crate::foundation::core::{Axis, BlendMode, Offset, QuarterTurns, Size};
use crate::foundation::error::{FoldError, FoldResult};

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct TilePlacement {
    pub index: u32,
    /// Size the base copy is resampled to, before rotation.
    pub size: Size,
    /// Top-left corner of the rotated tile in canvas coordinates.
    pub offset: Offset,
    pub turns: QuarterTurns,
    pub flip_horizontal: bool,
    pub flip_vertical: bool,
    pub mode: BlendMode,
    pub opacity: f64,
}

impl TilePlacement {
    pub fn new(index: u32, size: Size, offset: Offset) -> Self {
        Self {
            index,
            size,
            offset,
            turns: QuarterTurns::NONE,
            flip_horizontal: false,
            flip_vertical: false,
            mode: BlendMode::Normal,
            opacity: 100.0,
        }
    }

    pub fn flipped(mut self, axis: Axis) -> Self {
        match axis {
            Axis::Horizontal => self.flip_horizontal = true,
            Axis::Vertical => self.flip_vertical = true,
        }
        self
    }

    /// Footprint on the canvas once rotated.
    pub fn extent(&self) -> Size {
        self.turns.rotate_size(self.size)
    }

    pub fn right(&self) -> i64 {
        i64::from(self.offset.x) + i64::from(self.extent().width)
    }

    pub fn bottom(&self) -> i64 {
        i64::from(self.offset.y) + i64::from(self.extent().height)
    }
}

/// Add one copy of `base` per placement, in order, on top of the stack.
pub fn materialize<C: CanvasBackend>(
    canvas: &mut C,
    base: LayerId,
    placements: &[TilePlacement],
) -> FoldResult<Vec<LayerId>> {
    let base_size = canvas.layer(base)?.size;
    let mut ids = Vec::with_capacity(placements.len());
    for p in placements {
        let tile = canvas.duplicate_layer(base)?;
        if p.size != base_size {
            canvas.scale_layer(tile, p.size)?;
        }
        canvas.rotate_layer(tile, p.turns)?;
        if p.flip_horizontal {
            canvas.flip_layer(tile, Axis::Horizontal)?;
        }
        if p.flip_vertical {
            canvas.flip_layer(tile, Axis::Vertical)?;
        }
        canvas.set_offset(tile, p.offset)?;
        canvas.set_blend_mode(tile, p.mode)?;
        canvas.set_opacity(tile, p.opacity)?;
        ids.push(tile);
    }
    Ok(ids)
}

/// Materialise `placements` and merge every tile, in index order, down into `base`.
///
/// `base` must be the top layer so the tiles stack directly above it.
pub fn materialize_merged<C: CanvasBackend>(
    canvas: &mut C,
    base: LayerId,
    placements: &[TilePlacement],
) -> FoldResult<LayerId> {
    if canvas.layers().last() != Some(&base) {
        return Err(FoldError::canvas("tiles must be merged into the top layer"));
    }
    let tiles = materialize(canvas, base, placements)?;
    let Some((&first, rest)) = tiles.split_first() else {
        return Ok(base);
    };
    let mut merged = first;
    for &tile in rest {
        merged = canvas.merge_down(tile)?;
    }
    canvas.merge_down(merged)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/plan.rs"]
mod tests;
