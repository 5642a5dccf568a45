//! The canvas/layer primitive surface the composition engine is written against.
//!
//! Composition code never touches pixels directly: it drives a [`CanvasBackend`], which owns the
//! layer stack, the selection and the undo history. [`RasterCanvas`] is the in-memory reference
//! implementation used by the `foldwork` binary and the tests.

use std::ops::{Deref, DerefMut};

use crate::foundation::core::{Axis, BlendMode, Color, Offset, QuarterTurns, Rect, Size};
use crate::foundation::error::FoldResult;

pub mod blur;
pub mod composite;
pub mod polar;
pub mod raster;
pub mod selection;

pub use raster::RasterCanvas;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
/// Handle to a layer inside one canvas. Handles are never reused within a canvas.
pub struct LayerId(pub u32);

#[derive(Clone, Debug, PartialEq)]
pub struct LayerInfo {
    pub id: LayerId,
    pub name: String,
    pub size: Size,
    pub offset: Offset,
    pub mode: BlendMode,
    /// 0..=100, like the opacity slider of a layers dialog.
    pub opacity: f64,
    pub visible: bool,
}

impl LayerInfo {
    pub fn bounds(&self) -> Rect {
        self.size.to_rect(self.offset)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectOp {
    Replace,
    Add,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelectShape {
    Rectangle,
    Ellipse,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Desaturate {
    /// (max + min) / 2 per pixel.
    Lightness,
    /// Rec. 709 luma.
    Luminance,
    Average,
}

/// Primitive canvas operations.
///
/// Layers are stacked bottom-to-top; new layers are always added on top. Canvas coordinates
/// have their origin at the top-left corner, and a layer may extend past the canvas bounds until
/// the canvas is resized to fit.
pub trait CanvasBackend {
    fn size(&self) -> Size;

    /// A fresh, empty canvas of the same backend kind, used for scratch work.
    fn spawn(&self, size: Size) -> Self
    where
        Self: Sized;

    /// Layer handles, bottom to top.
    fn layers(&self) -> Vec<LayerId>;

    fn layer(&self, id: LayerId) -> FoldResult<LayerInfo>;

    /// Composite every visible layer into a new canvas-sized layer placed on top.
    fn layer_from_visible(&mut self, name: &str) -> FoldResult<LayerId>;

    fn new_layer(&mut self, name: &str, size: Size, fill: Color) -> FoldResult<LayerId>;

    fn duplicate_layer(&mut self, id: LayerId) -> FoldResult<LayerId>;

    /// Copy a layer from another canvas of the same kind, keeping its offset and properties.
    fn import_layer(&mut self, src: &Self, id: LayerId) -> FoldResult<LayerId>
    where
        Self: Sized;

    fn remove_layer(&mut self, id: LayerId) -> FoldResult<()>;

    /// Move a layer one step towards the bottom of the stack.
    fn lower_layer(&mut self, id: LayerId) -> FoldResult<()>;

    /// Merge `id` into the layer directly beneath it, expanding as necessary. Returns the
    /// merged layer, which keeps the lower layer's handle and properties.
    fn merge_down(&mut self, id: LayerId) -> FoldResult<LayerId>;

    /// Collapse every visible layer into one canvas-sized layer; hidden layers are discarded.
    fn flatten(&mut self) -> FoldResult<LayerId>;

    fn set_offset(&mut self, id: LayerId, offset: Offset) -> FoldResult<()>;
    fn set_blend_mode(&mut self, id: LayerId, mode: BlendMode) -> FoldResult<()>;
    fn set_opacity(&mut self, id: LayerId, opacity: f64) -> FoldResult<()>;
    fn set_visible(&mut self, id: LayerId, visible: bool) -> FoldResult<()>;

    /// Resample a layer to `size`, keeping its top-left offset.
    fn scale_layer(&mut self, id: LayerId, size: Size) -> FoldResult<()>;

    /// Change a layer's boundary without resampling. `content` is where the old pixels land
    /// inside the new boundary; the layer moves so that the pixels stay put on the canvas.
    fn resize_layer(&mut self, id: LayerId, size: Size, content: Offset) -> FoldResult<()>;

    /// Mirror a layer in place about its own centre line.
    fn flip_layer(&mut self, id: LayerId, axis: Axis) -> FoldResult<()>;

    /// Rotate a layer clockwise about its own centre.
    fn rotate_layer(&mut self, id: LayerId, turns: QuarterTurns) -> FoldResult<()>;

    /// Change the canvas size; every layer moves by `offset`.
    fn resize(&mut self, size: Size, offset: Offset) -> FoldResult<()>;

    /// Keep only the `size` region at `origin`, clipping every layer to it.
    fn crop(&mut self, size: Size, origin: Offset) -> FoldResult<()>;

    /// Resample the whole canvas, layers included, to `size`.
    fn scale(&mut self, size: Size) -> FoldResult<()>;

    /// Rotate the whole canvas clockwise.
    fn rotate(&mut self, turns: QuarterTurns) -> FoldResult<()>;

    /// Grow or shrink the canvas to the bounding box of all layers. Returns the new size.
    fn resize_to_layers(&mut self) -> FoldResult<Size>;

    fn select(&mut self, op: SelectOp, shape: SelectShape, rect: Rect) -> FoldResult<()>;
    fn select_none(&mut self);
    fn has_selection(&self) -> bool;
    fn invert_selection(&mut self);
    fn shrink_selection(&mut self, pixels: u32);

    /// Select every pixel connected to one of `seeds` whose colour differs from that seed's by
    /// at most `threshold` on every channel. Seeds are canvas coordinates.
    fn flood_select(
        &mut self,
        id: LayerId,
        seeds: &[(u32, u32)],
        threshold: u8,
        op: SelectOp,
    ) -> FoldResult<()>;

    fn fill(&mut self, id: LayerId, color: Color, respect_selection: bool) -> FoldResult<()>;

    /// Invert colour channels; restricted to the selection when there is one.
    fn invert(&mut self, id: LayerId) -> FoldResult<()>;

    fn desaturate(&mut self, id: LayerId, mode: Desaturate) -> FoldResult<()>;

    fn gaussian_blur(&mut self, id: LayerId, radius: f64) -> FoldResult<()>;

    fn unsharp_mask(&mut self, id: LayerId, radius: f64, amount: f64) -> FoldResult<()>;

    /// Stretch each colour channel independently to the full 0..=255 range.
    fn stretch_levels(&mut self, id: LayerId) -> FoldResult<()>;

    /// Map a rectangular strip filling the layer onto a disc centred in the layer.
    fn polar_remap(&mut self, id: LayerId) -> FoldResult<()>;

    fn begin_undo_group(&mut self);

    /// Close the innermost group. Closing the outermost group uncommitted rolls back every
    /// edit made since it was opened.
    fn end_undo_group(&mut self, committed: bool);
}

/// Scoped undo group: opened on construction, closed on drop.
///
/// Dropping without [`UndoGroup::commit`] (early `?` return or unwinding) closes the group
/// uncommitted.
pub struct UndoGroup<'a, C: CanvasBackend> {
    canvas: &'a mut C,
    committed: bool,
}

impl<'a, C: CanvasBackend> UndoGroup<'a, C> {
    pub fn begin(canvas: &'a mut C) -> Self {
        canvas.begin_undo_group();
        Self {
            canvas,
            committed: false,
        }
    }

    pub fn commit(mut self) {
        self.committed = true;
    }
}

impl<C: CanvasBackend> Deref for UndoGroup<'_, C> {
    type Target = C;

    fn deref(&self) -> &C {
        self.canvas
    }
}

impl<C: CanvasBackend> DerefMut for UndoGroup<'_, C> {
    fn deref_mut(&mut self) -> &mut C {
        self.canvas
    }
}

impl<C: CanvasBackend> Drop for UndoGroup<'_, C> {
    fn drop(&mut self) {
        if !self.committed {
            tracing::debug!("undo group closed without commit; rolling back");
        }
        self.canvas.end_undo_group(self.committed);
    }
}

/// Run `op` inside one undo group, committing only if it succeeds.
pub fn transaction<C, T>(
    canvas: &mut C,
    op: impl FnOnce(&mut C) -> FoldResult<T>,
) -> FoldResult<T>
where
    C: CanvasBackend,
{
    let mut group = UndoGroup::begin(canvas);
    let out = op(&mut *group)?;
    group.commit();
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/undo.rs"]
mod tests;
