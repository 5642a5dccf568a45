//! Composition operations. Each public operation validates its options, opens one undo group
//! on the canvas and leaves a single resulting composition behind.

use crate::canvas::{CanvasBackend, LayerId};
use crate::foundation::core::Axis;
use crate::foundation::error::FoldResult;

pub mod bow;
pub mod border;
pub mod enhance;
pub mod fibonacci;
pub mod infinity;
pub mod plan;
pub mod reflect;

/// Copy the visible image to a new top layer, then flip it as requested.
pub(crate) fn visible_base<C: CanvasBackend>(
    canvas: &mut C,
    name: &str,
    flip_horizontal: bool,
    flip_vertical: bool,
) -> FoldResult<LayerId> {
    let layer = canvas.layer_from_visible(name)?;
    flip(canvas, layer, flip_horizontal, flip_vertical)?;
    Ok(layer)
}

pub(crate) fn flip<C: CanvasBackend>(
    canvas: &mut C,
    layer: LayerId,
    horizontal: bool,
    vertical: bool,
) -> FoldResult<()> {
    if horizontal {
        canvas.flip_layer(layer, Axis::Horizontal)?;
    }
    if vertical {
        canvas.flip_layer(layer, Axis::Vertical)?;
    }
    Ok(())
}
