#![forbid(unsafe_code)]
//! Decorative image composition: mirror and accordion tiling, Fibonacci spirals, pan-to-bow
//! arcs, infinity loops and jagged border masks, written against a small layer/canvas API.

pub mod canvas;
pub mod compose;
pub mod foundation;
pub mod recipe;

pub use canvas::{
    CanvasBackend, Desaturate, LayerId, LayerInfo, RasterCanvas, SelectOp, SelectShape,
    UndoGroup, transaction,
};
pub use compose::bow::{Advisory, BowCrop, BowGeometry, BowOptions, BowOutcome, pan_to_bow};
pub use compose::border::{BorderOptions, BorderPass, BorderShape, border_passes, jagged_border};
pub use compose::enhance::{
    CheapHdrOptions, QuickEnhanceOptions, SharpenOptions, VignetteOptions, cheap_hdr,
    quick_enhance, scale_layer_to_image, sharpen, stretch, vignette, wide_blur,
};
pub use compose::fibonacci::{
    SpiralAspect, SpiralOptions, SpiralOutcome, SpiralPlan, fibonacci_fit, fibonacci_spiral,
    plan_spiral, scale_to_fibonacci, square_of_equal_area,
};
pub use compose::infinity::{
    InfinityLayout, InfinityOptions, InfinityOutcome, InfinityPlan, infinity,
};
pub use compose::plan::{TilePlacement, materialize, materialize_merged};
pub use compose::reflect::{
    AccordionOptions, MirrorOptions, accordion, mirror, plan_accordion, plan_reflection,
};
pub use foundation::core::{
    Axis, BlendMode, Color, GOLDEN_RATIO, Offset, QuarterTurns, Rect, Size,
};
pub use foundation::error::{FoldError, FoldResult};
pub use recipe::{Recipe, Step};
