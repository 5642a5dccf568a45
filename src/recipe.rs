//! JSON recipes: an ordered list of operations applied to one canvas.
//!
//! ```json
//! { "steps": [ { "op": "mirror", "vertical": false }, { "op": "pan_to_bow", "angle_degrees": 120 } ] }
//! ```
//!
//! Omitted fields take the operation's defaults. Every step runs in its own undo group.

use std::io::Read;

use crate::canvas::{CanvasBackend, LayerId, transaction};
use crate::compose::bow::{Advisory, BowOptions, pan_to_bow};
use crate::compose::border::{BorderOptions, jagged_border};
use crate::compose::enhance::{
    CheapHdrOptions, QuickEnhanceOptions, SharpenOptions, VignetteOptions, cheap_hdr,
    quick_enhance, scale_layer_to_image, sharpen, stretch, vignette, wide_blur,
};
use crate::compose::fibonacci::{SpiralOptions, fibonacci_spiral, scale_to_fibonacci};
use crate::compose::infinity::{InfinityOptions, infinity};
use crate::compose::reflect::{AccordionOptions, MirrorOptions, accordion, mirror};
use crate::foundation::error::{FoldError, FoldResult};

fn default_blur_radius() -> f64 {
    500.0
}

fn default_stretch_opacity() -> f64 {
    50.0
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Mirror(MirrorOptions),
    Accordion(AccordionOptions),
    ScaleToFibonacci {
        #[serde(default)]
        make_square: bool,
    },
    FibonacciSpiral(SpiralOptions),
    PanToBow(BowOptions),
    Infinity(InfinityOptions),
    JaggedBorder(BorderOptions),
    /// Blurs the top layer.
    WideBlur {
        #[serde(default = "default_blur_radius")]
        radius: f64,
    },
    /// Scales the top layer to the canvas.
    ScaleLayerToImage,
    Vignette(VignetteOptions),
    CheapHdr(CheapHdrOptions),
    Sharpen(SharpenOptions),
    Stretch {
        #[serde(default = "default_stretch_opacity")]
        opacity: f64,
    },
    QuickEnhance(QuickEnhanceOptions),
    Flatten,
}

impl Step {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Mirror(_) => "mirror",
            Self::Accordion(_) => "accordion",
            Self::ScaleToFibonacci { .. } => "scale_to_fibonacci",
            Self::FibonacciSpiral(_) => "fibonacci_spiral",
            Self::PanToBow(_) => "pan_to_bow",
            Self::Infinity(_) => "infinity",
            Self::JaggedBorder(_) => "jagged_border",
            Self::WideBlur { .. } => "wide_blur",
            Self::ScaleLayerToImage => "scale_layer_to_image",
            Self::Vignette(_) => "vignette",
            Self::CheapHdr(_) => "cheap_hdr",
            Self::Sharpen(_) => "sharpen",
            Self::Stretch { .. } => "stretch",
            Self::QuickEnhance(_) => "quick_enhance",
            Self::Flatten => "flatten",
        }
    }

    /// Option checks that need no canvas.
    pub fn validate(&self) -> FoldResult<()> {
        match self {
            Self::Mirror(o) => o.validate(),
            Self::Accordion(o) => o.validate(),
            Self::FibonacciSpiral(o) => o.validate(),
            Self::PanToBow(o) => o.validate(),
            Self::Infinity(o) => o.validate(),
            Self::JaggedBorder(o) => o.validate(),
            Self::Vignette(o) => o.validate(),
            Self::CheapHdr(o) => o.validate(),
            Self::Sharpen(o) => o.validate(),
            Self::QuickEnhance(o) => o.validate(),
            Self::WideBlur { radius } if !radius.is_finite() || *radius < 0.0 => Err(
                FoldError::invalid(format!("blur radius must be finite and >= 0, got {radius}")),
            ),
            Self::Stretch { opacity } if !(0.0..=100.0).contains(opacity) => Err(
                FoldError::invalid(format!("stretch opacity must be within 0..=100, got {opacity}")),
            ),
            _ => Ok(()),
        }
    }

    pub fn apply<C: CanvasBackend>(&self, canvas: &mut C) -> FoldResult<Vec<Advisory>> {
        let mut advisories = Vec::new();
        match self {
            Self::Mirror(o) => {
                mirror(canvas, o)?;
            }
            Self::Accordion(o) => {
                accordion(canvas, o)?;
            }
            Self::ScaleToFibonacci { make_square } => {
                scale_to_fibonacci(canvas, *make_square)?;
            }
            Self::FibonacciSpiral(o) => {
                fibonacci_spiral(canvas, o)?;
            }
            Self::PanToBow(o) => advisories = pan_to_bow(canvas, o)?.advisories,
            Self::Infinity(o) => advisories = infinity(canvas, o)?.advisories,
            Self::JaggedBorder(o) => {
                jagged_border(canvas, o)?;
            }
            Self::WideBlur { radius } => {
                let layer = top_layer(canvas)?;
                wide_blur(canvas, layer, *radius)?;
            }
            Self::ScaleLayerToImage => {
                let layer = top_layer(canvas)?;
                scale_layer_to_image(canvas, layer)?;
            }
            Self::Vignette(o) => {
                vignette(canvas, o)?;
            }
            Self::CheapHdr(o) => {
                cheap_hdr(canvas, o)?;
            }
            Self::Sharpen(o) => {
                sharpen(canvas, o)?;
            }
            Self::Stretch { opacity } => {
                stretch(canvas, *opacity)?;
            }
            Self::QuickEnhance(o) => {
                quick_enhance(canvas, o)?;
            }
            Self::Flatten => {
                transaction(canvas, |canvas| canvas.flatten())?;
            }
        }
        Ok(advisories)
    }
}

fn top_layer<C: CanvasBackend>(canvas: &C) -> FoldResult<LayerId> {
    canvas
        .layers()
        .last()
        .copied()
        .ok_or_else(|| FoldError::canvas("canvas has no layers"))
}

#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Recipe {
    pub steps: Vec<Step>,
}

impl Recipe {
    pub fn from_json(s: &str) -> FoldResult<Self> {
        serde_json::from_str(s).map_err(|e| FoldError::recipe(format!("parse recipe JSON: {e}")))
    }

    pub fn from_reader(r: impl Read) -> FoldResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| FoldError::recipe(format!("parse recipe JSON: {e}")))
    }

    pub fn validate(&self) -> FoldResult<()> {
        if self.steps.is_empty() {
            return Err(FoldError::recipe("recipe has no steps"));
        }
        for (i, step) in self.steps.iter().enumerate() {
            step.validate()
                .map_err(|e| FoldError::recipe(format!("step {i} ({}): {e}", step.name())))?;
        }
        Ok(())
    }

    /// Validate the whole recipe, then run its steps in order.
    ///
    /// A failing step is rolled back and stops the recipe; earlier steps stay applied.
    pub fn apply<C: CanvasBackend>(&self, canvas: &mut C) -> FoldResult<Vec<Advisory>> {
        self.validate()?;
        let mut advisories = Vec::new();
        for (i, step) in self.steps.iter().enumerate() {
            tracing::info!(step = i, op = step.name(), "applying step");
            advisories.extend(step.apply(canvas)?);
        }
        Ok(advisories)
    }
}

#[cfg(test)]
#[path = "../tests/unit/recipe.rs"]
mod tests;
