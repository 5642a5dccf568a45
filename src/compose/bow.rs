//! Pan-to-bow: bend a wide strip into a circular arc.
//!
//! The strip is padded so it covers `angle / 360` of the full turn, stretched to twice the
//! padded height, sent through the polar remap and cropped to the arc's bounding box. The
//! padding keeps the horizontal centre line of the source at roughly its original arc length.

use std::f64::consts::PI;
use std::fmt;

use crate::canvas::{CanvasBackend, LayerId, transaction};
use crate::compose::flip;
use crate::foundation::core::{Offset, Size};
use crate::foundation::error::{FoldError, FoldResult};

pub const MIN_ANGLE_DEGREES: f64 = 45.0;
pub const MAX_ANGLE_DEGREES: f64 = 360.0;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BowOptions {
    /// Angle covered by the arc, in `[45, 360)`.
    pub angle_degrees: f64,
    /// Bend into a smile (∪) instead of a rainbow (∩).
    pub arc_up: bool,
}

impl Default for BowOptions {
    fn default() -> Self {
        Self {
            angle_degrees: 180.0,
            arc_up: false,
        }
    }
}

impl BowOptions {
    pub fn validate(&self) -> FoldResult<()> {
        validate_angle(self.angle_degrees)
    }
}

fn validate_angle(angle_degrees: f64) -> FoldResult<()> {
    if !(MIN_ANGLE_DEGREES..MAX_ANGLE_DEGREES).contains(&angle_degrees) {
        return Err(FoldError::invalid(format!(
            "bow angle must be within [{MIN_ANGLE_DEGREES}, {MAX_ANGLE_DEGREES}), got {angle_degrees}"
        )));
    }
    Ok(())
}

/// Geometry that cannot be honoured exactly. The bend still runs with degenerate radii.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Advisory {
    /// Past `max_degrees` the inner radius would be negative and is held at zero.
    InnerRadiusCollapsed { angle_degrees: f64, max_degrees: f64 },
    /// Past `top_degrees` the outer radius drops below the source height.
    OuterRadiusShrunk { angle_degrees: f64, top_degrees: f64 },
}

impl fmt::Display for Advisory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InnerRadiusCollapsed {
                angle_degrees,
                max_degrees,
            } => write!(
                f,
                "angle {angle_degrees:.1} exceeds {max_degrees:.1} degrees; inner radius clamped to zero"
            ),
            Self::OuterRadiusShrunk {
                angle_degrees,
                top_degrees,
            } => write!(
                f,
                "angle {angle_degrees:.1} exceeds {top_degrees:.1} degrees; outer radius is below the image height"
            ),
        }
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct BowGeometry {
    pub source: Size,
    pub angle_degrees: f64,
    pub max_degrees: f64,
    pub top_degrees: f64,
    pub bow_radius: u32,
    pub inner_radius: u32,
    pub outer_radius: u32,
    /// Transparent margin added on each side before the remap.
    pub side_pad: u32,
    /// Canvas size after padding, before the vertical stretch.
    pub expanded: Size,
}

/// Final crop of the remapped canvas.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct BowCrop {
    pub size: Size,
    pub origin: Offset,
    /// Set when the remap disc was narrower than the outer diameter.
    pub shrink: Option<f64>,
}

impl BowGeometry {
    pub fn compute(source: Size, angle_degrees: f64) -> FoldResult<Self> {
        validate_angle(angle_degrees)?;
        let (w, h) = (f64::from(source.width), f64::from(source.height));
        let max_degrees = 360.0 * w / (h * PI);
        let top_degrees = PI * max_degrees / 2.0;
        let radians = angle_degrees.to_radians();

        let bow_radius = (w / radians).floor() as u64;
        let inner = bow_radius.saturating_sub(u64::from(source.height / 2));
        let outer = inner + u64::from(source.height);
        let side_pad = (w * (360.0 / angle_degrees - 1.0) / 2.0).floor() as u64;
        let expanded_w = u64::from(source.width) + 2 * side_pad;
        let expanded_h = u64::from(source.height) + inner;

        let fit = |v: u64| {
            u32::try_from(v)
                .ok()
                .filter(|v| v.checked_mul(2).is_some())
                .ok_or_else(|| FoldError::invalid(format!("bow geometry overflows ({v} px)")))
        };
        Ok(Self {
            source,
            angle_degrees,
            max_degrees,
            top_degrees,
            bow_radius: fit(bow_radius)?,
            inner_radius: fit(inner)?,
            outer_radius: fit(outer)?,
            side_pad: fit(side_pad)?,
            expanded: Size::new(fit(expanded_w)?, fit(expanded_h)?)?,
        })
    }

    pub fn advisories(&self) -> Vec<Advisory> {
        let mut out = Vec::new();
        if self.angle_degrees > self.max_degrees {
            out.push(Advisory::InnerRadiusCollapsed {
                angle_degrees: self.angle_degrees,
                max_degrees: self.max_degrees,
            });
        }
        if self.angle_degrees > self.top_degrees {
            out.push(Advisory::OuterRadiusShrunk {
                angle_degrees: self.angle_degrees,
                top_degrees: self.top_degrees,
            });
        }
        out
    }

    /// Canvas size handed to the polar remap.
    pub fn stretched(&self) -> Size {
        Size {
            width: self.expanded.width,
            height: self.expanded.height * 2,
        }
    }

    /// Bounding box of the arc inside a remapped canvas of size `actual`.
    pub fn crop(&self, actual: Size) -> BowCrop {
        let (sin, cos) = (self.angle_degrees.to_radians() / 2.0).sin_cos();
        // past a half turn the arc's ends hang below the centre by |cos| of the outer radius
        let (sin, cos) = (sin.abs(), cos.abs());
        let (outer, inner) = (f64::from(self.outer_radius), f64::from(self.inner_radius));
        let (mut wc, mut hc) = if self.angle_degrees < 180.0 {
            (
                (2.0 * outer * sin).trunc(),
                (outer - inner * cos).trunc(),
            )
        } else {
            ((2.0 * outer).trunc(), ((1.0 + cos) * outer).trunc())
        };

        if actual.width < actual.height {
            let f = f64::from(actual.width) / (2.0 * outer);
            wc = (f * wc).trunc();
            hc = (f * hc).trunc();
            let top = i64::from(actual.height / 2) - (f * outer) as i64;
            BowCrop {
                size: Size::at_least_one(wc as u32, hc as u32),
                origin: Offset::new(0, top.max(0) as i32),
                shrink: Some(f),
            }
        } else {
            let left = (i64::from(actual.width) - wc as i64) / 2;
            BowCrop {
                size: Size::at_least_one(wc as u32, hc as u32),
                origin: Offset::new(left.max(0) as i32, 0),
                shrink: None,
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct BowOutcome {
    /// The bent layer, left unmerged on top of the stack.
    pub layer: LayerId,
    pub geometry: BowGeometry,
    pub crop: BowCrop,
    pub advisories: Vec<Advisory>,
}

/// Bend the visible image into an arc. The layer beneath the result is hidden.
#[tracing::instrument(skip(canvas))]
pub fn pan_to_bow<C: CanvasBackend>(canvas: &mut C, opts: &BowOptions) -> FoldResult<BowOutcome> {
    opts.validate()?;
    transaction(canvas, |canvas| bend(canvas, opts))
}

/// The bend itself, without opening an undo group.
pub(crate) fn bend<C: CanvasBackend>(canvas: &mut C, opts: &BowOptions) -> FoldResult<BowOutcome> {
    let below = canvas.layers().last().copied();
    let layer = canvas.layer_from_visible("Bow")?;
    if let Some(below) = below {
        canvas.set_visible(below, false)?;
    }
    flip(canvas, layer, false, opts.arc_up)?;

    let geometry = BowGeometry::compute(canvas.layer(layer)?.size, opts.angle_degrees)?;
    let advisories = geometry.advisories();
    for advisory in &advisories {
        tracing::warn!(%advisory, "bow geometry");
    }
    tracing::debug!(
        inner = geometry.inner_radius,
        outer = geometry.outer_radius,
        pad = geometry.side_pad,
        expanded = ?geometry.expanded,
        "bow geometry"
    );

    remap_strip(canvas, layer, &geometry)?;
    let crop = geometry.crop(canvas.size());
    if let Some(f) = crop.shrink {
        tracing::debug!(factor = f, "remap disc narrower than the arc; scaling crop");
    }
    canvas.crop(crop.size, crop.origin)?;
    flip(canvas, layer, false, opts.arc_up)?;

    Ok(BowOutcome {
        layer,
        geometry,
        crop,
        advisories,
    })
}

/// Pad, stretch and polar-remap `layer`, leaving the canvas at `geometry.stretched()`.
fn remap_strip<C: CanvasBackend>(
    canvas: &mut C,
    layer: LayerId,
    geometry: &BowGeometry,
) -> FoldResult<()> {
    let pad = Offset::new(geometry.side_pad as i32, 0);
    canvas.resize(geometry.expanded, pad)?;
    canvas.resize_layer(layer, geometry.expanded, pad)?;
    let stretched = geometry.stretched();
    canvas.scale_layer(layer, stretched)?;
    canvas.set_offset(layer, Offset::ZERO)?;
    canvas.resize(stretched, Offset::ZERO)?;
    canvas.polar_remap(layer)
}

#[cfg(test)]
#[path = "../../tests/unit/compose/bow.rs"]
mod tests;
