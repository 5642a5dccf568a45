//! Infinity (figure-eight) composer.
//!
//! The visible image is cut into four vertical bands. Each band is bent through a half turn on
//! a scratch canvas, the outer two are turned upside down, and the four arcs are reassembled as
//! two touching loops over a solid background.

use crate::canvas::{CanvasBackend, LayerId, transaction};
use crate::compose::bow::{Advisory, BowGeometry, BowOptions, bend};
use crate::compose::flip;
use crate::foundation::core::{Color, Offset, Size};
use crate::foundation::error::{FoldError, FoldResult};

/// Horizontal nudge of quadrants 0 and 3, hiding the seam at the crossing.
const SEAM_FIX: i32 = 1;

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct InfinityOptions {
    /// RGBA of the layer placed beneath the loops.
    pub background: [u8; 4],
    /// Extra blank angle on each side of the image, in degrees; widens the loops.
    pub pad_degrees: f64,
    /// Pull the two rows of arcs together by this many pixels.
    pub squeeze_middle: u32,
}

impl Default for InfinityOptions {
    fn default() -> Self {
        Self {
            background: [255, 255, 0, 255],
            pad_degrees: 0.0,
            squeeze_middle: 0,
        }
    }
}

impl InfinityOptions {
    pub fn validate(&self) -> FoldResult<()> {
        if !(0.0..360.0).contains(&self.pad_degrees) {
            return Err(FoldError::invalid(format!(
                "infinity pad must be within [0, 360) degrees, got {}",
                self.pad_degrees
            )));
        }
        Ok(())
    }

    /// Pad as a fraction of the image width, per side.
    pub fn pad_fraction(&self) -> f64 {
        self.pad_degrees / (720.0 - 2.0 * self.pad_degrees)
    }

    /// Canvas size after side padding and trimming to a multiple of four.
    pub fn prepared_size(&self, source: Size) -> FoldResult<(u32, Size)> {
        let pad = (self.pad_fraction() * f64::from(source.width)).round() as u64;
        let padded = u64::from(source.width) + 2 * pad;
        let width = u32::try_from(padded - padded % 4)
            .map_err(|_| FoldError::invalid("padded infinity canvas is too wide"))?;
        if width == 0 {
            return Err(FoldError::invalid(format!(
                "infinity needs an image at least 4 pixels wide, got {}",
                source.width
            )));
        }
        Ok((pad as u32, Size::new(width, source.height)?))
    }
}

/// Everything [`infinity`] will do to the canvas geometry, computed before any edit.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InfinityPlan {
    pub side_pad: u32,
    pub prepared: Size,
    pub band: Size,
    pub layout: InfinityLayout,
}

impl InfinityPlan {
    pub fn compute(source: Size, opts: &InfinityOptions) -> FoldResult<Self> {
        opts.validate()?;
        let (side_pad, prepared) = opts.prepared_size(source)?;
        let band = Size::new(prepared.width / 4, prepared.height)?;
        let bow = BowGeometry::compute(band, 180.0)?;
        let bent = bow.crop(bow.stretched()).size;
        let layout = InfinityLayout::compute(bent, band.height, opts.squeeze_middle)?;
        Ok(Self {
            side_pad,
            prepared,
            band,
            layout,
        })
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct InfinityLayout {
    /// One bent quadrant.
    pub bent: Size,
    pub canvas: Size,
    /// Quadrant offsets, indexed by band.
    pub offsets: [Offset; 4],
}

impl InfinityLayout {
    /// Place four `bent` arcs cut from bands of height `band_height`.
    ///
    /// The loops overlap by the band height, so the canvas is `2W - h` wide and `2H` tall.
    pub fn compute(bent: Size, band_height: u32, squeeze_middle: u32) -> FoldResult<Self> {
        let (w, h) = (i64::from(bent.width), i64::from(bent.height));
        let band = i64::from(band_height);
        let squeeze = i64::from(squeeze_middle);
        if squeeze > h {
            return Err(FoldError::invalid(format!(
                "squeeze of {squeeze_middle} px exceeds the arc height {}",
                bent.height
            )));
        }
        let width = 2 * w - band;
        if width < w {
            return Err(FoldError::invalid(format!(
                "bent quadrant {}x{} is narrower than its band height {band_height}",
                bent.width, bent.height
            )));
        }
        let at = |x: i64, y: i64| -> FoldResult<Offset> {
            Ok(Offset::new(
                i32::try_from(x).map_err(|_| FoldError::invalid("infinity offset overflows"))?,
                i32::try_from(y).map_err(|_| FoldError::invalid("infinity offset overflows"))?,
            ))
        };
        let fix = i64::from(SEAM_FIX);
        let offsets = [
            at(fix, h - squeeze)?,
            at(0, squeeze)?,
            at(w - band, h - squeeze)?,
            at(w - band + fix, squeeze)?,
        ];
        let canvas = Size::new(
            u32::try_from(width).map_err(|_| FoldError::invalid("infinity canvas overflows"))?,
            bent.height
                .checked_mul(2)
                .ok_or_else(|| FoldError::invalid("infinity canvas overflows"))?,
        )?;
        Ok(Self {
            bent,
            canvas,
            offsets,
        })
    }
}

#[derive(Clone, Debug)]
pub struct InfinityOutcome {
    pub quadrants: [LayerId; 4],
    pub background: LayerId,
    pub layout: InfinityLayout,
    pub advisories: Vec<Advisory>,
}

/// Assemble the visible image into a figure-eight over a solid background.
#[tracing::instrument(skip(canvas))]
pub fn infinity<C: CanvasBackend>(
    canvas: &mut C,
    opts: &InfinityOptions,
) -> FoldResult<InfinityOutcome> {
    let source = canvas.size();
    let InfinityPlan {
        side_pad: pad,
        prepared,
        band,
        layout,
    } = InfinityPlan::compute(source, opts)?;
    tracing::debug!(?prepared, ?band, canvas = ?layout.canvas, "infinity layout");
    transaction(canvas, |canvas| {
        if pad > 0 {
            let padded = Size::new(source.width.saturating_add(2 * pad), source.height)?;
            canvas.resize(padded, Offset::new(pad as i32, 0))?;
        }
        if canvas.size() != prepared {
            canvas.crop(prepared, Offset::ZERO)?;
        }

        let main = canvas.layer_from_visible("Infinity")?;
        let mut advisories = Vec::new();
        let mut quadrants = [main; 4];
        for (k, slot) in quadrants.iter_mut().enumerate() {
            let mut scratch = canvas.spawn(prepared);
            scratch.import_layer(canvas, main)?;
            scratch.crop(band, Offset::new((k as u32 * band.width) as i32, 0))?;
            let bent = bend(
                &mut scratch,
                &BowOptions {
                    angle_degrees: 180.0,
                    arc_up: k >= 2,
                },
            )?;
            if k == 0 || k == 3 {
                flip(&mut scratch, bent.layer, true, true)?;
            }
            advisories.extend(bent.advisories);
            *slot = canvas.import_layer(&scratch, bent.layer)?;
        }

        canvas.resize(layout.canvas, Offset::ZERO)?;
        for (id, offset) in quadrants.iter().zip(layout.offsets) {
            canvas.set_offset(*id, offset)?;
        }
        canvas.set_visible(main, false)?;
        for _ in 0..3 {
            canvas.lower_layer(quadrants[3])?;
        }

        let fill: Color = image::Rgba(opts.background);
        let background = canvas.new_layer("Infinity Background", layout.canvas, fill)?;
        for _ in 0..4 {
            canvas.lower_layer(background)?;
        }
        Ok(InfinityOutcome {
            quadrants,
            background,
            layout,
            advisories,
        })
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/infinity.rs"]
mod tests;
