//! Fibonacci sizing and the golden spiral.

use crate::canvas::{CanvasBackend, LayerId, transaction};
use crate::compose::plan::{TilePlacement, materialize};
use crate::foundation::core::{BlendMode, GOLDEN_RATIO, Offset, QuarterTurns, Size};
use crate::foundation::error::{FoldError, FoldResult};

/// Side of the square whose area matches `size`.
pub fn square_of_equal_area(size: Size) -> Size {
    let side = (size.area() as f64).sqrt().round() as u32;
    Size::at_least_one(side, side)
}

/// Largest consecutive Fibonacci pair fitting inside `size`.
///
/// The larger term never exceeds the longer side and goes to that side; a square input gets
/// the larger term on both sides.
pub fn fibonacci_fit(size: Size) -> Size {
    let longest = size.max_side();
    let (mut a, mut b) = (1u32, 1u32);
    while b < longest {
        (b, a) = (a.saturating_add(b), b);
    }
    if b > longest {
        (b, a) = (a, b - a);
    }
    if size.is_square() {
        Size::at_least_one(b, b)
    } else if size.is_portrait() {
        Size::at_least_one(a, b)
    } else {
        Size::at_least_one(b, a)
    }
}

fn fibonacci_next(n: u32) -> u32 {
    (f64::from(n) * GOLDEN_RATIO).round() as u32
}

/// Rescale the canvas to the Fibonacci pair that fits it, squaring it first if asked.
#[tracing::instrument(skip(canvas))]
pub fn scale_to_fibonacci<C: CanvasBackend>(
    canvas: &mut C,
    make_square_first: bool,
) -> FoldResult<Size> {
    transaction(canvas, |canvas| fit_canvas(canvas, make_square_first))
}

fn fit_canvas<C: CanvasBackend>(canvas: &mut C, make_square_first: bool) -> FoldResult<Size> {
    let mut size = canvas.size();
    if make_square_first {
        size = square_of_equal_area(size);
        canvas.scale(size)?;
    }
    let fitted = fibonacci_fit(size);
    tracing::debug!(from = ?size, to = ?fitted, "fibonacci fit");
    if fitted != size {
        canvas.scale(fitted)?;
    }
    Ok(fitted)
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SpiralAspect {
    /// Golden rectangles; tiles keep the canvas proportion.
    Rectangle,
    /// Squares nested in a golden rectangle.
    #[default]
    Square,
}

#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct SpiralOptions {
    pub aspect: SpiralAspect,
    /// Rotation added per tile.
    pub quarter_turn: QuarterTurns,
    pub mode: BlendMode,
    pub opacity: f64,
    /// Flatten the canvas once every tile is placed.
    pub flatten: bool,
}

impl Default for SpiralOptions {
    fn default() -> Self {
        Self {
            aspect: SpiralAspect::Square,
            quarter_turn: QuarterTurns::CW,
            mode: BlendMode::Normal,
            opacity: 100.0,
            flatten: false,
        }
    }
}

impl SpiralOptions {
    pub fn validate(&self) -> FoldResult<()> {
        if !(0.0..=100.0).contains(&self.opacity) {
            return Err(FoldError::invalid(format!(
                "spiral opacity must be within 0..=100, got {}",
                self.opacity
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct SpiralPlan {
    /// Landscape canvas the tiles are laid out on.
    pub canvas: Size,
    pub square: bool,
    pub tiles: Vec<TilePlacement>,
}

impl SpiralPlan {
    /// Bounding box of the canvas and every tile, as `(left, top, right, bottom)`.
    pub fn bounds(&self) -> (i64, i64, i64, i64) {
        let mut b = (
            0,
            0,
            i64::from(self.canvas.width),
            i64::from(self.canvas.height),
        );
        for t in &self.tiles {
            b.0 = b.0.min(i64::from(t.offset.x));
            b.1 = b.1.min(i64::from(t.offset.y));
            b.2 = b.2.max(t.right());
            b.3 = b.3.max(t.bottom());
        }
        b
    }
}

/// Lay out the spiral tiles for a landscape canvas of Fibonacci proportions.
///
/// Starting from the short side and its golden successor, every step shrinks the pair to
/// `(next, cur - next)` and places a tile that nests against the previous one; the turn
/// accumulates by `turn` per step. Stops once the pair stops shrinking.
pub fn plan_spiral(
    canvas: Size,
    square: bool,
    turn: QuarterTurns,
    mode: BlendMode,
    opacity: f64,
) -> SpiralPlan {
    let (mode, opacity) = if square {
        (BlendMode::Normal, 100.0)
    } else {
        (mode, opacity)
    };
    let mut next = canvas.min_side();
    let mut cur = fibonacci_next(next);
    let (mut x, mut y) = (0i64, 0i64);
    let mut count = 0u32;
    let mut tiles = Vec::new();
    while cur > next {
        count += 1;
        (cur, next) = (next, cur - next);
        let size = if square {
            Size::at_least_one(next, next)
        } else {
            Size::at_least_one(cur, next)
        };
        let (cur_i, next_i) = (i64::from(cur), i64::from(next));
        match count % 4 {
            1 => x += cur_i,
            2 => {
                y += cur_i;
                if square {
                    x += cur_i - next_i;
                }
            }
            3 if square => {
                x -= next_i;
                y += cur_i - next_i;
            }
            0 if square => y -= next_i,
            _ => {}
        }
        let mut tile = TilePlacement::new(count, size, Offset::new(x as i32, y as i32));
        tile.turns = turn.times(count);
        tile.mode = mode;
        tile.opacity = opacity;
        tiles.push(tile);
    }
    SpiralPlan {
        canvas,
        square,
        tiles,
    }
}

#[derive(Clone, Debug)]
pub struct SpiralOutcome {
    pub plan: SpiralPlan,
    /// Layer stack after the spiral, bottom to top.
    pub layers: Vec<LayerId>,
    pub size: Size,
}

/// Fit the canvas to Fibonacci proportions and surround it with a spiral of shrinking copies.
#[tracing::instrument(skip(canvas))]
pub fn fibonacci_spiral<C: CanvasBackend>(
    canvas: &mut C,
    opts: &SpiralOptions,
) -> FoldResult<SpiralOutcome> {
    opts.validate()?;
    transaction(canvas, |canvas| {
        let portrait = canvas.size().is_portrait();
        if portrait {
            canvas.rotate(QuarterTurns::CW)?;
        }
        let start = canvas.size();
        if start.is_portrait() {
            return Err(FoldError::orientation(format!(
                "canvas {}x{} is still portrait after rotation",
                start.width, start.height
            )));
        }

        let square = opts.aspect == SpiralAspect::Square || start.is_square();
        let mut turn = opts.quarter_turn;
        if opts.aspect != SpiralAspect::Square && !turn.is_odd() {
            tracing::warn!(
                requested = turn.count(),
                "rectangular spiral needs a 90 or 270 degree turn; using 90"
            );
            turn = QuarterTurns::CW;
        }

        let fitted = fit_canvas(canvas, square)?;
        let base = canvas.layer_from_visible("Spiral")?;
        let plan = plan_spiral(fitted, square, turn, opts.mode, opts.opacity);
        tracing::debug!(tiles = plan.tiles.len(), ?fitted, square, "spiral plan");
        materialize(canvas, base, &plan.tiles)?;

        canvas.resize_to_layers()?;
        if opts.flatten {
            canvas.flatten()?;
        }
        if portrait {
            canvas.rotate(QuarterTurns::CCW)?;
        }
        Ok(SpiralOutcome {
            plan,
            layers: canvas.layers(),
            size: canvas.size(),
        })
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/fibonacci.rs"]
mod tests;
