use crate::foundation::error::{FoldError, FoldResult};

pub use kurbo::{Point, Rect, Vec2};

/// (√5 + 1) / 2, the ratio between consecutive Fibonacci terms in the limit.
pub const GOLDEN_RATIO: f64 = 1.618_033_988_749_895;

/// Straight (non-premultiplied) RGBA8 pixel, as stored by raster layers.
pub type Color = image::Rgba<u8>;

pub const WHITE: Color = image::Rgba([255, 255, 255, 255]);
pub const BLACK: Color = image::Rgba([0, 0, 0, 255]);
pub const MID_GRAY: Color = image::Rgba([128, 128, 128, 255]);
pub const TRANSPARENT: Color = image::Rgba([0, 0, 0, 0]);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> FoldResult<Self> {
        if width == 0 || height == 0 {
            return Err(FoldError::invalid(format!(
                "size must be positive, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    /// Same as [`Size::new`] but clamps each side to at least one pixel.
    pub fn at_least_one(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn along(self, axis: Axis) -> u32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Multiply the extent along `axis` by `n`, leaving the other side untouched.
    pub fn repeated(self, axis: Axis, n: u32) -> Self {
        match axis {
            Axis::Horizontal => Self {
                width: self.width * n,
                height: self.height,
            },
            Axis::Vertical => Self {
                width: self.width,
                height: self.height * n,
            },
        }
    }

    pub fn transposed(self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    pub fn max_side(self) -> u32 {
        self.width.max(self.height)
    }

    pub fn min_side(self) -> u32 {
        self.width.min(self.height)
    }

    pub fn is_square(self) -> bool {
        self.width == self.height
    }

    pub fn is_portrait(self) -> bool {
        self.height > self.width
    }

    pub fn area(self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    pub fn to_rect(self, origin: Offset) -> Rect {
        Rect::new(
            f64::from(origin.x),
            f64::from(origin.y),
            f64::from(origin.x) + f64::from(self.width),
            f64::from(origin.y) + f64::from(self.height),
        )
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
pub struct Offset {
    pub x: i32,
    pub y: i32,
}

impl Offset {
    pub const ZERO: Self = Self { x: 0, y: 0 };

    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// An offset of `distance` along `axis`.
    pub fn along(axis: Axis, distance: i32) -> Self {
        match axis {
            Axis::Horizontal => Self { x: distance, y: 0 },
            Axis::Vertical => Self { x: 0, y: distance },
        }
    }

    pub fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// Orientation of a flip or a tiling pass. A horizontal flip mirrors left/right.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Axis {
    Horizontal,
    Vertical,
}

/// Clockwise rotation in multiples of 90°, always normalised to `0..4`.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(from = "i64", into = "u8")]
pub struct QuarterTurns(u8);

impl QuarterTurns {
    pub const NONE: Self = Self(0);
    pub const CW: Self = Self(1);
    pub const HALF: Self = Self(2);
    pub const CCW: Self = Self(3);

    pub fn new(turns: i64) -> Self {
        Self(turns.rem_euclid(4) as u8)
    }

    pub fn count(self) -> u8 {
        self.0
    }

    pub fn is_odd(self) -> bool {
        self.0 % 2 == 1
    }

    pub fn times(self, n: u32) -> Self {
        Self::new(i64::from(self.0) * i64::from(n))
    }

    pub fn inverse(self) -> Self {
        Self::new(-i64::from(self.0))
    }

    /// Extent of a `size` rectangle after this rotation.
    pub fn rotate_size(self, size: Size) -> Size {
        if self.is_odd() { size.transposed() } else { size }
    }
}

impl From<i64> for QuarterTurns {
    fn from(turns: i64) -> Self {
        Self::new(turns)
    }
}

impl From<QuarterTurns> for u8 {
    fn from(q: QuarterTurns) -> Self {
        q.0
    }
}

/// How a layer combines with whatever lies beneath it.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Default, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum BlendMode {
    #[default]
    Normal,
    Multiply,
    /// Additive blend whose coverage is the union of both layers.
    Addition,
    /// Additive blend that never extends the coverage of the layer beneath.
    LegacyAddition,
    DarkenOnly,
    LightenOnly,
    Overlay,
    Dodge,
    Burn,
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
