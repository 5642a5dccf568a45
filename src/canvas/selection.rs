use std::collections::VecDeque;

use image::{GrayImage, Luma, RgbaImage};
use kurbo::{Ellipse, Shape};

use crate::canvas::{SelectOp, SelectShape};
use crate::foundation::core::{Offset, Point, Rect, Size};

const ON: Luma<u8> = Luma([255]);

/// Binary selection mask in canvas coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Selection {
    mask: GrayImage,
}

impl Selection {
    pub fn empty(size: Size) -> Self {
        Self {
            mask: GrayImage::new(size.width, size.height),
        }
    }

    pub fn all(size: Size) -> Self {
        Self {
            mask: GrayImage::from_pixel(size.width, size.height, ON),
        }
    }

    /// Pixels whose centre lies inside `rect` (rectangle or inscribed ellipse).
    pub fn shape(size: Size, shape: SelectShape, rect: Rect) -> Self {
        let mut sel = Self::empty(size);
        let ellipse = Ellipse::from_rect(rect);
        for (x, y, px) in sel.mask.enumerate_pixels_mut() {
            let p = Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            let inside = match shape {
                SelectShape::Rectangle => rect.contains(p),
                SelectShape::Ellipse => ellipse.contains(p),
            };
            if inside {
                *px = ON;
            }
        }
        sel
    }

    /// Contiguous region grown from `seeds` over `pixels` (placed at `origin` in canvas space).
    ///
    /// A pixel joins the region of a seed when each RGBA channel differs from the seed's by at
    /// most `threshold`. Growth is 4-connected and limited to the canvas and the layer.
    pub fn flood(
        size: Size,
        pixels: &RgbaImage,
        origin: Offset,
        seeds: &[(u32, u32)],
        threshold: u8,
    ) -> Self {
        let mut sel = Self::empty(size);
        let (w, h) = (size.width as i64, size.height as i64);
        let in_layer = |x: i64, y: i64| {
            let lx = x - i64::from(origin.x);
            let ly = y - i64::from(origin.y);
            (lx >= 0 && ly >= 0 && lx < i64::from(pixels.width()) && ly < i64::from(pixels.height()))
                .then(|| *pixels.get_pixel(lx as u32, ly as u32))
        };

        for &(sx, sy) in seeds {
            let (sx, sy) = (i64::from(sx), i64::from(sy));
            if sx >= w || sy >= h {
                continue;
            }
            let Some(seed) = in_layer(sx, sy) else {
                continue;
            };
            if sel.mask.get_pixel(sx as u32, sy as u32)[0] != 0 {
                continue;
            }
            let similar = |px: image::Rgba<u8>| {
                (0..4).all(|c| seed[c].abs_diff(px[c]) <= threshold)
            };

            let mut queue = VecDeque::from([(sx, sy)]);
            sel.mask.put_pixel(sx as u32, sy as u32, ON);
            while let Some((x, y)) = queue.pop_front() {
                for (nx, ny) in [(x - 1, y), (x + 1, y), (x, y - 1), (x, y + 1)] {
                    if nx < 0 || ny < 0 || nx >= w || ny >= h {
                        continue;
                    }
                    if sel.mask.get_pixel(nx as u32, ny as u32)[0] != 0 {
                        continue;
                    }
                    if in_layer(nx, ny).is_some_and(similar) {
                        sel.mask.put_pixel(nx as u32, ny as u32, ON);
                        queue.push_back((nx, ny));
                    }
                }
            }
        }
        sel
    }

    pub fn combine(self, op: SelectOp, previous: Option<Selection>) -> Self {
        match (op, previous) {
            (SelectOp::Add, Some(mut prev)) => {
                for (p, n) in prev.mask.pixels_mut().zip(self.mask.pixels()) {
                    p[0] = p[0].max(n[0]);
                }
                prev
            }
            _ => self,
        }
    }

    pub fn invert(&mut self) {
        for p in self.mask.pixels_mut() {
            p[0] = 255 - p[0];
        }
    }

    /// Erode by `pixels`; the area outside the canvas counts as unselected.
    pub fn shrink(&mut self, pixels: u32) {
        if pixels == 0 {
            return;
        }
        let (w, h) = self.mask.dimensions();
        let r = i64::from(pixels);
        let src = self.mask.clone();
        for y in 0..h {
            for x in 0..w {
                if src.get_pixel(x, y)[0] == 0 {
                    continue;
                }
                let (xi, yi) = (i64::from(x), i64::from(y));
                let keep = xi - r >= 0
                    && yi - r >= 0
                    && xi + r < i64::from(w)
                    && yi + r < i64::from(h)
                    && (yi - r..=yi + r).all(|yy| {
                        (xi - r..=xi + r).all(|xx| src.get_pixel(xx as u32, yy as u32)[0] != 0)
                    });
                if !keep {
                    self.mask.put_pixel(x, y, Luma([0]));
                }
            }
        }
    }

    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0
            && y >= 0
            && x < i64::from(self.mask.width())
            && y < i64::from(self.mask.height())
            && self.mask.get_pixel(x as u32, y as u32)[0] != 0
    }

    pub fn count(&self) -> usize {
        self.mask.pixels().filter(|p| p[0] != 0).count()
    }

    pub fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/selection.rs"]
mod tests;
