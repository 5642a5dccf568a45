use image::{Rgba, RgbaImage, imageops};

use crate::canvas::blur;
use crate::canvas::composite::{blit, composite_onto};
use crate::canvas::polar::rect_to_polar;
use crate::canvas::selection::Selection;
use crate::canvas::{CanvasBackend, Desaturate, LayerId, LayerInfo, SelectOp, SelectShape};
use crate::foundation::core::{Axis, BlendMode, Color, Offset, QuarterTurns, Rect, Size};
use crate::foundation::error::{FoldError, FoldResult};

#[derive(Clone, Debug)]
struct RasterLayer {
    id: LayerId,
    name: String,
    pixels: RgbaImage,
    offset: Offset,
    mode: BlendMode,
    opacity: f64,
    visible: bool,
}

impl RasterLayer {
    fn size(&self) -> Size {
        Size::at_least_one(self.pixels.width(), self.pixels.height())
    }

    fn info(&self) -> LayerInfo {
        LayerInfo {
            id: self.id,
            name: self.name.clone(),
            size: self.size(),
            offset: self.offset,
            mode: self.mode,
            opacity: self.opacity,
            visible: self.visible,
        }
    }
}

#[derive(Clone, Debug)]
struct CanvasState {
    size: Size,
    layers: Vec<RasterLayer>,
    selection: Option<Selection>,
}

/// In-memory [`CanvasBackend`] over straight-alpha RGBA8 layers.
#[derive(Debug)]
pub struct RasterCanvas {
    state: CanvasState,
    next_id: u32,
    undo_depth: u32,
    group_start: Option<CanvasState>,
    history: Vec<CanvasState>,
}

impl RasterCanvas {
    pub fn new(size: Size) -> Self {
        Self {
            state: CanvasState {
                size,
                layers: Vec::new(),
                selection: None,
            },
            next_id: 0,
            undo_depth: 0,
            group_start: None,
            history: Vec::new(),
        }
    }

    /// A canvas holding `image` as its single "Background" layer.
    pub fn from_image(image: RgbaImage) -> FoldResult<Self> {
        let size = Size::new(image.width(), image.height())?;
        let mut canvas = Self::new(size);
        canvas.push_layer("Background", image, Offset::ZERO);
        Ok(canvas)
    }

    /// Composite of all visible layers, clipped to the canvas.
    pub fn composite(&self) -> RgbaImage {
        let size = self.state.size;
        let mut out = RgbaImage::new(size.width, size.height);
        for layer in self.state.layers.iter().filter(|l| l.visible) {
            composite_onto(
                &mut out,
                Offset::ZERO,
                &layer.pixels,
                layer.offset,
                layer.mode,
                (layer.opacity / 100.0) as f32,
            );
        }
        out
    }

    pub fn layer_pixels(&self, id: LayerId) -> FoldResult<&RgbaImage> {
        Ok(&self.state.layers[self.index(id)?].pixels)
    }

    /// Restore the state from before the most recent committed undo group.
    pub fn undo(&mut self) -> bool {
        match self.history.pop() {
            Some(state) => {
                self.state = state;
                true
            }
            None => false,
        }
    }

    pub fn undo_steps(&self) -> usize {
        self.history.len()
    }

    fn push_layer(&mut self, name: &str, pixels: RgbaImage, offset: Offset) -> LayerId {
        let id = LayerId(self.next_id);
        self.next_id += 1;
        self.state.layers.push(RasterLayer {
            id,
            name: name.to_string(),
            pixels,
            offset,
            mode: BlendMode::Normal,
            opacity: 100.0,
            visible: true,
        });
        id
    }

    fn index(&self, id: LayerId) -> FoldResult<usize> {
        self.state
            .layers
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| FoldError::canvas(format!("unknown layer {}", id.0)))
    }

    fn layer_mut(&mut self, id: LayerId) -> FoldResult<&mut RasterLayer> {
        let idx = self.index(id)?;
        Ok(&mut self.state.layers[idx])
    }

    /// Apply `f` to every layer pixel, restricted to the selection when `masked` and one exists.
    fn map_pixels(
        &mut self,
        id: LayerId,
        masked: bool,
        mut f: impl FnMut(Color) -> Color,
    ) -> FoldResult<()> {
        let idx = self.index(id)?;
        let CanvasState {
            layers, selection, ..
        } = &mut self.state;
        let layer = &mut layers[idx];
        let mask = if masked { selection.as_ref() } else { None };
        let (ox, oy) = (i64::from(layer.offset.x), i64::from(layer.offset.y));
        for (x, y, px) in layer.pixels.enumerate_pixels_mut() {
            if let Some(sel) = mask
                && !sel.contains(i64::from(x) + ox, i64::from(y) + oy)
            {
                continue;
            }
            *px = f(*px);
        }
        Ok(())
    }
}

impl CanvasBackend for RasterCanvas {
    fn size(&self) -> Size {
        self.state.size
    }

    fn spawn(&self, size: Size) -> Self {
        Self::new(size)
    }

    fn layers(&self) -> Vec<LayerId> {
        self.state.layers.iter().map(|l| l.id).collect()
    }

    fn layer(&self, id: LayerId) -> FoldResult<LayerInfo> {
        Ok(self.state.layers[self.index(id)?].info())
    }

    fn layer_from_visible(&mut self, name: &str) -> FoldResult<LayerId> {
        let pixels = self.composite();
        Ok(self.push_layer(name, pixels, Offset::ZERO))
    }

    fn new_layer(&mut self, name: &str, size: Size, fill: Color) -> FoldResult<LayerId> {
        let pixels = RgbaImage::from_pixel(size.width, size.height, fill);
        Ok(self.push_layer(name, pixels, Offset::ZERO))
    }

    fn duplicate_layer(&mut self, id: LayerId) -> FoldResult<LayerId> {
        let mut copy = self.state.layers[self.index(id)?].clone();
        copy.id = LayerId(self.next_id);
        copy.name = format!("{} copy", copy.name);
        self.next_id += 1;
        let new_id = copy.id;
        self.state.layers.push(copy);
        Ok(new_id)
    }

    fn import_layer(&mut self, src: &Self, id: LayerId) -> FoldResult<LayerId> {
        let mut copy = src.state.layers[src.index(id)?].clone();
        copy.id = LayerId(self.next_id);
        self.next_id += 1;
        let new_id = copy.id;
        self.state.layers.push(copy);
        Ok(new_id)
    }

    fn remove_layer(&mut self, id: LayerId) -> FoldResult<()> {
        let idx = self.index(id)?;
        self.state.layers.remove(idx);
        Ok(())
    }

    fn lower_layer(&mut self, id: LayerId) -> FoldResult<()> {
        let idx = self.index(id)?;
        if idx > 0 {
            self.state.layers.swap(idx, idx - 1);
        }
        Ok(())
    }

    fn merge_down(&mut self, id: LayerId) -> FoldResult<LayerId> {
        let idx = self.index(id)?;
        if idx == 0 {
            return Err(FoldError::canvas("cannot merge down the bottom layer"));
        }
        let upper = self.state.layers.remove(idx);
        let lower = &mut self.state.layers[idx - 1];

        let bounds = lower.info().bounds().union(upper.info().bounds());
        let origin = Offset::new(bounds.x0 as i32, bounds.y0 as i32);
        let mut merged = RgbaImage::new(bounds.width() as u32, bounds.height() as u32);
        blit(&mut merged, origin, &lower.pixels, lower.offset);
        if upper.visible {
            composite_onto(
                &mut merged,
                origin,
                &upper.pixels,
                upper.offset,
                upper.mode,
                (upper.opacity / 100.0) as f32,
            );
        }
        lower.pixels = merged;
        lower.offset = origin;
        Ok(lower.id)
    }

    fn flatten(&mut self) -> FoldResult<LayerId> {
        let pixels = self.composite();
        self.state.layers.clear();
        Ok(self.push_layer("Flattened", pixels, Offset::ZERO))
    }

    fn set_offset(&mut self, id: LayerId, offset: Offset) -> FoldResult<()> {
        self.layer_mut(id)?.offset = offset;
        Ok(())
    }

    fn set_blend_mode(&mut self, id: LayerId, mode: BlendMode) -> FoldResult<()> {
        self.layer_mut(id)?.mode = mode;
        Ok(())
    }

    fn set_opacity(&mut self, id: LayerId, opacity: f64) -> FoldResult<()> {
        if !opacity.is_finite() {
            return Err(FoldError::invalid("opacity must be finite"));
        }
        self.layer_mut(id)?.opacity = opacity.clamp(0.0, 100.0);
        Ok(())
    }

    fn set_visible(&mut self, id: LayerId, visible: bool) -> FoldResult<()> {
        self.layer_mut(id)?.visible = visible;
        Ok(())
    }

    fn scale_layer(&mut self, id: LayerId, size: Size) -> FoldResult<()> {
        let layer = self.layer_mut(id)?;
        layer.pixels = imageops::resize(
            &layer.pixels,
            size.width,
            size.height,
            imageops::FilterType::Triangle,
        );
        Ok(())
    }

    fn resize_layer(&mut self, id: LayerId, size: Size, content: Offset) -> FoldResult<()> {
        let layer = self.layer_mut(id)?;
        let mut pixels = RgbaImage::new(size.width, size.height);
        blit(&mut pixels, Offset::ZERO, &layer.pixels, content);
        layer.pixels = pixels;
        layer.offset = layer.offset.shifted(-content.x, -content.y);
        Ok(())
    }

    fn flip_layer(&mut self, id: LayerId, axis: Axis) -> FoldResult<()> {
        let layer = self.layer_mut(id)?;
        match axis {
            Axis::Horizontal => imageops::flip_horizontal_in_place(&mut layer.pixels),
            Axis::Vertical => imageops::flip_vertical_in_place(&mut layer.pixels),
        }
        Ok(())
    }

    fn rotate_layer(&mut self, id: LayerId, turns: QuarterTurns) -> FoldResult<()> {
        let layer = self.layer_mut(id)?;
        let (w, h) = (layer.pixels.width() as i32, layer.pixels.height() as i32);
        layer.pixels = match turns.count() {
            0 => return Ok(()),
            1 => imageops::rotate90(&layer.pixels),
            2 => imageops::rotate180(&layer.pixels),
            _ => imageops::rotate270(&layer.pixels),
        };
        if turns.is_odd() {
            layer.offset = layer.offset.shifted((w - h) / 2, (h - w) / 2);
        }
        Ok(())
    }

    fn resize(&mut self, size: Size, offset: Offset) -> FoldResult<()> {
        for layer in &mut self.state.layers {
            layer.offset = layer.offset.shifted(offset.x, offset.y);
        }
        self.state.size = size;
        self.state.selection = None;
        Ok(())
    }

    fn crop(&mut self, size: Size, origin: Offset) -> FoldResult<()> {
        let bounds = size.to_rect(Offset::ZERO);
        let mut kept = Vec::with_capacity(self.state.layers.len());
        for mut layer in self.state.layers.drain(..) {
            layer.offset = layer.offset.shifted(-origin.x, -origin.y);
            let clip = layer.info().bounds().intersect(bounds);
            if clip.area() <= 0.0 {
                // Layers entirely outside the crop are dropped.
                continue;
            }
            let clip_origin = Offset::new(clip.x0 as i32, clip.y0 as i32);
            let mut pixels = RgbaImage::new(clip.width() as u32, clip.height() as u32);
            blit(&mut pixels, clip_origin, &layer.pixels, layer.offset);
            layer.pixels = pixels;
            layer.offset = clip_origin;
            kept.push(layer);
        }
        self.state.layers = kept;
        self.state.size = size;
        self.state.selection = None;
        Ok(())
    }

    fn scale(&mut self, size: Size) -> FoldResult<()> {
        let old = self.state.size;
        let sx = f64::from(size.width) / f64::from(old.width);
        let sy = f64::from(size.height) / f64::from(old.height);
        for layer in &mut self.state.layers {
            let w = (f64::from(layer.pixels.width()) * sx).round() as u32;
            let h = (f64::from(layer.pixels.height()) * sy).round() as u32;
            let target = Size::at_least_one(w, h);
            layer.pixels = imageops::resize(
                &layer.pixels,
                target.width,
                target.height,
                imageops::FilterType::Triangle,
            );
            layer.offset = Offset::new(
                (f64::from(layer.offset.x) * sx).round() as i32,
                (f64::from(layer.offset.y) * sy).round() as i32,
            );
        }
        self.state.size = size;
        self.state.selection = None;
        Ok(())
    }

    fn rotate(&mut self, turns: QuarterTurns) -> FoldResult<()> {
        let (cw, ch) = (self.state.size.width as i32, self.state.size.height as i32);
        for layer in &mut self.state.layers {
            let (lw, lh) = (layer.pixels.width() as i32, layer.pixels.height() as i32);
            let Offset { x, y } = layer.offset;
            let (pixels, offset) = match turns.count() {
                0 => continue,
                1 => (imageops::rotate90(&layer.pixels), Offset::new(ch - y - lh, x)),
                2 => (
                    imageops::rotate180(&layer.pixels),
                    Offset::new(cw - x - lw, ch - y - lh),
                ),
                _ => (imageops::rotate270(&layer.pixels), Offset::new(y, cw - x - lw)),
            };
            layer.pixels = pixels;
            layer.offset = offset;
        }
        self.state.size = turns.rotate_size(self.state.size);
        self.state.selection = None;
        Ok(())
    }

    fn resize_to_layers(&mut self) -> FoldResult<Size> {
        let Some(bounds) = self
            .state
            .layers
            .iter()
            .map(|l| l.info().bounds())
            .reduce(|a, b| a.union(b))
        else {
            return Ok(self.state.size);
        };
        let size = Size::new(bounds.width() as u32, bounds.height() as u32)?;
        self.resize(size, Offset::new(-(bounds.x0 as i32), -(bounds.y0 as i32)))?;
        Ok(size)
    }

    fn select(&mut self, op: SelectOp, shape: SelectShape, rect: Rect) -> FoldResult<()> {
        let fresh = Selection::shape(self.state.size, shape, rect);
        self.state.selection = Some(fresh.combine(op, self.state.selection.take()));
        Ok(())
    }

    fn select_none(&mut self) {
        self.state.selection = None;
    }

    fn has_selection(&self) -> bool {
        self.state.selection.as_ref().is_some_and(|s| !s.is_empty())
    }

    fn invert_selection(&mut self) {
        let mut sel = self
            .state
            .selection
            .take()
            .unwrap_or_else(|| Selection::empty(self.state.size));
        sel.invert();
        self.state.selection = Some(sel);
    }

    fn shrink_selection(&mut self, pixels: u32) {
        if let Some(sel) = self.state.selection.as_mut() {
            sel.shrink(pixels);
        }
    }

    fn flood_select(
        &mut self,
        id: LayerId,
        seeds: &[(u32, u32)],
        threshold: u8,
        op: SelectOp,
    ) -> FoldResult<()> {
        let layer = &self.state.layers[self.index(id)?];
        let fresh = Selection::flood(self.state.size, &layer.pixels, layer.offset, seeds, threshold);
        self.state.selection = Some(fresh.combine(op, self.state.selection.take()));
        Ok(())
    }

    fn fill(&mut self, id: LayerId, color: Color, respect_selection: bool) -> FoldResult<()> {
        self.map_pixels(id, respect_selection, |_| color)
    }

    fn invert(&mut self, id: LayerId) -> FoldResult<()> {
        self.map_pixels(id, true, |px| Rgba([255 - px[0], 255 - px[1], 255 - px[2], px[3]]))
    }

    fn desaturate(&mut self, id: LayerId, mode: Desaturate) -> FoldResult<()> {
        self.map_pixels(id, true, |px| {
            let [r, g, b, a] = px.0;
            let v = match mode {
                Desaturate::Lightness => {
                    ((u16::from(r.max(g).max(b)) + u16::from(r.min(g).min(b)) + 1) / 2) as u8
                }
                Desaturate::Luminance => (0.2126 * f64::from(r)
                    + 0.7152 * f64::from(g)
                    + 0.0722 * f64::from(b))
                .round()
                .clamp(0.0, 255.0) as u8,
                Desaturate::Average => {
                    ((u16::from(r) + u16::from(g) + u16::from(b) + 1) / 3) as u8
                }
            };
            Rgba([v, v, v, a])
        })
    }

    fn gaussian_blur(&mut self, id: LayerId, radius: f64) -> FoldResult<()> {
        if !radius.is_finite() || radius < 0.0 {
            return Err(FoldError::invalid("blur radius must be finite and >= 0"));
        }
        if radius < 0.5 {
            return Ok(());
        }
        let layer = self.layer_mut(id)?;
        layer.pixels = blur::gaussian_blur(&layer.pixels, radius)?;
        Ok(())
    }

    fn unsharp_mask(&mut self, id: LayerId, radius: f64, amount: f64) -> FoldResult<()> {
        if !radius.is_finite() || radius < 0.0 || !amount.is_finite() {
            return Err(FoldError::invalid("unsharp mask needs finite radius >= 0 and amount"));
        }
        let layer = self.layer_mut(id)?;
        let blurred = blur::gaussian_blur(&layer.pixels, radius)?;
        for (px, b) in layer.pixels.pixels_mut().zip(blurred.pixels()) {
            for c in 0..3 {
                let v = f64::from(px[c]);
                let sharpened = v + amount * (v - f64::from(b[c]));
                px[c] = sharpened.round().clamp(0.0, 255.0) as u8;
            }
        }
        Ok(())
    }

    fn stretch_levels(&mut self, id: LayerId) -> FoldResult<()> {
        let layer = self.layer_mut(id)?;
        let mut lo = [255u8; 3];
        let mut hi = [0u8; 3];
        for px in layer.pixels.pixels().filter(|p| p[3] > 0) {
            for c in 0..3 {
                lo[c] = lo[c].min(px[c]);
                hi[c] = hi[c].max(px[c]);
            }
        }
        for px in layer.pixels.pixels_mut() {
            for c in 0..3 {
                if hi[c] > lo[c] {
                    let span = u32::from(hi[c] - lo[c]);
                    let v = u32::from(px[c].saturating_sub(lo[c]));
                    px[c] = ((v * 255 + span / 2) / span).min(255) as u8;
                }
            }
        }
        Ok(())
    }

    fn polar_remap(&mut self, id: LayerId) -> FoldResult<()> {
        let layer = self.layer_mut(id)?;
        layer.pixels = rect_to_polar(&layer.pixels);
        Ok(())
    }

    fn begin_undo_group(&mut self) {
        if self.undo_depth == 0 {
            self.group_start = Some(self.state.clone());
        }
        self.undo_depth += 1;
    }

    fn end_undo_group(&mut self, committed: bool) {
        if self.undo_depth == 0 {
            tracing::warn!("end_undo_group without a matching begin");
            return;
        }
        self.undo_depth -= 1;
        if self.undo_depth > 0 {
            return;
        }
        let Some(start) = self.group_start.take() else {
            return;
        };
        if committed {
            self.history.push(start);
        } else {
            self.state = start;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/canvas/raster.rs"]
mod tests;
