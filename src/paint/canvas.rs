use kurbo::Shape;

use crate::assets::bitmap::Bitmap;
use crate::foundation::core::{Affine, BezPath, MAX_CANVAS_EDGE, Point, Rect, Vec2};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::foundation::math::{rgba8_len, unpremultiply_rgba8_in_place};
use crate::paint::blur::GaussianKernel;
use crate::paint::composite::{BlendMode, composite_in_place, over_at_offset};
use crate::scene::color::Color;

/// Tolerance used when flattening curves into paths.
pub(crate) const PATH_TOLERANCE: f64 = 0.1;

/// A colour stop in a gradient paint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GradientStop {
    /// Position along the gradient, `0..=1`.
    pub offset: f32,
    /// Stop colour.
    pub color: Color,
}

impl GradientStop {
    /// Build a stop.
    pub fn new(offset: f32, color: Color) -> Self {
        Self { offset, color }
    }
}

/// Fill style for vector shapes, in the canvas' current coordinate space.
#[derive(Clone, Debug, PartialEq)]
pub enum Paint {
    /// Uniform colour.
    Solid(Color),
    /// Linear gradient between two points.
    LinearGradient {
        /// Gradient origin (offset 0).
        start: Point,
        /// Gradient end (offset 1).
        end: Point,
        /// Colour stops.
        stops: Vec<GradientStop>,
    },
    /// Circular radial gradient.
    RadialGradient {
        /// Centre of the circle (offset 0).
        center: Point,
        /// Radius at which offset 1 is reached.
        radius: f64,
        /// Colour stops.
        stops: Vec<GradientStop>,
    },
}

/// Drop shadow applied to every fill while it is set, canvas-style.
///
/// `blur` is the canvas `shadowBlur` value: the gaussian sigma is `blur / 2`. Blur and offset are
/// logical units and follow the scale of the current transform (never its rotation).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShadowStyle {
    /// Canvas-style blur amount.
    pub blur: f64,
    /// Offset of the shadow from the shape.
    pub offset: Vec2,
    /// Shadow colour.
    pub color: Color,
}

/// Shaped glyphs ready to paint; positions are relative to the current transform.
pub(crate) struct GlyphRun<'a> {
    pub(crate) font: &'a vello_cpu::peniko::FontData,
    pub(crate) font_size: f32,
    pub(crate) glyphs: &'a [(u32, f32, f32)],
    pub(crate) color: Color,
}

#[derive(Clone, Debug)]
struct DrawState {
    transform: Affine,
    // Clip paths already mapped to device space.
    clips: Vec<BezPath>,
    global_alpha: f32,
    shadow: Option<ShadowStyle>,
    blend: BlendMode,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            transform: Affine::IDENTITY,
            clips: Vec::new(),
            global_alpha: 1.0,
            shadow: None,
            blend: BlendMode::Normal,
        }
    }
}

enum DrawOp<'a> {
    Fill { path: &'a BezPath, paint: &'a Paint },
    Image { bitmap: &'a Bitmap, dest: Rect },
    Glyphs(&'a GlyphRun<'a>),
}

struct Raster {
    ctx: vello_cpu::RenderContext,
    scratch: vello_cpu::Pixmap,
}

impl Raster {
    fn new(width: u32, height: u32) -> ShotframeResult<Self> {
        let w: u16 = width
            .try_into()
            .map_err(|_| ShotframeError::render("canvas width exceeds u16"))?;
        let h: u16 = height
            .try_into()
            .map_err(|_| ShotframeError::render("canvas height exceeds u16"))?;
        Ok(Self {
            ctx: vello_cpu::RenderContext::new(w, h),
            scratch: vello_cpu::Pixmap::new(w, h),
        })
    }

    fn render(&mut self) {
        self.ctx.flush();
        self.scratch.data_as_u8_slice_mut().fill(0);
        self.ctx.render_to_pixmap(&mut self.scratch);
        self.ctx.reset();
    }
}

/// A 2D drawing surface backed by premultiplied RGBA8 pixels.
///
/// Vector work is recorded into a `vello_cpu` context and composited onto the backing store on
/// [`Canvas::flush`], or immediately for draws that need a raster pass (shadows, non-normal
/// blending). The drawing state (transform, clip, global alpha, shadow, blend mode) lives on a
/// save/restore stack; prefer [`Canvas::with_saved`] over manual pairing.
pub struct Canvas {
    width: u32,
    height: u32,
    data: Vec<u8>,
    state: DrawState,
    stack: Vec<DrawState>,
    raster: Option<Raster>,
    pending: bool,
}

impl std::fmt::Debug for Canvas {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Canvas")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("depth", &self.stack.len())
            .field("pending", &self.pending)
            .finish_non_exhaustive()
    }
}

impl Canvas {
    /// Create a transparent canvas of `width`×`height` device pixels.
    pub fn new(width: u32, height: u32) -> ShotframeResult<Self> {
        let mut canvas = Self {
            width: 0,
            height: 0,
            data: Vec::new(),
            state: DrawState::default(),
            stack: Vec::new(),
            raster: None,
            pending: false,
        };
        canvas.resize(width, height)?;
        Ok(canvas)
    }

    /// Resize the backing store. Content is cleared and the drawing state reset, even when the
    /// dimensions do not change.
    pub fn resize(&mut self, width: u32, height: u32) -> ShotframeResult<()> {
        if width > MAX_CANVAS_EDGE || height > MAX_CANVAS_EDGE {
            return Err(ShotframeError::validation(format!(
                "canvas {width}x{height} exceeds {MAX_CANVAS_EDGE}px per edge"
            )));
        }
        let len = rgba8_len(width, height)
            .ok_or_else(|| ShotframeError::validation("canvas buffer size overflow"))?;
        if (width, height) != (self.width, self.height) {
            self.raster = None;
        } else if let Some(raster) = self.raster.as_mut() {
            raster.ctx.reset();
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(len, 0);
        self.state = DrawState::default();
        self.stack.clear();
        self.pending = false;
        Ok(())
    }

    /// Width in device pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in device pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Committed premultiplied RGBA8 pixels. Call [`Canvas::flush`] first to include pending
    /// vector work.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Committed premultiplied pixel at `(x, y)`.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y as usize) * (self.width as usize) + (x as usize)) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Flush and return the pixels as straight-alpha RGBA8.
    pub fn to_rgba8(&mut self) -> ShotframeResult<Vec<u8>> {
        self.flush()?;
        let mut out = self.data.clone();
        unpremultiply_rgba8_in_place(&mut out);
        Ok(out)
    }

    /// Clear every pixel to transparent, discarding pending work. The drawing state is kept.
    pub fn clear(&mut self) {
        if self.pending
            && let Some(raster) = self.raster.as_mut()
        {
            raster.ctx.reset();
        }
        self.pending = false;
        self.data.fill(0);
    }

    /// Push a copy of the drawing state.
    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
    }

    /// Pop the last saved drawing state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        if let Some(state) = self.stack.pop() {
            self.state = state;
        }
    }

    /// Run `f` between a `save` and a `restore`. The state is restored whether `f` succeeds or
    /// not, including any saves `f` left unbalanced.
    pub fn with_saved<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> ShotframeResult<R>,
    ) -> ShotframeResult<R> {
        let depth = self.stack.len();
        self.save();
        let out = f(self);
        if self.stack.len() > depth {
            self.stack.truncate(depth + 1);
            self.restore();
        }
        out
    }

    /// Depth of the save stack.
    pub fn save_depth(&self) -> usize {
        self.stack.len()
    }

    /// Current user-to-device transform.
    pub fn transform(&self) -> Affine {
        self.state.transform
    }

    /// Replace the current transform.
    pub fn set_transform(&mut self, transform: Affine) {
        self.state.transform = transform;
    }

    /// Post-multiply a scale.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.state.transform *= Affine::scale_non_uniform(sx, sy);
    }

    /// Post-multiply a translation.
    pub fn translate(&mut self, dx: f64, dy: f64) {
        self.state.transform *= Affine::translate((dx, dy));
    }

    /// Post-multiply a clockwise rotation (y points down) by `radians`.
    pub fn rotate(&mut self, radians: f64) {
        self.state.transform *= Affine::rotate(radians);
    }

    /// Multiply every later draw's alpha by `alpha` (clamped to `0..=1`).
    pub fn set_global_alpha(&mut self, alpha: f32) {
        self.state.global_alpha = if alpha.is_finite() {
            alpha.clamp(0.0, 1.0)
        } else {
            1.0
        };
    }

    /// Current global alpha.
    pub fn global_alpha(&self) -> f32 {
        self.state.global_alpha
    }

    /// Set or clear the drop shadow applied to later draws.
    pub fn set_shadow(&mut self, shadow: Option<ShadowStyle>) {
        self.state.shadow = shadow;
    }

    /// Set the blend mode for later draws.
    pub fn set_blend_mode(&mut self, blend: BlendMode) {
        self.state.blend = blend;
    }

    /// Intersect the clip region with `path`, interpreted in the current transform.
    pub fn clip(&mut self, path: &BezPath) {
        self.state.clips.push(self.state.transform * path.clone());
    }

    /// Fill any `kurbo` shape.
    pub fn fill_shape(&mut self, shape: &impl Shape, paint: &Paint) -> ShotframeResult<()> {
        self.fill_path(&shape.to_path(PATH_TOLERANCE), paint)
    }

    /// Fill a path.
    pub fn fill_path(&mut self, path: &BezPath, paint: &Paint) -> ShotframeResult<()> {
        self.submit(DrawOp::Fill { path, paint })
    }

    /// Fill a rectangle.
    pub fn fill_rect(&mut self, rect: Rect, paint: &Paint) -> ShotframeResult<()> {
        self.fill_shape(&rect, paint)
    }

    /// Draw `bitmap` stretched into `dest`.
    pub fn draw_image(&mut self, bitmap: &Bitmap, dest: Rect) -> ShotframeResult<()> {
        if bitmap.is_empty() || dest.width() <= 0.0 || dest.height() <= 0.0 {
            return Ok(());
        }
        self.submit(DrawOp::Image { bitmap, dest })
    }

    pub(crate) fn draw_glyphs(&mut self, run: &GlyphRun<'_>) -> ShotframeResult<()> {
        if run.glyphs.is_empty() {
            return Ok(());
        }
        self.submit(DrawOp::Glyphs(run))
    }

    /// Composite all pending vector work onto the backing store.
    pub fn flush(&mut self) -> ShotframeResult<()> {
        if !self.pending {
            return Ok(());
        }
        self.pending = false;
        let Self { data, raster, .. } = self;
        let Some(raster) = raster.as_mut() else {
            return Ok(());
        };
        raster.render();
        composite_in_place(
            data,
            raster.scratch.data_as_u8_slice(),
            1.0,
            BlendMode::Normal,
        )
    }

    fn submit(&mut self, op: DrawOp<'_>) -> ShotframeResult<()> {
        if self.width == 0 || self.height == 0 || self.state.global_alpha <= 0.0 {
            return Ok(());
        }
        let isolated = self.state.shadow.is_some() || self.state.blend != BlendMode::Normal;
        if isolated {
            self.flush()?;
        }

        let Self {
            width,
            height,
            data,
            state,
            raster,
            pending,
            ..
        } = self;
        let raster = match raster {
            Some(r) => r,
            None => raster.insert(Raster::new(*width, *height)?),
        };
        encode(&mut raster.ctx, state, &op);
        if !isolated {
            *pending = true;
            return Ok(());
        }

        raster.render();
        let layer = raster.scratch.data_as_u8_slice();
        if let Some(shadow) = state.shadow {
            let scale = state.transform.determinant().abs().sqrt();
            paint_shadow(data, *width, *height, layer, &shadow, scale)?;
        }
        composite_in_place(data, layer, 1.0, state.blend)
    }
}

fn encode(ctx: &mut vello_cpu::RenderContext, state: &DrawState, op: &DrawOp<'_>) {
    ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
    ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
    for clip in &state.clips {
        ctx.push_clip_layer(&bezpath_to_cpu(clip));
    }
    let opacity = state.global_alpha < 1.0;
    if opacity {
        ctx.push_opacity_layer(state.global_alpha);
    }

    match op {
        DrawOp::Fill { path, paint } => {
            ctx.set_transform(affine_to_cpu(state.transform));
            ctx.set_paint(paint_to_cpu(paint));
            ctx.fill_path(&bezpath_to_cpu(path));
        }
        DrawOp::Image { bitmap, dest } => {
            let bw = f64::from(bitmap.width());
            let bh = f64::from(bitmap.height());
            let tr = state.transform
                * Affine::translate((dest.x0, dest.y0))
                * Affine::scale_non_uniform(dest.width() / bw, dest.height() / bh);
            ctx.set_transform(affine_to_cpu(tr));
            ctx.set_paint(bitmap.paint());
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(0.0, 0.0, bw, bh));
        }
        DrawOp::Glyphs(run) => {
            ctx.set_transform(affine_to_cpu(state.transform));
            ctx.set_paint(run.color.to_cpu());
            let glyphs = run.glyphs.iter().map(|&(id, x, y)| vello_cpu::Glyph { id, x, y });
            ctx.glyph_run(run.font)
                .font_size(run.font_size)
                .fill_glyphs(glyphs);
        }
    }

    if opacity {
        ctx.pop_layer();
    }
    for _ in &state.clips {
        ctx.pop_layer();
    }
}

fn paint_to_cpu(paint: &Paint) -> vello_cpu::PaintType {
    fn stops_to_cpu(stops: &[GradientStop]) -> Vec<vello_cpu::peniko::ColorStop> {
        stops
            .iter()
            .map(|s| vello_cpu::peniko::ColorStop {
                offset: s.offset.clamp(0.0, 1.0),
                color: vello_cpu::peniko::color::DynamicColor::from_alpha_color(s.color.to_cpu()),
            })
            .collect()
    }

    match paint {
        Paint::Solid(c) => c.to_cpu().into(),
        Paint::LinearGradient { start, end, stops } => {
            let stops = stops_to_cpu(stops);
            vello_cpu::peniko::Gradient::new_linear(
                vello_cpu::kurbo::Point::new(start.x, start.y),
                vello_cpu::kurbo::Point::new(end.x, end.y),
            )
            .with_stops(stops.as_slice())
            .into()
        }
        Paint::RadialGradient {
            center,
            radius,
            stops,
        } => {
            let stops = stops_to_cpu(stops);
            vello_cpu::peniko::Gradient::new_radial(
                vello_cpu::kurbo::Point::new(center.x, center.y),
                *radius as f32,
            )
            .with_stops(stops.as_slice())
            .into()
        }
    }
}

/// Paint the blurred, tinted, offset silhouette of `layer` onto `dst`.
fn paint_shadow(
    dst: &mut [u8],
    width: u32,
    height: u32,
    layer: &[u8],
    shadow: &ShadowStyle,
    scale: f64,
) -> ShotframeResult<()> {
    let color = shadow.color.to_rgba8_premul();
    if color.a == 0 {
        return Ok(());
    }
    let Some((x0, y0, x1, y1)) = coverage_bounds(layer, width, height) else {
        return Ok(());
    };

    let blur = if shadow.blur.is_finite() {
        shadow.blur.max(0.0)
    } else {
        0.0
    };
    let kernel = GaussianKernel::for_shadow_blur(blur * scale);
    let pad = kernel.as_ref().map_or(0, GaussianKernel::radius);

    let cw = (x1 - x0 + 1) + 2 * pad;
    let ch = (y1 - y0 + 1) + 2 * pad;
    let mut tinted = vec![0u8; cw * ch * 4];
    let tint = color.to_array();
    for y in y0..=y1 {
        for x in x0..=x1 {
            let a = u16::from(layer[(y * width as usize + x) * 4 + 3]);
            if a == 0 {
                continue;
            }
            let ti = ((y - y0 + pad) * cw + (x - x0 + pad)) * 4;
            for c in 0..4 {
                tinted[ti + c] = crate::foundation::math::mul_div255_u8(u16::from(tint[c]), a);
            }
        }
    }

    let (cw, ch) = (cw as u32, ch as u32);
    let blurred = match &kernel {
        Some(k) => k.apply(&tinted, cw, ch)?,
        None => tinted,
    };
    let dx = (shadow.offset.x * scale).round() as i64;
    let dy = (shadow.offset.y * scale).round() as i64;
    over_at_offset(
        dst,
        width,
        height,
        &blurred,
        cw,
        ch,
        x0 as i64 - pad as i64 + dx,
        y0 as i64 - pad as i64 + dy,
        1.0,
    )
}

/// Inclusive pixel bounds of non-transparent pixels.
fn coverage_bounds(layer: &[u8], width: u32, height: u32) -> Option<(usize, usize, usize, usize)> {
    let (w, h) = (width as usize, height as usize);
    let mut bounds: Option<(usize, usize, usize, usize)> = None;
    for y in 0..h {
        let row = &layer[y * w * 4..(y + 1) * w * 4];
        let Some(first) = row.chunks_exact(4).position(|px| px[3] != 0) else {
            continue;
        };
        let last = row.chunks_exact(4).rposition(|px| px[3] != 0).unwrap_or(first);
        bounds = Some(match bounds {
            None => (first, y, last, y),
            Some((x0, y0, x1, _)) => (x0.min(first), y0, x1.max(last), y),
        });
    }
    bounds
}

fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::LineTo(p) => out.line_to(vello_cpu::kurbo::Point::new(p.x, p.y)),
            PathEl::QuadTo(p1, p2) => out.quad_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
            ),
            PathEl::CurveTo(p1, p2, p3) => out.curve_to(
                vello_cpu::kurbo::Point::new(p1.x, p1.y),
                vello_cpu::kurbo::Point::new(p2.x, p2.y),
                vello_cpu::kurbo::Point::new(p3.x, p3.y),
            ),
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/paint/canvas.rs"]
mod tests;
