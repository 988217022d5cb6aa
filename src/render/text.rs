use std::borrow::Cow;
use std::path::Path;

use anyhow::Context;

use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::paint::canvas::{Canvas, GlyphRun};
use crate::scene::color::Color;
use crate::scene::model::{TextOverlay, TextPattern};

/// Hard cap on tiles per pattern row.
const MAX_TILES_PER_ROW: usize = 4096;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// RGBA8 brush colour carried through Parley layout.
pub(crate) struct TextBrush {
    pub(crate) r: u8,
    pub(crate) g: u8,
    pub(crate) b: u8,
    pub(crate) a: u8,
}

impl From<Color> for TextBrush {
    fn from(c: Color) -> Self {
        let [r, g, b, a] = c.to_rgba8();
        Self { r, g, b, a }
    }
}

impl From<TextBrush> for Color {
    fn from(b: TextBrush) -> Self {
        Color::rgba8(b.r, b.g, b.b, b.a)
    }
}

type FontBlob = vello_cpu::peniko::Blob<u8>;

#[derive(Clone)]
struct FontFace {
    family: String,
    weight: u16,
    data: FontBlob,
    /// Family name the font file itself declares; what Parley matches on.
    internal_family: String,
}

fn font_collection() -> parley::fontique::Collection {
    parley::fontique::Collection::new(parley::fontique::CollectionOptions {
        shared: false,
        system_fonts: false,
    })
}

/// Family name of the first face in `data`, or `None` when the bytes hold no usable font.
fn probe_family(data: &FontBlob) -> Option<String> {
    let mut collection = font_collection();
    let (id, _) = collection.register_fonts(data.clone(), None).into_iter().next()?;
    collection.family_name(id).map(str::to_owned)
}

/// Caller-registered font faces, looked up by CSS family list and weight.
#[derive(Clone, Default)]
pub struct FontBook {
    faces: Vec<FontFace>,
}

impl std::fmt::Debug for FontBook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.faces.iter().map(|face| (&face.family, face.weight)))
            .finish()
    }
}

impl FontBook {
    /// An empty book. Text layers are skipped until a face is registered.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a face from font file bytes (TTF/OTF). Returns the face index.
    ///
    /// Bytes that hold no parseable face are rejected here rather than at first render.
    pub fn register(
        &mut self,
        family: impl Into<String>,
        weight: u16,
        bytes: Vec<u8>,
    ) -> ShotframeResult<usize> {
        let family = family.into();
        if family.trim().is_empty() {
            return Err(ShotframeError::validation("font family must be non-empty"));
        }
        if bytes.is_empty() {
            return Err(ShotframeError::validation(format!(
                "font '{family}' has no data"
            )));
        }
        let data = FontBlob::from(bytes);
        let internal_family = probe_family(&data).ok_or_else(|| {
            ShotframeError::validation(format!("font '{family}' contains no usable faces"))
        })?;
        self.faces.push(FontFace {
            family: family.trim().to_owned(),
            weight,
            data,
            internal_family,
        });
        Ok(self.faces.len() - 1)
    }

    /// Read a font file and register it.
    pub fn load(
        &mut self,
        family: impl Into<String>,
        weight: u16,
        path: impl AsRef<Path>,
    ) -> ShotframeResult<usize> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).with_context(|| format!("read font '{}'", path.display()))?;
        self.register(family, weight, bytes)
    }

    /// Number of registered faces.
    pub fn len(&self) -> usize {
        self.faces.len()
    }

    /// `true` when no face is registered.
    pub fn is_empty(&self) -> bool {
        self.faces.is_empty()
    }

    /// Pick a face for a CSS family list and weight.
    ///
    /// Families are tried in order, case-insensitively; when none is registered the first
    /// registered family is used. Within a family the nearest weight wins.
    pub fn resolve(&self, family_list: &str, weight: u16) -> Option<usize> {
        let names = family_list
            .split(',')
            .map(|n| n.trim().trim_matches(|c| c == '"' || c == '\'').trim())
            .filter(|n| !n.is_empty());
        for name in names {
            if let Some(i) = self.nearest_weight(|f| f.family.eq_ignore_ascii_case(name), weight) {
                return Some(i);
            }
        }
        let first = &self.faces.first()?.family;
        self.nearest_weight(|f| f.family == *first, weight)
    }

    fn nearest_weight(&self, pred: impl Fn(&FontFace) -> bool, weight: u16) -> Option<usize> {
        self.faces
            .iter()
            .enumerate()
            .filter(|(_, f)| pred(f))
            .min_by_key(|(i, f)| ((i32::from(f.weight) - i32::from(weight)).abs(), *i))
            .map(|(i, _)| i)
    }
}

struct FaceContext {
    font_ctx: parley::FontContext,
    family_name: String,
    font: vello_cpu::peniko::FontData,
}

impl FaceContext {
    fn new(face: &FontFace) -> Self {
        let mut font_ctx = parley::FontContext {
            collection: font_collection(),
            source_cache: Default::default(),
        };
        font_ctx.collection.register_fonts(face.data.clone(), None);
        Self {
            font_ctx,
            family_name: face.internal_family.clone(),
            font: vello_cpu::peniko::FontData::new(face.data.clone(), 0),
        }
    }
}

struct ShapedRun {
    font_size: f32,
    glyphs: Vec<(u32, f32, f32)>,
    color: Color,
}

/// A laid-out single-style text block ready to paint.
pub(crate) struct ShapedText {
    font: vello_cpu::peniko::FontData,
    runs: Vec<ShapedRun>,
    width: f64,
    baseline: f64,
    ascent: f64,
    descent: f64,
}

impl ShapedText {
    /// Distance from the vertical middle of the first line down to its baseline.
    fn middle_to_baseline(&self) -> f64 {
        (self.ascent - self.descent) / 2.0
    }

    fn draw_at_baseline(&self, canvas: &mut Canvas, x: f64, baseline_y: f64) -> ShotframeResult<()> {
        canvas.with_saved(|c| {
            c.translate(x, baseline_y - self.baseline);
            for run in &self.runs {
                c.draw_glyphs(&GlyphRun {
                    font: &self.font,
                    font_size: run.font_size,
                    glyphs: &run.glyphs,
                    color: run.color,
                })?;
            }
            Ok(())
        })
    }
}

/// Shapes text with Parley against the faces of a [`FontBook`].
///
/// Each face gets its own font context so layout only ever sees the resolved face.
pub struct TextEngine {
    fonts: FontBook,
    faces: Vec<Option<FaceContext>>,
    layout_ctx: parley::LayoutContext<TextBrush>,
}

impl Default for TextEngine {
    fn default() -> Self {
        Self::new(FontBook::default())
    }
}

impl std::fmt::Debug for TextEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TextEngine")
            .field("fonts", &self.fonts)
            .finish_non_exhaustive()
    }
}

impl TextEngine {
    /// Build an engine over `fonts`.
    pub fn new(fonts: FontBook) -> Self {
        Self {
            fonts,
            faces: Vec::new(),
            layout_ctx: parley::LayoutContext::new(),
        }
    }

    /// Registered faces.
    pub fn fonts(&self) -> &FontBook {
        &self.fonts
    }

    /// Register another face. See [`FontBook::register`].
    pub fn register_font(
        &mut self,
        family: impl Into<String>,
        weight: u16,
        bytes: Vec<u8>,
    ) -> ShotframeResult<usize> {
        self.fonts.register(family, weight, bytes)
    }

    /// Lay out `text` on one line per hard break. `Ok(None)` when there is nothing to draw or
    /// no font to draw it with.
    pub(crate) fn shape(
        &mut self,
        text: &str,
        family: &str,
        weight: u16,
        size_px: f64,
        color: Color,
    ) -> ShotframeResult<Option<ShapedText>> {
        if text.is_empty() {
            return Ok(None);
        }
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(ShotframeError::validation(
                "text size_px must be finite and > 0",
            ));
        }
        let Some(face_idx) = self.fonts.resolve(family, weight) else {
            tracing::warn!(family, "no fonts registered, skipping text");
            return Ok(None);
        };

        if self.faces.len() < self.fonts.len() {
            self.faces.resize_with(self.fonts.len(), || None);
        }
        let slot = &mut self.faces[face_idx];
        if slot.is_none() {
            *slot = Some(FaceContext::new(&self.fonts.faces[face_idx]));
        }
        let Some(face) = slot.as_mut() else {
            return Ok(None);
        };

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut face.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(Cow::Owned(face.family_name.clone())),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px as f32));
        builder.push_default(parley::style::StyleProperty::FontWeight(
            parley::style::FontWeight::new(f32::from(weight)),
        ));
        builder.push_default(parley::style::StyleProperty::Brush(TextBrush::from(color)));

        let mut layout: parley::Layout<TextBrush> = builder.build(text);
        layout.break_all_lines(None);

        let mut runs = Vec::new();
        let mut first_line = None;
        for line in layout.lines() {
            if first_line.is_none() {
                let m = line.metrics();
                first_line = Some((m.baseline, m.ascent, m.descent));
            }
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };
                let glyphs = run
                    .positioned_glyphs()
                    .map(|g| (g.id, g.x, g.y))
                    .collect::<Vec<_>>();
                runs.push(ShapedRun {
                    font_size: run.run().font_size(),
                    glyphs,
                    color: run.style().brush.into(),
                });
            }
        }
        let Some((baseline, ascent, descent)) = first_line else {
            return Ok(None);
        };

        Ok(Some(ShapedText {
            font: face.font.clone(),
            runs,
            width: f64::from(layout.width()),
            baseline: f64::from(baseline),
            ascent: f64::from(ascent),
            descent: f64::from(descent),
        }))
    }
}

/// Baseline-centre points of every pattern tile.
///
/// Row `i` is centred at `(i + 0.5) * h / rows`. Each row starts at its anchor (a fraction of the
/// width, cycled over `anchors`) and repeats every `tile_width + gap` in both directions until
/// `bounds` is covered. Points are the left edge of each tile.
pub fn pattern_tile_origins(
    bounds: Rect,
    rows: u32,
    anchors: &[f64],
    tile_width: f64,
    gap: f64,
) -> Vec<Point> {
    let mut out = Vec::new();
    let step = tile_width + gap;
    if rows == 0
        || !(step.is_finite() && step > 0.0)
        || tile_width.is_nan()
        || bounds.width() <= 0.0
        || bounds.height() <= 0.0
    {
        return out;
    }

    let row_h = bounds.height() / f64::from(rows);
    for i in 0..rows {
        let y = bounds.y0 + (f64::from(i) + 0.5) * row_h;
        let anchor = match anchors {
            [] => 0.0,
            a => a[i as usize % a.len()],
        };
        let anchor = if anchor.is_finite() { anchor } else { 0.0 };
        let start = bounds.x0 + anchor * bounds.width();
        let mut x = start + ((bounds.x0 - start) / step).floor() * step;
        let mut n = 0;
        while x < bounds.x1 && n < MAX_TILES_PER_ROW {
            if x + tile_width > bounds.x0 {
                out.push(Point::new(x, y));
            }
            x += step;
            n += 1;
        }
    }
    out
}

/// Tile `pattern.text` across `bounds` at `opacity / 100`.
pub fn paint_text_pattern(
    canvas: &mut Canvas,
    bounds: Rect,
    pattern: &TextPattern,
    engine: &mut TextEngine,
) -> ShotframeResult<()> {
    if pattern.rows == 0 || pattern.text.trim().is_empty() || !(pattern.opacity > 0.0) {
        return Ok(());
    }
    let Some(shaped) = engine.shape(
        &pattern.text,
        &pattern.font_family,
        pattern.font_weight,
        pattern.font_size,
        pattern.color,
    )?
    else {
        return Ok(());
    };

    let origins = pattern_tile_origins(
        bounds,
        pattern.rows,
        &pattern.anchors,
        shaped.width,
        pattern.font_size,
    );
    tracing::debug!(tiles = origins.len(), "text pattern");
    let dy = shaped.middle_to_baseline();
    canvas.with_saved(|c| {
        c.set_global_alpha((pattern.opacity / 100.0).clamp(0.0, 1.0) as f32);
        for o in origins {
            shaped.draw_at_baseline(c, o.x, o.y + dy)?;
        }
        Ok(())
    })
}

/// Draw each caption with its baseline starting at `(x, y)`, in order.
pub fn paint_text_overlays(
    canvas: &mut Canvas,
    overlays: &[TextOverlay],
    engine: &mut TextEngine,
) -> ShotframeResult<()> {
    for overlay in overlays {
        let Some(shaped) = engine.shape(
            &overlay.text,
            &overlay.font_family,
            overlay.font_weight,
            overlay.font_size,
            overlay.color,
        )?
        else {
            continue;
        };
        shaped.draw_at_baseline(canvas, overlay.x, overlay.y)?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/text.rs"]
mod tests;
