use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::assets::bitmap::Bitmap;
use crate::foundation::core::{TargetDimensions, validate_export_scale};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::frame::layout::FrameKind;
use crate::scene::color::Color;

/// What the rendered canvas is for.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RenderPurpose {
    /// Interactive editor preview; transparent backgrounds show a checkerboard.
    #[default]
    Preview,
    /// Final export; transparent backgrounds stay alpha-cleared.
    Export,
}

/// The full declarative input of one render.
///
/// Every field has a serde default, so a JSON scene only needs the values it changes. The
/// source image is never serialized; callers attach it with [`SceneDescription::with_source_image`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneDescription {
    /// Decoded screenshot. Required at render time.
    #[serde(skip)]
    pub source_image: Option<Arc<Bitmap>>,
    /// Canvas background.
    pub background: Background,
    /// Frame skin.
    pub frame: FrameKind,
    /// Padding, radius, scale and rotation of the screenshot.
    pub styling: Styling,
    /// Drop shadow behind the frame.
    pub shadow: ShadowSpec,
    /// Decorative tiled text behind the frame.
    pub text_pattern: Option<TextPattern>,
    /// Captions painted on top of everything, in order.
    pub text_overlays: Vec<TextOverlay>,
    /// Logical output size.
    pub target: TargetDimensions,
    /// Device pixels per logical pixel, in `(0, 4]`.
    pub export_scale: f64,
}

impl Default for SceneDescription {
    fn default() -> Self {
        Self {
            source_image: None,
            background: Background::default(),
            frame: FrameKind::default(),
            styling: Styling::default(),
            shadow: ShadowSpec::default(),
            text_pattern: None,
            text_overlays: Vec::new(),
            target: TargetDimensions::new(1280.0, 800.0),
            export_scale: 1.0,
        }
    }
}

impl SceneDescription {
    /// Parse a scene from JSON text.
    pub fn from_json_str(s: &str) -> ShotframeResult<Self> {
        serde_json::from_str(s).map_err(|e| ShotframeError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ShotframeResult<Self> {
        serde_json::from_reader(r)
            .map_err(|e| ShotframeError::serde(format!("parse scene JSON: {e}")))
    }

    /// Parse a scene from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ShotframeResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).with_context(|| format!("open scene JSON '{}'", path.display()))?;
        Self::from_reader(BufReader::new(f))
    }

    /// Serialize to pretty-printed JSON (bitmaps are omitted).
    pub fn to_json_string(&self) -> ShotframeResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| ShotframeError::serde(e.to_string()))
    }

    /// Attach the screenshot.
    pub fn with_source_image(mut self, image: Arc<Bitmap>) -> Self {
        self.source_image = Some(image);
        self
    }

    /// The screenshot, if attached and non-empty.
    pub fn source(&self) -> ShotframeResult<&Bitmap> {
        match self.source_image.as_deref() {
            Some(b) if !b.is_empty() => Ok(b),
            Some(_) => Err(ShotframeError::validation("source image has no pixels")),
            None => Err(ShotframeError::validation("scene has no source image")),
        }
    }

    /// Check every render precondition.
    pub fn validate(&self) -> ShotframeResult<()> {
        self.source()?;
        self.target.validate()?;
        validate_export_scale(self.export_scale)?;
        self.styling.validate()?;
        self.background.validate()?;
        if let Some(p) = &self.text_pattern {
            p.validate()?;
        }
        for (i, o) in self.text_overlays.iter().enumerate() {
            o.validate()
                .map_err(|e| ShotframeError::validation(format!("text_overlays[{i}]: {e}")))?;
        }
        Ok(())
    }
}

/// Canvas background, exactly one variant per render.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Background {
    /// One colour.
    Solid {
        /// Fill colour.
        color: Color,
    },
    /// Two-colour linear gradient.
    Gradient {
        /// Colour at the start of the gradient line.
        from: Color,
        /// Colour at the end of the gradient line.
        to: Color,
        /// Direction in degrees; 0 runs left to right, 90 top to bottom.
        #[serde(default)]
        angle_deg: f64,
    },
    /// Screen-blended radial blobs over a base colour.
    Mesh {
        /// CSS `radial-gradient(...)` list; absent or unparseable uses the built-in palette.
        #[serde(default)]
        descriptor: Option<String>,
        /// Base fill under the blobs (default `#0b1020`).
        #[serde(default)]
        base_color: Option<Color>,
    },
    /// Bitmap covering the canvas, centre-cropped.
    Image {
        /// Caller-side reference to the image (a path for the CLI).
        #[serde(default)]
        source: Option<String>,
        /// Decoded bitmap, attached by the caller.
        #[serde(skip)]
        bitmap: Option<Arc<Bitmap>>,
    },
    /// Nothing in exports, a checkerboard in previews.
    Transparent,
}

impl Default for Background {
    fn default() -> Self {
        Self::Solid {
            color: Color::WHITE,
        }
    }
}

impl Background {
    /// Check that an image background carries its bitmap.
    pub fn validate(&self) -> ShotframeResult<()> {
        match self {
            Self::Image { bitmap: None, .. } => Err(ShotframeError::validation(
                "image background has no bitmap attached",
            )),
            Self::Image {
                bitmap: Some(b), ..
            } if b.is_empty() => Err(ShotframeError::validation(
                "image background bitmap has no pixels",
            )),
            Self::Gradient { angle_deg, .. } if !angle_deg.is_finite() => Err(
                ShotframeError::validation("gradient angle must be finite"),
            ),
            _ => Ok(()),
        }
    }

    /// Variant name as it appears in JSON.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Solid { .. } => "solid",
            Self::Gradient { .. } => "gradient",
            Self::Mesh { .. } => "mesh",
            Self::Image { .. } => "image",
            Self::Transparent => "transparent",
        }
    }
}

/// Placement of the framed screenshot.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Styling {
    /// Background visible around the frame, in logical pixels.
    pub padding: f64,
    /// Screenshot corner radius, clamped to `0..=50` when used.
    pub border_radius: f64,
    /// Zoom applied to the fitted screenshot, clamped to `0.1..=2.0` when used.
    pub image_scale: f64,
    /// Rotation of the screenshot inside its frame.
    pub rotation_deg: f64,
}

impl Default for Styling {
    fn default() -> Self {
        Self {
            padding: 64.0,
            border_radius: 12.0,
            image_scale: 1.0,
            rotation_deg: 0.0,
        }
    }
}

impl Styling {
    /// Border radius clamped to `0..=50`.
    pub fn clamped_border_radius(&self) -> f64 {
        self.border_radius.clamp(0.0, 50.0)
    }

    /// Image scale clamped to `0.1..=2.0`.
    pub fn clamped_image_scale(&self) -> f64 {
        self.image_scale.clamp(0.1, 2.0)
    }

    /// Reject non-finite values and negative padding.
    pub fn validate(&self) -> ShotframeResult<()> {
        let fields = [
            ("padding", self.padding),
            ("border_radius", self.border_radius),
            ("image_scale", self.image_scale),
            ("rotation_deg", self.rotation_deg),
        ];
        for (name, v) in fields {
            if !v.is_finite() {
                return Err(ShotframeError::validation(format!(
                    "styling.{name} must be finite"
                )));
            }
        }
        if self.padding < 0.0 {
            return Err(ShotframeError::validation("styling.padding must be >= 0"));
        }
        Ok(())
    }
}

/// Drop shadow behind the frame.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShadowSpec {
    /// Blur in logical pixels; 0 disables the shadow.
    pub blur: f64,
    /// Opacity in percent (`0..=100`); 0 disables the shadow.
    pub opacity: f64,
    /// Shadow colour.
    pub color: Color,
}

impl Default for ShadowSpec {
    fn default() -> Self {
        Self {
            blur: 20.0,
            opacity: 50.0,
            color: Color::BLACK,
        }
    }
}

impl ShadowSpec {
    /// A shadow that paints nothing.
    pub fn none() -> Self {
        Self {
            blur: 0.0,
            opacity: 0.0,
            color: Color::BLACK,
        }
    }

    /// `false` when the shadow is a no-op: zero, negative or non-finite blur or opacity.
    pub fn is_visible(&self) -> bool {
        self.blur.is_finite() && self.opacity.is_finite() && self.blur > 0.0 && self.opacity > 0.0
    }
}

fn default_font_family() -> String {
    "Inter, system-ui, sans-serif".to_owned()
}

/// Decorative text tiled across the background.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextPattern {
    /// Tile text.
    pub text: String,
    /// Fill colour.
    pub color: Color,
    /// Opacity in percent (`0..=100`).
    pub opacity: f64,
    /// CSS font family list.
    pub font_family: String,
    /// Font size in logical pixels.
    pub font_size: f64,
    /// CSS font weight (100–900).
    pub font_weight: u16,
    /// Number of rows.
    pub rows: u32,
    /// Per-row starting anchor as a fraction of the canvas width, cycled over rows.
    pub anchors: Vec<f64>,
}

impl Default for TextPattern {
    fn default() -> Self {
        Self {
            text: String::new(),
            color: Color::WHITE,
            opacity: 10.0,
            font_family: default_font_family(),
            font_size: 48.0,
            font_weight: 700,
            rows: 5,
            anchors: vec![0.0, 0.5],
        }
    }
}

impl TextPattern {
    /// Reject unusable sizes and anchors.
    pub fn validate(&self) -> ShotframeResult<()> {
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ShotframeError::validation(
                "text_pattern.font_size must be finite and > 0",
            ));
        }
        if !self.opacity.is_finite() {
            return Err(ShotframeError::validation(
                "text_pattern.opacity must be finite",
            ));
        }
        if self.anchors.iter().any(|a| !a.is_finite()) {
            return Err(ShotframeError::validation(
                "text_pattern.anchors must be finite",
            ));
        }
        Ok(())
    }
}

/// A caption drawn with its baseline starting at `(x, y)`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextOverlay {
    /// Caption text.
    pub text: String,
    /// Left edge of the text, logical pixels.
    pub x: f64,
    /// Baseline, logical pixels.
    pub y: f64,
    /// Fill colour.
    pub color: Color,
    /// Font size in logical pixels.
    pub font_size: f64,
    /// CSS font family list.
    pub font_family: String,
    /// CSS font weight (100–900).
    pub font_weight: u16,
}

impl Default for TextOverlay {
    fn default() -> Self {
        Self {
            text: String::new(),
            x: 0.0,
            y: 0.0,
            color: Color::WHITE,
            font_size: 32.0,
            font_family: default_font_family(),
            font_weight: 400,
        }
    }
}

impl TextOverlay {
    /// Reject non-finite positions and unusable sizes.
    pub fn validate(&self) -> ShotframeResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ShotframeError::validation("position must be finite"));
        }
        if !self.font_size.is_finite() || self.font_size <= 0.0 {
            return Err(ShotframeError::validation(
                "font_size must be finite and > 0",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scene/model.rs"]
mod tests;
