use crate::foundation::error::{ShotframeError, ShotframeResult};

pub use kurbo::{Affine, BezPath, Point, Rect, Size, Vec2};

/// Largest export multiplier accepted by the renderer.
pub const MAX_EXPORT_SCALE: f64 = 4.0;

/// Largest backing canvas edge, in device pixels.
pub const MAX_CANVAS_EDGE: u32 = u16::MAX as u32;

/// Logical (1x) output size of a render.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TargetDimensions {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl TargetDimensions {
    /// Construct dimensions without validation.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Check that both edges are finite and strictly positive.
    pub fn validate(self) -> ShotframeResult<()> {
        if !self.width.is_finite() || !self.height.is_finite() {
            return Err(ShotframeError::validation(
                "target dimensions must be finite",
            ));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(ShotframeError::validation(
                "target dimensions must be > 0",
            ));
        }
        Ok(())
    }

    /// Device pixel size for `export_scale`, truncating fractional pixels.
    pub fn device_size(self, export_scale: f64) -> ShotframeResult<(u32, u32)> {
        self.validate()?;
        validate_export_scale(export_scale)?;
        let w = (self.width * export_scale).trunc();
        let h = (self.height * export_scale).trunc();
        if w < 1.0 || h < 1.0 {
            return Err(ShotframeError::validation(format!(
                "scaled canvas {w}x{h} has no pixels"
            )));
        }
        if w > f64::from(MAX_CANVAS_EDGE) || h > f64::from(MAX_CANVAS_EDGE) {
            return Err(ShotframeError::validation(format!(
                "scaled canvas {w}x{h} exceeds {MAX_CANVAS_EDGE}px per edge"
            )));
        }
        Ok((w as u32, h as u32))
    }

    /// The full logical canvas rectangle.
    pub fn to_rect(self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Check that an export multiplier is finite and in `(0, MAX_EXPORT_SCALE]`.
pub fn validate_export_scale(scale: f64) -> ShotframeResult<()> {
    if !scale.is_finite() || scale <= 0.0 || scale > MAX_EXPORT_SCALE {
        return Err(ShotframeError::validation(format!(
            "export scale must be finite and in (0, {MAX_EXPORT_SCALE}], got {scale}"
        )));
    }
    Ok(())
}

/// Per-edge insets around a rectangle.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Insets {
    /// Left inset.
    pub left: f64,
    /// Right inset.
    pub right: f64,
    /// Top inset.
    pub top: f64,
    /// Bottom inset.
    pub bottom: f64,
}

impl Insets {
    /// The same inset on every edge.
    pub const fn uniform(v: f64) -> Self {
        Self {
            left: v,
            right: v,
            top: v,
            bottom: v,
        }
    }

    /// Only a top inset.
    pub const fn top(v: f64) -> Self {
        Self {
            left: 0.0,
            right: 0.0,
            top: v,
            bottom: 0.0,
        }
    }

    /// Sum of the left and right insets.
    pub fn horizontal(self) -> f64 {
        self.left + self.right
    }

    /// Sum of the top and bottom insets.
    pub fn vertical(self) -> f64 {
        self.top + self.bottom
    }
}

/// Premultiplied RGBA8 (r,g,b already multiplied by a).
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8Premul {
    /// Red channel premultiplied by alpha.
    pub r: u8,
    /// Green channel premultiplied by alpha.
    pub g: u8,
    /// Blue channel premultiplied by alpha.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8Premul {
    /// Fully transparent black.
    pub fn transparent() -> Self {
        Self {
            r: 0,
            g: 0,
            b: 0,
            a: 0,
        }
    }

    /// Convert straight-alpha RGBA8 into premultiplied RGBA8.
    pub fn from_straight_rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        fn premul(c: u8, a: u8) -> u8 {
            let c = u16::from(c);
            let a = u16::from(a);
            (((c * a) + 127) / 255) as u8
        }

        Self {
            r: premul(r, a),
            g: premul(g, a),
            b: premul(b, a),
            a,
        }
    }

    /// Channels as an `[r, g, b, a]` array.
    pub fn to_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
