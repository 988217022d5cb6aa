//! Encoding painted canvases into transferable image payloads.

use std::str::FromStr;

use base64::Engine as _;
use image::{ExtendedColorType, ImageEncoder};
use serde::{Deserialize, Serialize};

use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::paint::canvas::Canvas;
use crate::paint::pool::CanvasPool;
use crate::render::scene::Renderer;
use crate::scene::model::{RenderPurpose, SceneDescription};

/// Output file format.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageFormat {
    /// Lossless, keeps alpha.
    #[default]
    Png,
    /// Lossy, transparency flattened onto black.
    Jpeg,
    /// Lossless WebP, keeps alpha.
    Webp,
}

impl ImageFormat {
    /// MIME type of encoded payloads.
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
            Self::Webp => "image/webp",
        }
    }

    /// Conventional file extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
            Self::Webp => "webp",
        }
    }
}

impl FromStr for ImageFormat {
    type Err = ShotframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpeg" | "jpg" => Ok(Self::Jpeg),
            "webp" => Ok(Self::Webp),
            other => Err(ShotframeError::validation(format!(
                "unsupported image format '{other}' (expected png, jpeg or webp)"
            ))),
        }
    }
}

impl std::fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Png => "png",
            Self::Jpeg => "jpeg",
            Self::Webp => "webp",
        })
    }
}

/// Format and quality of an export.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Output format.
    pub format: ImageFormat,
    /// Lossy quality in `0..=1`. Only JPEG uses it.
    pub quality: f32,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            format: ImageFormat::Png,
            quality: 0.92,
        }
    }
}

impl ExportOptions {
    fn jpeg_quality(&self) -> ShotframeResult<u8> {
        if !self.quality.is_finite() {
            return Err(ShotframeError::validation("export quality must be finite"));
        }
        Ok((self.quality.clamp(0.0, 1.0) * 100.0).round().clamp(1.0, 100.0) as u8)
    }
}

/// Encoded image bytes tagged with their MIME type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Blob {
    /// MIME type, e.g. `image/png`.
    pub mime: String,
    /// Encoded file contents.
    pub bytes: Vec<u8>,
}

impl Blob {
    /// Payload size in bytes.
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// `true` for an empty payload.
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// A clipboard-writable item. Clipboards only take PNG.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClipboardItem {
    /// PNG payload.
    pub blob: Blob,
}

/// Encode the canvas contents.
///
/// Pending draws are flushed first. An encoder that produces no bytes is reported as
/// [`ShotframeError::Encode`].
#[tracing::instrument(skip(canvas), fields(width = canvas.width(), height = canvas.height()))]
pub fn encode(canvas: &mut Canvas, opts: &ExportOptions) -> ShotframeResult<Blob> {
    let (w, h) = (canvas.width(), canvas.height());
    if w == 0 || h == 0 {
        return Err(ShotframeError::encode("cannot encode an empty canvas"));
    }

    let mut bytes = Vec::new();
    match opts.format {
        ImageFormat::Png => {
            let rgba = canvas.to_rgba8()?;
            image::codecs::png::PngEncoder::new(&mut bytes)
                .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
                .map_err(|e| ShotframeError::encode(format!("png: {e}")))?;
        }
        ImageFormat::Jpeg => {
            canvas.flush()?;
            // Premultiplied colour is the image composited over black.
            let rgb: Vec<u8> = canvas
                .data()
                .chunks_exact(4)
                .flat_map(|px| [px[0], px[1], px[2]])
                .collect();
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut bytes, opts.jpeg_quality()?)
                .write_image(&rgb, w, h, ExtendedColorType::Rgb8)
                .map_err(|e| ShotframeError::encode(format!("jpeg: {e}")))?;
        }
        ImageFormat::Webp => {
            let rgba = canvas.to_rgba8()?;
            image::codecs::webp::WebPEncoder::new_lossless(&mut bytes)
                .write_image(&rgba, w, h, ExtendedColorType::Rgba8)
                .map_err(|e| ShotframeError::encode(format!("webp: {e}")))?;
        }
    }

    if bytes.is_empty() {
        return Err(ShotframeError::encode(format!(
            "{} encoder produced no data",
            opts.format
        )));
    }
    tracing::debug!(format = %opts.format, bytes = bytes.len(), "encoded");
    Ok(Blob {
        mime: opts.format.mime_type().to_owned(),
        bytes,
    })
}

/// `data:<mime>;base64,<payload>` URL for a blob.
pub fn to_data_url(blob: &Blob) -> String {
    format!(
        "data:{};base64,{}",
        blob.mime,
        base64::engine::general_purpose::STANDARD.encode(&blob.bytes)
    )
}

/// Encode the canvas as a PNG clipboard item.
pub fn clipboard_item(canvas: &mut Canvas) -> ShotframeResult<ClipboardItem> {
    let blob = encode(
        canvas,
        &ExportOptions {
            format: ImageFormat::Png,
            ..ExportOptions::default()
        },
    )?;
    Ok(ClipboardItem { blob })
}

/// Render `scene` for export into a pooled canvas and encode it.
///
/// The canvas goes back to the pool whether or not rendering succeeded.
pub fn export_scene(
    renderer: &mut Renderer,
    scene: &SceneDescription,
    opts: &ExportOptions,
    pool: &mut CanvasPool,
) -> ShotframeResult<Blob> {
    let (w, h) = scene.target.device_size(scene.export_scale)?;
    let mut canvas = pool.acquire(w, h)?;
    let out = renderer
        .render_canvas(scene, &mut canvas, RenderPurpose::Export)
        .and_then(|_| encode(&mut canvas, opts));
    pool.release(canvas);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/export/mod.rs"]
mod tests;
