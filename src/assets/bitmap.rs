use std::fmt;
use std::sync::{Arc, OnceLock};

use anyhow::Context;

use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::foundation::math::{premultiply_rgba8_in_place, rgba8_len};

/// A decoded bitmap: tightly packed premultiplied RGBA8, origin top-left.
///
/// The engine only ever reads a bitmap. The rasterizer paint is built lazily on first draw and
/// shared by every later draw of the same bitmap.
#[derive(Clone)]
pub struct Bitmap {
    width: u32,
    height: u32,
    rgba8_premul: Arc<Vec<u8>>,
    paint: Arc<OnceLock<vello_cpu::Image>>,
}

impl fmt::Debug for Bitmap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Bitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .finish_non_exhaustive()
    }
}

impl Bitmap {
    /// Wrap premultiplied RGBA8 pixels.
    pub fn from_rgba8_premul(width: u32, height: u32, data: Vec<u8>) -> ShotframeResult<Self> {
        let expected = rgba8_len(width, height)
            .ok_or_else(|| ShotframeError::validation("bitmap buffer size overflow"))?;
        if data.len() != expected {
            return Err(ShotframeError::validation(format!(
                "bitmap expects {expected} bytes for {width}x{height}, got {}",
                data.len()
            )));
        }
        if width > u32::from(u16::MAX) || height > u32::from(u16::MAX) {
            return Err(ShotframeError::validation(format!(
                "bitmap {width}x{height} exceeds {}px per edge",
                u16::MAX
            )));
        }
        Ok(Self {
            width,
            height,
            rgba8_premul: Arc::new(data),
            paint: Arc::new(OnceLock::new()),
        })
    }

    /// Premultiply and wrap straight-alpha RGBA8 pixels.
    pub fn from_rgba8(width: u32, height: u32, mut data: Vec<u8>) -> ShotframeResult<Self> {
        premultiply_rgba8_in_place(&mut data);
        Self::from_rgba8_premul(width, height, data)
    }

    /// A bitmap filled with one straight-alpha colour.
    pub fn solid(width: u32, height: u32, rgba: [u8; 4]) -> ShotframeResult<Self> {
        let px = (width as usize).saturating_mul(height as usize);
        Self::from_rgba8(width, height, rgba.repeat(px))
    }

    /// Decode an encoded image (PNG, JPEG, WebP, ...) from memory.
    pub fn decode(bytes: &[u8]) -> ShotframeResult<Self> {
        let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
        let rgba = dyn_img.to_rgba8();
        let (width, height) = rgba.dimensions();
        Self::from_rgba8(width, height, rgba.into_raw())
    }

    /// Read and decode an image file.
    pub fn open(path: impl AsRef<std::path::Path>) -> ShotframeResult<Self> {
        let path = path.as_ref();
        let bytes =
            std::fs::read(path).with_context(|| format!("read image '{}'", path.display()))?;
        Self::decode(&bytes)
    }

    /// Natural width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Natural height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// `true` when the bitmap has no pixels.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.rgba8_premul
    }

    pub(crate) fn paint(&self) -> vello_cpu::Image {
        self.paint
            .get_or_init(|| {
                let w = self.width as u16;
                let h = self.height as u16;
                let pixels = self
                    .rgba8_premul
                    .chunks_exact(4)
                    .map(|px| {
                        vello_cpu::peniko::color::PremulRgba8::from_u8_array([
                            px[0], px[1], px[2], px[3],
                        ])
                    })
                    .collect::<Vec<_>>();
                let opaque = self.rgba8_premul.chunks_exact(4).all(|px| px[3] == 255);
                let pixmap = vello_cpu::Pixmap::from_parts_with_opacity(pixels, w, h, !opaque);
                vello_cpu::Image {
                    image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
                    sampler: vello_cpu::peniko::ImageSampler::default(),
                }
            })
            .clone()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bitmap.rs"]
mod tests;
