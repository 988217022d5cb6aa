use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::foundation::math::rgba8_len;

/// Normalised 1-D gaussian in Q16 fixed point, run separably over premultiplied RGBA8.
///
/// Taps reach out to three standard deviations; the weights always sum to exactly `1 << 16`.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct GaussianKernel {
    weights: Vec<u32>,
}

impl GaussianKernel {
    /// Kernel for a canvas-style shadow blur of `blur` device pixels (sigma is half of it).
    ///
    /// `None` when the blur would leave the shadow sharp.
    pub(crate) fn for_shadow_blur(blur: f64) -> Option<Self> {
        Self::from_sigma(blur / 2.0)
    }

    pub(crate) fn from_sigma(sigma: f64) -> Option<Self> {
        if !sigma.is_finite() || sigma <= 0.0 {
            return None;
        }
        let radius = (sigma * 3.0).ceil() as i64;
        let denom = 2.0 * sigma * sigma;
        let raw: Vec<f64> = (-radius..=radius)
            .map(|i| (-((i * i) as f64) / denom).exp())
            .collect();
        let sum: f64 = raw.iter().sum();

        let mut weights: Vec<u32> = raw
            .iter()
            .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
            .collect();
        let total: i64 = weights.iter().map(|&w| i64::from(w)).sum();
        let mid = weights.len() / 2;
        weights[mid] = (i64::from(weights[mid]) + 65536 - total).clamp(0, 65536) as u32;
        Some(Self { weights })
    }

    /// Pixels the kernel reaches on each side of a tap.
    pub(crate) fn radius(&self) -> usize {
        self.weights.len() / 2
    }

    /// Blur `src` (`width`×`height` premultiplied RGBA8). Edges clamp.
    pub(crate) fn apply(&self, src: &[u8], width: u32, height: u32) -> ShotframeResult<Vec<u8>> {
        let len =
            rgba8_len(width, height).ok_or_else(|| ShotframeError::render("blur buffer size overflow"))?;
        if src.len() != len {
            return Err(ShotframeError::render(format!(
                "blur input is {} bytes, expected {len} for {width}x{height}",
                src.len()
            )));
        }
        if len == 0 {
            return Ok(Vec::new());
        }

        let (w, h) = (width as usize, height as usize);
        let mut rows = vec![0u8; len];
        self.convolve(src, &mut rows, h, w, |y, x| y * w + x);
        let mut out = vec![0u8; len];
        self.convolve(&rows, &mut out, w, h, |x, y| y * w + x);
        Ok(out)
    }

    /// One pass along `lines` runs of `span` pixels; `at(line, pos)` is the pixel index.
    fn convolve(
        &self,
        src: &[u8],
        dst: &mut [u8],
        lines: usize,
        span: usize,
        at: impl Fn(usize, usize) -> usize,
    ) {
        let last = span - 1;
        let r = self.radius();
        for line in 0..lines {
            for pos in 0..span {
                let mut acc = [0u64; 4];
                for (tap, &weight) in self.weights.iter().enumerate() {
                    let p = (pos + tap).saturating_sub(r).min(last);
                    let px = &src[at(line, p) * 4..][..4];
                    for (a, &v) in acc.iter_mut().zip(px) {
                        *a += u64::from(weight) * u64::from(v);
                    }
                }
                let out = &mut dst[at(line, pos) * 4..][..4];
                for (o, a) in out.iter_mut().zip(acc) {
                    *o = ((a + 0x8000) >> 16).min(255) as u8;
                }
            }
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/paint/blur.rs"]
mod tests;
