use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::foundation::math::{add_sat_u8, mul_div255_u8};

pub(crate) type PremulRgba8 = [u8; 4];

/// How a rasterized layer combines with the pixels already on the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BlendMode {
    /// Porter-Duff source-over.
    #[default]
    Normal,
    /// Source-over with the screen blend function, `s + d - s*d`.
    Screen,
}

pub(crate) fn over(dst: PremulRgba8, src: PremulRgba8, opacity: f32) -> PremulRgba8 {
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 || src[3] == 0 {
        return dst;
    }

    let op = ((opacity * 255.0).round() as i32).clamp(0, 255) as u16;
    let sa = mul_div255_u8(u16::from(src[3]), op);
    if sa == 0 {
        return dst;
    }

    let inv = 255u16 - u16::from(sa);

    let mut out = [0u8; 4];
    out[3] = add_sat_u8(sa, mul_div255_u8(u16::from(dst[3]), inv));

    for i in 0..3 {
        let sc = mul_div255_u8(u16::from(src[i]), op);
        let dc = mul_div255_u8(u16::from(dst[i]), inv);
        out[i] = add_sat_u8(sc, dc);
    }
    out
}

/// Composite `src` over `dst` (equal-sized premultiplied buffers) with `blend`.
pub(crate) fn composite_in_place(
    dst: &mut [u8],
    src: &[u8],
    opacity: f32,
    blend: BlendMode,
) -> ShotframeResult<()> {
    if dst.len() != src.len() || !dst.len().is_multiple_of(4) {
        return Err(ShotframeError::render(
            "composite_in_place expects equal-length rgba8 buffers",
        ));
    }
    match blend {
        BlendMode::Normal => {
            for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
                let out = over([d[0], d[1], d[2], d[3]], [s[0], s[1], s[2], s[3]], opacity);
                d.copy_from_slice(&out);
            }
            Ok(())
        }
        BlendMode::Screen => composite_blend(dst, src, opacity, |s, d| s + d - s * d),
    }
}

/// Composite a `src_w`×`src_h` buffer over `dst` with its top-left corner at `(x, y)`.
///
/// Pixels falling outside `dst` are dropped.
#[allow(clippy::too_many_arguments)]
pub(crate) fn over_at_offset(
    dst: &mut [u8],
    dst_w: u32,
    dst_h: u32,
    src: &[u8],
    src_w: u32,
    src_h: u32,
    x: i64,
    y: i64,
    opacity: f32,
) -> ShotframeResult<()> {
    if dst.len() != (dst_w as usize) * (dst_h as usize) * 4
        || src.len() != (src_w as usize) * (src_h as usize) * 4
    {
        return Err(ShotframeError::render(
            "over_at_offset expects buffers matching their dimensions",
        ));
    }
    for sy in 0..i64::from(src_h) {
        let dy = y + sy;
        if dy < 0 || dy >= i64::from(dst_h) {
            continue;
        }
        for sx in 0..i64::from(src_w) {
            let dx = x + sx;
            if dx < 0 || dx >= i64::from(dst_w) {
                continue;
            }
            let si = ((sy as usize) * (src_w as usize) + sx as usize) * 4;
            let di = ((dy as usize) * (dst_w as usize) + dx as usize) * 4;
            let s = [src[si], src[si + 1], src[si + 2], src[si + 3]];
            if s[3] == 0 {
                continue;
            }
            let d = [dst[di], dst[di + 1], dst[di + 2], dst[di + 3]];
            dst[di..di + 4].copy_from_slice(&over(d, s, opacity));
        }
    }
    Ok(())
}

fn composite_blend<F>(dst: &mut [u8], src: &[u8], opacity: f32, blend_fn: F) -> ShotframeResult<()>
where
    F: Fn(f32, f32) -> f32,
{
    let opacity = opacity.clamp(0.0, 1.0);
    if opacity <= 0.0 {
        return Ok(());
    }

    for (d, s) in dst.chunks_exact_mut(4).zip(src.chunks_exact(4)) {
        if s[3] == 0 {
            continue;
        }
        // Source-over with the blend applied to unpremultiplied channels:
        // out_a = sa + da * (1 - sa)
        // out_p = sp * (1 - da) + dp * (1 - sa) + B(sc, dc) * sa * da
        let sa = (s[3] as f32 / 255.0) * opacity;
        let da = d[3] as f32 / 255.0;
        let out_a = (sa + da * (1.0 - sa)).clamp(0.0, 1.0);

        for c in 0..3 {
            let sp = (s[c] as f32 / 255.0) * opacity;
            let dp = d[c] as f32 / 255.0;
            let sc = if sa > 0.0 { (sp / sa).clamp(0.0, 1.0) } else { 0.0 };
            let dc = if da > 0.0 { (dp / da).clamp(0.0, 1.0) } else { 0.0 };
            let b = blend_fn(sc, dc).clamp(0.0, 1.0);
            let out_p = (sp * (1.0 - da) + dp * (1.0 - sa) + b * sa * da).clamp(0.0, 1.0);
            d[c] = (out_p * 255.0).round() as u8;
        }
        d[3] = (out_a * 255.0).round() as u8;
    }

    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/paint/composite.rs"]
mod tests;
