use kurbo::{RoundedRect, Shape};

use crate::assets::bitmap::Bitmap;
use crate::foundation::core::Rect;
use crate::foundation::error::ShotframeResult;
use crate::frame::layout::CornerRadii;
use crate::paint::canvas::{Canvas, PATH_TOLERANCE};

/// How the screenshot sits inside its content rect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImagePlacement {
    /// Zoom applied after fitting.
    pub scale: f64,
    /// Rotation about the image centre.
    pub rotation_deg: f64,
    /// Clip corner radius, clamped to `0..=50`.
    pub border_radius: f64,
    /// Per-corner lower bound for the clip, taken from the frame outline.
    pub min_radii: CornerRadii,
}

impl Default for ImagePlacement {
    fn default() -> Self {
        Self {
            scale: 1.0,
            rotation_deg: 0.0,
            border_radius: 0.0,
            min_radii: CornerRadii::uniform(0.0),
        }
    }
}

impl ImagePlacement {
    /// `border_radius` clamped to `0..=50`; non-finite values count as 0.
    pub fn clamped_border_radius(&self) -> f64 {
        if self.border_radius.is_finite() {
            self.border_radius.clamp(0.0, 50.0)
        } else {
            0.0
        }
    }

    /// Radii of the rounded clip: the border radius, raised per corner to `min_radii`.
    pub fn clip_radii(&self) -> CornerRadii {
        let r = self.clamped_border_radius();
        let raise = |min: f64| if min.is_finite() { r.max(min) } else { r };
        CornerRadii {
            top_left: raise(self.min_radii.top_left),
            top_right: raise(self.min_radii.top_right),
            bottom_right: raise(self.min_radii.bottom_right),
            bottom_left: raise(self.min_radii.bottom_left),
        }
    }
}

/// Unrotated draw rect: natural size fitted down into `content`, times `scale`, centred.
pub fn image_draw_rect(natural_width: f64, natural_height: f64, content: Rect, scale: f64) -> Rect {
    if natural_width <= 0.0 || natural_height <= 0.0 {
        return Rect::ZERO;
    }
    let fit = 1.0_f64
        .min(content.width() / natural_width)
        .min(content.height() / natural_height)
        .max(0.0);
    let w = natural_width * fit * scale;
    let h = natural_height * fit * scale;
    let c = content.center();
    Rect::new(c.x - w / 2.0, c.y - h / 2.0, c.x + w / 2.0, c.y + h / 2.0)
}

/// Draw `bitmap` centred in `content`, clipped to a rounded rect of the content's size and
/// rotated about its own centre.
pub fn composite_image(
    canvas: &mut Canvas,
    bitmap: &Bitmap,
    content: Rect,
    placement: &ImagePlacement,
) -> ShotframeResult<()> {
    if bitmap.is_empty() || content.width() <= 0.0 || content.height() <= 0.0 {
        return Ok(());
    }
    let dest = image_draw_rect(
        f64::from(bitmap.width()),
        f64::from(bitmap.height()),
        content,
        placement.scale,
    );
    if dest.width() <= 0.0 || dest.height() <= 0.0 {
        return Ok(());
    }

    canvas.with_saved(|c| {
        let clip = RoundedRect::from_rect(content, placement.clip_radii().to_kurbo());
        c.clip(&clip.to_path(PATH_TOLERANCE));

        let center = dest.center();
        c.translate(center.x, center.y);
        c.rotate(placement.rotation_deg.to_radians());
        c.translate(-center.x, -center.y);
        c.draw_image(bitmap, dest)
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/image.rs"]
mod tests;
