use kurbo::RoundedRect;

use crate::foundation::core::{Rect, Vec2};
use crate::foundation::error::ShotframeResult;
use crate::frame::layout::CornerRadii;
use crate::paint::canvas::{Canvas, Paint, ShadowStyle};
use crate::scene::model::ShadowSpec;

/// Paint a soft drop shadow under a rounded rect with separate top and bottom radii.
///
/// A shadow with zero (or negative, or non-finite) blur or opacity leaves the canvas untouched.
/// Otherwise the shape is filled in the shadow colour at `opacity / 100`, with a blurred copy
/// offset downwards by half the blur. The canvas state is restored afterwards.
pub fn draw_shadow(
    canvas: &mut Canvas,
    rect: Rect,
    top_radius: f64,
    bottom_radius: f64,
    shadow: &ShadowSpec,
) -> ShotframeResult<()> {
    if !shadow.is_visible() {
        return Ok(());
    }

    canvas.with_saved(|c| {
        c.set_shadow(Some(ShadowStyle {
            blur: shadow.blur * 2.0,
            offset: Vec2::new(0.0, shadow.blur * 0.5),
            color: shadow.color,
        }));
        c.set_global_alpha((shadow.opacity / 100.0) as f32);
        let shape = RoundedRect::from_rect(
            rect,
            CornerRadii::top_bottom(top_radius, bottom_radius).to_kurbo(),
        );
        c.fill_shape(&shape, &Paint::Solid(shadow.color))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/render/shadow.rs"]
mod tests;
