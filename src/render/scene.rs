use crate::foundation::core::{Rect, Vec2};
use crate::foundation::error::ShotframeResult;
use crate::frame::layout::{FrameKind, FrameLayout, compute_frame_layout};
use crate::paint::canvas::Canvas;
use crate::render::background::{CHECKER_TILE, paint_background_tiled};
use crate::render::chrome::paint_chrome;
use crate::render::image::{ImagePlacement, composite_image, image_draw_rect};
use crate::render::shadow::draw_shadow;
use crate::render::text::{FontBook, TextEngine, paint_text_overlays, paint_text_pattern};
use crate::scene::model::{RenderPurpose, SceneDescription};

/// Renderer knobs.
#[derive(Clone, Debug)]
pub struct RendererOpts {
    /// Side of the preview checkerboard squares, in logical pixels.
    pub checker_tile: f64,
    /// Faces available to text layers.
    pub fonts: FontBook,
}

impl Default for RendererOpts {
    fn default() -> Self {
        Self {
            checker_tile: CHECKER_TILE,
            fonts: FontBook::default(),
        }
    }
}

/// Layout of one render, in logical pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct ScenePlan {
    /// Full logical canvas.
    pub canvas: Rect,
    /// Frame laid out around the fitted content and centred on the canvas.
    pub frame: FrameLayout,
    /// Screenshot draw rect before rotation.
    pub image_rect: Rect,
    /// Screenshot placement inside the content rect.
    pub placement: ImagePlacement,
    /// Top corner radius of the shadow shape.
    pub shadow_top_radius: f64,
    /// Bottom corner radius of the shadow shape.
    pub shadow_bottom_radius: f64,
}

/// Outcome of a successful render.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderReport {
    /// Canvas width in device pixels.
    pub width: u32,
    /// Canvas height in device pixels.
    pub height: u32,
    /// What was painted.
    pub plan: ScenePlan,
}

/// Compute where everything goes, without painting.
///
/// The available area is the target minus twice the padding minus the frame insets. The
/// screenshot's natural size is fitted into it (never enlarged), the frame is laid out around
/// that content and centred on the canvas.
pub fn plan_scene(scene: &SceneDescription) -> ShotframeResult<ScenePlan> {
    let image = scene.source()?;
    scene.target.validate()?;
    let (nw, nh) = (f64::from(image.width()), f64::from(image.height()));
    let canvas = scene.target.to_rect();

    let insets = scene.frame.profile().content_padding;
    let padding = scene.styling.padding.max(0.0);
    let avail_w = canvas.width() - 2.0 * padding - insets.horizontal();
    let avail_h = canvas.height() - 2.0 * padding - insets.vertical();
    let fit = 1.0_f64.min(avail_w / nw).min(avail_h / nh).max(0.0);
    let (cw, ch) = (nw * fit, nh * fit);

    let layout = compute_frame_layout(scene.frame, cw, ch);
    let offset = Vec2::new(
        (canvas.width() - layout.outer.width()) / 2.0,
        (canvas.height() - layout.outer.height()) / 2.0,
    );
    let frame = if layout.is_degenerate() {
        layout
    } else {
        layout.translate(offset)
    };

    let placement = ImagePlacement {
        scale: scene.styling.clamped_image_scale(),
        rotation_deg: scene.styling.rotation_deg,
        border_radius: scene.styling.clamped_border_radius(),
        min_radii: frame.content_radii(),
    };
    let image_rect = if frame.is_degenerate() {
        Rect::ZERO
    } else {
        image_draw_rect(nw, nh, frame.content, placement.scale)
    };
    let (shadow_top_radius, shadow_bottom_radius) = match scene.frame {
        FrameKind::None => {
            let r = placement.clamped_border_radius();
            (r, r)
        }
        _ => (frame.top_radius, frame.bottom_radius),
    };

    Ok(ScenePlan {
        canvas,
        frame,
        image_rect,
        placement,
        shadow_top_radius,
        shadow_bottom_radius,
    })
}

/// Turns scene descriptions into pixels.
///
/// Holds only caches (shaped fonts); the output depends on the scene alone.
#[derive(Debug)]
pub struct Renderer {
    checker_tile: f64,
    text: TextEngine,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererOpts::default())
    }
}

impl Renderer {
    /// Build a renderer.
    pub fn new(opts: RendererOpts) -> Self {
        Self {
            checker_tile: opts.checker_tile,
            text: TextEngine::new(opts.fonts),
        }
    }

    /// Paint `scene` onto `canvas`.
    ///
    /// The canvas is resized to `trunc(target * export_scale)` and cleared, then background,
    /// text pattern, shadow, chrome, screenshot, chrome overlays and captions are painted in that
    /// order. Precondition failures return before anything is painted.
    #[tracing::instrument(
        skip_all,
        fields(frame = %scene.frame, background = scene.background.type_name(), purpose = ?purpose)
    )]
    pub fn render_canvas(
        &mut self,
        scene: &SceneDescription,
        canvas: &mut Canvas,
        purpose: RenderPurpose,
    ) -> ShotframeResult<RenderReport> {
        scene.validate()?;
        let image = scene.source()?;
        let (width, height) = scene.target.device_size(scene.export_scale)?;
        let plan = plan_scene(scene)?;

        canvas.resize(width, height)?;
        canvas.scale(scene.export_scale, scene.export_scale);
        tracing::debug!(width, height, scale = scene.export_scale, "canvas sized");

        let target = plan.canvas;
        let tile = if self.checker_tile.is_finite() && self.checker_tile > 0.0 {
            self.checker_tile
        } else {
            CHECKER_TILE
        };
        paint_background_tiled(
            canvas,
            target.width(),
            target.height(),
            &scene.background,
            purpose,
            tile,
        )?;
        if let Some(pattern) = &scene.text_pattern {
            paint_text_pattern(canvas, target, pattern, &mut self.text)?;
        }
        tracing::debug!("background painted");

        draw_shadow(
            canvas,
            plan.frame.outer,
            plan.shadow_top_radius,
            plan.shadow_bottom_radius,
            &scene.shadow,
        )?;
        paint_chrome(canvas, &plan.frame.commands)?;
        composite_image(canvas, image, plan.frame.content, &plan.placement)?;
        paint_chrome(canvas, &plan.frame.overlays)?;
        tracing::debug!(content = ?plan.frame.content, "frame painted");

        paint_text_overlays(canvas, &scene.text_overlays, &mut self.text)?;
        canvas.flush()?;

        Ok(RenderReport {
            width,
            height,
            plan,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/scene.rs"]
mod tests;
