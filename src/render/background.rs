use kurbo::Shape;

use crate::assets::bitmap::Bitmap;
use crate::foundation::core::{BezPath, Point, Rect, Vec2};
use crate::foundation::error::{ShotframeError, ShotframeResult};
use crate::paint::canvas::{Canvas, GradientStop, PATH_TOLERANCE, Paint};
use crate::paint::composite::BlendMode;
use crate::render::mesh::{MeshGradient, parse_mesh_descriptor};
use crate::scene::color::Color;
use crate::scene::model::{Background, RenderPurpose};

/// Side of one checkerboard square, in logical pixels.
pub const CHECKER_TILE: f64 = 10.0;

/// Base colour of a mesh background without an explicit one.
pub fn default_mesh_base() -> Color {
    Color::rgb8(0x0b, 0x10, 0x20)
}

/// Paint `background` over the whole `width`×`height` logical canvas.
pub fn paint_background(
    canvas: &mut Canvas,
    width: f64,
    height: f64,
    background: &Background,
    purpose: RenderPurpose,
) -> ShotframeResult<()> {
    paint_background_tiled(canvas, width, height, background, purpose, CHECKER_TILE)
}

pub(crate) fn paint_background_tiled(
    canvas: &mut Canvas,
    width: f64,
    height: f64,
    background: &Background,
    purpose: RenderPurpose,
    checker_tile: f64,
) -> ShotframeResult<()> {
    let full = Rect::new(0.0, 0.0, width, height);
    match background {
        Background::Solid { color } => canvas.fill_rect(full, &Paint::Solid(*color)),
        Background::Gradient {
            from,
            to,
            angle_deg,
        } => {
            let (start, end) = gradient_line(width, height, *angle_deg);
            canvas.fill_rect(
                full,
                &Paint::LinearGradient {
                    start,
                    end,
                    stops: vec![GradientStop::new(0.0, *from), GradientStop::new(1.0, *to)],
                },
            )
        }
        Background::Mesh {
            descriptor,
            base_color,
        } => {
            let mesh = match descriptor.as_deref() {
                Some(d) if !d.trim().is_empty() => parse_mesh_descriptor(d),
                _ => MeshGradient::fallback(),
            };
            paint_mesh(
                canvas,
                width,
                height,
                &mesh,
                base_color.unwrap_or_else(default_mesh_base),
            )
        }
        Background::Image { bitmap, .. } => {
            let bitmap = bitmap.as_deref().ok_or_else(|| {
                ShotframeError::validation("image background has no bitmap attached")
            })?;
            paint_cover_image(canvas, full, bitmap)
        }
        Background::Transparent => match purpose {
            RenderPurpose::Export => Ok(()),
            RenderPurpose::Preview => paint_checkerboard(canvas, full, checker_tile),
        },
    }
}

/// Endpoints of a linear gradient at `angle_deg` whose line spans the whole canvas.
///
/// The line passes through the centre with half-length `(|W cos θ| + |H sin θ|) / 2`.
pub fn gradient_line(width: f64, height: f64, angle_deg: f64) -> (Point, Point) {
    let theta = angle_deg.to_radians();
    let dir = Vec2::new(theta.cos(), theta.sin());
    let half = ((width * dir.x).abs() + (height * dir.y).abs()) / 2.0;
    let center = Point::new(width / 2.0, height / 2.0);
    (center - dir * half, center + dir * half)
}

fn paint_mesh(
    canvas: &mut Canvas,
    width: f64,
    height: f64,
    mesh: &MeshGradient,
    base: Color,
) -> ShotframeResult<()> {
    let full = Rect::new(0.0, 0.0, width, height);
    canvas.fill_rect(full, &Paint::Solid(base))?;
    canvas.with_saved(|c| {
        c.set_blend_mode(BlendMode::Screen);
        for blob in &mesh.blobs {
            let center = Point::new(blob.center.x * width, blob.center.y * height);
            let radius = blob.falloff * farthest_corner(full, center);
            if !(radius.is_finite() && radius > 0.0) {
                continue;
            }
            c.fill_rect(
                full,
                &Paint::RadialGradient {
                    center,
                    radius,
                    stops: vec![
                        GradientStop::new(0.0, blob.color),
                        GradientStop::new(1.0, blob.color.with_alpha(0.0)),
                    ],
                },
            )?;
        }
        Ok(())
    })
}

fn farthest_corner(rect: Rect, p: Point) -> f64 {
    [
        Point::new(rect.x0, rect.y0),
        Point::new(rect.x1, rect.y0),
        Point::new(rect.x0, rect.y1),
        Point::new(rect.x1, rect.y1),
    ]
    .into_iter()
    .map(|corner| corner.distance(p))
    .fold(0.0, f64::max)
}

/// Rect that scales `(w, h)` to cover `area`, centred.
pub fn cover_rect(natural_w: f64, natural_h: f64, area: Rect) -> Rect {
    let s = (area.width() / natural_w).max(area.height() / natural_h);
    let (dw, dh) = (natural_w * s, natural_h * s);
    let c = area.center();
    Rect::new(c.x - dw / 2.0, c.y - dh / 2.0, c.x + dw / 2.0, c.y + dh / 2.0)
}

fn paint_cover_image(canvas: &mut Canvas, full: Rect, bitmap: &Bitmap) -> ShotframeResult<()> {
    if bitmap.is_empty() {
        return Err(ShotframeError::validation(
            "image background bitmap has no pixels",
        ));
    }
    let dest = cover_rect(f64::from(bitmap.width()), f64::from(bitmap.height()), full);
    canvas.draw_image(bitmap, dest)
}

fn paint_checkerboard(canvas: &mut Canvas, full: Rect, tile: f64) -> ShotframeResult<()> {
    canvas.fill_rect(full, &Paint::Solid(Color::WHITE))?;
    let tile = if tile.is_finite() && tile > 0.0 {
        tile
    } else {
        CHECKER_TILE
    };
    let cols = (full.width() / tile).ceil() as usize;
    let rows = (full.height() / tile).ceil() as usize;
    let mut dark = BezPath::new();
    for row in 0..rows {
        for col in (((row + 1) % 2)..cols).step_by(2) {
            let x = col as f64 * tile;
            let y = row as f64 * tile;
            dark.extend(Rect::new(x, y, x + tile, y + tile).path_elements(PATH_TOLERANCE));
        }
    }
    canvas.fill_path(&dark, &Paint::Solid(Color::rgb8(0xcc, 0xcc, 0xcc)))
}

#[cfg(test)]
#[path = "../../tests/unit/render/background.rs"]
mod tests;
