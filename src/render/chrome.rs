use kurbo::{Circle, RoundedRect};

use crate::foundation::error::ShotframeResult;
use crate::frame::layout::ChromeCommand;
use crate::paint::canvas::{Canvas, Paint};

/// Replay frame chrome primitives in order.
pub fn paint_chrome(canvas: &mut Canvas, commands: &[ChromeCommand]) -> ShotframeResult<()> {
    for cmd in commands {
        match cmd {
            ChromeCommand::RoundedRect { rect, radii, fill } => {
                let shape = RoundedRect::from_rect(*rect, radii.to_kurbo());
                canvas.fill_shape(&shape, &Paint::Solid(*fill))?;
            }
            ChromeCommand::Circle {
                center,
                radius,
                fill,
            } => {
                canvas.fill_shape(&Circle::new(*center, *radius), &Paint::Solid(*fill))?;
            }
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/render/chrome.rs"]
mod tests;
