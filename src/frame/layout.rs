use serde::{Deserialize, Serialize};

use crate::foundation::core::{Insets, Point, Rect, Vec2};
use crate::scene::color::Color;

/// Device or browser skin drawn around the screenshot.
///
/// Decodes from a lowercase name. Unknown names, including the reserved social-frame names
/// (`instagram`, `facebook`, `twitter`), decode to [`FrameKind::None`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FrameKind {
    /// No chrome; the content rect is the whole frame.
    #[default]
    None,
    /// Generic browser window with a URL bar.
    Browser,
    /// macOS window with traffic-light controls.
    Macos,
    /// Windows window with right-aligned controls.
    Windows,
    /// iPhone bezel with a dynamic island.
    Iphone,
    /// Android bezel with a camera dot.
    Android,
}

impl FrameKind {
    /// Every supported kind.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::Browser,
        Self::Macos,
        Self::Windows,
        Self::Iphone,
        Self::Android,
    ];

    /// Parse a frame name, case-insensitively. Unknown names map to `None`.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "browser" => Self::Browser,
            "macos" => Self::Macos,
            "windows" => Self::Windows,
            "iphone" => Self::Iphone,
            "android" => Self::Android,
            _ => Self::None,
        }
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Browser => "browser",
            Self::Macos => "macos",
            Self::Windows => "windows",
            Self::Iphone => "iphone",
            Self::Android => "android",
        }
    }

    /// Fixed dimensions of this skin, in logical pixels.
    pub fn profile(self) -> FrameProfile {
        match self {
            Self::None => FrameProfile {
                title_bar_height: 0.0,
                corner_radius: 0.0,
                screen_radius: 0.0,
                content_padding: Insets::default(),
            },
            Self::Browser => FrameProfile {
                title_bar_height: 40.0,
                corner_radius: 10.0,
                screen_radius: 0.0,
                content_padding: Insets::top(40.0),
            },
            Self::Macos => FrameProfile {
                title_bar_height: 32.0,
                corner_radius: 10.0,
                screen_radius: 0.0,
                content_padding: Insets::top(32.0),
            },
            Self::Windows => FrameProfile {
                title_bar_height: 32.0,
                corner_radius: 8.0,
                screen_radius: 0.0,
                content_padding: Insets::top(32.0),
            },
            Self::Iphone => FrameProfile {
                title_bar_height: 0.0,
                corner_radius: 48.0,
                screen_radius: 38.0,
                content_padding: Insets::uniform(12.0),
            },
            Self::Android => FrameProfile {
                title_bar_height: 0.0,
                corner_radius: 36.0,
                screen_radius: 28.0,
                content_padding: Insets::uniform(10.0),
            },
        }
    }

    fn has_title_bar(self) -> bool {
        matches!(self, Self::Browser | Self::Macos | Self::Windows)
    }
}

impl From<String> for FrameKind {
    fn from(s: String) -> Self {
        Self::from_name(&s)
    }
}

impl From<FrameKind> for String {
    fn from(k: FrameKind) -> Self {
        k.as_str().to_owned()
    }
}

impl std::fmt::Display for FrameKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed dimensions of one frame skin.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct FrameProfile {
    /// Height of the title bar above the content (0 for bezels).
    pub title_bar_height: f64,
    /// Radius of the outer frame corners.
    pub corner_radius: f64,
    /// Radius of the inner screen corners (bezels only).
    pub screen_radius: f64,
    /// Space between the frame edge and the content rect.
    pub content_padding: Insets,
}

/// Per-corner radii.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize)]
pub struct CornerRadii {
    /// Top-left radius.
    pub top_left: f64,
    /// Top-right radius.
    pub top_right: f64,
    /// Bottom-right radius.
    pub bottom_right: f64,
    /// Bottom-left radius.
    pub bottom_left: f64,
}

impl CornerRadii {
    /// The same radius on every corner.
    pub const fn uniform(r: f64) -> Self {
        Self {
            top_left: r,
            top_right: r,
            bottom_right: r,
            bottom_left: r,
        }
    }

    /// One radius for both top corners, another for both bottom corners.
    pub const fn top_bottom(top: f64, bottom: f64) -> Self {
        Self {
            top_left: top,
            top_right: top,
            bottom_right: bottom,
            bottom_left: bottom,
        }
    }

    pub(crate) fn to_kurbo(self) -> kurbo::RoundedRectRadii {
        kurbo::RoundedRectRadii::new(
            self.top_left.max(0.0),
            self.top_right.max(0.0),
            self.bottom_right.max(0.0),
            self.bottom_left.max(0.0),
        )
    }
}

/// One vector primitive of the frame chrome, in frame coordinates.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ChromeCommand {
    /// Filled rounded rectangle.
    RoundedRect {
        /// Bounds.
        rect: Rect,
        /// Corner radii.
        radii: CornerRadii,
        /// Fill colour.
        fill: Color,
    },
    /// Filled circle.
    Circle {
        /// Centre.
        center: Point,
        /// Radius.
        radius: f64,
        /// Fill colour.
        fill: Color,
    },
}

impl ChromeCommand {
    /// Bounding box of the primitive.
    pub fn bounds(&self) -> Rect {
        match self {
            Self::RoundedRect { rect, .. } => *rect,
            Self::Circle { center, radius, .. } => Rect::new(
                center.x - radius,
                center.y - radius,
                center.x + radius,
                center.y + radius,
            ),
        }
    }

    fn translate(&mut self, offset: Vec2) {
        match self {
            Self::RoundedRect { rect, .. } => *rect = *rect + offset,
            Self::Circle { center, .. } => *center += offset,
        }
    }
}

/// Frame geometry for a content size: bounds, content rect and the chrome to draw.
///
/// `commands` are painted beneath the screenshot, `overlays` (island, camera) above it.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct FrameLayout {
    /// Frame skin.
    pub kind: FrameKind,
    /// Outer frame bounds.
    pub outer: Rect,
    /// Where the screenshot goes.
    pub content: Rect,
    /// Title bar height (0 for bezels and `none`).
    pub title_bar_height: f64,
    /// Outer corner radius.
    pub corner_radius: f64,
    /// Radius of the top outer corners, used for the drop shadow.
    pub top_radius: f64,
    /// Radius of the bottom outer corners, used for the drop shadow.
    pub bottom_radius: f64,
    /// Minimum radius for the screenshot clip.
    pub screen_radius: f64,
    /// Chrome painted before the screenshot.
    pub commands: Vec<ChromeCommand>,
    /// Chrome painted after the screenshot.
    pub overlays: Vec<ChromeCommand>,
}

impl FrameLayout {
    fn degenerate(kind: FrameKind) -> Self {
        let p = kind.profile();
        Self {
            kind,
            outer: Rect::ZERO,
            content: Rect::ZERO,
            title_bar_height: p.title_bar_height,
            corner_radius: p.corner_radius,
            top_radius: p.corner_radius,
            bottom_radius: p.corner_radius,
            screen_radius: p.screen_radius,
            commands: Vec::new(),
            overlays: Vec::new(),
        }
    }

    /// `true` when the input size had no area.
    pub fn is_degenerate(&self) -> bool {
        self.content.width() <= 0.0 || self.content.height() <= 0.0
    }

    /// Corner radii the screenshot must be clipped to so it stays inside the chrome outline.
    ///
    /// Title-bar frames round only the bottom corners, device bezels round all four to the
    /// screen radius.
    pub fn content_radii(&self) -> CornerRadii {
        if self.kind.has_title_bar() {
            CornerRadii::top_bottom(0.0, self.bottom_radius)
        } else {
            CornerRadii::uniform(self.screen_radius)
        }
    }

    /// Move every coordinate by `offset`.
    pub fn translate(mut self, offset: Vec2) -> Self {
        self.outer = self.outer + offset;
        self.content = self.content + offset;
        for cmd in self.commands.iter_mut().chain(self.overlays.iter_mut()) {
            cmd.translate(offset);
        }
        self
    }
}

const DOT_RADIUS: f64 = 6.0;

/// Lay out `kind` around a content area of `content_width`×`content_height` logical pixels.
///
/// The frame's outer rect starts at the origin. Degenerate sizes produce an empty layout.
pub fn compute_frame_layout(kind: FrameKind, content_width: f64, content_height: f64) -> FrameLayout {
    if !content_width.is_finite()
        || !content_height.is_finite()
        || content_width <= 0.0
        || content_height <= 0.0
    {
        return FrameLayout::degenerate(kind);
    }

    let p = kind.profile();
    let pad = p.content_padding;
    let outer = Rect::new(
        0.0,
        0.0,
        content_width + pad.horizontal(),
        content_height + pad.vertical(),
    );
    let content = Rect::new(
        pad.left,
        pad.top,
        pad.left + content_width,
        pad.top + content_height,
    );

    let mut layout = FrameLayout {
        kind,
        outer,
        content,
        title_bar_height: p.title_bar_height,
        corner_radius: p.corner_radius,
        top_radius: p.corner_radius,
        bottom_radius: p.corner_radius,
        screen_radius: p.screen_radius,
        commands: Vec::new(),
        overlays: Vec::new(),
    };

    match kind {
        FrameKind::None => {}
        k if k.has_title_bar() => window_chrome(&mut layout, k, &p),
        FrameKind::Iphone => {
            device_bezel(&mut layout, &p, Color::rgb8(0x1c, 0x1c, 0x1e));
            let island_w = 96.0_f64.min(content_width / 2.0);
            let island_h = 28.0_f64.min(content_height / 4.0);
            let cx = outer.center().x;
            let top = content.y0 + 10.0_f64.min(content_height / 8.0);
            layout.overlays.push(ChromeCommand::RoundedRect {
                rect: Rect::new(cx - island_w / 2.0, top, cx + island_w / 2.0, top + island_h),
                radii: CornerRadii::uniform(island_h / 2.0),
                fill: Color::BLACK,
            });
        }
        FrameKind::Android => {
            device_bezel(&mut layout, &p, Color::rgb8(0x20, 0x21, 0x24));
            layout.overlays.push(ChromeCommand::Circle {
                center: Point::new(outer.center().x, pad.top + 16.0),
                radius: DOT_RADIUS,
                fill: Color::rgb8(0x0b, 0x0b, 0x0d),
            });
        }
        _ => {}
    }
    layout
}

fn window_chrome(layout: &mut FrameLayout, kind: FrameKind, p: &FrameProfile) {
    let w = layout.outer.width();
    let r = p.corner_radius;
    let title = p.title_bar_height;
    let title_fill = match kind {
        FrameKind::Browser => Color::rgb8(0xe8, 0xea, 0xed),
        FrameKind::Windows => Color::rgb8(0xf3, 0xf3, 0xf3),
        _ => Color::rgb8(0xe5, 0xe5, 0xe5),
    };

    layout.commands.push(ChromeCommand::RoundedRect {
        rect: layout.outer,
        radii: CornerRadii::uniform(r),
        fill: Color::WHITE,
    });
    layout.commands.push(ChromeCommand::RoundedRect {
        rect: Rect::new(0.0, 0.0, w, title),
        radii: CornerRadii::top_bottom(r, 0.0),
        fill: title_fill,
    });
    layout.commands.push(ChromeCommand::RoundedRect {
        rect: Rect::new(0.0, title - 1.0, w, title),
        radii: CornerRadii::default(),
        fill: Color::rgb8(0xd0, 0xd0, 0xd0),
    });

    let dot_y = title / 2.0;
    match kind {
        FrameKind::Windows => {
            let fills = [
                Color::rgb8(0xe8, 0x11, 0x23),
                Color::rgb8(0xc4, 0xc4, 0xc4),
                Color::rgb8(0xc4, 0xc4, 0xc4),
            ];
            for (i, fill) in fills.into_iter().enumerate() {
                layout.commands.push(ChromeCommand::Circle {
                    center: Point::new(w - 20.0 - 24.0 * i as f64, dot_y),
                    radius: DOT_RADIUS,
                    fill,
                });
            }
        }
        _ => {
            let first = if kind == FrameKind::Browser { 20.0 } else { 18.0 };
            let fills = [
                Color::rgb8(0xff, 0x5f, 0x57),
                Color::rgb8(0xfe, 0xbc, 0x2e),
                Color::rgb8(0x28, 0xc8, 0x40),
            ];
            for (i, fill) in fills.into_iter().enumerate() {
                layout.commands.push(ChromeCommand::Circle {
                    center: Point::new(first + 20.0 * i as f64, dot_y),
                    radius: DOT_RADIUS,
                    fill,
                });
            }
        }
    }

    if kind == FrameKind::Browser && w - 20.0 - 80.0 >= 40.0 {
        layout.commands.push(ChromeCommand::RoundedRect {
            rect: Rect::new(80.0, 8.0, w - 20.0, title - 8.0),
            radii: CornerRadii::uniform(6.0),
            fill: Color::WHITE,
        });
    }
}

fn device_bezel(layout: &mut FrameLayout, p: &FrameProfile, bezel: Color) {
    layout.commands.push(ChromeCommand::RoundedRect {
        rect: layout.outer,
        radii: CornerRadii::uniform(p.corner_radius),
        fill: bezel,
    });
    layout.commands.push(ChromeCommand::RoundedRect {
        rect: layout.content,
        radii: CornerRadii::uniform(p.screen_radius),
        fill: Color::BLACK,
    });
}

#[cfg(test)]
#[path = "../../tests/unit/frame/layout.rs"]
mod tests;
