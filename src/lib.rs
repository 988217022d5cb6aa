//! Shotframe is a screenshot compositing engine.
//!
//! It turns a declarative [`SceneDescription`] (screenshot, background, frame skin, shadow, text
//! and target size) into pixels on a CPU [`Canvas`]:
//!
//! - Describe the scene in Rust or load it from JSON
//! - Paint it with a [`Renderer`] at any export scale
//! - Encode the canvas with [`export::encode`] or do both with [`export_scene`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod foundation;

/// Encoding adapters (PNG/JPEG/WebP blobs, data URLs, clipboard items).
pub mod export;
pub(crate) mod frame;
pub(crate) mod paint;
pub(crate) mod render;
pub(crate) mod scene;

pub use crate::assets::bitmap::Bitmap;
pub use crate::foundation::core::{
    Affine, BezPath, Insets, MAX_CANVAS_EDGE, MAX_EXPORT_SCALE, Point, Rect, Rgba8Premul, Size,
    TargetDimensions, Vec2, validate_export_scale,
};
pub use crate::foundation::error::{ShotframeError, ShotframeResult};

pub use crate::export::{
    Blob, ClipboardItem, ExportOptions, ImageFormat, clipboard_item, encode, export_scene,
    to_data_url,
};
pub use crate::frame::layout::{
    ChromeCommand, CornerRadii, FrameKind, FrameLayout, FrameProfile, compute_frame_layout,
};
pub use crate::paint::canvas::{Canvas, GradientStop, Paint, ShadowStyle};
pub use crate::paint::composite::BlendMode;
pub use crate::paint::pool::{CanvasPool, CanvasPoolOpts, CanvasPoolStats};
pub use crate::render::background::{
    CHECKER_TILE, cover_rect, default_mesh_base, gradient_line, paint_background,
};
pub use crate::render::chrome::paint_chrome;
pub use crate::render::image::{ImagePlacement, composite_image, image_draw_rect};
pub use crate::render::mesh::{MeshBlob, MeshGradient, parse_mesh_descriptor};
pub use crate::render::scene::{RenderReport, Renderer, RendererOpts, ScenePlan, plan_scene};
pub use crate::render::shadow::draw_shadow;
pub use crate::render::text::{
    FontBook, TextEngine, paint_text_overlays, paint_text_pattern, pattern_tile_origins,
};
pub use crate::scene::color::Color;
pub use crate::scene::model::{
    Background, RenderPurpose, SceneDescription, ShadowSpec, Styling, TextOverlay, TextPattern,
};
