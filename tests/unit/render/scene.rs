use std::sync::Arc;

use super::*;
use crate::assets::bitmap::Bitmap;
use crate::frame::layout::CornerRadii;
use crate::scene::color::Color;
use crate::scene::model::{Background, ShadowSpec, Styling};

fn red_scene(w: u32, h: u32) -> SceneDescription {
    SceneDescription {
        background: Background::Solid {
            color: Color::BLACK,
        },
        frame: FrameKind::Browser,
        shadow: ShadowSpec::none(),
        target: crate::foundation::core::TargetDimensions::new(800.0, 600.0),
        ..SceneDescription::default()
    }
    .with_source_image(Arc::new(Bitmap::solid(w, h, [255, 0, 0, 255]).unwrap()))
}

#[test]
fn browser_plan_centres_frame_and_content() {
    let plan = plan_scene(&red_scene(400, 300)).unwrap();
    assert_eq!(plan.frame.outer, Rect::new(200.0, 130.0, 600.0, 470.0));
    assert_eq!(plan.frame.content, Rect::new(200.0, 170.0, 600.0, 470.0));
    assert_eq!(plan.image_rect, plan.frame.content);
    assert_eq!(plan.placement.clip_radii(), CornerRadii::uniform(12.0));
    assert_eq!(plan.frame.title_bar_height, 40.0);
}

#[test]
fn oversized_image_is_fitted_inside_padding() {
    let plan = plan_scene(&red_scene(1600, 600)).unwrap();
    // Available: 800 - 128 wide, 600 - 128 - 40 tall; width is the binding edge.
    let content = plan.frame.content;
    assert!((content.width() - 672.0).abs() < 1e-9);
    assert!((content.height() - 252.0).abs() < 1e-9);
    assert!(plan.frame.outer.x0 >= 64.0 - 1e-9);
    assert!(plan.frame.outer.x1 <= 736.0 + 1e-9);
}

#[test]
fn unframed_shadow_uses_border_radius() {
    let mut scene = red_scene(100, 100);
    scene.frame = FrameKind::None;
    scene.styling = Styling {
        border_radius: 20.0,
        ..Styling::default()
    };
    let plan = plan_scene(&scene).unwrap();
    assert_eq!(plan.shadow_top_radius, 20.0);
    assert_eq!(plan.shadow_bottom_radius, 20.0);
    assert_eq!(plan.frame.outer, plan.frame.content);
}

#[test]
fn device_frame_raises_clip_to_screen_radius() {
    let mut scene = red_scene(200, 400);
    scene.frame = FrameKind::Iphone;
    let plan = plan_scene(&scene).unwrap();
    assert_eq!(plan.placement.clip_radii(), CornerRadii::uniform(38.0));
}

#[test]
fn title_bar_frame_rounds_bottom_of_square_clip() {
    for (kind, r) in [
        (FrameKind::Browser, 10.0),
        (FrameKind::Macos, 10.0),
        (FrameKind::Windows, 8.0),
    ] {
        let mut scene = red_scene(300, 200);
        scene.frame = kind;
        scene.styling = Styling {
            border_radius: 0.0,
            ..Styling::default()
        };
        let plan = plan_scene(&scene).unwrap();
        assert_eq!(
            plan.placement.clip_radii(),
            CornerRadii::top_bottom(0.0, r),
            "{kind}"
        );
        assert_eq!(plan.frame.content.y1, plan.frame.outer.y1, "{kind}");
    }
}

#[test]
fn render_paints_example_browser_scene() {
    let mut renderer = Renderer::default();
    let mut canvas = Canvas::new(1, 1).unwrap();
    let report = renderer
        .render_canvas(&red_scene(400, 300), &mut canvas, RenderPurpose::Export)
        .unwrap();
    assert_eq!((report.width, report.height), (800, 600));
    assert_eq!((canvas.width(), canvas.height()), (800, 600));

    // Padding stays black.
    assert_eq!(canvas.pixel(10, 10), Some([0, 0, 0, 255]));
    assert_eq!(canvas.pixel(400, 590), Some([0, 0, 0, 255]));
    // Screenshot fills the content area.
    assert_eq!(canvas.pixel(400, 320), Some([255, 0, 0, 255]));
    // First traffic light sits in the title bar.
    assert_eq!(canvas.pixel(220, 150), Some([0xff, 0x5f, 0x57, 0xff]));
    // Rounded image corner is clipped away.
    assert_ne!(canvas.pixel(599, 469), Some([255, 0, 0, 255]));
    assert_eq!(canvas.save_depth(), 0);
}

#[test]
fn export_scale_sizes_canvas_by_truncation() {
    let mut scene = red_scene(40, 30);
    scene.target = crate::foundation::core::TargetDimensions::new(100.5, 50.0);
    scene.export_scale = 1.5;
    let mut canvas = Canvas::new(1, 1).unwrap();
    let report = Renderer::default()
        .render_canvas(&scene, &mut canvas, RenderPurpose::Preview)
        .unwrap();
    assert_eq!((report.width, report.height), (150, 75));
}

#[test]
fn missing_source_fails_before_painting() {
    let mut scene = red_scene(10, 10);
    scene.source_image = None;
    let mut canvas = Canvas::new(4, 4).unwrap();
    let err = Renderer::default()
        .render_canvas(&scene, &mut canvas, RenderPurpose::Export)
        .unwrap_err();
    assert!(err.to_string().contains("source image"));
    assert_eq!((canvas.width(), canvas.height()), (4, 4));
    assert!(canvas.data().iter().all(|&b| b == 0));
}

#[test]
fn non_finite_target_is_rejected() {
    let mut scene = red_scene(10, 10);
    scene.target = crate::foundation::core::TargetDimensions::new(f64::NAN, 10.0);
    assert!(plan_scene(&scene).is_err());
    let mut canvas = Canvas::new(4, 4).unwrap();
    assert!(
        Renderer::default()
            .render_canvas(&scene, &mut canvas, RenderPurpose::Export)
            .is_err()
    );
}

#[test]
fn padding_larger_than_target_renders_background_only() {
    let mut scene = red_scene(10, 10);
    scene.target = crate::foundation::core::TargetDimensions::new(50.0, 50.0);
    scene.styling.padding = 40.0;
    let plan = plan_scene(&scene).unwrap();
    assert!(plan.frame.is_degenerate());

    let mut canvas = Canvas::new(1, 1).unwrap();
    Renderer::default()
        .render_canvas(&scene, &mut canvas, RenderPurpose::Export)
        .unwrap();
    assert!(
        canvas
            .data()
            .chunks_exact(4)
            .all(|px| px == [0, 0, 0, 255])
    );
}
