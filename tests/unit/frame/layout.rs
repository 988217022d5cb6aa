use super::*;

fn circles(layout: &FrameLayout) -> Vec<(Point, f64)> {
    layout
        .commands
        .iter()
        .filter_map(|c| match c {
            ChromeCommand::Circle { center, radius, .. } => Some((*center, *radius)),
            _ => None,
        })
        .collect()
}

#[test]
fn none_is_identity() {
    let l = compute_frame_layout(FrameKind::None, 400.0, 300.0);
    assert_eq!(l.outer, Rect::new(0.0, 0.0, 400.0, 300.0));
    assert_eq!(l.content, l.outer);
    assert_eq!(l.title_bar_height, 0.0);
    assert!(l.commands.is_empty());
    assert!(l.overlays.is_empty());
}

#[test]
fn browser_adds_forty_pixel_title_bar_and_three_dots() {
    let l = compute_frame_layout(FrameKind::Browser, 400.0, 300.0);
    assert_eq!(l.title_bar_height, 40.0);
    assert_eq!(l.outer, Rect::new(0.0, 0.0, 400.0, 340.0));
    assert_eq!(l.content, Rect::new(0.0, 40.0, 400.0, 340.0));

    let dots = circles(&l);
    assert_eq!(dots.len(), 3);
    let xs: Vec<f64> = dots.iter().map(|(c, _)| c.x).collect();
    assert_eq!(xs, vec![20.0, 40.0, 60.0]);
    assert!(dots.iter().all(|(c, r)| c.y == 20.0 && *r == 6.0));

    // Body, title bar, separator, URL bar.
    assert_eq!(l.commands.len(), 3 + 3 + 1);
}

#[test]
fn narrow_browser_omits_url_bar() {
    let l = compute_frame_layout(FrameKind::Browser, 120.0, 80.0);
    let rects = l
        .commands
        .iter()
        .filter(|c| matches!(c, ChromeCommand::RoundedRect { .. }))
        .count();
    assert_eq!(rects, 3);
}

#[test]
fn windows_controls_are_right_anchored() {
    let l = compute_frame_layout(FrameKind::Windows, 500.0, 200.0);
    let xs: Vec<f64> = circles(&l).iter().map(|(c, _)| c.x).collect();
    assert_eq!(xs, vec![480.0, 456.0, 432.0]);
    assert_eq!(l.corner_radius, 8.0);
}

#[test]
fn macos_controls_are_left_anchored() {
    let l = compute_frame_layout(FrameKind::Macos, 500.0, 200.0);
    let dots = circles(&l);
    assert_eq!(dots[0].0, Point::new(18.0, 16.0));
    assert_eq!(l.content.y0, 32.0);
}

#[test]
fn iphone_wraps_content_in_bezel() {
    let l = compute_frame_layout(FrameKind::Iphone, 300.0, 600.0);
    assert_eq!(l.outer, Rect::new(0.0, 0.0, 324.0, 624.0));
    assert_eq!(l.content, Rect::new(12.0, 12.0, 312.0, 612.0));
    assert_eq!(l.corner_radius, 48.0);
    assert_eq!(l.screen_radius, 38.0);
    assert_eq!(l.overlays.len(), 1);
    let island = l.overlays[0].bounds();
    assert!((island.width() - 96.0).abs() < 1e-9);
    assert!((island.center().x - 162.0).abs() < 1e-9);
}

#[test]
fn iphone_island_shrinks_for_narrow_content() {
    let l = compute_frame_layout(FrameKind::Iphone, 100.0, 200.0);
    assert!(l.overlays[0].bounds().width() <= 50.0);
}

#[test]
fn android_has_camera_dot() {
    let l = compute_frame_layout(FrameKind::Android, 200.0, 400.0);
    assert_eq!(l.content, Rect::new(10.0, 10.0, 210.0, 410.0));
    match &l.overlays[0] {
        ChromeCommand::Circle { center, radius, .. } => {
            assert_eq!(*center, Point::new(110.0, 26.0));
            assert_eq!(*radius, 6.0);
        }
        other => panic!("unexpected overlay {other:?}"),
    }
}

#[test]
fn degenerate_input_has_no_commands() {
    for kind in FrameKind::ALL {
        for (w, h) in [(0.0, 10.0), (10.0, -1.0), (f64::NAN, 10.0), (10.0, f64::INFINITY)] {
            let l = compute_frame_layout(kind, w, h);
            assert!(l.commands.is_empty());
            assert!(l.overlays.is_empty());
            assert!(l.is_degenerate());
            assert_eq!(l.content, Rect::ZERO);
        }
    }
}

#[test]
fn chrome_stays_inside_outer_rect() {
    for kind in FrameKind::ALL {
        let l = compute_frame_layout(kind, 320.0, 240.0);
        for cmd in l.commands.iter().chain(l.overlays.iter()) {
            let b = cmd.bounds();
            assert_eq!(l.outer.union(b), l.outer, "{kind}: {b:?}");
        }
        assert_eq!(l.outer.union(l.content), l.outer);
    }
}

#[test]
fn translate_moves_everything() {
    let l = compute_frame_layout(FrameKind::Browser, 200.0, 100.0);
    let moved = l.clone().translate(Vec2::new(10.0, 5.0));
    assert_eq!(moved.outer, l.outer + Vec2::new(10.0, 5.0));
    assert_eq!(moved.content, l.content + Vec2::new(10.0, 5.0));
    assert_eq!(
        circles(&moved)[0].0,
        circles(&l)[0].0 + Vec2::new(10.0, 5.0)
    );
}

#[test]
fn unknown_and_social_names_decode_to_none() {
    for name in ["instagram", "facebook", "twitter", "gameboy", ""] {
        let k: FrameKind = serde_json::from_value(serde_json::json!(name)).unwrap();
        assert_eq!(k, FrameKind::None);
    }
    let k: FrameKind = serde_json::from_value(serde_json::json!("MacOS")).unwrap();
    assert_eq!(k, FrameKind::Macos);
    assert_eq!(serde_json::to_value(FrameKind::Iphone).unwrap(), "iphone");
}
