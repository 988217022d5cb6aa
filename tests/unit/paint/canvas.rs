use super::*;

fn red() -> Paint {
    Paint::Solid(Color::rgb8(255, 0, 0))
}

#[test]
fn new_canvas_is_transparent() {
    let c = Canvas::new(4, 3).unwrap();
    assert_eq!(c.width(), 4);
    assert_eq!(c.height(), 3);
    assert!(c.data().iter().all(|&b| b == 0));
    assert_eq!(c.pixel(4, 0), None);
}

#[test]
fn fill_is_committed_on_flush() {
    let mut c = Canvas::new(8, 8).unwrap();
    c.fill_rect(Rect::new(0.0, 0.0, 8.0, 8.0), &red()).unwrap();
    assert_eq!(c.pixel(4, 4), Some([0, 0, 0, 0]));
    c.flush().unwrap();
    assert_eq!(c.pixel(4, 4), Some([255, 0, 0, 255]));
}

#[test]
fn transform_maps_logical_to_device() {
    let mut c = Canvas::new(16, 16).unwrap();
    c.scale(2.0, 2.0);
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &red()).unwrap();
    c.flush().unwrap();
    assert_eq!(c.pixel(6, 6), Some([255, 0, 0, 255]));
    assert_eq!(c.pixel(10, 10), Some([0, 0, 0, 0]));
}

#[test]
fn clip_limits_fill() {
    let mut c = Canvas::new(10, 10).unwrap();
    c.clip(&Rect::new(0.0, 0.0, 5.0, 10.0).to_path(PATH_TOLERANCE));
    c.fill_rect(Rect::new(0.0, 0.0, 10.0, 10.0), &red()).unwrap();
    c.flush().unwrap();
    assert_eq!(c.pixel(2, 5), Some([255, 0, 0, 255]));
    assert_eq!(c.pixel(7, 5), Some([0, 0, 0, 0]));
}

#[test]
fn with_saved_restores_state_on_error() {
    let mut c = Canvas::new(4, 4).unwrap();
    let before = c.transform();
    let res: ShotframeResult<()> = c.with_saved(|c| {
        c.translate(3.0, 3.0);
        c.set_global_alpha(0.25);
        c.save();
        Err(ShotframeError::render("boom"))
    });
    assert!(res.is_err());
    assert_eq!(c.transform(), before);
    assert_eq!(c.global_alpha(), 1.0);
    assert_eq!(c.save_depth(), 0);
}

#[test]
fn restore_without_save_is_ignored() {
    let mut c = Canvas::new(2, 2).unwrap();
    c.translate(1.0, 0.0);
    c.restore();
    assert_eq!(c.transform(), Affine::translate((1.0, 0.0)));
}

#[test]
fn global_alpha_scales_coverage() {
    let mut c = Canvas::new(4, 4).unwrap();
    c.set_global_alpha(0.5);
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &Paint::Solid(Color::WHITE))
        .unwrap();
    c.flush().unwrap();
    let [_, _, _, a] = c.pixel(2, 2).unwrap();
    assert!((126..=129).contains(&a), "alpha {a}");
}

#[test]
fn zero_alpha_draw_is_skipped() {
    let mut c = Canvas::new(4, 4).unwrap();
    c.set_global_alpha(0.0);
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &red()).unwrap();
    c.flush().unwrap();
    assert!(c.data().iter().all(|&b| b == 0));
}

#[test]
fn shadow_paints_below_the_shape() {
    let mut c = Canvas::new(40, 40).unwrap();
    c.set_shadow(Some(ShadowStyle {
        blur: 4.0,
        offset: Vec2::new(0.0, 8.0),
        color: Color::BLACK,
    }));
    c.fill_rect(Rect::new(10.0, 5.0, 30.0, 20.0), &red()).unwrap();
    c.flush().unwrap();

    assert_eq!(c.pixel(20, 10), Some([255, 0, 0, 255]));
    // Offset copy shows beneath the shape, nothing shows far to the side.
    let [_, _, _, below] = c.pixel(20, 25).unwrap();
    assert!(below > 0);
    assert_eq!(c.pixel(0, 10), Some([0, 0, 0, 0]));
}

#[test]
fn transparent_shadow_colour_paints_only_the_shape() {
    let mut plain = Canvas::new(20, 20).unwrap();
    plain
        .fill_rect(Rect::new(5.0, 5.0, 15.0, 15.0), &red())
        .unwrap();
    plain.flush().unwrap();

    let mut shadowed = Canvas::new(20, 20).unwrap();
    shadowed.set_shadow(Some(ShadowStyle {
        blur: 6.0,
        offset: Vec2::new(0.0, 3.0),
        color: Color::TRANSPARENT,
    }));
    shadowed
        .fill_rect(Rect::new(5.0, 5.0, 15.0, 15.0), &red())
        .unwrap();
    shadowed.flush().unwrap();

    assert_eq!(plain.data(), shadowed.data());
}

#[test]
fn screen_blend_brightens_backdrop() {
    let mut c = Canvas::new(4, 4).unwrap();
    c.fill_rect(
        Rect::new(0.0, 0.0, 4.0, 4.0),
        &Paint::Solid(Color::rgb8(128, 0, 0)),
    )
    .unwrap();
    c.set_blend_mode(BlendMode::Screen);
    c.fill_rect(
        Rect::new(0.0, 0.0, 4.0, 4.0),
        &Paint::Solid(Color::rgb8(128, 0, 0)),
    )
    .unwrap();
    c.flush().unwrap();
    let [r, g, _, a] = c.pixel(1, 1).unwrap();
    assert!((190..=194).contains(&r), "red {r}");
    assert_eq!(g, 0);
    assert_eq!(a, 255);
}

#[test]
fn draw_image_stretches_into_destination() {
    let bmp = Bitmap::solid(2, 2, [0, 0, 255, 255]).unwrap();
    let mut c = Canvas::new(10, 10).unwrap();
    c.draw_image(&bmp, Rect::new(2.0, 2.0, 8.0, 8.0)).unwrap();
    c.flush().unwrap();
    assert_eq!(c.pixel(5, 5), Some([0, 0, 255, 255]));
    assert_eq!(c.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(c.pixel(9, 9), Some([0, 0, 0, 0]));
}

#[test]
fn zero_sized_canvas_accepts_draws() {
    let mut c = Canvas::new(0, 0).unwrap();
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &red()).unwrap();
    c.flush().unwrap();
    assert!(c.data().is_empty());
}

#[test]
fn resize_clears_pixels_and_state() {
    let mut c = Canvas::new(4, 4).unwrap();
    c.fill_rect(Rect::new(0.0, 0.0, 4.0, 4.0), &red()).unwrap();
    c.flush().unwrap();
    c.translate(5.0, 5.0);
    c.save();

    c.resize(4, 4).unwrap();
    assert!(c.data().iter().all(|&b| b == 0));
    assert_eq!(c.transform(), Affine::IDENTITY);
    assert_eq!(c.save_depth(), 0);

    c.resize(6, 2).unwrap();
    assert_eq!(c.data().len(), 6 * 2 * 4);
}

#[test]
fn resize_rejects_oversized_edges() {
    let mut c = Canvas::new(1, 1).unwrap();
    assert!(c.resize(MAX_CANVAS_EDGE + 1, 1).is_err());
}

#[test]
fn linear_gradient_runs_between_endpoints() {
    let mut c = Canvas::new(100, 2).unwrap();
    let paint = Paint::LinearGradient {
        start: Point::new(0.0, 0.0),
        end: Point::new(100.0, 0.0),
        stops: vec![
            GradientStop::new(0.0, Color::BLACK),
            GradientStop::new(1.0, Color::WHITE),
        ],
    };
    c.fill_rect(Rect::new(0.0, 0.0, 100.0, 2.0), &paint).unwrap();
    c.flush().unwrap();
    let [left, ..] = c.pixel(2, 0).unwrap();
    let [right, ..] = c.pixel(97, 0).unwrap();
    assert!(left < 30, "left {left}");
    assert!(right > 225, "right {right}");
}

#[test]
fn to_rgba8_unpremultiplies() {
    let mut c = Canvas::new(2, 2).unwrap();
    c.set_global_alpha(0.5);
    c.fill_rect(Rect::new(0.0, 0.0, 2.0, 2.0), &red()).unwrap();
    let out = c.to_rgba8().unwrap();
    assert!(out[0] >= 253);
    assert!((126..=129).contains(&out[3]));
}

#[test]
fn coverage_bounds_finds_opaque_box() {
    let mut layer = vec![0u8; 5 * 4 * 4];
    for (x, y) in [(1usize, 1usize), (3, 2)] {
        layer[(y * 5 + x) * 4 + 3] = 255;
    }
    assert_eq!(coverage_bounds(&layer, 5, 4), Some((1, 1, 3, 2)));
    assert_eq!(coverage_bounds(&[0u8; 16], 2, 2), None);
}
