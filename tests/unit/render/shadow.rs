use super::*;
use crate::scene::color::Color;

fn backdrop() -> Canvas {
    let mut c = Canvas::new(60, 60).unwrap();
    c.fill_rect(
        Rect::new(0.0, 0.0, 60.0, 60.0),
        &Paint::Solid(Color::rgb8(200, 200, 200)),
    )
    .unwrap();
    c.flush().unwrap();
    c
}

#[test]
fn zero_blur_is_a_noop() {
    let mut c = backdrop();
    let before = c.data().to_vec();
    let spec = ShadowSpec {
        blur: 0.0,
        opacity: 50.0,
        color: Color::BLACK,
    };
    draw_shadow(&mut c, Rect::new(10.0, 10.0, 50.0, 40.0), 8.0, 8.0, &spec).unwrap();
    c.flush().unwrap();
    assert_eq!(c.data(), before.as_slice());
}

#[test]
fn zero_opacity_is_a_noop() {
    let mut c = backdrop();
    let before = c.data().to_vec();
    let spec = ShadowSpec {
        blur: 12.0,
        opacity: 0.0,
        color: Color::BLACK,
    };
    draw_shadow(&mut c, Rect::new(10.0, 10.0, 50.0, 40.0), 8.0, 8.0, &spec).unwrap();
    c.flush().unwrap();
    assert_eq!(c.data(), before.as_slice());
}

#[test]
fn visible_shadow_darkens_below_the_rect() {
    let mut c = backdrop();
    let spec = ShadowSpec {
        blur: 2.0,
        opacity: 80.0,
        color: Color::BLACK,
    };
    draw_shadow(&mut c, Rect::new(10.0, 10.0, 50.0, 40.0), 0.0, 0.0, &spec).unwrap();
    c.flush().unwrap();

    let [inside, ..] = c.pixel(30, 25).unwrap();
    let [below, ..] = c.pixel(30, 43).unwrap();
    let [far, ..] = c.pixel(30, 2).unwrap();
    assert!(inside < 200);
    assert!(below < 200, "below {below}");
    assert_eq!(far, 200);
}

#[test]
fn shadow_settings_do_not_leak() {
    let mut c = backdrop();
    let spec = ShadowSpec::default();
    draw_shadow(&mut c, Rect::new(10.0, 10.0, 50.0, 40.0), 8.0, 0.0, &spec).unwrap();
    assert_eq!(c.global_alpha(), 1.0);
    assert_eq!(c.save_depth(), 0);
}
