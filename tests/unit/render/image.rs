use super::*;

fn red(w: u32, h: u32) -> Bitmap {
    Bitmap::solid(w, h, [255, 0, 0, 255]).unwrap()
}

#[test]
fn draw_rect_fits_down_never_up() {
    let content = Rect::new(0.0, 0.0, 100.0, 100.0);
    assert_eq!(
        image_draw_rect(50.0, 20.0, content, 1.0),
        Rect::new(25.0, 40.0, 75.0, 60.0)
    );
    assert_eq!(
        image_draw_rect(200.0, 100.0, content, 1.0),
        Rect::new(0.0, 25.0, 100.0, 75.0)
    );
    assert_eq!(
        image_draw_rect(200.0, 100.0, content, 0.5),
        Rect::new(25.0, 37.5, 75.0, 62.5)
    );
    assert_eq!(image_draw_rect(0.0, 10.0, content, 1.0), Rect::ZERO);
}

#[test]
fn clip_radii_clamp_and_respect_per_corner_minimum() {
    let p = ImagePlacement {
        border_radius: 80.0,
        ..ImagePlacement::default()
    };
    assert_eq!(p.clip_radii(), CornerRadii::uniform(50.0));
    let p = ImagePlacement {
        border_radius: 4.0,
        min_radii: CornerRadii::top_bottom(0.0, 10.0),
        ..ImagePlacement::default()
    };
    assert_eq!(p.clip_radii(), CornerRadii::top_bottom(4.0, 10.0));
    let p = ImagePlacement {
        border_radius: f64::NAN,
        min_radii: CornerRadii::uniform(38.0),
        ..ImagePlacement::default()
    };
    assert_eq!(p.clamped_border_radius(), 0.0);
    assert_eq!(p.clip_radii(), CornerRadii::uniform(38.0));
}

#[test]
fn bottom_only_minimum_rounds_bottom_corners() {
    let mut c = Canvas::new(40, 40).unwrap();
    let content = Rect::new(0.0, 0.0, 40.0, 40.0);
    let placement = ImagePlacement {
        min_radii: CornerRadii::top_bottom(0.0, 10.0),
        ..ImagePlacement::default()
    };
    composite_image(&mut c, &red(40, 40), content, &placement).unwrap();
    c.flush().unwrap();
    assert_eq!(c.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(c.pixel(39, 0), Some([255, 0, 0, 255]));
    assert_eq!(c.pixel(0, 39), Some([0, 0, 0, 0]));
    assert_eq!(c.pixel(39, 39), Some([0, 0, 0, 0]));
}

#[test]
fn image_is_centred_in_content() {
    let mut c = Canvas::new(40, 40).unwrap();
    let content = Rect::new(0.0, 0.0, 40.0, 40.0);
    composite_image(&mut c, &red(10, 10), content, &ImagePlacement::default()).unwrap();
    c.flush().unwrap();
    assert_eq!(c.pixel(20, 20), Some([255, 0, 0, 255]));
    assert_eq!(c.pixel(10, 20), Some([0, 0, 0, 0]));
}

#[test]
fn zoomed_image_is_clipped_to_content() {
    let mut c = Canvas::new(40, 40).unwrap();
    let content = Rect::new(10.0, 10.0, 30.0, 30.0);
    let placement = ImagePlacement {
        scale: 2.0,
        ..ImagePlacement::default()
    };
    composite_image(&mut c, &red(20, 20), content, &placement).unwrap();
    c.flush().unwrap();
    assert_eq!(c.pixel(20, 20), Some([255, 0, 0, 255]));
    assert_eq!(c.pixel(5, 20), Some([0, 0, 0, 0]));
    assert_eq!(c.pixel(35, 35), Some([0, 0, 0, 0]));
}

#[test]
fn rounded_clip_leaves_corners_empty() {
    let mut c = Canvas::new(40, 40).unwrap();
    let content = Rect::new(0.0, 0.0, 40.0, 40.0);
    let placement = ImagePlacement {
        border_radius: 12.0,
        ..ImagePlacement::default()
    };
    composite_image(&mut c, &red(40, 40), content, &placement).unwrap();
    c.flush().unwrap();
    assert_eq!(c.pixel(0, 0), Some([0, 0, 0, 0]));
    assert_eq!(c.pixel(20, 1), Some([255, 0, 0, 255]));
}

#[test]
fn rotation_does_not_leak() {
    let mut c = Canvas::new(40, 40).unwrap();
    let placement = ImagePlacement {
        rotation_deg: 30.0,
        ..ImagePlacement::default()
    };
    composite_image(&mut c, &red(10, 10), Rect::new(0.0, 0.0, 40.0, 40.0), &placement).unwrap();
    assert_eq!(c.transform(), crate::foundation::core::Affine::IDENTITY);
    assert_eq!(c.save_depth(), 0);
}

#[test]
fn empty_inputs_paint_nothing() {
    let mut c = Canvas::new(10, 10).unwrap();
    composite_image(&mut c, &red(4, 4), Rect::ZERO, &ImagePlacement::default()).unwrap();
    let empty = Bitmap::from_rgba8(0, 0, Vec::new()).unwrap();
    composite_image(
        &mut c,
        &empty,
        Rect::new(0.0, 0.0, 10.0, 10.0),
        &ImagePlacement::default(),
    )
    .unwrap();
    c.flush().unwrap();
    assert!(c.data().iter().all(|&b| b == 0));
}
