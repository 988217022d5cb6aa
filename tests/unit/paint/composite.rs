use super::*;

#[test]
fn over_opacity_0_is_noop() {
    let dst = [1, 2, 3, 4];
    let src = [200, 200, 200, 200];
    assert_eq!(over(dst, src, 0.0), dst);
}

#[test]
fn over_src_alpha_0_is_noop() {
    let dst = [10, 20, 30, 40];
    let src = [255, 255, 255, 0];
    assert_eq!(over(dst, src, 1.0), dst);
}

#[test]
fn over_src_opaque_replaces_dst() {
    let dst = [0, 0, 0, 255];
    let src = [255, 0, 0, 255];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn over_dst_transparent_returns_scaled_src() {
    let dst = [0, 0, 0, 0];
    let src = [100, 110, 120, 200];
    assert_eq!(over(dst, src, 1.0), src);
}

#[test]
fn screen_over_opaque_black_is_source() {
    let mut dst = vec![0, 0, 0, 255];
    composite_in_place(&mut dst, &[200, 100, 50, 255], 1.0, BlendMode::Screen).unwrap();
    assert_eq!(dst, vec![200, 100, 50, 255]);
}

#[test]
fn screen_brightens_opaque_backdrop() {
    let mut dst = vec![128, 128, 128, 255];
    composite_in_place(&mut dst, &[128, 128, 128, 255], 1.0, BlendMode::Screen).unwrap();
    // 0.502 + 0.502 - 0.252 ~= 0.752
    assert!(dst[0] >= 191 && dst[0] <= 193);
    assert_eq!(dst[3], 255);
}

#[test]
fn composite_rejects_mismatched_lengths() {
    let mut dst = vec![0u8; 8];
    assert!(composite_in_place(&mut dst, &[0u8; 4], 1.0, BlendMode::Normal).is_err());
}

#[test]
fn over_at_offset_clips_to_destination() {
    let mut dst = vec![0u8; 2 * 2 * 4];
    let src = [255u8, 0, 0, 255].repeat(4);
    over_at_offset(&mut dst, 2, 2, &src, 2, 2, 1, 1, 1.0).unwrap();
    assert_eq!(&dst[0..4], &[0, 0, 0, 0]);
    assert_eq!(&dst[12..16], &[255, 0, 0, 255]);

    let mut dst = vec![0u8; 2 * 2 * 4];
    over_at_offset(&mut dst, 2, 2, &src, 2, 2, -5, 0, 1.0).unwrap();
    assert!(dst.iter().all(|&b| b == 0));
}
