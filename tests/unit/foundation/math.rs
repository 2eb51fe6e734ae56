use super::*;

#[test]
fn fnv_is_deterministic_and_input_sensitive() {
    let mut a = Fnv1a64::new_default();
    a.write_u64(7);
    let mut b = Fnv1a64::new_default();
    b.write_u64(7);
    let mut c = Fnv1a64::new_default();
    c.write_u64(8);
    let (a, b, c) = (a.finish(), b.finish(), c.finish());
    assert_eq!(a, b);
    assert_ne!(a, c);
}

#[test]
fn empty_fnv_is_offset_basis() {
    assert_eq!(Fnv1a64::new_default().finish(), Fnv1a64::OFFSET_BASIS);
}

#[test]
fn blend_over_opaque_extremes() {
    assert_eq!(blend_over_opaque(200, 255, 10), 200);
    assert_eq!(blend_over_opaque(200, 0, 10), 10);
    assert_eq!(blend_over_opaque(255, 128, 0), 128);
}

#[test]
fn unit_to_u8_clamps_and_scales() {
    assert_eq!(unit_to_u8(-0.5), 0);
    assert_eq!(unit_to_u8(0.0), 0);
    assert_eq!(unit_to_u8(0.5), 127);
    assert_eq!(unit_to_u8(1.0), 255);
    assert_eq!(unit_to_u8(3.0), 255);
    assert_eq!(unit_to_u8(f32::NAN), 0);
}
