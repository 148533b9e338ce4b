use super::*;

#[test]
fn one_is_0x3c00() {
    assert_eq!(f32_to_f16_bits(1.0), 0x3C00);
    assert_eq!(f32_to_f16_bits(-2.0), 0xC000);
    assert_eq!(f32_to_f16_bits(0.0), 0x0000);
    assert_eq!(f32_to_f16_bits(-0.0), 0x8000);
}

#[test]
fn finite_overflow_clamps_to_max_finite() {
    assert_eq!(f32_to_f16_bits(65504.0), F16_MAX_BITS);
    // 65520 is the exact midpoint to infinity; plain rounding would produce 0x7C00.
    assert_eq!(f32_to_f16_bits(65520.0), 0x7BFF);
    assert_eq!(f32_to_f16_bits(1.0e9), 0x7BFF);
    assert_eq!(f32_to_f16_bits(f32::MAX), 0x7BFF);
    assert_eq!(f32_to_f16_bits(-1.0e9), 0xFBFF);
}

#[test]
fn infinities_and_nan_carry_over() {
    assert_eq!(f32_to_f16_bits(f32::INFINITY), F16_INFINITY_BITS);
    assert_eq!(f32_to_f16_bits(f32::NEG_INFINITY), 0xFC00);
    let nan = f32_to_f16_bits(f32::NAN);
    assert_eq!(nan & 0x7C00, 0x7C00);
    assert_ne!(nan & 0x03FF, 0);
    assert!(f16_bits_to_f32(nan).is_nan());
}

#[test]
fn rounding_is_to_nearest() {
    // 1 + 2^-11 is halfway between 1.0 and the next half; ties go to even (1.0).
    assert_eq!(f32_to_f16_bits(1.0 + 2f32.powi(-11)), 0x3C00);
    // Slightly above the tie rounds up.
    assert_eq!(f32_to_f16_bits(1.0 + 2f32.powi(-11) + 2f32.powi(-20)), 0x3C01);
    // Smallest subnormal half.
    assert_eq!(f32_to_f16_bits(2f32.powi(-24)), 0x0001);
}

#[test]
fn channels_are_converted_independently() {
    let bits = [0.5, 70000.0, f32::INFINITY, 1.0].map(f32_to_f16_bits);
    assert_eq!(bits, [0x3800, 0x7BFF, 0x7C00, 0x3C00]);
    assert_eq!(f16_bits_to_f32(0x3800), 0.5);
}
