use ::half::f16;

/// Largest finite binary16 value (65504.0).
pub const F16_MAX_BITS: u16 = 0x7BFF;
/// Positive infinity in binary16.
pub const F16_INFINITY_BITS: u16 = 0x7C00;

/// Convert to binary16 bits with round-to-nearest-even.
///
/// Finite inputs beyond the half range clamp to the largest finite half of the same sign instead
/// of becoming infinity. Infinities and NaNs carry over.
#[inline]
pub fn f32_to_f16_bits(v: f32) -> u16 {
    let h = f16::from_f32(v);
    if h.is_infinite() && v.is_finite() {
        return if v.is_sign_negative() {
            f16::MIN.to_bits()
        } else {
            f16::MAX.to_bits()
        };
    }
    h.to_bits()
}

#[inline]
pub fn f16_bits_to_f32(bits: u16) -> f32 {
    f16::from_bits(bits).to_f32()
}

#[cfg(test)]
#[path = "../../tests/unit/convert/half.rs"]
mod tests;
