//! sRGB transfer curve, extended to negative and above-one values so HDR float content survives.

/// Linear light to sRGB-encoded value.
#[inline]
pub fn srgb_encode(linear: f32) -> f32 {
    if linear.is_nan() {
        return linear;
    }
    let mag = linear.abs();
    let enc = if mag <= 0.003_130_8 {
        mag * 12.92
    } else {
        1.055 * mag.powf(1.0 / 2.4) - 0.055
    };
    enc.copysign(linear)
}

/// sRGB-encoded value to linear light.
#[inline]
pub fn srgb_decode(encoded: f32) -> f32 {
    if encoded.is_nan() {
        return encoded;
    }
    let mag = encoded.abs();
    let lin = if mag <= 0.040_45 {
        mag / 12.92
    } else {
        ((mag + 0.055) / 1.055).powf(2.4)
    };
    lin.copysign(encoded)
}
