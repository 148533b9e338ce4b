use crate::{
    convert::half::{f16_bits_to_f32, f32_to_f16_bits},
    foundation::core::PremulRgbaF32,
    foundation::error::{BackdropError, BackdropResult},
    surface::format::{OutputFormat, PixelFormat},
};

/// Quantize a unit-range value to 8 bits with round-to-nearest; out-of-range values saturate.
#[inline]
pub fn unit_to_u8(v: f32) -> u8 {
    unit_to_bits(v, 255) as u8
}

#[inline]
pub fn u8_to_unit(v: u8) -> f32 {
    f32::from(v) / 255.0
}

#[inline]
fn unit_to_bits(v: f32, max: u32) -> u32 {
    // NaN falls through clamp and saturates to 0 on the cast.
    (v.clamp(0.0, 1.0) * max as f32).round() as u32
}

#[inline]
pub fn premultiply(px: [f32; 4]) -> PremulRgbaF32 {
    let a = px[3];
    [px[0] * a, px[1] * a, px[2] * a, a]
}

#[inline]
pub fn unpremultiply(px: PremulRgbaF32) -> [f32; 4] {
    let a = px[3];
    if a <= 0.0 {
        return [0.0, 0.0, 0.0, 0.0];
    }
    [px[0] / a, px[1] / a, px[2] / a, a]
}

/// Read one stored texel as unit-range floats, leaving its alpha convention untouched.
#[inline]
pub fn read_texel(format: PixelFormat, bytes: &[u8]) -> [f32; 4] {
    match format {
        PixelFormat::Rgba8 { .. } => [
            u8_to_unit(bytes[0]),
            u8_to_unit(bytes[1]),
            u8_to_unit(bytes[2]),
            u8_to_unit(bytes[3]),
        ],
        PixelFormat::RgbaF32 { .. } => {
            let mut out = [0.0f32; 4];
            for (c, chunk) in out.iter_mut().zip(bytes.chunks_exact(4)) {
                *c = f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]);
            }
            out
        }
        PixelFormat::RgbaF16 { .. } => {
            let mut out = [0.0f32; 4];
            for (c, chunk) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                *c = f16_bits_to_f32(u16::from_le_bytes([chunk[0], chunk[1]]));
            }
            out
        }
    }
}

/// Store one texel in `format`; `out` must hold `format.bytes_per_pixel()` bytes.
#[inline]
pub fn write_texel(format: PixelFormat, px: [f32; 4], out: &mut [u8]) {
    match format {
        PixelFormat::Rgba8 { .. } => {
            for (dst, c) in out.iter_mut().zip(px) {
                *dst = unit_to_u8(c);
            }
        }
        PixelFormat::RgbaF32 { .. } => {
            for (dst, c) in out.chunks_exact_mut(4).zip(px) {
                dst.copy_from_slice(&c.to_le_bytes());
            }
        }
        PixelFormat::RgbaF16 { .. } => {
            for (dst, c) in out.chunks_exact_mut(2).zip(px) {
                dst.copy_from_slice(&f32_to_f16_bits(c).to_le_bytes());
            }
        }
    }
}

fn pack_2101010(px: PremulRgbaF32, opaque: bool) -> u32 {
    let a = if opaque { 3 } else { unit_to_bits(px[3], 3) };
    (a << 30) | (unit_to_bits(px[0], 1023) << 20) | (unit_to_bits(px[1], 1023) << 10)
        | unit_to_bits(px[2], 1023)
}

fn unpack_2101010(word: u32, opaque: bool) -> PremulRgbaF32 {
    let ch = |shift: u32| ((word >> shift) & 0x3FF) as f32 / 1023.0;
    let a = if opaque {
        1.0
    } else {
        ((word >> 30) & 0x3) as f32 / 3.0
    };
    [ch(20), ch(10), ch(0), a]
}

/// Encode one premultiplied working pixel into the output layout.
#[inline]
pub fn encode_pixel(format: OutputFormat, px: PremulRgbaF32, out: &mut [u8]) {
    match format {
        OutputFormat::Argb8888 => {
            out[0] = unit_to_u8(px[2]);
            out[1] = unit_to_u8(px[1]);
            out[2] = unit_to_u8(px[0]);
            out[3] = unit_to_u8(px[3]);
        }
        OutputFormat::Xrgb8888 => {
            out[0] = unit_to_u8(px[2]);
            out[1] = unit_to_u8(px[1]);
            out[2] = unit_to_u8(px[0]);
            out[3] = 0xFF;
        }
        OutputFormat::Abgr8888 => {
            out[0] = unit_to_u8(px[0]);
            out[1] = unit_to_u8(px[1]);
            out[2] = unit_to_u8(px[2]);
            out[3] = unit_to_u8(px[3]);
        }
        OutputFormat::Argb2101010 => {
            out[..4].copy_from_slice(&pack_2101010(px, false).to_le_bytes());
        }
        OutputFormat::Xrgb2101010 => {
            out[..4].copy_from_slice(&pack_2101010(px, true).to_le_bytes());
        }
        OutputFormat::Abgr16161616F => {
            for (dst, c) in out.chunks_exact_mut(2).zip(px) {
                dst.copy_from_slice(&f32_to_f16_bits(c).to_le_bytes());
            }
        }
    }
}

/// Decode one output pixel back to a premultiplied working sample.
#[inline]
pub fn decode_pixel(format: OutputFormat, bytes: &[u8]) -> PremulRgbaF32 {
    match format {
        OutputFormat::Argb8888 => [
            u8_to_unit(bytes[2]),
            u8_to_unit(bytes[1]),
            u8_to_unit(bytes[0]),
            u8_to_unit(bytes[3]),
        ],
        OutputFormat::Xrgb8888 => [
            u8_to_unit(bytes[2]),
            u8_to_unit(bytes[1]),
            u8_to_unit(bytes[0]),
            1.0,
        ],
        OutputFormat::Abgr8888 => [
            u8_to_unit(bytes[0]),
            u8_to_unit(bytes[1]),
            u8_to_unit(bytes[2]),
            u8_to_unit(bytes[3]),
        ],
        OutputFormat::Argb2101010 | OutputFormat::Xrgb2101010 => {
            let word = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
            unpack_2101010(word, format == OutputFormat::Xrgb2101010)
        }
        OutputFormat::Abgr16161616F => {
            let mut out = [0.0f32; 4];
            for (c, chunk) in out.iter_mut().zip(bytes.chunks_exact(2)) {
                *c = f16_bits_to_f32(u16::from_le_bytes([chunk[0], chunk[1]]));
            }
            out
        }
    }
}

/// Encode a row of working pixels into `dst`, which must hold exactly `src.len()` output pixels.
pub fn encode_row(format: OutputFormat, src: &[PremulRgbaF32], dst: &mut [u8]) -> BackdropResult<()> {
    let bpp = format.bytes_per_pixel();
    if src.is_empty() || dst.len() != src.len() * bpp {
        return Err(BackdropError::validation(format!(
            "encode_row expects {} bytes for {} pixels of {format}, got {}",
            src.len() * bpp,
            src.len(),
            dst.len()
        )));
    }
    for (px, out) in src.iter().zip(dst.chunks_exact_mut(bpp)) {
        encode_pixel(format, *px, out);
    }
    Ok(())
}

/// Decode a row of output pixels; the inverse of [`encode_row`] up to quantization.
pub fn decode_row(format: OutputFormat, src: &[u8], dst: &mut [PremulRgbaF32]) -> BackdropResult<()> {
    let bpp = format.bytes_per_pixel();
    if dst.is_empty() || src.len() != dst.len() * bpp {
        return Err(BackdropError::validation(format!(
            "decode_row expects {} bytes for {} pixels of {format}, got {}",
            dst.len() * bpp,
            dst.len(),
            src.len()
        )));
    }
    for (bytes, px) in src.chunks_exact(bpp).zip(dst.iter_mut()) {
        *px = decode_pixel(format, bytes);
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/convert/adapter.rs"]
mod tests;
