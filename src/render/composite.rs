use crate::foundation::{
    core::PremulRgbaF32,
    error::{BackdropError, BackdropResult},
};

/// Premultiplied source-over: `out = src + dst * (1 - src.a)`.
#[inline]
pub fn over(dst: PremulRgbaF32, src: PremulRgbaF32) -> PremulRgbaF32 {
    let sa = src[3];
    if sa <= 0.0 {
        return dst;
    }
    if sa >= 1.0 {
        return src;
    }
    let inv = 1.0 - sa;
    [
        src[0] + dst[0] * inv,
        src[1] + dst[1] * inv,
        src[2] + dst[2] * inv,
        sa + dst[3] * inv,
    ]
}

pub fn over_row_in_place(dst: &mut [PremulRgbaF32], src: &[PremulRgbaF32]) -> BackdropResult<()> {
    if dst.len() != src.len() {
        return Err(BackdropError::render(format!(
            "over_row_in_place expects equal-length rows, got {} and {}",
            dst.len(),
            src.len()
        )));
    }
    for (d, s) in dst.iter_mut().zip(src) {
        *d = over(*d, *s);
    }
    Ok(())
}
