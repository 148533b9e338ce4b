use crate::{
    color::cicp::ColorInfo,
    color::transfer::srgb_encode,
    convert::adapter::{premultiply, read_texel, unpremultiply, write_texel},
    foundation::core::{PremulRgbaF32, Size},
    foundation::error::{BackdropError, BackdropResult},
    foundation::math::mul_div255_u8,
    surface::{PixelSource, format::PixelFormat},
};

/// Immutable decoded pixel grid.
///
/// Produced by a decoder, shared read-only across every canvas that displays it.
#[derive(Clone, Debug, PartialEq)]
pub struct Image {
    width: u32,
    height: u32,
    stride: u32,
    format: PixelFormat,
    color: ColorInfo,
    data: Vec<u8>,
}

impl Image {
    /// Wrap decoder output.
    ///
    /// `stride` is in bytes and may include row padding. Missing or unsupported color tags
    /// resolve to sRGB.
    pub fn new(
        width: u32,
        height: u32,
        stride: u32,
        format: PixelFormat,
        color: Option<ColorInfo>,
        data: Vec<u8>,
    ) -> BackdropResult<Self> {
        Size::new(width, height).ensure_non_empty("image")?;

        let row_bytes = (width as usize)
            .checked_mul(format.bytes_per_pixel())
            .ok_or_else(|| BackdropError::validation("image row size overflow"))?;
        if (stride as usize) < row_bytes {
            return Err(BackdropError::validation(format!(
                "image stride {stride} is smaller than a {width}px row ({row_bytes} bytes)"
            )));
        }
        let needed = (stride as usize)
            .checked_mul(height as usize - 1)
            .and_then(|v| v.checked_add(row_bytes))
            .ok_or_else(|| BackdropError::validation("image buffer size overflow"))?;
        if data.len() < needed {
            return Err(BackdropError::validation(format!(
                "image buffer holds {} bytes, {width}x{height} with stride {stride} needs {needed}",
                data.len()
            )));
        }

        Ok(Self {
            width,
            height,
            stride,
            format,
            color: ColorInfo::resolve(color),
            data,
        })
    }

    /// Tightly packed 8-bit RGBA, sRGB tagged.
    pub fn from_rgba8(
        width: u32,
        height: u32,
        premultiplied: bool,
        data: Vec<u8>,
    ) -> BackdropResult<Self> {
        Self::new(
            width,
            height,
            width.saturating_mul(4),
            PixelFormat::Rgba8 { premultiplied },
            None,
            data,
        )
    }

    /// Tightly packed f32 RGBA.
    pub fn from_rgba_f32(
        width: u32,
        height: u32,
        premultiplied: bool,
        color: Option<ColorInfo>,
        samples: &[f32],
    ) -> BackdropResult<Self> {
        let mut data = Vec::with_capacity(samples.len() * 4);
        for s in samples {
            data.extend_from_slice(&s.to_le_bytes());
        }
        Self::new(
            width,
            height,
            width.saturating_mul(16),
            PixelFormat::RgbaF32 { premultiplied },
            color,
            data,
        )
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn format(&self) -> PixelFormat {
        self.format
    }

    pub fn color(&self) -> ColorInfo {
        self.color
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Bytes of row `y`, without stride padding.
    pub fn row(&self, y: u32) -> &[u8] {
        let start = y as usize * self.stride as usize;
        &self.data[start..start + self.width as usize * self.format.bytes_per_pixel()]
    }

    /// Produce the form the compositor samples from: premultiplied alpha, sRGB-encoded values.
    ///
    /// Straight-alpha 8-bit data is premultiplied with `round(c * a / 255)`. Linear float images
    /// are re-encoded with the sRGB curve before premultiplication. Images already in that form
    /// are returned unchanged.
    pub fn prepared(self) -> Self {
        let needs_encode = self.color.is_linear();
        if self.format.is_premultiplied() && !needs_encode {
            return self;
        }

        if let PixelFormat::Rgba8 { .. } = self.format {
            return self.premultiplied_rgba8();
        }

        let bpp = self.format.bytes_per_pixel();
        let format = self.format.with_premultiplied(true);
        let row_bytes = self.width as usize * bpp;
        let mut data = vec![0u8; row_bytes * self.height as usize];
        for (y, dst_row) in data.chunks_exact_mut(row_bytes).enumerate() {
            let src_row = self.row(y as u32);
            for (src, dst) in src_row.chunks_exact(bpp).zip(dst_row.chunks_exact_mut(bpp)) {
                let mut px = read_texel(self.format, src);
                if self.format.is_premultiplied() {
                    px = unpremultiply(px);
                }
                if needs_encode {
                    px = [srgb_encode(px[0]), srgb_encode(px[1]), srgb_encode(px[2]), px[3]];
                }
                write_texel(format, premultiply(px), dst);
            }
        }

        let color = if needs_encode {
            ColorInfo {
                transfer: crate::color::cicp::TRANSFER_SRGB,
                ..self.color
            }
        } else {
            self.color
        };

        Self {
            width: self.width,
            height: self.height,
            stride: row_bytes as u32,
            format,
            color,
            data,
        }
    }

    fn premultiplied_rgba8(self) -> Self {
        let row_bytes = self.width as usize * 4;
        let mut data = Vec::with_capacity(row_bytes * self.height as usize);
        for y in 0..self.height {
            data.extend_from_slice(self.row(y));
        }
        premultiply_rgba8_in_place(&mut data);
        Self {
            width: self.width,
            height: self.height,
            stride: row_bytes as u32,
            format: PixelFormat::Rgba8 {
                premultiplied: true,
            },
            color: self.color,
            data,
        }
    }
}

impl Image {
    /// One stored texel in the working space: premultiplied, sRGB-encoded.
    #[inline]
    fn working_texel(&self, bytes: &[u8]) -> PremulRgbaF32 {
        let raw = read_texel(self.format, bytes);
        let premultiplied = self.format.is_premultiplied();
        if !self.color.is_linear() {
            return if premultiplied { raw } else { premultiply(raw) };
        }
        let px = if premultiplied { unpremultiply(raw) } else { raw };
        premultiply([srgb_encode(px[0]), srgb_encode(px[1]), srgb_encode(px[2]), px[3]])
    }
}

impl PixelSource for Image {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn texel(&self, x: u32, y: u32) -> PremulRgbaF32 {
        let bpp = self.format.bytes_per_pixel();
        let start = y as usize * self.stride as usize + x as usize * bpp;
        self.working_texel(&self.data[start..start + bpp])
    }

    fn texel_row(&self, y: u32, out: &mut [PremulRgbaF32]) {
        let bpp = self.format.bytes_per_pixel();
        for (bytes, px) in self.row(y).chunks_exact(bpp).zip(out.iter_mut()) {
            *px = self.working_texel(bytes);
        }
    }
}

/// `round(c * a / 255)` per color channel; fully transparent pixels become zero.
pub fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = u16::from(px[3]);
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = mul_div255_u8(u16::from(px[0]), a);
        px[1] = mul_div255_u8(u16::from(px[1]), a);
        px[2] = mul_div255_u8(u16::from(px[2]), a);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/image.rs"]
mod tests;
