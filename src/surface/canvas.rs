use crate::{
    convert::adapter::{decode_row, encode_pixel, encode_row},
    foundation::core::{PremulRgbaF32, Size},
    foundation::error::{BackdropError, BackdropResult},
    surface::format::OutputFormat,
};

/// Caller-owned destination buffer sized to one output surface.
///
/// The engine writes pixels in place and never reallocates or frees the underlying memory.
#[derive(Debug)]
pub struct Canvas<'a> {
    data: &'a mut [u8],
    width: u32,
    height: u32,
    stride: u32,
    format: OutputFormat,
}

impl<'a> Canvas<'a> {
    pub fn new(
        data: &'a mut [u8],
        width: u32,
        height: u32,
        stride: u32,
        format: OutputFormat,
    ) -> BackdropResult<Self> {
        Size::new(width, height).ensure_non_empty("canvas")?;
        let row_bytes = (width as usize)
            .checked_mul(format.bytes_per_pixel())
            .ok_or_else(|| BackdropError::validation("canvas row size overflow"))?;
        if (stride as usize) < row_bytes {
            return Err(BackdropError::validation(format!(
                "canvas stride {stride} is smaller than a {width}px {format} row ({row_bytes} bytes)"
            )));
        }
        let needed = (stride as usize)
            .checked_mul(height as usize)
            .ok_or_else(|| BackdropError::validation("canvas buffer size overflow"))?;
        if data.len() < needed {
            return Err(BackdropError::validation(format!(
                "canvas buffer holds {} bytes, needs {needed}",
                data.len()
            )));
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
            format,
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn stride(&self) -> u32 {
        self.stride
    }

    pub fn format(&self) -> OutputFormat {
        self.format
    }

    fn row_range(&self, y: u32) -> std::ops::Range<usize> {
        let start = y as usize * self.stride as usize;
        start..start + self.width as usize * self.format.bytes_per_pixel()
    }

    pub fn row_mut(&mut self, y: u32) -> &mut [u8] {
        let range = self.row_range(y);
        &mut self.data[range]
    }

    /// Encode a full row of premultiplied working pixels into row `y`.
    pub fn write_row(&mut self, y: u32, px: &[PremulRgbaF32]) -> BackdropResult<()> {
        if y >= self.height {
            return Err(BackdropError::validation(format!(
                "row {y} outside canvas of height {}",
                self.height
            )));
        }
        let format = self.format;
        encode_row(format, px, self.row_mut(y))
    }

    /// Paint every pixel with `px`.
    pub fn fill(&mut self, px: PremulRgbaF32) {
        let bpp = self.format.bytes_per_pixel();
        let mut encoded = [0u8; 8];
        encode_pixel(self.format, px, &mut encoded[..bpp]);
        let format = self.format;
        for y in 0..self.height {
            for out in self.row_mut(y).chunks_exact_mut(format.bytes_per_pixel()) {
                out.copy_from_slice(&encoded[..bpp]);
            }
        }
    }
}

/// Owned output buffer, standing in for a presentation buffer when the caller has none.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub stride: u32,
    pub format: OutputFormat,
    pub data: Vec<u8>,
}

impl Frame {
    /// Allocate a zeroed, tightly packed frame. Zero-sized frames are refused.
    pub fn alloc(size: Size, format: OutputFormat) -> BackdropResult<Self> {
        size.ensure_non_empty("frame")?;
        let stride = size
            .width
            .checked_mul(format.bytes_per_pixel() as u32)
            .ok_or_else(|| BackdropError::validation("frame stride overflow"))?;
        let len = (stride as usize)
            .checked_mul(size.height as usize)
            .ok_or_else(|| BackdropError::validation("frame size overflow"))?;
        Ok(Self {
            width: size.width,
            height: size.height,
            stride,
            format,
            data: vec![0u8; len],
        })
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn canvas(&mut self) -> BackdropResult<Canvas<'_>> {
        Canvas::new(
            &mut self.data,
            self.width,
            self.height,
            self.stride,
            self.format,
        )
    }

    /// Decode the whole frame into premultiplied working pixels, row-major.
    pub fn to_premul_f32(&self) -> BackdropResult<Vec<PremulRgbaF32>> {
        let mut out = vec![[0.0f32; 4]; self.size().pixel_count()];
        let bpp = self.format.bytes_per_pixel();
        for (y, row) in out.chunks_exact_mut(self.width as usize).enumerate() {
            let start = y * self.stride as usize;
            decode_row(
                self.format,
                &self.data[start..start + self.width as usize * bpp],
                row,
            )?;
        }
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/canvas.rs"]
mod tests;
