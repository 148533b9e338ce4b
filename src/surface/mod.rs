//! In-memory pixel surfaces: immutable decoded images and caller-owned output canvases.

/// Output buffer the compositor paints into.
pub mod canvas;
/// Pixel layouts for source images and presentation buffers.
pub mod format;
/// Immutable decoded image.
pub mod image;

use crate::foundation::core::{PremulRgbaF32, Size};

/// Read capability the compositor samples from.
///
/// Implementations return premultiplied samples in the encoded working space; callers only pass
/// coordinates inside [`PixelSource::size`].
pub trait PixelSource {
    fn size(&self) -> Size;

    fn texel(&self, x: u32, y: u32) -> PremulRgbaF32;

    /// Fetch a horizontal run of texels. The default walks [`PixelSource::texel`].
    fn texel_row(&self, y: u32, out: &mut [PremulRgbaF32]) {
        for (x, px) in out.iter_mut().enumerate() {
            *px = self.texel(x as u32, y);
        }
    }
}
