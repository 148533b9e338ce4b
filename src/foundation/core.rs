use std::fmt;

use crate::foundation::error::{BackdropError, BackdropResult};

pub use kurbo::{Affine, Point, Rect, Vec2};

/// Premultiplied RGBA sample in working precision (`[r, g, b, a]`, color already scaled by alpha).
pub type PremulRgbaF32 = [f32; 4];

/// Fully transparent working sample.
pub const TRANSPARENT: PremulRgbaF32 = [0.0, 0.0, 0.0, 0.0];

/// Pixel dimensions of an image or output buffer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn pixel_count(self) -> usize {
        (self.width as usize).saturating_mul(self.height as usize)
    }

    /// Reject zero-sized dimensions; `what` names the offending surface in the error.
    pub fn ensure_non_empty(self, what: &str) -> BackdropResult<()> {
        if self.is_empty() {
            return Err(BackdropError::validation(format!(
                "{what} must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        Ok(())
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl std::str::FromStr for Size {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| BackdropError::validation(format!("expected WxH, got '{s}'")))?;
        let width = w
            .trim()
            .parse::<u32>()
            .map_err(|e| BackdropError::validation(format!("invalid width '{w}': {e}")))?;
        let height = h
            .trim()
            .parse::<u32>()
            .map_err(|e| BackdropError::validation(format!("invalid height '{h}': {e}")))?;
        Ok(Self { width, height })
    }
}

/// Opaque 8-bit sRGB color. The background is always painted with alpha 1.0.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const WHITE: Self = Self::new(0xFF, 0xFF, 0xFF);
    pub const BLACK: Self = Self::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Working-precision sample with alpha forced to 1.0.
    pub fn to_premul_f32(self) -> PremulRgbaF32 {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
            1.0,
        ]
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}
