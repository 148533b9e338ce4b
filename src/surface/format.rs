use std::fmt;

use crate::foundation::error::BackdropError;

/// Layout of a decoded source image.
///
/// 8-bit samples are sRGB-encoded; float samples are whatever the attached
/// [`ColorInfo`](crate::color::cicp::ColorInfo) says (linear for OpenEXR). Channel order is always
/// R, G, B, A and multi-byte channels are little-endian.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum PixelFormat {
    Rgba8 { premultiplied: bool },
    RgbaF32 { premultiplied: bool },
    RgbaF16 { premultiplied: bool },
}

impl PixelFormat {
    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Rgba8 { .. } => 4,
            Self::RgbaF32 { .. } => 16,
            Self::RgbaF16 { .. } => 8,
        }
    }

    pub const fn is_premultiplied(self) -> bool {
        match self {
            Self::Rgba8 { premultiplied }
            | Self::RgbaF32 { premultiplied }
            | Self::RgbaF16 { premultiplied } => premultiplied,
        }
    }

    pub const fn with_premultiplied(self, premultiplied: bool) -> Self {
        match self {
            Self::Rgba8 { .. } => Self::Rgba8 { premultiplied },
            Self::RgbaF32 { .. } => Self::RgbaF32 { premultiplied },
            Self::RgbaF16 { .. } => Self::RgbaF16 { premultiplied },
        }
    }

    /// Anything wider than 8 bits per channel; such images prefer a half-float output buffer.
    pub const fn is_high_bit_depth(self) -> bool {
        !matches!(self, Self::Rgba8 { .. })
    }
}

/// Presentation buffer layouts, named after their `wl_shm` format codes.
///
/// All layouts are little-endian packed words holding premultiplied samples.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// 32-bit word `A:R:G:B`, bytes in memory B, G, R, A.
    Argb8888,
    /// As [`OutputFormat::Argb8888`] with the alpha byte ignored by the compositor.
    Xrgb8888,
    /// 32-bit word `A:B:G:R`, bytes in memory R, G, B, A.
    Abgr8888,
    /// 32-bit word with 2-bit alpha and 10-bit R, G, B from the high bits down.
    Argb2101010,
    /// As [`OutputFormat::Argb2101010`] with the alpha bits ignored.
    Xrgb2101010,
    /// Four little-endian binary16 channels R, G, B, A.
    Abgr16161616F,
}

const fn fourcc(code: &[u8; 4]) -> u32 {
    (code[0] as u32) | ((code[1] as u32) << 8) | ((code[2] as u32) << 16) | ((code[3] as u32) << 24)
}

impl OutputFormat {
    pub const ALL: [Self; 6] = [
        Self::Argb8888,
        Self::Xrgb8888,
        Self::Abgr8888,
        Self::Argb2101010,
        Self::Xrgb2101010,
        Self::Abgr16161616F,
    ];

    pub const fn bytes_per_pixel(self) -> usize {
        match self {
            Self::Abgr16161616F => 8,
            _ => 4,
        }
    }

    pub const fn has_alpha(self) -> bool {
        !matches!(self, Self::Xrgb8888 | Self::Xrgb2101010)
    }

    pub const fn is_high_bit_depth(self) -> bool {
        !matches!(self, Self::Argb8888 | Self::Xrgb8888 | Self::Abgr8888)
    }

    /// `wl_shm` format code; the two legacy formats use 0 and 1, the rest are DRM fourccs.
    pub const fn wl_shm_code(self) -> u32 {
        match self {
            Self::Argb8888 => 0,
            Self::Xrgb8888 => 1,
            Self::Abgr8888 => fourcc(b"AB24"),
            Self::Argb2101010 => fourcc(b"AR30"),
            Self::Xrgb2101010 => fourcc(b"XR30"),
            Self::Abgr16161616F => fourcc(b"AB4H"),
        }
    }

    pub fn from_wl_shm_code(code: u32) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.wl_shm_code() == code)
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Argb8888 => "argb8888",
            Self::Xrgb8888 => "xrgb8888",
            Self::Abgr8888 => "abgr8888",
            Self::Argb2101010 => "argb2101010",
            Self::Xrgb2101010 => "xrgb2101010",
            Self::Abgr16161616F => "abgr16161616f",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|f| f.name() == lower)
            .ok_or_else(|| BackdropError::validation(format!("unknown output format '{s}'")))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/surface/format.rs"]
mod tests;
