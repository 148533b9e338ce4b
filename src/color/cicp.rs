//! Coding-independent code points (ITU-T H.273) describing how pixel values should be read.

/// BT.709 / sRGB primaries.
pub const PRIMARIES_BT709: u8 = 1;
/// BT.2020 / BT.2100 primaries.
pub const PRIMARIES_BT2020: u8 = 9;

/// BT.470 System M, a pure 2.2 gamma.
pub const TRANSFER_GAMMA22: u8 = 4;
/// Linear light.
pub const TRANSFER_LINEAR: u8 = 8;
/// IEC 61966-2-1 sRGB.
pub const TRANSFER_SRGB: u8 = 13;
/// SMPTE ST 2084 perceptual quantizer.
pub const TRANSFER_PQ: u8 = 16;

/// Identity matrix: samples are RGB, not YCbCr.
pub const MATRIX_IDENTITY: u8 = 0;
/// Full-range samples.
pub const RANGE_FULL: u8 = 1;

/// Color characteristics of an image.
///
/// Only a small whitelist is understood; anything else collapses to [`ColorInfo::SRGB`] through
/// [`ColorInfo::sanitized`] so an odd tag never fails a render.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct ColorInfo {
    pub primaries: u8,
    pub transfer: u8,
    pub matrix: u8,
    pub range: u8,
}

impl Default for ColorInfo {
    fn default() -> Self {
        Self::SRGB
    }
}

impl ColorInfo {
    /// `{1, 13, 0, 1}`: BT.709 primaries, sRGB transfer, RGB, full range.
    pub const SRGB: Self = Self {
        primaries: PRIMARIES_BT709,
        transfer: TRANSFER_SRGB,
        matrix: MATRIX_IDENTITY,
        range: RANGE_FULL,
    };

    /// BT.709 primaries with linear transfer, the usual tagging of OpenEXR content.
    pub const LINEAR_SRGB: Self = Self {
        transfer: TRANSFER_LINEAR,
        ..Self::SRGB
    };

    pub const fn new(primaries: u8, transfer: u8, matrix: u8, range: u8) -> Self {
        Self {
            primaries,
            transfer,
            matrix,
            range,
        }
    }

    pub fn is_supported(self) -> bool {
        matches!(self.primaries, PRIMARIES_BT709 | PRIMARIES_BT2020)
            && matches!(
                self.transfer,
                TRANSFER_GAMMA22 | TRANSFER_LINEAR | TRANSFER_SRGB | TRANSFER_PQ
            )
            && self.matrix == MATRIX_IDENTITY
            && self.range == RANGE_FULL
    }

    /// Return `self` when every tag is on the whitelist, otherwise the sRGB default.
    pub fn sanitized(self) -> Self {
        if self.is_supported() {
            return self;
        }
        tracing::warn!(
            primaries = self.primaries,
            transfer = self.transfer,
            matrix = self.matrix,
            range = self.range,
            "unsupported color tags, falling back to sRGB"
        );
        Self::SRGB
    }

    /// Resolve optional decoder metadata: absent tags mean sRGB.
    pub fn resolve(tags: Option<Self>) -> Self {
        tags.map(Self::sanitized).unwrap_or(Self::SRGB)
    }

    pub fn is_linear(self) -> bool {
        self.transfer == TRANSFER_LINEAR
    }
}

#[cfg(test)]
#[path = "../../tests/unit/color/cicp.rs"]
mod tests;
