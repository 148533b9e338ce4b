use std::fmt;

use crate::foundation::{
    core::{Affine, Rect, Size},
    error::{BackdropError, BackdropResult},
};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(from = "String", into = "String")]
/// How an image is placed on an output.
pub enum BackgroundMode {
    /// Scale each axis independently to the canvas.
    Stretch,
    /// Uniform scale covering the canvas; the overhang is cropped.
    Fill,
    /// Uniform scale contained in the canvas; the rest is letterboxed.
    Fit,
    /// Unscaled and centered.
    Center,
    /// Unscaled and repeated from the top-left corner.
    Tile,
    /// No image, background color only.
    SolidColor,
    /// Unrecognized token.
    #[default]
    Invalid,
}

impl BackgroundMode {
    pub const ALL: [Self; 6] = [
        Self::Stretch,
        Self::Fill,
        Self::Fit,
        Self::Center,
        Self::Tile,
        Self::SolidColor,
    ];

    /// Parse a mode token. Unknown tokens yield [`BackgroundMode::Invalid`] and an error log.
    pub fn parse(token: &str) -> Self {
        let mode = Self::from_token(token);
        if mode == Self::Invalid {
            tracing::error!(token, "invalid background mode");
        }
        mode
    }

    fn from_token(token: &str) -> Self {
        match token {
            "stretch" => Self::Stretch,
            "fill" => Self::Fill,
            "fit" => Self::Fit,
            "center" => Self::Center,
            "tile" => Self::Tile,
            "solid_color" => Self::SolidColor,
            _ => Self::Invalid,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stretch => "stretch",
            Self::Fill => "fill",
            Self::Fit => "fit",
            Self::Center => "center",
            Self::Tile => "tile",
            Self::SolidColor => "solid_color",
            Self::Invalid => "invalid",
        }
    }

    /// Whether the mode draws an image at all and therefore goes through [`solve`].
    pub fn places_image(self) -> bool {
        !matches!(self, Self::SolidColor | Self::Invalid)
    }
}

impl fmt::Display for BackgroundMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for BackgroundMode {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for BackgroundMode {
    fn from(value: String) -> Self {
        Self::parse(&value)
    }
}

impl From<BackgroundMode> for String {
    fn from(value: BackgroundMode) -> Self {
        value.as_str().to_owned()
    }
}

/// Image-to-canvas transform for one render: `canvas = image * scale + translate`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Placement {
    pub scale_x: f64,
    pub scale_y: f64,
    pub translate_x: f64,
    pub translate_y: f64,
    /// Repeat the image across the canvas instead of drawing it once.
    pub repeat: bool,
}

impl Placement {
    pub const IDENTITY: Self = Self {
        scale_x: 1.0,
        scale_y: 1.0,
        translate_x: 0.0,
        translate_y: 0.0,
        repeat: false,
    };

    pub fn to_affine(&self) -> Affine {
        Affine::translate((self.translate_x, self.translate_y))
            * Affine::scale_non_uniform(self.scale_x, self.scale_y)
    }

    /// Canvas-space rectangle covered by one copy of an image of `image` size.
    pub fn image_rect(&self, image: Size) -> Rect {
        self.to_affine()
            .transform_rect_bbox(Rect::new(0.0, 0.0, f64::from(image.width), f64::from(image.height)))
    }
}

/// Compute the placement of an `image_width`x`image_height` image on a canvas.
///
/// All sizes must be positive and `mode` must place an image; solid color and invalid modes are
/// handled by the caller with a flat fill.
#[tracing::instrument(level = "debug")]
pub fn solve(
    image_width: u32,
    image_height: u32,
    canvas_width: u32,
    canvas_height: u32,
    mode: BackgroundMode,
) -> BackdropResult<Placement> {
    Size::new(image_width, image_height).ensure_non_empty("image")?;
    Size::new(canvas_width, canvas_height).ensure_non_empty("canvas")?;

    let (iw, ih) = (f64::from(image_width), f64::from(image_height));
    let (dw, dh) = (f64::from(canvas_width), f64::from(canvas_height));
    // Each product fits in u64: (2^32 - 1)^2 < 2^64.
    let wider = u64::from(image_width) * u64::from(canvas_height)
        >= u64::from(image_height) * u64::from(canvas_width);

    let placement = match mode {
        BackgroundMode::Stretch => Placement {
            scale_x: dw / iw,
            scale_y: dh / ih,
            ..Placement::IDENTITY
        },
        BackgroundMode::Fill | BackgroundMode::Fit => {
            let match_x = wider == (mode == BackgroundMode::Fit);
            if match_x {
                let s = dw / iw;
                Placement {
                    scale_x: s,
                    scale_y: s,
                    translate_x: 0.0,
                    translate_y: (dh - s * ih) / 2.0,
                    repeat: false,
                }
            } else {
                let s = dh / ih;
                Placement {
                    scale_x: s,
                    scale_y: s,
                    translate_x: (dw - s * iw) / 2.0,
                    translate_y: 0.0,
                    repeat: false,
                }
            }
        }
        BackgroundMode::Center => Placement {
            translate_x: (dw - iw) / 2.0,
            translate_y: (dh - ih) / 2.0,
            ..Placement::IDENTITY
        },
        BackgroundMode::Tile => Placement {
            repeat: true,
            ..Placement::IDENTITY
        },
        BackgroundMode::SolidColor | BackgroundMode::Invalid => {
            return Err(BackdropError::validation(format!(
                "mode '{mode}' has no image placement"
            )));
        }
    };

    tracing::debug!(?placement, "solved placement");
    Ok(placement)
}

#[cfg(test)]
#[path = "../../tests/unit/layout/placement.rs"]
mod tests;
