use std::path::Path;

use anyhow::Context;
use image::{DynamicImage, ImageFormat};

use crate::{
    assets::svg_raster,
    color::cicp::ColorInfo,
    foundation::error::{BackdropError, BackdropResult},
    surface::image::Image,
};

/// Encoded file type of a wallpaper image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageKind {
    Raster(ImageFormat),
    Svg,
}

impl ImageKind {
    /// Guess the type from a path extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        let kind = match ext.as_str() {
            "png" => Self::Raster(ImageFormat::Png),
            "jpg" | "jpeg" => Self::Raster(ImageFormat::Jpeg),
            "exr" => Self::Raster(ImageFormat::OpenExr),
            "webp" => Self::Raster(ImageFormat::WebP),
            "gif" => Self::Raster(ImageFormat::Gif),
            "ppm" | "pgm" | "pbm" | "pnm" => Self::Raster(ImageFormat::Pnm),
            "tif" | "tiff" => Self::Raster(ImageFormat::Tiff),
            "svg" => Self::Svg,
            _ => return None,
        };
        Some(kind)
    }

    /// Content sniffing for bytes of unknown type.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if let Ok(format) = image::guess_format(bytes) {
            return Some(Self::Raster(format));
        }
        let head = &bytes[..bytes.len().min(512)];
        let text = String::from_utf8_lossy(head);
        let text = text.trim_start_matches('\u{feff}').trim_start();
        if text.starts_with("<svg") || (text.starts_with("<?xml") && text.contains("<svg")) {
            return Some(Self::Svg);
        }
        None
    }
}

/// Decode file bytes into an [`Image`] ready for compositing.
///
/// `kind` is usually [`ImageKind::from_path`]; `None` falls back to content sniffing.
pub fn decode_image(bytes: &[u8], kind: Option<ImageKind>) -> BackdropResult<Image> {
    let kind = kind
        .or_else(|| ImageKind::sniff(bytes))
        .ok_or_else(|| BackdropError::decode("unrecognized image format"))?;
    match kind {
        ImageKind::Svg => decode_svg(bytes),
        ImageKind::Raster(format) => {
            let dyn_img = image::load_from_memory_with_format(bytes, format)
                .with_context(|| format!("decode {format:?} image from memory"))?;
            image_from_dynamic(dyn_img)
        }
    }
}

/// Convert a decoded raster into premultiplied working form.
///
/// 8-bit sources stay 8-bit. 16-bit integer sources become normalized f32 in their sRGB encoding.
/// Float sources (OpenEXR, HDR) are linear and get re-encoded.
pub fn image_from_dynamic(dyn_img: DynamicImage) -> BackdropResult<Image> {
    let (width, height) = (dyn_img.width(), dyn_img.height());
    let image = match dyn_img {
        DynamicImage::ImageRgb32F(_) | DynamicImage::ImageRgba32F(_) => {
            let rgba = dyn_img.to_rgba32f();
            Image::from_rgba_f32(
                width,
                height,
                false,
                Some(ColorInfo::LINEAR_SRGB),
                rgba.as_raw(),
            )?
        }
        DynamicImage::ImageLuma16(_)
        | DynamicImage::ImageLumaA16(_)
        | DynamicImage::ImageRgb16(_)
        | DynamicImage::ImageRgba16(_) => {
            let rgba = dyn_img.to_rgba32f();
            Image::from_rgba_f32(width, height, false, None, rgba.as_raw())?
        }
        _ => Image::from_rgba8(width, height, false, dyn_img.to_rgba8().into_raw())?,
    };
    Ok(image.prepared())
}

/// Rasterize an SVG document at its intrinsic size.
pub fn decode_svg(bytes: &[u8]) -> BackdropResult<Image> {
    let tree = svg_raster::parse_svg(bytes)?;
    let (width, height) = svg_raster::svg_raster_size(&tree)?;
    let data = svg_raster::rasterize_svg_to_premul_rgba8(&tree, width, height)?;
    Image::from_rgba8(width, height, true, data)
}

/// Read and decode an image file.
#[tracing::instrument(level = "debug")]
pub fn load_image(path: &Path) -> BackdropResult<Image> {
    let bytes = std::fs::read(path).with_context(|| format!("read image {}", path.display()))?;
    let image = decode_image(&bytes, ImageKind::from_path(path))
        .map_err(|e| BackdropError::decode(format!("{}: {e:#}", path.display())))?;
    tracing::debug!(
        width = image.width(),
        height = image.height(),
        format = ?image.format(),
        "decoded image"
    );
    Ok(image)
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
