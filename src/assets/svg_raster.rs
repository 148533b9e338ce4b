use anyhow::Context;

use crate::foundation::error::{BackdropError, BackdropResult};

/// Largest raster side produced for an SVG.
pub const MAX_DIM: u32 = 16_384;

pub fn parse_svg(bytes: &[u8]) -> BackdropResult<usvg::Tree> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(tree)
}

/// Raster size for an SVG drawn at its intrinsic size.
///
/// Sizes above [`MAX_DIM`] on either side are scaled down uniformly to fit.
pub fn svg_raster_size(tree: &usvg::Tree) -> BackdropResult<(u32, u32)> {
    let size = tree.size();
    let (w, h) = (f64::from(size.width()), f64::from(size.height()));
    if !(w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0) {
        return Err(BackdropError::decode("svg has invalid width/height"));
    }

    let max = f64::from(MAX_DIM);
    let shrink = (max / w).min(max / h).min(1.0);
    let to_px = |v: f64| ((v * shrink).ceil() as u32).clamp(1, MAX_DIM);
    Ok((to_px(w), to_px(h)))
}

/// Rasterize into premultiplied RGBA8, stretching the SVG to `width`x`height`.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> BackdropResult<Vec<u8>> {
    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| BackdropError::decode("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / tree.size().width();
    let sy = (height as f32) / tree.size().height();
    let xform = resvg::tiny_skia::Transform::from_scale(sx, sy);

    resvg::render(tree, xform, &mut pixmap.as_mut());
    Ok(pixmap.take())
}
