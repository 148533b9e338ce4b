//! Image decoding and the shared image store.

/// File bytes to [`crate::surface::image::Image`].
pub mod decode;
/// Path-keyed cache of decoded images.
pub mod store;
/// SVG rasterization through `resvg`.
pub mod svg_raster;
