//! CPU compositing of a placed image over a solid background.

/// Premultiplied source-over.
pub mod composite;
/// Compositor entry points.
pub mod compositor;
/// Reconstruction filters and separable tap tables.
pub mod sample;
