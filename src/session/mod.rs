//! Renderer state that outlives a single frame.

/// Output tracking and the render entry point.
pub mod engine;
