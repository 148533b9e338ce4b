//! Image placement geometry.

/// Display modes and the pure placement solver.
pub mod placement;
