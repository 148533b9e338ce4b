//! User-facing configuration: colors, per-output wallpaper settings, render tuning.

/// Color token parsing.
pub mod color;
/// Resampling options.
pub mod options;
/// Per-output configs and the merged config set.
pub mod output;
