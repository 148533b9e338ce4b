use crate::render::sample::{MINIFY_THRESHOLD, MinifyKernel};

/// Environment variable selecting the minification kernel (`triangle` or `lanczos3`).
pub const ENV_MINIFY_KERNEL: &str = "BACKDROP_MINIFY_KERNEL";
/// Environment variable overriding the minification threshold, in `(0, 1]`.
pub const ENV_MINIFY_THRESHOLD: &str = "BACKDROP_MINIFY_THRESHOLD";

/// Resampling knobs for the compositor.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct RenderOptions {
    pub minify_kernel: MinifyKernel,
    /// Scale below which an axis counts as minified.
    pub minify_threshold: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            minify_kernel: MinifyKernel::default(),
            minify_threshold: MINIFY_THRESHOLD,
        }
    }
}

impl RenderOptions {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build options from a key lookup; unparseable values are logged and ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut options = Self::default();
        if let Some(raw) = lookup(ENV_MINIFY_KERNEL) {
            match raw.parse::<MinifyKernel>() {
                Ok(kernel) => options.minify_kernel = kernel,
                Err(err) => tracing::warn!(%err, "ignoring {ENV_MINIFY_KERNEL}"),
            }
        }
        if let Some(raw) = lookup(ENV_MINIFY_THRESHOLD) {
            match raw.trim().parse::<f64>() {
                Ok(v) if v > 0.0 && v <= 1.0 => options.minify_threshold = v,
                _ => tracing::warn!(value = %raw, "ignoring {ENV_MINIFY_THRESHOLD}"),
            }
        }
        options
    }
}
