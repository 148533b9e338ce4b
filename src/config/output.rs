use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::{
    config::color::{is_valid_color, parse_color},
    foundation::core::Rgb8,
    foundation::error::{BackdropError, BackdropResult},
    layout::placement::BackgroundMode,
};

/// Output name matching every output without a more specific config.
pub const WILDCARD: &str = "*";

/// Wallpaper settings for one output, or for all outputs via [`WILDCARD`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputConfig {
    /// Output name, output identifier (`make model serial`), or `*`.
    pub output: String,
    pub image: Option<PathBuf>,
    pub color: Option<Rgb8>,
    pub mode: BackgroundMode,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self::new(WILDCARD)
    }
}

impl OutputConfig {
    pub fn new(output: impl Into<String>) -> Self {
        Self {
            output: output.into(),
            image: None,
            color: None,
            mode: BackgroundMode::Invalid,
        }
    }

    pub fn with_image(mut self, path: impl Into<PathBuf>) -> Self {
        self.image = Some(path.into());
        self
    }

    pub fn with_color(mut self, color: Rgb8) -> Self {
        self.color = Some(color);
        self
    }

    pub fn with_mode(mut self, mode: BackgroundMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.output == WILDCARD
    }

    /// Neither an image nor a color; such configs are dropped.
    pub fn is_empty(&self) -> bool {
        self.image.is_none() && self.color.is_none()
    }

    /// Background color to paint; black when none was configured.
    pub fn background(&self) -> Rgb8 {
        self.color.unwrap_or(Rgb8::BLACK)
    }

    /// Overlay the fields `other` sets: image and color when present, mode when valid.
    pub fn merge(&mut self, other: OutputConfig) {
        if other.image.is_some() {
            self.image = other.image;
        }
        if other.color.is_some() {
            self.color = other.color;
        }
        if other.mode != BackgroundMode::Invalid {
            self.mode = other.mode;
        }
    }
}

/// On-disk form of an output config, with color and mode still as tokens.
#[derive(Clone, Debug, Default, serde::Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfigEntry {
    pub output: Option<String>,
    pub image: Option<PathBuf>,
    pub color: Option<String>,
    pub mode: Option<String>,
}

impl OutputConfigEntry {
    /// Resolve tokens; an invalid color or mode is logged and left unset.
    pub fn resolve(self, base_dir: Option<&Path>) -> OutputConfig {
        let mut config = OutputConfig::new(self.output.unwrap_or_else(|| WILDCARD.to_owned()));
        config.image = self.image.map(|p| match base_dir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p,
        });
        if let Some(color) = self.color {
            if is_valid_color(&color) {
                config.color = parse_color(&color);
            } else {
                tracing::error!(%color, output = %config.output, "invalid color");
            }
        }
        if let Some(mode) = self.mode {
            config.mode = BackgroundMode::parse(&mode);
        }
        config
    }
}

/// Ordered set of output configs, at most one per output name.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigSet {
    configs: Vec<OutputConfig>,
}

impl ConfigSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `config`, or merge it on top of the existing config for the same output.
    ///
    /// Returns `true` when the config was added as a new entry.
    pub fn store(&mut self, config: OutputConfig) -> bool {
        match self.configs.iter_mut().find(|c| c.output == config.output) {
            Some(existing) => {
                existing.merge(config);
                false
            }
            None => {
                self.configs.push(config);
                true
            }
        }
    }

    /// Drop empty configs and give the rest a concrete mode: stretch with an image,
    /// solid color otherwise.
    pub fn finalize(&mut self) {
        self.configs.retain(|c| {
            if c.is_empty() {
                tracing::debug!(output = %c.output, "dropping empty output config");
            }
            !c.is_empty()
        });
        for config in &mut self.configs {
            if config.mode == BackgroundMode::Invalid {
                config.mode = if config.image.is_some() {
                    BackgroundMode::Stretch
                } else {
                    BackgroundMode::SolidColor
                };
            }
        }
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &OutputConfig> {
        self.configs.iter()
    }

    /// Config for an output: an identifier match beats a name match, which beats `*`.
    pub fn find(&self, name: Option<&str>, identifier: Option<&str>) -> Option<&OutputConfig> {
        let exact = |key: Option<&str>| {
            key.and_then(|key| self.configs.iter().find(|c| !c.is_wildcard() && c.output == key))
        };
        exact(identifier)
            .or_else(|| exact(name))
            .or_else(|| self.configs.iter().find(|c| c.is_wildcard()))
    }

    /// Distinct image paths referenced by any config, in config order.
    pub fn image_paths(&self) -> Vec<&Path> {
        let mut paths: Vec<&Path> = Vec::new();
        for path in self.configs.iter().filter_map(|c| c.image.as_deref()) {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }
        paths
    }

    /// Parse a JSON array of [`OutputConfigEntry`] values, then [`ConfigSet::finalize`].
    ///
    /// Relative image paths are resolved against `base_dir` when given.
    pub fn from_json(json: &str, base_dir: Option<&Path>) -> BackdropResult<Self> {
        let entries: Vec<OutputConfigEntry> = serde_json::from_str(json)
            .map_err(|e| BackdropError::config(format!("invalid output config JSON: {e}")))?;
        let mut set = Self::new();
        for entry in entries {
            set.store(entry.resolve(base_dir));
        }
        set.finalize();
        if set.is_empty() {
            return Err(BackdropError::config(
                "no usable output config (every entry lacks both image and color)",
            ));
        }
        Ok(set)
    }

    #[tracing::instrument(level = "debug")]
    pub fn load(path: &Path) -> BackdropResult<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("read output config {}", path.display()))?;
        Self::from_json(&json, path.parent())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/config/output.rs"]
mod tests;
