use std::sync::Arc;

use crate::{
    assets::store::ImageStore,
    config::{
        options::RenderOptions,
        output::{ConfigSet, OutputConfig},
    },
    foundation::core::Size,
    foundation::error::{BackdropError, BackdropResult},
    layout::placement::{Placement, solve},
    render::compositor::Compositor,
    surface::{PixelSource, canvas::Frame, format::OutputFormat, image::Image},
};

/// Handle for an output registered with an [`Engine`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OutputId(u32);

/// Last known geometry of one output and what was last presented on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OutputState {
    pub id: OutputId,
    pub name: Option<String>,
    /// `make model serial`, derived from the output description.
    pub identifier: Option<String>,
    /// Logical size.
    pub width: u32,
    pub height: u32,
    pub scale: u32,
    pub committed_width: u32,
    pub committed_height: u32,
    pub committed_scale: u32,
}

impl OutputState {
    /// Buffer size in pixels: logical size times scale.
    pub fn buffer_size(&self) -> Size {
        Size::new(
            self.width.saturating_mul(self.scale),
            self.height.saturating_mul(self.scale),
        )
    }

    pub fn committed_size(&self) -> Size {
        Size::new(self.committed_width, self.committed_height)
    }

    /// A new buffer is needed only when the pixel size differs from the committed one.
    pub fn needs_render(&self) -> bool {
        let size = self.buffer_size();
        !size.is_empty() && size != self.committed_size()
    }
}

/// Result of [`Engine::render_output`].
#[derive(Debug)]
pub enum RenderOutcome {
    /// A new frame to present.
    Rendered {
        frame: Frame,
        placement: Option<Placement>,
    },
    /// Same buffer size, new scale: only the buffer scale must be updated.
    ScaleOnly { scale: u32 },
    /// The committed buffer is still correct.
    Unchanged,
}

/// Long-lived renderer context: configs, decoded images and per-output state.
#[derive(Debug)]
pub struct Engine {
    configs: ConfigSet,
    images: ImageStore,
    outputs: Vec<OutputState>,
    next_id: u32,
    compositor: Compositor,
    half_float_supported: bool,
}

impl Engine {
    pub fn new(configs: ConfigSet, options: RenderOptions) -> Self {
        Self {
            configs,
            images: ImageStore::new(),
            outputs: Vec::new(),
            next_id: 0,
            compositor: Compositor::new(options),
            half_float_supported: false,
        }
    }

    pub fn configs(&self) -> &ConfigSet {
        &self.configs
    }

    pub fn images(&self) -> &ImageStore {
        &self.images
    }

    pub fn images_mut(&mut self) -> &mut ImageStore {
        &mut self.images
    }

    /// Record a buffer format the presentation layer accepts.
    pub fn advertise_format(&mut self, format: OutputFormat) {
        if format == OutputFormat::Abgr16161616F {
            self.half_float_supported = true;
        }
    }

    /// Record a `wl_shm` format code announced by the compositor. Unknown codes are ignored.
    pub fn advertise_shm_format(&mut self, code: u32) {
        match OutputFormat::from_wl_shm_code(code) {
            Some(format) => self.advertise_format(format),
            None => tracing::debug!(code, "ignoring unsupported shm format"),
        }
    }

    /// Half-float when the presentation layer takes it and the image has more than 8 bits.
    pub fn choose_format(&self, image: Option<&Image>) -> OutputFormat {
        let high_bit_depth = image.is_some_and(|img| img.format().is_high_bit_depth());
        if self.half_float_supported && high_bit_depth {
            OutputFormat::Abgr16161616F
        } else {
            OutputFormat::Argb8888
        }
    }

    pub fn add_output(&mut self, name: Option<&str>, identifier: Option<&str>) -> OutputId {
        let id = OutputId(self.next_id);
        self.next_id += 1;
        self.outputs.push(OutputState {
            id,
            name: name.map(str::to_owned),
            identifier: identifier.map(str::to_owned),
            width: 0,
            height: 0,
            scale: 1,
            committed_width: 0,
            committed_height: 0,
            committed_scale: 0,
        });
        id
    }

    pub fn remove_output(&mut self, id: OutputId) -> Option<OutputState> {
        let idx = self.outputs.iter().position(|o| o.id == id)?;
        Some(self.outputs.remove(idx))
    }

    pub fn output(&self, id: OutputId) -> Option<&OutputState> {
        self.outputs.iter().find(|o| o.id == id)
    }

    pub fn outputs(&self) -> impl Iterator<Item = &OutputState> {
        self.outputs.iter()
    }

    fn output_mut(&mut self, id: OutputId) -> BackdropResult<&mut OutputState> {
        self.outputs
            .iter_mut()
            .find(|o| o.id == id)
            .ok_or_else(|| BackdropError::validation(format!("unknown output {id:?}")))
    }

    pub fn set_output_name(&mut self, id: OutputId, name: &str) -> BackdropResult<()> {
        self.output_mut(id)?.name = Some(name.to_owned());
        Ok(())
    }

    /// Set the identifier from a `make model serial (name)` description.
    pub fn set_output_description(&mut self, id: OutputId, description: &str) -> BackdropResult<()> {
        let identifier = identifier_from_description(description);
        self.output_mut(id)?.identifier = identifier;
        Ok(())
    }

    /// Record a new logical size and scale. The next render compares the resulting buffer
    /// size against the committed one.
    pub fn configure_output(
        &mut self,
        id: OutputId,
        width: u32,
        height: u32,
        scale: u32,
    ) -> BackdropResult<()> {
        if scale == 0 {
            return Err(BackdropError::validation("output scale must be at least 1"));
        }
        let output = self.output_mut(id)?;
        output.width = width;
        output.height = height;
        output.scale = scale;
        tracing::debug!(?id, width, height, scale, "output configured");
        Ok(())
    }

    pub fn config_for(&self, id: OutputId) -> Option<&OutputConfig> {
        let output = self.output(id)?;
        self.configs
            .find(output.name.as_deref(), output.identifier.as_deref())
    }

    pub fn needs_render(&self, id: OutputId) -> bool {
        self.output(id).is_some_and(OutputState::needs_render)
    }

    /// Render `id` if its buffer size changed since the last commit.
    ///
    /// An image that fails to load degrades to the background color.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn render_output(&mut self, id: OutputId) -> BackdropResult<RenderOutcome> {
        let output = self
            .output(id)
            .cloned()
            .ok_or_else(|| BackdropError::validation(format!("unknown output {id:?}")))?;

        let size = output.buffer_size();
        size.ensure_non_empty("output buffer")?;
        if !output.needs_render() {
            if output.committed_scale != output.scale {
                self.output_mut(id)?.committed_scale = output.scale;
                return Ok(RenderOutcome::ScaleOnly {
                    scale: output.scale,
                });
            }
            return Ok(RenderOutcome::Unchanged);
        }

        let config = self.config_for(id).cloned().ok_or_else(|| {
            BackdropError::config(format!(
                "no config matches output {}",
                output.name.as_deref().unwrap_or("<unnamed>")
            ))
        })?;

        let image: Option<Arc<Image>> = config
            .image
            .as_deref()
            .and_then(|path| self.images.get_or_load(path));

        let format = self.choose_format(image.as_deref());
        let mut frame = Frame::alloc(size, format)?;
        let placement = match &image {
            Some(img) if config.mode.places_image() => Some(solve(
                img.width(),
                img.height(),
                size.width,
                size.height,
                config.mode,
            )?),
            _ => None,
        };
        {
            let mut canvas = frame.canvas()?;
            self.compositor.composite(
                &mut canvas,
                image.as_deref().map(|img| img as &dyn PixelSource),
                config.background(),
                placement.as_ref(),
                config.mode,
            )?;
        }

        let committed = self.output_mut(id)?;
        committed.committed_width = size.width;
        committed.committed_height = size.height;
        committed.committed_scale = output.scale;
        tracing::info!(
            output = output.name.as_deref().unwrap_or("<unnamed>"),
            size = %size,
            %format,
            mode = %config.mode,
            "rendered wallpaper"
        );
        Ok(RenderOutcome::Rendered { frame, placement })
    }

    /// Drop decoded images no output config references any more.
    pub fn prune_images(&mut self) {
        let keep = self.configs.image_paths();
        self.images.retain_paths(&keep);
    }
}

/// `make model serial` from a `make model serial (name)` output description.
pub fn identifier_from_description(description: &str) -> Option<String> {
    let (head, _) = description.rsplit_once('(')?;
    let identifier = head.trim_end();
    (!identifier.is_empty()).then(|| identifier.to_owned())
}

#[cfg(test)]
#[path = "../../tests/unit/session/engine.rs"]
mod tests;
