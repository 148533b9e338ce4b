//! Backdrop is a wallpaper placement and compositing engine.
//!
//! Given a decoded image, an output size, a display mode and a background color, it computes
//! where the image goes and paints the output buffer in the format the presentation layer asked
//! for.
//!
//! # Pipeline overview
//!
//! 1. **Decode** (optional): file bytes -> [`Image`] via [`load_image`], cached by [`ImageStore`]
//! 2. **Solve**: `(image size, canvas size, mode) -> Placement` via [`solve`]
//! 3. **Composite**: background fill, resample, source-over into a premultiplied f32 row
//! 4. **Encode**: each row is packed into the [`Canvas`] format (8-bit, 10-bit or half-float)
//!
//! [`Engine`] ties these together per output and skips renders whose buffer size did not
//! change.
//!
//! Design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure core**: solving and compositing do no I/O and are deterministic.
//! - **Never blank**: decode failures and bad config values degrade to the background color.
#![forbid(unsafe_code)]

/// Image decoding and caching.
pub mod assets;
/// CICP color tags and transfer functions.
pub mod color;
/// Colors, output configs and render options.
pub mod config;
/// Pixel representation conversions.
pub mod convert;
/// Core value types and errors.
pub mod foundation;
/// Placement solving.
pub mod layout;
/// Compositing.
pub mod render;
/// Long-lived render state.
pub mod session;
/// Source images and destination canvases.
pub mod surface;

pub use assets::decode::{ImageKind, decode_image, load_image};
pub use assets::store::ImageStore;
pub use color::cicp::ColorInfo;
pub use config::color::{is_valid_color, parse_color};
pub use config::options::RenderOptions;
pub use config::output::{ConfigSet, OutputConfig};
pub use foundation::core::{PremulRgbaF32, Rgb8, Size};
pub use foundation::error::{BackdropError, BackdropResult};
pub use layout::placement::{BackgroundMode, Placement, solve};
pub use render::compositor::{Compositor, paint};
pub use render::sample::MinifyKernel;
pub use session::engine::{Engine, OutputId, OutputState, RenderOutcome};
pub use surface::PixelSource;
pub use surface::canvas::{Canvas, Frame};
pub use surface::format::{OutputFormat, PixelFormat};
pub use surface::image::Image;
