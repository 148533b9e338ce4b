use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use backdrop::{
    BackgroundMode, ConfigSet, Engine, Frame, OutputConfig, OutputFormat, RenderOptions,
    RenderOutcome, Size, config::color::parse_color_or_white, convert::adapter::unpremultiply,
};

#[derive(Parser, Debug)]
#[command(name = "backdrop", version)]
struct Cli {
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Render one canvas to an image file.
    Render(RenderArgs),
    /// Print the solved placement as JSON.
    Placement(PlacementArgs),
    /// Render the wallpaper an output config file assigns to one output.
    Outputs(OutputsArgs),
}

#[derive(Parser, Debug)]
struct RenderArgs {
    /// Logical canvas width.
    #[arg(long)]
    width: u32,

    /// Logical canvas height.
    #[arg(long)]
    height: u32,

    /// Integer buffer scale.
    #[arg(long, default_value_t = 1)]
    scale: u32,

    /// Image to place.
    #[arg(short = 'i', long)]
    image: Option<PathBuf>,

    /// Placement mode: stretch, fill, fit, center, tile or solid_color. Unknown modes are
    /// logged and replaced by stretch with an image, solid_color without.
    #[arg(short = 'm', long)]
    mode: Option<String>,

    /// Background color as `#rrggbb`.
    #[arg(short = 'c', long)]
    color: Option<String>,

    /// Buffer format.
    #[arg(long, value_enum, default_value_t = FormatChoice::Argb8888)]
    format: FormatChoice,

    /// Output path: PNG for 8-bit and 10-bit formats, OpenEXR for half-float.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct PlacementArgs {
    /// Image size as `WxH`.
    #[arg(long, value_parser = parse_size)]
    image_size: Size,

    /// Canvas size as `WxH`.
    #[arg(long, value_parser = parse_size)]
    canvas_size: Size,

    /// Placement mode: stretch, fill, fit, center or tile.
    #[arg(short = 'm', long)]
    mode: String,
}

#[derive(Parser, Debug)]
struct OutputsArgs {
    /// JSON list of output configs.
    #[arg(long)]
    config: PathBuf,

    /// Output name, e.g. `DP-1`.
    #[arg(long)]
    output: String,

    /// Output description (`make model serial (name)`), used for identifier matching.
    #[arg(long)]
    description: Option<String>,

    #[arg(long)]
    width: u32,

    #[arg(long)]
    height: u32,

    #[arg(long, default_value_t = 1)]
    scale: u32,

    /// Accept half-float buffers for high bit depth images.
    #[arg(long)]
    half_float: bool,

    /// Directory the rendered file is written to.
    #[arg(long)]
    out: PathBuf,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum FormatChoice {
    Argb8888,
    Xrgb8888,
    Abgr8888,
    Argb2101010,
    Xrgb2101010,
    Abgr16161616f,
}

impl From<FormatChoice> for OutputFormat {
    fn from(choice: FormatChoice) -> Self {
        match choice {
            FormatChoice::Argb8888 => Self::Argb8888,
            FormatChoice::Xrgb8888 => Self::Xrgb8888,
            FormatChoice::Abgr8888 => Self::Abgr8888,
            FormatChoice::Argb2101010 => Self::Argb2101010,
            FormatChoice::Xrgb2101010 => Self::Xrgb2101010,
            FormatChoice::Abgr16161616f => Self::Abgr16161616F,
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Render(args) => cmd_render(args),
        Command::Placement(args) => cmd_placement(args),
        Command::Outputs(args) => cmd_outputs(args),
    }
}

fn parse_size(s: &str) -> Result<Size, String> {
    s.parse::<Size>().map_err(|e| e.to_string())
}

fn cmd_render(args: RenderArgs) -> anyhow::Result<()> {
    let mut config = OutputConfig::new("*");
    if let Some(image) = args.image {
        config = config.with_image(image);
    }
    if let Some(color) = args.color.as_deref() {
        if !backdrop::is_valid_color(color) {
            tracing::error!(color, "not a valid color, expected #rrggbb");
        }
        config = config.with_color(parse_color_or_white(color));
    }
    if let Some(mode) = args.mode.as_deref() {
        config = config.with_mode(BackgroundMode::parse(mode));
    }

    let mut configs = ConfigSet::new();
    configs.store(config);
    configs.finalize();
    let config = configs
        .iter()
        .next()
        .cloned()
        .context("nothing to render: pass --image and/or --color")?;

    let image = match config.image.as_deref() {
        Some(path) => match backdrop::load_image(path) {
            Ok(image) => Some(image),
            Err(err) => {
                tracing::error!(path = %path.display(), %err, "failed to load image");
                None
            }
        },
        None => None,
    };

    if args.scale == 0 {
        anyhow::bail!("--scale must be at least 1");
    }
    let size = Size::new(
        args.width.saturating_mul(args.scale),
        args.height.saturating_mul(args.scale),
    );
    let mut frame = Frame::alloc(size, args.format.into())?;
    let placement = {
        let mut canvas = frame.canvas()?;
        backdrop::paint(
            &mut canvas,
            image.as_ref(),
            config.background(),
            config.mode,
            &RenderOptions::from_env(),
        )?
    };
    if let Some(placement) = placement {
        tracing::debug!(?placement, "placed image");
    }

    write_frame(&frame, &args.out)?;
    eprintln!("wrote {}", args.out.display());
    Ok(())
}

fn cmd_placement(args: PlacementArgs) -> anyhow::Result<()> {
    let placement = backdrop::solve(
        args.image_size.width,
        args.image_size.height,
        args.canvas_size.width,
        args.canvas_size.height,
        BackgroundMode::parse(&args.mode),
    )?;
    println!("{}", serde_json::to_string_pretty(&placement)?);
    Ok(())
}

fn cmd_outputs(args: OutputsArgs) -> anyhow::Result<()> {
    let configs = ConfigSet::load(&args.config)?;
    let mut engine = Engine::new(configs, RenderOptions::from_env());
    engine.advertise_format(OutputFormat::Argb8888);
    if args.half_float {
        engine.advertise_format(OutputFormat::Abgr16161616F);
    }

    let id = engine.add_output(Some(&args.output), None);
    if let Some(description) = args.description.as_deref() {
        engine.set_output_description(id, description)?;
    }
    engine.configure_output(id, args.width, args.height, args.scale)?;

    match engine.render_output(id)? {
        RenderOutcome::Rendered { frame, .. } => {
            let ext = if frame.format == OutputFormat::Abgr16161616F {
                "exr"
            } else {
                "png"
            };
            let out = args.out.join(format!("{}.{ext}", args.output));
            write_frame(&frame, &out)?;
            eprintln!("wrote {}", out.display());
        }
        other => tracing::info!(?other, "nothing to write"),
    }
    Ok(())
}

fn write_frame(frame: &Frame, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }

    let straight: Vec<[f32; 4]> = frame.to_premul_f32()?.into_iter().map(unpremultiply).collect();
    let (w, h) = (frame.width, frame.height);

    let result = match frame.format {
        OutputFormat::Abgr16161616F => {
            // EXR stores linear light.
            let data: Vec<f32> = straight
                .iter()
                .flat_map(|&[r, g, b, a]| {
                    [
                        backdrop::color::transfer::srgb_decode(r),
                        backdrop::color::transfer::srgb_decode(g),
                        backdrop::color::transfer::srgb_decode(b),
                        a,
                    ]
                })
                .collect();
            let buf = image::Rgba32FImage::from_raw(w, h, data).context("frame buffer size")?;
            image::DynamicImage::ImageRgba32F(buf).save_with_format(path, image::ImageFormat::OpenExr)
        }
        OutputFormat::Argb2101010 | OutputFormat::Xrgb2101010 => {
            let data: Vec<u16> = channels(&straight, frame.format)
                .map(|v| (v.clamp(0.0, 1.0) * 65535.0).round() as u16)
                .collect();
            let img = if frame.format.has_alpha() {
                image::ImageBuffer::<image::Rgba<u16>, _>::from_raw(w, h, data)
                    .map(image::DynamicImage::ImageRgba16)
            } else {
                image::ImageBuffer::<image::Rgb<u16>, _>::from_raw(w, h, data)
                    .map(image::DynamicImage::ImageRgb16)
            };
            img.context("frame buffer size")?
                .save_with_format(path, image::ImageFormat::Png)
        }
        OutputFormat::Argb8888 | OutputFormat::Xrgb8888 | OutputFormat::Abgr8888 => {
            let data: Vec<u8> = channels(&straight, frame.format)
                .map(backdrop::convert::adapter::unit_to_u8)
                .collect();
            let color = if frame.format.has_alpha() {
                image::ColorType::Rgba8
            } else {
                image::ColorType::Rgb8
            };
            image::save_buffer_with_format(path, &data, w, h, color, image::ImageFormat::Png)
        }
    };
    result.with_context(|| format!("write '{}'", path.display()))
}

/// Straight-alpha channel values in RGB(A) order; formats without alpha drop the fourth channel.
fn channels(px: &[[f32; 4]], format: OutputFormat) -> impl Iterator<Item = f32> + '_ {
    let n = if format.has_alpha() { 4 } else { 3 };
    px.iter().flat_map(move |p| p[..n].iter().copied())
}
