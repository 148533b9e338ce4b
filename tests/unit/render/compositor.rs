use super::*;
use crate::foundation::core::Size;
use crate::render::sample::MinifyKernel;
use crate::surface::{canvas::Frame, format::OutputFormat};

const BLUE: Rgb8 = Rgb8::new(0, 0, 255);

fn solid_image(w: u32, h: u32, rgba: [u8; 4]) -> Image {
    let data = rgba.repeat((w * h) as usize);
    Image::from_rgba8(w, h, false, data).unwrap()
}

fn image_from_fn(w: u32, h: u32, f: impl Fn(u32, u32) -> [u8; 4]) -> Image {
    let mut data = Vec::with_capacity((w * h * 4) as usize);
    for y in 0..h {
        for x in 0..w {
            data.extend_from_slice(&f(x, y));
        }
    }
    Image::from_rgba8(w, h, false, data).unwrap()
}

fn render(
    image: Option<&Image>,
    size: Size,
    format: OutputFormat,
    mode: BackgroundMode,
    options: &RenderOptions,
) -> Frame {
    let mut frame = Frame::alloc(size, format).unwrap();
    {
        let mut canvas = frame.canvas().unwrap();
        paint(&mut canvas, image, BLUE, mode, options).unwrap();
    }
    frame
}

fn abgr(frame: &Frame, x: u32, y: u32) -> [u8; 4] {
    let i = (y * frame.stride + x * 4) as usize;
    [
        frame.data[i],
        frame.data[i + 1],
        frame.data[i + 2],
        frame.data[i + 3],
    ]
}

#[test]
fn fit_letterbox_columns_are_exactly_background() {
    let img = solid_image(50, 50, [255, 0, 0, 255]);
    let frame = render(
        Some(&img),
        Size::new(200, 100),
        OutputFormat::Argb8888,
        BackgroundMode::Fit,
        &RenderOptions::default(),
    );
    for y in 0..100 {
        for x in 0..200u32 {
            let i = (y * frame.stride + x * 4) as usize;
            let px = &frame.data[i..i + 4];
            if (50..150).contains(&x) {
                assert_eq!(px, &[0, 0, 255, 255], "image at ({x},{y})");
            } else {
                assert_eq!(px, &[255, 0, 0, 255], "background at ({x},{y})");
            }
        }
    }
}

#[test]
fn solid_color_ignores_the_image_and_is_opaque() {
    let img = solid_image(4, 4, [255, 255, 255, 255]);
    let frame = render(
        Some(&img),
        Size::new(3, 2),
        OutputFormat::Argb8888,
        BackgroundMode::SolidColor,
        &RenderOptions::default(),
    );
    assert_eq!(frame.data, [255u8, 0, 0, 255].repeat(6));

    let invalid = render(
        Some(&img),
        Size::new(3, 2),
        OutputFormat::Argb8888,
        BackgroundMode::Invalid,
        &RenderOptions::default(),
    );
    assert_eq!(invalid, frame);
}

#[test]
fn missing_image_paints_background_only() {
    let frame = render(
        None,
        Size::new(2, 2),
        OutputFormat::Abgr8888,
        BackgroundMode::Fill,
        &RenderOptions::default(),
    );
    assert_eq!(frame.data, [0u8, 0, 255, 255].repeat(4));
}

#[test]
fn tile_repeats_with_the_image_period() {
    let img = image_from_fn(3, 2, |x, y| [x as u8 * 40, y as u8 * 100, 7, 255]);
    let frame = render(
        Some(&img),
        Size::new(7, 5),
        OutputFormat::Abgr8888,
        BackgroundMode::Tile,
        &RenderOptions::default(),
    );
    for y in 0..5 {
        for x in 0..7 {
            assert_eq!(
                abgr(&frame, x, y),
                [(x % 3) as u8 * 40, (y % 2) as u8 * 100, 7, 255]
            );
        }
    }
}

#[test]
fn oversized_center_crops_symmetrically() {
    let img = image_from_fn(4, 4, |x, y| [x as u8 * 50, y as u8 * 50, 0, 255]);
    let frame = render(
        Some(&img),
        Size::new(2, 2),
        OutputFormat::Abgr8888,
        BackgroundMode::Center,
        &RenderOptions::default(),
    );
    assert_eq!(abgr(&frame, 0, 0), [50, 50, 0, 255]);
    assert_eq!(abgr(&frame, 1, 1), [100, 100, 0, 255]);
}

#[test]
fn fill_leaves_no_background_visible() {
    let img = solid_image(30, 10, [0, 255, 0, 255]);
    let frame = render(
        Some(&img),
        Size::new(16, 16),
        OutputFormat::Abgr8888,
        BackgroundMode::Fill,
        &RenderOptions::default(),
    );
    for px in frame.data.chunks_exact(4) {
        assert_eq!(px, &[0, 255, 0, 255]);
    }
}

#[test]
fn translucent_pixels_blend_over_the_background() {
    let img = solid_image(1, 1, [255, 0, 0, 128]);
    let frame = render(
        Some(&img),
        Size::new(1, 1),
        OutputFormat::Abgr8888,
        BackgroundMode::Stretch,
        &RenderOptions::default(),
    );
    assert_eq!(frame.data, vec![128, 0, 127, 255]);
}

#[test]
fn minified_checkerboard_averages_to_grey() {
    let img = image_from_fn(64, 64, |x, y| {
        let v = if (x + y) % 2 == 0 { 255 } else { 0 };
        [v, v, v, 255]
    });
    for kernel in [MinifyKernel::Triangle, MinifyKernel::Lanczos3] {
        let options = RenderOptions {
            minify_kernel: kernel,
            ..RenderOptions::default()
        };
        let frame = render(
            Some(&img),
            Size::new(8, 8),
            OutputFormat::Abgr8888,
            BackgroundMode::Stretch,
            &options,
        );
        for px in frame.data.chunks_exact(4) {
            for &c in &px[..3] {
                assert!((118..=138).contains(&c), "{kernel}: {px:?}");
            }
            assert_eq!(px[3], 255);
        }
    }
}

#[test]
fn rerendering_is_byte_identical() {
    let img = image_from_fn(97, 61, |x, y| {
        [(x * 3) as u8, (y * 4) as u8, ((x ^ y) * 5) as u8, (128 + x) as u8]
    });
    let options = RenderOptions::default();
    for mode in [BackgroundMode::Fill, BackgroundMode::Fit, BackgroundMode::Center] {
        let a = render(
            Some(&img),
            Size::new(40, 23),
            OutputFormat::Abgr16161616F,
            mode,
            &options,
        );
        let b = render(
            Some(&img),
            Size::new(40, 23),
            OutputFormat::Abgr16161616F,
            mode,
            &options,
        );
        assert_eq!(a, b, "{mode}");
    }
}

#[test]
fn half_float_canvas_holds_the_background() {
    let frame = render(
        None,
        Size::new(2, 1),
        OutputFormat::Abgr16161616F,
        BackgroundMode::SolidColor,
        &RenderOptions::default(),
    );
    let halves: Vec<u16> = frame
        .data
        .chunks_exact(2)
        .map(|b| u16::from_le_bytes([b[0], b[1]]))
        .collect();
    assert_eq!(halves, vec![0, 0, 0x3C00, 0x3C00, 0, 0, 0x3C00, 0x3C00]);
}

struct Empty;

impl PixelSource for Empty {
    fn size(&self) -> Size {
        Size::new(0, 0)
    }

    fn texel(&self, _x: u32, _y: u32) -> PremulRgbaF32 {
        TRANSPARENT
    }
}

#[test]
fn zero_sized_source_is_rejected_without_painting() {
    let mut frame = Frame::alloc(Size::new(2, 2), OutputFormat::Argb8888).unwrap();
    let mut canvas = frame.canvas().unwrap();
    let err = Compositor::default()
        .composite(&mut canvas, Some(&Empty), BLUE, None, BackgroundMode::Fit)
        .unwrap_err();
    assert!(err.to_string().contains("image"));
    drop(canvas);
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn explicit_placement_overrides_the_mode_geometry() {
    let img = solid_image(2, 2, [255, 255, 255, 255]);
    let placement = Placement {
        translate_x: 2.0,
        ..Placement::IDENTITY
    };
    let mut frame = Frame::alloc(Size::new(4, 2), OutputFormat::Abgr8888).unwrap();
    {
        let mut canvas = frame.canvas().unwrap();
        Compositor::default()
            .composite(
                &mut canvas,
                Some(&img),
                BLUE,
                Some(&placement),
                BackgroundMode::Center,
            )
            .unwrap();
    }
    assert_eq!(abgr(&frame, 1, 0), [0, 0, 255, 255]);
    assert_eq!(abgr(&frame, 2, 0), [255, 255, 255, 255]);
}
