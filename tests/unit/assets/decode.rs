use std::io::Cursor;

use super::*;
use crate::color::transfer::srgb_encode;
use crate::surface::{PixelSource, format::PixelFormat};

fn encode(img: DynamicImage, format: ImageFormat) -> Vec<u8> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), format).unwrap();
    buf
}

#[test]
fn decode_png_dimensions_and_premul() {
    let src = image::RgbaImage::from_raw(1, 1, vec![100u8, 50u8, 200u8, 128u8]).unwrap();
    let buf = encode(DynamicImage::ImageRgba8(src), ImageFormat::Png);

    let img = decode_image(&buf, Some(ImageKind::Raster(ImageFormat::Png))).unwrap();
    assert_eq!((img.width(), img.height()), (1, 1));
    assert_eq!(
        img.format(),
        PixelFormat::Rgba8 {
            premultiplied: true
        }
    );
    assert_eq!(
        img.data(),
        &[
            ((100u16 * 128 + 127) / 255) as u8,
            ((50u16 * 128 + 127) / 255) as u8,
            ((200u16 * 128 + 127) / 255) as u8,
            128u8
        ]
    );
}

#[test]
fn sixteen_bit_png_keeps_precision() {
    let src = image::ImageBuffer::<image::Rgba<u16>, _>::from_raw(1, 1, vec![65535u16, 32768, 1, 65535])
        .unwrap();
    let buf = encode(DynamicImage::ImageRgba16(src), ImageFormat::Png);

    let img = decode_image(&buf, None).unwrap();
    assert!(img.format().is_high_bit_depth());
    assert_eq!(img.color(), ColorInfo::SRGB);
    let px = img.texel(0, 0);
    assert!((px[1] - 32768.0 / 65535.0).abs() < 1e-6);
    assert!((px[2] - 1.0 / 65535.0).abs() < 1e-9);
}

#[test]
fn exr_is_linear_and_gets_encoded() {
    let src = image::Rgba32FImage::from_raw(1, 1, vec![0.18f32, 1.0, 2.5, 1.0]).unwrap();
    let buf = encode(DynamicImage::ImageRgba32F(src), ImageFormat::OpenExr);

    let img = decode_image(&buf, Some(ImageKind::Raster(ImageFormat::OpenExr))).unwrap();
    assert!(img.format().is_high_bit_depth());
    assert!(!img.color().is_linear());
    let px = img.texel(0, 0);
    assert!((px[0] - srgb_encode(0.18)).abs() < 1e-4);
    assert!(px[2] > 1.0, "HDR headroom lost: {px:?}");
}

#[test]
fn svg_is_rasterized_at_intrinsic_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="3" height="2"><rect width="3" height="2" fill="#00ff00"/></svg>"##;
    let img = decode_image(svg, Some(ImageKind::Svg)).unwrap();
    assert_eq!((img.width(), img.height()), (3, 2));
    assert_eq!(img.texel(1, 1), [0.0, 1.0, 0.0, 1.0]);

    // Sniffed without an extension.
    let sniffed = decode_image(svg, None).unwrap();
    assert_eq!(sniffed, img);
}

#[test]
fn kind_follows_the_extension() {
    let cases = [
        ("a.PNG", Some(ImageKind::Raster(ImageFormat::Png))),
        ("a.jpeg", Some(ImageKind::Raster(ImageFormat::Jpeg))),
        ("a.exr", Some(ImageKind::Raster(ImageFormat::OpenExr))),
        ("a.tif", Some(ImageKind::Raster(ImageFormat::Tiff))),
        ("a.ppm", Some(ImageKind::Raster(ImageFormat::Pnm))),
        ("dir/a.svg", Some(ImageKind::Svg)),
        ("a.bmpx", None),
        ("noext", None),
    ];
    for (path, kind) in cases {
        assert_eq!(ImageKind::from_path(Path::new(path)), kind, "{path}");
    }
}

#[test]
fn garbage_is_a_decode_error() {
    let err = decode_image(b"definitely not an image", None).unwrap_err();
    assert!(matches!(err, BackdropError::Decode(_)));
    assert!(decode_image(b"\x89PNG\r\n\x1a\n", None).is_err());
}

#[test]
fn missing_file_names_the_path() {
    let err = load_image(Path::new("/no/such/wallpaper.png")).unwrap_err();
    assert!(format!("{err:#}").contains("/no/such/wallpaper.png"));
}
