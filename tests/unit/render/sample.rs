use super::*;
use crate::foundation::core::Size;
use crate::layout::placement::{BackgroundMode, solve};

fn axis(dst_len: u32, src_len: u32, scale: f64, translate: f64, repeat: bool) -> AxisMapping {
    AxisMapping {
        dst_len,
        src_len,
        scale,
        translate,
        repeat,
    }
}

fn indices(taps: &Taps) -> Vec<u32> {
    taps.as_ref()
        .map(|t| t.iter().map(|(i, _)| *i).collect())
        .unwrap_or_default()
}

/// Grey ramp, one distinct value per column.
struct Ramp {
    width: u32,
    height: u32,
}

impl PixelSource for Ramp {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    fn texel(&self, x: u32, y: u32) -> PremulRgbaF32 {
        let v = (x + y * self.width) as f32;
        [v, v, v, 1.0]
    }
}

#[test]
fn threshold_picks_the_filter() {
    let up = solve(10, 10, 40, 40, BackgroundMode::Stretch).unwrap();
    assert_eq!(
        select_filter(&up, MinifyKernel::Triangle, MINIFY_THRESHOLD),
        Filter::Bilinear
    );

    let mild = solve(100, 100, 75, 75, BackgroundMode::Stretch).unwrap();
    assert_eq!(
        select_filter(&mild, MinifyKernel::Triangle, MINIFY_THRESHOLD),
        Filter::Bilinear
    );

    let one_axis = solve(100, 100, 200, 74, BackgroundMode::Stretch).unwrap();
    assert_eq!(
        select_filter(&one_axis, MinifyKernel::Lanczos3, MINIFY_THRESHOLD),
        Filter::Convolution(MinifyKernel::Lanczos3)
    );
}

#[test]
fn bilinear_taps_clamp_to_the_edge() {
    let taps = axis_taps(axis(4, 2, 2.0, 0.0, false), Filter::Bilinear).unwrap();
    assert_eq!(taps[0], Some(vec![(0, 1.0)]));
    assert_eq!(taps[1], Some(vec![(0, 0.75), (1, 0.25)]));
    assert_eq!(taps[3], Some(vec![(1, 1.0)]));
}

#[test]
fn pixels_outside_the_image_are_uncovered() {
    // 50px source at scale 2 offset by 50 in a 200px row.
    let taps = axis_taps(axis(200, 50, 2.0, 50.0, false), Filter::Bilinear).unwrap();
    assert!(taps[..50].iter().all(Option::is_none));
    assert!(taps[50..150].iter().all(Option::is_some));
    assert!(taps[150..].iter().all(Option::is_none));
}

#[test]
fn unit_scale_fetches_texels_directly() {
    let taps = axis_taps(axis(20, 4, 1.0, 10.5, false), Filter::Bilinear).unwrap();
    assert_eq!(taps[9], None);
    assert_eq!(taps[10], Some(vec![(0, 1.0)]));
    assert_eq!(taps[13], Some(vec![(3, 1.0)]));
    assert_eq!(taps[14], None);
}

#[test]
fn repeat_wraps_around_the_source() {
    let taps = axis_taps(axis(7, 3, 1.0, 0.0, true), Filter::Bilinear).unwrap();
    let flat: Vec<u32> = taps.iter().flat_map(indices).collect();
    assert_eq!(flat, vec![0, 1, 2, 0, 1, 2, 0]);
}

#[test]
fn minified_taps_widen_and_normalize() {
    let taps = axis_taps(
        axis(4, 8, 0.5, 0.0, false),
        Filter::Convolution(MinifyKernel::Triangle),
    )
    .unwrap();
    let t = taps[1].as_ref().unwrap();
    assert_eq!(indices(&taps[1]), vec![1, 2, 3, 4]);
    let weights: Vec<f32> = t.iter().map(|(_, w)| *w).collect();
    assert_eq!(weights, vec![0.125, 0.375, 0.375, 0.125]);

    for taps in taps.iter().flatten() {
        let sum: f32 = taps.iter().map(|(_, w)| w).sum();
        assert!((sum - 1.0).abs() < 1e-6);
    }
}

#[test]
fn upscaled_axis_stays_bilinear_under_convolution() {
    let conv = axis_taps(
        axis(8, 4, 2.0, 0.0, false),
        Filter::Convolution(MinifyKernel::Lanczos3),
    )
    .unwrap();
    let bilinear = axis_taps(axis(8, 4, 2.0, 0.0, false), Filter::Bilinear).unwrap();
    assert_eq!(conv, bilinear);
}

#[test]
fn degenerate_axes_are_rejected() {
    assert!(axis_taps(axis(0, 4, 1.0, 0.0, false), Filter::Bilinear).is_err());
    assert!(axis_taps(axis(4, 4, 0.0, 0.0, false), Filter::Bilinear).is_err());
    assert!(axis_taps(axis(4, 4, 1.0, f64::NAN, false), Filter::Bilinear).is_err());
}

#[test]
fn lanczos_is_interpolating() {
    let k = MinifyKernel::Lanczos3;
    assert!((k.weight(0.0) - 1.0).abs() < 1e-12);
    assert!(k.weight(1.0).abs() < 1e-12);
    assert!(k.weight(2.0).abs() < 1e-12);
    assert_eq!(k.weight(3.0), 0.0);
    assert!(k.weight(1.5) < 0.0);
}

#[test]
fn kernel_names_parse() {
    assert_eq!("lanczos3".parse::<MinifyKernel>().unwrap(), MinifyKernel::Lanczos3);
    assert_eq!(" Triangle ".parse::<MinifyKernel>().unwrap(), MinifyKernel::Triangle);
    assert!("bicubic".parse::<MinifyKernel>().is_err());
}

#[test]
fn row_cache_filters_and_evicts() {
    let src = Ramp {
        width: 4,
        height: 3,
    };
    let x_taps: Vec<Taps> = vec![Some(vec![(0, 0.5), (1, 0.5)]), None, Some(vec![(3, 1.0)])];
    let mut cache = RowCache::new(&src, &x_taps, 1);
    assert_eq!(
        cache.row(0),
        &[[0.5, 0.5, 0.5, 1.0], TRANSPARENT, [3.0, 3.0, 3.0, 1.0]]
    );
    assert_eq!(cache.row(2)[2], [11.0, 11.0, 11.0, 1.0]);
    assert_eq!(cache.rows.len(), 1);
    assert_eq!(cache.row(0)[0], [0.5, 0.5, 0.5, 1.0]);
}

#[test]
fn sanitize_clears_negative_lobes() {
    assert_eq!(
        sanitize([-0.1, 0.5, 1.5, 1.2]),
        [0.0, 0.5, 1.5, 1.0]
    );
}
