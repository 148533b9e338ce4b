use std::collections::VecDeque;
use std::fmt;

use crate::{
    foundation::core::{PremulRgbaF32, TRANSPARENT},
    foundation::error::{BackdropError, BackdropResult},
    layout::placement::Placement,
    surface::PixelSource,
};

/// Below this scale on either axis the compositor switches from bilinear to convolution.
pub const MINIFY_THRESHOLD: f64 = 0.75;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
/// Low-pass kernel used when minifying.
pub enum MinifyKernel {
    /// Tent kernel; area-averaging without ringing.
    #[default]
    Triangle,
    /// Windowed sinc with three lobes; sharper, may ring on hard edges.
    Lanczos3,
}

impl MinifyKernel {
    pub fn radius(self) -> f64 {
        match self {
            Self::Triangle => 1.0,
            Self::Lanczos3 => 3.0,
        }
    }

    pub fn weight(self, x: f64) -> f64 {
        let x = x.abs();
        match self {
            Self::Triangle => (1.0 - x).max(0.0),
            Self::Lanczos3 => {
                if x >= 3.0 {
                    0.0
                } else {
                    sinc(x) * sinc(x / 3.0)
                }
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Triangle => "triangle",
            Self::Lanczos3 => "lanczos3",
        }
    }
}

impl fmt::Display for MinifyKernel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for MinifyKernel {
    type Err = BackdropError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "triangle" | "tent" | "area" => Ok(Self::Triangle),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            other => Err(BackdropError::config(format!(
                "unknown minify kernel '{other}' (expected triangle or lanczos3)"
            ))),
        }
    }
}

fn sinc(x: f64) -> f64 {
    if x.abs() < 1e-9 {
        return 1.0;
    }
    let px = std::f64::consts::PI * x;
    px.sin() / px
}

/// Reconstruction filter for one render.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Filter {
    /// Bilinear interpolation; unit-scale axes fetch texels directly.
    Bilinear,
    /// Separable convolution, widened by `1 / scale` on minified axes.
    Convolution(MinifyKernel),
}

/// Bilinear when both scales are at least `threshold`, convolution otherwise.
pub fn select_filter(placement: &Placement, kernel: MinifyKernel, threshold: f64) -> Filter {
    if placement.scale_x >= threshold && placement.scale_y >= threshold {
        Filter::Bilinear
    } else {
        Filter::Convolution(kernel)
    }
}

/// Source taps `(index, weight)` for one destination index; `None` when the index is uncovered.
pub type Taps = Option<Vec<(u32, f32)>>;

/// Geometry of one axis of the destination-to-source mapping.
#[derive(Clone, Copy, Debug)]
pub struct AxisMapping {
    pub dst_len: u32,
    pub src_len: u32,
    pub scale: f64,
    pub translate: f64,
    pub repeat: bool,
}

impl AxisMapping {
    /// Source position of the centre of destination index `d`.
    #[inline]
    pub fn source_pos(&self, d: u32) -> f64 {
        (f64::from(d) + 0.5 - self.translate) / self.scale
    }

    fn covers(&self, u: f64) -> bool {
        self.repeat || (u >= 0.0 && u < f64::from(self.src_len))
    }

    fn resolve(&self, i: i64) -> u32 {
        let len = i64::from(self.src_len);
        if self.repeat {
            i.rem_euclid(len) as u32
        } else {
            i.clamp(0, len - 1) as u32
        }
    }
}

/// Precompute the taps of every destination index along one axis.
pub fn axis_taps(axis: AxisMapping, filter: Filter) -> BackdropResult<Vec<Taps>> {
    if axis.dst_len == 0 || axis.src_len == 0 {
        return Err(BackdropError::render("axis_taps expects non-empty axes"));
    }
    if !(axis.scale.is_finite() && axis.scale > 0.0) || !axis.translate.is_finite() {
        return Err(BackdropError::render(format!(
            "invalid axis transform: scale {}, translate {}",
            axis.scale, axis.translate
        )));
    }

    let (kernel, filter_scale) = match filter {
        Filter::Convolution(kernel) if axis.scale < 1.0 => (kernel, axis.scale),
        _ => (MinifyKernel::Triangle, 1.0),
    };
    let support = kernel.radius() / filter_scale;

    let mut out = Vec::with_capacity(axis.dst_len as usize);
    for d in 0..axis.dst_len {
        let u = axis.source_pos(d);
        if !axis.covers(u) {
            out.push(None);
            continue;
        }
        if axis.scale == 1.0 {
            out.push(Some(vec![(axis.resolve(u.floor() as i64), 1.0)]));
            continue;
        }

        // Texel centres sit at half-integers.
        let c = u - 0.5;
        let lo = (c - support).floor() as i64;
        let hi = (c + support).ceil() as i64;
        let mut taps: Vec<(u32, f64)> = Vec::with_capacity((hi - lo + 1) as usize);
        let mut sum = 0.0;
        for i in lo..=hi {
            let w = kernel.weight((i as f64 - c) * filter_scale);
            if w == 0.0 {
                continue;
            }
            sum += w;
            let idx = axis.resolve(i);
            // Clamped indices are monotonic, so duplicates can only be the previous tap.
            let existing = if axis.repeat {
                taps.iter_mut().find(|(j, _)| *j == idx)
            } else {
                taps.last_mut().filter(|(j, _)| *j == idx)
            };
            match existing {
                Some((_, acc)) => *acc += w,
                None => taps.push((idx, w)),
            }
        }

        if sum.abs() < 1e-12 {
            out.push(Some(vec![(axis.resolve(u.floor() as i64), 1.0)]));
            continue;
        }
        out.push(Some(
            taps.into_iter()
                .filter(|(_, w)| *w != 0.0)
                .map(|(i, w)| (i, (w / sum) as f32))
                .collect(),
        ));
    }
    Ok(out)
}

/// Horizontally filtered source rows, kept while consecutive destination rows still need them.
pub struct RowCache<'s> {
    source: &'s dyn PixelSource,
    x_taps: &'s [Taps],
    scratch: Vec<PremulRgbaF32>,
    rows: VecDeque<(u32, Vec<PremulRgbaF32>)>,
    capacity: usize,
}

impl<'s> RowCache<'s> {
    pub fn new(source: &'s dyn PixelSource, x_taps: &'s [Taps], capacity: usize) -> Self {
        Self {
            source,
            x_taps,
            scratch: vec![TRANSPARENT; source.size().width as usize],
            rows: VecDeque::with_capacity(capacity.max(1)),
            capacity: capacity.max(1),
        }
    }

    /// Filtered row for source row `sy`, one entry per destination column.
    pub fn row(&mut self, sy: u32) -> &[PremulRgbaF32] {
        let pos = match self.rows.iter().position(|(y, _)| *y == sy) {
            Some(pos) => pos,
            None => {
                let row = self.filter_row(sy);
                if self.rows.len() == self.capacity {
                    self.rows.pop_front();
                }
                self.rows.push_back((sy, row));
                self.rows.len() - 1
            }
        };
        &self.rows[pos].1
    }

    fn filter_row(&mut self, sy: u32) -> Vec<PremulRgbaF32> {
        self.source.texel_row(sy, &mut self.scratch);
        self.x_taps
            .iter()
            .map(|taps| match taps {
                None => TRANSPARENT,
                Some(taps) => {
                    let mut acc = [0.0f32; 4];
                    for &(sx, w) in taps {
                        let px = self.scratch[sx as usize];
                        for c in 0..4 {
                            acc[c] += px[c] * w;
                        }
                    }
                    acc
                }
            })
            .collect()
    }
}

/// Keep a filtered sample a valid premultiplied value after negative kernel lobes.
#[inline]
pub fn sanitize(px: PremulRgbaF32) -> PremulRgbaF32 {
    [
        px[0].max(0.0),
        px[1].max(0.0),
        px[2].max(0.0),
        px[3].clamp(0.0, 1.0),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/render/sample.rs"]
mod tests;
