use crate::{
    config::options::RenderOptions,
    foundation::core::{PremulRgbaF32, Rgb8, TRANSPARENT},
    foundation::error::BackdropResult,
    layout::placement::{BackgroundMode, Placement, solve},
    render::composite::over_row_in_place,
    render::sample::{AxisMapping, RowCache, axis_taps, sanitize, select_filter},
    surface::{PixelSource, canvas::Canvas, image::Image},
};

/// CPU compositor: background fill, resample, source-over, encode.
#[derive(Clone, Debug, Default)]
pub struct Compositor {
    options: RenderOptions,
}

impl Compositor {
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &RenderOptions {
        &self.options
    }

    /// Paint `canvas` with `background` and, for image modes, `image` placed by `placement`.
    ///
    /// Without an image, or for solid color and invalid modes, the canvas is the flat background.
    /// A missing placement is solved from the image and canvas sizes. A zero-sized image is a
    /// contract violation: the canvas is left untouched and an error returned.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(canvas = %canvas.size(), format = %canvas.format(), %mode)
    )]
    pub fn composite(
        &self,
        canvas: &mut Canvas<'_>,
        image: Option<&dyn PixelSource>,
        background: Rgb8,
        placement: Option<&Placement>,
        mode: BackgroundMode,
    ) -> BackdropResult<()> {
        let image = image.filter(|_| mode.places_image());
        if let Some(image) = image {
            image.size().ensure_non_empty("image")?;
        }

        let bg = background.to_premul_f32();
        canvas.fill(bg);
        let Some(image) = image else {
            return Ok(());
        };

        let size = canvas.size();
        let src = image.size();
        let solved;
        let placement = match placement {
            Some(p) => p,
            None => {
                solved = solve(src.width, src.height, size.width, size.height, mode)?;
                &solved
            }
        };

        let filter = select_filter(
            placement,
            self.options.minify_kernel,
            self.options.minify_threshold,
        );
        tracing::debug!(
            ?filter,
            ?placement,
            rect = ?placement.image_rect(src),
            "compositing image layer"
        );

        let x_taps = axis_taps(
            AxisMapping {
                dst_len: size.width,
                src_len: src.width,
                scale: placement.scale_x,
                translate: placement.translate_x,
                repeat: placement.repeat,
            },
            filter,
        )?;
        let y_taps = axis_taps(
            AxisMapping {
                dst_len: size.height,
                src_len: src.height,
                scale: placement.scale_y,
                translate: placement.translate_y,
                repeat: placement.repeat,
            },
            filter,
        )?;

        let window = y_taps.iter().flatten().map(Vec::len).max().unwrap_or(1);
        let mut cache = RowCache::new(image, &x_taps, window + 1);
        let mut layer: Vec<PremulRgbaF32> = vec![TRANSPARENT; size.width as usize];
        let mut row: Vec<PremulRgbaF32> = vec![bg; size.width as usize];

        for (y, taps) in y_taps.iter().enumerate() {
            // Uncovered rows keep the background written by the fill.
            let Some(taps) = taps else {
                continue;
            };
            layer.fill(TRANSPARENT);
            for &(sy, wy) in taps {
                for (acc, px) in layer.iter_mut().zip(cache.row(sy)) {
                    for c in 0..4 {
                        acc[c] += px[c] * wy;
                    }
                }
            }
            for px in &mut layer {
                *px = sanitize(*px);
            }
            row.fill(bg);
            over_row_in_place(&mut row, &layer)?;
            canvas.write_row(y as u32, &row)?;
        }
        Ok(())
    }
}

/// Solve and composite in one call. Returns the placement used, if an image was drawn.
pub fn paint(
    canvas: &mut Canvas<'_>,
    image: Option<&Image>,
    background: Rgb8,
    mode: BackgroundMode,
    options: &RenderOptions,
) -> BackdropResult<Option<Placement>> {
    let size = canvas.size();
    let placement = match image {
        Some(img) if mode.places_image() => Some(solve(
            img.width(),
            img.height(),
            size.width,
            size.height,
            mode,
        )?),
        _ => None,
    };
    Compositor::new(options.clone()).composite(
        canvas,
        image.map(|img| img as &dyn PixelSource),
        background,
        placement.as_ref(),
        mode,
    )?;
    Ok(placement)
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
