use std::io::Write;

use crate::{
    downtime::{TimeOfDay, is_downtime},
    error::{OverlayError, OverlayResult},
    model::OverlayConfig,
    raster::{Frame, ScaleMode},
    text::{self, FontFace},
};

/// Composes the output frame for `cfg`, reading the current time from `clock`.
///
/// This is the primary one-shot API for producing pixels from an
/// [`OverlayConfig`]. Stage order and failure policy:
/// 1. The watermark frame loads first; failure is fatal.
/// 2. The downtime frame loads whenever a path is configured, independent of
///    the scheduling flag, so it can back the source-failure fallback.
///    Failure is fatal.
/// 3. The webcam frame loads last; its failure is recoverable only when a
///    downtime frame is present, in which case the downtime frame becomes the
///    sole content of the output.
///
/// The downtime window is evaluated exactly once per call, so a render cannot
/// straddle a window boundary between stages.
#[tracing::instrument(skip(cfg, clock))]
pub fn compose_at<C>(cfg: &OverlayConfig, clock: C) -> OverlayResult<Frame>
where
    C: Fn() -> TimeOfDay,
{
    cfg.validate()?;

    let watermark = match (cfg.watermark_enabled, &cfg.watermark_image_path) {
        (true, Some(path)) => Some(Frame::open(path)?),
        _ => None,
    };

    let downtime_image = match &cfg.downtime_image_path {
        Some(path) => Some(Frame::open(path)?),
        None => None,
    };

    let webcam = match Frame::open(&cfg.webcam_image_path) {
        Ok(frame) => Some(frame),
        Err(err) => {
            if downtime_image.is_none() {
                return Err(err);
            }
            tracing::warn!(
                path = %cfg.webcam_image_path.display(),
                error = %err,
                "webcam image failed to load, rendering the downtime image instead"
            );
            None
        }
    };

    let (width, height) = if let Some(webcam) = &webcam {
        scaled_dimensions(webcam.width(), webcam.height(), cfg.output_scale)
    } else if let Some(downtime) = &downtime_image {
        (downtime.width(), downtime.height())
    } else {
        return Err(OverlayError::render("no source image available"));
    };
    let mut canvas = Frame::blank(width, height)?;

    let now = clock();
    let downtime_active = match (cfg.downtime_start, cfg.downtime_end) {
        (Some(start), Some(end)) => is_downtime(cfg.downtime_enabled, now, start, end),
        _ => false,
    };
    tracing::debug!(%now, downtime_active, width, height, "composing output frame");

    if let Some(webcam) = &webcam {
        canvas.merge(webcam, 0, 0, ScaleMode::ToFill);

        if !downtime_active {
            if cfg.info_text_enabled
                && let Some(font_path) = &cfg.info_text_font_path
            {
                let font = FontFace::load(font_path)?;
                let caption = text::caption(webcam.modified(), &cfg.info_text_content);
                if cfg.info_text_border_enabled {
                    text::draw_text_bordered(
                        &mut canvas,
                        cfg.info_text_x,
                        cfg.info_text_y,
                        &caption,
                        &font,
                        cfg.info_text_font_size_px,
                        cfg.info_text_color,
                        cfg.info_text_border_color,
                    );
                } else {
                    text::draw_text(
                        &mut canvas,
                        cfg.info_text_x,
                        cfg.info_text_y,
                        &caption,
                        &font,
                        cfg.info_text_font_size_px,
                        cfg.info_text_color,
                    );
                }
            }

            if cfg.watermark_enabled
                && let Some(watermark) = &watermark
            {
                let (x, y) = cfg.watermark_position.resolve(
                    canvas.width(),
                    canvas.height(),
                    watermark.width(),
                    watermark.height(),
                );
                canvas.merge(watermark, x, y, ScaleMode::None);
            }
        }
    }

    if (downtime_active || webcam.is_none())
        && let Some(downtime) = &downtime_image
    {
        let (x, y) = cfg.downtime_position.resolve(
            canvas.width(),
            canvas.height(),
            downtime.width(),
            downtime.height(),
        );
        canvas.merge(downtime, x, y, ScaleMode::DownOnly);
    }

    Ok(canvas)
}

/// [`compose_at`] with the local wall clock.
pub fn compose(cfg: &OverlayConfig) -> OverlayResult<Frame> {
    compose_at(cfg, TimeOfDay::now_local)
}

/// Composes the frame and emits it as PNG into `out`.
///
/// On failure nothing is written to `out`.
pub fn render_overlay_at<C>(cfg: &OverlayConfig, clock: C, out: &mut dyn Write) -> OverlayResult<()>
where
    C: Fn() -> TimeOfDay,
{
    let frame = compose_at(cfg, clock)?;
    frame.encode_png(out)
}

/// [`render_overlay_at`] with the local wall clock.
pub fn render_overlay(cfg: &OverlayConfig, out: &mut dyn Write) -> OverlayResult<()> {
    render_overlay_at(cfg, TimeOfDay::now_local, out)
}

fn scaled_dimensions(width: u32, height: u32, scale_percent: u32) -> (u32, u32) {
    let factor = f64::from(scale_percent) / 100.0;
    (
        (f64::from(width) * factor).round() as u32,
        (f64::from(height) * factor).round() as u32,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scaled_dimensions_round_to_nearest_pixel() {
        assert_eq!(scaled_dimensions(640, 480, 100), (640, 480));
        assert_eq!(scaled_dimensions(640, 480, 50), (320, 240));
        assert_eq!(scaled_dimensions(640, 480, 75), (480, 360));
        assert_eq!(scaled_dimensions(640, 480, 150), (960, 720));
        // 33% of 101 is 33.33, rounds down; 33% of 105 is 34.65, rounds up.
        assert_eq!(scaled_dimensions(101, 105, 33), (33, 35));
    }
}
