use std::{fs, io::Write, path::Path, time::SystemTime};

use anyhow::Context as _;
use image::{ImageEncoder as _, Rgba, RgbaImage, codecs::png::PngEncoder, imageops};

use crate::error::{OverlayError, OverlayResult};

/// How an overlay is resized when merged into its destination.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScaleMode {
    /// Blit at the requested offset without resizing.
    None,
    /// Resample the overlay to cover the full destination, up or down.
    ToFill,
    /// Shrink the overlay to fit inside the destination, never enlarge.
    DownOnly,
}

/// A decoded RGBA raster plus the modification time of its source file.
#[derive(Clone, Debug)]
pub struct Frame {
    image: RgbaImage,
    modified: Option<SystemTime>,
}

impl Frame {
    /// Decodes the image file at `path`.
    ///
    /// The source file's modification time is captured alongside the pixels;
    /// filesystems that expose no mtime yield `None` rather than an error.
    pub fn open(path: &Path) -> OverlayResult<Self> {
        let image = image::open(path)
            .map_err(|e| OverlayError::decode(format!("load image '{}': {e}", path.display())))?
            .to_rgba8();
        let modified = fs::metadata(path).and_then(|meta| meta.modified()).ok();
        Ok(Self { image, modified })
    }

    /// Allocates an opaque black canvas.
    pub fn blank(width: u32, height: u32) -> OverlayResult<Self> {
        if width == 0 || height == 0 {
            return Err(OverlayError::validation("canvas width/height must be > 0"));
        }
        Ok(Self {
            image: RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 255])),
            modified: None,
        })
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn modified(&self) -> Option<SystemTime> {
        self.modified
    }

    /// Alpha-composites `overlay` into this frame at `(x, y)`.
    ///
    /// Pixels falling outside the destination are clipped.
    pub fn merge(&mut self, overlay: &Frame, x: u32, y: u32, mode: ScaleMode) {
        match mode {
            ScaleMode::None => {
                imageops::overlay(&mut self.image, &overlay.image, i64::from(x), i64::from(y));
            }
            ScaleMode::ToFill => {
                if overlay.width() == self.width() && overlay.height() == self.height() {
                    imageops::overlay(&mut self.image, &overlay.image, 0, 0);
                } else {
                    let scaled = imageops::resize(
                        &overlay.image,
                        self.width(),
                        self.height(),
                        imageops::FilterType::Lanczos3,
                    );
                    imageops::overlay(&mut self.image, &scaled, 0, 0);
                }
            }
            ScaleMode::DownOnly => {
                if overlay.width() > self.width() || overlay.height() > self.height() {
                    let (width, height) = fit_within(
                        overlay.width(),
                        overlay.height(),
                        self.width(),
                        self.height(),
                    );
                    let scaled = imageops::resize(
                        &overlay.image,
                        width,
                        height,
                        imageops::FilterType::Lanczos3,
                    );
                    imageops::overlay(&mut self.image, &scaled, i64::from(x), i64::from(y));
                } else {
                    imageops::overlay(&mut self.image, &overlay.image, i64::from(x), i64::from(y));
                }
            }
        }
    }

    /// Encodes the frame as PNG into `out`.
    pub fn encode_png(&self, out: &mut dyn Write) -> OverlayResult<()> {
        PngEncoder::new(out)
            .write_image(
                self.image.as_raw(),
                self.width(),
                self.height(),
                image::ExtendedColorType::Rgba8,
            )
            .context("encode output image as png")?;
        Ok(())
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.image.get_pixel(x, y).0
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn image_mut(&mut self) -> &mut RgbaImage {
        &mut self.image
    }
}

/// Largest size that fits inside `max_width` x `max_height` while keeping the
/// `width` x `height` aspect ratio.
fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    let ratio = (f64::from(max_width) / f64::from(width))
        .min(f64::from(max_height) / f64::from(height));
    (
        ((f64::from(width) * ratio).round() as u32).max(1),
        ((f64::from(height) * ratio).round() as u32).max(1),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(width: u32, height: u32, rgba: [u8; 4]) -> Frame {
        Frame {
            image: RgbaImage::from_pixel(width, height, Rgba(rgba)),
            modified: None,
        }
    }

    const RED: [u8; 4] = [255, 0, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    #[test]
    fn blank_is_opaque_black() {
        let canvas = Frame::blank(3, 2).unwrap();
        assert_eq!((canvas.width(), canvas.height()), (3, 2));
        assert_eq!(canvas.pixel(0, 0), BLACK);
        assert_eq!(canvas.pixel(2, 1), BLACK);
    }

    #[test]
    fn blank_rejects_zero_dimensions() {
        assert!(Frame::blank(0, 4).is_err());
        assert!(Frame::blank(4, 0).is_err());
    }

    #[test]
    fn merge_none_blits_at_offset_without_resizing() {
        let mut canvas = Frame::blank(8, 8).unwrap();
        canvas.merge(&solid(2, 2, RED), 3, 4, ScaleMode::None);
        assert_eq!(canvas.pixel(3, 4), RED);
        assert_eq!(canvas.pixel(4, 5), RED);
        assert_eq!(canvas.pixel(2, 4), BLACK);
        assert_eq!(canvas.pixel(5, 6), BLACK);
    }

    #[test]
    fn merge_none_clips_at_the_canvas_edge() {
        let mut canvas = Frame::blank(8, 8).unwrap();
        canvas.merge(&solid(4, 4, RED), 6, 6, ScaleMode::None);
        assert_eq!(canvas.pixel(7, 7), RED);
        assert_eq!(canvas.pixel(5, 5), BLACK);
    }

    #[test]
    fn merge_to_fill_covers_the_whole_canvas() {
        let mut canvas = Frame::blank(4, 4).unwrap();
        canvas.merge(&solid(2, 2, RED), 0, 0, ScaleMode::ToFill);
        for x in 0..4 {
            for y in 0..4 {
                assert_eq!(canvas.pixel(x, y), RED, "({x},{y})");
            }
        }
    }

    #[test]
    fn merge_to_fill_also_downscales() {
        let mut canvas = Frame::blank(2, 2).unwrap();
        canvas.merge(&solid(8, 8, RED), 0, 0, ScaleMode::ToFill);
        assert_eq!(canvas.pixel(0, 0), RED);
        assert_eq!(canvas.pixel(1, 1), RED);
    }

    #[test]
    fn merge_down_only_shrinks_an_oversized_overlay() {
        let mut canvas = Frame::blank(4, 4).unwrap();
        canvas.merge(&solid(8, 8, RED), 0, 0, ScaleMode::DownOnly);
        for x in 0..4 {
            for y in 0..4 {
                assert_eq!(canvas.pixel(x, y), RED, "({x},{y})");
            }
        }
    }

    #[test]
    fn merge_down_only_never_upscales() {
        let mut canvas = Frame::blank(4, 4).unwrap();
        canvas.merge(&solid(2, 2, RED), 1, 1, ScaleMode::DownOnly);
        assert_eq!(canvas.pixel(1, 1), RED);
        assert_eq!(canvas.pixel(2, 2), RED);
        assert_eq!(canvas.pixel(0, 0), BLACK);
        assert_eq!(canvas.pixel(3, 3), BLACK);
    }

    #[test]
    fn merge_blends_with_source_alpha() {
        let mut canvas = Frame::blank(1, 1).unwrap();
        canvas.merge(&solid(1, 1, [255, 0, 0, 0]), 0, 0, ScaleMode::None);
        assert_eq!(canvas.pixel(0, 0), BLACK);
    }

    #[test]
    fn fit_within_preserves_aspect_ratio() {
        assert_eq!(fit_within(8, 8, 4, 4), (4, 4));
        assert_eq!(fit_within(10, 4, 5, 5), (5, 2));
        assert_eq!(fit_within(4, 10, 5, 5), (2, 5));
        assert_eq!(fit_within(1000, 1, 10, 10), (10, 1));
    }

    #[test]
    fn encode_png_writes_the_png_signature() {
        let canvas = Frame::blank(2, 2).unwrap();
        let mut out = Vec::new();
        canvas.encode_png(&mut out).unwrap();
        assert_eq!(&out[..8], b"\x89PNG\r\n\x1a\n");
    }

    #[test]
    fn open_reports_missing_files_as_decode_errors() {
        let err = Frame::open(Path::new("/nonexistent/frame.png")).unwrap_err();
        assert!(matches!(err, OverlayError::Decode(_)));
    }
}
