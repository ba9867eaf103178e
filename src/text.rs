use std::{fs, path::Path, time::SystemTime};

use rusttype::{Font, Scale, point};

use crate::{
    error::{OverlayError, OverlayResult},
    model::Rgb,
    raster::Frame,
};

/// Offsets for the outline pass, one per neighboring pixel of the anchor.
pub const BORDER_OFFSETS: [(i32, i32); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// A parsed TTF font face.
#[derive(Debug)]
pub struct FontFace {
    font: Font<'static>,
}

impl FontFace {
    pub fn load(path: &Path) -> OverlayResult<Self> {
        let bytes = fs::read(path)
            .map_err(|e| OverlayError::text(format!("read font '{}': {e}", path.display())))?;
        let font = Font::try_from_vec(bytes)
            .ok_or_else(|| OverlayError::text(format!("parse font '{}'", path.display())))?;
        Ok(Self { font })
    }
}

/// Draws `content` onto the frame with `y` as the text baseline.
///
/// Glyph coverage is alpha-blended into the existing pixels; anything falling
/// outside the frame is clipped.
pub fn draw_text(
    frame: &mut Frame,
    x: i32,
    y: i32,
    content: &str,
    font: &FontFace,
    size_px: u32,
    color: Rgb,
) {
    let scale = Scale::uniform(size_px as f32);
    let mut caret_x = x as f32;
    let baseline_y = y as f32;

    for ch in content.chars() {
        let glyph = font
            .font
            .glyph(ch)
            .scaled(scale)
            .positioned(point(caret_x, baseline_y));

        if let Some(bb) = glyph.pixel_bounding_box() {
            let image = frame.image_mut();
            glyph.draw(|gx, gy, coverage| {
                let px = gx as i32 + bb.min.x;
                let py = gy as i32 + bb.min.y;
                if px < 0 || py < 0 {
                    return;
                }
                let (px, py) = (px as u32, py as u32);
                if px >= image.width() || py >= image.height() {
                    return;
                }
                let alpha = coverage.clamp(0.0, 1.0);
                if alpha <= 0.0 {
                    return;
                }
                let inv = 1.0 - alpha;
                let dst = image.get_pixel_mut(px, py);
                dst.0[0] = (f32::from(color.r) * alpha + f32::from(dst.0[0]) * inv) as u8;
                dst.0[1] = (f32::from(color.g) * alpha + f32::from(dst.0[1]) * inv) as u8;
                dst.0[2] = (f32::from(color.b) * alpha + f32::from(dst.0[2]) * inv) as u8;
                dst.0[3] = 255;
            });
        }

        caret_x += glyph.unpositioned().h_metrics().advance_width;
    }
}

/// Draws `content` with a one-pixel outline.
///
/// The outline pass repeats the text at the eight neighboring offsets in the
/// border color before the fill pass draws over it.
pub fn draw_text_bordered(
    frame: &mut Frame,
    x: i32,
    y: i32,
    content: &str,
    font: &FontFace,
    size_px: u32,
    color: Rgb,
    border_color: Rgb,
) {
    for (dx, dy) in BORDER_OFFSETS {
        draw_text(frame, x + dx, y + dy, content, font, size_px, border_color);
    }
    draw_text(frame, x, y, content, font, size_px, color);
}

/// Builds the info-text caption: the source timestamp in `DD.MM.YYYY, HH:MM:SS`
/// form, directly followed by the configured content.
///
/// Sources without a modification time yield the bare content.
pub fn caption(modified: Option<SystemTime>, content: &str) -> String {
    match modified {
        Some(time) => {
            let local = chrono::DateTime::<chrono::Local>::from(time);
            format!("{}{}", local.format("%d.%m.%Y, %H:%M:%S"), content)
        }
        None => content.to_string(),
    }
}
