use std::path::PathBuf;

use crate::{
    downtime::TimeOfDay,
    error::{OverlayError, OverlayResult},
    position::Position,
};

/// RGB color with one byte per channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Builds a color from an untyped component list, as found in config files.
    pub fn from_components(components: &[i64]) -> OverlayResult<Self> {
        if components.len() != 3 {
            return Err(OverlayError::validation(format!(
                "invalid color: expected 3 components, got {}",
                components.len()
            )));
        }
        let channel = |value: i64| -> OverlayResult<u8> {
            u8::try_from(value).map_err(|_| {
                OverlayError::validation(format!(
                    "invalid color component {value}, expected 0-255"
                ))
            })
        };
        Ok(Self::new(
            channel(components[0])?,
            channel(components[1])?,
            channel(components[2])?,
        ))
    }
}

impl serde::Serialize for Rgb {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        [self.r, self.g, self.b].serialize(serializer)
    }
}

impl<'de> serde::Deserialize<'de> for Rgb {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let components = Vec::<i64>::deserialize(deserializer)?;
        Self::from_components(&components).map_err(serde::de::Error::custom)
    }
}

/// Configuration for a single render of the composited webcam frame.
///
/// Built up through the fluent setters and consumed once by
/// [`render::compose_at`](crate::render::compose_at), or parsed from a JSON
/// config file. Every field has a default except the webcam source path;
/// [`validate`](Self::validate) checks the cross-field rules before any I/O.
#[derive(Clone, Debug, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Output size as a percentage of the webcam source image.
    pub(crate) output_scale: u32,
    pub(crate) webcam_image_path: PathBuf,

    pub(crate) watermark_enabled: bool,
    pub(crate) watermark_image_path: Option<PathBuf>,
    pub(crate) watermark_position: Position,

    pub(crate) downtime_enabled: bool,
    pub(crate) downtime_image_path: Option<PathBuf>,
    pub(crate) downtime_position: Position,
    pub(crate) downtime_start: Option<TimeOfDay>,
    pub(crate) downtime_end: Option<TimeOfDay>,

    pub(crate) info_text_enabled: bool,
    pub(crate) info_text_content: String,
    pub(crate) info_text_font_path: Option<PathBuf>,
    pub(crate) info_text_font_size_px: u32,
    pub(crate) info_text_x: i32,
    pub(crate) info_text_y: i32,
    pub(crate) info_text_color: Rgb,
    pub(crate) info_text_border_enabled: bool,
    pub(crate) info_text_border_color: Rgb,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            output_scale: 100,
            webcam_image_path: PathBuf::new(),
            watermark_enabled: false,
            watermark_image_path: None,
            watermark_position: Position::TopRight,
            downtime_enabled: false,
            downtime_image_path: None,
            downtime_position: Position::TopRight,
            downtime_start: None,
            downtime_end: None,
            info_text_enabled: false,
            info_text_content: String::new(),
            info_text_font_path: None,
            info_text_font_size_px: 10,
            info_text_x: 5,
            info_text_y: 235,
            info_text_color: Rgb::new(255, 255, 255),
            info_text_border_enabled: true,
            info_text_border_color: Rgb::new(50, 50, 50),
        }
    }
}

impl OverlayConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_scale(mut self, percent: u32) -> Self {
        self.output_scale = percent;
        self
    }

    pub fn webcam_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.webcam_image_path = path.into();
        self
    }

    pub fn watermark_enabled(mut self, enabled: bool) -> Self {
        self.watermark_enabled = enabled;
        self
    }

    pub fn watermark_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.watermark_image_path = Some(path.into());
        self
    }

    pub fn watermark_position(mut self, position: Position) -> Self {
        self.watermark_position = position;
        self
    }

    pub fn downtime_enabled(mut self, enabled: bool) -> Self {
        self.downtime_enabled = enabled;
        self
    }

    pub fn downtime_image_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.downtime_image_path = Some(path.into());
        self
    }

    pub fn downtime_position(mut self, position: Position) -> Self {
        self.downtime_position = position;
        self
    }

    pub fn downtime_start(mut self, time: TimeOfDay) -> Self {
        self.downtime_start = Some(time);
        self
    }

    pub fn downtime_end(mut self, time: TimeOfDay) -> Self {
        self.downtime_end = Some(time);
        self
    }

    pub fn info_text_enabled(mut self, enabled: bool) -> Self {
        self.info_text_enabled = enabled;
        self
    }

    pub fn info_text_content(mut self, content: impl Into<String>) -> Self {
        self.info_text_content = content.into();
        self
    }

    pub fn info_text_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.info_text_font_path = Some(path.into());
        self
    }

    pub fn info_text_font_size_px(mut self, size: u32) -> Self {
        self.info_text_font_size_px = size;
        self
    }

    pub fn info_text_x(mut self, x: i32) -> Self {
        self.info_text_x = x;
        self
    }

    pub fn info_text_y(mut self, y: i32) -> Self {
        self.info_text_y = y;
        self
    }

    pub fn info_text_color(mut self, color: Rgb) -> Self {
        self.info_text_color = color;
        self
    }

    pub fn info_text_border_enabled(mut self, enabled: bool) -> Self {
        self.info_text_border_enabled = enabled;
        self
    }

    pub fn info_text_border_color(mut self, color: Rgb) -> Self {
        self.info_text_border_color = color;
        self
    }

    /// Checks the cross-field rules the setters cannot enforce on their own.
    pub fn validate(&self) -> OverlayResult<()> {
        if self.output_scale == 0 {
            return Err(OverlayError::validation("output scale must be >= 1 percent"));
        }
        if self.webcam_image_path.as_os_str().is_empty() {
            return Err(OverlayError::validation("webcam image path must be set"));
        }
        if self.watermark_enabled && self.watermark_image_path.is_none() {
            return Err(OverlayError::validation(
                "watermark is enabled but no watermark image path is set",
            ));
        }
        if self.downtime_enabled {
            if self.downtime_image_path.is_none() {
                return Err(OverlayError::validation(
                    "downtime is enabled but no downtime image path is set",
                ));
            }
            if self.downtime_start.is_none() || self.downtime_end.is_none() {
                return Err(OverlayError::validation(
                    "downtime is enabled but start/end times are not set",
                ));
            }
        }
        if self.info_text_enabled {
            if self.info_text_font_path.is_none() {
                return Err(OverlayError::validation(
                    "info text is enabled but no font path is set",
                ));
            }
            if self.info_text_font_size_px == 0 {
                return Err(OverlayError::validation("info text font size must be >= 1"));
            }
        }
        Ok(())
    }
}
