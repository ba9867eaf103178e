use std::{fmt, str::FromStr};

use crate::error::{OverlayError, OverlayResult};

/// Canonical overlay placements, shared by the watermark and downtime layers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Position {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
    Center,
}

impl Position {
    /// The closed set of valid placements, in declaration order.
    pub const ALL: [Position; 5] = [
        Position::TopLeft,
        Position::TopRight,
        Position::BottomLeft,
        Position::BottomRight,
        Position::Center,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Position::TopLeft => "topleft",
            Position::TopRight => "topright",
            Position::BottomLeft => "bottomleft",
            Position::BottomRight => "bottomright",
            Position::Center => "center",
        }
    }

    /// Resolves the placement to pixel coordinates inside the target.
    ///
    /// Overlay dimensions are clamped to the target's before the offset is
    /// computed, so an overlay larger than the target resolves to (0, 0)
    /// rather than a negative offset. `Center` rounds to the nearest pixel.
    pub fn resolve(
        self,
        target_width: u32,
        target_height: u32,
        overlay_width: u32,
        overlay_height: u32,
    ) -> (u32, u32) {
        let overlay_width = overlay_width.min(target_width);
        let overlay_height = overlay_height.min(target_height);

        match self {
            Position::TopLeft => (0, 0),
            Position::TopRight => (target_width - overlay_width, 0),
            Position::BottomLeft => (0, target_height - overlay_height),
            Position::BottomRight => (
                target_width - overlay_width,
                target_height - overlay_height,
            ),
            Position::Center => (
                (f64::from(target_width - overlay_width) / 2.0).round() as u32,
                (f64::from(target_height - overlay_height) / 2.0).round() as u32,
            ),
        }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Position {
    type Err = OverlayError;

    fn from_str(s: &str) -> OverlayResult<Self> {
        for position in Self::ALL {
            if position.as_str() == s {
                return Ok(position);
            }
        }
        Err(OverlayError::validation(format!(
            "invalid image position '{s}', valid positions are: {}",
            Self::ALL.map(Position::as_str).join(", ")
        )))
    }
}

impl serde::Serialize for Position {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> serde::Deserialize<'de> for Position {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
