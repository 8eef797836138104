//! Face layout metrics
//!
//! Positions follow the host-reported screen shape: round screens inset
//! the text columns further so nothing is clipped by the bezel curve.

use embedded_graphics::geometry::Point;

/// Screen shape reported by the host through the window insets
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScreenShape {
    Square,
    Round,
}

/// Pixel positions for the face elements.
///
/// Text origins are baseline anchors, matching the text renderer; the
/// icon origin is the top-left corner of the icon slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FaceLayout {
    /// Baseline anchor of the clock text
    pub time_origin: Point,
    /// Baseline anchor of the weather text
    pub weather_origin: Point,
    /// Top-left corner of the weather icon
    pub icon_origin: Point,
}

impl FaceLayout {
    /// Layout for the given screen shape on a 240x240 panel
    pub fn for_shape(shape: ScreenShape) -> Self {
        match shape {
            ScreenShape::Square => Self {
                time_origin: Point::new(26, 122),
                weather_origin: Point::new(26, 168),
                icon_origin: Point::new(152, 144),
            },
            ScreenShape::Round => Self {
                time_origin: Point::new(44, 122),
                weather_origin: Point::new(44, 168),
                icon_origin: Point::new(158, 144),
            },
        }
    }
}

impl Default for FaceLayout {
    fn default() -> Self {
        Self::for_shape(ScreenShape::Square)
    }
}
