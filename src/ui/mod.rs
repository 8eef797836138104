//! Watch face UI definitions

use chrono::NaiveDateTime;
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::mono_font::{MonoFont, MonoTextStyle, MonoTextStyleBuilder};
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use profont::{PROFONT_12_POINT, PROFONT_24_POINT};

use crate::weather::WeatherSnapshot;

mod digital;
pub mod layout;

pub use digital::DigitalWatchface;
pub use layout::{FaceLayout, ScreenShape};

/// Everything a draw pass reads; rebuilt fresh for every frame and never
/// stored.
pub struct RenderState<'a> {
    /// Current local time
    pub time: NaiveDateTime,
    /// Whether the device is in ambient mode
    pub ambient: bool,
    /// Latest weather snapshot, if one has arrived
    pub weather: Option<&'a WeatherSnapshot>,
}

/// Text paint: color, typeface, and smoothing state.
///
/// Mono fonts rasterize without smoothing of their own; the anti-alias
/// flag records what a smoothing surface is allowed to do, and must be
/// off in ambient mode on low-bit panels.
#[derive(Clone, Copy)]
pub struct TextPaint {
    color: Rgb565,
    font: &'static MonoFont<'static>,
    anti_alias: bool,
}

impl TextPaint {
    /// Create a paint with anti-aliasing enabled
    pub fn new(color: Rgb565, font: &'static MonoFont<'static>) -> Self {
        Self {
            color,
            font,
            anti_alias: true,
        }
    }

    /// Enable or disable anti-aliasing
    pub fn set_anti_alias(&mut self, enable: bool) {
        self.anti_alias = enable;
    }

    /// Current anti-aliasing state
    pub fn anti_alias(&self) -> bool {
        self.anti_alias
    }

    /// Character style for the text renderer
    pub(crate) fn style(&self) -> MonoTextStyle<'static, Rgb565> {
        MonoTextStyleBuilder::new()
            .font(self.font)
            .text_color(self.color)
            .build()
    }
}

/// Paints for the face layers
pub struct FacePaints {
    /// Interactive-mode background fill
    pub background: Rgb565,
    /// Clock text paint
    pub time: TextPaint,
    /// Weather text paint
    pub weather: TextPaint,
}

impl FacePaints {
    /// Build the paint set from a face style
    pub fn new(style: &FaceStyle) -> Self {
        Self {
            background: style.background,
            time: TextPaint::new(style.text_color, style.time_font),
            weather: TextPaint::new(style.text_color, style.weather_font),
        }
    }

    /// Toggle anti-aliasing on both text paints
    pub fn set_anti_alias(&mut self, enable: bool) {
        self.time.set_anti_alias(enable);
        self.weather.set_anti_alias(enable);
    }
}

/// Colors and typefaces for the face
#[derive(Clone, Copy)]
pub struct FaceStyle {
    /// Interactive-mode background color
    pub background: Rgb565,
    /// Text color for both layers
    pub text_color: Rgb565,
    /// Clock typeface
    pub time_font: &'static MonoFont<'static>,
    /// Weather typeface
    pub weather_font: &'static MonoFont<'static>,
}

impl Default for FaceStyle {
    fn default() -> Self {
        Self {
            // #03A9F4 in RGB565
            background: Rgb565::new(0, 42, 30),
            text_color: Rgb565::WHITE,
            time_font: &PROFONT_24_POINT,
            weather_font: &PROFONT_12_POINT,
        }
    }
}

/// A drawable watch face
pub trait WatchFace {
    /// Draw one frame onto the target
    fn draw<D>(
        &self,
        target: &mut D,
        state: &RenderState<'_>,
        layout: &FaceLayout,
        paints: &FacePaints,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>;
}
