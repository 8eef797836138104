//! Weather data delivery from the companion device

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use embedded_graphics::image::ImageRaw;
use embedded_graphics::pixelcolor::Rgb565;

/// Weather condition icon.
///
/// Holds raw big-endian RGB565 pixel data, already decoded and sized for
/// the face's icon slot by the transport layer.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeatherIcon {
    raw: ImageRaw<'static, Rgb565>,
}

impl WeatherIcon {
    /// Create an icon from raw RGB565 pixel data
    pub fn new(data: &'static [u8], width: u32) -> Self {
        Self {
            raw: ImageRaw::new(data, width),
        }
    }

    pub(crate) fn raw(&self) -> &ImageRaw<'static, Rgb565> {
        &self.raw
    }
}

/// Latest weather reading received from the companion device.
///
/// A new snapshot replaces the previous one wholesale; fields are never
/// updated in place.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WeatherSnapshot {
    /// Daily high temperature
    pub high: i32,
    /// Daily low temperature
    pub low: i32,
    /// Icon for the current conditions, if the companion sent one
    pub icon: Option<WeatherIcon>,
}

/// Single-slot mailbox for weather updates.
///
/// The transport layer publishes from its own execution context; the
/// engine consumes from the render context. Only the latest value
/// matters, so an unconsumed snapshot is simply replaced.
pub struct WeatherPort {
    slot: Signal<CriticalSectionRawMutex, WeatherSnapshot>,
}

impl WeatherPort {
    /// Create an empty port
    pub const fn new() -> Self {
        Self { slot: Signal::new() }
    }

    /// Replace the latest snapshot
    pub fn publish(&self, snapshot: WeatherSnapshot) {
        self.slot.signal(snapshot);
    }

    /// Wait for the next snapshot
    pub async fn updated(&self) -> WeatherSnapshot {
        self.slot.wait().await
    }

    /// Take the latest snapshot without waiting
    pub fn try_take(&self) -> Option<WeatherSnapshot> {
        self.slot.try_take()
    }
}

impl Default for WeatherPort {
    fn default() -> Self {
        Self::new()
    }
}
