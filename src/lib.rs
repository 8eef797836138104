//! Digital watch face with a weather overlay.
//!
//! Displays the time with seconds; in ambient mode the seconds are
//! dropped and the face falls back to a pure black background. On devices
//! with low-bit ambient support the text paints give up anti-aliasing
//! while ambient. Weather data (daily high/low and an icon) arrives from
//! a companion device through a [`WeatherPort`] and is drawn over the
//! face whenever a snapshot is available.
//!
//! The host application owns the display surface and the executor; it
//! feeds lifecycle callbacks into the engine as [`FaceEvent`]s and either
//! drives [`Watchface::run`] as its rendering actor or calls
//! [`Watchface::handle`] and [`Watchface::render`] from its own paint
//! cycle.

#![cfg_attr(not(test), no_std)]

pub mod engine;
pub mod system;
pub mod ui;
pub mod weather;

pub use engine::{FaceConfig, FaceEvent, FaceEvents, SurfaceConfig, TapKind, Watchface};
pub use ui::{FaceLayout, FaceStyle, ScreenShape};
pub use weather::{WeatherIcon, WeatherPort, WeatherSnapshot};
