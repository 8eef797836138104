//! Digital watch face renderer

use chrono::{NaiveDateTime, Timelike};
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::image::Image;
use embedded_graphics::pixelcolor::{Rgb565, RgbColor};
use embedded_graphics::text::Text;
use embedded_graphics::Drawable;

use super::{FaceLayout, FacePaints, RenderState, WatchFace};

const BUF_LEN: usize = 64;

/// Digital face: `H:MM:SS` over the themed background while interactive,
/// `H:MM` on black in ambient mode, with the weather overlay drawn
/// whenever a snapshot is available.
///
/// The renderer is stateless; every frame is computed from the
/// [`RenderState`] alone.
#[derive(Clone, Copy, Debug, Default)]
pub struct DigitalWatchface;

impl DigitalWatchface {
    fn draw_weather<D>(
        &self,
        target: &mut D,
        state: &RenderState<'_>,
        layout: &FaceLayout,
        paints: &FacePaints,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let Some(weather) = state.weather else {
            return Ok(());
        };

        let mut buf = [0u8; BUF_LEN];
        let text = format_temps(&mut buf, weather.high, weather.low);
        Text::new(text, layout.weather_origin, paints.weather.style()).draw(target)?;

        // Icon only in interactive mode. A production face would swap in
        // thin-outline icons for ambient instead of dropping the icon.
        if let Some(icon) = &weather.icon {
            if !state.ambient {
                Image::new(icon.raw(), layout.icon_origin).draw(target)?;
            }
        }
        Ok(())
    }
}

impl WatchFace for DigitalWatchface {
    fn draw<D>(
        &self,
        target: &mut D,
        state: &RenderState<'_>,
        layout: &FaceLayout,
        paints: &FacePaints,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        // Pure black in ambient mode keeps unlit pixels dark on OLED
        // panels; the themed background is interactive-only.
        if state.ambient {
            target.clear(Rgb565::BLACK)?;
        } else {
            target.clear(paints.background)?;
        }

        self.draw_weather(target, state, layout, paints)?;

        // H:MM in ambient mode, H:MM:SS in interactive mode.
        let mut buf = [0u8; BUF_LEN];
        let text = format_clock(&mut buf, &state.time, state.ambient);
        Text::new(text, layout.time_origin, paints.time.style()).draw(target)?;

        Ok(())
    }
}

/// Clock text: 12-hour with no leading zero on the hour (the midnight and
/// noon hours render as `0`), zero-padded minutes and seconds.
fn format_clock<'b>(buf: &'b mut [u8], time: &NaiveDateTime, ambient: bool) -> &'b str {
    let hour = time.hour() % 12;
    if ambient {
        format_no_std::show(buf, format_args!("{}:{:02}", hour, time.minute())).unwrap()
    } else {
        format_no_std::show(
            buf,
            format_args!("{}:{:02}:{:02}", hour, time.minute(), time.second()),
        )
        .unwrap()
    }
}

/// Weather text: high and low separated by a single space
fn format_temps(buf: &mut [u8], high: i32, low: i32) -> &str {
    format_no_std::show(buf, format_args!("{} {}", high, low)).unwrap()
}
