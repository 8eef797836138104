//! Watch face engine
//!
//! One engine instance exists per active face. Host lifecycle callbacks
//! arrive as [`FaceEvent`]s, weather snapshots through the
//! [`WeatherPort`], and the engine serializes both with its own redraw
//! ticks onto the single rendering context: either the [`Watchface::run`]
//! actor loop, or the host's own paint cycle via [`Watchface::handle`]
//! and [`Watchface::render`].

pub mod scheduler;
pub mod state;

use core::future::pending;

use chrono::NaiveDateTime;
use embassy_futures::select::{select3, Either3};
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::{Channel, Receiver};
use embassy_time::{Duration, Timer};
use embedded_graphics::draw_target::DrawTarget;
use embedded_graphics::pixelcolor::Rgb565;
use log::{debug, info};

use crate::system::clock::{TimeReference, WallClock};
use crate::ui::{
    DigitalWatchface, FaceLayout, FacePaints, FaceStyle, RenderState, ScreenShape, WatchFace,
};
use crate::weather::{WeatherPort, WeatherSnapshot};

pub use scheduler::{UpdateScheduler, INTERACTIVE_UPDATE_RATE_MS};
pub use state::{AmbientState, FaceEvent, TapKind};

/// Queue depth for host lifecycle events
pub const EVENT_QUEUE_DEPTH: usize = 8;

/// Channel the host sends lifecycle events through
pub type FaceEvents = Channel<CriticalSectionRawMutex, FaceEvent, EVENT_QUEUE_DEPTH>;

/// Receiving side of [`FaceEvents`]
pub type FaceEventReceiver<'a> = Receiver<'a, CriticalSectionRawMutex, FaceEvent, EVENT_QUEUE_DEPTH>;

/// Card peek behavior requested from the host UI
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeekMode {
    /// Peek cards may take as much height as they need
    Variable,
    /// Peek cards are clamped to a single line
    Short,
}

/// How peek cards treat the face background
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BackgroundVisibility {
    /// Background shows only briefly for interruptive cards
    Interruptive,
    /// Background stays visible behind peek cards
    Persistent,
}

/// Declarative surface behavior, read once by the host at creation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SurfaceConfig {
    pub peek_mode: PeekMode,
    pub background_visibility: BackgroundVisibility,
    /// Whether the system UI should draw its own time over the face
    pub show_system_time: bool,
    /// Whether tap gestures should be delivered
    pub accepts_taps: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            peek_mode: PeekMode::Variable,
            background_visibility: BackgroundVisibility::Interruptive,
            show_system_time: false,
            accepts_taps: false,
        }
    }
}

/// Construction-time configuration for the engine.
///
/// Typeface, color, and update-rate constants all live here; the engine
/// keeps no module-level mutable state.
pub struct FaceConfig {
    /// Colors and typefaces
    pub style: FaceStyle,
    /// Interactive update rate in milliseconds
    pub update_rate_ms: u64,
    /// Initial screen shape, until the host reports insets
    pub shape: ScreenShape,
    /// Surface behavior descriptor
    pub surface: SurfaceConfig,
}

impl Default for FaceConfig {
    fn default() -> Self {
        Self {
            style: FaceStyle::default(),
            update_rate_ms: INTERACTIVE_UPDATE_RATE_MS,
            shape: ScreenShape::Square,
            surface: SurfaceConfig::default(),
        }
    }
}

/// Watch face engine: owns the lifecycle state machine, the redraw
/// scheduler, the wall clock, the paints, and the latest weather
/// snapshot.
pub struct Watchface {
    face: DigitalWatchface,
    state: AmbientState,
    scheduler: UpdateScheduler,
    clock: WallClock,
    layout: FaceLayout,
    paints: FacePaints,
    surface: SurfaceConfig,
    latest: Option<WeatherSnapshot>,
    dirty: bool,
    alive: bool,
}

impl Watchface {
    /// Create an engine from the given configuration
    pub fn new(config: FaceConfig) -> Self {
        Self {
            face: DigitalWatchface,
            state: AmbientState::new(),
            scheduler: UpdateScheduler::new(config.update_rate_ms),
            clock: WallClock::new(),
            layout: FaceLayout::for_shape(config.shape),
            paints: FacePaints::new(&config.style),
            surface: config.surface,
            latest: None,
            dirty: false,
            alive: true,
        }
    }

    /// Surface behavior the host should apply at creation
    pub fn surface_config(&self) -> &SurfaceConfig {
        &self.surface
    }

    /// Whether the engine has been torn down
    pub fn is_alive(&self) -> bool {
        self.alive
    }

    /// Whether a redraw request is outstanding
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Current lifecycle state
    pub fn state(&self) -> &AmbientState {
        &self.state
    }

    /// Redraw tick bookkeeping
    pub fn scheduler(&self) -> &UpdateScheduler {
        &self.scheduler
    }

    /// Current paints
    pub fn paints(&self) -> &FacePaints {
        &self.paints
    }

    /// Latest snapshot held by the engine
    pub fn weather(&self) -> Option<&WeatherSnapshot> {
        self.latest.as_ref()
    }

    /// Supply the wall-clock reference from the host
    pub fn set_time_reference(&mut self, reference: TimeReference) {
        self.clock.set_reference(reference);
        self.dirty = true;
    }

    /// Apply one host lifecycle event
    pub fn handle(&mut self, event: FaceEvent) {
        if !self.alive {
            return;
        }
        match event {
            FaceEvent::VisibilityChanged(visible) => {
                if self.state.set_visible(visible) {
                    self.dirty = true;
                }
                // Whether the timer should run depends on visibility as
                // well as ambient mode.
                self.update_timer();
            }
            FaceEvent::AmbientModeChanged(ambient) => {
                if self.state.set_ambient(ambient) {
                    // Low-bit panels must drop anti-aliasing in ambient
                    // mode.
                    if self.state.low_bit_ambient() {
                        self.paints.set_anti_alias(!ambient);
                    }
                    self.dirty = true;
                }
                self.update_timer();
            }
            FaceEvent::TimeTick => self.dirty = true,
            FaceEvent::LowBitAmbientReported(low_bit) => {
                self.state.set_low_bit_ambient(low_bit);
            }
            FaceEvent::ShapeChanged(shape) => {
                self.layout = FaceLayout::for_shape(shape);
            }
            FaceEvent::TimeZoneChanged { offset_seconds } => {
                self.clock.set_offset(offset_seconds);
                self.dirty = true;
            }
            FaceEvent::Tap { kind, .. } => {
                // Tap gestures only repaint for now; taps are off in the
                // default surface config until a gesture action exists.
                debug!("tap gesture: {:?}", kind);
                self.dirty = true;
            }
            FaceEvent::Destroyed => self.shutdown(),
        }
    }

    /// Replace the latest snapshot and mark the face dirty
    pub fn on_weather(&mut self, snapshot: WeatherSnapshot) {
        if !self.alive {
            return;
        }
        debug!(
            "weather update: high={} low={} icon={}",
            snapshot.high,
            snapshot.low,
            snapshot.icon.is_some()
        );
        self.latest = Some(snapshot);
        self.dirty = true;
    }

    /// Cancel the pending tick and detach from the host. Further events,
    /// snapshots, and draw calls are no-ops.
    pub fn shutdown(&mut self) {
        self.scheduler.cancel();
        if self.alive {
            self.alive = false;
            info!("watch face engine stopped");
        }
    }

    /// Draw the face at the current wall-clock time
    pub fn render<D>(&mut self, target: &mut D) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        let now = self.clock.now();
        self.render_at(target, now)
    }

    /// Draw the face as of the given time
    pub fn render_at<D>(&mut self, target: &mut D, time: NaiveDateTime) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        if !self.alive {
            return Ok(());
        }
        let state = RenderState {
            time,
            ambient: self.state.is_ambient(),
            weather: self.latest.as_ref(),
        };
        self.face.draw(target, &state, &self.layout, &self.paints)?;
        self.dirty = false;
        Ok(())
    }

    /// Drive the face as the single rendering actor: host events, weather
    /// arrivals, and redraw ticks are serialized here. Returns once the
    /// host destroys the face.
    pub async fn run<D>(
        &mut self,
        display: &mut D,
        events: FaceEventReceiver<'_>,
        weather: &WeatherPort,
    ) -> Result<(), D::Error>
    where
        D: DrawTarget<Color = Rgb565>,
    {
        // First paint; a bare draw target has no host surface asking for
        // one.
        self.dirty = true;

        while self.alive {
            if self.dirty {
                self.render(display)?;
            }

            let generation = self.scheduler.generation();
            let delay_ms = self
                .scheduler
                .deadline_ms()
                .map(|at| at.saturating_sub(self.clock.epoch_ms()));

            let outcome = select3(events.receive(), weather.updated(), async {
                match delay_ms {
                    Some(ms) => Timer::after(Duration::from_millis(ms)).await,
                    None => pending::<()>().await,
                }
            })
            .await;

            match outcome {
                Either3::First(event) => self.handle(event),
                Either3::Second(snapshot) => self.on_weather(snapshot),
                Either3::Third(()) => self.tick(generation),
            }
        }
        Ok(())
    }

    /// A redraw tick fired: repaint, then re-align to the next second
    /// boundary.
    fn tick(&mut self, generation: u32) {
        if !self.scheduler.is_current(generation) {
            // Stale tick from before a cancel or teardown.
            return;
        }
        self.dirty = true;
        self.update_timer();
    }

    fn update_timer(&mut self) {
        let now_ms = self.clock.epoch_ms();
        self.scheduler
            .reschedule(now_ms, self.state.should_run_timer());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embassy_futures::block_on;
    use embedded_graphics::mock_display::MockDisplay;

    fn display() -> MockDisplay<Rgb565> {
        let mut display = MockDisplay::new();
        display.set_allow_overdraw(true);
        display.set_allow_out_of_bounds_drawing(true);
        display
    }

    fn snapshot(high: i32, low: i32) -> WeatherSnapshot {
        WeatherSnapshot {
            high,
            low,
            icon: None,
        }
    }

    #[test]
    fn timer_follows_visibility_and_ambient_mode() {
        let mut engine = Watchface::new(FaceConfig::default());
        let sequence = [
            (FaceEvent::VisibilityChanged(true), true),
            (FaceEvent::AmbientModeChanged(true), false),
            (FaceEvent::AmbientModeChanged(false), true),
            (FaceEvent::VisibilityChanged(false), false),
            (FaceEvent::AmbientModeChanged(true), false),
            (FaceEvent::VisibilityChanged(true), false),
            (FaceEvent::AmbientModeChanged(false), true),
        ];
        for (event, timer_running) in sequence {
            engine.handle(event);
            assert_eq!(engine.state().should_run_timer(), timer_running);
            assert_eq!(engine.scheduler().deadline_ms().is_some(), timer_running);
        }
    }

    #[test]
    fn low_bit_devices_toggle_anti_aliasing() {
        let mut engine = Watchface::new(FaceConfig::default());
        engine.handle(FaceEvent::LowBitAmbientReported(true));
        engine.handle(FaceEvent::AmbientModeChanged(true));
        assert!(!engine.paints().time.anti_alias());
        assert!(!engine.paints().weather.anti_alias());
        engine.handle(FaceEvent::AmbientModeChanged(false));
        assert!(engine.paints().time.anti_alias());
        assert!(engine.paints().weather.anti_alias());
    }

    #[test]
    fn full_color_devices_never_toggle_anti_aliasing() {
        let mut engine = Watchface::new(FaceConfig::default());
        engine.handle(FaceEvent::LowBitAmbientReported(false));
        engine.handle(FaceEvent::AmbientModeChanged(true));
        assert!(engine.paints().time.anti_alias());
        engine.handle(FaceEvent::AmbientModeChanged(false));
        assert!(engine.paints().time.anti_alias());
    }

    #[test]
    fn repeated_ambient_state_does_not_repaint() {
        let mut engine = Watchface::new(FaceConfig::default());
        engine.handle(FaceEvent::AmbientModeChanged(false));
        assert!(!engine.is_dirty());
    }

    #[test]
    fn time_tick_always_requests_redraw() {
        let mut engine = Watchface::new(FaceConfig::default());
        engine.handle(FaceEvent::TimeTick);
        assert!(engine.is_dirty());

        let mut engine = Watchface::new(FaceConfig::default());
        engine.handle(FaceEvent::AmbientModeChanged(true));
        engine.handle(FaceEvent::TimeTick);
        assert!(engine.is_dirty());
    }

    #[test]
    fn weather_snapshot_marks_dirty_and_replaces() {
        let mut engine = Watchface::new(FaceConfig::default());
        engine.on_weather(snapshot(75, 50));
        engine.on_weather(snapshot(68, 41));
        assert_eq!(engine.weather(), Some(&snapshot(68, 41)));
        assert!(engine.is_dirty());
    }

    #[test]
    fn stale_tick_is_discarded() {
        let mut engine = Watchface::new(FaceConfig::default());
        engine.handle(FaceEvent::VisibilityChanged(true));
        let armed = engine.scheduler().generation();
        engine.render_at(&mut display(), NaiveDateTime::UNIX_EPOCH).unwrap();

        engine.handle(FaceEvent::VisibilityChanged(false));
        engine.render_at(&mut display(), NaiveDateTime::UNIX_EPOCH).unwrap();
        engine.tick(armed);
        assert!(!engine.is_dirty());
        assert_eq!(engine.scheduler().deadline_ms(), None);
    }

    #[test]
    fn teardown_cancels_pending_tick_and_mutes_engine() {
        let mut engine = Watchface::new(FaceConfig::default());
        engine.handle(FaceEvent::VisibilityChanged(true));
        assert!(engine.scheduler().deadline_ms().is_some());
        engine.render_at(&mut display(), NaiveDateTime::UNIX_EPOCH).unwrap();

        engine.handle(FaceEvent::Destroyed);
        assert!(!engine.is_alive());
        assert_eq!(engine.scheduler().deadline_ms(), None);

        // Late events and snapshots are no-ops now.
        engine.handle(FaceEvent::TimeTick);
        engine.on_weather(snapshot(75, 50));
        assert!(!engine.is_dirty());
        assert_eq!(engine.weather(), None);

        // A dead engine never paints.
        let mut target = display();
        engine.render_at(&mut target, NaiveDateTime::UNIX_EPOCH).unwrap();
        assert_eq!(target, display());
    }

    #[test]
    fn run_serializes_events_and_weather_until_destroyed() {
        let mut engine = Watchface::new(FaceConfig::default());
        let events: FaceEvents = Channel::new();
        let port = WeatherPort::new();
        let mut target = display();

        std::thread::scope(|s| {
            s.spawn(|| {
                events.try_send(FaceEvent::VisibilityChanged(true)).unwrap();
                port.publish(snapshot(75, 50));
                std::thread::sleep(std::time::Duration::from_millis(100));
                events.try_send(FaceEvent::Destroyed).unwrap();
            });
            block_on(engine.run(&mut target, events.receiver(), &port)).unwrap();
        });

        assert!(!engine.is_alive());
        assert_eq!(engine.weather(), Some(&snapshot(75, 50)));
        // Teardown left no armed tick behind.
        assert_eq!(engine.scheduler().deadline_ms(), None);
    }
}
