//! Lifecycle state machine for the watch face

use crate::ui::ScreenShape;

/// Tap gesture phases forwarded by the host
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TapKind {
    /// Finger touched down
    Touch,
    /// Gesture abandoned or turned into another gesture
    TouchCancel,
    /// Completed tap
    Tap,
}

/// Lifecycle and input events delivered by the host toolkit.
///
/// All host callbacks funnel through this one tagged enum and the single
/// [`Watchface::handle`](crate::Watchface::handle) entry point.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FaceEvent {
    /// Face became visible or was hidden
    VisibilityChanged(bool),
    /// Device entered or left ambient mode
    AmbientModeChanged(bool),
    /// Once-per-minute heartbeat, delivered in every mode
    TimeTick,
    /// Low-bit ambient capability, reported once after creation
    LowBitAmbientReported(bool),
    /// Screen shape, from the window insets
    ShapeChanged(ScreenShape),
    /// Local UTC offset changed
    TimeZoneChanged { offset_seconds: i32 },
    /// Tap gesture at the given coordinates
    Tap { kind: TapKind, x: i32, y: i32, at_ms: u64 },
    /// Host is tearing the face down
    Destroyed,
}

/// Visibility/ambient state of the face.
///
/// Starts hidden and interactive: the engine exists before the face is
/// first shown. `low_bit_ambient` is a device capability, reported once
/// and then static.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AmbientState {
    visible: bool,
    ambient: bool,
    low_bit_ambient: bool,
}

impl AmbientState {
    /// Initial state: interactive and hidden
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the face is currently shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Whether the device is in ambient mode
    pub fn is_ambient(&self) -> bool {
        self.ambient
    }

    /// Whether ambient mode renders with reduced color depth
    pub fn low_bit_ambient(&self) -> bool {
        self.low_bit_ambient
    }

    /// Set visibility; returns whether the value changed
    pub fn set_visible(&mut self, visible: bool) -> bool {
        let changed = self.visible != visible;
        self.visible = visible;
        changed
    }

    /// Set ambient mode; returns whether the value changed
    pub fn set_ambient(&mut self, ambient: bool) -> bool {
        let changed = self.ambient != ambient;
        self.ambient = ambient;
        changed
    }

    /// Record the device capability
    pub fn set_low_bit_ambient(&mut self, low_bit: bool) {
        self.low_bit_ambient = low_bit;
    }

    /// The per-second timer runs only while the face is visible and
    /// interactive.
    pub fn should_run_timer(&self) -> bool {
        self.visible && !self.ambient
    }
}
