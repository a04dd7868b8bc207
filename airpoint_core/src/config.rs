//! Runtime configuration for the bridge components.
//!
//! These are separate from the TOML-deserialized types in `airpoint_config`;
//! see `conversions` for the mapping.

use std::time::Duration;

use airpoint_traits::{Coordinate, Key, MouseButton};

/// Full value range of the horizontal/vertical motion channels.
pub const SCALE: f64 = 8.0;

/// Screen extent in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Screen {
    pub width: i32,
    pub height: i32,
}

impl Screen {
    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Coordinate {
        Coordinate::new(self.width / 2, self.height / 2)
    }

    pub fn clamp(&self, c: Coordinate) -> Coordinate {
        Coordinate::new(
            c.x.clamp(0, (self.width - 1).max(0)),
            c.y.clamp(0, (self.height - 1).max(0)),
        )
    }
}

impl Default for Screen {
    fn default() -> Self {
        Self::new(1920, 1080)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionCfg {
    /// Gain applied after normalization. Must be > 0.
    pub sensitivity: f64,
    /// EMA weight of the newest target, in (0.0, 1.0].
    pub ema_alpha: f64,
    /// Raw channel range; values are clamped to `[-scale, scale]`.
    pub scale: f64,
}

impl Default for MotionCfg {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            ema_alpha: 0.2,
            scale: SCALE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GestureCfg {
    /// Presses shorter than this are clicks.
    pub click_threshold: Duration,
    /// Presses held this long start a drag.
    pub hold_threshold: Duration,
    /// When false, nav keys are suppressed while the laser is on.
    pub nav_while_laser_on: bool,
}

impl Default for GestureCfg {
    fn default() -> Self {
        Self {
            click_threshold: Duration::from_millis(400),
            hold_threshold: Duration::from_millis(400),
            nav_while_laser_on: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchCfg {
    /// Pause after each synthetic move and between down/up.
    pub settle: Duration,
    pub click_button: MouseButton,
    pub hold_button: MouseButton,
    pub forward_key: Key,
    pub backward_key: Key,
}

impl Default for DispatchCfg {
    fn default() -> Self {
        Self {
            settle: Duration::from_millis(10),
            click_button: MouseButton::Left,
            hold_button: MouseButton::Right,
            forward_key: Key::Right,
            backward_key: Key::Left,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorCfg {
    pub radius: u32,
    pub hide_system_cursor: bool,
}

impl Default for IndicatorCfg {
    fn default() -> Self {
        Self {
            radius: 12,
            hide_system_cursor: true,
        }
    }
}

/// Processing loop settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopCfg {
    pub tick_hz: u32,
    /// Stop after this long; `None` runs until told to stop.
    pub max_run: Option<Duration>,
    /// Keep per-tick latencies for the summary.
    pub collect_stats: bool,
}

impl Default for LoopCfg {
    fn default() -> Self {
        Self {
            tick_hz: 80,
            max_run: None,
            collect_stats: false,
        }
    }
}
