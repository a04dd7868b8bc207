//! `From` implementations bridging `airpoint_config` types to runtime types.

use std::time::Duration;

use airpoint_traits::{Key, MouseButton};

use crate::config::{DispatchCfg, GestureCfg, IndicatorCfg, LoopCfg, MotionCfg, Screen};

impl From<&airpoint_config::Motion> for MotionCfg {
    fn from(c: &airpoint_config::Motion) -> Self {
        Self {
            sensitivity: c.sensitivity,
            ema_alpha: c.ema_alpha,
            scale: c.scale,
        }
    }
}

impl From<&airpoint_config::Gesture> for GestureCfg {
    fn from(c: &airpoint_config::Gesture) -> Self {
        Self {
            click_threshold: Duration::from_millis(c.click_threshold_ms),
            hold_threshold: Duration::from_millis(c.hold_threshold_ms),
            nav_while_laser_on: c.nav_while_laser_on,
        }
    }
}

// Both sides live in other crates, so these are plain functions.
fn mouse_button(b: airpoint_config::Button) -> MouseButton {
    match b {
        airpoint_config::Button::Left => MouseButton::Left,
        airpoint_config::Button::Right => MouseButton::Right,
        airpoint_config::Button::Middle => MouseButton::Middle,
    }
}

fn key(k: airpoint_config::NavKey) -> Key {
    use airpoint_config::NavKey;
    match k {
        NavKey::Left => Key::Left,
        NavKey::Right => Key::Right,
        NavKey::Up => Key::Up,
        NavKey::Down => Key::Down,
        NavKey::PageUp => Key::PageUp,
        NavKey::PageDown => Key::PageDown,
        NavKey::Space => Key::Space,
    }
}

impl From<&airpoint_config::Dispatch> for DispatchCfg {
    fn from(c: &airpoint_config::Dispatch) -> Self {
        Self {
            settle: Duration::from_millis(c.settle_ms),
            click_button: mouse_button(c.click_button),
            hold_button: mouse_button(c.hold_button),
            forward_key: key(c.forward_key),
            backward_key: key(c.backward_key),
        }
    }
}

impl From<&airpoint_config::Indicator> for IndicatorCfg {
    fn from(c: &airpoint_config::Indicator) -> Self {
        Self {
            radius: c.dot_radius,
            hide_system_cursor: c.hide_system_cursor,
        }
    }
}

impl From<&airpoint_config::Screen> for Screen {
    fn from(c: &airpoint_config::Screen) -> Self {
        Self::new(
            i32::try_from(c.width).unwrap_or(i32::MAX),
            i32::try_from(c.height).unwrap_or(i32::MAX),
        )
    }
}

impl From<&airpoint_config::Runner> for LoopCfg {
    fn from(c: &airpoint_config::Runner) -> Self {
        Self {
            tick_hz: c.tick_hz,
            ..Self::default()
        }
    }
}
