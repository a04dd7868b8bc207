#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the wand bridge.
//!
//! - `Config` and its sections are deserialized from TOML; every section is
//!   optional and falls back to defaults matching the stock wand firmware.
//! - `Config::validate` rejects out-of-range values with `section.key` messages.
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Serial {
    /// Line rate of the wand's USB-serial bridge
    pub baud: u32,
    /// Bounded read timeout; also the reader's worst-case shutdown latency
    pub read_timeout_ms: u64,
}

impl Default for Serial {
    fn default() -> Self {
        Self {
            baud: 115_200,
            read_timeout_ms: 500,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Motion {
    /// Gain applied after calibration (1.0 maps half the device range to the full screen)
    pub sensitivity: f64,
    /// EMA factor in (0.0, 1.0]; higher follows the wand more tightly
    pub ema_alpha: f64,
    /// Raw device units clamped to [-scale, scale] before normalization
    pub scale: f64,
}

impl Default for Motion {
    fn default() -> Self {
        Self {
            sensitivity: 1.0,
            ema_alpha: 0.2,
            scale: 8.0,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Gesture {
    /// Primary-button presses released before this count as a click
    pub click_threshold_ms: u64,
    /// Primary-button presses held this long become a press-and-hold
    pub hold_threshold_ms: u64,
    /// When false, the navigation buttons are ignored while the laser is on
    pub nav_while_laser_on: bool,
}

impl Default for Gesture {
    fn default() -> Self {
        Self {
            click_threshold_ms: 400,
            hold_threshold_ms: 400,
            nav_while_laser_on: true,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Button {
    Left,
    Right,
    Middle,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum NavKey {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Space,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Dispatch {
    /// Delay between injected events so the OS registers them (ms)
    pub settle_ms: u64,
    pub click_button: Button,
    pub hold_button: Button,
    pub forward_key: NavKey,
    pub backward_key: NavKey,
}

impl Default for Dispatch {
    fn default() -> Self {
        Self {
            settle_ms: 10,
            click_button: Button::Left,
            hold_button: Button::Right,
            forward_key: NavKey::Right,
            backward_key: NavKey::Left,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Indicator {
    /// Marker radius in pixels
    pub dot_radius: u32,
    /// Hide the system pointer while the marker is shown
    pub hide_system_cursor: bool,
}

impl Default for Indicator {
    fn default() -> Self {
        Self {
            dot_radius: 12,
            hide_system_cursor: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Runner {
    /// Processing loop rate
    pub tick_hz: u32,
}

impl Default for Runner {
    fn default() -> Self {
        Self { tick_hz: 80 }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Screen {
    pub width: u32,
    pub height: u32,
}

impl Default for Screen {
    fn default() -> Self {
        Self {
            width: 1920,
            height: 1080,
        }
    }
}

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum BackendKind {
    /// uinput device with absolute axes
    #[default]
    Absolute,
    /// uinput device with relative axes (best-effort fallback)
    Relative,
    /// Log every call, inject nothing
    DryRun,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Backend {
    pub kind: BackendKind,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub serial: Serial,
    pub motion: Motion,
    pub gesture: Gesture,
    pub dispatch: Dispatch,
    pub indicator: Indicator,
    pub runner: Runner,
    pub screen: Screen,
    pub backend: Backend,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("invalid configuration: {e}"))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Serial
        if self.serial.baud == 0 {
            eyre::bail!("serial.baud must be > 0");
        }
        if self.serial.read_timeout_ms == 0 {
            eyre::bail!("serial.read_timeout_ms must be >= 1");
        }
        if self.serial.read_timeout_ms > 10_000 {
            eyre::bail!("serial.read_timeout_ms is unreasonably large (>10s)");
        }

        // Motion
        if !(self.motion.sensitivity.is_finite() && self.motion.sensitivity > 0.0) {
            eyre::bail!("motion.sensitivity must be > 0.0");
        }
        if !(self.motion.ema_alpha > 0.0 && self.motion.ema_alpha <= 1.0) {
            eyre::bail!("motion.ema_alpha must be in (0.0, 1.0]");
        }
        if !(self.motion.scale.is_finite() && self.motion.scale > 0.0) {
            eyre::bail!("motion.scale must be > 0.0");
        }

        // Gesture
        if self.gesture.click_threshold_ms == 0 {
            eyre::bail!("gesture.click_threshold_ms must be >= 1");
        }
        if self.gesture.hold_threshold_ms == 0 {
            eyre::bail!("gesture.hold_threshold_ms must be >= 1");
        }
        if self.gesture.hold_threshold_ms > 10_000 {
            eyre::bail!("gesture.hold_threshold_ms is unreasonably large (>10s)");
        }
        if self.gesture.click_threshold_ms > self.gesture.hold_threshold_ms {
            eyre::bail!("gesture.click_threshold_ms must be <= gesture.hold_threshold_ms");
        }

        // Dispatch
        if self.dispatch.settle_ms < 10 {
            eyre::bail!("dispatch.settle_ms must be >= 10 so clicks register");
        }
        if self.dispatch.settle_ms > 100 {
            eyre::bail!("dispatch.settle_ms must be <= 100 to keep the tick budget");
        }

        // Indicator
        if self.indicator.dot_radius == 0 {
            eyre::bail!("indicator.dot_radius must be >= 1");
        }

        // Runner
        if !(10..=240).contains(&self.runner.tick_hz) {
            eyre::bail!("runner.tick_hz must be in [10, 240]");
        }

        // Screen
        if self.screen.width == 0 || self.screen.height == 0 {
            eyre::bail!("screen.width and screen.height must be > 0");
        }
        if self.screen.width > i32::MAX as u32 || self.screen.height > i32::MAX as u32 {
            eyre::bail!("screen dimensions are out of range");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly");
        }

        Ok(())
    }
}
