//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

/// `--port` value that selects the built-in simulated wand.
pub const SIM_PORT: &str = "sim";

#[derive(Parser, Debug)]
#[command(
    name = "airpoint",
    version,
    about = "Drive the desktop pointer with a serial air-mouse wand"
)]
pub struct Cli {
    /// Serial port of the wand (e.g. /dev/ttyUSB0), or `sim` for the built-in simulator
    #[arg(long, value_name = "PORT")]
    pub port: String,

    /// Serial baud rate [default: 115200]
    #[arg(long, value_name = "BAUD")]
    pub baud: Option<u32>,

    /// Pointer gain applied after normalization [default: 1.0]
    #[arg(long, value_name = "GAIN")]
    pub sensitivity: Option<f64>,

    /// Indicator dot radius in pixels [default: 12]
    #[arg(long, value_name = "PX")]
    pub dot: Option<u32>,

    /// Optional config TOML; flags override its values
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Input injection backend [default: absolute]
    #[arg(long, value_enum, value_name = "KIND")]
    pub backend: Option<BackendArg>,

    /// Screen size used to map wand motion, e.g. 1920x1080
    #[arg(long, value_name = "WxH", value_parser = parse_screen)]
    pub screen: Option<(u32, u32)>,

    /// Presses shorter than this click [default: 400]
    #[arg(long, value_name = "MS")]
    pub click_threshold_ms: Option<u64>,

    /// Presses held this long start a drag [default: 400]
    #[arg(long, value_name = "MS")]
    pub hold_threshold_ms: Option<u64>,

    /// Suppress forward/backward keys while the laser is on
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_nav_while_laser: bool,

    /// Processing loop rate in Hz (10..=240) [default: 80]
    #[arg(long, value_name = "HZ")]
    pub tick_hz: Option<u32>,

    /// Do not read keyboard shortcuts from the terminal
    #[arg(long, action = ArgAction::SetTrue)]
    pub no_keys: bool,

    /// Exit after this many milliseconds
    #[arg(long, value_name = "MS")]
    pub run_for_ms: Option<u64>,

    /// Print processing loop timing stats on exit
    #[arg(long, action = ArgAction::SetTrue)]
    pub stats: bool,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum BackendArg {
    /// uinput pointer with absolute axes
    Absolute,
    /// uinput pointer with relative axes
    Relative,
    /// Log injector calls without touching the OS
    DryRun,
}

impl From<BackendArg> for airpoint_config::BackendKind {
    fn from(b: BackendArg) -> Self {
        match b {
            BackendArg::Absolute => Self::Absolute,
            BackendArg::Relative => Self::Relative,
            BackendArg::DryRun => Self::DryRun,
        }
    }
}

/// Parse `WIDTHxHEIGHT`.
pub fn parse_screen(s: &str) -> Result<(u32, u32), String> {
    let (w, h) = s
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {s:?}"))?;
    let w: u32 = w.trim().parse().map_err(|_| format!("bad width in {s:?}"))?;
    let h: u32 = h.trim().parse().map_err(|_| format!("bad height in {s:?}"))?;
    if w == 0 || h == 0 {
        return Err("screen width and height must be > 0".to_string());
    }
    Ok((w, h))
}

impl Cli {
    /// Fold flag values over a loaded config.
    pub fn apply_overrides(&self, cfg: &mut airpoint_config::Config) {
        if let Some(b) = self.baud {
            cfg.serial.baud = b;
        }
        if let Some(s) = self.sensitivity {
            cfg.motion.sensitivity = s;
        }
        if let Some(d) = self.dot {
            cfg.indicator.dot_radius = d;
        }
        if let Some(b) = self.backend {
            cfg.backend.kind = b.into();
        }
        if let Some((w, h)) = self.screen {
            cfg.screen.width = w;
            cfg.screen.height = h;
        }
        if let Some(ms) = self.click_threshold_ms {
            cfg.gesture.click_threshold_ms = ms;
        }
        if let Some(ms) = self.hold_threshold_ms {
            cfg.gesture.hold_threshold_ms = ms;
        }
        if self.no_nav_while_laser {
            cfg.gesture.nav_while_laser_on = false;
        }
        if let Some(hz) = self.tick_hz {
            cfg.runner.tick_hz = hz;
        }
        if let Some(level) = &self.log_level {
            cfg.logging.level = Some(level.clone());
        }
    }
}
