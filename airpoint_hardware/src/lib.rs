pub mod error;
pub mod serial;
#[cfg(all(feature = "uinput", target_os = "linux"))]
pub mod uinput;
pub mod util;

use airpoint_traits::{BoxError, Coordinate, InputInjector, Key, LineSource, MouseButton};
use std::time::Duration;

use crate::error::HwError;
use crate::util::DisplayCounter;

pub use serial::SerialLineSource;

/// Injection backend selected at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorKind {
    Absolute,
    Relative,
    DryRun,
}

/// Build the requested backend. uinput backends fail with
/// `HwError::Unsupported` on builds without the `uinput` feature.
pub fn open_injector(
    kind: InjectorKind,
    name: &str,
    width: i32,
    height: i32,
) -> Result<Box<dyn InputInjector>, HwError> {
    match kind {
        InjectorKind::DryRun => Ok(Box::new(DryRunInjector::new(width, height))),
        #[cfg(all(feature = "uinput", target_os = "linux"))]
        InjectorKind::Absolute => Ok(Box::new(uinput::UinputAbsolute::new(name, width, height)?)),
        #[cfg(all(feature = "uinput", target_os = "linux"))]
        InjectorKind::Relative => Ok(Box::new(uinput::UinputRelative::new(name, width, height)?)),
        #[cfg(not(all(feature = "uinput", target_os = "linux")))]
        InjectorKind::Absolute | InjectorKind::Relative => {
            let _ = name;
            Err(HwError::Unsupported(
                "uinput backends need Linux and the `uinput` feature; use --backend dry-run",
            ))
        }
    }
}

/// Injector that logs every call instead of touching the OS.
///
/// Tracks a shadow cursor so save/restore sequences read naturally in logs.
pub struct DryRunInjector {
    position: Coordinate,
    width: i32,
    height: i32,
    cursor: DisplayCounter,
}

impl DryRunInjector {
    pub fn new(width: i32, height: i32) -> Self {
        Self {
            position: Coordinate::new(width / 2, height / 2),
            width,
            height,
            cursor: DisplayCounter::default(),
        }
    }
}

impl InputInjector for DryRunInjector {
    fn move_cursor_absolute(&mut self, at: Coordinate) -> Result<(), BoxError> {
        let at = Coordinate::new(
            at.x.clamp(0, self.width - 1),
            at.y.clamp(0, self.height - 1),
        );
        tracing::debug!(x = at.x, y = at.y, "dry-run: move cursor");
        self.position = at;
        Ok(())
    }

    fn cursor_position(&mut self) -> Result<Coordinate, BoxError> {
        Ok(self.position)
    }

    fn mouse_button(&mut self, button: MouseButton, down: bool) -> Result<(), BoxError> {
        tracing::info!(?button, down, "dry-run: mouse button");
        Ok(())
    }

    fn key_press(&mut self, key: Key) -> Result<(), BoxError> {
        tracing::info!(?key, "dry-run: key press");
        Ok(())
    }

    fn set_system_cursor_visible(&mut self, show: bool) -> Result<i32, BoxError> {
        let count = self.cursor.adjust(show);
        tracing::debug!(show, count, "dry-run: system cursor");
        Ok(count)
    }
}

/// Built-in wand simulator, selected with `--port sim`.
///
/// Emits tagged frames at `rate_hz` tracing a slow Lissajous figure, and runs
/// a fixed six-second button script: laser on, a tap, a long hold, forward,
/// backward, laser off.
pub struct SimulatedWand {
    rate_hz: u32,
    k: u64,
    noise_every: Option<u64>,
    pace: bool,
}

impl SimulatedWand {
    pub fn new(rate_hz: u32) -> Self {
        Self {
            rate_hz: rate_hz.max(1),
            k: 0,
            noise_every: None,
            pace: true,
        }
    }

    /// Replace every `n`th frame with an unparseable line.
    pub fn with_noise_every(mut self, n: u64) -> Self {
        self.noise_every = (n > 0).then_some(n);
        self
    }

    /// Produce frames as fast as they are requested (tests).
    pub fn unpaced(mut self) -> Self {
        self.pace = false;
        self
    }

    /// Button vector the script prescribes at `t_ms` into the cycle.
    pub fn script_buttons(t_ms: u64) -> [u8; 4] {
        let t = t_ms % 6000;
        let pulse = |start: u64, len: u64| u8::from(t >= start && t < start + len);
        [
            pulse(4500, 100),                      // b0 forward
            pulse(1500, 150) | pulse(3000, 900),   // b1 tap, then hold
            pulse(500, 100) | pulse(5500, 100),    // b2 laser on/off
            pulse(5000, 100),                      // b3 backward
        ]
    }

    fn frame(&self) -> String {
        let t_ms = self.k * 1000 / u64::from(self.rate_hz);
        let t = t_ms as f64 / 1000.0;
        let z = 6.0 * (t * 0.7).sin();
        let y = 4.0 * (t * 1.1).sin();
        let x = 0.5 * (t * 0.3).cos();
        let b = Self::script_buttons(t_ms);
        format!(
            "RX -> X:{x:.2} Y:{y:.2} Z:{z:.2} | Buttons: {} {} {} {}",
            b[0], b[1], b[2], b[3]
        )
    }
}

impl LineSource for SimulatedWand {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, BoxError> {
        if self.pace {
            std::thread::sleep(Duration::from_micros(1_000_000 / u64::from(self.rate_hz)));
        }
        let line = match self.noise_every {
            Some(n) if self.k % n == n - 1 => "~~ line noise ~~".to_string(),
            _ => self.frame(),
        };
        self.k = self.k.wrapping_add(1);
        Ok(Some(line.into_bytes()))
    }

    fn describe(&self) -> String {
        format!("simulated wand @ {} Hz", self.rate_hz)
    }
}
