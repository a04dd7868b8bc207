//! Fixed-rate processing loop.

use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use airpoint_traits::{Clock, InputInjector, Renderer};
use crossbeam_channel as xch;

use crate::bridge::Bridge;
use crate::config::LoopCfg;
use crate::reader::Inbox;
use crate::status::{ExitReason, RunSummary};
use crate::util::{period_us, saturating_us};

/// Operator commands delivered from the keyboard thread.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Calibrate,
    Quit,
}

/// Warn once when no frame has arrived for this long.
pub const STALL_WARN_MS: u64 = 2_000;

/// Drive `bridge` at `cfg.tick_hz` until the stop flag, a `Quit` command, or
/// the run deadline. On exit any open hold is released, the marker hidden and
/// the system cursor restored before the summary is returned.
///
/// A tick that runs past its period is counted as missed and the next one
/// starts immediately; there is no catch-up burst.
pub fn run<I, X, R, C>(
    bridge: &mut Bridge<I>,
    inbox: &mut X,
    renderer: &mut R,
    commands: &xch::Receiver<Command>,
    stop: &AtomicBool,
    clock: &C,
    cfg: LoopCfg,
) -> RunSummary
where
    I: InputInjector,
    X: Inbox + ?Sized,
    R: Renderer + ?Sized,
    C: Clock + ?Sized,
{
    let period = Duration::from_micros(period_us(cfg.tick_hz));
    let start = clock.now();
    let mut ticks: u64 = 0;
    let mut missed: u64 = 0;
    let mut tick_us = Vec::new();
    let mut stall_warned = false;

    tracing::info!(tick_hz = cfg.tick_hz, max_run = ?cfg.max_run, "processing loop start");

    let exit = loop {
        if stop.load(Ordering::Relaxed) {
            break ExitReason::Stopped;
        }
        let t0 = clock.now();
        if let Some(max) = cfg.max_run
            && t0.saturating_duration_since(start) >= max
        {
            break ExitReason::Deadline;
        }

        let mut quit = false;
        for cmd in commands.try_iter() {
            match cmd {
                Command::Calibrate => {
                    bridge.calibrate();
                }
                Command::Quit => quit = true,
            }
        }
        if quit {
            break ExitReason::Quit;
        }

        let report = bridge.process(inbox.drain(), clock.now());
        if !report.events.is_empty() {
            tracing::debug!(events = ?report.events, samples = report.samples, "tick");
        }
        renderer.render(&bridge.frame());
        ticks += 1;

        if let Some(ms) = inbox.stalled_ms() {
            if ms > STALL_WARN_MS && !stall_warned {
                tracing::warn!(stalled_ms = ms, "no frames from the wand");
                stall_warned = true;
            } else if ms <= STALL_WARN_MS && stall_warned {
                tracing::info!("frames resumed");
                stall_warned = false;
            }
        }

        let elapsed = clock.now().saturating_duration_since(t0);
        if cfg.collect_stats {
            tick_us.push(saturating_us(elapsed));
        }
        if elapsed > period {
            missed += 1;
            tracing::trace!(elapsed_us = saturating_us(elapsed), "tick overran");
        } else {
            clock.sleep(period - elapsed);
        }
    };

    bridge.shutdown(clock.now());
    renderer.render(&bridge.frame());

    let stats = bridge.stats();
    tracing::info!(
        exit = exit.as_str(),
        ticks,
        missed,
        samples = stats.samples,
        intents = stats.intents,
        "processing loop finished"
    );
    RunSummary {
        exit,
        ticks,
        missed_deadlines: missed,
        stats,
        injection_failures: bridge.dispatcher().failures(),
        calibration: bridge.calibration(),
        tick_us,
    }
}
