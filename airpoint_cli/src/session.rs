//! Wires transport, bridge, keyboard and runner for one `airpoint` run.

use std::sync::Arc;
use std::sync::atomic::AtomicBool;
use std::time::Duration;

use airpoint_config::{BackendKind, Config};
use airpoint_core::inject_error::{Site, map_hw_error};
use airpoint_core::util::period_us;
use airpoint_core::{Bridge, LoopCfg, Reader, RunSummary};
use airpoint_hardware::{InjectorKind, SerialLineSource, SimulatedWand, open_injector};
use airpoint_traits::{BoxError, InputInjector, MonotonicClock};
use crossbeam_channel as xch;
use eyre::WrapErr;

use crate::cli::{Cli, SIM_PORT};
use crate::keys::KeyListener;
use crate::render::LogRenderer;

/// Frame rate of the built-in simulator.
const SIM_RATE_HZ: u32 = 100;
const DEVICE_NAME: &str = "airpoint wand";

fn injector_kind(kind: BackendKind) -> InjectorKind {
    match kind {
        BackendKind::Absolute => InjectorKind::Absolute,
        BackendKind::Relative => InjectorKind::Relative,
        BackendKind::DryRun => InjectorKind::DryRun,
    }
}

fn spawn_reader(port: &str, cfg: &Config, clock: MonotonicClock) -> Reader {
    if port == SIM_PORT {
        return Reader::spawn(|| Ok::<_, BoxError>(SimulatedWand::new(SIM_RATE_HZ)), clock);
    }
    let port = port.to_string();
    let baud = cfg.serial.baud;
    let timeout = Duration::from_millis(cfg.serial.read_timeout_ms);
    Reader::spawn(
        move || SerialLineSource::open(&port, baud, timeout).map_err(BoxError::from),
        clock,
    )
}

/// Run the bridge until stopped. Transport failures do not end the run;
/// only a backend that cannot be created does.
pub fn run(cli: &Cli, cfg: &Config, stop: Arc<AtomicBool>) -> eyre::Result<RunSummary> {
    let clock = MonotonicClock::new();

    let injector: Box<dyn InputInjector> = open_injector(
        injector_kind(cfg.backend.kind),
        DEVICE_NAME,
        i32::try_from(cfg.screen.width).unwrap_or(i32::MAX),
        i32::try_from(cfg.screen.height).unwrap_or(i32::MAX),
    )
    .map_err(|e| eyre::Report::new(map_hw_error(&e, Site::Inject)))?;

    let mut bridge: Bridge<Box<dyn InputInjector>> = Bridge::builder()
        .with_injector(injector)
        .with_clock(Arc::new(clock))
        .with_config(cfg)
        .try_build()
        .wrap_err("assemble bridge")?;

    tracing::info!(
        port = %cli.port,
        backend = ?cfg.backend.kind,
        width = cfg.screen.width,
        height = cfg.screen.height,
        "starting"
    );
    let mut reader = spawn_reader(&cli.port, cfg, clock);

    let (tx, rx) = xch::unbounded();
    let keys = if cli.no_keys {
        None
    } else {
        KeyListener::start(tx, stop.clone())
    };

    let mut loop_cfg = LoopCfg::from(&cfg.runner);
    loop_cfg.max_run = cli.run_for_ms.map(Duration::from_millis);
    loop_cfg.collect_stats = cli.stats;

    let mut renderer = LogRenderer::default();
    let summary = airpoint_core::run(
        &mut bridge,
        &mut reader,
        &mut renderer,
        &rx,
        &stop,
        &clock,
        loop_cfg,
    );

    drop(keys);
    let dropped = reader.dropped_lines();
    drop(reader);
    tracing::debug!(
        dropped_lines = dropped,
        repaints = renderer.repaints(),
        "session closed"
    );

    if cli.stats {
        print_stats(&summary.tick_us, summary.ticks, summary.missed_deadlines, loop_cfg.tick_hz);
    }
    Ok(summary)
}

/// Print processing loop timing stats to stderr.
fn print_stats(tick_us: &[u64], ticks: u64, missed_deadlines: u64, tick_hz: u32) {
    let expected_period_us = period_us(tick_hz);
    let min = tick_us.iter().min().copied().unwrap_or(0);
    let max = tick_us.iter().max().copied().unwrap_or(0);
    let avg = if tick_us.is_empty() {
        0.0
    } else {
        tick_us.iter().sum::<u64>() as f64 / tick_us.len() as f64
    };
    let stdev = if tick_us.len() > 1 {
        let var = tick_us
            .iter()
            .map(|&x| (x as f64 - avg).powi(2))
            .sum::<f64>()
            / (tick_us.len() as f64 - 1.0);
        var.sqrt()
    } else {
        0.0
    };
    eprintln!("\n--- Airpoint Stats ---");
    eprintln!("Ticks: {ticks}");
    eprintln!("Period (us): {expected_period_us}");
    eprintln!("Tick time min/avg/max/stdev (us): {min} / {avg:.1} / {max} / {stdev:.1}");
    eprintln!("Missed deadlines (> period): {missed_deadlines}");
    eprintln!("----------------------\n");
}
