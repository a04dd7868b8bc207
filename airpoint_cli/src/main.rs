mod cli;
mod error_fmt;
mod keys;
mod logging;
mod render;
mod session;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use airpoint_core::RunSummary;
use clap::Parser;

use crate::cli::{Cli, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};

fn main() {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);

    if let Err(e) = try_main(&cli) {
        if JSON_MODE.get().copied().unwrap_or(false) {
            eprintln!("{}", format_error_json(&e));
        } else {
            eprintln!("{}", humanize(&e));
        }
        std::process::exit(exit_code_for_error(&e));
    }
}

fn load_config(cli: &Cli) -> eyre::Result<airpoint_config::Config> {
    let mut cfg = match &cli.config {
        Some(path) => airpoint_config::load_file(path)?,
        None => airpoint_config::Config::default(),
    };
    cli.apply_overrides(&mut cfg);
    cfg.validate()?;
    Ok(cfg)
}

fn try_main(cli: &Cli) -> eyre::Result<()> {
    let cfg = load_config(cli)?;

    let level = cfg.logging.level.as_deref().unwrap_or("info").to_string();
    logging::init(&level, cli.json, &cfg.logging)?;

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        if let Err(e) = ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed)) {
            tracing::warn!(error = %e, "could not install Ctrl-C handler");
        }
    }

    let summary = session::run(cli, &cfg, stop)?;
    print_summary(&summary, cli.json);
    Ok(())
}

fn print_summary(s: &RunSummary, json: bool) {
    if json {
        let obj = serde_json::json!({
            "exit": s.exit.as_str(),
            "ticks": s.ticks,
            "missed_deadlines": s.missed_deadlines,
            "samples": s.stats.samples,
            "intents": s.stats.intents,
            "transport_errors": s.stats.transport_errors,
            "injection_failures": s.injection_failures,
            "calibration": { "cx": s.calibration.cx, "cy": s.calibration.cy },
        });
        println!("{obj}");
    } else {
        println!(
            "exit: {} | ticks: {} | samples: {} | intents: {} | transport errors: {} | injection failures: {}",
            s.exit.as_str(),
            s.ticks,
            s.stats.samples,
            s.stats.intents,
            s.stats.transport_errors,
            s.injection_failures
        );
    }
}
