//! Human-readable error descriptions and structured JSON error formatting.

use airpoint_core::{BridgeError, BuildError};

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingInjector => {
                "What happened: No input backend was provided to the bridge.\nLikely causes: The injector failed to initialize or was not wired into the builder.\nHow to fix: Pick a backend with --backend (dry-run works everywhere).".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or on the command line.\nHow to fix: Edit the config file or flags, then rerun."
            ),
        };
    }

    if let Some(be) = err.downcast_ref::<BridgeError>() {
        return match be {
            BridgeError::Unsupported(what) => format!(
                "What happened: The input backend is unavailable ({what}).\nLikely causes: Non-Linux host, or a build without the `uinput` feature.\nHow to fix: Use --backend dry-run, or rebuild with the `uinput` feature on Linux."
            ),
            BridgeError::Injection(msg) => format!(
                "What happened: Could not create the virtual pointer ({msg}).\nLikely causes: No write access to /dev/uinput, or the uinput module is not loaded.\nHow to fix: Run `modprobe uinput` and add your user to the group that owns /dev/uinput."
            ),
            BridgeError::TransportOpen(msg) => format!(
                "What happened: The wand's serial port could not be opened ({msg}).\nLikely causes: Wrong --port, device unplugged, or missing permission (dialout group).\nHow to fix: Check the port name and cable, or try --port sim."
            ),
            other => format!(
                "What happened: {other}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
            ),
        };
    }

    // String-based heuristics for errors coming from init or config
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.contains("read config") {
        return format!(
            "What happened: The config file could not be read.\nLikely causes: Wrong --config path or missing permission.\nHow to fix: Check the path and rerun. Original: {msg}"
        );
    }

    if lower.contains("invalid configuration") || lower.contains(" must be") {
        return format!(
            "What happened: Configuration is invalid ({msg}).\nLikely causes: A TOML syntax error or an out-of-range value.\nHow to fix: Edit the TOML config or the matching flag and try again."
        );
    }

    if lower.contains("tracing") || lower.contains("log dir") {
        return format!(
            "What happened: Logging could not be set up ({msg}).\nLikely causes: Unwritable [logging] file path.\nHow to fix: Point logging.file at a writable location or remove it."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 1 for configuration problems, 3 for an unavailable
/// input backend, 1 otherwise. Usage errors exit 2 via clap.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    if let Some(be) = err.downcast_ref::<BridgeError>() {
        return match be {
            BridgeError::Unsupported(_) | BridgeError::Injection(_) => 3,
            _ => 1,
        };
    }
    1
}

/// Short stable name for the JSON `reason` field.
fn reason_name(err: &eyre::Report) -> &'static str {
    if err.downcast_ref::<BuildError>().is_some() {
        return "Config";
    }
    match err.downcast_ref::<BridgeError>() {
        Some(BridgeError::Unsupported(_) | BridgeError::Injection(_)) => "Backend",
        Some(BridgeError::TransportOpen(_) | BridgeError::TransportRead(_)) => "Transport",
        Some(BridgeError::Config(_)) => "Config",
        Some(_) => "Bridge",
        None if err.to_string().contains(" must be") => "Config",
        None => "Error",
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    serde_json::json!({
        "reason": reason_name(err),
        "exit_code": exit_code_for_error(err),
        "message": humanize(err),
    })
    .to_string()
}
