//! Per-tick and per-run reports.

use crate::gesture::IntentEvent;
use crate::motion::CalibrationOffset;

/// What one processing step did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Samples consumed this tick (only the newest moved the filter).
    pub samples: usize,
    /// Intents dispatched, in order.
    pub events: Vec<IntentEvent>,
}

/// Running totals kept by the bridge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BridgeStats {
    pub samples: u64,
    pub intents: u64,
    pub transport_errors: u64,
}

/// Why the processing loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    /// The shared stop flag was raised (Ctrl-C, escape key).
    Stopped,
    /// An explicit quit command arrived.
    Quit,
    /// The configured run deadline passed.
    Deadline,
}

impl ExitReason {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Stopped => "stopped",
            Self::Quit => "quit",
            Self::Deadline => "deadline",
        }
    }
}

/// Returned by `runner::run`.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub exit: ExitReason,
    pub ticks: u64,
    pub missed_deadlines: u64,
    pub stats: BridgeStats,
    pub injection_failures: u64,
    pub calibration: CalibrationOffset,
    /// Per-tick processing time in microseconds; empty unless stats were requested.
    pub tick_us: Vec<u64>,
}
