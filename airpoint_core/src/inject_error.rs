//! Maps `Box<dyn Error>` from trait boundaries to typed `BridgeError`.
//!
//! The traits in `airpoint_traits` use `Box<dyn Error + Send + Sync>`; this
//! module converts those to our enum, with an optional feature-gated path for
//! `airpoint_hardware::HwError` downcasting.

use crate::error::BridgeError;

/// Where the error was raised. Untyped errors are classified by site.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Site {
    Open,
    Read,
    Inject,
}

/// Map a trait-boundary error to a typed `BridgeError`.
///
/// Attempts to downcast known hardware error types first, then falls back
/// to the call site and a string heuristic for timeouts.
pub fn map_hw_error(e: &(dyn std::error::Error + 'static), site: Site) -> BridgeError {
    #[cfg(feature = "hardware-errors")]
    {
        use airpoint_hardware::error::HwError;
        if let Some(hw) = e.downcast_ref::<HwError>() {
            return match hw {
                HwError::SerialOpen { .. } => BridgeError::TransportOpen(hw.to_string()),
                HwError::SerialRead(_) => BridgeError::TransportRead(hw.to_string()),
                HwError::Timeout => BridgeError::Timeout,
                HwError::Unsupported(what) => BridgeError::Unsupported((*what).to_string()),
                HwError::Uinput(_) | HwError::Io(_) => by_site(hw.to_string(), site),
            };
        }
    }

    let s = e.to_string();
    if s.to_lowercase().contains("timeout") || s.to_lowercase().contains("timed out") {
        BridgeError::Timeout
    } else {
        by_site(s, site)
    }
}

fn by_site(msg: String, site: Site) -> BridgeError {
    match site {
        Site::Open => BridgeError::TransportOpen(msg),
        Site::Read => BridgeError::TransportRead(msg),
        Site::Inject => BridgeError::Injection(msg),
    }
}
