#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::missing_errors_doc,
    clippy::cast_possible_truncation
)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Wand-to-pointer bridge (hardware-agnostic).
//!
//! All OS interaction goes through `airpoint_traits::InputInjector` and
//! `airpoint_traits::Renderer`; the transport is any `LineSource`.
//!
//! ## Pipeline
//!
//! - **Frame parsing**: tagged and CSV line grammars (`frame`)
//! - **Motion**: clamp, normalize, calibrate, EMA smoothing (`motion`)
//! - **Gestures**: laser toggle, click vs hold, nav keys (`gesture`)
//! - **Dispatch**: injector sequences with cursor save/restore (`dispatch`)
//! - **Indicator**: marker visibility and repaint regions (`indicator`)
//!
//! The transport runs on its own thread (`reader`); everything else runs on
//! the fixed-rate processing loop (`runner`) through `Bridge`.

pub mod bridge;
pub mod builder;
pub mod config;
pub mod conversions;
pub mod dispatch;
pub mod error;
pub mod frame;
pub mod gesture;
pub mod indicator;
pub mod inject_error;
pub mod mocks;
pub mod motion;
pub mod reader;
pub mod runner;
pub mod status;
pub mod util;

pub use bridge::Bridge;
pub use builder::BridgeBuilder;
pub use config::{DispatchCfg, GestureCfg, IndicatorCfg, LoopCfg, MotionCfg, SCALE, Screen};
pub use error::{BridgeError, BuildError, ParseError};
pub use frame::{ButtonVector, FrameParser, RawSample};
pub use gesture::{GestureMachine, GestureState, IntentEvent, NavDirection};
pub use motion::{CalibrationOffset, MotionFilter, SmoothingState};
pub use reader::{Inbox, Message, Reader};
pub use runner::{Command, run};
pub use status::{BridgeStats, ExitReason, RunSummary, TickReport};
