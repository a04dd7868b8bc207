//! Builder for `Bridge`.
//!
//! `try_build()` validates every runtime config and reports failures as
//! `BuildError` inside an `eyre::Report`.

use std::sync::Arc;
use std::time::Duration;

use airpoint_traits::{Clock, InputInjector, MonotonicClock};

use crate::bridge::Bridge;
use crate::config::{DispatchCfg, GestureCfg, IndicatorCfg, MotionCfg, Screen};
use crate::dispatch::ActionDispatcher;
use crate::error::{BuildError, Result};
use crate::gesture::GestureMachine;
use crate::indicator::Indicator;
use crate::motion::MotionFilter;
use crate::status::BridgeStats;

pub struct BridgeBuilder<I> {
    injector: Option<I>,
    clock: Option<Arc<dyn Clock + Send + Sync>>,
    motion: MotionCfg,
    gesture: GestureCfg,
    dispatch: DispatchCfg,
    indicator: IndicatorCfg,
    screen: Screen,
}

impl<I> Default for BridgeBuilder<I> {
    fn default() -> Self {
        Self {
            injector: None,
            clock: None,
            motion: MotionCfg::default(),
            gesture: GestureCfg::default(),
            dispatch: DispatchCfg::default(),
            indicator: IndicatorCfg::default(),
            screen: Screen::default(),
        }
    }
}

impl<I: InputInjector> BridgeBuilder<I> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_injector(mut self, injector: I) -> Self {
        self.injector = Some(injector);
        self
    }

    /// Inject a clock (tests). Defaults to `MonotonicClock`.
    pub fn with_clock(mut self, clock: Arc<dyn Clock + Send + Sync>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn with_motion(mut self, motion: MotionCfg) -> Self {
        self.motion = motion;
        self
    }

    pub fn with_gesture(mut self, gesture: GestureCfg) -> Self {
        self.gesture = gesture;
        self
    }

    pub fn with_dispatch(mut self, dispatch: DispatchCfg) -> Self {
        self.dispatch = dispatch;
        self
    }

    pub fn with_indicator(mut self, indicator: IndicatorCfg) -> Self {
        self.indicator = indicator;
        self
    }

    pub fn with_screen(mut self, screen: Screen) -> Self {
        self.screen = screen;
        self
    }

    /// Take every component setting from a loaded config file.
    pub fn with_config(self, cfg: &airpoint_config::Config) -> Self {
        self.with_motion((&cfg.motion).into())
            .with_gesture((&cfg.gesture).into())
            .with_dispatch((&cfg.dispatch).into())
            .with_indicator((&cfg.indicator).into())
            .with_screen((&cfg.screen).into())
    }

    pub fn try_build(mut self) -> Result<Bridge<I>> {
        let Some(injector) = self.injector.take() else {
            return Err(eyre::Report::new(BuildError::MissingInjector));
        };
        validate(&self)?;

        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(MonotonicClock::new()));
        Ok(Bridge {
            motion: MotionFilter::new(self.motion, self.screen),
            gestures: GestureMachine::new(self.gesture),
            dispatcher: ActionDispatcher::new(injector, clock, self.dispatch),
            indicator: Indicator::new(self.indicator, self.screen),
            stats: BridgeStats::default(),
        })
    }
}

/// Smallest gap between injected button down and up the OS reliably sees.
pub const MIN_SETTLE: Duration = Duration::from_millis(10);
pub const MAX_SETTLE: Duration = Duration::from_millis(100);

fn invalid(msg: &'static str) -> eyre::Report {
    eyre::Report::new(BuildError::InvalidConfig(msg))
}

fn validate<I>(b: &BridgeBuilder<I>) -> Result<()> {
    let m = &b.motion;
    if !(m.sensitivity.is_finite() && m.sensitivity > 0.0) {
        return Err(invalid("sensitivity must be > 0"));
    }
    if !(m.ema_alpha > 0.0 && m.ema_alpha <= 1.0) {
        return Err(invalid("ema_alpha must be in (0, 1]"));
    }
    if !(m.scale.is_finite() && m.scale > 0.0) {
        return Err(invalid("scale must be > 0"));
    }
    if b.screen.width <= 0 || b.screen.height <= 0 {
        return Err(invalid("screen size must be > 0"));
    }
    if b.gesture.click_threshold.is_zero() || b.gesture.hold_threshold.is_zero() {
        return Err(invalid("gesture thresholds must be >= 1 ms"));
    }
    if b.gesture.click_threshold > b.gesture.hold_threshold {
        return Err(invalid("click threshold must not exceed hold threshold"));
    }
    if b.indicator.radius == 0 {
        return Err(invalid("dot radius must be >= 1"));
    }
    if b.dispatch.settle < MIN_SETTLE {
        return Err(invalid("settle must be >= 10 ms"));
    }
    if b.dispatch.settle > MAX_SETTLE {
        return Err(invalid("settle must be <= 100 ms"));
    }
    Ok(())
}
