//! One processing step per tick: filter, gestures, dispatch, indicator.

use std::time::Instant;

use airpoint_traits::{Coordinate, IndicatorFrame, InputInjector};

use crate::builder::BridgeBuilder;
use crate::dispatch::ActionDispatcher;
use crate::gesture::{GestureMachine, GestureState};
use crate::indicator::Indicator;
use crate::motion::{CalibrationOffset, MotionFilter};
use crate::reader::Message;
use crate::status::{BridgeStats, TickReport};

pub struct Bridge<I> {
    pub(crate) motion: MotionFilter,
    pub(crate) gestures: GestureMachine,
    pub(crate) dispatcher: ActionDispatcher<I>,
    pub(crate) indicator: Indicator,
    pub(crate) stats: BridgeStats,
}

impl<I: InputInjector> Bridge<I> {
    pub fn builder() -> BridgeBuilder<I> {
        BridgeBuilder::new()
    }

    /// Consume one tick's messages.
    ///
    /// The filter moves once, to the newest sample. Every button vector is
    /// then fed to the gesture machine in arrival order, followed by a
    /// time-only step, and the resulting intents are dispatched against the
    /// filtered position.
    pub fn process(&mut self, messages: Vec<Message>, now: Instant) -> TickReport {
        let mut vectors = Vec::with_capacity(messages.len());
        let mut newest = None;
        for m in messages {
            match m {
                Message::Data(s) => {
                    vectors.push(s.buttons);
                    newest = Some(s);
                }
                Message::Info(msg) => tracing::info!(%msg, "transport"),
                Message::Error(e) => {
                    self.stats.transport_errors += 1;
                    tracing::error!(error = %e, "transport");
                }
            }
        }

        if let Some(s) = newest {
            self.motion.update(&s);
        }
        let target = self.motion.position();

        // Every vector is stamped with the tick's `now`, not its arrival
        // time. A b1 press seen on an earlier tick, followed by a loop stall
        // longer than the hold threshold whose drain carries the release,
        // emits nothing: no tick saw the hold start and the press is too
        // long to click.
        let mut events = Vec::new();
        for v in &vectors {
            events.extend(self.gestures.feed(*v, now));
        }
        events.extend(self.gestures.tick(now));

        for ev in &events {
            self.dispatcher.dispatch(*ev, target);
        }

        let laser_on = self.gestures.state().laser_on;
        self.indicator
            .update(laser_on, target, self.dispatcher.injector_mut());

        self.stats.samples += vectors.len() as u64;
        self.stats.intents += events.len() as u64;
        TickReport {
            samples: vectors.len(),
            events,
        }
    }

    pub fn calibrate(&mut self) -> CalibrationOffset {
        self.motion.calibrate()
    }

    /// Indicator snapshot for this tick's render.
    pub fn frame(&mut self) -> IndicatorFrame {
        self.indicator.frame()
    }

    /// Release any open hold, hide the marker and give the system cursor back.
    pub fn shutdown(&mut self, now: Instant) {
        let target = self.motion.position();
        for ev in self.gestures.force_release(now) {
            self.dispatcher.dispatch(ev, target);
            self.stats.intents += 1;
        }
        let injector = self.dispatcher.injector_mut();
        self.indicator.update(false, target, injector);
        self.indicator.restore_cursor(injector);
        tracing::debug!(stats = ?self.stats, "bridge shut down");
    }

    pub fn position(&self) -> Coordinate {
        self.motion.position()
    }

    pub fn gesture_state(&self) -> &GestureState {
        self.gestures.state()
    }

    pub fn calibration(&self) -> CalibrationOffset {
        self.motion.calibration()
    }

    pub fn stats(&self) -> BridgeStats {
        self.stats
    }

    pub fn dispatcher(&self) -> &ActionDispatcher<I> {
        &self.dispatcher
    }

    pub fn indicator(&self) -> &Indicator {
        &self.indicator
    }

    pub fn injector(&self) -> &I {
        self.dispatcher.injector()
    }
}
