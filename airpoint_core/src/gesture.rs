//! Gesture state machine.
//!
//! Button roles by index: b0 forward, b1 primary (click/hold, only while the
//! laser is on), b2 laser toggle, b3 backward. Within a step the buttons are
//! evaluated in index order.

use std::time::Instant;

use crate::config::GestureCfg;
use crate::frame::ButtonVector;

const B_FORWARD: usize = 0;
const B_PRIMARY: usize = 1;
const B_TOGGLE: usize = 2;
const B_BACKWARD: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NavDirection {
    Forward,
    Backward,
}

/// What the operator asked for; consumed by the dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentEvent {
    ToggleMode { on: bool },
    Click,
    HoldStart,
    HoldEnd,
    KeyPress(NavDirection),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GestureState {
    pub laser_on: bool,
    pub hold_active: bool,
    pub press_started_at: Option<Instant>,
    pub prev_buttons: ButtonVector,
}

fn nav_allowed(cfg: &GestureCfg, laser_on: bool) -> bool {
    cfg.nav_while_laser_on || !laser_on
}

/// Advance `state` by one button vector observed at `now`.
///
/// Pure: the same inputs always give the same output. Passing the previous
/// vector again is a time-only step that can start a pending hold.
pub fn step(
    cfg: &GestureCfg,
    state: &GestureState,
    next: ButtonVector,
    now: Instant,
) -> (GestureState, Vec<IntentEvent>) {
    let prev = state.prev_buttons;
    let mut s = *state;
    let mut out = Vec::new();

    if next.rising(prev, B_FORWARD) && nav_allowed(cfg, s.laser_on) {
        out.push(IntentEvent::KeyPress(NavDirection::Forward));
    }

    if s.laser_on {
        if next.rising(prev, B_PRIMARY) {
            s.press_started_at = Some(now);
        }
        if next.pressed(B_PRIMARY)
            && !s.hold_active
            && let Some(t0) = s.press_started_at
            && now.saturating_duration_since(t0) >= cfg.hold_threshold
        {
            s.hold_active = true;
            out.push(IntentEvent::HoldStart);
        }
        if next.falling(prev, B_PRIMARY) {
            if s.hold_active {
                s.hold_active = false;
                out.push(IntentEvent::HoldEnd);
            } else if let Some(t0) = s.press_started_at
                && now.saturating_duration_since(t0) < cfg.click_threshold.min(cfg.hold_threshold)
            {
                // A press that outlived the hold threshold is never a click,
                // even when no tick saw it cross.
                out.push(IntentEvent::Click);
            }
            s.press_started_at = None;
        }
    }

    if next.rising(prev, B_TOGGLE) {
        if s.laser_on {
            if s.hold_active {
                s.hold_active = false;
                out.push(IntentEvent::HoldEnd);
            }
            s.press_started_at = None;
            s.laser_on = false;
        } else {
            s.laser_on = true;
        }
        out.push(IntentEvent::ToggleMode { on: s.laser_on });
    }

    if next.rising(prev, B_BACKWARD) && nav_allowed(cfg, s.laser_on) {
        out.push(IntentEvent::KeyPress(NavDirection::Backward));
    }

    s.prev_buttons = next;
    (s, out)
}

/// Owns a `GestureState` and applies `step` to it.
#[derive(Debug, Clone)]
pub struct GestureMachine {
    cfg: GestureCfg,
    state: GestureState,
}

impl GestureMachine {
    pub fn new(cfg: GestureCfg) -> Self {
        Self {
            cfg,
            state: GestureState::default(),
        }
    }

    pub fn state(&self) -> &GestureState {
        &self.state
    }

    pub fn cfg(&self) -> &GestureCfg {
        &self.cfg
    }

    /// Feed a freshly received button vector.
    pub fn feed(&mut self, next: ButtonVector, now: Instant) -> Vec<IntentEvent> {
        let (s, events) = step(&self.cfg, &self.state, next, now);
        self.state = s;
        events
    }

    /// Re-evaluate timers without new input.
    pub fn tick(&mut self, now: Instant) -> Vec<IntentEvent> {
        self.feed(self.state.prev_buttons, now)
    }

    /// Close an open hold and forget any pending press. Used at shutdown.
    pub fn force_release(&mut self, _now: Instant) -> Vec<IntentEvent> {
        let mut out = Vec::new();
        if self.state.hold_active {
            self.state.hold_active = false;
            out.push(IntentEvent::HoldEnd);
        }
        self.state.press_started_at = None;
        out
    }
}
