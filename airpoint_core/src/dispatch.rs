//! Action dispatcher: turns intent events into injector calls.
//!
//! Synthetic clicks are bracketed by a save/restore of the real cursor, so
//! the pointer the operator sees does not jump to the wand target. Every
//! injector call is checked; failures are logged and counted but never
//! propagated, and the remembered hold origin is cleared on `HoldEnd` no
//! matter what failed.

use std::sync::Arc;

use airpoint_traits::{BoxError, Clock, Coordinate, InputInjector};

use crate::config::DispatchCfg;
use crate::gesture::{IntentEvent, NavDirection};
use crate::inject_error::{Site, map_hw_error};

pub struct ActionDispatcher<I> {
    injector: I,
    clock: Arc<dyn Clock + Send + Sync>,
    cfg: DispatchCfg,
    hold_origin: Option<Coordinate>,
    failures: u64,
}

impl<I: InputInjector> ActionDispatcher<I> {
    pub fn new(injector: I, clock: Arc<dyn Clock + Send + Sync>, cfg: DispatchCfg) -> Self {
        Self {
            injector,
            clock,
            cfg,
            hold_origin: None,
            failures: 0,
        }
    }

    /// Run the injector sequence for one intent. Returns once the whole
    /// sequence (including settle pauses) has been issued.
    pub fn dispatch(&mut self, event: IntentEvent, target: Coordinate) {
        match event {
            IntentEvent::ToggleMode { on } => {
                tracing::info!(on, "laser mode");
            }
            IntentEvent::Click => self.click(target),
            IntentEvent::HoldStart => self.hold_start(target),
            IntentEvent::HoldEnd => self.hold_end(target),
            IntentEvent::KeyPress(dir) => self.key(dir),
        }
    }

    fn check<T>(&mut self, op: &'static str, r: Result<T, BoxError>) -> Option<T> {
        match r {
            Ok(v) => Some(v),
            Err(e) => {
                self.failures += 1;
                let err = map_hw_error(e.as_ref(), Site::Inject);
                tracing::warn!(op, error = %err, "injection failed");
                None
            }
        }
    }

    fn settle(&self) {
        self.clock.sleep(self.cfg.settle);
    }

    fn move_to(&mut self, at: Coordinate) -> bool {
        let r = self.injector.move_cursor_absolute(at);
        self.check("move", r).is_some()
    }

    fn capture(&mut self) -> Option<Coordinate> {
        let r = self.injector.cursor_position();
        self.check("cursor position", r)
    }

    fn click(&mut self, target: Coordinate) {
        tracing::info!(x = target.x, y = target.y, "click");
        let origin = self.capture();
        self.move_to(target);
        self.settle();
        let button = self.cfg.click_button;
        let r = self.injector.mouse_button(button, true);
        self.check("button down", r);
        self.settle();
        let r = self.injector.mouse_button(button, false);
        self.check("button up", r);
        if let Some(o) = origin {
            self.move_to(o);
        }
    }

    fn hold_start(&mut self, target: Coordinate) {
        tracing::info!(x = target.x, y = target.y, "hold start");
        let origin = self.capture();
        if self.hold_origin.is_none() {
            self.hold_origin = origin;
        }
        self.move_to(target);
        self.settle();
        let r = self.injector.mouse_button(self.cfg.hold_button, true);
        self.check("button down", r);
    }

    fn hold_end(&mut self, target: Coordinate) {
        tracing::info!(x = target.x, y = target.y, "hold end");
        let origin = self.hold_origin.take();
        self.move_to(target);
        self.settle();
        let r = self.injector.mouse_button(self.cfg.hold_button, false);
        self.check("button up", r);
        if let Some(o) = origin {
            self.move_to(o);
        }
    }

    fn key(&mut self, dir: NavDirection) {
        let key = match dir {
            NavDirection::Forward => self.cfg.forward_key,
            NavDirection::Backward => self.cfg.backward_key,
        };
        tracing::info!(?dir, ?key, "nav key");
        let r = self.injector.key_press(key);
        self.check("key press", r);
    }

    /// Position saved by the open hold, if any.
    pub fn hold_origin(&self) -> Option<Coordinate> {
        self.hold_origin
    }

    /// Number of injector calls that failed so far.
    pub fn failures(&self) -> u64 {
        self.failures
    }

    pub fn injector(&self) -> &I {
        &self.injector
    }

    pub fn injector_mut(&mut self) -> &mut I {
        &mut self.injector
    }

    pub fn into_injector(self) -> I {
        self.injector
    }
}
