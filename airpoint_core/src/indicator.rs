//! Indicator state: where the marker is, whether it shows, and what the
//! renderer must repaint.

use airpoint_traits::{BoxError, Coordinate, IndicatorFrame, InputInjector, Rect};

use crate::config::{IndicatorCfg, Screen};
use crate::inject_error::{Site, map_hw_error};

/// Smallest half-size of the repaint box around the marker.
pub const MIN_BOX_HALF: i32 = 60;

/// Upper bound on display-counter adjustments per visibility change.
const MAX_CURSOR_STEPS: usize = 16;

/// Step the display counter until the cursor is on the requested side of
/// zero (`>= 0` shown, `< 0` hidden). Returns the final counter.
pub fn drive_cursor<I: InputInjector + ?Sized>(
    injector: &mut I,
    show: bool,
) -> Result<i32, BoxError> {
    let mut count = 0;
    for _ in 0..MAX_CURSOR_STEPS {
        count = injector.set_system_cursor_visible(show)?;
        if (count >= 0) == show {
            return Ok(count);
        }
    }
    Err(format!("display counter stuck at {count} after {MAX_CURSOR_STEPS} steps").into())
}

#[derive(Debug, Clone)]
pub struct Indicator {
    cfg: IndicatorCfg,
    screen: Screen,
    visible: bool,
    position: Coordinate,
    rendered: Option<(bool, Coordinate)>,
    cursor_hidden: bool,
}

impl Indicator {
    pub fn new(cfg: IndicatorCfg, screen: Screen) -> Self {
        Self {
            cfg,
            screen,
            visible: false,
            position: screen.center(),
            rendered: None,
            cursor_hidden: false,
        }
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn position(&self) -> Coordinate {
        self.position
    }

    pub fn cursor_hidden(&self) -> bool {
        self.cursor_hidden
    }

    fn box_half(&self) -> i32 {
        let r = i32::try_from(self.cfg.radius).unwrap_or(i32::MAX / 8);
        MIN_BOX_HALF.max(r.saturating_mul(4))
    }

    /// Record this tick's state. A visibility change also hides or shows
    /// the system cursor when configured to.
    pub fn update<I: InputInjector + ?Sized>(
        &mut self,
        visible: bool,
        position: Coordinate,
        injector: &mut I,
    ) {
        let changed = visible != self.visible;
        self.visible = visible;
        self.position = self.screen.clamp(position);
        if changed && self.cfg.hide_system_cursor {
            self.set_system_cursor(!visible, injector);
        }
    }

    /// Show the system cursor again if we hid it.
    pub fn restore_cursor<I: InputInjector + ?Sized>(&mut self, injector: &mut I) {
        if self.cursor_hidden {
            self.set_system_cursor(true, injector);
        }
    }

    fn set_system_cursor<I: InputInjector + ?Sized>(&mut self, show: bool, injector: &mut I) {
        match drive_cursor(injector, show) {
            Ok(count) => {
                self.cursor_hidden = !show;
                tracing::debug!(show, count, "system cursor");
            }
            Err(e) => {
                let err = map_hw_error(e.as_ref(), Site::Inject);
                tracing::warn!(show, error = %err, "system cursor visibility");
            }
        }
    }

    /// Snapshot for the renderer. `dirty` covers the old and new marker
    /// boxes, or is `None` when nothing visible changed since the last call.
    pub fn frame(&mut self) -> IndicatorFrame {
        let cur = (self.visible, self.position);
        let prev = self.rendered.unwrap_or((false, self.position));
        let dirty = if prev == cur {
            None
        } else {
            let half = self.box_half();
            let old = prev.0.then(|| Rect::around(prev.1, half));
            let new = cur.0.then(|| Rect::around(cur.1, half));
            match (old, new) {
                (Some(a), Some(b)) => Some(a.union(&b)),
                (Some(a), None) | (None, Some(a)) => Some(a),
                (None, None) => None,
            }
            .map(|r| r.clip(self.screen.width, self.screen.height))
        };
        self.rendered = Some(cur);
        IndicatorFrame {
            visible: self.visible,
            position: self.position,
            radius: self.cfg.radius,
            dirty,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::RecordingInjector;

    fn indicator() -> Indicator {
        Indicator::new(IndicatorCfg::default(), Screen::new(1920, 1080))
    }

    #[test]
    fn unchanged_state_has_no_dirty_region() {
        let mut ind = indicator();
        let mut inj = RecordingInjector::default();
        ind.update(true, Coordinate::new(500, 500), &mut inj);
        assert!(ind.frame().dirty.is_some());
        assert_eq!(ind.frame().dirty, None);
    }

    #[test]
    fn dirty_region_spans_old_and_new_box() {
        let mut ind = indicator();
        let mut inj = RecordingInjector::default();
        ind.update(true, Coordinate::new(500, 500), &mut inj);
        ind.frame();
        ind.update(true, Coordinate::new(600, 520), &mut inj);
        let dirty = ind.frame().dirty.unwrap();
        assert_eq!(
            dirty,
            Rect {
                x: 440,
                y: 440,
                width: 220,
                height: 140
            }
        );
    }

    #[test]
    fn dirty_region_is_clipped_to_screen() {
        let mut ind = indicator();
        let mut inj = RecordingInjector::default();
        ind.update(true, Coordinate::new(0, 0), &mut inj);
        let dirty = ind.frame().dirty.unwrap();
        assert_eq!(dirty, Rect { x: 0, y: 0, width: 60, height: 60 });
    }

    #[test]
    fn large_radius_grows_box() {
        let cfg = IndicatorCfg {
            radius: 20,
            hide_system_cursor: false,
        };
        let mut ind = Indicator::new(cfg, Screen::new(1920, 1080));
        let mut inj = RecordingInjector::default();
        ind.update(true, Coordinate::new(960, 540), &mut inj);
        assert_eq!(ind.frame().dirty.unwrap().width, 160);
        assert!(inj.calls.is_empty());
    }

    #[test]
    fn hiding_twice_leaves_cursor_hidden() {
        let mut inj = RecordingInjector::default();
        assert_eq!(drive_cursor(&mut inj, false).unwrap(), -1);
        assert_eq!(drive_cursor(&mut inj, false).unwrap(), -2);
        assert_eq!(drive_cursor(&mut inj, true).unwrap(), 0);
        assert_eq!(drive_cursor(&mut inj, true).unwrap(), 1);
    }

    #[test]
    fn toggle_hides_then_restores_system_cursor() {
        let mut ind = indicator();
        let mut inj = RecordingInjector::default();
        ind.update(true, Coordinate::new(10, 10), &mut inj);
        assert!(ind.cursor_hidden());
        assert!(inj.cursor_counter() < 0);
        ind.update(false, Coordinate::new(10, 10), &mut inj);
        assert!(!ind.cursor_hidden());
        assert!(inj.cursor_counter() >= 0);
        ind.restore_cursor(&mut inj);
        assert_eq!(inj.cursor_counter(), 0);
    }
}
