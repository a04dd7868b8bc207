use std::time::{Duration, Instant};

use airpoint_core::config::GestureCfg;
use airpoint_core::frame::ButtonVector;
use airpoint_core::gesture::{GestureMachine, GestureState, IntentEvent, NavDirection, step};
use proptest::prelude::*;
use rstest::rstest;

const OFF: [u8; 4] = [0, 0, 0, 0];
const B1: [u8; 4] = [0, 1, 0, 0];
const TOGGLE: [u8; 4] = [0, 0, 1, 0];

fn ms(t0: Instant, ms: u64) -> Instant {
    t0 + Duration::from_millis(ms)
}

/// Machine with the laser already on.
fn laser_on(cfg: GestureCfg, t0: Instant) -> GestureMachine {
    let mut m = GestureMachine::new(cfg);
    assert_eq!(
        m.feed(TOGGLE.into(), t0),
        vec![IntentEvent::ToggleMode { on: true }]
    );
    assert!(m.feed(OFF.into(), t0).is_empty());
    m
}

#[test]
fn quick_tap_emits_one_click() {
    let t0 = Instant::now();
    let mut m = laser_on(GestureCfg::default(), t0);
    let mut events = Vec::new();
    events.extend(m.feed(B1.into(), ms(t0, 0)));
    events.extend(m.feed(B1.into(), ms(t0, 200)));
    events.extend(m.tick(ms(t0, 240)));
    events.extend(m.feed(OFF.into(), ms(t0, 250)));
    assert_eq!(events, vec![IntentEvent::Click]);
}

#[test]
fn long_press_emits_hold_start_then_end() {
    let t0 = Instant::now();
    let mut m = laser_on(GestureCfg::default(), t0);
    assert!(m.feed(B1.into(), ms(t0, 0)).is_empty());
    assert!(m.feed(B1.into(), ms(t0, 200)).is_empty());
    assert!(m.tick(ms(t0, 399)).is_empty());
    assert_eq!(m.tick(ms(t0, 400)), vec![IntentEvent::HoldStart]);
    assert!(m.tick(ms(t0, 450)).is_empty());
    assert_eq!(m.feed(OFF.into(), ms(t0, 500)), vec![IntentEvent::HoldEnd]);
    assert!(!m.state().hold_active);
}

#[test]
fn slow_release_without_hold_tick_emits_nothing() {
    let cfg = GestureCfg {
        click_threshold: Duration::from_millis(300),
        hold_threshold: Duration::from_millis(400),
        ..GestureCfg::default()
    };
    let t0 = Instant::now();
    let mut m = laser_on(cfg, t0);
    m.feed(B1.into(), ms(t0, 0));
    // released at 350 ms: too slow for a click, too short for a hold
    assert!(m.feed(OFF.into(), ms(t0, 350)).is_empty());
}

#[rstest]
#[case(300, 250, true)]
#[case(300, 320, false)]
#[case(400, 320, true)]
fn click_threshold_is_configurable(
    #[case] threshold_ms: u64,
    #[case] release_ms: u64,
    #[case] clicks: bool,
) {
    let cfg = GestureCfg {
        click_threshold: Duration::from_millis(threshold_ms),
        ..GestureCfg::default()
    };
    let t0 = Instant::now();
    let mut m = laser_on(cfg, t0);
    m.feed(B1.into(), t0);
    let events = m.feed(OFF.into(), ms(t0, release_ms));
    assert_eq!(events.contains(&IntentEvent::Click), clicks);
}

#[test]
fn release_past_hold_threshold_is_not_a_click() {
    // Click window wider than the hold threshold, and no tick between press
    // and release.
    let cfg = GestureCfg {
        click_threshold: Duration::from_millis(500),
        hold_threshold: Duration::from_millis(400),
        ..GestureCfg::default()
    };
    let t0 = Instant::now();
    let mut m = laser_on(cfg, t0);
    m.feed(B1.into(), t0);
    assert!(m.feed(OFF.into(), ms(t0, 450)).is_empty());
}

#[test]
fn toggle_off_while_holding_ends_hold_first() {
    let t0 = Instant::now();
    let mut m = laser_on(GestureCfg::default(), t0);
    m.feed(B1.into(), ms(t0, 0));
    assert_eq!(m.tick(ms(t0, 450)), vec![IntentEvent::HoldStart]);
    let events = m.feed([0, 1, 1, 0].into(), ms(t0, 600));
    assert_eq!(
        events,
        vec![IntentEvent::HoldEnd, IntentEvent::ToggleMode { on: false }]
    );
    assert!(!m.state().laser_on);
    assert!(!m.state().hold_active);
    assert_eq!(m.state().press_started_at, None);
    // releasing b1 afterwards is ignored
    assert!(m.feed(TOGGLE.into(), ms(t0, 650)).is_empty());
    assert!(m.feed(OFF.into(), ms(t0, 700)).is_empty());
}

#[test]
fn press_begun_while_off_never_clicks() {
    let t0 = Instant::now();
    let mut m = GestureMachine::new(GestureCfg::default());
    m.feed(B1.into(), ms(t0, 0));
    assert_eq!(
        m.feed([0, 1, 1, 0].into(), ms(t0, 50)),
        vec![IntentEvent::ToggleMode { on: true }]
    );
    assert!(m.feed(OFF.into(), ms(t0, 100)).is_empty());
}

#[rstest]
#[case(true, false, true)]
#[case(true, true, true)]
#[case(false, false, true)]
#[case(false, true, false)]
fn nav_policy(#[case] nav_while_on: bool, #[case] laser: bool, #[case] fires: bool) {
    let cfg = GestureCfg {
        nav_while_laser_on: nav_while_on,
        ..GestureCfg::default()
    };
    let t0 = Instant::now();
    let mut m = if laser {
        laser_on(cfg, t0)
    } else {
        GestureMachine::new(cfg)
    };
    let fwd = m.feed([1, 0, 0, 0].into(), ms(t0, 10));
    m.feed(OFF.into(), ms(t0, 20));
    let back = m.feed([0, 0, 0, 1].into(), ms(t0, 30));
    if fires {
        assert_eq!(fwd, vec![IntentEvent::KeyPress(NavDirection::Forward)]);
        assert_eq!(back, vec![IntentEvent::KeyPress(NavDirection::Backward)]);
    } else {
        assert!(fwd.is_empty());
        assert!(back.is_empty());
    }
}

#[test]
fn nav_fires_on_rising_edge_only() {
    let t0 = Instant::now();
    let mut m = GestureMachine::new(GestureCfg::default());
    assert_eq!(m.feed([1, 0, 0, 0].into(), t0).len(), 1);
    assert!(m.feed([1, 0, 0, 0].into(), ms(t0, 10)).is_empty());
    assert!(m.tick(ms(t0, 2000)).is_empty());
}

#[test]
fn events_follow_button_index_order() {
    let t0 = Instant::now();
    let mut m = GestureMachine::new(GestureCfg::default());
    let events = m.feed([1, 0, 1, 1].into(), t0);
    assert_eq!(
        events,
        vec![
            IntentEvent::KeyPress(NavDirection::Forward),
            IntentEvent::ToggleMode { on: true },
            IntentEvent::KeyPress(NavDirection::Backward),
        ]
    );
}

fn button_stream() -> impl Strategy<Value = Vec<([bool; 4], u64)>> {
    proptest::collection::vec((any::<[bool; 4]>(), 0u64..300), 1..80)
}

fn replay(cfg: &GestureCfg, stream: &[([bool; 4], u64)]) -> (Vec<IntentEvent>, Vec<GestureState>) {
    let t0 = Instant::now();
    let mut t = t0;
    let mut state = GestureState::default();
    let mut events = Vec::new();
    let mut states = Vec::new();
    for (b, dt) in stream {
        t += Duration::from_millis(*dt);
        let (s, ev) = step(cfg, &state, ButtonVector(*b), t);
        state = s;
        events.extend(ev);
        states.push(state);
    }
    (events, states)
}

proptest! {
    #[test]
    fn replay_is_deterministic(stream in button_stream(), nav in any::<bool>()) {
        let cfg = GestureCfg { nav_while_laser_on: nav, ..GestureCfg::default() };
        // Same relative timing, different wall-clock origin.
        let a = replay(&cfg, &stream).0;
        let b = replay(&cfg, &stream).0;
        prop_assert_eq!(a, b);
    }

    #[test]
    fn hold_implies_laser(stream in button_stream()) {
        let (_, states) = replay(&GestureCfg::default(), &stream);
        for s in states {
            prop_assert!(!s.hold_active || s.laser_on);
        }
    }

    #[test]
    fn holds_are_balanced_and_exclusive_with_clicks(stream in button_stream()) {
        let (events, _) = replay(&GestureCfg::default(), &stream);
        let mut open = false;
        for e in events {
            match e {
                IntentEvent::HoldStart => { prop_assert!(!open); open = true; }
                IntentEvent::HoldEnd => { prop_assert!(open); open = false; }
                IntentEvent::Click => prop_assert!(!open),
                _ => {}
            }
        }
    }
}

fn thresholds() -> impl Strategy<Value = (u64, u64)> {
    (1u64..800, 1u64..800)
}

proptest! {
    #[test]
    fn clicks_are_shorter_than_both_thresholds(
        stream in button_stream(),
        (click_ms, hold_ms) in thresholds(),
    ) {
        let cfg = GestureCfg {
            click_threshold: Duration::from_millis(click_ms),
            hold_threshold: Duration::from_millis(hold_ms),
            ..GestureCfg::default()
        };
        let limit = cfg.click_threshold.min(cfg.hold_threshold);
        let mut t = Instant::now();
        let mut state = GestureState::default();
        for (b, dt) in &stream {
            t += Duration::from_millis(*dt);
            let pressed_at = state.press_started_at;
            let (next, events) = step(&cfg, &state, ButtonVector(*b), t);
            if events.contains(&IntentEvent::Click) {
                let started = pressed_at.expect("click without a recorded press");
                prop_assert!(t.saturating_duration_since(started) < limit);
            }
            state = next;
        }
    }
}
