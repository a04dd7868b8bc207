use std::sync::Arc;
use std::time::Duration;

use airpoint_core::config::DispatchCfg;
use airpoint_core::dispatch::ActionDispatcher;
use airpoint_core::gesture::{IntentEvent, NavDirection};
use airpoint_core::mocks::{Call, RecordingInjector};
use airpoint_traits::clock::test_clock::TestClock;
use airpoint_traits::{Coordinate, Key, MouseButton};
use rstest::rstest;

const ORIGIN: Coordinate = Coordinate::new(100, 200);
const TARGET: Coordinate = Coordinate::new(900, 450);

fn dispatcher(inj: RecordingInjector) -> (ActionDispatcher<RecordingInjector>, TestClock) {
    let clock = TestClock::new();
    let d = ActionDispatcher::new(inj, Arc::new(clock.clone()), DispatchCfg::default());
    (d, clock)
}

#[test]
fn click_saves_moves_clicks_and_restores() {
    let (mut d, clock) = dispatcher(RecordingInjector::at(ORIGIN));
    d.dispatch(IntentEvent::Click, TARGET);
    assert_eq!(
        d.injector().calls,
        vec![
            Call::Position,
            Call::Move(TARGET),
            Call::Button(MouseButton::Left, true),
            Call::Button(MouseButton::Left, false),
            Call::Move(ORIGIN),
        ]
    );
    // settle after the move and between down and up
    assert_eq!(clock.slept(), Duration::from_millis(20));
    assert_eq!(d.failures(), 0);
}

#[test]
fn hold_remembers_origin_until_end() {
    let (mut d, _clock) = dispatcher(RecordingInjector::at(ORIGIN));
    d.dispatch(IntentEvent::HoldStart, TARGET);
    assert_eq!(d.hold_origin(), Some(ORIGIN));
    let drag_to = Coordinate::new(950, 500);
    d.dispatch(IntentEvent::HoldEnd, drag_to);
    assert_eq!(d.hold_origin(), None);
    assert_eq!(
        d.injector().calls,
        vec![
            Call::Position,
            Call::Move(TARGET),
            Call::Button(MouseButton::Right, true),
            Call::Move(drag_to),
            Call::Button(MouseButton::Right, false),
            Call::Move(ORIGIN),
        ]
    );
}

#[test]
fn hold_end_clears_origin_even_when_button_fails() {
    let (mut d, _clock) = dispatcher(RecordingInjector::at(ORIGIN).failing_buttons());
    d.dispatch(IntentEvent::HoldStart, TARGET);
    assert_eq!(d.hold_origin(), Some(ORIGIN));
    d.dispatch(IntentEvent::HoldEnd, TARGET);
    assert_eq!(d.hold_origin(), None);
    assert_eq!(d.failures(), 2);
    // restore still attempted after the failed release
    assert_eq!(d.injector().calls.last(), Some(&Call::Move(ORIGIN)));
}

#[test]
fn click_releases_button_after_failed_press() {
    let (mut d, _clock) = dispatcher(RecordingInjector::at(ORIGIN).failing_buttons());
    d.dispatch(IntentEvent::Click, TARGET);
    let calls = &d.injector().calls;
    assert!(calls.contains(&Call::Button(MouseButton::Left, true)));
    assert!(calls.contains(&Call::Button(MouseButton::Left, false)));
    assert_eq!(calls.last(), Some(&Call::Move(ORIGIN)));
}

#[test]
fn unknown_origin_skips_restore() {
    let (mut d, _clock) = dispatcher(RecordingInjector::at(ORIGIN).failing_position());
    d.dispatch(IntentEvent::Click, TARGET);
    assert_eq!(d.injector().calls.last(), Some(&Call::Button(MouseButton::Left, false)));
    assert_eq!(d.failures(), 1);
}

#[rstest]
#[case(NavDirection::Forward, Key::Right)]
#[case(NavDirection::Backward, Key::Left)]
fn nav_keys_map_to_configured_keys(#[case] dir: NavDirection, #[case] key: Key) {
    let (mut d, _clock) = dispatcher(RecordingInjector::default());
    d.dispatch(IntentEvent::KeyPress(dir), TARGET);
    assert_eq!(d.injector().calls, vec![Call::Key(key)]);
}

#[test]
fn configured_buttons_and_keys_are_used() {
    let cfg = DispatchCfg {
        click_button: MouseButton::Middle,
        forward_key: Key::PageDown,
        ..DispatchCfg::default()
    };
    let mut d = ActionDispatcher::new(
        RecordingInjector::default(),
        Arc::new(TestClock::new()),
        cfg,
    );
    d.dispatch(IntentEvent::Click, TARGET);
    d.dispatch(IntentEvent::KeyPress(NavDirection::Forward), TARGET);
    let calls = &d.injector().calls;
    assert!(calls.contains(&Call::Button(MouseButton::Middle, true)));
    assert_eq!(calls.last(), Some(&Call::Key(Key::PageDown)));
}

#[test]
fn toggle_is_not_injected() {
    let (mut d, clock) = dispatcher(RecordingInjector::default());
    d.dispatch(IntentEvent::ToggleMode { on: true }, TARGET);
    d.dispatch(IntentEvent::ToggleMode { on: false }, TARGET);
    assert!(d.injector().calls.is_empty());
    assert_eq!(clock.slept(), Duration::ZERO);
}

#[test]
fn key_failure_is_counted_not_propagated() {
    let (mut d, _clock) = dispatcher(RecordingInjector::default().failing_keys());
    d.dispatch(IntentEvent::KeyPress(NavDirection::Forward), TARGET);
    d.dispatch(IntentEvent::KeyPress(NavDirection::Backward), TARGET);
    assert_eq!(d.failures(), 2);
}
