//! Reader thread lifecycle: open, parse, report failures, stop on drop.

use std::time::{Duration, Instant};

use airpoint_core::error::BridgeError;
use airpoint_core::mocks::ScriptedSource;
use airpoint_core::reader::{Inbox, Message, Reader};
use airpoint_traits::clock::test_clock::TestClock;
use airpoint_traits::{BoxError, MonotonicClock};

/// Drain until `pred` holds for the collected messages or `within` elapses.
fn collect_until(
    reader: &mut Reader,
    within: Duration,
    pred: impl Fn(&[Message]) -> bool,
) -> Vec<Message> {
    let deadline = Instant::now() + within;
    let mut all = Vec::new();
    while Instant::now() < deadline {
        all.extend(reader.drain());
        if pred(&all) {
            break;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
    all
}

fn data_count(msgs: &[Message]) -> usize {
    msgs.iter().filter(|m| matches!(m, Message::Data(_))).count()
}

#[test]
fn parses_lines_and_skips_garbage() {
    let source = ScriptedSource::new([
        "RX -> X:1.0 Y:2.5 Z:-3.0 | Buttons: 1 0 1 0",
        "garbage",
        "",
        "   ",
        "0.5,1.0,2.0,0,0,0,1",
        "RX -> X:1 Y:oops Z:0 | Buttons: 0 0 0 0",
    ]);
    let mut reader = Reader::from_source(source, MonotonicClock::new());
    let msgs = collect_until(&mut reader, Duration::from_secs(2), |m| data_count(m) == 2);

    assert!(matches!(&msgs[0], Message::Info(s) if s.contains("scripted source")));
    let samples: Vec<_> = msgs
        .iter()
        .filter_map(|m| match m {
            Message::Data(s) => Some(*s),
            _ => None,
        })
        .collect();
    assert_eq!(samples.len(), 2);
    assert_eq!((samples[0].x, samples[0].y), (-3.0, 2.5));
    assert_eq!((samples[1].x, samples[1].y), (2.0, 1.0));

    // wait for the trailing bad line to be counted
    let deadline = Instant::now() + Duration::from_secs(2);
    while reader.dropped_lines() < 2 && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(reader.dropped_lines(), 2);
}

#[test]
fn open_failure_is_reported_once_and_thread_exits() {
    let mut reader = Reader::spawn(
        || -> Result<ScriptedSource, BoxError> { Err("No such file or directory".into()) },
        MonotonicClock::new(),
    );
    let msgs = collect_until(&mut reader, Duration::from_secs(2), |m| !m.is_empty());
    assert_eq!(msgs.len(), 1);
    assert!(matches!(&msgs[0], Message::Error(BridgeError::TransportOpen(_))));

    let deadline = Instant::now() + Duration::from_secs(2);
    while !reader.is_finished() && Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert!(reader.is_finished());
    assert!(reader.drain().is_empty());
}

#[test]
fn read_failure_is_reported_then_disconnects() {
    let source = ScriptedSource::new(["1,2,3,0,0,0,0"]).then_fail("device unplugged");
    let mut reader = Reader::from_source(source, MonotonicClock::new());
    let msgs = collect_until(&mut reader, Duration::from_secs(2), |m| {
        m.iter().any(|x| matches!(x, Message::Info(s) if s.starts_with("disconnected")))
    });
    let errors: Vec<_> = msgs
        .iter()
        .filter(|m| matches!(m, Message::Error(BridgeError::TransportRead(_))))
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(data_count(&msgs), 1);
}

#[test]
fn drop_joins_idle_reader_promptly() {
    let reader = Reader::from_source(ScriptedSource::new(Vec::<&str>::new()), MonotonicClock::new());
    std::thread::sleep(Duration::from_millis(20));
    let t0 = Instant::now();
    drop(reader);
    assert!(t0.elapsed() < Duration::from_millis(500));
}

#[test]
fn many_readers_do_not_leak_threads() {
    for _ in 0..10 {
        let mut reader = Reader::from_source(
            ScriptedSource::new(["1,2,3,0,0,0,0"]),
            MonotonicClock::new(),
        );
        std::thread::sleep(Duration::from_millis(5));
        let _ = reader.drain();
        drop(reader);
    }
}

#[test]
fn staleness_follows_the_injected_clock() {
    let clock = TestClock::new();
    let mut reader = Reader::from_source(ScriptedSource::new(["1,2,3,0,0,0,0"]), clock.clone());
    let msgs = collect_until(&mut reader, Duration::from_secs(2), |m| data_count(m) == 1);
    assert_eq!(data_count(&msgs), 1);
    assert_eq!(reader.stalled_ms(), Some(0));

    clock.advance(Duration::from_millis(2_500));
    assert_eq!(reader.stalled_ms(), Some(2_500));
}
