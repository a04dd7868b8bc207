//! Background transport reader.
//!
//! Spawns a thread that opens the line source, parses every line into a
//! `RawSample`, and pushes tagged messages over an unbounded channel. The
//! thread never touches OS input.
//!
//! Each `Reader` owns exactly one thread, signalled and joined on drop. A
//! blocked read returns within the source's read timeout, so drop waits at
//! most that long.
use crossbeam_channel as xch;
use airpoint_traits::{BoxError, Clock, LineSource};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;

use crate::error::BridgeError;
use crate::frame::{FrameParser, RawSample, decode_line};
use crate::inject_error::{Site, map_hw_error};

/// Reader → processing loop.
#[derive(Debug, Clone, PartialEq)]
pub enum Message {
    Data(RawSample),
    Info(String),
    Error(BridgeError),
}

/// Anything the processing loop can pull a tick's worth of messages from.
pub trait Inbox {
    /// Everything queued since the last call, in arrival order.
    fn drain(&mut self) -> Vec<Message>;

    /// Milliseconds since the last good frame, when the source tracks it.
    fn stalled_ms(&self) -> Option<u64> {
        None
    }
}

pub struct Reader {
    rx: xch::Receiver<Message>,
    last_ok: Arc<AtomicU64>,
    dropped: Arc<AtomicU64>,
    clock: Arc<dyn Clock + Send + Sync>,
    epoch: Instant,
    /// Shutdown flag checked before every read
    shutdown: Arc<AtomicBool>,
    join_handle: Option<std::thread::JoinHandle<()>>,
}

impl Reader {
    /// Spawn the reader thread. `open` runs on that thread, so a slow or
    /// failing open never blocks the caller.
    pub fn spawn<S, F, C>(open: F, clock: C) -> Self
    where
        S: LineSource + 'static,
        F: FnOnce() -> Result<S, BoxError> + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        let (tx, rx) = xch::unbounded();
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();
        let last_ok = Arc::new(AtomicU64::new(0));
        let last_ok_clone = last_ok.clone();
        let dropped = Arc::new(AtomicU64::new(0));
        let dropped_clone = dropped.clone();
        let clock: Arc<dyn Clock + Send + Sync> = Arc::new(clock);
        let thread_clock = clock.clone();
        let epoch = clock.now();

        let join_handle = std::thread::spawn(move || {
            let mut source = match open() {
                Ok(s) => s,
                Err(e) => {
                    let err = map_hw_error(e.as_ref(), Site::Open);
                    tracing::error!(error = %err, "transport open failed");
                    let _ = tx.send(Message::Error(err));
                    return;
                }
            };
            let name = source.describe();
            tracing::info!(source = %name, "transport open");
            let _ = tx.send(Message::Info(format!("connected to {name}")));

            let parser = match FrameParser::new() {
                Ok(p) => p,
                Err(e) => {
                    let _ = tx.send(Message::Error(BridgeError::State(e.to_string())));
                    return;
                }
            };

            loop {
                if shutdown_clone.load(Ordering::Relaxed) {
                    tracing::debug!("reader thread received shutdown signal");
                    break;
                }

                match source.read_line() {
                    Ok(Some(bytes)) => {
                        let line = decode_line(&bytes);
                        let line = line.trim();
                        if line.is_empty() {
                            continue;
                        }
                        match parser.parse(line) {
                            Ok(sample) => {
                                // If send fails, consumer is gone; exit gracefully
                                if tx.send(Message::Data(sample)).is_err() {
                                    tracing::debug!("reader consumer disconnected, exiting thread");
                                    break;
                                }
                                last_ok_clone.store(thread_clock.ms_since(epoch), Ordering::Relaxed);
                            }
                            Err(e) => {
                                dropped_clone.fetch_add(1, Ordering::Relaxed);
                                tracing::debug!(error = %e, line, "dropping line");
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        let err = map_hw_error(e.as_ref(), Site::Read);
                        tracing::error!(error = %err, "transport read failed");
                        let _ = tx.send(Message::Error(err));
                        break;
                    }
                }
            }
            let _ = tx.send(Message::Info(format!("disconnected from {name}")));
            tracing::trace!("reader thread exiting cleanly");
        });

        Self {
            rx,
            last_ok,
            dropped,
            clock,
            epoch,
            shutdown,
            join_handle: Some(join_handle),
        }
    }

    /// Wrap an already-open source.
    pub fn from_source<S, C>(source: S, clock: C) -> Self
    where
        S: LineSource + Send + 'static,
        C: Clock + Send + Sync + 'static,
    {
        Self::spawn(move || Ok(source), clock)
    }

    /// Lines that failed to parse so far.
    pub fn dropped_lines(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Whether the thread has exited (open or read failure, or stop).
    pub fn is_finished(&self) -> bool {
        self.join_handle
            .as_ref()
            .is_none_or(std::thread::JoinHandle::is_finished)
    }

    pub fn stalled_for(&self, now_ms: u64) -> u64 {
        now_ms.saturating_sub(self.last_ok.load(Ordering::Relaxed))
    }

    /// Milliseconds since the last good frame, on the reader's clock.
    pub fn stalled_for_now(&self) -> u64 {
        self.stalled_for(self.clock.ms_since(self.epoch))
    }
}

impl Inbox for Reader {
    fn drain(&mut self) -> Vec<Message> {
        self.rx.try_iter().collect()
    }

    fn stalled_ms(&self) -> Option<u64> {
        Some(self.stalled_for_now())
    }
}

impl Drop for Reader {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.join_handle.take() {
            match handle.join() {
                Ok(()) => {
                    tracing::trace!("reader thread joined");
                }
                Err(e) => {
                    // Thread panicked; log but don't propagate (we're in Drop)
                    tracing::warn!(?e, "reader thread panicked during shutdown");
                }
            }
        }
    }
}
