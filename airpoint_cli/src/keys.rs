//! Terminal shortcuts: `c` recalibrates, `q`/Esc quits, Ctrl-C stops.

use std::io::IsTerminal;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::JoinHandle;
use std::time::Duration;

use airpoint_core::Command;
use crossbeam_channel as xch;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;

const POLL: Duration = Duration::from_millis(100);

/// Map one key event to a loop command. Ctrl-C raises the stop flag instead,
/// since raw mode swallows SIGINT.
pub fn command_for(key: &KeyEvent) -> Option<Command> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => None,
        KeyCode::Char('c' | 'C') => Some(Command::Calibrate),
        KeyCode::Char('q' | 'Q') | KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

fn is_interrupt(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.code == KeyCode::Char('c')
        && key.modifiers.contains(KeyModifiers::CONTROL)
}

/// Keyboard thread plus the raw-mode session it needs. Dropping it stops the
/// thread and restores the terminal.
pub struct KeyListener {
    done: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl KeyListener {
    /// Returns `None` when stdin is not a terminal or raw mode is refused.
    pub fn start(tx: xch::Sender<Command>, stop: Arc<AtomicBool>) -> Option<Self> {
        if !std::io::stdin().is_terminal() {
            tracing::debug!("stdin is not a terminal; keyboard shortcuts disabled");
            return None;
        }
        if let Err(e) = terminal::enable_raw_mode() {
            tracing::warn!(error = %e, "raw mode unavailable; keyboard shortcuts disabled");
            return None;
        }
        let done = Arc::new(AtomicBool::new(false));
        let done_thread = done.clone();
        let handle = std::thread::spawn(move || {
            while !done_thread.load(Ordering::Relaxed) && !stop.load(Ordering::Relaxed) {
                match event::poll(POLL) {
                    Ok(true) => {}
                    Ok(false) => continue,
                    Err(e) => {
                        tracing::warn!(error = %e, "keyboard poll failed");
                        break;
                    }
                }
                let Ok(Event::Key(key)) = event::read() else {
                    continue;
                };
                if is_interrupt(&key) {
                    stop.store(true, Ordering::Relaxed);
                    break;
                }
                if let Some(cmd) = command_for(&key) {
                    tracing::debug!(?cmd, "key command");
                    if tx.send(cmd).is_err() {
                        break;
                    }
                }
            }
        });
        tracing::info!("keys: c = calibrate, q/Esc = quit");
        Some(Self {
            done,
            handle: Some(handle),
        })
    }
}

impl Drop for KeyListener {
    fn drop(&mut self) {
        self.done.store(true, Ordering::Relaxed);
        if let Some(h) = self.handle.take() {
            let _ = h.join();
        }
        let _ = terminal::disable_raw_mode();
    }
}
