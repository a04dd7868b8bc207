//! Test and helper mocks for airpoint_core

use std::collections::VecDeque;
use std::time::Duration;

use airpoint_traits::{
    BoxError, Coordinate, IndicatorFrame, InputInjector, Key, LineSource, MouseButton, Renderer,
};

use crate::reader::{Inbox, Message};

/// One recorded injector call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Call {
    Move(Coordinate),
    Position,
    Button(MouseButton, bool),
    Key(Key),
    CursorVisible(bool),
}

/// Injector that records every call and can be told to fail some of them.
#[derive(Debug, Default)]
pub struct RecordingInjector {
    pub calls: Vec<Call>,
    position: Coordinate,
    counter: i32,
    fail_moves: bool,
    fail_buttons: bool,
    fail_keys: bool,
    fail_position: bool,
}

impl RecordingInjector {
    /// Real cursor starts at `position`.
    pub fn at(position: Coordinate) -> Self {
        Self {
            position,
            ..Self::default()
        }
    }

    pub fn failing_moves(mut self) -> Self {
        self.fail_moves = true;
        self
    }

    pub fn failing_buttons(mut self) -> Self {
        self.fail_buttons = true;
        self
    }

    pub fn failing_keys(mut self) -> Self {
        self.fail_keys = true;
        self
    }

    pub fn failing_position(mut self) -> Self {
        self.fail_position = true;
        self
    }

    /// Current display counter value.
    pub fn cursor_counter(&self) -> i32 {
        self.counter
    }

    /// Recorded calls, excluding cursor-visibility bookkeeping.
    pub fn input_calls(&self) -> Vec<Call> {
        self.calls
            .iter()
            .copied()
            .filter(|c| !matches!(c, Call::CursorVisible(_)))
            .collect()
    }
}

fn injected(what: &str) -> BoxError {
    Box::new(std::io::Error::other(format!("injected {what} failure")))
}

impl InputInjector for RecordingInjector {
    fn move_cursor_absolute(&mut self, at: Coordinate) -> Result<(), BoxError> {
        self.calls.push(Call::Move(at));
        if self.fail_moves {
            return Err(injected("move"));
        }
        self.position = at;
        Ok(())
    }

    fn cursor_position(&mut self) -> Result<Coordinate, BoxError> {
        self.calls.push(Call::Position);
        if self.fail_position {
            return Err(injected("position"));
        }
        Ok(self.position)
    }

    fn mouse_button(&mut self, button: MouseButton, down: bool) -> Result<(), BoxError> {
        self.calls.push(Call::Button(button, down));
        if self.fail_buttons {
            return Err(injected("button"));
        }
        Ok(())
    }

    fn key_press(&mut self, key: Key) -> Result<(), BoxError> {
        self.calls.push(Call::Key(key));
        if self.fail_keys {
            return Err(injected("key"));
        }
        Ok(())
    }

    fn set_system_cursor_visible(&mut self, show: bool) -> Result<i32, BoxError> {
        self.calls.push(Call::CursorVisible(show));
        self.counter = if show {
            self.counter.saturating_add(1)
        } else {
            self.counter.saturating_sub(1)
        };
        Ok(self.counter)
    }
}

/// Line source that replays fixed lines, then idles or fails.
pub struct ScriptedSource {
    lines: VecDeque<Vec<u8>>,
    fail_with: Option<String>,
    idle: Duration,
}

impl ScriptedSource {
    pub fn new<S: AsRef<[u8]>>(lines: impl IntoIterator<Item = S>) -> Self {
        Self {
            lines: lines.into_iter().map(|l| l.as_ref().to_vec()).collect(),
            fail_with: None,
            idle: Duration::from_millis(5),
        }
    }

    /// Return a read error once the script is exhausted.
    pub fn then_fail(mut self, msg: &str) -> Self {
        self.fail_with = Some(msg.to_string());
        self
    }
}

impl LineSource for ScriptedSource {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, BoxError> {
        if let Some(line) = self.lines.pop_front() {
            return Ok(Some(line));
        }
        if let Some(msg) = self.fail_with.take() {
            return Err(Box::new(std::io::Error::other(msg)));
        }
        std::thread::sleep(self.idle);
        Ok(None)
    }

    fn describe(&self) -> String {
        "scripted source".to_string()
    }
}

/// Inbox that hands out one prepared batch per drain; empty afterwards.
#[derive(Default)]
pub struct ScriptedInbox {
    batches: VecDeque<Vec<Message>>,
}

impl ScriptedInbox {
    pub fn new(batches: impl IntoIterator<Item = Vec<Message>>) -> Self {
        Self {
            batches: batches.into_iter().collect(),
        }
    }
}

impl Inbox for ScriptedInbox {
    fn drain(&mut self) -> Vec<Message> {
        self.batches.pop_front().unwrap_or_default()
    }
}

/// Renderer that keeps every frame.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    pub frames: Vec<IndicatorFrame>,
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, frame: &IndicatorFrame) {
        self.frames.push(*frame);
    }
}

/// Renderer that drops every frame.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn render(&mut self, _frame: &IndicatorFrame) {}
}
