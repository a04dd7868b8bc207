pub mod clock;

pub use clock::{Clock, MonotonicClock};

/// Error type used at every trait boundary in this crate.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Screen position in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Coordinate {
    pub x: i32,
    pub y: i32,
}

impl Coordinate {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in screen pixels; `x`/`y` is the top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    /// Square of half-size `half` centered on `c`.
    pub fn around(c: Coordinate, half: i32) -> Self {
        Self {
            x: c.x - half,
            y: c.y - half,
            width: half * 2,
            height: half * 2,
        }
    }

    /// Smallest rectangle covering both.
    pub fn union(&self, other: &Rect) -> Rect {
        let x0 = self.x.min(other.x);
        let y0 = self.y.min(other.y);
        let x1 = (self.x + self.width).max(other.x + other.width);
        let y1 = (self.y + self.height).max(other.y + other.height);
        Rect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        }
    }

    /// Clip to `[0, width) x [0, height)`; empty results have zero extent.
    pub fn clip(&self, width: i32, height: i32) -> Rect {
        let x0 = self.x.clamp(0, width);
        let y0 = self.y.clamp(0, height);
        let x1 = (self.x + self.width).clamp(0, width);
        let y1 = (self.y + self.height).clamp(0, height);
        Rect {
            x: x0,
            y: y0,
            width: (x1 - x0).max(0),
            height: (y1 - y0).max(0),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Keys the wand can press. Kept small on purpose; the backends map each to
/// a platform key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    PageUp,
    PageDown,
    Space,
}

/// One snapshot of the on-screen marker, handed to the renderer every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorFrame {
    pub visible: bool,
    pub position: Coordinate,
    pub radius: u32,
    /// Region to repaint, or `None` when nothing changed since the last frame.
    pub dirty: Option<Rect>,
}

/// Line-oriented transport (serial port, simulator, test script).
pub trait LineSource {
    /// Block up to the source's read timeout for one complete line.
    ///
    /// `Ok(None)` means the timeout elapsed without a full line; the caller
    /// polls again. Returned bytes exclude the terminator and may contain
    /// invalid UTF-8.
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, BoxError>;

    /// Human-readable name used in log messages.
    fn describe(&self) -> String {
        "line source".to_string()
    }
}

/// OS input-injection capability.
///
/// All calls are synchronous and run on the processing thread.
pub trait InputInjector {
    fn move_cursor_absolute(&mut self, at: Coordinate) -> Result<(), BoxError>;
    fn cursor_position(&mut self) -> Result<Coordinate, BoxError>;
    fn mouse_button(&mut self, button: MouseButton, down: bool) -> Result<(), BoxError>;
    fn key_press(&mut self, key: Key) -> Result<(), BoxError>;
    /// Adjust the system cursor display counter and return its new value.
    ///
    /// Saturating-counter semantics: `show` increments, `!show` decrements,
    /// and the cursor is visible while the counter is `>= 0`.
    fn set_system_cursor_visible(&mut self, show: bool) -> Result<i32, BoxError>;
}

/// Receives the indicator state once per tick.
pub trait Renderer {
    fn render(&mut self, frame: &IndicatorFrame);
}

impl<T: LineSource + ?Sized> LineSource for Box<T> {
    fn read_line(&mut self) -> Result<Option<Vec<u8>>, BoxError> {
        (**self).read_line()
    }
    fn describe(&self) -> String {
        (**self).describe()
    }
}

impl<T: InputInjector + ?Sized> InputInjector for Box<T> {
    fn move_cursor_absolute(&mut self, at: Coordinate) -> Result<(), BoxError> {
        (**self).move_cursor_absolute(at)
    }
    fn cursor_position(&mut self) -> Result<Coordinate, BoxError> {
        (**self).cursor_position()
    }
    fn mouse_button(&mut self, button: MouseButton, down: bool) -> Result<(), BoxError> {
        (**self).mouse_button(button, down)
    }
    fn key_press(&mut self, key: Key) -> Result<(), BoxError> {
        (**self).key_press(key)
    }
    fn set_system_cursor_visible(&mut self, show: bool) -> Result<i32, BoxError> {
        (**self).set_system_cursor_visible(show)
    }
}

impl<T: Renderer + ?Sized> Renderer for Box<T> {
    fn render(&mut self, frame: &IndicatorFrame) {
        (**self).render(frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_union_covers_both() {
        let a = Rect::around(Coordinate::new(10, 10), 5);
        let b = Rect::around(Coordinate::new(30, 20), 5);
        let u = a.union(&b);
        assert_eq!(u, Rect { x: 5, y: 5, width: 30, height: 20 });
    }

    #[test]
    fn rect_clip_to_screen() {
        let r = Rect::around(Coordinate::new(0, 0), 60).clip(1920, 1080);
        assert_eq!(r, Rect { x: 0, y: 0, width: 60, height: 60 });
        let off = Rect { x: -100, y: -100, width: 10, height: 10 }.clip(1920, 1080);
        assert_eq!(off.width, 0);
        assert_eq!(off.height, 0);
    }
}
