//! Wand frame parser.
//!
//! Two line grammars are accepted:
//!
//! - tagged: `RX -> X:<f> Y:<f> Z:<f> | Buttons: <0|1> <0|1> <0|1> <0|1>`,
//!   case-insensitive and matched anywhere in the line;
//! - CSV fallback: `x,y,z,b0,b1,b2,b3`, extra fields ignored.
//!
//! The device's Z axis drives horizontal motion and Y drives vertical, so
//! the parser swaps them into `RawSample::x`/`RawSample::y` here.

use regex::Regex;

use crate::error::ParseError;

/// Four button lines in index order `b0..b3`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ButtonVector(pub [bool; 4]);

impl ButtonVector {
    pub const RELEASED: Self = Self([false; 4]);

    #[inline]
    pub fn pressed(self, i: usize) -> bool {
        self.0[i]
    }

    /// Released in `prev`, pressed now.
    #[inline]
    pub fn rising(self, prev: Self, i: usize) -> bool {
        self.0[i] && !prev.0[i]
    }

    #[inline]
    pub fn falling(self, prev: Self, i: usize) -> bool {
        !self.0[i] && prev.0[i]
    }
}

impl From<[u8; 4]> for ButtonVector {
    fn from(v: [u8; 4]) -> Self {
        Self(v.map(|b| b != 0))
    }
}

/// One parsed frame. `x` is horizontal (device Z), `y` vertical (device Y),
/// `z` keeps device X for diagnostics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawSample {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    pub buttons: ButtonVector,
}

const TAGGED: &str = r"(?i)RX\s*->\s*X:\s*([-+\d.eE]+)\s*Y:\s*([-+\d.eE]+)\s*Z:\s*([-+\d.eE]+)\s*\|\s*Buttons:\s*([01])\s+([01])\s+([01])\s+([01])";

const CSV_FIELDS: usize = 7;

/// Compiled line grammar. Build once per reader thread.
#[derive(Debug, Clone)]
pub struct FrameParser {
    tagged: Regex,
}

impl FrameParser {
    pub fn new() -> Result<Self, regex::Error> {
        Ok(Self {
            tagged: Regex::new(TAGGED)?,
        })
    }

    /// Parse one decoded line (terminator already stripped).
    pub fn parse(&self, line: &str) -> Result<RawSample, ParseError> {
        if let Some(caps) = self.tagged.captures(line) {
            let field = |i: usize| caps.get(i).map_or("", |m| m.as_str());
            let dev_x = number("x", field(1))?;
            let dev_y = number("y", field(2))?;
            let dev_z = number("z", field(3))?;
            let mut buttons = [false; 4];
            for (i, b) in buttons.iter_mut().enumerate() {
                *b = field(4 + i) == "1";
            }
            return Ok(RawSample {
                x: dev_z,
                y: dev_y,
                z: dev_x,
                buttons: ButtonVector(buttons),
            });
        }
        parse_csv(line)
    }
}

fn parse_csv(line: &str) -> Result<RawSample, ParseError> {
    let parts: Vec<&str> = line
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if parts.len() < CSV_FIELDS {
        return Err(ParseError::NoMatch);
    }
    let dev_x = number("x", parts[0])?;
    let dev_y = number("y", parts[1])?;
    let dev_z = number("z", parts[2])?;
    const NAMES: [&str; 4] = ["b0", "b1", "b2", "b3"];
    let mut buttons = [false; 4];
    for (i, b) in buttons.iter_mut().enumerate() {
        let v: i64 = parts[3 + i].parse().map_err(|_| ParseError::BadNumber {
            field: NAMES[i],
            value: parts[3 + i].to_string(),
        })?;
        *b = v != 0;
    }
    Ok(RawSample {
        x: dev_z,
        y: dev_y,
        z: dev_x,
        buttons: ButtonVector(buttons),
    })
}

fn number(field: &'static str, s: &str) -> Result<f64, ParseError> {
    s.parse::<f64>().map_err(|_| ParseError::BadNumber {
        field,
        value: s.to_string(),
    })
}

/// Decode transport bytes as UTF-8, dropping invalid sequences.
pub fn decode_line(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(s) => s.to_string(),
        Err(_) => String::from_utf8_lossy(bytes)
            .chars()
            .filter(|&c| c != char::REPLACEMENT_CHARACTER)
            .collect(),
    }
}
