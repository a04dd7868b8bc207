#![no_main]
use std::sync::OnceLock;

use airpoint_core::frame::{FrameParser, decode_line};
use libfuzzer_sys::fuzz_target;

static PARSER: OnceLock<FrameParser> = OnceLock::new();

// Raw serial bytes must decode and parse (or be rejected) without panicking.
fuzz_target!(|data: &[u8]| {
    let parser = PARSER.get_or_init(|| FrameParser::new().expect("frame regex compiles"));
    let line = decode_line(data);
    let _ = parser.parse(line.trim());
});
