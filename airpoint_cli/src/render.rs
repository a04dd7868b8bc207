//! Indicator output for terminals without an overlay surface.

use airpoint_traits::{IndicatorFrame, Renderer};

/// Logs marker changes at debug level; unchanged frames are skipped.
#[derive(Debug, Default)]
pub struct LogRenderer {
    repaints: u64,
}

impl LogRenderer {
    pub fn repaints(&self) -> u64 {
        self.repaints
    }
}

impl Renderer for LogRenderer {
    fn render(&mut self, frame: &IndicatorFrame) {
        let Some(dirty) = frame.dirty else {
            return;
        };
        self.repaints += 1;
        tracing::debug!(
            visible = frame.visible,
            x = frame.position.x,
            y = frame.position.y,
            radius = frame.radius,
            dirty_x = dirty.x,
            dirty_y = dirty.y,
            dirty_w = dirty.width,
            dirty_h = dirty.height,
            "indicator"
        );
    }
}
