use airpoint_core::config::{MotionCfg, Screen};
use airpoint_traits::Coordinate;
use airpoint_core::frame::{ButtonVector, RawSample};
use airpoint_core::motion::{MotionFilter, normalize};
use proptest::prelude::*;

fn sample(x: f64, y: f64) -> RawSample {
    RawSample {
        x,
        y,
        z: 0.0,
        buttons: ButtonVector::RELEASED,
    }
}

proptest! {
    #[test]
    fn normalized_value_is_bounded(v in proptest::num::f64::ANY) {
        let n = normalize(v, 8.0);
        prop_assert!((-1.0..=1.0).contains(&n));
    }

    #[test]
    fn in_range_values_are_linear(v in -8.0f64..=8.0) {
        prop_assert!((normalize(v, 8.0) - v / 8.0).abs() < 1e-12);
    }

    #[test]
    fn position_stays_on_screen(
        xs in proptest::collection::vec((-100.0f64..100.0, -100.0f64..100.0), 1..50),
        sens in 0.1f64..5.0,
        alpha in 0.01f64..=1.0,
        w in 1i32..4000,
        h in 1i32..3000,
    ) {
        let cfg = MotionCfg { sensitivity: sens, ema_alpha: alpha, ..MotionCfg::default() };
        let mut f = MotionFilter::new(cfg, Screen::new(w, h));
        for (x, y) in xs {
            let p = f.update(&sample(x, y));
            prop_assert!(p.x >= 0 && p.x < w);
            prop_assert!(p.y >= 0 && p.y < h);
        }
    }

    #[test]
    fn smoothing_converges_without_overshoot(
        x in -8.0f64..8.0,
        y in -8.0f64..8.0,
        alpha in 0.01f64..0.99,
    ) {
        let cfg = MotionCfg { ema_alpha: alpha, ..MotionCfg::default() };
        let mut f = MotionFilter::new(cfg, Screen::new(1920, 1080));
        let s = sample(x, y);
        let (tx, ty) = f.target(&s);
        let mut dx = (f.smoothing().sx - tx).abs();
        let mut dy = (f.smoothing().sy - ty).abs();
        let start_sx = f.smoothing().sx;
        for _ in 0..200 {
            f.update(&s);
            let st = f.smoothing();
            let ndx = (st.sx - tx).abs();
            let ndy = (st.sy - ty).abs();
            prop_assert!(ndx <= dx + 1e-9);
            prop_assert!(ndy <= dy + 1e-9);
            // stays on the starting side of the target
            prop_assert!((st.sx - tx) * (start_sx - tx) >= -1e-9);
            dx = ndx;
            dy = ndy;
        }
    }

    #[test]
    fn calibration_twice_is_idempotent(x in -8.0f64..8.0, y in -8.0f64..8.0) {
        let mut f = MotionFilter::new(MotionCfg::default(), Screen::new(1280, 720));
        for _ in 0..20 {
            f.update(&sample(x, y));
        }
        let a = f.calibrate();
        let b = f.calibrate();
        prop_assert_eq!(a, b);
    }
}

#[test]
fn calibration_recenters_pose_at_unit_gain() {
    // sensitivity 0.5 gives a gain of 1, so the offset maps back exactly
    let cfg = MotionCfg {
        ema_alpha: 1.0,
        sensitivity: 0.5,
        ..MotionCfg::default()
    };
    let screen = Screen::new(1000, 1000);
    let mut f = MotionFilter::new(cfg, screen);
    let pose = sample(2.0, -2.0);
    assert_eq!(f.update(&pose), Coordinate::new(625, 375));
    f.calibrate();
    assert_eq!(f.update(&pose), screen.center());
}

#[test]
fn calibration_at_default_gain_mirrors_pose_across_center() {
    // gain 2: the offset is subtracted before the gain, so it overshoots
    let cfg = MotionCfg {
        ema_alpha: 1.0,
        sensitivity: 1.0,
        ..MotionCfg::default()
    };
    let screen = Screen::new(1000, 1000);
    let mut f = MotionFilter::new(cfg, screen);
    let pose = sample(2.0, -2.0);
    assert_eq!(f.update(&pose), Coordinate::new(750, 250));
    f.calibrate();
    assert_eq!(f.update(&pose), Coordinate::new(250, 750));
}
