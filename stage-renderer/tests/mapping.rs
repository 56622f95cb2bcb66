//! Client-to-surface mapping laws.

use proptest::prelude::*;
use stage_renderer::{ClientRect, FrameClock, InputBinder};

proptest! {
    #[test]
    fn prop_relative_position_is_preserved(
        left in -500.0f64..500.0,
        top in -500.0f64..500.0,
        width in 1.0f64..2000.0,
        height in 1.0f64..2000.0,
        surface_w in 1u32..4000,
        surface_h in 1u32..4000,
        u in 0.0f64..=1.0,
        v in 0.0f64..=1.0,
    ) {
        let binder = InputBinder::new(ClientRect::new(left, top, width, height), surface_w, surface_h);
        let (x, y) = binder.to_surface(left + u * width, top + v * height);
        prop_assert!((x - u * f64::from(surface_w)).abs() < 1e-6);
        prop_assert!((y - v * f64::from(surface_h)).abs() < 1e-6);
    }

    #[test]
    fn prop_clock_delta_stays_in_range(
        fps in 1u32..240,
        max_delta in 0.5f64..10.0,
        stamps in proptest::collection::vec(0.0f64..100_000.0, 1..20),
    ) {
        let mut clock = FrameClock::new(fps, max_delta).unwrap();
        for stamp in stamps {
            let delta = clock.tick(stamp);
            prop_assert!(delta >= 0.0);
            prop_assert!(delta <= max_delta.max(1.0));
        }
    }
}
