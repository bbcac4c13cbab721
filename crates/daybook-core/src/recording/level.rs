//! Microphone level normalization.

/// Quietest level shown, in decibels.
pub const SILENCE_DB: f32 = -60.0;

/// Maps a metering reading in dBFS to `0.0..=1.0`.
///
/// Linear over `[-60 dB, 0 dB]`, clamped outside it. `NaN` maps to 0.
#[must_use]
pub fn normalize_level(db: f32) -> f32 {
    if db.is_nan() {
        return 0.0;
    }
    ((db - SILENCE_DB) / -SILENCE_DB).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_points() {
        assert!((normalize_level(-60.0)).abs() < f32::EPSILON);
        assert!((normalize_level(-30.0) - 0.5).abs() < f32::EPSILON);
        assert!((normalize_level(0.0) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_out_of_range() {
        assert!(normalize_level(-160.0).abs() < f32::EPSILON);
        assert!(normalize_level(f32::NEG_INFINITY).abs() < f32::EPSILON);
        assert!((normalize_level(6.0) - 1.0).abs() < f32::EPSILON);
        assert!(normalize_level(f32::NAN).abs() < f32::EPSILON);
    }

    proptest! {
        #[test]
        fn prop_in_unit_range_and_monotonic(a in -200.0f32..50.0, b in -200.0f32..50.0) {
            let (la, lb) = (normalize_level(a), normalize_level(b));
            prop_assert!((0.0..=1.0).contains(&la));
            if a <= b {
                prop_assert!(la <= lb);
            }
        }
    }
}
