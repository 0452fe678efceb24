//! Sample format conversion
//!
//! Capture runs in f32 end to end; the wire format is 16-bit PCM. Samples
//! are clamped to the nominal range before scaling so that out-of-range
//! input saturates instead of wrapping.

/// Convert f32 samples (nominally -1.0..=1.0) to i16.
pub fn f32_to_i16(samples: &[f32]) -> Vec<i16> {
    samples
        .iter()
        .map(|&s| (s.clamp(-1.0, 1.0) * 32767.0) as i16)
        .collect()
}

/// Convert i16 samples back to f32 in the -1.0..=1.0 range.
pub fn i16_to_f32(samples: &[i16]) -> Vec<f32> {
    samples.iter().map(|&s| s as f32 / 32767.0).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Size of one quantisation step at 16 bits.
    const STEP: f32 = 1.0 / 32767.0;

    #[test]
    fn test_f32_to_i16_full_scale() {
        let samples = [1.0f32, -1.0, 0.0];
        let converted = f32_to_i16(&samples);
        assert_eq!(converted, vec![32767, -32767, 0]);
    }

    #[test]
    fn test_f32_to_i16_half_scale() {
        let converted = f32_to_i16(&[0.5]);
        assert_eq!(converted[0], 16383);
    }

    #[test]
    fn test_out_of_range_clamps_not_wraps() {
        let samples = [2.0f32, -2.0, 1.5, -1.0001];
        let converted = f32_to_i16(&samples);
        assert_eq!(converted, vec![32767, -32767, 32767, -32767]);
    }

    #[test]
    fn test_round_trip_within_one_step() {
        let original = [0.0f32, 0.25, 0.5, -0.5, 0.9999, -0.9999, 1.0, -1.0];
        let quantised = f32_to_i16(&original);
        let reconstructed = i16_to_f32(&quantised);

        for (before, after) in original.iter().zip(reconstructed.iter()) {
            assert!(
                (before - after).abs() <= STEP,
                "{} round-tripped to {} (off by more than one step)",
                before,
                after
            );
        }
    }

    #[test]
    fn test_i16_to_f32_full_scale() {
        let converted = i16_to_f32(&[32767i16, 0, -32767]);
        assert_eq!(converted[0], 1.0);
        assert_eq!(converted[1], 0.0);
        assert_eq!(converted[2], -1.0);
    }
}
