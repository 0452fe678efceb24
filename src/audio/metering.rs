//! Audio level measurement
//!
//! Peak amplitude is the per-session figure shown to the user after capture;
//! RMS goes to the debug log alongside it.

/// Root-mean-square level of a sample buffer; 0.0 when empty.
pub fn calculate_rms(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let mean_square = samples.iter().map(|s| s * s).sum::<f32>() / samples.len() as f32;
    mean_square.sqrt()
}

/// Largest absolute sample value in the buffer; 0.0 when empty.
pub fn calculate_peak(samples: &[f32]) -> f32 {
    samples.iter().fold(0.0f32, |peak, s| peak.max(s.abs()))
}
