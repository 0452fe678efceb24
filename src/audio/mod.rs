//! Audio subsystem for seshat
//!
//! Device resolution, stream capture, chunk buffering, and assembly of the
//! per-session waveform handed to the transcription client.

pub mod buffer;
pub mod capture;
pub mod device;
pub mod format;
pub mod metering;

pub use buffer::{Chunk, FrameBuffer};
pub use capture::Recorder;
pub use device::{list_input_devices, resolve_input_device};

/// The full audio signal captured by one push-to-talk session.
///
/// Samples stay in f32 until the transcription client serialises them;
/// quantisation happens exactly once, at the WAV boundary.
#[derive(Debug, Clone)]
pub struct Waveform {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
}

impl Waveform {
    /// Concatenate drained chunks in arrival order.
    pub fn from_chunks(chunks: Vec<Chunk>, sample_rate: u32) -> Self {
        let total: usize = chunks.iter().map(|c| c.len()).sum();
        let mut samples = Vec::with_capacity(total);
        for chunk in chunks {
            samples.extend(chunk);
        }
        Self {
            samples,
            sample_rate,
        }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Peak absolute amplitude, shown on the status line after capture.
    pub fn peak(&self) -> f32 {
        metering::calculate_peak(&self.samples)
    }

    /// Capture length in seconds.
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_chunks_concatenates_in_order() {
        let chunks = vec![vec![1.0, 2.0], vec![3.0], vec![4.0, 5.0]];
        let waveform = Waveform::from_chunks(chunks, 16000);

        assert_eq!(waveform.samples, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
        assert_eq!(waveform.sample_rate, 16000);
    }

    #[test]
    fn test_from_chunks_empty() {
        let waveform = Waveform::from_chunks(vec![], 16000);
        assert!(waveform.is_empty());
        assert_eq!(waveform.len(), 0);
    }

    #[test]
    fn test_peak_over_all_chunks() {
        let chunks = vec![vec![0.1, -0.3], vec![0.2], vec![-0.9, 0.4]];
        let waveform = Waveform::from_chunks(chunks, 16000);
        assert!((waveform.peak() - 0.9).abs() < 0.001);
    }

    #[test]
    fn test_duration() {
        let waveform = Waveform::from_chunks(vec![vec![0.0; 8000]], 16000);
        assert!((waveform.duration_secs() - 0.5).abs() < 0.0001);
    }
}
