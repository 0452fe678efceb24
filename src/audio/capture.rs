//! Push-to-talk audio capture using cpal
//!
//! One `Recorder` lives on the session worker thread for the whole process
//! (cpal streams are not Send). Each press opens a fresh input stream; each
//! release drops it, drains the chunk queue, and assembles the session
//! waveform.

use super::buffer::FrameBuffer;
use super::{device, metering, Waveform};
use anyhow::{anyhow, Result};
use cpal::traits::{DeviceTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Outcome of stopping a capture session.
#[derive(Debug)]
pub enum CaptureOutcome {
    /// stop() was called without a live stream
    Inactive,
    /// The stream ran but delivered no chunks (key tapped too briefly)
    Empty,
    /// The assembled session waveform, ready for transcription
    Captured(Waveform),
}

/// Audio recorder driving one input stream per push-to-talk session
pub struct Recorder {
    stream: Option<cpal::Stream>,
    frames: Arc<FrameBuffer>,
    capturing: Arc<AtomicBool>,
    device_id: Option<String>,
    sample_rate: u32,
}

impl Recorder {
    /// Create a recorder. `capturing` is the shared flag the key handler
    /// flips; the stream callback only forwards chunks while it is true.
    pub fn new(capturing: Arc<AtomicBool>, device_id: Option<String>, sample_rate: u32) -> Self {
        Self {
            stream: None,
            frames: Arc::new(FrameBuffer::new()),
            capturing,
            device_id,
            sample_rate,
        }
    }

    /// True while a capture stream is open
    pub fn is_recording(&self) -> bool {
        self.stream.is_some()
    }

    /// Open the input stream and begin delivering chunks.
    ///
    /// Fails without side effects if no input device exists or the mono
    /// fixed-rate configuration is rejected by the device.
    pub fn start(&mut self) -> Result<()> {
        if self.stream.is_some() {
            return Err(anyhow!("A capture stream is already open"));
        }

        let device = device::resolve_input_device(self.device_id.as_deref())
            .ok_or_else(|| anyhow!("No audio input device available"))?;

        let config = cpal::StreamConfig {
            channels: 1,
            sample_rate: self.sample_rate,
            buffer_size: cpal::BufferSize::Default,
        };

        tracing::info!(
            "Starting capture: device='{}', {}Hz, 1ch, f32",
            device::display_name(&device),
            self.sample_rate
        );

        let frames = self.frames.clone();
        let capturing = self.capturing.clone();

        let stream = device.build_input_stream(
            &config,
            move |data: &[f32], _: &cpal::InputCallbackInfo| {
                // Chunks delivered after release (flag already false) are
                // dropped here instead of leaking into the next session.
                if capturing.load(Ordering::SeqCst) {
                    frames.push(data.to_vec());
                }
            },
            |err| {
                tracing::warn!("Input stream reported an error: {}", err);
            },
            None,
        )?;

        stream.play()?;
        self.stream = Some(stream);

        tracing::info!("Input stream running");
        Ok(())
    }

    /// Stop the stream and assemble everything captured since `start()`.
    pub fn stop(&mut self) -> CaptureOutcome {
        let Some(stream) = self.stream.take() else {
            return CaptureOutcome::Inactive;
        };
        // Dropping the stream halts delivery; every chunk the session
        // produced is queued by the time drop returns.
        drop(stream);

        let chunks = self.frames.drain_all();
        if chunks.is_empty() {
            tracing::info!("No audio captured");
            return CaptureOutcome::Empty;
        }

        let waveform = Waveform::from_chunks(chunks, self.sample_rate);
        tracing::info!(
            "Captured {:.2}s of audio ({} samples, peak {:.3}, rms {:.3})",
            waveform.duration_secs(),
            waveform.len(),
            waveform.peak(),
            metering::calculate_rms(&waveform.samples)
        );
        CaptureOutcome::Captured(waveform)
    }
}
