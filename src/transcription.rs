//! Remote transcription client
//!
//! Stages the session waveform as a 16-bit mono WAV file, posts it to the
//! service's transcription endpoint as a single multipart request, and
//! returns the text. A session gets exactly one attempt: no retries, and no
//! request timeout, so the call blocks until the service answers or the
//! connection fails. The staged file is removed on every exit path.

use crate::audio::{format, Waveform};
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

/// Errors from a single transcription attempt
#[derive(Error, Debug)]
pub enum TranscribeError {
    #[error("Failed to stage audio for upload: {0}")]
    Staging(String),

    #[error("Failed to reach transcription service: {0}")]
    ConnectionFailed(String),

    #[error("Transcription service error (status {status}): {message}")]
    ServerError { status: u16, message: String },

    #[error("Failed to parse transcription response: {0}")]
    ParseError(String),
}

/// Successful response body from the transcription endpoint
#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Staged WAV file, removed on drop so cleanup covers success and failure
/// paths alike.
struct StagedWav {
    path: PathBuf,
}

impl StagedWav {
    /// Quantise the waveform and write it as mono 16-bit PCM under `dir`.
    fn create(dir: &Path, seq: u64, waveform: &Waveform) -> Result<Self, TranscribeError> {
        let path = dir.join(format!("seshat-{}-{}.wav", std::process::id(), seq));
        // Guard is live from here on, so a half-written file still gets
        // removed when an error bails out below.
        let staged = Self { path };

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: waveform.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let mut writer = hound::WavWriter::create(&staged.path, spec)
            .map_err(|e| TranscribeError::Staging(e.to_string()))?;
        for sample in format::f32_to_i16(&waveform.samples) {
            writer
                .write_sample(sample)
                .map_err(|e| TranscribeError::Staging(e.to_string()))?;
        }
        writer
            .finalize()
            .map_err(|e| TranscribeError::Staging(e.to_string()))?;

        Ok(staged)
    }
}

impl Drop for StagedWav {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(
                    "Failed to remove staged WAV {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Client for the remote transcription service
pub struct RemoteClient {
    base_url: String,
    api_key: String,
    model: String,
    language: String,
    staging_dir: PathBuf,
    seq: AtomicU64,
    client: reqwest::Client,
}

impl RemoteClient {
    /// Create a client staging WAV files in the system temp directory.
    pub fn new(base_url: &str, api_key: &str, model: &str, language: &str) -> Self {
        Self::with_staging_dir(base_url, api_key, model, language, std::env::temp_dir())
    }

    /// Create a client with an explicit staging directory.
    pub fn with_staging_dir(
        base_url: &str,
        api_key: &str,
        model: &str,
        language: &str,
        staging_dir: PathBuf,
    ) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            language: language.to_string(),
            staging_dir,
            seq: AtomicU64::new(0),
            // No request timeout: the session's one call is allowed to block
            // until the service responds or the connection drops.
            client: reqwest::Client::new(),
        }
    }

    /// Submit one waveform for transcription and return the text.
    ///
    /// Deterministic decoding is requested (temperature 0), so identical
    /// audio yields identical transcripts.
    pub async fn transcribe(&self, waveform: &Waveform) -> Result<String, TranscribeError> {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        let staged = StagedWav::create(&self.staging_dir, seq, waveform)?;

        let wav_bytes =
            std::fs::read(&staged.path).map_err(|e| TranscribeError::Staging(e.to_string()))?;
        tracing::debug!(
            "Staged {:.2}s of audio as {} bytes of WAV",
            waveform.duration_secs(),
            wav_bytes.len()
        );

        let url = format!("{}/audio/transcriptions", self.base_url);

        let audio_part = Part::bytes(wav_bytes)
            .file_name("audio.wav")
            .mime_str("audio/wav")
            .map_err(|e| TranscribeError::Staging(e.to_string()))?;

        let form = Form::new()
            .part("file", audio_part)
            .text("model", self.model.clone())
            .text("language", self.language.clone())
            .text("temperature", "0")
            .text("response_format", "json");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| TranscribeError::ConnectionFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "no response body".to_string());
            return Err(TranscribeError::ServerError {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: TranscriptionResponse = response
            .json()
            .await
            .map_err(|e| TranscribeError::ParseError(e.to_string()))?;

        Ok(parsed.text.trim().to_string())
        // staged drops here; the WAV is gone whichever way we returned
    }
}
