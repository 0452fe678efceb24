//! Session and transcription workers
//!
//! Wires together the flow from key events to transcript output. Two
//! long-lived consumers decouple the key listener from everything slow: a
//! dedicated OS thread owns the recorder (cpal streams are not Send) and
//! processes start/stop commands in key-event order, and a tokio task takes
//! each assembled waveform and runs the network call. Waveforms queue FIFO,
//! so a new capture can begin while an earlier transcription is still in
//! flight.

use crate::audio::capture::{CaptureOutcome, Recorder};
use crate::audio::Waveform;
use crate::transcription::RemoteClient;
use crossbeam_channel::Receiver;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use tokio::sync::mpsc;

/// Commands consumed by the session worker, in key-event order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Stop,
}

/// Spawn the thread that owns the recorder.
///
/// Commands arrive strictly in the order the controller queued them, so a
/// stop always completes (stream closed, buffer drained) before the next
/// start reuses either.
pub fn spawn_session_worker(
    commands: Receiver<SessionCommand>,
    waveforms: mpsc::UnboundedSender<Waveform>,
    capturing: Arc<AtomicBool>,
    device_id: Option<String>,
    sample_rate: u32,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        let mut recorder = Recorder::new(capturing, device_id, sample_rate);

        for command in commands.iter() {
            match command {
                SessionCommand::Start => match recorder.start() {
                    Ok(()) => println!("Recording started"),
                    Err(e) => {
                        // A device failure ends this session only; the
                        // controller stays ready for the next press.
                        tracing::error!("Failed to start capture: {}", e);
                    }
                },
                SessionCommand::Stop => handle_stop(&mut recorder, &waveforms),
            }
        }
        tracing::debug!("Session worker shutting down");
    })
}

/// Close out one capture and queue the result for transcription.
fn handle_stop(recorder: &mut Recorder, waveforms: &mpsc::UnboundedSender<Waveform>) {
    dispatch_outcome(recorder.stop(), waveforms);
}

/// Route a finished capture: audio queues for transcription, an empty
/// session is announced, a stop with no stream passes silently.
fn dispatch_outcome(outcome: CaptureOutcome, waveforms: &mpsc::UnboundedSender<Waveform>) {
    match outcome {
        CaptureOutcome::Captured(waveform) => {
            println!("Peak amplitude: {:.2}", waveform.peak());
            if waveforms.send(waveform).is_err() {
                tracing::error!("Transcription worker is gone; dropping waveform");
            }
        }
        CaptureOutcome::Empty => println!("No audio captured"),
        CaptureOutcome::Inactive => {}
    }
}

/// Spawn the task that drains the waveform queue through the client.
///
/// Transcripts go to stdout as bare lines; failures are warnings on the log
/// and the session simply ends without a transcript.
pub fn spawn_transcription_worker(
    client: RemoteClient,
    mut waveforms: mpsc::UnboundedReceiver<Waveform>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(waveform) = waveforms.recv().await {
            match client.transcribe(&waveform).await {
                Ok(text) => println!("{}", text),
                Err(e) => tracing::warn!("Transcription failed: {}", e),
            }
        }
        tracing::debug!("Transcription worker shutting down");
    })
}
