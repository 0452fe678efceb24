//! Seshat - Push-to-talk voice transcription
//!
//! Hold a key to record from the microphone; release it to send the capture
//! to a remote transcription service and print the text on stdout. Runs
//! until interrupted with Ctrl-C.

pub mod audio;
pub mod config;
pub mod hotkey;
pub mod pipeline;
pub mod ptt;
pub mod transcription;

use std::sync::atomic::AtomicBool;
use std::sync::Arc;

/// Set up logging: console on stderr plus a file under ~/.seshat/logs.
///
/// stdout is reserved for transcripts and status lines, so everything the
/// subscriber emits goes to stderr. Local time for readability.
fn init_logging() {
    use tracing_subscriber::prelude::*;

    /// chrono-backed local-time stamps, shared by both layers
    struct LocalTime;
    impl tracing_subscriber::fmt::time::FormatTime for LocalTime {
        fn format_time(
            &self,
            w: &mut tracing_subscriber::fmt::format::Writer<'_>,
        ) -> std::fmt::Result {
            write!(w, "{}", chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"))
        }
    }

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let stderr_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_timer(LocalTime);

    let log_dir = config::get_config_dir().join("logs");
    std::fs::create_dir_all(&log_dir).ok();
    let log_file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(log_dir.join("seshat.log"))
        .ok();

    match log_file {
        Some(file) => {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(std::sync::Mutex::new(file))
                .with_ansi(false)
                .with_timer(LocalTime);
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .with(file_layer)
                .init();
        }
        // Unwritable log dir degrades to console-only logging
        None => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(stderr_layer)
                .init();
        }
    }
}

/// Run the application until interrupted.
///
/// Wires the whole flow together: config, transcription client, the two
/// workers, the key-state controller, and the keyboard listener. The key
/// listener and session worker are plain threads; transcription runs on the
/// tokio runtime this function is called from.
pub async fn run() -> anyhow::Result<()> {
    init_logging();

    tracing::info!("Seshat starting");

    let cfg = config::Config::load().unwrap_or_else(|e| {
        tracing::error!("Failed to load config, using defaults: {}", e);
        config::Config::default()
    });

    // Write the defaults out on first run so users have a file to edit
    if !config::get_config_path().exists() {
        if let Err(e) = cfg.save() {
            tracing::warn!("Failed to write default config: {}", e);
        }
    }

    let api_key = cfg.resolved_api_key().unwrap_or_else(|| {
        tracing::warn!(
            "No API key configured; set OPENAI_API_KEY or api.api_key in {}",
            config::get_config_path().display()
        );
        String::new()
    });

    let (key, key_name) = match hotkey::parse_key(&cfg.hotkey.key) {
        Some(k) => (k, cfg.hotkey.key.clone()),
        None => {
            tracing::warn!("Unknown hotkey '{}', falling back to space", cfg.hotkey.key);
            (device_query::Keycode::Space, "space".to_string())
        }
    };

    // Surface device trouble before the first press rather than during it
    let devices = audio::list_input_devices();
    if devices.is_empty() {
        tracing::warn!("No audio input devices detected; captures will fail until one appears");
    } else {
        tracing::info!("Found {} audio input device(s)", devices.len());
    }

    let capturing = Arc::new(AtomicBool::new(false));
    let (command_tx, command_rx) = crossbeam_channel::unbounded();
    let (waveform_tx, waveform_rx) = tokio::sync::mpsc::unbounded_channel();

    let client = transcription::RemoteClient::new(
        &cfg.api.base_url,
        &api_key,
        &cfg.transcription.model,
        &cfg.transcription.language,
    );

    pipeline::spawn_transcription_worker(client, waveform_rx);
    pipeline::spawn_session_worker(
        command_rx,
        waveform_tx,
        Arc::clone(&capturing),
        cfg.audio.device_id.clone(),
        cfg.audio.sample_rate,
    );

    let controller = ptt::PttController::new(Arc::clone(&capturing), command_tx);
    hotkey::spawn_listener(key, controller);

    println!("Hold {} to speak; release to transcribe. Ctrl-C to quit.", key_name);

    tokio::signal::ctrl_c().await?;
    println!();
    tracing::info!("Seshat shutting down");
    Ok(())
}
