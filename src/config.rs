//! Configuration for Seshat
//!
//! One versioned JSON file under `~/.seshat/`. A missing file or missing
//! fields fall back to defaults, so a fresh install runs with nothing more
//! than `OPENAI_API_KEY` exported.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Schema version written by this build
const CURRENT_VERSION: u32 = 1;

/// Top-level configuration tree
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Schema version, bumped when the layout changes
    pub version: u32,
    /// Microphone capture
    pub audio: AudioConfig,
    /// Push-to-talk key
    pub hotkey: HotkeyConfig,
    /// Remote service connection
    pub api: ApiConfig,
    /// Per-request transcription parameters
    pub transcription: TranscriptionConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            audio: AudioConfig::default(),
            hotkey: HotkeyConfig::default(),
            api: ApiConfig::default(),
            transcription: TranscriptionConfig::default(),
        }
    }
}

/// Microphone capture settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AudioConfig {
    /// Input device to open; `None` picks the system default
    pub device_id: Option<String>,
    /// Capture rate in Hz; 16 kHz is plenty for speech models
    pub sample_rate: u32,
}

impl Default for AudioConfig {
    fn default() -> Self {
        Self {
            device_id: None,
            sample_rate: 16000,
        }
    }
}

/// Push-to-talk key settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HotkeyConfig {
    /// Name of the key held to record ("space", "f12", "rctrl", ...)
    pub key: String,
}

impl Default for HotkeyConfig {
    fn default() -> Self {
        Self {
            key: "space".to_string(),
        }
    }
}

/// Remote service connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Service root, e.g. `https://api.openai.com/v1`
    pub base_url: String,
    /// Bearer token; `OPENAI_API_KEY` in the environment wins over this field
    pub api_key: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            api_key: None,
        }
    }
}

/// Per-request transcription parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TranscriptionConfig {
    /// Model identifier sent with every request
    pub model: String,
    /// Language hint as an ISO 639-1 code
    pub language: String,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: "whisper-1".to_string(),
            language: "en".to_string(),
        }
    }
}

impl Config {
    /// Read the config file, or hand back defaults when there is none.
    pub fn load() -> anyhow::Result<Self> {
        load_from_disk()
    }

    /// Write this configuration out as pretty-printed JSON.
    pub fn save(&self) -> anyhow::Result<()> {
        save_to_disk(self)
    }

    /// The API key to use: environment variable first, config file second.
    pub fn resolved_api_key(&self) -> Option<String> {
        resolve_api_key(
            std::env::var("OPENAI_API_KEY").ok(),
            self.api.api_key.clone(),
        )
    }
}

/// Pick the API key from the environment when set and non-empty,
/// otherwise from the config file.
fn resolve_api_key(env_key: Option<String>, file_key: Option<String>) -> Option<String> {
    env_key.filter(|k| !k.is_empty()).or(file_key)
}

/// Full path of the config file (`~/.seshat/config.json`)
pub fn get_config_path() -> PathBuf {
    get_config_dir().join("config.json")
}

/// The directory holding the config file and logs (`~/.seshat`)
pub fn get_config_dir() -> PathBuf {
    home_dir_or_fallback().join(".seshat")
}

fn home_dir_or_fallback() -> PathBuf {
    dirs::home_dir().unwrap_or_else(|| {
        tracing::error!("No home directory; falling back to /tmp");
        PathBuf::from("/tmp")
    })
}

fn load_from_disk() -> anyhow::Result<Config> {
    let path = get_config_path();

    if !path.exists() {
        tracing::info!("No config file yet; starting from defaults");
        return Ok(Config::default());
    }

    let contents = fs::read_to_string(&path).context("Failed to read config file")?;

    let config: Config = serde_json::from_str(&contents).context("Failed to parse config")?;

    // A migrated config is written back immediately so the next start
    // loads it as-is.
    let loaded_version = config.version;
    let migrated = migrate_config(config)?;
    if migrated.version != loaded_version {
        save_to_disk(&migrated)?;
    }

    Ok(migrated)
}

fn save_to_disk(config: &Config) -> anyhow::Result<()> {
    let dir = get_config_dir();
    fs::create_dir_all(&dir).context("Failed to create config directory")?;

    let path = get_config_path();
    let contents = serde_json::to_string_pretty(config).context("Failed to serialise config")?;
    fs::write(&path, contents).context("Failed to write config file")?;

    tracing::debug!("Config written to {}", path.display());
    Ok(())
}

/// Bring an older on-disk schema up to the current version, one step at a
/// time. Pure: the caller decides whether to persist the result.
fn migrate_config(mut config: Config) -> anyhow::Result<Config> {
    let starting_version = config.version;

    while config.version < CURRENT_VERSION {
        config = apply_migration(config)?;
    }

    if config.version != starting_version {
        tracing::info!(
            "Config schema migrated: v{} -> v{}",
            starting_version,
            config.version
        );
    }

    Ok(config)
}

fn apply_migration(config: Config) -> anyhow::Result<Config> {
    match config.version {
        // 0 -> 1 introduced the version field itself; field layout unchanged
        0 => {
            let mut migrated = config;
            migrated.version = 1;
            Ok(migrated)
        }
        v => anyhow::bail!("Config version {} is newer than this build understands", v),
    }
}
