//! On-disk behaviour of the configuration schema.
//!
//! The config module reads and writes a fixed path under the home
//! directory, so these tests drive the same serde schema through files in
//! scratch directories instead.

use anyhow::Context;
use seshat::config::{Config, TranscriptionConfig};
use std::fs;
use std::path::Path;
use tempfile::TempDir;

// =============================================================================
// Helpers
// =============================================================================

fn write_config(config: &Config, path: &Path) -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(config).context("serialise")?;
    fs::write(path, json).context("write")?;
    Ok(())
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let json = fs::read_to_string(path).context("read")?;
    serde_json::from_str(&json).context("parse")
}

fn scratch_file(dir: &TempDir, name: &str) -> std::path::PathBuf {
    dir.path().join(name)
}

// =============================================================================
// Round-trips through the filesystem
// =============================================================================

#[test]
fn test_default_config_survives_a_disk_round_trip() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "config.json");

    write_config(&Config::default(), &path).expect("write defaults");
    let loaded = read_config(&path).expect("read defaults back");

    assert_eq!(loaded.version, 1);
    assert_eq!(loaded.audio.sample_rate, 16000);
    assert_eq!(loaded.hotkey.key, "space");
    assert_eq!(loaded.api.base_url, "https://api.openai.com/v1");
    assert_eq!(loaded.transcription.model, "whisper-1");
}

#[test]
fn test_edited_fields_survive_the_disk() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "edited.json");

    let mut config = Config::default();
    config.audio.sample_rate = 24000;
    config.hotkey.key = "f6".to_string();
    config.transcription.language = "nb".to_string();
    write_config(&config, &path).expect("write");

    let loaded = read_config(&path).expect("read");
    assert_eq!(loaded.audio.sample_rate, 24000);
    assert_eq!(loaded.hotkey.key, "f6");
    assert_eq!(loaded.transcription.language, "nb");
}

#[test]
fn test_missing_file_yields_defaults() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "never-written.json");

    let config = read_config(&path).expect("defaults for missing file");

    assert_eq!(config.version, 1);
    assert_eq!(config.audio.device_id, None);
    assert_eq!(config.transcription.language, "en");
}

#[test]
fn test_second_save_overwrites_the_first() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "overwrite.json");

    let mut config = Config::default();
    config.audio.device_id = Some("bluetooth-headset".to_string());
    write_config(&config, &path).expect("first write");
    assert!(path.exists());

    config.transcription.language = "pt".to_string();
    write_config(&config, &path).expect("second write");

    let loaded = read_config(&path).expect("read");
    assert_eq!(loaded.audio.device_id, Some("bluetooth-headset".to_string()));
    assert_eq!(loaded.transcription.language, "pt");
}

#[test]
fn test_writing_defaults_resets_earlier_edits() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "reset.json");

    let mut edited = Config::default();
    edited.audio.sample_rate = 48000;
    edited.hotkey.key = "f1".to_string();
    edited.api.api_key = Some("sk-stale".to_string());
    write_config(&edited, &path).expect("write edits");

    write_config(&Config::default(), &path).expect("write defaults over them");

    let loaded = read_config(&path).expect("read");
    assert_eq!(loaded.audio.sample_rate, 16000);
    assert_eq!(loaded.hotkey.key, "space");
    assert_eq!(loaded.api.api_key, None);
}

// =============================================================================
// Schema versioning as seen from outside
// =============================================================================

#[test]
fn test_version_field_round_trips() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "versioned.json");

    write_config(&Config::default(), &path).expect("write");
    let loaded = read_config(&path).expect("read");

    assert_eq!(loaded.version, 1);
}

#[test]
fn test_a_version_zero_file_still_parses() {
    // A file from before the version field carried one implicitly.
    let json = r#"{"version": 0, "hotkey": {"key": "ralt"}}"#;
    let config: Config = serde_json::from_str(json).expect("parse old file");

    assert_eq!(config.version, 0);
    assert_eq!(config.hotkey.key, "ralt");
    assert_eq!(config.audio.sample_rate, 16000);
}

// =============================================================================
// Awkward input
// =============================================================================

#[test]
fn test_empty_strings_are_kept_verbatim() {
    let json = r#"{
        "version": 1,
        "audio": {"device_id": ""},
        "api": {"base_url": ""},
        "transcription": {"model": ""}
    }"#;

    let config: Config = serde_json::from_str(json).expect("parse");

    assert_eq!(config.audio.device_id, Some(String::new()));
    assert_eq!(config.api.base_url, "");
    assert_eq!(config.transcription.model, "");
}

#[test]
fn test_device_names_needing_json_escapes() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "escapes.json");

    let awkward = r#"Scarlett 2i2 "studio" input \ front"#;
    let mut config = Config::default();
    config.audio.device_id = Some(awkward.to_string());
    write_config(&config, &path).expect("write");

    let loaded = read_config(&path).expect("read");
    assert_eq!(loaded.audio.device_id.as_deref(), Some(awkward));
}

#[test]
fn test_saved_file_is_human_editable() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "pretty.json");

    write_config(&Config::default(), &path).expect("write");
    let text = fs::read_to_string(&path).expect("read raw");

    // Pretty printing: one field per line, indented
    assert!(text.lines().count() > 5);
    assert!(text.contains("  \"version\""));
}

#[test]
fn test_mangled_json_is_an_error_not_defaults() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "mangled.json");

    fs::write(&path, "version = 1\naudio {").expect("write garbage");

    assert!(read_config(&path).is_err());
}

#[test]
fn test_fields_from_newer_builds_are_ignored() {
    let json = r#"{
        "version": 1,
        "telemetry": {"enabled": false},
        "audio": {"sample_rate": 22050, "noise_floor_db": -60}
    }"#;

    let config: Config = serde_json::from_str(json).expect("parse");
    assert_eq!(config.audio.sample_rate, 22050);
}

#[test]
fn test_section_parses_on_its_own() {
    let json = r#"{"model": "whisper-large-v3", "language": "da"}"#;
    let section: TranscriptionConfig = serde_json::from_str(json).expect("parse section");

    assert_eq!(section.model, "whisper-large-v3");
    assert_eq!(section.language, "da");
}

// =============================================================================
// Repeated rewrites
// =============================================================================

#[test]
fn test_rapid_rewrites_leave_a_valid_file() {
    let dir = TempDir::new().expect("scratch dir");
    let path = scratch_file(&dir, "rewritten.json");

    for step in 0..10u32 {
        let mut config = Config::default();
        config.audio.sample_rate = 8000 + step * 2000;
        write_config(&config, &path).expect("write");
    }

    let loaded = read_config(&path).expect("read after rewrites");
    assert_eq!(loaded.audio.sample_rate, 26000);
}
