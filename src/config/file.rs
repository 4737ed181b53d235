//! TOML configuration file loading
//!
//! Supports `~/.config/handcue/config.toml` as a persistent config source.
//! All fields are optional: the file is a partial overlay on top of defaults.

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::Result;

/// Top-level TOML configuration file schema
#[derive(Debug, Default, Deserialize)]
pub struct HandcueConfigFile {
    /// Camera / replay source
    #[serde(default)]
    pub capture: CaptureFileConfig,

    /// Pose estimator thresholds
    #[serde(default)]
    pub estimator: EstimatorFileConfig,

    /// Volume signal smoothing
    #[serde(default)]
    pub filter: FilterFileConfig,

    /// Gesture thresholds and cooldown
    #[serde(default)]
    pub gesture: GestureFileConfig,

    /// Synthetic key input
    #[serde(default)]
    pub injector: InjectorFileConfig,
}

/// Capture device configuration
#[derive(Debug, Default, Deserialize)]
pub struct CaptureFileConfig {
    pub device_index: Option<u32>,
    pub width: Option<u32>,
    pub height: Option<u32>,

    /// Path to a JSON-lines landmark recording
    pub replay: Option<String>,

    /// Playback rate of the recording
    pub replay_fps: Option<f64>,

    /// Restart the recording at its end instead of disconnecting
    pub loop_replay: Option<bool>,
}

/// Pose estimator configuration
#[derive(Debug, Default, Deserialize)]
pub struct EstimatorFileConfig {
    pub min_detection_confidence: Option<f32>,
    pub min_tracking_confidence: Option<f32>,

    /// Reflect landmarks horizontally (for unflipped camera images)
    pub mirror: Option<bool>,
}

/// Smoothing filter configuration
#[derive(Debug, Default, Deserialize)]
pub struct FilterFileConfig {
    pub min_cutoff: Option<f64>,
    pub beta: Option<f64>,
}

/// Gesture classifier configuration
#[derive(Debug, Default, Deserialize)]
pub struct GestureFileConfig {
    pub pinch_threshold: Option<f32>,
    pub volume_step: Option<f64>,
    pub cooldown_secs: Option<f64>,
    pub initial_y: Option<f64>,
}

/// Key injection configuration
#[derive(Debug, Default, Deserialize)]
pub struct InjectorFileConfig {
    /// Log commands instead of injecting keys
    pub dry_run: Option<bool>,

    /// Program invoked once per key tap (e.g. "xdotool")
    pub program: Option<String>,

    pub volume_up: Option<Vec<String>>,
    pub volume_down: Option<Vec<String>>,
    pub mute: Option<Vec<String>>,
    pub play_pause: Option<Vec<String>>,
}

/// Parse config file contents
///
/// # Errors
///
/// Returns error if the content is not valid TOML for this schema
pub fn parse_config_file(content: &str) -> Result<HandcueConfigFile> {
    Ok(toml::from_str(content)?)
}

/// Load the TOML config file from `path`, or from the standard path
///
/// Returns `HandcueConfigFile::default()` if the file doesn't exist or can't be parsed.
pub fn load_config_file(path: Option<&Path>) -> HandcueConfigFile {
    let Some(path) = path.map(Path::to_path_buf).or_else(config_file_path) else {
        return HandcueConfigFile::default();
    };

    if !path.exists() {
        tracing::debug!(path = %path.display(), "no config file");
        return HandcueConfigFile::default();
    }

    match std::fs::read_to_string(&path) {
        Ok(content) => match parse_config_file(&content) {
            Ok(config) => {
                tracing::info!(path = %path.display(), "loaded config file");
                config
            }
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "failed to parse config file, using defaults"
                );
                HandcueConfigFile::default()
            }
        },
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                error = %e,
                "failed to read config file"
            );
            HandcueConfigFile::default()
        }
    }
}

/// Return the config file path: `~/.config/handcue/config.toml`
pub fn config_file_path() -> Option<PathBuf> {
    directories::BaseDirs::new().map(|d| d.config_dir().join("handcue").join("config.toml"))
}
