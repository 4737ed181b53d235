//! Configuration management for handcue
//!
//! Precedence: CLI flags > environment > config file > defaults. CLI flags
//! are applied by the binary after [`Config::load`].

pub mod file;

use std::path::{Path, PathBuf};

use crate::dispatch::MediaKey;
use crate::filter::FilterParams;
use crate::{Error, Result};

use self::file::HandcueConfigFile;

/// handcue configuration
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Capture device
    pub capture: CaptureConfig,

    /// Pose estimator thresholds
    pub estimator: EstimatorConfig,

    /// Volume signal smoothing
    pub filter: FilterParams,

    /// Gesture thresholds and cooldown
    pub gesture: GestureConfig,

    /// Key injection
    pub injector: InjectorConfig,
}

/// Capture device configuration
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Camera index
    pub device_index: u32,

    /// Requested frame width in pixels
    pub width: u32,

    /// Requested frame height in pixels
    pub height: u32,

    /// Landmark recording to replay instead of a live camera
    pub replay: Option<PathBuf>,

    /// Recording playback rate
    pub replay_fps: f64,

    /// Restart the recording when it ends
    pub loop_replay: bool,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            device_index: 0,
            width: 640,
            height: 480,
            replay: None,
            replay_fps: 30.0,
            loop_replay: false,
        }
    }
}

/// Pose estimator configuration
#[derive(Debug, Clone)]
pub struct EstimatorConfig {
    /// Score a hand needs to be picked up
    pub min_detection_confidence: f32,

    /// Score a tracked hand needs to stay tracked
    pub min_tracking_confidence: f32,

    /// Reflect landmarks horizontally
    pub mirror: bool,
}

impl Default for EstimatorConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.5,
            min_tracking_confidence: 0.5,
            mirror: false,
        }
    }
}

/// Gesture classifier configuration
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Pinch ratio below which the hand controls volume
    pub pinch_threshold: f32,

    /// Smoothed height change that emits a volume command
    pub volume_step: f64,

    /// Minimum interval between discrete gestures
    pub cooldown_secs: f64,

    /// Seed for the volume filter and anchor
    pub initial_y: f64,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            pinch_threshold: 0.4,
            volume_step: 0.015,
            cooldown_secs: 1.0,
            initial_y: 0.5,
        }
    }
}

/// Key injection configuration
#[derive(Debug, Clone)]
pub struct InjectorConfig {
    /// Log commands instead of injecting keys
    pub dry_run: bool,

    /// Program run once per key tap
    pub program: String,

    pub volume_up: Vec<String>,
    pub volume_down: Vec<String>,
    pub mute: Vec<String>,
    pub play_pause: Vec<String>,
}

impl Default for InjectorConfig {
    fn default() -> Self {
        let key = |name: &str| vec!["key".to_string(), name.to_string()];
        Self {
            dry_run: false,
            program: "xdotool".to_string(),
            volume_up: key("XF86AudioRaiseVolume"),
            volume_down: key("XF86AudioLowerVolume"),
            mute: key("XF86AudioMute"),
            play_pause: key("XF86AudioPlay"),
        }
    }
}

impl InjectorConfig {
    /// Program arguments that tap `key`
    #[must_use]
    pub fn args_for(&self, key: MediaKey) -> &[String] {
        match key {
            MediaKey::VolumeUp => &self.volume_up,
            MediaKey::VolumeDown => &self.volume_down,
            MediaKey::Mute => &self.mute,
            MediaKey::PlayPause => &self.play_pause,
        }
    }
}

impl Config {
    /// Load configuration from the config file and environment
    ///
    /// # Errors
    ///
    /// Returns error if the resulting configuration is invalid
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let fc = file::load_config_file(path);
        let config = Self::from_sources(fc, |name| std::env::var(name).ok());
        config.validate()?;
        Ok(config)
    }

    /// Merge a parsed config file and an environment lookup over defaults
    #[must_use]
    pub fn from_sources(fc: HandcueConfigFile, env: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let capture = CaptureConfig {
            device_index: fc
                .capture
                .device_index
                .unwrap_or(defaults.capture.device_index),
            width: fc.capture.width.unwrap_or(defaults.capture.width),
            height: fc.capture.height.unwrap_or(defaults.capture.height),
            replay: env("HANDCUE_REPLAY")
                .or(fc.capture.replay)
                .map(PathBuf::from),
            replay_fps: fc.capture.replay_fps.unwrap_or(defaults.capture.replay_fps),
            loop_replay: fc
                .capture
                .loop_replay
                .unwrap_or(defaults.capture.loop_replay),
        };

        let estimator = EstimatorConfig {
            min_detection_confidence: fc
                .estimator
                .min_detection_confidence
                .unwrap_or(defaults.estimator.min_detection_confidence),
            min_tracking_confidence: fc
                .estimator
                .min_tracking_confidence
                .unwrap_or(defaults.estimator.min_tracking_confidence),
            mirror: fc.estimator.mirror.unwrap_or(defaults.estimator.mirror),
        };

        let filter = FilterParams {
            min_cutoff: fc.filter.min_cutoff.unwrap_or(defaults.filter.min_cutoff),
            beta: fc.filter.beta.unwrap_or(defaults.filter.beta),
        };

        let gesture = GestureConfig {
            pinch_threshold: fc
                .gesture
                .pinch_threshold
                .unwrap_or(defaults.gesture.pinch_threshold),
            volume_step: fc
                .gesture
                .volume_step
                .unwrap_or(defaults.gesture.volume_step),
            cooldown_secs: env("HANDCUE_COOLDOWN")
                .and_then(|s| s.parse().ok())
                .or(fc.gesture.cooldown_secs)
                .unwrap_or(defaults.gesture.cooldown_secs),
            initial_y: fc.gesture.initial_y.unwrap_or(defaults.gesture.initial_y),
        };

        let injector_defaults = defaults.injector;
        let injector = InjectorConfig {
            dry_run: env("HANDCUE_DRY_RUN")
                .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
                .or(fc.injector.dry_run)
                .unwrap_or(injector_defaults.dry_run),
            program: env("HANDCUE_INJECTOR")
                .or(fc.injector.program)
                .unwrap_or(injector_defaults.program),
            volume_up: fc
                .injector
                .volume_up
                .unwrap_or(injector_defaults.volume_up),
            volume_down: fc
                .injector
                .volume_down
                .unwrap_or(injector_defaults.volume_down),
            mute: fc.injector.mute.unwrap_or(injector_defaults.mute),
            play_pause: fc
                .injector
                .play_pause
                .unwrap_or(injector_defaults.play_pause),
        };

        Self {
            capture,
            estimator,
            filter,
            gesture,
            injector,
        }
    }

    /// Check value ranges
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending field
    pub fn validate(&self) -> Result<()> {
        let invalid = |field: &str, value: &dyn std::fmt::Display| {
            Err(Error::Config(format!("{field} out of range: {value}")))
        };

        if self.capture.width == 0 {
            return invalid("capture.width", &self.capture.width);
        }
        if self.capture.height == 0 {
            return invalid("capture.height", &self.capture.height);
        }
        if !is_positive(self.capture.replay_fps) {
            return invalid("capture.replay_fps", &self.capture.replay_fps);
        }
        if !is_positive(self.gesture.cooldown_secs) {
            return invalid("gesture.cooldown_secs", &self.gesture.cooldown_secs);
        }
        if !is_positive(f64::from(self.gesture.pinch_threshold)) {
            return invalid("gesture.pinch_threshold", &self.gesture.pinch_threshold);
        }
        if !is_positive(self.gesture.volume_step) {
            return invalid("gesture.volume_step", &self.gesture.volume_step);
        }
        if !(self.filter.min_cutoff.is_finite() && self.filter.min_cutoff >= 0.0) {
            return invalid("filter.min_cutoff", &self.filter.min_cutoff);
        }
        if !(self.filter.beta.is_finite() && self.filter.beta >= 0.0) {
            return invalid("filter.beta", &self.filter.beta);
        }
        if self.injector.program.trim().is_empty() {
            return Err(Error::Config("injector.program is empty".to_string()));
        }
        Ok(())
    }
}

fn is_positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}
