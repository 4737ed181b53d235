//! Gesture classification and debounce
//!
//! Turns per-frame hand features into at most one [`Command`] per frame.
//!
//! A pinch is a continuous volume gesture: the index fingertip height is
//! smoothed and every move beyond a small step emits a volume command,
//! regardless of cooldown. Every other gesture is discrete and rate-limited
//! by a cooldown so one sustained pose fires once.

use std::fmt;

use crate::config::GestureConfig;
use crate::filter::{FilterParams, SignalFilter};
use crate::hand::landmarks::INDEX_TIP;
use crate::hand::{FeatureSet, Finger, HandLandmarks, extract};

/// Gesture vocabulary, as shown to the user
pub const VOCABULARY: [(&str, &str); 4] = [
    ("Open hand", "Play"),
    ("Fist", "Pause"),
    ("Peace sign", "Mute"),
    ("Pinch and move up/down", "Volume"),
];

/// Which way a play/pause gesture was meant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Playback {
    Play,
    Pause,
}

/// A classified media command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Command {
    VolumeUp,
    VolumeDown,
    PlayPause(Playback),
    Mute,
}

impl Command {
    /// Short diagnostic label for overlays and logs
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::VolumeUp => "VOL UP",
            Self::VolumeDown => "VOL DOWN",
            Self::PlayPause(Playback::Play) => "PLAY",
            Self::PlayPause(Playback::Pause) => "PAUSE",
            Self::Mute => "MUTE",
        }
    }

    /// Whether the command is subject to the discrete-gesture cooldown
    #[must_use]
    pub const fn is_discrete(self) -> bool {
        !matches!(self, Self::VolumeUp | Self::VolumeDown)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Mutable classifier state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassifierState {
    /// Smoothed height at the last emitted volume command
    pub previous_smoothed_y: f64,

    /// Time of the last discrete gesture, `None` before the first one
    pub last_gesture_at: Option<f64>,
}

/// Per-frame gesture state machine
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    config: GestureConfig,
    filter: SignalFilter,
    state: ClassifierState,
}

impl GestureClassifier {
    /// Create a classifier whose clock starts at `t0` seconds
    #[must_use]
    pub const fn new(config: GestureConfig, filter_params: FilterParams, t0: f64) -> Self {
        Self {
            filter: SignalFilter::new(t0, config.initial_y, filter_params),
            state: ClassifierState {
                previous_smoothed_y: config.initial_y,
                last_gesture_at: None,
            },
            config,
        }
    }

    /// Classify one frame observed at `now`
    ///
    /// An absent hand yields no command and leaves the state untouched.
    pub fn classify(&mut self, now: f64, hand: Option<&HandLandmarks>) -> Option<Command> {
        let hand = hand?;
        let features = extract(hand);
        self.classify_features(now, &features, hand[INDEX_TIP].y)
    }

    /// Classify precomputed features; `index_tip_y` drives volume control
    pub fn classify_features(
        &mut self,
        now: f64,
        features: &FeatureSet,
        index_tip_y: f32,
    ) -> Option<Command> {
        if features.pinch_ratio() < self.config.pinch_threshold {
            return self.volume(now, f64::from(index_tip_y));
        }

        if !self.cooldown_elapsed(now) {
            return None;
        }

        let command = discrete_command(features)?;
        self.state.last_gesture_at = Some(now);
        Some(command)
    }

    /// Continuous volume branch
    ///
    /// The anchor only moves when a command fires, so slow drift accumulates
    /// against the last emitted position.
    fn volume(&mut self, now: f64, y: f64) -> Option<Command> {
        let smoothed = self.filter.filter(now, y);
        let delta = self.state.previous_smoothed_y - smoothed;

        if delta.abs() <= self.config.volume_step {
            return None;
        }

        self.state.previous_smoothed_y = smoothed;
        // Smaller y is higher in the frame
        Some(if delta > 0.0 {
            Command::VolumeUp
        } else {
            Command::VolumeDown
        })
    }

    fn cooldown_elapsed(&self, now: f64) -> bool {
        self.state
            .last_gesture_at
            .is_none_or(|last| now - last > self.config.cooldown_secs)
    }

    #[must_use]
    pub const fn state(&self) -> ClassifierState {
        self.state
    }

    #[must_use]
    pub const fn filter(&self) -> &SignalFilter {
        &self.filter
    }

    #[must_use]
    pub const fn config(&self) -> &GestureConfig {
        &self.config
    }
}

fn discrete_command(features: &FeatureSet) -> Option<Command> {
    match features.extended_count() {
        5 => Some(Command::PlayPause(Playback::Play)),
        0 => Some(Command::PlayPause(Playback::Pause)),
        _ if features.is_extended(Finger::Index)
            && features.is_extended(Finger::Middle)
            && !features.is_extended(Finger::Ring)
            && !features.is_extended(Finger::Pinky) =>
        {
            Some(Command::Mute)
        }
        _ => None,
    }
}
