//! Per-frame timing and run statistics

use std::time::Duration;

use crate::gesture::{Command, Playback};

/// Timing of one processed frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTiming {
    /// Estimation, classification, and dispatch time
    pub processing: Duration,

    /// Instantaneous rate from the previous processed frame
    pub fps: Option<f64>,
}

impl FrameTiming {
    #[must_use]
    pub fn latency_ms(&self) -> f64 {
        self.processing.as_secs_f64() * 1000.0
    }
}

/// Derives frame rate from consecutive frame timestamps
#[derive(Debug, Default)]
pub struct PerfTracker {
    last_frame_at: Option<f64>,
}

impl PerfTracker {
    /// Record a frame processed at `now` seconds
    pub fn record(&mut self, now: f64, processing: Duration) -> FrameTiming {
        let fps = self
            .last_frame_at
            .map(|prev| 1.0 / (now - prev))
            .filter(|fps| fps.is_finite() && *fps > 0.0);
        self.last_frame_at = Some(now);
        FrameTiming { processing, fps }
    }
}

/// Counters for one controller run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RunStats {
    pub frames_processed: u64,
    pub frames_unavailable: u64,
    pub frames_without_hand: u64,
    pub frames_rejected: u64,
    pub volume_up: u64,
    pub volume_down: u64,
    pub play: u64,
    pub pause: u64,
    pub mute: u64,
}

impl RunStats {
    pub const fn record_command(&mut self, command: Command) {
        match command {
            Command::VolumeUp => self.volume_up += 1,
            Command::VolumeDown => self.volume_down += 1,
            Command::PlayPause(Playback::Play) => self.play += 1,
            Command::PlayPause(Playback::Pause) => self.pause += 1,
            Command::Mute => self.mute += 1,
        }
    }

    #[must_use]
    pub const fn commands_emitted(&self) -> u64 {
        self.volume_up + self.volume_down + self.play + self.pause + self.mute
    }
}
