//! Landmark recording playback
//!
//! Recordings are JSON lines, one frame per line:
//!
//! ```text
//! {"landmarks": [[0.51, 0.88], [0.46, 0.81], ...], "score": 0.97}
//! {"landmarks": null}
//! ```
//!
//! Frames are paced at a fixed rate so reads block like a camera would.

use std::path::Path;
use std::thread;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::source::CaptureDevice;
use crate::config::CaptureConfig;
use crate::{Error, Result};

/// One recorded frame: the estimator output captured at recording time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordedFrame {
    /// Normalized `[x, y]` positions, `None` when no hand was in view
    #[serde(default)]
    pub landmarks: Option<Vec<[f32; 2]>>,

    /// Detection confidence
    #[serde(default = "full_confidence")]
    pub score: f32,
}

const fn full_confidence() -> f32 {
    1.0
}

/// Capture device backed by a landmark recording
#[derive(Debug)]
pub struct ReplayDevice {
    frames: Vec<RecordedFrame>,
    cursor: usize,
    interval: Duration,
    loop_playback: bool,
    next_due: Option<Instant>,
}

impl ReplayDevice {
    /// Play `frames` at `fps`
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if `fps` is not a positive finite rate
    pub fn new(frames: Vec<RecordedFrame>, fps: f64, loop_playback: bool) -> Result<Self> {
        let interval = Duration::try_from_secs_f64(1.0 / fps)
            .ok()
            .filter(|_| fps.is_finite() && fps > 0.0)
            .ok_or_else(|| Error::Config(format!("invalid replay rate {fps}")))?;

        Ok(Self {
            frames,
            cursor: 0,
            interval,
            loop_playback,
            next_due: None,
        })
    }

    /// Read a recording from disk
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or a line is not a frame
    pub fn load(path: &Path) -> Result<Vec<RecordedFrame>> {
        let content = std::fs::read_to_string(path)?;
        parse_recording(&content)
    }

    /// Frames in the recording
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    fn pace(&mut self) {
        let now = Instant::now();
        if let Some(due) = self.next_due
            && due > now
        {
            thread::sleep(due - now);
        }
        let base = self.next_due.map_or(now, |due| due.max(now));
        self.next_due = Some(base + self.interval);
    }
}

/// Parse JSON-lines recording content, skipping blank lines
///
/// # Errors
///
/// Returns `Error::Serialization` for the first malformed line
pub fn parse_recording(content: &str) -> Result<Vec<RecordedFrame>> {
    content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| {
                tracing::debug!(line = i + 1, error = %e, "malformed recording line");
                Error::Serialization(e)
            })
        })
        .collect()
}

impl CaptureDevice for ReplayDevice {
    type Frame = RecordedFrame;

    fn open(config: &CaptureConfig) -> Result<Self> {
        let path = config.replay.as_deref().ok_or_else(|| {
            Error::DeviceUnavailable(format!(
                "no camera backend for device {}; provide a landmark recording",
                config.device_index
            ))
        })?;

        let frames = Self::load(path)
            .map_err(|e| Error::DeviceUnavailable(format!("{}: {e}", path.display())))?;
        if frames.is_empty() {
            return Err(Error::DeviceUnavailable(format!(
                "{}: recording is empty",
                path.display()
            )));
        }

        tracing::info!(
            path = %path.display(),
            frames = frames.len(),
            fps = config.replay_fps,
            "replaying landmark recording"
        );

        Self::new(frames, config.replay_fps, config.loop_replay)
    }

    fn read_frame(&mut self) -> Result<RecordedFrame> {
        if self.cursor >= self.frames.len() {
            if !self.loop_playback || self.frames.is_empty() {
                return Err(Error::DeviceDisconnected("end of recording".to_string()));
            }
            self.cursor = 0;
        }

        self.pace();
        let frame = self.frames[self.cursor].clone();
        self.cursor += 1;
        Ok(frame)
    }

    fn release(&mut self) {
        tracing::debug!(played = self.cursor, "replay released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_recording() {
        let frames = parse_recording(
            "{\"landmarks\": [[0.1, 0.2]], \"score\": 0.4}\n\n{\"landmarks\": null}\n{}\n",
        )
        .unwrap();

        assert_eq!(frames.len(), 3);
        assert_eq!(frames[0].landmarks, Some(vec![[0.1, 0.2]]));
        assert!((frames[0].score - 0.4).abs() < f32::EPSILON);
        assert_eq!(frames[1].landmarks, None);
        assert!((frames[2].score - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            parse_recording("{\"landmarks\": 3}"),
            Err(Error::Serialization(_))
        ));
    }

    #[test]
    fn test_end_of_recording_disconnects() {
        let frame = RecordedFrame {
            landmarks: None,
            score: 1.0,
        };
        let mut device = ReplayDevice::new(vec![frame.clone(), frame], 1000.0, false).unwrap();

        assert!(device.read_frame().is_ok());
        assert!(device.read_frame().is_ok());
        assert!(matches!(
            device.read_frame(),
            Err(Error::DeviceDisconnected(_))
        ));
    }

    #[test]
    fn test_loop_playback() {
        let frames = vec![
            RecordedFrame {
                landmarks: None,
                score: 0.1,
            },
            RecordedFrame {
                landmarks: None,
                score: 0.2,
            },
        ];
        let mut device = ReplayDevice::new(frames, 1000.0, true).unwrap();

        let scores: Vec<f32> = (0..5).map(|_| device.read_frame().unwrap().score).collect();
        assert_eq!(scores, vec![0.1, 0.2, 0.1, 0.2, 0.1]);
    }

    #[test]
    fn test_reads_are_paced() {
        let frame = RecordedFrame {
            landmarks: None,
            score: 1.0,
        };
        let mut device = ReplayDevice::new(vec![frame; 4], 100.0, false).unwrap();

        let started = Instant::now();
        for _ in 0..4 {
            device.read_frame().unwrap();
        }
        // First read is immediate, the next three wait ~10ms each
        assert!(started.elapsed() >= Duration::from_millis(25));
    }

    #[test]
    fn test_rejects_invalid_rate() {
        for fps in [0.0, -30.0, f64::NAN, f64::INFINITY, 1e-320] {
            assert!(
                matches!(ReplayDevice::new(Vec::new(), fps, false), Err(Error::Config(_))),
                "fps {fps}"
            );
        }
    }

    #[test]
    fn test_open_without_recording() {
        let config = CaptureConfig::default();
        assert!(matches!(
            ReplayDevice::open(&config),
            Err(Error::DeviceUnavailable(_))
        ));
    }
}
