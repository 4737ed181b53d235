//! Shared test utilities

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use handcue::hand::landmarks::{
    INDEX_MCP, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP, RING_PIP,
    RING_TIP, THUMB_IP, THUMB_TIP, WRIST,
};
use handcue::hand::LANDMARK_COUNT;
use handcue::{Error, HandLandmarks, KeyInjector, Landmark, MediaKey, RecordedFrame, Result};

pub const OPEN: [bool; 5] = [true; 5];
pub const FIST: [bool; 5] = [false; 5];
pub const PEACE: [bool; 5] = [false, true, true, false, false];

const FINGERS: [(usize, usize, f32); 4] = [
    (INDEX_TIP, INDEX_PIP, 0.55),
    (MIDDLE_TIP, MIDDLE_PIP, 0.60),
    (RING_TIP, RING_PIP, 0.65),
    (PINKY_TIP, PINKY_PIP, 0.70),
];

fn base_points() -> [Landmark; LANDMARK_COUNT] {
    let mut points = [Landmark::new(0.5, 0.5); LANDMARK_COUNT];
    points[WRIST] = Landmark::new(0.5, 0.9);
    points[INDEX_MCP] = Landmark::new(0.45, 0.6);
    points[THUMB_IP] = Landmark::new(0.4, 0.75);
    points
}

/// An upright hand with the given fingers (thumb..pinky) extended, not pinching
#[must_use]
pub fn hand(fingers: [bool; 5]) -> HandLandmarks {
    let mut points = base_points();
    points[THUMB_TIP] = Landmark::new(if fingers[0] { 0.35 } else { 0.45 }, 0.75);
    for (i, &(tip, joint, x)) in FINGERS.iter().enumerate() {
        points[joint] = Landmark::new(x, 0.5);
        points[tip] = Landmark::new(x, if fingers[i + 1] { 0.3 } else { 0.6 });
    }
    HandLandmarks::new(points).expect("valid hand")
}

/// A pinching hand with the index fingertip at height `y`
///
/// Every finger, thumb included, passes its extension test, so only the
/// pinch keeps this from reading as an open hand.
#[must_use]
pub fn pinching_hand(y: f32) -> HandLandmarks {
    let mut points = base_points();
    for &(tip, joint, x) in &FINGERS {
        points[joint] = Landmark::new(x, 0.5);
        points[tip] = Landmark::new(x, 0.3);
    }
    points[INDEX_TIP] = Landmark::new(0.37, y);
    points[INDEX_PIP] = Landmark::new(0.37, y + 0.2);
    points[THUMB_TIP] = Landmark::new(0.36, y + 0.01);
    HandLandmarks::new(points).expect("valid hand")
}

/// A recorded frame holding `hand`
#[must_use]
pub fn recorded(hand: &HandLandmarks) -> RecordedFrame {
    RecordedFrame {
        landmarks: Some(hand.points().iter().map(|p| [p.x, p.y]).collect()),
        score: 0.95,
    }
}

/// A recorded frame with no hand in view
#[must_use]
pub fn recorded_empty() -> RecordedFrame {
    RecordedFrame {
        landmarks: None,
        score: 0.0,
    }
}

/// Injector that remembers every tap
#[derive(Clone, Default)]
pub struct RecordingInjector {
    keys: Arc<Mutex<Vec<MediaKey>>>,
}

impl RecordingInjector {
    #[must_use]
    pub fn keys(&self) -> Vec<MediaKey> {
        self.keys.lock().expect("lock").clone()
    }
}

impl KeyInjector for RecordingInjector {
    fn tap(&mut self, key: MediaKey) -> Result<()> {
        self.keys.lock().expect("lock").push(key);
        Ok(())
    }
}

/// Injector the OS always refuses
#[derive(Default)]
pub struct DenyingInjector;

impl KeyInjector for DenyingInjector {
    fn tap(&mut self, _key: MediaKey) -> Result<()> {
        Err(Error::Dispatch("synthetic input not permitted".to_string()))
    }
}
