//! Per-frame geometric features of a hand

use super::landmarks::{
    HandLandmarks, INDEX_PIP, INDEX_TIP, MIDDLE_PIP, MIDDLE_TIP, PINKY_PIP, PINKY_TIP,
    RING_PIP, RING_TIP, THUMB_IP, THUMB_TIP,
};

/// Finger, in landmark order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Finger {
    Thumb,
    Index,
    Middle,
    Ring,
    Pinky,
}

/// (tip, proximal joint) pairs for the four non-thumb fingers
const FINGER_JOINTS: [(usize, usize); 4] = [
    (INDEX_TIP, INDEX_PIP),
    (MIDDLE_TIP, MIDDLE_PIP),
    (RING_TIP, RING_PIP),
    (PINKY_TIP, PINKY_PIP),
];

/// Features derived from one frame's landmarks
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureSet {
    finger_extended: [bool; 5],
    pinch_ratio: f32,
}

impl FeatureSet {
    /// Build from precomputed flags (thumb..pinky) and pinch ratio
    #[must_use]
    pub const fn new(finger_extended: [bool; 5], pinch_ratio: f32) -> Self {
        Self {
            finger_extended,
            pinch_ratio,
        }
    }

    /// Extension flags, thumb first
    #[must_use]
    pub const fn finger_extended(&self) -> [bool; 5] {
        self.finger_extended
    }

    #[must_use]
    pub const fn is_extended(&self, finger: Finger) -> bool {
        self.finger_extended[finger as usize]
    }

    /// Number of extended fingers, `0..=5`
    #[must_use]
    pub fn extended_count(&self) -> usize {
        self.finger_extended.iter().filter(|&&e| e).count()
    }

    /// Thumb-to-index distance over wrist-to-index-base distance
    #[must_use]
    pub const fn pinch_ratio(&self) -> f32 {
        self.pinch_ratio
    }
}

/// Compute extension flags and pinch ratio for one hand
///
/// Fingers count as extended when the tip sits above its proximal joint. The
/// thumb compares horizontal positions instead and assumes a mirrored image
/// of an upright, camera-facing hand; rotated hands are not corrected for.
#[must_use]
pub fn extract(hand: &HandLandmarks) -> FeatureSet {
    let mut finger_extended = [false; 5];
    finger_extended[Finger::Thumb as usize] = hand[THUMB_TIP].x < hand[THUMB_IP].x;
    for (slot, &(tip, joint)) in finger_extended[1..].iter_mut().zip(&FINGER_JOINTS) {
        *slot = hand[tip].y < hand[joint].y;
    }

    let pinch_dist = hand[THUMB_TIP].distance(hand[INDEX_TIP]);

    FeatureSet {
        finger_extended,
        pinch_ratio: pinch_dist / hand.scale(),
    }
}
