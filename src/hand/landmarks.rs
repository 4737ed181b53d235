//! Hand landmark data model
//!
//! Positions are normalized to the frame (`x`, `y` in `[0, 1]`, `y` grows
//! downward) and follow the estimator's fixed 21-point topology.

use std::ops::Index;

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Number of landmarks in one hand
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// A single normalized 2D keypoint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Landmark {
    pub x: f32,
    pub y: f32,
}

impl Landmark {
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another landmark
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Reflect across the vertical center line of the frame
    #[must_use]
    pub fn mirrored(self) -> Self {
        Self::new(1.0 - self.x, self.y)
    }

    const fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// The 21 landmarks of one detected hand
#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarks([Landmark; LANDMARK_COUNT]);

impl HandLandmarks {
    /// Wrap a full landmark set
    ///
    /// # Errors
    ///
    /// Returns error if any coordinate is NaN or infinite, or if the wrist
    /// and index knuckle coincide (no usable hand scale)
    pub fn new(points: [Landmark; LANDMARK_COUNT]) -> Result<Self> {
        if let Some(i) = points.iter().position(|p| !p.is_finite()) {
            return Err(Error::InvalidLandmarks(format!(
                "landmark {i} has a non-finite coordinate"
            )));
        }

        let hand = Self(points);
        let scale = hand.scale();
        if !scale.is_finite() || scale <= f32::EPSILON {
            return Err(Error::InvalidLandmarks(format!(
                "degenerate hand scale {scale}"
            )));
        }
        Ok(hand)
    }

    /// Build from a slice, checking the point count
    ///
    /// # Errors
    ///
    /// Returns error if the slice does not hold exactly 21 finite points
    pub fn from_points(points: &[Landmark]) -> Result<Self> {
        let points: [Landmark; LANDMARK_COUNT] = points.try_into().map_err(|_| {
            Error::InvalidLandmarks(format!(
                "expected {LANDMARK_COUNT} landmarks, got {}",
                points.len()
            ))
        })?;
        Self::new(points)
    }

    #[must_use]
    pub const fn points(&self) -> &[Landmark; LANDMARK_COUNT] {
        &self.0
    }

    /// Wrist to index knuckle distance, always positive
    #[must_use]
    pub fn scale(&self) -> f32 {
        self[WRIST].distance(self[INDEX_MCP])
    }

    /// Every landmark reflected horizontally
    #[must_use]
    pub fn mirrored(&self) -> Self {
        Self(self.0.map(Landmark::mirrored))
    }
}

impl Index<usize> for HandLandmarks {
    type Output = Landmark;

    fn index(&self, index: usize) -> &Landmark {
        &self.0[index]
    }
}
