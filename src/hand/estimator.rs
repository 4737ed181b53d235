//! Pose estimator boundary
//!
//! The estimator turns one captured frame into zero or one hand. Real
//! estimators (neural hand trackers) live outside this crate; the recorded
//! estimator replays landmarks captured earlier.

use crate::Result;
use crate::capture::RecordedFrame;
use crate::config::EstimatorConfig;

use super::landmarks::{HandLandmarks, Landmark};

/// Produces hand landmarks from frames of type `F`
pub trait PoseEstimator<F: ?Sized> {
    /// Estimate the hand in `frame`
    ///
    /// `Ok(None)` means no hand was detected, which is not an error.
    ///
    /// # Errors
    ///
    /// Returns error if estimation fails or yields an unusable landmark set
    fn estimate(&mut self, frame: &F) -> Result<Option<HandLandmarks>>;
}

impl<F: ?Sized, E: PoseEstimator<F> + ?Sized> PoseEstimator<F> for Box<E> {
    fn estimate(&mut self, frame: &F) -> Result<Option<HandLandmarks>> {
        (**self).estimate(frame)
    }
}

/// Reflects landmarks horizontally for estimators fed unflipped images
///
/// The thumb heuristic expects a mirrored view of the user.
pub struct MirroredEstimator<E> {
    inner: E,
}

impl<E> MirroredEstimator<E> {
    #[must_use]
    pub const fn new(inner: E) -> Self {
        Self { inner }
    }
}

impl<F: ?Sized, E: PoseEstimator<F>> PoseEstimator<F> for MirroredEstimator<E> {
    fn estimate(&mut self, frame: &F) -> Result<Option<HandLandmarks>> {
        Ok(self.inner.estimate(frame)?.map(|hand| hand.mirrored()))
    }
}

/// Passes recorded landmarks through, applying confidence thresholds
///
/// A hand must clear `min_detection_confidence` to be picked up; once
/// tracked it only has to clear `min_tracking_confidence` on later frames.
#[derive(Debug, Clone)]
pub struct RecordedPoseEstimator {
    min_detection_confidence: f32,
    min_tracking_confidence: f32,
    tracking: bool,
}

impl RecordedPoseEstimator {
    #[must_use]
    pub const fn new(config: &EstimatorConfig) -> Self {
        Self {
            min_detection_confidence: config.min_detection_confidence,
            min_tracking_confidence: config.min_tracking_confidence,
            tracking: false,
        }
    }

    /// Whether a hand was accepted on the previous frame
    #[must_use]
    pub const fn is_tracking(&self) -> bool {
        self.tracking
    }
}

impl PoseEstimator<RecordedFrame> for RecordedPoseEstimator {
    fn estimate(&mut self, frame: &RecordedFrame) -> Result<Option<HandLandmarks>> {
        let threshold = if self.tracking {
            self.min_tracking_confidence
        } else {
            self.min_detection_confidence
        };

        let Some(points) = frame.landmarks.as_deref() else {
            self.tracking = false;
            return Ok(None);
        };

        if frame.score < threshold {
            tracing::trace!(score = frame.score, threshold, "hand below confidence");
            self.tracking = false;
            return Ok(None);
        }

        let points: Vec<Landmark> = points.iter().map(|&[x, y]| Landmark::new(x, y)).collect();
        match HandLandmarks::from_points(&points) {
            Ok(hand) => {
                self.tracking = true;
                Ok(Some(hand))
            }
            Err(e) => {
                self.tracking = false;
                Err(e)
            }
        }
    }
}
