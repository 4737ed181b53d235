//! Hand landmarks, feature extraction, and the pose estimator boundary

mod estimator;
pub mod features;
pub mod landmarks;

pub use estimator::{MirroredEstimator, PoseEstimator, RecordedPoseEstimator};
pub use features::{FeatureSet, Finger, extract};
pub use landmarks::{HandLandmarks, LANDMARK_COUNT, Landmark};
