//! handcue - touchless media controller driven by hand gestures
//!
//! This library turns a live sequence of hand-pose observations into media
//! key taps:
//! - Non-blocking frame acquisition (latest frame wins)
//! - Finger extension and pinch features from 21-point hand landmarks
//! - Gesture classification with a discrete-gesture cooldown
//! - Adaptive smoothing of the continuous volume signal
//! - Best-effort key injection
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐   latest    ┌──────────────┐   landmarks   ┌──────────────┐
//! │ FrameSource  │────frame───▶│ PoseEstimator│──────────────▶│   Feature    │
//! │ (own thread) │             │  (external)  │               │  extraction  │
//! └──────────────┘             └──────────────┘               └──────┬───────┘
//!                                                                    │
//!                        ┌──────────────┐   Command   ┌──────────────▼───────┐
//!                        │  Dispatcher  │◀────────────│ GestureClassifier    │
//!                        │ (key taps)   │             │  + SignalFilter      │
//!                        └──────────────┘             └──────────────────────┘
//! ```

pub mod capture;
pub mod config;
pub mod controller;
pub mod dispatch;
pub mod error;
pub mod filter;
pub mod gesture;
pub mod hand;
pub mod metrics;

pub use capture::{CaptureDevice, FrameRead, FrameSource, RecordedFrame, ReplayDevice};
pub use config::Config;
pub use controller::Controller;
pub use dispatch::{ActionDispatcher, CommandInjector, KeyInjector, LogInjector, MediaKey};
pub use error::{Error, Result};
pub use filter::{FilterParams, FilterState, SignalFilter};
pub use gesture::{ClassifierState, Command, GestureClassifier, Playback};
pub use hand::{
    FeatureSet, Finger, HandLandmarks, Landmark, MirroredEstimator, PoseEstimator,
    RecordedPoseEstimator,
};
pub use metrics::{FrameTiming, RunStats};
