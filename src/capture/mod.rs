//! Frame acquisition
//!
//! Decouples capture-device latency from processing latency.

mod replay;
mod source;

pub use replay::{RecordedFrame, ReplayDevice, parse_recording};
pub use source::{CaptureDevice, FrameRead, FrameSource};
