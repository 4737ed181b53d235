//! Latest-frame-wins acquisition
//!
//! A dedicated thread reads the device in a tight loop and publishes each
//! frame into a single shared slot, replacing whatever was there. Readers
//! never wait: they get the current slot contents, possibly a frame they have
//! already seen, and frames the reader was too slow for are dropped.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use crate::config::CaptureConfig;
use crate::{Error, Result};

/// A blocking frame producer (camera driver, recording, ...)
pub trait CaptureDevice: Send + 'static {
    /// Frame type handed to the pose estimator
    type Frame: Send + Sync + 'static;

    /// Open the device at the configured resolution
    ///
    /// # Errors
    ///
    /// Returns error if the device cannot be opened
    fn open(config: &CaptureConfig) -> Result<Self>
    where
        Self: Sized;

    /// Block until the next frame is available
    ///
    /// # Errors
    ///
    /// `Error::DeviceDisconnected` ends acquisition; any other error marks
    /// the current frame invalid and acquisition continues
    fn read_frame(&mut self) -> Result<Self::Frame>;

    /// Release the underlying device
    fn release(&mut self) {}
}

/// Result of a non-blocking [`FrameSource::read`]
#[derive(Debug)]
pub struct FrameRead<F> {
    /// Whether `frame` is current and usable
    pub valid: bool,

    /// Last published frame, kept after failures
    pub frame: Option<Arc<F>>,

    /// Number of frames published so far
    pub sequence: u64,
}

impl<F> FrameRead<F> {
    /// The frame, if it is valid
    #[must_use]
    pub fn valid_frame(&self) -> Option<&Arc<F>> {
        self.frame.as_ref().filter(|_| self.valid)
    }
}

struct Slot<F> {
    frame: Option<Arc<F>>,
    valid: bool,
    sequence: u64,
    closed: bool,
}

/// Owns the acquisition thread and the shared frame slot
pub struct FrameSource<F> {
    slot: Arc<Mutex<Slot<F>>>,
    stopped: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl<F: Send + Sync + 'static> FrameSource<F> {
    /// Open device `D` and start acquiring frames
    ///
    /// # Errors
    ///
    /// Returns `Error::DeviceUnavailable` if the device cannot be opened
    pub fn start<D>(config: &CaptureConfig) -> Result<Self>
    where
        D: CaptureDevice<Frame = F>,
    {
        let device = D::open(config).map_err(|e| match e {
            Error::DeviceUnavailable(_) => e,
            other => Error::DeviceUnavailable(other.to_string()),
        })?;

        tracing::debug!(
            device_index = config.device_index,
            width = config.width,
            height = config.height,
            "capture device opened"
        );

        Ok(Self::spawn(device))
    }

    /// Start acquiring from an already opened device
    #[must_use]
    pub fn spawn<D>(device: D) -> Self
    where
        D: CaptureDevice<Frame = F>,
    {
        let slot = Arc::new(Mutex::new(Slot {
            frame: None,
            valid: false,
            sequence: 0,
            closed: false,
        }));
        let stopped = Arc::new(AtomicBool::new(false));

        let worker = {
            let slot = Arc::clone(&slot);
            let stopped = Arc::clone(&stopped);
            thread::spawn(move || acquire(device, &slot, &stopped))
        };

        Self {
            slot,
            stopped,
            worker: Some(worker),
        }
    }

    /// Current slot contents; never blocks on the device
    #[must_use]
    pub fn read(&self) -> FrameRead<F> {
        self.slot
            .lock()
            .map(|slot| FrameRead {
                valid: slot.valid,
                frame: slot.frame.clone(),
                sequence: slot.sequence,
            })
            .unwrap_or(FrameRead {
                valid: false,
                frame: None,
                sequence: 0,
            })
    }

    /// Whether acquisition has ended (device gone or source stopped)
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.stopped.load(Ordering::Acquire) || self.slot.lock().map_or(true, |slot| slot.closed)
    }

    /// Stop acquisition and release the device
    ///
    /// The acquisition thread finishes its current read first.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        self.stopped.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                tracing::error!("capture thread panicked");
            }
            tracing::debug!("capture stopped");
        }
    }
}

impl<F> Drop for FrameSource<F> {
    fn drop(&mut self) {
        self.stopped.store(true, Ordering::Release);
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn acquire<D: CaptureDevice>(mut device: D, slot: &Mutex<Slot<D::Frame>>, stopped: &AtomicBool) {
    tracing::debug!("capture started");

    while !stopped.load(Ordering::Acquire) {
        match device.read_frame() {
            Ok(frame) => {
                // Built outside the lock so the slot only ever holds whole frames
                let frame = Arc::new(frame);
                if let Ok(mut slot) = slot.lock() {
                    slot.frame = Some(frame);
                    slot.valid = true;
                    slot.sequence += 1;
                }
            }
            Err(Error::DeviceDisconnected(reason)) => {
                tracing::warn!(%reason, "capture device disconnected");
                if let Ok(mut slot) = slot.lock() {
                    slot.valid = false;
                    slot.closed = true;
                }
                break;
            }
            Err(e) => {
                tracing::debug!(error = %e, "frame read failed");
                if let Ok(mut slot) = slot.lock() {
                    slot.valid = false;
                }
                thread::yield_now();
            }
        }
    }

    device.release();
    if let Ok(mut slot) = slot.lock() {
        slot.closed = true;
    }
}
