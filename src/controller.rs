//! Main processing loop
//!
//! Reads the freshest frame, estimates the hand, classifies a gesture, and
//! dispatches the resulting command, once per iteration. The loop never waits
//! for a new frame: it may process the same frame twice or skip frames.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::capture::FrameSource;
use crate::config::Config;
use crate::dispatch::{ActionDispatcher, KeyInjector};
use crate::gesture::{Command, GestureClassifier};
use crate::hand::PoseEstimator;
use crate::metrics::{FrameTiming, PerfTracker, RunStats};

/// Pause before re-reading when no valid frame is available
const IDLE_WAIT: Duration = Duration::from_millis(1);

/// Drives one pose estimator, classifier, and dispatcher
pub struct Controller<F, E, I> {
    estimator: E,
    classifier: GestureClassifier,
    dispatcher: ActionDispatcher<I>,
    perf: PerfTracker,
    stats: RunStats,
    last_timing: Option<FrameTiming>,
    origin: Instant,
    _frame: PhantomData<fn(&F)>,
}

impl<F, E, I> Controller<F, E, I>
where
    E: PoseEstimator<F>,
    I: KeyInjector,
{
    /// Create a controller; its clock starts now
    #[must_use]
    pub fn new(config: &Config, estimator: E, injector: I) -> Self {
        Self {
            estimator,
            classifier: GestureClassifier::new(config.gesture.clone(), config.filter, 0.0),
            dispatcher: ActionDispatcher::new(injector),
            perf: PerfTracker::default(),
            stats: RunStats::default(),
            last_timing: None,
            origin: Instant::now(),
            _frame: PhantomData,
        }
    }

    /// Seconds since the controller was created
    #[must_use]
    pub fn now(&self) -> f64 {
        self.origin.elapsed().as_secs_f64()
    }

    /// Process one frame observed at `now` seconds
    ///
    /// Estimator failures are contained to this frame.
    pub fn process_frame(&mut self, frame: &F, now: f64) -> Option<Command> {
        let started = Instant::now();

        let command = match self.estimator.estimate(frame) {
            Ok(Some(hand)) => self.classifier.classify(now, Some(&hand)),
            Ok(None) => {
                self.stats.frames_without_hand += 1;
                self.classifier.classify(now, None)
            }
            Err(e) => {
                tracing::debug!(error = %e, "frame rejected");
                self.stats.frames_rejected += 1;
                None
            }
        };

        if let Some(command) = command {
            tracing::info!(command = command.label(), t = now, "gesture");
            self.stats.record_command(command);
            self.dispatcher.dispatch(command);
        }

        let timing = self.perf.record(now, started.elapsed());
        tracing::trace!(
            latency_ms = timing.latency_ms(),
            fps = timing.fps.unwrap_or_default(),
            "frame processed"
        );
        self.last_timing = Some(timing);
        self.stats.frames_processed += 1;

        command
    }

    /// Run until `shutdown` is set or the source closes
    pub fn run(&mut self, source: &FrameSource<F>, shutdown: &AtomicBool) -> RunStats
    where
        F: Send + Sync + 'static,
    {
        tracing::debug!("processing loop started");

        while !shutdown.load(Ordering::Acquire) {
            let read = source.read();
            let Some(frame) = read.valid_frame() else {
                if source.is_closed() {
                    tracing::info!("capture source closed");
                    break;
                }
                self.stats.frames_unavailable += 1;
                std::thread::sleep(IDLE_WAIT);
                continue;
            };

            let now = self.now();
            self.process_frame(frame, now);
        }

        tracing::debug!(
            frames = self.stats.frames_processed,
            commands = self.stats.commands_emitted(),
            "processing loop stopped"
        );
        self.stats.clone()
    }

    /// Timing of the most recently processed frame, for overlays
    #[must_use]
    pub const fn last_timing(&self) -> Option<FrameTiming> {
        self.last_timing
    }

    #[must_use]
    pub const fn stats(&self) -> &RunStats {
        &self.stats
    }

    #[must_use]
    pub const fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    /// Key taps that failed to reach the OS
    #[must_use]
    pub const fn dispatch_failures(&self) -> u64 {
        self.dispatcher.failures()
    }
}
