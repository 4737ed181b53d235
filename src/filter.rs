//! Adaptive low-pass filter for one scalar time series
//!
//! Exponential smoothing whose cutoff frequency follows the signal's rate of
//! change: a resting hand gets a low cutoff (strong jitter rejection), a
//! moving hand gets a high cutoff (little lag).

use std::f64::consts::PI;

/// Default minimum cutoff frequency in Hz
pub const DEFAULT_MIN_CUTOFF: f64 = 1.0;

/// Default speed coefficient
pub const DEFAULT_BETA: f64 = 0.01;

/// Tuning parameters for [`SignalFilter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterParams {
    /// Cutoff frequency (Hz) used when the signal is stationary
    pub min_cutoff: f64,

    /// How strongly the cutoff rises with the signal's speed
    pub beta: f64,
}

impl Default for FilterParams {
    fn default() -> Self {
        Self {
            min_cutoff: DEFAULT_MIN_CUTOFF,
            beta: DEFAULT_BETA,
        }
    }
}

/// Mutable state of a [`SignalFilter`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FilterState {
    /// Last filtered output
    pub last_value: f64,

    /// Raw derivative computed on the last accepted sample
    ///
    /// Kept for inspection only; it does not feed back into the output.
    pub last_derivative: f64,

    /// Timestamp (seconds) of the last accepted sample
    pub last_timestamp: f64,
}

/// Adaptive exponential smoothing filter
#[derive(Debug, Clone)]
pub struct SignalFilter {
    params: FilterParams,
    state: FilterState,
}

impl SignalFilter {
    /// Create a filter seeded with an initial timestamp and value
    #[must_use]
    pub const fn new(t0: f64, x0: f64, params: FilterParams) -> Self {
        Self {
            params,
            state: FilterState {
                last_value: x0,
                last_derivative: 0.0,
                last_timestamp: t0,
            },
        }
    }

    /// Filter one sample taken at time `t` (seconds, monotonic)
    ///
    /// A sample whose timestamp does not advance past the last accepted one
    /// leaves the state untouched and returns the previous output.
    #[allow(clippy::suboptimal_flops)]
    pub fn filter(&mut self, t: f64, x: f64) -> f64 {
        let dt = t - self.state.last_timestamp;
        if dt <= 0.0 {
            return self.state.last_value;
        }

        let dx = (x - self.state.last_value) / dt;
        let cutoff = self.params.min_cutoff + self.params.beta * dx.abs();
        let a = smoothing_factor(dt, cutoff);

        let x_hat = a * x + (1.0 - a) * self.state.last_value;

        self.state = FilterState {
            last_value: x_hat,
            last_derivative: dx,
            last_timestamp: t,
        };

        x_hat
    }

    /// Current filter state
    #[must_use]
    pub const fn state(&self) -> FilterState {
        self.state
    }

    /// Tuning parameters
    #[must_use]
    pub const fn params(&self) -> FilterParams {
        self.params
    }
}

/// Blend weight for a sample `dt` seconds after the previous one
fn smoothing_factor(dt: f64, cutoff: f64) -> f64 {
    let r = 2.0 * PI * cutoff * dt;
    r / (r + 1.0)
}
