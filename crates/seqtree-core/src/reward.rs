//! Turns oracle outcomes into scalar rewards, normalized against typical oracle latency.

/// Floor applied to the latency baseline so the penalty never divides by zero.
pub const BASELINE_EPSILON: f64 = 1e-3;

/// Baseline assumed before any sample has been observed.
const DEFAULT_BASELINE: f64 = 1.0;

/// Stateful reward transform with an exponential-moving-average latency baseline.
///
/// `reward = θ·f/(f+1) − (1−θ)·t/(t+1) − λ·penalty(elapsed)`
#[derive(Debug, Clone)]
pub struct Rewarder {
    theta: f64,
    lambda: f64,
    beta: f64,
    baseline: Option<f64>,
    samples: u64,
}

impl Default for Rewarder {
    fn default() -> Self {
        Rewarder::new(0.7, 0.2, 0.9)
    }
}

impl Rewarder {
    /// Create a rewarder; parameter ranges are checked by `SearchConfig`.
    pub fn new(theta: f64, lambda: f64, beta: f64) -> Self {
        Rewarder {
            theta,
            lambda,
            beta,
            baseline: None,
            samples: 0,
        }
    }

    /// Feed one real oracle latency sample into the baseline.
    /// Must be called once per oracle invocation, never for cache replays.
    pub fn observe(&mut self, elapsed_secs: f64) {
        self.baseline = Some(match self.baseline {
            None => elapsed_secs.max(BASELINE_EPSILON),
            Some(baseline) => self.beta * baseline + (1.0 - self.beta) * elapsed_secs,
        });
        self.samples += 1;
    }

    /// Current latency baseline in seconds.
    pub fn baseline(&self) -> f64 {
        self.baseline.unwrap_or(DEFAULT_BASELINE)
    }

    /// Number of samples observed so far.
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// One-sided overage penalty: zero at or below the baseline, linear above it.
    pub fn penalty(&self, elapsed_secs: f64) -> f64 {
        (elapsed_secs / self.baseline().max(BASELINE_EPSILON) - 1.0).max(0.0)
    }

    /// Scalar reward for one evaluation.
    pub fn reward(&self, faults: u32, timeouts: u32, elapsed_secs: f64) -> f64 {
        let faults = f64::from(faults);
        let timeouts = f64::from(timeouts);
        self.theta * (faults / (faults + 1.0))
            - (1.0 - self.theta) * (timeouts / (timeouts + 1.0))
            - self.lambda * self.penalty(elapsed_secs)
    }
}
