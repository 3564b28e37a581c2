//! Smoothed FPS measurement

/// Exponentially-smoothed estimate of realized frame cadence
///
/// Each recorded inter-frame interval folds its inverse into the estimate:
/// `est = est * smoothing + (1 / interval) * (1 - smoothing)`. With a higher
/// smoothing factor the readout is steadier but takes longer to catch up.
pub struct FpsEstimator {
    estimate: f64,
    smoothing: f64,
}

impl FpsEstimator {
    /// Create an estimator seeded at `initial` (typically the target tick
    /// rate, so the readout is sane before the first frame)
    pub fn new(smoothing: f64, initial: f64) -> Self {
        Self {
            estimate: initial,
            smoothing,
        }
    }

    /// Fold one measured inter-frame interval, in seconds, into the estimate
    ///
    /// Non-finite and non-positive intervals are skipped and the prior
    /// estimate retained, so the readout never becomes NaN or infinite.
    pub fn record(&mut self, interval_secs: f64) {
        if !interval_secs.is_finite() || interval_secs <= 0.0 {
            return;
        }
        self.estimate =
            self.estimate * self.smoothing + (1.0 / interval_secs) * (1.0 - self.smoothing);
    }

    /// The current frames-per-second estimate
    pub fn fps(&self) -> f64 {
        self.estimate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_estimate() {
        let fps = FpsEstimator::new(0.9, 60.0);
        assert!((fps.fps() - 60.0).abs() < 1e-10);
    }

    #[test]
    fn test_converges_to_inverse_interval() {
        let mut fps = FpsEstimator::new(0.9, 60.0);
        // Feed a constant 1/30s interval; the estimate approaches 30
        for _ in 0..200 {
            fps.record(1.0 / 30.0);
        }
        assert!((fps.fps() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn test_error_bounded_by_smoothing_power() {
        let smoothing: f64 = 0.9;
        let mut fps = FpsEstimator::new(smoothing, 60.0);
        let n = 50;
        for _ in 0..n {
            fps.record(1.0 / 30.0);
        }
        // Initial error of 30 decays geometrically
        let bound = 30.0 * smoothing.powi(n);
        assert!((fps.fps() - 30.0).abs() <= bound + 1e-9);
    }

    #[test]
    fn test_zero_smoothing_tracks_instantly() {
        let mut fps = FpsEstimator::new(0.0, 60.0);
        fps.record(1.0 / 144.0);
        assert!((fps.fps() - 144.0).abs() < 1e-6);
    }

    #[test]
    fn test_bad_intervals_are_skipped() {
        let mut fps = FpsEstimator::new(0.9, 60.0);
        fps.record(0.0);
        fps.record(-1.0);
        fps.record(f64::NAN);
        fps.record(f64::INFINITY);
        assert!((fps.fps() - 60.0).abs() < 1e-10);
        assert!(fps.fps().is_finite());
    }
}
