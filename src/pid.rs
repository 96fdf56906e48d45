//! PID correction math shared by both control loops.
//!
//! Each controller owns one [`PidState`] and feeds it an error every cycle.
//! The integral term is a plain running sum of error with no windup clamp,
//! and the derivative is the raw per-cycle error difference - neither is
//! scaled by the cycle time. Clamping or dt-scaling would change the
//! observable correction values, so the gains are tuned against exactly
//! this form.

use serde::Deserialize;

/// PID gain set. Fixed configuration, read-only during operation.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
pub struct PidGains {
    /// Proportional gain
    pub kp: f64,
    /// Integral gain
    pub ki: f64,
    /// Derivative gain
    pub kd: f64,
}

/// Running state of one PID loop.
///
/// Zeroed when the owning task starts and mutated for its entire run.
#[derive(Debug, Default)]
pub struct PidState {
    /// Error fed in on the most recent cycle
    pub error: f64,
    /// Error from the previous cycle, held at the point the derivative
    /// is computed
    pub last_error: f64,
    /// Unbounded running sum of error
    pub integral: f64,
    /// Per-cycle error difference from the most recent cycle
    pub derivative: f64,
}

impl PidState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run one correction cycle and return the commanded correction.
    ///
    /// `correction = kp*error + ki*integral + kd*derivative`
    pub fn update(&mut self, gains: PidGains, error: f64) -> f64 {
        self.error = error;
        self.integral += error;
        self.derivative = error - self.last_error;

        let correction =
            gains.kp * error + gains.ki * self.integral + gains.kd * self.derivative;

        self.last_error = error;
        correction
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GAINS: PidGains = PidGains {
        kp: 0.15,
        ki: 0.02,
        kd: 0.01,
    };

    #[test]
    fn integral_is_unclamped_running_sum() {
        let mut pid = PidState::new();
        for _ in 0..250 {
            pid.update(GAINS, 40.0);
        }
        // N cycles of constant error accumulate N * error, however large
        assert!((pid.integral - 250.0 * 40.0).abs() < 1e-9);
    }

    #[test]
    fn derivative_is_zero_for_repeated_error() {
        let mut pid = PidState::new();
        pid.update(GAINS, 7.5);
        pid.update(GAINS, 7.5);
        assert_eq!(pid.derivative, 0.0);
    }

    #[test]
    fn correction_matches_term_sum_exactly() {
        let mut pid = PidState::new();
        pid.update(GAINS, 10.0);
        let correction = pid.update(GAINS, 4.0);

        // integral = 10 + 4, derivative = 4 - 10
        let expected = GAINS.kp * 4.0 + GAINS.ki * 14.0 + GAINS.kd * (-6.0);
        assert!((correction - expected).abs() < 1e-12);
    }

    #[test]
    fn last_error_tracks_previous_cycle() {
        let mut pid = PidState::new();
        pid.update(GAINS, 3.0);
        assert_eq!(pid.last_error, 3.0);
        pid.update(GAINS, -2.0);
        assert_eq!(pid.last_error, -2.0);
        assert_eq!(pid.derivative, -5.0);
    }

    #[test]
    fn zero_error_on_first_cycle_gives_zero_correction() {
        let mut pid = PidState::new();
        assert_eq!(pid.update(GAINS, 0.0), 0.0);
    }

    #[test]
    fn zero_error_after_history_keeps_residual_terms() {
        let mut pid = PidState::new();
        pid.update(GAINS, 10.0);
        let correction = pid.update(GAINS, 0.0);

        // No proportional contribution; the integral residue and the error
        // drop-off are all that remains.
        let expected = GAINS.ki * 10.0 + GAINS.kd * (-10.0);
        assert!((correction - expected).abs() < 1e-12);
    }
}
