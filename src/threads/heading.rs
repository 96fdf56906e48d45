//! Heading thread: PID regulation toward a fixed target heading.
//!
//! Runs forever at the configured cycle period. Each cycle averages the two
//! orientation sensors, computes a PID correction and commands an in-place
//! differential turn: the left motors get the negated correction, the right
//! motors the correction. There is no "heading reached" state - the loop is
//! a perpetual fixed-point regulator that keeps re-correcting.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::HelmsmanConfig;
use crate::error::Result;
use crate::estimator::PoseEstimator;
use crate::hardware::{DriveHardware, Motor, OrientationSensor, RotationSensor};
use crate::pid::{PidGains, PidState};
use crate::shared::SharedState;

/// Heading controller state and loop.
pub struct HeadingController<R, O, M> {
    gains: PidGains,
    target_deg: f64,
    cycle: Duration,
    settle: Duration,
    gyro_a: O,
    gyro_b: O,
    left_motors: Vec<M>,
    right_motors: Vec<M>,
    pid: PidState,
    estimator: PoseEstimator<R>,
    shared: Arc<SharedState>,
}

impl<R, O, M> HeadingController<R, O, M>
where
    R: RotationSensor,
    O: OrientationSensor,
    M: Motor,
{
    /// Create a new heading controller over the given hardware view.
    pub fn new(
        config: &HelmsmanConfig,
        shared: Arc<SharedState>,
        hardware: DriveHardware<R, O, M>,
    ) -> Self {
        let estimator = PoseEstimator::new(
            hardware.left_encoder,
            hardware.right_encoder,
            hardware.middle_encoder,
            config.robot.wheel_diameter,
        );

        Self {
            gains: config.gains.turn,
            target_deg: config.targets.heading_deg,
            cycle: config.cycle_period(),
            settle: config.calibration_settle(),
            gyro_a: hardware.gyro_a,
            gyro_b: hardware.gyro_b,
            left_motors: hardware.left_motors,
            right_motors: hardware.right_motors,
            pid: PidState::new(),
            estimator,
            shared,
        }
    }

    /// Run the heading thread main loop.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!("Heading thread started (target {:.1}°)", self.target_deg);

        self.wait_for_calibration()?;

        loop {
            if self.shared.should_shutdown() {
                tracing::info!("Heading thread shutting down");
                break;
            }

            self.step()?;

            thread::sleep(self.cycle);
        }

        Ok(())
    }

    /// One-time setup: start calibration on both gyros, wait the fixed
    /// settle delay, then poll until neither reports calibrating.
    ///
    /// There is no timeout - a sensor stuck in calibration blocks this task
    /// indefinitely. The failure surface of the hardware is not modeled
    /// here; only the shutdown signal can break the wait.
    fn wait_for_calibration(&mut self) -> Result<()> {
        tracing::info!("Calibrating orientation sensors...");
        self.gyro_a.calibrate()?;
        self.gyro_b.calibrate()?;

        thread::sleep(self.settle);

        while self.gyro_a.is_calibrating()? || self.gyro_b.is_calibrating()? {
            if self.shared.should_shutdown() {
                return Ok(());
            }
            thread::sleep(self.cycle);
        }

        tracing::info!("Orientation sensors calibrated");
        Ok(())
    }

    /// One steady-state control cycle.
    pub(crate) fn step(&mut self) -> Result<()> {
        let angle_a = self.gyro_a.read_degrees()?;
        let angle_b = self.gyro_b.read_degrees()?;
        let average_angle = (angle_a + angle_b) / 2.0;

        let error = self.target_deg - average_angle;
        let correction = self.pid.update(self.gains, error);

        for motor in &mut self.left_motors {
            motor.spin(-correction)?;
        }
        for motor in &mut self.right_motors {
            motor.spin(correction)?;
        }

        self.estimator.update(&self.shared)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::MockRig;
    use crate::pose::Pose2D;
    use std::time::Instant;

    fn test_config() -> HelmsmanConfig {
        let mut config = HelmsmanConfig::default();
        config.control.cycle_period_ms = 1;
        config.control.calibration_settle_ms = 5;
        config
    }

    fn controller(
        config: &HelmsmanConfig,
        rig: &MockRig,
    ) -> HeadingController<
        crate::hardware::mock::MockRotationSensor,
        crate::hardware::mock::MockOrientationSensor,
        crate::hardware::mock::MockMotor,
    > {
        let shared = Arc::new(SharedState::new(Pose2D::default()));
        HeadingController::new(config, shared, rig.hardware())
    }

    #[test]
    fn differential_turn_commands_each_cycle() {
        let config = test_config();
        let rig = MockRig::new(Duration::from_millis(0));
        let mut ctrl = controller(&config, &rig);

        rig.gyro_a.set_heading(80.0);
        rig.gyro_b.set_heading(80.0);
        ctrl.step().unwrap();

        // error = 10, first cycle: integral = 10, derivative = 10
        let expected = 0.15 * 10.0 + 0.02 * 10.0 + 0.01 * 10.0;
        for motor in &rig.left_motors {
            assert!((motor.last_percent() + expected).abs() < 1e-9);
        }
        for motor in &rig.right_motors {
            assert!((motor.last_percent() - expected).abs() < 1e-9);
        }

        // Sign convention holds on every subsequent cycle too
        ctrl.step().unwrap();
        for (left, right) in rig.left_motors.iter().zip(&rig.right_motors) {
            assert!((left.last_percent() + right.last_percent()).abs() < 1e-9);
        }
    }

    #[test]
    fn gyro_readings_are_averaged() {
        let config = test_config();
        let rig = MockRig::new(Duration::from_millis(0));
        let mut ctrl = controller(&config, &rig);

        rig.gyro_a.set_heading(70.0);
        rig.gyro_b.set_heading(90.0);
        ctrl.step().unwrap();

        // average = 80, error = 10
        let expected = 0.15 * 10.0 + 0.02 * 10.0 + 0.01 * 10.0;
        assert!((rig.right_motors[0].last_percent() - expected).abs() < 1e-9);
    }

    #[test]
    fn on_target_reading_yields_zero_correction() {
        let config = test_config();
        let rig = MockRig::new(Duration::from_millis(0));
        let mut ctrl = controller(&config, &rig);

        rig.gyro_a.set_heading(90.0);
        rig.gyro_b.set_heading(90.0);
        ctrl.step().unwrap();

        for motor in rig.left_motors.iter().chain(&rig.right_motors) {
            assert_eq!(motor.last_percent(), 0.0);
        }
    }

    #[test]
    fn zero_error_after_history_leaves_only_residual_terms() {
        let config = test_config();
        let rig = MockRig::new(Duration::from_millis(0));
        let mut ctrl = controller(&config, &rig);

        rig.gyro_a.set_heading(80.0);
        rig.gyro_b.set_heading(80.0);
        ctrl.step().unwrap();

        rig.gyro_a.set_heading(90.0);
        rig.gyro_b.set_heading(90.0);
        ctrl.step().unwrap();

        // error = 0: no proportional term; integral residue from the prior
        // cycle plus the error drop-off are all that drives the motors
        let expected = 0.02 * 10.0 + 0.01 * (0.0 - 10.0);
        assert!((rig.right_motors[0].last_percent() - expected).abs() < 1e-9);
    }

    #[test]
    fn each_cycle_invokes_the_pose_estimator() {
        let config = test_config();
        let rig = MockRig::new(Duration::from_millis(0));
        let shared = Arc::new(SharedState::new(Pose2D::default()));
        let mut ctrl = HeadingController::new(&config, Arc::clone(&shared), rig.hardware());

        rig.left_encoder.set_degrees(300.0);
        rig.right_encoder.set_degrees(300.0);
        rig.middle_encoder.set_degrees(300.0);
        ctrl.step().unwrap();

        assert!((shared.pose().x - 10.472).abs() < 1e-3);
    }

    #[test]
    fn steady_state_waits_for_both_calibrations() {
        let mut config = test_config();
        config.mock.gyro_calibration_ms = 40;
        let rig = MockRig::new(Duration::from_millis(config.mock.gyro_calibration_ms));
        let mut ctrl = controller(&config, &rig);

        let start = Instant::now();
        ctrl.wait_for_calibration().unwrap();

        // The settle delay (5ms) is shorter than the calibration window
        // (40ms), so the poll loop must have carried the wait
        assert!(start.elapsed() >= Duration::from_millis(40));
        assert!(!rig.gyro_a.clone().is_calibrating().unwrap());
        assert!(!rig.gyro_b.clone().is_calibrating().unwrap());
    }
}
