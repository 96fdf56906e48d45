//! Distance thread: PID regulation toward a target cumulative rotation.
//!
//! Drives the robot forward in a straight line, using cumulative encoder
//! rotation as the distance proxy. Each cycle the PID correction is layered
//! on a fixed base speed with opposite signs per side, which both propels
//! the robot and trims left/right imbalance. The loop never declares the
//! target reached: once overshot, the error flips sign and the correction
//! reverses, indefinitely.

use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crate::config::HelmsmanConfig;
use crate::error::Result;
use crate::estimator::PoseEstimator;
use crate::hardware::{DriveHardware, Motor, OrientationSensor, RotationSensor};
use crate::pid::{PidGains, PidState};
use crate::shared::SharedState;

/// Distance controller state and loop.
pub struct DistanceController<R, M> {
    gains: PidGains,
    target_rotation_deg: f64,
    base_speed_pct: f64,
    cycle: Duration,
    left_encoder: R,
    right_encoder: R,
    middle_encoder: R,
    left_motors: Vec<M>,
    right_motors: Vec<M>,
    pid: PidState,
    estimator: PoseEstimator<R>,
    shared: Arc<SharedState>,
}

impl<R, M> DistanceController<R, M>
where
    R: RotationSensor + Clone,
    M: Motor,
{
    /// Create a new distance controller over the given hardware view.
    ///
    /// The gyros in the bundle are dropped: this loop never reads them,
    /// heading hold comes purely from equalizing wheel travel.
    pub fn new<O: OrientationSensor>(
        config: &HelmsmanConfig,
        shared: Arc<SharedState>,
        hardware: DriveHardware<R, O, M>,
    ) -> Self {
        let estimator = PoseEstimator::new(
            hardware.left_encoder.clone(),
            hardware.right_encoder.clone(),
            hardware.middle_encoder.clone(),
            config.robot.wheel_diameter,
        );

        Self {
            gains: config.gains.straight,
            target_rotation_deg: config.targets.forward_rotation_deg,
            base_speed_pct: config.control.base_speed_pct,
            cycle: config.cycle_period(),
            left_encoder: hardware.left_encoder,
            right_encoder: hardware.right_encoder,
            middle_encoder: hardware.middle_encoder,
            left_motors: hardware.left_motors,
            right_motors: hardware.right_motors,
            pid: PidState::new(),
            estimator,
            shared,
        }
    }

    /// Run the distance thread main loop.
    pub fn run(&mut self) -> Result<()> {
        tracing::info!(
            "Distance thread started (target {:.0}° rotation)",
            self.target_rotation_deg
        );

        self.reset_encoders()?;

        loop {
            if self.shared.should_shutdown() {
                tracing::info!("Distance thread shutting down");
                break;
            }

            self.step()?;

            thread::sleep(self.cycle);
        }

        Ok(())
    }

    /// One-time setup: zero all three tracking encoders.
    pub(crate) fn reset_encoders(&mut self) -> Result<()> {
        self.left_encoder.reset()?;
        self.right_encoder.reset()?;
        self.middle_encoder.reset()?;
        Ok(())
    }

    /// One steady-state control cycle.
    pub(crate) fn step(&mut self) -> Result<()> {
        let left = self.left_encoder.read_degrees()?;
        let right = self.right_encoder.read_degrees()?;
        let middle = self.middle_encoder.read_degrees()?;
        let average_rotation = (left + right + middle) / 3.0;

        let error = self.target_rotation_deg - average_rotation;
        let correction = self.pid.update(self.gains, error);

        for motor in &mut self.left_motors {
            motor.spin(self.base_speed_pct + correction)?;
        }
        for motor in &mut self.right_motors {
            motor.spin(self.base_speed_pct - correction)?;
        }

        self.estimator.update(&self.shared)?;
        Ok(())
    }
}
