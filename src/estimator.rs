//! Dead-reckoning pose estimator.
//!
//! Converts raw wheel-rotation readings into an incremental 2D pose update,
//! independent of which controller triggered it. Both controller threads
//! hold a view of the same estimator (clonable sensor handles plus the one
//! shared pose record); the estimator itself carries no other state.

use std::f64::consts::PI;

use crate::error::Result;
use crate::hardware::RotationSensor;
use crate::shared::SharedState;

/// Dead-reckoning estimator over the three tracking encoders.
#[derive(Clone)]
pub struct PoseEstimator<R> {
    left: R,
    right: R,
    middle: R,
    /// Wheel circumference in length units
    circumference: f64,
}

impl<R: RotationSensor> PoseEstimator<R> {
    pub fn new(left: R, right: R, middle: R, wheel_diameter: f64) -> Self {
        Self {
            left,
            right,
            middle,
            circumference: wheel_diameter * PI,
        }
    }

    /// Run one dead-reckoning update against the shared pose.
    ///
    /// Averages the three cumulative rotation readings, converts the average
    /// to a linear distance (`avg * circumference / 360`) and translates the
    /// pose by that distance along the heading in effect before the call.
    /// Each call represents elapsed motion: calling twice with unchanged
    /// readings accumulates the displacement twice.
    ///
    /// Heading is never written here - nothing in the control core updates
    /// theta, so dead reckoning runs with the startup heading (see the
    /// estimator tests, which pin this down as a known gap).
    pub fn update(&mut self, shared: &SharedState) -> Result<()> {
        let left = self.left.read_degrees()?;
        let right = self.right.read_degrees()?;
        let middle = self.middle.read_degrees()?;

        let average_rotation = (left + right + middle) / 3.0;
        let distance = average_rotation * (self.circumference / 360.0);

        shared.advance(distance);
        Ok(())
    }
}
