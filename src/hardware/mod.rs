//! Hardware collaborator traits.
//!
//! The control core talks to motors and sensors only through these narrow
//! contracts; bringing up real devices is the host integration's problem.
//! [`mock`] provides clonable in-memory implementations used by the binary
//! and the unit tests.

pub mod mock;

use crate::error::Result;

/// Wheel rotation sensor (encoder).
///
/// Readings are cumulative rotation in degrees since the last reset.
pub trait RotationSensor: Send {
    /// Read the cumulative rotation in degrees.
    fn read_degrees(&mut self) -> Result<f64>;

    /// Reset the cumulative rotation to zero.
    fn reset(&mut self) -> Result<()>;
}

/// Orientation sensor (gyro/IMU yaw).
pub trait OrientationSensor: Send {
    /// Begin calibration. The hardware calibrates asynchronously and takes
    /// on the order of seconds; poll [`OrientationSensor::is_calibrating`].
    fn calibrate(&mut self) -> Result<()>;

    /// Whether calibration is still in progress.
    fn is_calibrating(&mut self) -> Result<bool>;

    /// Read the current heading in degrees.
    fn read_degrees(&mut self) -> Result<f64>;
}

/// Drive motor.
pub trait Motor: Send {
    /// Spin at the given signed percent power; the sign selects direction.
    fn spin(&mut self, percent: f64) -> Result<()>;
}

/// The drive hardware both controller threads command.
///
/// Handles are clonable views of the underlying devices, so each thread
/// carries its own copy of this bundle. Note that nothing arbitrates motor
/// access between the two controllers: when both loops run they issue
/// conflicting commands to the same six motors every cycle and the last
/// writer wins. That hazard is a known property of this design, kept as-is.
#[derive(Clone)]
pub struct DriveHardware<R, O, M> {
    /// Left-side drive motors (front, back, middle)
    pub left_motors: Vec<M>,
    /// Right-side drive motors (front, back, middle)
    pub right_motors: Vec<M>,
    /// Left tracking encoder
    pub left_encoder: R,
    /// Right tracking encoder
    pub right_encoder: R,
    /// Middle tracking encoder
    pub middle_encoder: R,
    /// First orientation sensor
    pub gyro_a: O,
    /// Second orientation sensor, averaged with the first
    pub gyro_b: O,
}
