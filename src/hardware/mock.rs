//! Mock drive hardware for hardware-free runs and testing.
//!
//! Every mock is a clonable handle over interior-mutex state, so clones held
//! by different threads observe the same device - the same way the real
//! devices would behave.

use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use super::{DriveHardware, Motor, OrientationSensor, RotationSensor};
use crate::error::Result;

/// Mock wheel encoder with a settable cumulative reading.
#[derive(Clone, Debug, Default)]
pub struct MockRotationSensor {
    degrees: Arc<Mutex<f64>>,
}

impl MockRotationSensor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the cumulative rotation the sensor reports.
    pub fn set_degrees(&self, degrees: f64) {
        *self.degrees.lock() = degrees;
    }
}

impl RotationSensor for MockRotationSensor {
    fn read_degrees(&mut self) -> Result<f64> {
        Ok(*self.degrees.lock())
    }

    fn reset(&mut self) -> Result<()> {
        *self.degrees.lock() = 0.0;
        Ok(())
    }
}

#[derive(Debug)]
struct OrientationState {
    heading_degrees: f64,
    calibrating_until: Option<Instant>,
}

/// Mock gyro. Calibration is modeled as a fixed-duration window that opens
/// when [`OrientationSensor::calibrate`] is called.
#[derive(Clone, Debug)]
pub struct MockOrientationSensor {
    state: Arc<Mutex<OrientationState>>,
    calibration_time: Duration,
}

impl MockOrientationSensor {
    pub fn new(calibration_time: Duration) -> Self {
        Self {
            state: Arc::new(Mutex::new(OrientationState {
                heading_degrees: 0.0,
                calibrating_until: None,
            })),
            calibration_time,
        }
    }

    /// Set the heading the sensor reports.
    pub fn set_heading(&self, degrees: f64) {
        self.state.lock().heading_degrees = degrees;
    }
}

impl OrientationSensor for MockOrientationSensor {
    fn calibrate(&mut self) -> Result<()> {
        self.state.lock().calibrating_until = Some(Instant::now() + self.calibration_time);
        Ok(())
    }

    fn is_calibrating(&mut self) -> Result<bool> {
        let mut state = self.state.lock();
        match state.calibrating_until {
            Some(until) if Instant::now() < until => Ok(true),
            Some(_) => {
                state.calibrating_until = None;
                Ok(false)
            }
            None => Ok(false),
        }
    }

    fn read_degrees(&mut self) -> Result<f64> {
        Ok(self.state.lock().heading_degrees)
    }
}

#[derive(Debug, Default)]
struct MotorState {
    last_percent: f64,
    command_count: u64,
}

/// Mock drive motor that records the commands it receives.
#[derive(Clone, Debug, Default)]
pub struct MockMotor {
    state: Arc<Mutex<MotorState>>,
}

impl MockMotor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent commanded percent power.
    pub fn last_percent(&self) -> f64 {
        self.state.lock().last_percent
    }

    /// Number of spin commands received.
    pub fn command_count(&self) -> u64 {
        self.state.lock().command_count
    }
}

impl Motor for MockMotor {
    fn spin(&mut self, percent: f64) -> Result<()> {
        let mut state = self.state.lock();
        state.last_percent = percent;
        state.command_count += 1;
        Ok(())
    }
}

/// A complete mock drive rig: six motors, three encoders, two gyros.
///
/// The rig keeps its own handles so tests (and a future simulator) can set
/// sensor readings and inspect motor commands while the controller threads
/// drive clones of the same devices.
#[derive(Clone)]
pub struct MockRig {
    pub left_motors: Vec<MockMotor>,
    pub right_motors: Vec<MockMotor>,
    pub left_encoder: MockRotationSensor,
    pub right_encoder: MockRotationSensor,
    pub middle_encoder: MockRotationSensor,
    pub gyro_a: MockOrientationSensor,
    pub gyro_b: MockOrientationSensor,
}

impl MockRig {
    pub fn new(gyro_calibration_time: Duration) -> Self {
        Self {
            left_motors: (0..3).map(|_| MockMotor::new()).collect(),
            right_motors: (0..3).map(|_| MockMotor::new()).collect(),
            left_encoder: MockRotationSensor::new(),
            right_encoder: MockRotationSensor::new(),
            middle_encoder: MockRotationSensor::new(),
            gyro_a: MockOrientationSensor::new(gyro_calibration_time),
            gyro_b: MockOrientationSensor::new(gyro_calibration_time),
        }
    }

    /// Hardware bundle for the controller threads (clonable device handles).
    pub fn hardware(
        &self,
    ) -> DriveHardware<MockRotationSensor, MockOrientationSensor, MockMotor> {
        DriveHardware {
            left_motors: self.left_motors.clone(),
            right_motors: self.right_motors.clone(),
            left_encoder: self.left_encoder.clone(),
            right_encoder: self.right_encoder.clone(),
            middle_encoder: self.middle_encoder.clone(),
            gyro_a: self.gyro_a.clone(),
            gyro_b: self.gyro_b.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn motor_records_last_command() {
        let mut motor = MockMotor::new();
        motor.spin(50.0).unwrap();
        motor.spin(-12.5).unwrap();
        assert_eq!(motor.last_percent(), -12.5);
        assert_eq!(motor.command_count(), 2);
    }

    #[test]
    fn clones_share_the_underlying_device() {
        let encoder = MockRotationSensor::new();
        let mut view = encoder.clone();
        encoder.set_degrees(360.0);
        assert_eq!(view.read_degrees().unwrap(), 360.0);
        view.reset().unwrap();
        assert_eq!(encoder.clone().read_degrees().unwrap(), 0.0);
    }

    #[test]
    fn calibration_window_opens_and_closes() {
        let mut gyro = MockOrientationSensor::new(Duration::from_millis(30));
        assert!(!gyro.is_calibrating().unwrap());

        gyro.calibrate().unwrap();
        assert!(gyro.is_calibrating().unwrap());

        std::thread::sleep(Duration::from_millis(40));
        assert!(!gyro.is_calibrating().unwrap());
    }
}
