//! Thread-per-controller architecture.
//!
//! The two control loops run as independently scheduled OS threads with no
//! coordination barrier between them:
//! - Heading thread (~50Hz): gyro PID, in-place differential turn
//! - Distance thread (~50Hz): encoder PID, forward drive with trim
//!
//! Both invoke the pose estimator every cycle and both command the same six
//! drive motors; motor access is deliberately unarbitrated (see
//! [`crate::hardware::DriveHardware`]).

mod distance;
mod heading;

pub use distance::DistanceController;
pub use heading::HeadingController;

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crate::config::HelmsmanConfig;
use crate::error::Result;
use crate::hardware::{DriveHardware, Motor, OrientationSensor, RotationSensor};
use crate::shared::SharedState;

/// Handles for the controller threads.
pub struct ThreadHandles {
    pub heading: JoinHandle<()>,
    pub distance: JoinHandle<()>,
}

/// Spawn both controller threads and return their handles.
pub fn spawn_threads<R, O, M>(
    config: HelmsmanConfig,
    shared_state: Arc<SharedState>,
    hardware: DriveHardware<R, O, M>,
) -> Result<ThreadHandles>
where
    R: RotationSensor + Clone + Send + 'static,
    O: OrientationSensor + Clone + Send + 'static,
    M: Motor + Clone + Send + 'static,
{
    // Each thread gets its own view of the same devices and shared pose
    let heading_hardware = hardware.clone();
    let heading_state = Arc::clone(&shared_state);
    let heading_config = config.clone();

    let heading_handle = thread::Builder::new()
        .name("heading".into())
        .spawn(move || {
            let mut controller =
                HeadingController::new(&heading_config, heading_state, heading_hardware);
            if let Err(e) = controller.run() {
                tracing::error!("Heading thread error: {}", e);
            }
        })
        .expect("Failed to spawn heading thread");

    let distance_handle = thread::Builder::new()
        .name("distance".into())
        .spawn(move || {
            let mut controller = DistanceController::new(&config, shared_state, hardware);
            if let Err(e) = controller.run() {
                tracing::error!("Distance thread error: {}", e);
            }
        })
        .expect("Failed to spawn distance thread");

    Ok(ThreadHandles {
        heading: heading_handle,
        distance: distance_handle,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hardware::mock::MockRig;
    use crate::pose::Pose2D;
    use std::time::Duration;

    #[test]
    fn threads_run_and_honor_shutdown() {
        let mut config = HelmsmanConfig::default();
        config.control.cycle_period_ms = 1;
        config.control.calibration_settle_ms = 1;
        config.mock.gyro_calibration_ms = 1;

        let rig = MockRig::new(Duration::from_millis(config.mock.gyro_calibration_ms));
        rig.gyro_a.set_heading(90.0);
        rig.gyro_b.set_heading(90.0);

        let shared = Arc::new(SharedState::new(Pose2D::default()));
        let handles =
            spawn_threads(config, Arc::clone(&shared), rig.hardware()).unwrap();

        // Let both loops turn over a few cycles
        std::thread::sleep(Duration::from_millis(50));
        assert!(!handles.heading.is_finished());
        assert!(!handles.distance.is_finished());

        // The distance loop drives against a 500° target from zeroed
        // encoders, so its motors must carry the forward bias
        assert!(rig.left_motors[0].command_count() > 0);

        shared.signal_shutdown();
        handles.heading.join().unwrap();
        handles.distance.join().unwrap();
    }
}
