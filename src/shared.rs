//! Shared state between the controller threads.
//!
//! The pose record is the only mutable state both control loops touch: the
//! pose estimator writes it from whichever controller thread is executing,
//! and the supervisor loop reads it for telemetry. A single mutex guards the
//! record; each controller's own PID state stays thread-private and needs no
//! synchronization.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::Mutex;

use crate::pose::Pose2D;

/// Shared state between the controller threads and the supervisor.
#[derive(Debug)]
pub struct SharedState {
    /// Dead-reckoned pose, written only through [`SharedState::advance`]
    pose: Mutex<Pose2D>,

    /// Shutdown signal for graceful termination, consulted by each control
    /// loop once per cycle at its yield point
    shutdown: AtomicBool,
}

impl SharedState {
    /// Create new shared state with the given starting pose.
    pub fn new(initial_pose: Pose2D) -> Self {
        Self {
            pose: Mutex::new(initial_pose),
            shutdown: AtomicBool::new(false),
        }
    }

    /// Get a snapshot of the current pose.
    pub fn pose(&self) -> Pose2D {
        *self.pose.lock()
    }

    /// Translate the pose by `distance` along its current heading.
    ///
    /// Reads theta and applies the displacement under one lock, so the
    /// heading in effect before the call is the one the displacement uses.
    /// Heading itself is never modified here.
    pub fn advance(&self, distance: f64) {
        let mut pose = self.pose.lock();
        let (sin_t, cos_t) = pose.theta.sin_cos();
        pose.x += distance * cos_t;
        pose.y += distance * sin_t;
    }

    /// Signal shutdown.
    pub fn signal_shutdown(&self) {
        self.shutdown.store(true, Ordering::Release);
    }

    /// Check if shutdown is signaled.
    pub fn should_shutdown(&self) -> bool {
        self.shutdown.load(Ordering::Acquire)
    }

    /// Overwrite the pose directly. Test hook only - production code mutates
    /// the pose exclusively through [`SharedState::advance`].
    #[cfg(test)]
    pub fn set_pose(&self, pose: Pose2D) {
        *self.pose.lock() = pose;
    }
}
