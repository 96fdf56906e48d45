//! Helmsman - closed-loop motion control core for a differential-drive robot
//!
//! Provides the dead-reckoning pose estimator, the heading and distance PID
//! control loops, and the shared-state contract between them. Hardware is
//! reached only through the narrow traits in [`hardware`]; the mock rig in
//! [`hardware::mock`] stands in for real devices.

pub mod config;
pub mod error;
pub mod estimator;
pub mod hardware;
pub mod pid;
pub mod pose;
pub mod shared;
pub mod threads;

// Re-export commonly used types
pub use config::HelmsmanConfig;
pub use error::{HelmsmanError, Result};
