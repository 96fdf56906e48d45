//! Robot pose representation.

/// Robot pose in 2D space.
///
/// Position (x, y) in wheel-length units and heading (theta) in radians,
/// in a fixed world frame anchored at the startup position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose2D {
    /// X position
    pub x: f64,
    /// Y position
    pub y: f64,
    /// Heading in radians
    pub theta: f64,
}

impl Pose2D {
    /// Create a new pose.
    #[inline]
    pub fn new(x: f64, y: f64, theta: f64) -> Self {
        Self { x, y, theta }
    }
}

impl Default for Pose2D {
    /// Origin with zero heading - where dead reckoning starts.
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            theta: 0.0,
        }
    }
}
