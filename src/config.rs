//! Configuration loading for Helmsman

use crate::error::Result;
use crate::pid::PidGains;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

/// Main configuration structure
#[derive(Clone, Debug, Deserialize)]
pub struct HelmsmanConfig {
    #[serde(default)]
    pub robot: RobotConfig,
    #[serde(default)]
    pub control: ControlConfig,
    #[serde(default)]
    pub targets: TargetsConfig,
    #[serde(default)]
    pub gains: GainsConfig,
    #[serde(default)]
    pub mock: MockConfig,
}

/// Robot physical parameters
#[derive(Clone, Debug, Deserialize)]
pub struct RobotConfig {
    /// Drive wheel diameter in length units (default: 4.0)
    #[serde(default = "default_wheel_diameter")]
    pub wheel_diameter: f64,

    /// Distance between the wheel sides in length units (default: 12.0).
    /// Part of the drivetrain profile; no control loop consumes it.
    #[serde(default = "default_track_width")]
    pub track_width: f64,
}

/// Control loop timing and drive parameters
#[derive(Clone, Debug, Deserialize)]
pub struct ControlConfig {
    /// Control cycle period in milliseconds (default: 20)
    #[serde(default = "default_cycle_period_ms")]
    pub cycle_period_ms: u64,

    /// Settle delay after starting gyro calibration, in milliseconds
    /// (default: 2000)
    #[serde(default = "default_calibration_settle_ms")]
    pub calibration_settle_ms: u64,

    /// Base forward speed for straight driving, percent (default: 50)
    #[serde(default = "default_base_speed_pct")]
    pub base_speed_pct: f64,
}

/// Fixed motion targets, one scalar per controller
#[derive(Clone, Debug, Deserialize)]
pub struct TargetsConfig {
    /// Target heading for the heading controller, degrees (default: 90)
    #[serde(default = "default_heading_deg")]
    pub heading_deg: f64,

    /// Target cumulative encoder rotation for the distance controller,
    /// degrees (default: 500)
    #[serde(default = "default_forward_rotation_deg")]
    pub forward_rotation_deg: f64,

    /// Reverse-travel rotation target, degrees (default: 500). Part of the
    /// drivetrain profile; no control loop consumes it.
    #[serde(default = "default_reverse_rotation_deg")]
    pub reverse_rotation_deg: f64,
}

/// PID gain sets, one per controller
#[derive(Clone, Debug, Deserialize)]
pub struct GainsConfig {
    /// In-place turn (heading) gains
    #[serde(default = "default_turn_gains")]
    pub turn: PidGains,

    /// Straight-line drive gains
    #[serde(default = "default_straight_gains")]
    pub straight: PidGains,
}

/// Mock hardware parameters
#[derive(Clone, Debug, Deserialize)]
pub struct MockConfig {
    /// How long a mock gyro reports calibrating after calibrate(),
    /// in milliseconds (default: 1500)
    #[serde(default = "default_gyro_calibration_ms")]
    pub gyro_calibration_ms: u64,
}

// Default value functions
fn default_wheel_diameter() -> f64 {
    4.0
}
fn default_track_width() -> f64 {
    12.0
}
fn default_cycle_period_ms() -> u64 {
    20
}
fn default_calibration_settle_ms() -> u64 {
    2000
}
fn default_base_speed_pct() -> f64 {
    50.0
}
fn default_heading_deg() -> f64 {
    90.0
}
fn default_forward_rotation_deg() -> f64 {
    500.0
}
fn default_reverse_rotation_deg() -> f64 {
    500.0
}
fn default_turn_gains() -> PidGains {
    PidGains {
        kp: 0.15,
        ki: 0.02,
        kd: 0.01,
    }
}
fn default_straight_gains() -> PidGains {
    PidGains {
        kp: 0.12,
        ki: 0.02,
        kd: 0.01,
    }
}
fn default_gyro_calibration_ms() -> u64 {
    1500
}

impl Default for RobotConfig {
    fn default() -> Self {
        Self {
            wheel_diameter: default_wheel_diameter(),
            track_width: default_track_width(),
        }
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            cycle_period_ms: default_cycle_period_ms(),
            calibration_settle_ms: default_calibration_settle_ms(),
            base_speed_pct: default_base_speed_pct(),
        }
    }
}

impl Default for TargetsConfig {
    fn default() -> Self {
        Self {
            heading_deg: default_heading_deg(),
            forward_rotation_deg: default_forward_rotation_deg(),
            reverse_rotation_deg: default_reverse_rotation_deg(),
        }
    }
}

impl Default for GainsConfig {
    fn default() -> Self {
        Self {
            turn: default_turn_gains(),
            straight: default_straight_gains(),
        }
    }
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            gyro_calibration_ms: default_gyro_calibration_ms(),
        }
    }
}

impl Default for HelmsmanConfig {
    fn default() -> Self {
        Self {
            robot: RobotConfig::default(),
            control: ControlConfig::default(),
            targets: TargetsConfig::default(),
            gains: GainsConfig::default(),
            mock: MockConfig::default(),
        }
    }
}

impl HelmsmanConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            crate::error::HelmsmanError::Config(format!("Failed to read config file: {}", e))
        })?;
        let config: HelmsmanConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Control cycle period as a duration
    pub fn cycle_period(&self) -> Duration {
        Duration::from_millis(self.control.cycle_period_ms)
    }

    /// Calibration settle delay as a duration
    pub fn calibration_settle(&self) -> Duration {
        Duration::from_millis(self.control.calibration_settle_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_tuned_platform() {
        let config = HelmsmanConfig::default();

        assert_eq!(config.gains.turn.kp, 0.15);
        assert_eq!(config.gains.turn.ki, 0.02);
        assert_eq!(config.gains.turn.kd, 0.01);
        assert_eq!(config.gains.straight.kp, 0.12);
        assert_eq!(config.gains.straight.ki, 0.02);
        assert_eq!(config.gains.straight.kd, 0.01);

        assert_eq!(config.targets.heading_deg, 90.0);
        assert_eq!(config.targets.forward_rotation_deg, 500.0);
        assert_eq!(config.targets.reverse_rotation_deg, 500.0);

        assert_eq!(config.robot.wheel_diameter, 4.0);
        assert_eq!(config.robot.track_width, 12.0);

        assert_eq!(config.control.cycle_period_ms, 20);
        assert_eq!(config.control.calibration_settle_ms, 2000);
        assert_eq!(config.control.base_speed_pct, 50.0);
    }

    #[test]
    fn partial_toml_overrides_fill_with_defaults() {
        let toml_str = r#"
            [targets]
            heading_deg = 45.0

            [gains.turn]
            kp = 0.5
            ki = 0.0
            kd = 0.1
        "#;
        let config: HelmsmanConfig = toml::from_str(toml_str).unwrap();

        assert_eq!(config.targets.heading_deg, 45.0);
        // Untouched fields in an overridden section fall back to defaults
        assert_eq!(config.targets.forward_rotation_deg, 500.0);
        assert_eq!(config.gains.turn.kp, 0.5);
        // Untouched sections fall back entirely
        assert_eq!(config.gains.straight.kp, 0.12);
        assert_eq!(config.control.cycle_period_ms, 20);
    }

    #[test]
    fn durations_come_from_millis() {
        let config = HelmsmanConfig::default();
        assert_eq!(config.cycle_period(), Duration::from_millis(20));
        assert_eq!(config.calibration_settle(), Duration::from_millis(2000));
    }
}
