//! Helmsman - closed-loop motion control for a differential-drive robot
//!
//! Steers the robot to a target heading and drives it a target distance in a
//! straight line, while continuously dead-reckoning the pose from the wheel
//! rotation sensors.
//!
//! ## Multi-Threaded Architecture
//!
//! Two controller threads run concurrently, each an infinite periodic loop:
//!
//! - **Heading thread** (~50Hz): dual-gyro PID, commands an in-place
//!   differential turn toward the target heading
//! - **Distance thread** (~50Hz): encoder PID, commands forward drive with
//!   left/right trim toward the target cumulative rotation
//!
//! Both invoke the pose estimator every cycle; the main thread is an idle
//! supervisor that performs no control work.

use helmsman::config::HelmsmanConfig;
use helmsman::error::{HelmsmanError, Result};
use helmsman::hardware::mock::MockRig;
use helmsman::pose::Pose2D;
use helmsman::shared::SharedState;
use helmsman::threads::spawn_threads;

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("helmsman=info".parse().unwrap()),
        )
        .init();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    let config = if args.len() > 1 && !args[1].starts_with("--") {
        // Load config from file
        let config_path = Path::new(&args[1]);
        info!("Loading configuration from {:?}", config_path);
        HelmsmanConfig::load(config_path)?
    } else if Path::new("helmsman.toml").exists() {
        info!("Loading configuration from helmsman.toml");
        HelmsmanConfig::load(Path::new("helmsman.toml"))?
    } else {
        info!("Using default configuration");
        HelmsmanConfig::default()
    };

    info!("Helmsman v{}", env!("CARGO_PKG_VERSION"));

    // Log configuration
    info!(
        "Robot geometry: wheel diameter {:.1}, track width {:.1}",
        config.robot.wheel_diameter, config.robot.track_width
    );
    info!(
        "Targets: heading {:.1}°, forward rotation {:.0}° (reverse rotation {:.0}° declared, unused)",
        config.targets.heading_deg,
        config.targets.forward_rotation_deg,
        config.targets.reverse_rotation_deg
    );
    info!(
        "Gains: turn kp={} ki={} kd={}, straight kp={} ki={} kd={}",
        config.gains.turn.kp,
        config.gains.turn.ki,
        config.gains.turn.kd,
        config.gains.straight.kp,
        config.gains.straight.ki,
        config.gains.straight.kd
    );

    // Initialize shared state - dead reckoning starts at the origin
    let shared_state = Arc::new(SharedState::new(Pose2D::default()));

    // Assemble the drive hardware. Real device drivers attach through the
    // hardware traits; the mock rig stands in so the node runs anywhere.
    let rig = MockRig::new(Duration::from_millis(config.mock.gyro_calibration_ms));
    info!("Using mock drive hardware (6 motors, 3 encoders, 2 gyros)");

    // Set up shutdown signal handler
    let ctrlc_state = Arc::clone(&shared_state);
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        ctrlc_state.signal_shutdown();
    })
    .map_err(|e| HelmsmanError::Other(format!("Error setting Ctrl-C handler: {}", e)))?;

    // Spawn controller threads
    info!("Starting controller threads...");
    let handles = spawn_threads(config.clone(), Arc::clone(&shared_state), rig.hardware())?;

    // Main thread: idle supervisor. Performs no control work, just keeps the
    // process alive, logs pose telemetry and watches the worker threads.
    let idle_interval = Duration::from_millis(100);
    let telemetry_interval = Duration::from_secs(2);
    let mut last_telemetry = Instant::now();

    loop {
        std::thread::sleep(idle_interval);

        if shared_state.should_shutdown() {
            break;
        }

        // Check if threads are still alive
        if handles.heading.is_finished() || handles.distance.is_finished() {
            warn!("A controller thread exited unexpectedly");
            break;
        }

        if last_telemetry.elapsed() >= telemetry_interval {
            let pose = shared_state.pose();
            info!(
                "Pose estimate: x={:.3} y={:.3} theta={:.3}rad",
                pose.x, pose.y, pose.theta
            );
            last_telemetry = Instant::now();
        }
    }

    // Signal shutdown and wait for the controller threads
    shared_state.signal_shutdown();
    info!("Waiting for controller threads to finish...");

    if let Err(e) = handles.heading.join() {
        error!("Heading thread panicked: {:?}", e);
    }
    if let Err(e) = handles.distance.join() {
        error!("Distance thread panicked: {:?}", e);
    }

    let pose = shared_state.pose();
    info!(
        "Final pose estimate: x={:.3} y={:.3} theta={:.3}rad",
        pose.x, pose.y, pose.theta
    );
    info!("Helmsman finished");
    Ok(())
}
