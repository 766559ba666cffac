//! # RC Receiver
//!
//! Drive four RC servos from a 6-channel radio packet stream.
//!
//! This application reads packets from a serial radio modem and turns them
//! into servo positions on four GPIO pins.

use anyhow::{anyhow, Result};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use rc_receiver::config::Config;
use rc_receiver::control::ControlLoop;
use rc_receiver::link::{mailbox, RadioSerial};
use rc_receiver::servo::GpioPwm;

/// Main entry point for the RC receiver
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load the built-in configuration
///    - Set up logging with tracing subscriber
///    - Open the radio modem and start the reader task
///    - Claim the servo pins and move every servo to neutral (90°)
///
/// 2. **Main Loop**
///    - Poll for a packet; when one is available, map it and update servos 1-4
///    - When none is available, hold the last positions
///    - Handle Ctrl+C for shutdown
///
/// 3. **Bring-up Failure**
///    - If the radio or the servo outputs cannot be started, log the error
///      and halt until the process is terminated. Servos are never driven
///      without a command source.
///
/// # Examples
///
/// ```bash
/// cargo run --release
/// ```
///
/// Expected output:
/// ```text
/// INFO rc_receiver: RC Receiver v0.1.0 starting...
/// INFO rc_receiver::link::serial: Opened radio modem at /dev/ttyUSB0 (9600 baud)
/// INFO rc_receiver::control: All 4 servos at neutral, waiting for packets
/// INFO rc_receiver::control: Starting control loop
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::builtin()?;

    // Initialize logging
    let (writer, _log_guard) = tracing_appender::non_blocking(std::io::stdout());
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .init();

    info!("RC Receiver v{} starting...", env!("CARGO_PKG_VERSION"));

    // Radio link
    let serial = match RadioSerial::open(&config.link) {
        Ok(serial) => serial,
        Err(e) => return halt(format!("Setup, {}", e)).await,
    };
    info!("Radio link ready at: {}", serial.device_path());

    let (sender, receiver) = mailbox();
    let _reader = serial.spawn_reader(sender, config.link.frame_gap());

    // Servo outputs
    let output = match GpioPwm::new(&config.servo.pins) {
        Ok(output) => output,
        Err(e) => return halt(format!("Setup, servo outputs unavailable: {}", e)).await,
    };

    let mut control = match ControlLoop::from_config(receiver, output, &config) {
        Ok(control) => control,
        Err(e) => return halt(format!("Setup, {}", e)).await,
    };
    if let Err(e) = control.initialize() {
        return halt(format!("Setup, {}", e)).await;
    }

    info!("Press Ctrl+C to exit");

    tokio::select! {
        _ = control.run() => {}

        _ = tokio::signal::ctrl_c() => {
            info!("Received Ctrl+C, shutting down...");
            info!("Total packets received: {}", control.packet_count());
        }
    }

    Ok(())
}

/// Report a fatal bring-up failure and wait for the process to be terminated.
async fn halt(reason: String) -> Result<()> {
    error!("{}", reason);
    error!("Halted. Press Ctrl+C to exit");

    tokio::signal::ctrl_c().await?;
    Err(anyhow!(reason))
}
