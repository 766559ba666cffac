//! # Serial Radio Link
//!
//! Receives radio payloads from a serial-attached radio modem.
//!
//! This module handles:
//! - Opening the modem's serial port (8N1, no flow control)
//! - Reading the byte stream in a background task
//! - Reassembling 6-byte payloads and resynchronizing on inter-payload silence
//! - Publishing the newest packet to the control loop's mailbox

use std::time::Duration;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_serial::SerialPortBuilderExt;
use tracing::{debug, error, info, trace, warn};

use super::assembler::PacketAssembler;
use super::mailbox::PacketSender;
use crate::config::LinkConfig;
use crate::error::{ReceiverError, Result};

/// Size of the serial read buffer
const READ_BUFFER_SIZE: usize = 64;

/// Radio modem serial port handler
pub struct RadioSerial {
    /// Serial port handle
    port: tokio_serial::SerialStream,
    /// Device path (e.g., /dev/ttyUSB0)
    device_path: String,
}

impl std::fmt::Debug for RadioSerial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RadioSerial")
            .field("device_path", &self.device_path)
            .finish_non_exhaustive()
    }
}

impl RadioSerial {
    /// Open the radio modem using the configured device paths.
    ///
    /// # Errors
    ///
    /// Returns [`ReceiverError::Link`] if none of the configured paths can be opened.
    pub fn open(config: &LinkConfig) -> Result<Self> {
        let paths: Vec<&str> = config.ports.iter().map(String::as_str).collect();
        Self::open_with_paths(&paths, config.baud_rate)
    }

    /// Open the radio modem, trying each device path in order.
    ///
    /// # Arguments
    ///
    /// * `paths` - Device paths to try (e.g., &["/dev/ttyUSB0"])
    /// * `baud_rate` - Line speed of the modem
    pub fn open_with_paths(paths: &[&str], baud_rate: u32) -> Result<Self> {
        for path in paths {
            debug!("Trying to open serial port: {}", path);

            match Self::open_port(path, baud_rate) {
                Ok(port) => {
                    info!("Opened radio modem at {} ({} baud)", path, baud_rate);
                    return Ok(Self {
                        port,
                        device_path: path.to_string(),
                    });
                }
                Err(e) => {
                    warn!("Failed to open {}: {}", path, e);
                }
            }
        }

        Err(ReceiverError::Link(format!(
            "Radio hardware not responding (tried: {})",
            paths.join(", ")
        )))
    }

    fn open_port(path: &str, baud_rate: u32) -> Result<tokio_serial::SerialStream> {
        tokio_serial::new(path, baud_rate)
            .data_bits(tokio_serial::DataBits::Eight)
            .parity(tokio_serial::Parity::None)
            .stop_bits(tokio_serial::StopBits::One)
            .flow_control(tokio_serial::FlowControl::None)
            .open_native_async()
            .map_err(|e| ReceiverError::Link(format!("Failed to open {}: {}", path, e)))
    }

    /// Get the device path of the opened serial port
    pub fn device_path(&self) -> &str {
        &self.device_path
    }

    /// Spawn the background task that feeds `sender` with received packets.
    ///
    /// The task ends when the port closes or fails. The control loop then
    /// keeps holding the last commanded positions.
    pub fn spawn_reader(self, sender: PacketSender, frame_gap: Duration) -> JoinHandle<()> {
        let Self { mut port, device_path } = self;

        tokio::spawn(async move {
            if let Err(e) = read_packets(&mut port, &sender, frame_gap).await {
                error!("Radio link on {} stopped: {}", device_path, e);
            }
        })
    }
}

/// Read payloads from `reader` until it closes, publishing each complete packet.
///
/// Bytes that arrive more than `frame_gap` after the previous read start a
/// new payload: any partial payload still buffered is discarded first. A
/// transmitter sending at 50 Hz leaves the line silent between payloads, so
/// a lost byte costs at most one packet.
///
/// # Errors
///
/// Returns [`ReceiverError::Link`] when the stream reaches end-of-file and
/// [`ReceiverError::Io`] when a read fails.
pub async fn read_packets<R>(reader: &mut R, sender: &PacketSender, frame_gap: Duration) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    let mut assembler = PacketAssembler::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];
    let mut last_read: Option<Instant> = None;

    loop {
        let n = reader.read(&mut buf).await?;
        if n == 0 {
            return Err(ReceiverError::Link("serial stream closed".to_string()));
        }

        let now = Instant::now();
        if let Some(last) = last_read {
            let silence = now.duration_since(last);
            if silence > frame_gap && assembler.pending() > 0 {
                debug!(
                    "Discarding {} byte(s) of partial payload after {:?} of silence",
                    assembler.pending(),
                    silence
                );
                assembler.reset();
            }
        }
        last_read = Some(now);

        for packet in assembler.push(&buf[..n]) {
            if sender.publish(packet) {
                trace!("Overwrote unconsumed packet");
            }
        }
    }
}
