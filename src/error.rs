//! # Error Types
//!
//! Custom error types for the RC receiver using `thiserror`.

use thiserror::Error;

/// Main error type for the RC receiver
#[derive(Debug, Error)]
pub enum ReceiverError {
    /// Radio link errors (serial port, framing)
    #[error("Radio link error: {0}")]
    Link(String),

    /// PWM output errors
    #[error("PWM output error: {0}")]
    Pwm(String),

    /// GPIO peripheral errors
    #[error("GPIO error: {0}")]
    Gpio(#[from] rppal::gpio::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for the RC receiver
pub type Result<T> = std::result::Result<T, ReceiverError>;
