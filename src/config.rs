//! # Configuration Module
//!
//! Typed, validated receiver configuration.
//!
//! The receiver has no runtime configuration file: the TOML document in
//! `config/default.toml` is compiled into the binary and parsed at startup.
//! Every field has a serde default, so a partial document is accepted.

use serde::de::Error;
use serde::Deserialize;
use std::time::Duration;

use crate::channels::ChannelRange;
use crate::error::{ReceiverError, Result};

/// Built-in configuration document
const BUILTIN_CONFIG: &str = include_str!("../config/default.toml");

/// Number of servo outputs driven by the receiver
pub const SERVO_COUNT: usize = 4;

/// Largest commandable servo angle in degrees
pub const MAX_ANGLE: u8 = 180;

/// Serial baud rates supported by common radio modems
const VALID_BAUD_RATES: &[u32] = &[1200, 2400, 4800, 9600, 19200, 38400, 57600, 115200];

/// Default inter-payload gap in bit times (3.5 characters of 10 bits)
const FRAME_GAP_BITS: u64 = 35;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub servo: ServoConfig,
    #[serde(default)]
    pub channels: ChannelsConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Radio link configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LinkConfig {
    #[serde(default = "default_ports")]
    pub ports: Vec<String>,

    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Inter-byte gap that starts a new payload; derived from `baud_rate` when unset
    #[serde(default)]
    pub frame_gap_us: Option<u64>,
}

/// Servo output configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServoConfig {
    #[serde(default = "default_pins")]
    pub pins: Vec<u8>,

    #[serde(default = "default_period_ms")]
    pub period_ms: u64,

    #[serde(default = "default_min_pulse_us")]
    pub min_pulse_us: u16,

    #[serde(default = "default_max_pulse_us")]
    pub max_pulse_us: u16,

    #[serde(default = "default_neutral_angle")]
    pub neutral_angle: u8,
}

/// Channel mapping configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelsConfig {
    #[serde(default = "default_roll_range")]
    pub roll: ChannelRange,

    #[serde(default = "default_pitch_range")]
    pub pitch: ChannelRange,

    #[serde(default = "default_yaw_range")]
    pub yaw: ChannelRange,

    #[serde(default = "default_trim_range")]
    pub trim: ChannelRange,

    /// Proportional value held before the first packet arrives
    #[serde(default = "default_neutral_angle")]
    pub neutral: u8,

    /// Discrete value held before the first packet arrives
    #[serde(default = "default_discrete_default")]
    pub discrete_default: u8,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive; `RUST_LOG` takes precedence
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

// Default value functions
fn default_ports() -> Vec<String> {
    vec!["/dev/ttyUSB0".to_string(), "/dev/ttyAMA0".to_string(), "/dev/serial0".to_string()]
}
fn default_baud_rate() -> u32 { 9600 }

fn default_pins() -> Vec<u8> { vec![4, 5, 6, 7] }
fn default_period_ms() -> u64 { 20 }
fn default_min_pulse_us() -> u16 { 1000 }
fn default_max_pulse_us() -> u16 { 2000 }
fn default_neutral_angle() -> u8 { 90 }

fn default_roll_range() -> ChannelRange { ChannelRange::new(10, 170) }
fn default_pitch_range() -> ChannelRange { ChannelRange::new(10, 170) }
fn default_yaw_range() -> ChannelRange { ChannelRange::new(25, 155) }
fn default_trim_range() -> ChannelRange { ChannelRange::new(10, 170) }
fn default_discrete_default() -> u8 { 1 }

fn default_log_filter() -> String { "info".to_string() }

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            ports: default_ports(),
            baud_rate: default_baud_rate(),
            frame_gap_us: None,
        }
    }
}

impl Default for ServoConfig {
    fn default() -> Self {
        Self {
            pins: default_pins(),
            period_ms: default_period_ms(),
            min_pulse_us: default_min_pulse_us(),
            max_pulse_us: default_max_pulse_us(),
            neutral_angle: default_neutral_angle(),
        }
    }
}

impl Default for ChannelsConfig {
    fn default() -> Self {
        Self {
            roll: default_roll_range(),
            pitch: default_pitch_range(),
            yaw: default_yaw_range(),
            trim: default_trim_range(),
            neutral: default_neutral_angle(),
            discrete_default: default_discrete_default(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { filter: default_log_filter() }
    }
}

impl LinkConfig {
    /// Silence between two reads after which buffered bytes are dropped.
    ///
    /// Defaults to 3.5 character times (10 bits each) at `baud_rate`,
    /// about 3.6 ms at 9600 baud.
    pub fn frame_gap(&self) -> Duration {
        match self.frame_gap_us {
            Some(us) => Duration::from_micros(us),
            None => Duration::from_micros(FRAME_GAP_BITS * 1_000_000 / u64::from(self.baud_rate.max(1))),
        }
    }
}

impl ServoConfig {
    /// PWM refresh period
    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }
}

impl ChannelsConfig {
    /// Target ranges of the proportional channels in order ch1..ch4
    pub fn ranges(&self) -> [ChannelRange; SERVO_COUNT] {
        [self.roll, self.pitch, self.yaw, self.trim]
    }
}

fn invalid(msg: impl std::fmt::Display) -> ReceiverError {
    ReceiverError::Config(toml::de::Error::custom(msg))
}

impl Config {
    /// Load the configuration compiled into the binary
    ///
    /// # Errors
    ///
    /// Returns error if the built-in document fails to parse or validate
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_receiver::config::Config;
    ///
    /// let config = Config::builtin()?;
    /// assert_eq!(config.servo.pins, vec![4, 5, 6, 7]);
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn builtin() -> Result<Self> {
        Self::from_toml_str(BUILTIN_CONFIG)
    }

    /// Parse and validate a configuration document
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - TOML parsing fails
    /// - Validation fails
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        // Link
        if self.link.ports.is_empty() || self.link.ports.iter().any(String::is_empty) {
            return Err(invalid("link ports must be a non-empty list of device paths"));
        }

        if !VALID_BAUD_RATES.contains(&self.link.baud_rate) {
            return Err(invalid(format!(
                "baud_rate must be one of: {:?}",
                VALID_BAUD_RATES
            )));
        }

        if let Some(gap) = self.link.frame_gap_us {
            if gap == 0 || gap > 1_000_000 {
                return Err(invalid("frame_gap_us must be between 1 and 1000000"));
            }
        }

        // Servo
        if self.servo.pins.len() != SERVO_COUNT {
            return Err(invalid(format!("servo pins must list exactly {} pins", SERVO_COUNT)));
        }

        for (i, pin) in self.servo.pins.iter().enumerate() {
            if self.servo.pins[..i].contains(pin) {
                return Err(invalid(format!("servo pin {} is assigned twice", pin)));
            }
        }

        if self.servo.period_ms < 5 || self.servo.period_ms > 50 {
            return Err(invalid("period_ms must be between 5 and 50"));
        }

        if self.servo.min_pulse_us == 0 || self.servo.min_pulse_us >= self.servo.max_pulse_us {
            return Err(invalid("min_pulse_us must be non-zero and less than max_pulse_us"));
        }

        if u64::from(self.servo.max_pulse_us) >= self.servo.period_ms * 1000 {
            return Err(invalid("max_pulse_us must be shorter than the PWM period"));
        }

        if self.servo.neutral_angle > MAX_ANGLE {
            return Err(invalid("servo neutral_angle must be between 0 and 180"));
        }

        // Channels
        for (name, range) in [
            ("roll", self.channels.roll),
            ("pitch", self.channels.pitch),
            ("yaw", self.channels.yaw),
            ("trim", self.channels.trim),
        ] {
            if range.min >= range.max || range.max > MAX_ANGLE {
                return Err(invalid(format!(
                    "{} range must satisfy min < max <= 180 (got {}..={})",
                    name, range.min, range.max
                )));
            }
        }

        if self.channels.neutral > MAX_ANGLE {
            return Err(invalid("channels neutral must be between 0 and 180"));
        }

        // Logging
        if self.logging.filter.trim().is_empty() {
            return Err(invalid("logging filter cannot be empty"));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_valid_config() -> Config {
        Config::default()
    }

    #[test]
    fn test_default_config_is_valid() {
        assert!(create_valid_config().validate().is_ok());
    }

    #[test]
    fn test_builtin_config_matches_defaults() {
        let config = Config::builtin().unwrap();
        assert_eq!(config.link.ports, default_ports());
        assert_eq!(config.link.baud_rate, 9600);
        assert_eq!(config.link.frame_gap_us, None);
        assert_eq!(config.servo.pins, vec![4, 5, 6, 7]);
        assert_eq!(config.servo.period_ms, 20);
        assert_eq!(config.servo.min_pulse_us, 1000);
        assert_eq!(config.servo.max_pulse_us, 2000);
        assert_eq!(config.servo.neutral_angle, 90);
        assert_eq!(config.channels.roll, ChannelRange::new(10, 170));
        assert_eq!(config.channels.pitch, ChannelRange::new(10, 170));
        assert_eq!(config.channels.yaw, ChannelRange::new(25, 155));
        assert_eq!(config.channels.trim, ChannelRange::new(10, 170));
        assert_eq!(config.channels.neutral, 90);
        assert_eq!(config.channels.discrete_default, 1);
        assert_eq!(config.logging.filter, "info");
    }

    #[test]
    fn test_empty_document_uses_defaults() {
        let config = Config::from_toml_str("").unwrap();
        assert_eq!(config.servo.pins, default_pins());
        assert_eq!(config.channels.yaw, default_yaw_range());
    }

    #[test]
    fn test_partial_document() {
        let toml_content = r#"
[link]
ports = ["/dev/ttyS1"]

[channels]
yaw = { min = 30, max = 150 }
"#;
        let config = Config::from_toml_str(toml_content).unwrap();
        assert_eq!(config.link.ports, vec!["/dev/ttyS1".to_string()]);
        assert_eq!(config.link.baud_rate, default_baud_rate());
        assert_eq!(config.channels.yaw, ChannelRange::new(30, 150));
        assert_eq!(config.channels.roll, default_roll_range());
    }

    #[test]
    fn test_malformed_document() {
        let result = Config::from_toml_str("[servo\npins = 4");
        assert!(matches!(result, Err(ReceiverError::Config(_))));
    }

    #[test]
    fn test_ranges_order() {
        let config = create_valid_config();
        let ranges = config.channels.ranges();
        assert_eq!(ranges[0], config.channels.roll);
        assert_eq!(ranges[1], config.channels.pitch);
        assert_eq!(ranges[2], config.channels.yaw);
        assert_eq!(ranges[3], config.channels.trim);
    }

    #[test]
    fn test_durations() {
        let config = create_valid_config();
        assert_eq!(config.link.frame_gap(), Duration::from_micros(3645));
        assert_eq!(config.servo.period(), Duration::from_millis(20));
    }

    #[test]
    fn test_empty_ports() {
        let mut config = create_valid_config();
        config.link.ports = vec![];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_blank_port_entry() {
        let mut config = create_valid_config();
        config.link.ports = vec!["/dev/ttyUSB0".to_string(), String::new()];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_invalid_baud_rate() {
        let mut config = create_valid_config();
        config.link.baud_rate = 420_000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_valid_baud_rates() {
        for &baud in VALID_BAUD_RATES {
            let mut config = create_valid_config();
            config.link.baud_rate = baud;
            assert!(config.validate().is_ok(), "Baud rate {} should be valid", baud);
        }
    }

    #[test]
    fn test_frame_gap_zero() {
        let mut config = create_valid_config();
        config.link.frame_gap_us = Some(0);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_gap_too_high() {
        let mut config = create_valid_config();
        config.link.frame_gap_us = Some(1_000_001);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_frame_gap_follows_baud_rate() {
        let mut config = create_valid_config();
        config.link.baud_rate = 115_200;
        assert_eq!(config.link.frame_gap(), Duration::from_micros(303));
        config.link.baud_rate = 1200;
        assert_eq!(config.link.frame_gap(), Duration::from_micros(29_166));
    }

    #[test]
    fn test_frame_gap_override() {
        let mut config = create_valid_config();
        config.link.frame_gap_us = Some(8000);
        assert!(config.validate().is_ok());
        assert_eq!(config.link.frame_gap(), Duration::from_millis(8));
    }

    #[test]
    fn test_wrong_pin_count() {
        let mut config = create_valid_config();
        config.servo.pins = vec![4, 5, 6];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_duplicate_pin() {
        let mut config = create_valid_config();
        config.servo.pins = vec![4, 5, 5, 7];
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_period_out_of_range() {
        let mut config = create_valid_config();
        config.servo.period_ms = 4;
        assert!(config.validate().is_err());
        config.servo.period_ms = 51;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_min_pulse_not_below_max() {
        let mut config = create_valid_config();
        config.servo.min_pulse_us = 2000;
        config.servo.max_pulse_us = 2000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_zero_min_pulse() {
        let mut config = create_valid_config();
        config.servo.min_pulse_us = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_max_pulse_exceeds_period() {
        let mut config = create_valid_config();
        config.servo.period_ms = 5;
        config.servo.max_pulse_us = 5000;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_servo_neutral_too_high() {
        let mut config = create_valid_config();
        config.servo.neutral_angle = 181;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_inverted_channel_range() {
        let mut config = create_valid_config();
        config.channels.yaw = ChannelRange::new(155, 25);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_channel_range_beyond_180() {
        let mut config = create_valid_config();
        config.channels.trim = ChannelRange::new(10, 200);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_channel_neutral_too_high() {
        let mut config = create_valid_config();
        config.channels.neutral = 200;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_log_filter() {
        let mut config = create_valid_config();
        config.logging.filter = "  ".to_string();
        assert!(config.validate().is_err());
    }
}
