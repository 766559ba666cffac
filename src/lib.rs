//! # RC Receiver Library
//!
//! Drive four RC servos from a 6-channel radio packet stream.
//!
//! This library provides the receiver-side pipeline: decoding radio packets,
//! rescaling channel values into servo ranges, and driving 50 Hz servo pulse
//! outputs.

pub mod channels;
pub mod config;
pub mod control;
pub mod error;
pub mod link;
pub mod servo;
