//! # Channels Module
//!
//! Turns decoded packets into per-channel values.
//!
//! This module handles:
//! - Rescaling the four proportional channels into their servo ranges
//! - Passing the two discrete channels through unchanged
//! - Holding the last decoded values between packets

pub mod mapper;
pub mod state;

pub use mapper::{ChannelMapper, ChannelRange};
pub use state::ChannelState;
