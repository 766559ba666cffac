//! # Radio Link Module
//!
//! Receiving side of the radio link.
//!
//! This module handles:
//! - The 6-byte packet format
//! - Reassembling payloads from the serial byte stream
//! - Handing the newest packet to the control loop (last value wins)
//! - The [`LinkReceiver`] polling seam used by the control loop

pub mod assembler;
pub mod mailbox;
pub mod packet;
pub mod serial;

pub use assembler::PacketAssembler;
pub use mailbox::{mailbox, MailboxReceiver, PacketSender};
pub use packet::{Packet, PACKET_SIZE, RAW_PROPORTIONAL_MAX};
pub use serial::RadioSerial;

/// Non-blocking source of inbound packets.
#[cfg_attr(test, mockall::automock)]
pub trait LinkReceiver {
    /// Returns the packet that arrived since the last poll, if any.
    ///
    /// Must return immediately; `None` is the normal between-packets state.
    fn poll(&mut self) -> Option<Packet>;
}
