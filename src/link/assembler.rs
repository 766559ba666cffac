//! # Packet Assembler
//!
//! Reassembles fixed-size radio payloads from a serial byte stream.
//!
//! The radio modem forwards each payload as 6 back-to-back bytes, but a
//! serial read may return any slice of the stream. Bytes are buffered until a
//! full payload is available. Since the wire format has no sync byte, the
//! reader calls [`PacketAssembler::reset`] after an idle gap so a lost byte
//! only corrupts a single payload instead of shifting every later one.

use bytes::{Buf, BytesMut};

use super::packet::{Packet, PACKET_SIZE};

/// Buffers serial bytes and yields complete packets.
#[derive(Debug, Default)]
pub struct PacketAssembler {
    buffer: BytesMut,
}

impl PacketAssembler {
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(PACKET_SIZE * 4),
        }
    }

    /// Appends received bytes and returns every packet completed by them,
    /// oldest first.
    ///
    /// # Examples
    ///
    /// ```
    /// use rc_receiver::link::PacketAssembler;
    ///
    /// let mut assembler = PacketAssembler::new();
    /// assert!(assembler.push(&[0, 254, 127]).is_empty());
    ///
    /// let packets = assembler.push(&[90, 1, 0]);
    /// assert_eq!(packets.len(), 1);
    /// assert_eq!(packets[0].ch4, 90);
    /// ```
    pub fn push(&mut self, data: &[u8]) -> Vec<Packet> {
        self.buffer.extend_from_slice(data);

        let mut packets = Vec::with_capacity(self.buffer.len() / PACKET_SIZE);
        while self.buffer.len() >= PACKET_SIZE {
            let mut payload = [0u8; PACKET_SIZE];
            self.buffer.copy_to_slice(&mut payload);
            packets.push(Packet::from_array(payload));
        }
        packets
    }

    /// Number of buffered bytes that do not yet form a packet.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Drops any partial payload.
    pub fn reset(&mut self) {
        self.buffer.clear();
    }
}
