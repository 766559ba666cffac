//! # Packet Mailbox
//!
//! Single-slot hand-off between the serial reader task and the control loop.
//!
//! Only the newest command matters to a servo, so publishing overwrites a
//! packet that has not been taken yet. There is never a backlog.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::packet::Packet;
use super::LinkReceiver;

type Slot = Arc<Mutex<Option<Packet>>>;

/// Creates a connected sender/receiver pair sharing one slot.
///
/// # Examples
///
/// ```
/// use rc_receiver::link::{mailbox, LinkReceiver, Packet};
///
/// let (sender, mut receiver) = mailbox();
/// sender.publish(Packet::from_array([1; 6]));
/// sender.publish(Packet::from_array([2; 6]));
///
/// // Last value wins
/// assert_eq!(receiver.poll(), Some(Packet::from_array([2; 6])));
/// assert_eq!(receiver.poll(), None);
/// ```
#[must_use]
pub fn mailbox() -> (PacketSender, MailboxReceiver) {
    let slot: Slot = Arc::new(Mutex::new(None));
    (
        PacketSender { slot: Arc::clone(&slot) },
        MailboxReceiver { slot },
    )
}

fn lock(slot: &Slot) -> MutexGuard<'_, Option<Packet>> {
    // The slot holds plain data, so a poisoned lock is still consistent.
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Producer half, owned by the serial reader task.
#[derive(Debug)]
pub struct PacketSender {
    slot: Slot,
}

impl PacketSender {
    /// Stores `packet`, replacing any packet not yet taken.
    ///
    /// Returns `true` if an unconsumed packet was overwritten.
    pub fn publish(&self, packet: Packet) -> bool {
        lock(&self.slot).replace(packet).is_some()
    }
}

/// Consumer half, polled by the control loop.
#[derive(Debug)]
pub struct MailboxReceiver {
    slot: Slot,
}

impl LinkReceiver for MailboxReceiver {
    fn poll(&mut self) -> Option<Packet> {
        lock(&self.slot).take()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_mailbox_polls_none() {
        let (_sender, mut receiver) = mailbox();
        assert_eq!(receiver.poll(), None);
    }

    #[test]
    fn test_packet_is_taken_once() {
        let (sender, mut receiver) = mailbox();
        let packet = Packet::from_array([0, 254, 127, 90, 1, 0]);

        assert!(!sender.publish(packet));
        assert_eq!(receiver.poll(), Some(packet));
        assert_eq!(receiver.poll(), None);
    }

    #[test]
    fn test_newer_packet_overwrites_unconsumed() {
        let (sender, mut receiver) = mailbox();

        assert!(!sender.publish(Packet::from_array([1; 6])));
        assert!(sender.publish(Packet::from_array([2; 6])));
        assert!(sender.publish(Packet::from_array([3; 6])));

        assert_eq!(receiver.poll(), Some(Packet::from_array([3; 6])));
        assert_eq!(receiver.poll(), None);
    }

    #[test]
    fn test_packet_survives_sender_drop() {
        let (sender, mut receiver) = mailbox();
        sender.publish(Packet::from_array([7; 6]));
        drop(sender);

        assert_eq!(receiver.poll(), Some(Packet::from_array([7; 6])));
    }

    #[test]
    fn test_cross_thread_handoff() {
        let (sender, mut receiver) = mailbox();

        std::thread::spawn(move || {
            for value in 0..=10u8 {
                sender.publish(Packet::from_array([value; 6]));
            }
        })
        .join()
        .unwrap();

        assert_eq!(receiver.poll(), Some(Packet::from_array([10; 6])));
    }
}
