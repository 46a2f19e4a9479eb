//! In-process duplex byte pipe.
//!
//! [`MemoryLink::pair`] returns two connected ends. Each direction is a
//! bounded `heapless::Deque`, matching the fixed receive buffer of a
//! UART: when it is full the new byte is dropped and the writer gets
//! [`LinkError::Overflow`]. Writing after the peer end is dropped yields
//! [`LinkError::Disconnected`].

use std::sync::{Arc, Mutex};

use heapless::Deque;
use log::warn;

use crate::error::LinkError;
use crate::protocol::ByteLink;

/// Bytes buffered per direction.
pub const LINK_CAPACITY: usize = 64;

type Queue = Arc<Mutex<Deque<u8, LINK_CAPACITY>>>;

pub struct MemoryLink {
    rx: Queue,
    tx: Queue,
}

impl MemoryLink {
    /// Two connected ends: bytes written on one are read on the other.
    pub fn pair() -> (Self, Self) {
        let a_to_b: Queue = Arc::new(Mutex::new(Deque::new()));
        let b_to_a: Queue = Arc::new(Mutex::new(Deque::new()));
        (
            Self {
                rx: b_to_a.clone(),
                tx: a_to_b.clone(),
            },
            Self {
                rx: a_to_b,
                tx: b_to_a,
            },
        )
    }

    /// Bytes waiting to be read on this end.
    pub fn pending(&self) -> usize {
        self.rx.lock().map(|q| q.len()).unwrap_or(0)
    }
}

impl ByteLink for MemoryLink {
    type Error = LinkError;

    fn read_byte(&mut self) -> Result<Option<u8>, LinkError> {
        let mut q = self.rx.lock().map_err(|_| LinkError::Io)?;
        Ok(q.pop_front())
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), LinkError> {
        // One reference here, one in the peer's `rx`.
        if Arc::strong_count(&self.tx) < 2 {
            return Err(LinkError::Disconnected);
        }
        let mut q = self.tx.lock().map_err(|_| LinkError::Io)?;
        q.push_back(byte).map_err(|dropped| {
            warn!("MemoryLink: buffer full, dropped 0x{dropped:02X}");
            LinkError::Overflow
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_cross_in_order() {
        let (mut a, mut b) = MemoryLink::pair();
        a.write_byte(0x01).unwrap();
        a.write_byte(0x02).unwrap();
        b.write_byte(0x88).unwrap();
        assert_eq!(b.pending(), 2);
        assert_eq!(b.read_byte().unwrap(), Some(0x01));
        assert_eq!(b.read_byte().unwrap(), Some(0x02));
        assert_eq!(b.read_byte().unwrap(), None);
        assert_eq!(a.read_byte().unwrap(), Some(0x88));
    }

    #[test]
    fn overflow_drops_newest() {
        let (mut a, mut b) = MemoryLink::pair();
        for i in 0..LINK_CAPACITY {
            a.write_byte(i as u8).unwrap();
        }
        assert_eq!(a.write_byte(0xFF), Err(LinkError::Overflow));
        assert_eq!(b.drain_inbound().unwrap(), LINK_CAPACITY);
    }

    #[test]
    fn write_after_peer_drop_fails() {
        let (mut a, b) = MemoryLink::pair();
        drop(b);
        assert_eq!(a.write_byte(0x00), Err(LinkError::Disconnected));
    }
}
