//! Byte link abstraction — the serial radio pipe between host and peripherals.
//!
//! Concrete implementations:
//! - [`MemoryLink`](crate::adapters::memory_link::MemoryLink) — bounded in-process duplex pipe
//! - [`SimRig`](crate::sim::SimRig) — host-facing end of the simulated peripherals
//!
//! The host controller and both peripheral loops are generic over
//! `ByteLink`, so a real UART adapter plugs in with zero changes to the
//! game logic.

/// Non-blocking single-byte transport.
pub trait ByteLink {
    /// Error type for this link.
    type Error: core::fmt::Debug;

    /// Read one byte if available.
    /// Returns `Ok(None)` when nothing is pending; never blocks.
    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error>;

    /// Queue one byte for transmission.
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error>;

    /// Flush any buffered output.
    fn flush(&mut self) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Discard every pending inbound byte. Returns how many were dropped.
    fn drain_inbound(&mut self) -> Result<usize, Self::Error> {
        let mut dropped = 0;
        while self.read_byte()?.is_some() {
            dropped += 1;
        }
        Ok(dropped)
    }
}

/// A null link that discards all writes and never reads.
/// Useful as a default when no radio is attached.
pub struct NullLink;

impl ByteLink for NullLink {
    type Error = ();

    fn read_byte(&mut self) -> Result<Option<u8>, ()> {
        Ok(None)
    }

    fn write_byte(&mut self, _byte: u8) -> Result<(), ()> {
        Ok(())
    }
}

impl<L: ByteLink + ?Sized> ByteLink for &mut L {
    type Error = L::Error;

    fn read_byte(&mut self) -> Result<Option<u8>, Self::Error> {
        (**self).read_byte()
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write_byte(byte)
    }

    fn flush(&mut self) -> Result<(), Self::Error> {
        (**self).flush()
    }
}
