//! Radio protocol — single-byte codec and the byte-link boundary.
//!
//! ```text
//!  Host ──encode_command──▶ byte ──▶ link ──▶ decode_command ──▶ Peripheral
//!  Host ◀──decode_message── byte ◀── link ◀── Message::to_byte ◀── Peripheral
//! ```

pub mod codec;
pub mod link;

pub use codec::{
    Command, Message, Origin, Tile, TileMask, WearableReport, decode_command, decode_message,
    encode_command,
};
pub use link::{ByteLink, NullLink};
