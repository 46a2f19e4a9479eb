//! Single-byte message codec shared by both directions of the radio link.
//!
//! Wire format:
//! ```text
//!  bit  7      6      5    4    3      2    1       0
//!     ┌──────┬──────┬────┬────┬──────┬────┬───────┬──────┐
//! FP  │  0   │ cmd  │ T6 │ T5 │ T4   │ T3 │ T2    │ T1   │  floor panel
//!     ├──────┼──────┼────┼────┼──────┼────┼───────┼──────┤
//! WR  │  1   │  -   │ -  │ -  │start │ -  │ accel │ hr   │  wearable
//!     └──────┴──────┴────┴────┴──────┴────┴───────┴──────┘
//! ```
//!
//! Host → peripheral commands:
//!
//! | Command              | Byte          |
//! |----------------------|---------------|
//! | `StartReporting`     | `0x00`        |
//! | `StopReporting`      | `0x40`        |
//! | `LightTile(n)`       | `1 << (n-1)`  |
//! | `StartTracking`      | `0x81`        |
//! | `AbortToIdle`        | `0x82`        |
//! | `RequestBonusReport` | `0x83`        |
//!
//! [`decode_message`] is total: every byte maps to some [`Message`], unused
//! bits are ignored. [`decode_command`] is the peripheral-side parse and
//! returns `None` for bytes that are not a command; peripherals drop those.

use core::fmt;

/// Bit 7: origin of a peripheral message / target of a host command.
pub const ORIGIN_BIT: u8 = 0b1000_0000;
/// Bits 0–5: one bit per floor tile.
pub const TILE_BITS: u8 = 0b0011_1111;
/// Bit 6: stop-reporting opcode on the floor panel.
pub const STOP_BIT: u8 = 0b0100_0000;

/// Wearable report bit 0: heart-rate bonus latched.
pub const HR_BONUS_BIT: u8 = 0b0000_0001;
/// Wearable report bit 1: acceleration bonus latched.
pub const ACCEL_BONUS_BIT: u8 = 0b0000_0010;
/// Wearable report bit 3: start button pressed.
pub const START_BIT: u8 = 0b0000_1000;

pub const CMD_START_REPORTING: u8 = 0x00;
pub const CMD_STOP_REPORTING: u8 = 0x40;
pub const CMD_START_TRACKING: u8 = 0x81;
pub const CMD_ABORT_TO_IDLE: u8 = 0x82;
pub const CMD_REQUEST_BONUS_REPORT: u8 = 0x83;

/// Number of floor tiles.
pub const TILE_COUNT: usize = 6;

// ---------------------------------------------------------------------------
// Tile
// ---------------------------------------------------------------------------

/// A floor tile index, always in `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Tile(u8);

impl Tile {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = TILE_COUNT as u8;

    /// Returns `None` outside `1..=6`.
    pub const fn new(index: u8) -> Option<Self> {
        if index >= Self::MIN && index <= Self::MAX {
            Some(Self(index))
        } else {
            None
        }
    }

    /// 1-based tile number.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// One-hot bit for this tile (`1 << (n-1)`).
    pub const fn bit(self) -> u8 {
        1 << (self.0 - 1)
    }

    /// All six tiles in order.
    pub fn all() -> impl Iterator<Item = Tile> {
        (Self::MIN..=Self::MAX).map(Tile)
    }
}

impl fmt::Display for Tile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "T{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// TileMask
// ---------------------------------------------------------------------------

/// Ordered set of six pressed/released flags, bits 0–5.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TileMask(u8);

impl TileMask {
    pub const EMPTY: Self = Self(0);

    /// Build from raw bits; anything above bit 5 is discarded.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & TILE_BITS)
    }

    pub const fn single(tile: Tile) -> Self {
        Self(tile.bit())
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn contains(self, tile: Tile) -> bool {
        self.0 & tile.bit() != 0
    }

    /// `true` when every set bit is also set in `other`.
    pub const fn is_subset_of(self, other: TileMask) -> bool {
        self.0 & !other.0 == 0
    }

    pub fn set(&mut self, tile: Tile, pressed: bool) {
        if pressed {
            self.0 |= tile.bit();
        } else {
            self.0 &= !tile.bit();
        }
    }

    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// The tile addressed by a one-hot mask, `None` for zero or multi-bit masks.
    pub fn as_single(self) -> Option<Tile> {
        if self.0.count_ones() == 1 {
            Tile::new(self.0.trailing_zeros() as u8 + 1)
        } else {
            None
        }
    }

    pub fn tiles(self) -> impl Iterator<Item = Tile> {
        Tile::all().filter(move |t| self.contains(*t))
    }
}

impl fmt::Display for TileMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0b{:06b}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Peripheral → host messages
// ---------------------------------------------------------------------------

/// Which peripheral a message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    FloorPanel,
    Wearable,
}

/// Content of a wearable-originated byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct WearableReport {
    pub start_pressed: bool,
    pub heart_rate_bonus: bool,
    pub accel_bonus: bool,
}

impl WearableReport {
    /// A start-button signal (bit 3 set, no bonus bits).
    pub const fn start_signal() -> Self {
        Self {
            start_pressed: true,
            heart_rate_bonus: false,
            accel_bonus: false,
        }
    }

    /// A bonus report carrying the given latches.
    pub const fn bonus(heart_rate_bonus: bool, accel_bonus: bool) -> Self {
        Self {
            start_pressed: false,
            heart_rate_bonus,
            accel_bonus,
        }
    }
}

/// A decoded peripheral byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Message {
    /// Full pressed-tile mask from the floor panel.
    Floor(TileMask),
    /// Start signal or bonus report from the wearable.
    Wearable(WearableReport),
}

impl Message {
    pub const fn origin(&self) -> Origin {
        match self {
            Self::Floor(_) => Origin::FloorPanel,
            Self::Wearable(_) => Origin::Wearable,
        }
    }

    /// Wearable byte without the start bit.
    pub const fn is_bonus_report(&self) -> bool {
        matches!(self, Self::Wearable(r) if !r.start_pressed)
    }

    /// Wearable byte with the start bit.
    pub const fn is_start_signal(&self) -> bool {
        matches!(self, Self::Wearable(r) if r.start_pressed)
    }

    /// Peripheral-side encoding. Unused bits are always zero.
    pub const fn to_byte(&self) -> u8 {
        match self {
            Self::Floor(mask) => mask.bits(),
            Self::Wearable(r) => {
                let mut b = ORIGIN_BIT;
                if r.start_pressed {
                    b |= START_BIT;
                }
                if r.accel_bonus {
                    b |= ACCEL_BONUS_BIT;
                }
                if r.heart_rate_bonus {
                    b |= HR_BONUS_BIT;
                }
                b
            }
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Floor(mask) => write!(f, "floor {mask}"),
            Self::Wearable(r) if r.start_pressed => write!(f, "wearable start"),
            Self::Wearable(r) => write!(
                f,
                "wearable report hr={} accel={}",
                r.heart_rate_bonus, r.accel_bonus
            ),
        }
    }
}

/// Decode any byte received by the host. Never fails.
pub const fn decode_message(byte: u8) -> Message {
    if byte & ORIGIN_BIT == 0 {
        Message::Floor(TileMask::from_bits(byte))
    } else {
        Message::Wearable(WearableReport {
            start_pressed: byte & START_BIT != 0,
            heart_rate_bonus: byte & HR_BONUS_BIT != 0,
            accel_bonus: byte & ACCEL_BONUS_BIT != 0,
        })
    }
}

// ---------------------------------------------------------------------------
// Host → peripheral commands
// ---------------------------------------------------------------------------

/// Commands the host sends. Floor-panel commands never set bit 7,
/// wearable commands always do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    StartReporting,
    StopReporting,
    LightTile(Tile),
    StartTracking,
    AbortToIdle,
    RequestBonusReport,
}

impl Command {
    /// Which peripheral acts on this command.
    pub const fn target(&self) -> Origin {
        match self {
            Self::StartReporting | Self::StopReporting | Self::LightTile(_) => Origin::FloorPanel,
            Self::StartTracking | Self::AbortToIdle | Self::RequestBonusReport => Origin::Wearable,
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartReporting => write!(f, "StartReporting"),
            Self::StopReporting => write!(f, "StopReporting"),
            Self::LightTile(t) => write!(f, "LightTile({t})"),
            Self::StartTracking => write!(f, "StartTracking"),
            Self::AbortToIdle => write!(f, "AbortToIdle"),
            Self::RequestBonusReport => write!(f, "RequestBonusReport"),
        }
    }
}

/// Encode a host command. Total and deterministic.
pub const fn encode_command(cmd: Command) -> u8 {
    match cmd {
        Command::StartReporting => CMD_START_REPORTING,
        Command::StopReporting => CMD_STOP_REPORTING,
        Command::LightTile(tile) => tile.bit() & TILE_BITS,
        Command::StartTracking => CMD_START_TRACKING,
        Command::AbortToIdle => CMD_ABORT_TO_IDLE,
        Command::RequestBonusReport => CMD_REQUEST_BONUS_REPORT,
    }
}

/// Parse a byte received by a peripheral. Multi-bit or otherwise
/// unrecognised patterns return `None`.
pub fn decode_command(byte: u8) -> Option<Command> {
    match byte {
        CMD_START_REPORTING => Some(Command::StartReporting),
        CMD_STOP_REPORTING => Some(Command::StopReporting),
        CMD_START_TRACKING => Some(Command::StartTracking),
        CMD_ABORT_TO_IDLE => Some(Command::AbortToIdle),
        CMD_REQUEST_BONUS_REPORT => Some(Command::RequestBonusReport),
        b if b & !TILE_BITS == 0 => TileMask::from_bits(b).as_single().map(Command::LightTile),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(n: u8) -> Tile {
        Tile::new(n).unwrap()
    }

    #[test]
    fn tile_rejects_out_of_range() {
        assert!(Tile::new(0).is_none());
        assert!(Tile::new(7).is_none());
        assert_eq!(tile(1).bit(), 0x01);
        assert_eq!(tile(6).bit(), 0x20);
    }

    #[test]
    fn command_bytes_are_bit_exact() {
        assert_eq!(encode_command(Command::StartReporting), 0x00);
        assert_eq!(encode_command(Command::StopReporting), 0x40);
        assert_eq!(encode_command(Command::StartTracking), 0x81);
        assert_eq!(encode_command(Command::AbortToIdle), 0x82);
        assert_eq!(encode_command(Command::RequestBonusReport), 0x83);
        for n in 1..=6 {
            assert_eq!(encode_command(Command::LightTile(tile(n))), 1 << (n - 1));
        }
    }

    #[test]
    fn floor_commands_never_set_origin_bit() {
        for cmd in [
            Command::StartReporting,
            Command::StopReporting,
            Command::LightTile(tile(6)),
        ] {
            assert_eq!(encode_command(cmd) & ORIGIN_BIT, 0, "{cmd}");
        }
        for cmd in [
            Command::StartTracking,
            Command::AbortToIdle,
            Command::RequestBonusReport,
        ] {
            assert_ne!(encode_command(cmd) & ORIGIN_BIT, 0, "{cmd}");
        }
    }

    #[test]
    fn decode_command_ignores_multi_bit_masks() {
        assert_eq!(decode_command(0b0000_0011), None);
        assert_eq!(decode_command(0b0011_1111), None);
        assert_eq!(decode_command(0x41), None);
        assert_eq!(decode_command(0xFF), None);
        assert_eq!(decode_command(0x04), Some(Command::LightTile(tile(3))));
    }

    #[test]
    fn floor_message_ignores_bit_six() {
        let msg = decode_message(0b0100_0101);
        assert_eq!(msg, Message::Floor(TileMask::from_bits(0b0000_0101)));
        assert_eq!(msg.origin(), Origin::FloorPanel);
    }

    #[test]
    fn wearable_start_and_report_split_on_bit_three() {
        let start = decode_message(0x88);
        assert!(start.is_start_signal());
        assert!(!start.is_bonus_report());

        let report = decode_message(0x83);
        assert!(report.is_bonus_report());
        assert_eq!(report, Message::Wearable(WearableReport::bonus(true, true)));

        // Start bit wins even with bonus bits set.
        assert!(decode_message(0x8B).is_start_signal());
        // Unused bits 2, 4-6 do not change the interpretation.
        assert_eq!(decode_message(0xF4), Message::Wearable(WearableReport::bonus(false, false)));
    }

    #[test]
    fn peripheral_encoding_zeroes_unused_bits() {
        assert_eq!(Message::Wearable(WearableReport::start_signal()).to_byte(), 0x88);
        assert_eq!(Message::Wearable(WearableReport::bonus(true, false)).to_byte(), 0x81);
        assert_eq!(Message::Wearable(WearableReport::bonus(false, true)).to_byte(), 0x82);
        assert_eq!(Message::Floor(TileMask::from_bits(0xFF)).to_byte(), 0x3F);
    }

    #[test]
    fn mask_subset_and_single() {
        let prev = TileMask::single(tile(2));
        assert!(TileMask::from_bits(0b10).is_subset_of(prev));
        assert!(!TileMask::from_bits(0b110).is_subset_of(prev));
        assert_eq!(TileMask::from_bits(0b100).as_single(), Some(tile(3)));
        assert_eq!(TileMask::from_bits(0b110).as_single(), None);
        assert_eq!(TileMask::EMPTY.as_single(), None);
    }
}
