//! Sequence generation and step classification.
//!
//! Both are pure so the host FSM handlers stay thin and the rules can be
//! property-tested directly.

use core::ops::RangeInclusive;

use rand::Rng;

use crate::protocol::{Tile, TileMask};

/// Length of the sequence shown on `level`.
pub fn sequence_length(level: u32) -> usize {
    3 + (level.max(1) - 1) as usize
}

/// Tiles that may appear on `level`. Levels 1–2 use the inner four,
/// 3–4 add tile 1, 5+ use the whole floor.
pub fn tile_range(level: u32) -> RangeInclusive<u8> {
    if level < 3 {
        2..=5
    } else if level < 5 {
        1..=5
    } else {
        1..=6
    }
}

/// Draw a fresh sequence for `level`. Adjacent duplicates are resampled.
pub fn generate_sequence<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Vec<Tile> {
    let len = sequence_length(level);
    let range = tile_range(level);
    let mut seq: Vec<Tile> = Vec::with_capacity(len);

    while seq.len() < len {
        let Some(tile) = Tile::new(rng.gen_range(range.clone())) else {
            continue;
        };
        if seq.last() == Some(&tile) {
            continue;
        }
        seq.push(tile);
    }

    seq
}

/// How a floor mask relates to the tile the player should step on next.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// Expected tile is pressed. Other bits are tolerated.
    Advance,
    /// Nobody on the floor, or only the previous tile still reads pressed.
    Ignore,
    WrongStep,
}

/// Classify a floor mask against the expected tile.
pub fn classify_step(mask: TileMask, expected: Tile, previous: Option<Tile>) -> StepOutcome {
    if mask.contains(expected) {
        return StepOutcome::Advance;
    }
    if mask.is_empty() {
        return StepOutcome::Ignore;
    }
    match previous {
        Some(prev) if mask.is_subset_of(TileMask::single(prev)) => StepOutcome::Ignore,
        _ => StepOutcome::WrongStep,
    }
}
