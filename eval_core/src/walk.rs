//! Branch-free walks over the flat transition tables.
//!
//! A table entry at `node_offset + card` is either a terminal packed rank in
//! its low 16 bits, or `(next_node_offset << 8) | suit_transform_byte`. Each
//! step translates the next card through the suit transform accumulated so
//! far, so any ordering of the same cards ends at the same terminal.

use crate::card::Card;
use crate::hand64::SuitTransformByte;

/// One lookup step: translate the card, fetch the entry.
#[inline]
fn step(table: &[u32], idx: usize, tx: SuitTransformByte, c: Card) -> u32 {
    table[idx + usize::from(tx.apply(c).index())]
}

/// Ranks a 5-card hand against the 5-card transition table.
#[inline]
pub fn walk5(table: &[u32], hand: &[Card; 5]) -> u16 {
    let mut idx = 0usize;
    let mut tx = SuitTransformByte::IDENTITY;
    for &c in &hand[..4] {
        let v = step(table, idx, tx, c);
        tx = tx.compose(SuitTransformByte(v as u8));
        idx = (v >> 8) as usize;
    }
    step(table, idx, tx, hand[4]) as u16
}

/// Ranks a 7-card hand against the 7-card transition table.
#[inline]
pub fn walk7(table: &[u32], hand: &[Card; 7]) -> u16 {
    let mut idx = 0usize;
    let mut tx = SuitTransformByte::IDENTITY;
    for &c in &hand[..6] {
        let v = step(table, idx, tx, c);
        tx = tx.compose(SuitTransformByte(v as u8));
        idx = (v >> 8) as usize;
    }
    step(table, idx, tx, hand[6]) as u16
}

/// Ranks a 3-card hand against the rank-indexed 3-card table. Suits are
/// irrelevant for 3-card hands.
#[inline]
pub fn lookup3(table: &[i16], hand: &[Card; 3]) -> u16 {
    let i = usize::from(hand[0].raw_rank()) << 8
        | usize::from(hand[1].raw_rank()) << 4
        | usize::from(hand[2].raw_rank());
    table[i] as u16
}
