//! Core types for the poker evaluator: the card model, the packed 7-card
//! hand with its suit canonicalization, and the slow reference evaluator
//! that the precomputed tables are checked against.
//!
//! Everything here is shared between the runtime crate and the table
//! generator, which is why it lives outside the main crate: a build script
//! cannot depend on the crate it is building.

mod card;
mod eval_slow;
mod hand64;
mod walk;

pub use card::{Card, CardError, Suit, CARD_COUNT, DECK, RANK_COUNT, RANK_TO_CHAR, SUIT_TO_CHAR};
pub use eval_slow::{
    describe, describe_short, eval_slow, eval_to_hand3, eval_to_hand5, EvalError, SCORE_MAX,
};
pub use hand64::{CanonicalHand64, Hand64, SuitTransform, SuitTransformByte};
pub use walk::{lookup3, walk5, walk7};

/// Node count of the 5-card transition table.
pub const TABLE5_NODES: usize = 3_459;

/// Node count of the 7-card transition table.
pub const TABLE7_NODES: usize = 163_060;

/// Entry count of the rank-indexed 3-card table.
pub const TABLE3_SIZE: usize = 16 * 16 * 16;
