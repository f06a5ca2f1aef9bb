pub use eval_core::{
    CARD_COUNT, RANK_COUNT, RANK_TO_CHAR, SCORE_MAX, SUIT_TO_CHAR, TABLE3_SIZE, TABLE5_NODES,
    TABLE7_NODES,
};

/// Cards dealt to each seat in texas holdem.
pub const HOLE_CARDS: usize = 2;

/// Cards on a complete board.
pub const BOARD_CARDS: usize = 5;
