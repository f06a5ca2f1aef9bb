//! # Poker Eval
//! A texas holdem hand evaluation library
//!
//! Currently supports
//!  - fast table-driven evaluation of 3, 5 and 7 card hands
//!  - exact equity calculation over every board runout
//!  - hand descriptions and reference (slow) evaluation
//!
//! ## Hand Evaluator
//!
//! ```
//! use poker_eval::{eval, Card};
//! let hand: Vec<Card> = ["CA", "CK", "CQ", "CJ", "CT"]
//!     .iter()
//!     .map(|s| Card::parse(s).unwrap())
//!     .collect();
//! assert_eq!(eval(&hand).unwrap(), poker_eval::SCORE_MAX);
//! ```
//!
//! ## Equity Calculator
//!
//! ```
//! use poker_eval::equity::holdem_equities;
//! use poker_eval::Card;
//! let hands = [
//!     [Card::parse("Ac").unwrap(), Card::parse("Kh").unwrap()],
//!     [Card::parse("Kd").unwrap(), Card::parse("Th").unwrap()],
//! ];
//! let board = [
//!     Card::parse("2d").unwrap(),
//!     Card::parse("2h").unwrap(),
//!     Card::parse("2s").unwrap(),
//! ];
//! let eqs = holdem_equities(&hands, &board).unwrap();
//! assert_eq!(eqs[0].boards, 990);
//! ```

pub mod constants;
pub mod equity;
pub mod evaluator;
pub mod range;

pub use eval_core::{
    describe, describe_short, eval_slow, eval_to_hand3, eval_to_hand5, CanonicalHand64, Card,
    CardError, EvalError, Hand64, Suit, SuitTransform, SuitTransformByte, DECK, SCORE_MAX,
};
pub use equity::{holdem_equities, Equity, EquityError};
pub use evaluator::{eval, eval3, eval5, eval7};
pub use range::{MapRange, Range, SimpleRange};
