use serde::Serialize;
use thiserror::Error;

use eval_core::{Card, DECK};

use crate::constants::BOARD_CARDS;
use crate::evaluator::eval7;

/// Equity of one hand against the others over every board runout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Equity {
    /// Total share of the pot, split pots counted fractionally.
    pub equity: f64,
    /// Share gained from winning outright.
    pub win: f64,
    /// Probability of tying with one or more hands.
    pub tie: f64,
    /// Number of runouts evaluated.
    pub boards: u64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EquityError {
    #[error("duplicate cards: {} found", join_cards(.0))]
    DuplicateCards(Vec<Card>),
    #[error("board has more than 5 ({0}) cards")]
    BoardTooLong(usize),
}

fn join_cards(cards: &[Card]) -> String {
    let names: Vec<String> = cards.iter().map(|c| c.to_string()).collect();
    format!("[{}]", names.join(" "))
}

/// Scores one complete board: every seat's 7 cards are ranked, winners split
/// the pot evenly. `tie` counts participation in a split, not the fractional
/// share; the share goes into `equity`.
fn river_equities(hand_boards: &[[Card; 7]], evs: &mut [u16], eqs: &mut [Equity]) {
    let mut best = -1i32;
    let mut win_count = 0u32;
    for (i, hb) in hand_boards.iter().enumerate() {
        let ev = eval7(hb);
        evs[i] = ev;
        if i32::from(ev) > best {
            best = i32::from(ev);
            win_count = 1;
        } else if i32::from(ev) == best {
            win_count += 1;
        }
    }

    let share = 1.0 / f64::from(win_count);
    for (i, eq) in eqs.iter_mut().enumerate() {
        if i32::from(evs[i]) != best {
            continue;
        }
        eq.equity += share;
        if win_count == 1 {
            eq.win += share;
        } else {
            eq.tie += 1.0;
        }
    }
}

/// All cards not used by a hand or the board, in deck order. Fails on
/// duplicates across all inputs or an over-long board.
fn remaining_deck(hands: &[[Card; 2]], board: &[Card]) -> Result<Vec<Card>, EquityError> {
    let mut got = [0u8; 52];
    for h in hands {
        got[usize::from(h[0].index())] += 1;
        got[usize::from(h[1].index())] += 1;
    }
    for b in board {
        got[usize::from(b.index())] += 1;
    }
    let dups: Vec<Card> = Card::ALL
        .iter()
        .filter(|c| got[usize::from(c.index())] > 1)
        .copied()
        .collect();
    if !dups.is_empty() {
        return Err(EquityError::DuplicateCards(dups));
    }
    if board.len() > BOARD_CARDS {
        return Err(EquityError::BoardTooLong(board.len()));
    }
    Ok(DECK.iter().filter(|c| got[usize::from(c.index())] == 0).copied().collect())
}

/// Computes the river equities for the given holdem hands and a board of up
/// to 5 cards, enumerating every runout exactly.
///
/// # Arguments
///
/// * `hands` Each seat's hole cards
/// * `board` Zero to five dealt board cards
///
/// # Example
/// ```
/// use poker_eval::equity::holdem_equities;
/// use poker_eval::Card;
/// let hands = [
///     [Card::parse("Ac").unwrap(), Card::parse("Kh").unwrap()],
///     [Card::parse("Kd").unwrap(), Card::parse("Th").unwrap()],
/// ];
/// let board = [
///     Card::parse("7d").unwrap(),
///     Card::parse("8c").unwrap(),
///     Card::parse("8s").unwrap(),
/// ];
/// let eqs = holdem_equities(&hands, &board).unwrap();
/// assert_eq!(eqs[0].boards, 990);
/// assert!(eqs[0].equity > eqs[1].equity);
/// ```
pub fn holdem_equities(hands: &[[Card; 2]], board: &[Card]) -> Result<Vec<Equity>, EquityError> {
    let deck = remaining_deck(hands, board)?;

    // Each seat's evaluation buffer keeps the fixed cards (holes and dealt
    // board) at the tail; runout cards are rewritten at the head.
    let base = 5 - board.len();
    let mut hand_boards: Vec<[Card; 7]> = hands
        .iter()
        .map(|h| {
            let mut hb = [h[0]; 7];
            hb[base] = h[0];
            hb[base + 1] = h[1];
            for (j, b) in board.iter().enumerate() {
                hb[base + 2 + j] = *b;
            }
            hb
        })
        .collect();

    let mut eqs = vec![Equity::default(); hands.len()];
    let mut evs = vec![0u16; hands.len()];

    if board.len() == BOARD_CARDS {
        river_equities(&hand_boards, &mut evs, &mut eqs);
        for eq in &mut eqs {
            eq.boards = 1;
        }
        return Ok(eqs);
    }

    let mut idxs: Vec<usize> = (0..base).collect();
    let mut runouts = 0u64;
    loop {
        runouts += 1;
        for (j, &ix) in idxs.iter().enumerate() {
            let c = deck[ix];
            for hb in hand_boards.iter_mut() {
                hb[j] = c;
            }
        }
        river_equities(&hand_boards, &mut evs, &mut eqs);
        if !inc_runout_index(&mut idxs, deck.len()) {
            break;
        }
    }
    for eq in &mut eqs {
        eq.equity /= runouts as f64;
        eq.win /= runouts as f64;
        eq.tie /= runouts as f64;
        eq.boards = runouts;
    }
    Ok(eqs)
}

/// Advances the runout combination indices lexicographically. Scans right to
/// left for an index that can still grow, bumps it and resets everything to
/// its right. Returns false once the last combination has been seen.
fn inc_runout_index(idx: &mut [usize], deck_len: usize) -> bool {
    let k = idx.len();
    for i in (0..k).rev() {
        if idx[i] == deck_len - (k - 1 - i) - 1 {
            continue;
        }
        idx[i] += 1;
        for j in i + 1..k {
            idx[j] = idx[i] + j - i;
        }
        return true;
    }
    false
}
