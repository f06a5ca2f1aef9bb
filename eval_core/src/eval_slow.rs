use std::collections::{BTreeMap, BTreeSet, HashMap};

use lazy_static::lazy_static;
use thiserror::Error;

use crate::card::{Card, Suit};

/// The largest packed rank produced by the evaluators.
pub const SCORE_MAX: u16 = 7929;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum EvalError {
    #[error("hand has {0} cards, want 3, 5 or 7")]
    HandSize(usize),
    #[error("failed to evaluate hand {0}")]
    BadHand(String),
}

/// Raw evaluation of a hand: an unpacked rank integer that orders hands
/// correctly, and a description when requested.
#[derive(Debug, Clone, Default)]
pub(crate) struct RawEval {
    pub rank: u32,
    pub desc: String,
}

// Hand categories, the high digit of a raw rank.
const HIGH_CARD: u32 = 0;
const PAIR: u32 = 1;
const TWO_PAIR: u32 = 2;
const TRIPS: u32 = 3;
const STRAIGHT: u32 = 4;
const FLUSH: u32 = 5;
const FULL_HOUSE: u32 = 6;
const QUADS: u32 = 7;
const STRAIGHT_FLUSH: u32 = 8;
const FIVE_OF_A_KIND: u32 = 9;

/// Condenses a category and up to five kicker digits (ranks 2..=14, zero for
/// unused slots) into a single ordered integer.
fn score(category: u32, digits: [u32; 5]) -> u32 {
    digits.iter().fold(category, |acc, d| acc * 16 + d)
}

/// The rank character for a kicker digit; zero digits render as nothing.
fn rch(digit: u32) -> &'static str {
    const CHARS: &[&str; 13] = &["2", "3", "4", "5", "6", "7", "8", "9", "T", "J", "Q", "K", "A"];
    if digit == 0 {
        ""
    } else {
        CHARS[digit as usize - 2]
    }
}

fn is_flush(c: &[Card]) -> bool {
    c.len() == 5 && c.iter().all(|ci| ci.suit() == c[0].suit())
}

/// Pops the highest set bit of a raw-rank bitmap, returning it as a rank
/// digit (2..=14), or zero when the bitmap is empty.
fn poptop(x: u16) -> (u32, u16) {
    if x == 0 {
        return (0, 0);
    }
    let p = 15 - x.leading_zeros();
    (p + 2, x & !(1 << p))
}

/// Evaluates a 3- or 5-card hand (7 cards dispatch to the best 5-card
/// subset). The result orders hands correctly under standard poker rules.
///
/// With `replace` unset, kicker details that cannot matter against a hand
/// drawn from the same deck are dropped (the kickers next to trip aces, for
/// example), and the description shows x/y placeholders instead.
pub(crate) fn eval_slow_inner(c: &[Card], replace: bool, text: bool) -> Result<RawEval, EvalError> {
    if c.len() == 7 {
        return eval_slow7_inner(c, replace, text);
    }
    if c.len() != 3 && c.len() != 5 {
        return Err(EvalError::HandSize(c.len()));
    }

    let flush = is_flush(c);
    let mut ranks = [0u8; 13];
    let mut dupes = [0i8; 6]; // uniqs, pairs, trips, quads, quins
    let mut str8s = [0u8; 13]; // marks 5-card windows, indexed by top raw rank
    let mut rank_bits = [0u16; 6];
    for ci in c {
        let r = usize::from(ci.raw_rank());
        rank_bits[usize::from(ranks[r])] |= 1 << r;
        ranks[r] += 1;
        dupes[usize::from(ranks[r])] += 1;
        dupes[usize::from(ranks[r]) - 1] -= 1;
        for i in 0..5 {
            let top = r + i;
            if top < 13 {
                str8s[top] |= 1 << i;
            }
        }
        if r == 12 {
            // The ace also plays below the deuce in the wheel.
            str8s[3] |= 1 << 4;
        }
    }
    // Top rank (2..=14) of a straight, if any. Wrap-around straights headed
    // by 2, 3 or 4 would need ranks below the deuce and can never complete.
    let mut str8top = 0u32;
    for (t, &marks) in str8s.iter().enumerate() {
        if marks == 0x1f {
            str8top = t as u32 + 2;
        }
    }
    // Reduce rank_bits[k] to the ranks appearing exactly k+1 times.
    for k in 0..5 {
        rank_bits[k] &= !rank_bits[k + 1];
    }

    if !flush && str8top == 0 && dupes[1] == c.len() as i8 {
        // No pair
        let (a, rest) = poptop(rank_bits[0]);
        let (b, rest) = poptop(rest);
        let (cc, rest) = poptop(rest);
        let (d, rest) = poptop(rest);
        let (e, _) = poptop(rest);
        return Ok(RawEval {
            rank: score(HIGH_CARD, [a, b, cc, d, e]),
            desc: if text {
                format!("{}-{}-{}-{}-{}", rch(a), rch(b), rch(cc), rch(d), rch(e))
            } else {
                String::new()
            },
        });
    }
    if dupes[2] == 1 && dupes[3] == 0 {
        // One pair
        let (p, _) = poptop(rank_bits[1]);
        let (a, rest) = poptop(rank_bits[0]);
        let (b, rest) = poptop(rest);
        let (cc, _) = poptop(rest);
        return Ok(RawEval {
            rank: score(PAIR, [p, a, b, cc, 0]),
            desc: if text {
                format!("{p}{p}-{a}-{b}-{c}", p = rch(p), a = rch(a), b = rch(b), c = rch(cc))
            } else {
                String::new()
            },
        });
    }
    if dupes[2] == 2 {
        // Two pair
        let (p, rest) = poptop(rank_bits[1]);
        let (q, _) = poptop(rest);
        let (a, _) = poptop(rank_bits[0]);
        return Ok(RawEval {
            rank: score(TWO_PAIR, [p, q, a, 0, 0]),
            desc: if text {
                format!("{p}{p}-{q}{q}-{a}", p = rch(p), q = rch(q), a = rch(a))
            } else {
                String::new()
            },
        });
    }
    if dupes[3] == 1 && dupes[2] == 0 {
        // Trips
        let (t, _) = poptop(rank_bits[2]);
        if replace {
            let (a, rest) = poptop(rank_bits[0]);
            let (b, _) = poptop(rest);
            return Ok(RawEval {
                rank: score(TRIPS, [t, a, b, 0, 0]),
                desc: if text {
                    format!("{t}{t}{t}-{a}-{b}", t = rch(t), a = rch(a), b = rch(b))
                } else {
                    String::new()
                },
            });
        }
        let desc = if !text {
            String::new()
        } else if c.len() == 5 {
            format!("{t}{t}{t}-x-y", t = rch(t)) // kickers can never matter
        } else {
            format!("{t}{t}{t}", t = rch(t))
        };
        return Ok(RawEval { rank: score(TRIPS, [t, 0, 0, 0, 0]), desc });
    }
    if str8top != 0 && !flush {
        // Straight
        return Ok(RawEval {
            rank: score(STRAIGHT, [str8top, 0, 0, 0, 0]),
            desc: if text { format!("{} straight", rch(str8top)) } else { String::new() },
        });
    }
    if flush && str8top == 0 {
        // Flush
        let (a, rest) = poptop(rank_bits[0]);
        let (b, rest) = poptop(rest);
        let (cc, rest) = poptop(rest);
        let (d, rest) = poptop(rest);
        let (e, _) = poptop(rest);
        return Ok(RawEval {
            rank: score(FLUSH, [a, b, cc, d, e]),
            desc: if text {
                format!("{}{}{}{}{} flush", rch(a), rch(b), rch(cc), rch(d), rch(e))
            } else {
                String::new()
            },
        });
    }
    if dupes[2] == 1 && dupes[3] == 1 {
        // Full house
        let (t, _) = poptop(rank_bits[2]);
        let (p, _) = poptop(rank_bits[1]);
        if replace {
            return Ok(RawEval {
                rank: score(FULL_HOUSE, [t, p, 0, 0, 0]),
                desc: if text {
                    format!("{t}{t}{t}-{p}{p}", t = rch(t), p = rch(p))
                } else {
                    String::new()
                },
            });
        }
        return Ok(RawEval {
            rank: score(FULL_HOUSE, [t, 0, 0, 0, 0]), // lower pair can never matter
            desc: if text { format!("{t}{t}{t}-xx", t = rch(t)) } else { String::new() },
        });
    }
    if dupes[4] == 1 {
        // Quads
        let (q, _) = poptop(rank_bits[3]);
        let (a, _) = poptop(rank_bits[0]);
        if replace {
            return Ok(RawEval {
                rank: score(QUADS, [q, a, 0, 0, 0]),
                desc: if text {
                    format!("{q}{q}{q}{q}-{a}", q = rch(q), a = rch(a))
                } else {
                    String::new()
                },
            });
        }
        return Ok(RawEval {
            rank: score(QUADS, [q, 0, 0, 0, 0]),
            desc: if text { format!("{q}{q}{q}{q}-x", q = rch(q)) } else { String::new() },
        });
    }
    if str8top != 0 && flush {
        // Straight flush
        return Ok(RawEval {
            rank: score(STRAIGHT_FLUSH, [str8top, 0, 0, 0, 0]),
            desc: if text { format!("{} straight flush", rch(str8top)) } else { String::new() },
        });
    }
    if dupes[5] == 1 {
        // Five of a kind: impossible from a single deck, but duplicate-suit
        // exemplars show up while seeding the rank tables.
        let (q, _) = poptop(rank_bits[4]);
        return Ok(RawEval {
            rank: score(FIVE_OF_A_KIND, [q, 0, 0, 0, 0]),
            desc: if text { format!("{q}{q}{q}{q}{q}", q = rch(q)) } else { String::new() },
        });
    }
    let names: Vec<String> = c.iter().map(|ci| ci.to_string()).collect();
    Err(EvalError::BadHand(names.join(" ")))
}

/// Evaluates a 7-card hand as the best of its 21 5-card subsets.
fn eval_slow7_inner(c: &[Card], replace: bool, text: bool) -> Result<RawEval, EvalError> {
    let mut idx = [4usize, 3, 2, 1, 0];
    let mut best = RawEval::default();
    let mut best_hand = [c[0]; 5];
    loop {
        let h = [c[idx[0]], c[idx[1]], c[idx[2]], c[idx[3]], c[idx[4]]];
        let ev = eval_slow_inner(&h, replace, false)?;
        if ev.rank > best.rank {
            best = ev;
            best_hand = h;
        }
        if idx[0] < 6 {
            idx[0] += 1;
        } else if idx[1] < 5 {
            idx[1] += 1;
            idx[0] = idx[1] + 1;
        } else if idx[2] < 4 {
            idx[2] += 1;
            idx[1] = idx[2] + 1;
            idx[0] = idx[1] + 1;
        } else if idx[3] < 3 {
            idx[3] += 1;
            idx[2] = idx[3] + 1;
            idx[1] = idx[2] + 1;
            idx[0] = idx[1] + 1;
        } else if idx[4] < 2 {
            idx[4] += 1;
            idx[3] = idx[4] + 1;
            idx[2] = idx[3] + 1;
            idx[1] = idx[2] + 1;
            idx[0] = idx[1] + 1;
        } else {
            if text {
                return eval_slow_inner(&best_hand, replace, true);
            }
            return Ok(best);
        }
    }
}

/// Fully describes a 3-, 5- or 7-card hand, for example `AA-KK-3` or
/// `6 straight`.
pub fn describe(cards: &[Card]) -> Result<String, EvalError> {
    let ev = eval_slow_inner(cards, true, true)?;
    // Three-card hands leave trailing dashes where kickers are missing.
    Ok(ev.desc.trim_end_matches('-').to_string())
}

/// Describes a hand with just enough detail to compare it against hands
/// drawn from a different deck: kickers that can never decide such a
/// comparison show as placeholders, for example `KKK-x-y`.
pub fn describe_short(cards: &[Card]) -> Result<String, EvalError> {
    let ev = eval_slow_inner(cards, false, true)?;
    Ok(ev.desc.trim_end_matches('-').to_string())
}

struct EvalInfo {
    rank_to_5: Vec<Option<[Card; 5]>>,
    rank_to_3: Vec<Option<[Card; 3]>>,
    slow_rank_to_packed: HashMap<u32, u16>,
}

lazy_static! {
    static ref EVAL_INFO: EvalInfo = EvalInfo::build();
}

fn card(suit: Suit, raw: u8) -> Card {
    Card::new(suit, raw + 2).expect("rank in range")
}

impl EvalInfo {
    fn build() -> EvalInfo {
        // Enumerate enough 3-card hands to categorize all of them. There are
        // no 3-card flushes, so suits only need to avoid duplicate cards.
        let mut hand3: BTreeMap<u32, [Card; 3]> = BTreeMap::new();
        for a in 0..13 {
            for b in a..13 {
                for c in b..13 {
                    let h = [card(Suit::Club, a), card(Suit::Diamond, b), card(Suit::Heart, c)];
                    let ev = eval_slow_inner(&h, true, false).expect("3-card eval");
                    hand3.entry(ev.rank).or_insert(h);
                }
            }
        }

        let mut hand5: BTreeMap<u32, [Card; 5]> = BTreeMap::new();
        // All 5-card flush hands in one suit.
        for a in 0..13 {
            for b in a + 1..13 {
                for c in b + 1..13 {
                    for d in c + 1..13 {
                        for e in d + 1..13 {
                            let h = [
                                card(Suit::Club, a),
                                card(Suit::Club, b),
                                card(Suit::Club, c),
                                card(Suit::Club, d),
                                card(Suit::Club, e),
                            ];
                            let ev = eval_slow_inner(&h, true, false).expect("flush eval");
                            hand5.entry(ev.rank).or_insert(h);
                        }
                    }
                }
            }
        }
        // All 5-card non-flush shapes. Cycling the suits keeps flushes out;
        // rank duplicates are allowed so every multiplicity appears, up to
        // the defensive five-of-a-kind.
        for a in 0..13 {
            for b in a..13 {
                for c in b..13 {
                    for d in c..13 {
                        for e in d..13 {
                            let h = [
                                card(Suit::Club, a),
                                card(Suit::Diamond, b),
                                card(Suit::Heart, c),
                                card(Suit::Spade, d),
                                card(Suit::Club, e),
                            ];
                            let ev = eval_slow_inner(&h, true, false).expect("5-card eval");
                            hand5.entry(ev.rank).or_insert(h);
                        }
                    }
                }
            }
        }

        // Aggregate and pack the scores.
        let all_scores: BTreeSet<u32> =
            hand3.keys().chain(hand5.keys()).copied().collect();
        assert_eq!(
            all_scores.len() - 1,
            usize::from(SCORE_MAX),
            "rank packing produced an unexpected score range"
        );

        let mut info = EvalInfo {
            rank_to_5: vec![None; usize::from(SCORE_MAX) + 1],
            rank_to_3: vec![None; usize::from(SCORE_MAX) + 1],
            slow_rank_to_packed: HashMap::new(),
        };
        for (i, &rank) in all_scores.iter().enumerate() {
            info.slow_rank_to_packed.insert(rank, i as u16);
            info.rank_to_5[i] = hand5.get(&rank).copied();
            info.rank_to_3[i] = hand3.get(&rank).copied();
        }
        info
    }
}

/// Ranks a 3-, 5- or 7-card hand with the reference algorithm, returning a
/// packed rank from 0 to [`SCORE_MAX`]. The table-driven evaluators are
/// checked against this function; it is far too slow for the hot path.
pub fn eval_slow(cards: &[Card]) -> Result<u16, EvalError> {
    let ev = eval_slow_inner(cards, true, false)?;
    Ok(*EVAL_INFO
        .slow_rank_to_packed
        .get(&ev.rank)
        .expect("reference rank missing from packed table"))
}

/// An example 5-card hand with the given packed rank, if any 5-card hand has
/// that rank.
pub fn eval_to_hand5(rank: u16) -> Option<[Card; 5]> {
    EVAL_INFO.rank_to_5.get(usize::from(rank)).copied().flatten()
}

/// An example 3-card hand with the given packed rank, if any 3-card hand has
/// that rank.
pub fn eval_to_hand3(rank: u16) -> Option<[Card; 3]> {
    EVAL_INFO.rank_to_3.get(usize::from(rank)).copied().flatten()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cards(s: &str) -> Vec<Card> {
        s.split(' ').map(|p| Card::parse(p).unwrap()).collect()
    }

    #[test]
    fn test_descriptions() {
        // Hands with their long and (where different) short descriptions.
        let hands: &[(&str, &str, &str)] = &[
            ("HA HK HQ HJ HT", "A straight flush", ""),
            ("D5 D4 D3 D2 DA", "5 straight flush", ""),
            ("HA SA DA CA C3", "AAAA-3", "AAAA-x"),
            ("HT ST DT CT D2", "TTTT-2", "TTTT-x"),
            ("H2 S2 D2 C2 CK", "2222-K", "2222-x"),
            ("SK HK DK C2 H2", "KKK-22", "KKK-xx"),
            ("ST HT CT CA DA", "TTT-AA", "TTT-xx"),
            ("HA HK HQ H2 H3", "AKQ32 flush", ""),
            ("HA HQ H8 H7 H5", "AQ875 flush", ""),
            ("SK SJ S9 S7 S5", "KJ975 flush", ""),
            ("CA SK SQ SJ ST", "A straight", ""),
            ("HK HQ DJ CT S9", "K straight", ""),
            ("H6 D5 C4 D3 H2", "6 straight", ""),
            ("H5 D4 C3 D2 CA", "5 straight", ""),
            ("HA DA CA C3 D2", "AAA-3-2", "AAA-x-y"),
            ("HQ DQ CQ C3 D2", "QQQ-3-2", "QQQ-x-y"),
            ("H2 D2 C2 CA DK", "222-A-K", "222-x-y"),
            ("HA DA CK DK H3", "AA-KK-3", ""),
            ("HA DA CQ DQ H4", "AA-QQ-4", ""),
            ("HT DT C8 D8 D2", "TT-88-2", ""),
            ("H9 D9 C7 D7 CA", "99-77-A", ""),
            ("HA DA CK DQ D2", "AA-K-Q-2", ""),
            ("HA DA CQ DJ D7", "AA-Q-J-7", ""),
            ("HK DK CQ DJ D7", "KK-Q-J-7", ""),
            ("H2 D2 CA DK HQ", "22-A-K-Q", ""),
            ("SA HQ H8 H7 H5", "A-Q-8-7-5", ""),
            ("DK SJ S9 S7 S5", "K-J-9-7-5", ""),
            ("S7 D5 H4 S3 S2", "7-5-4-3-2", ""),
            ("HA SA DA", "AAA", ""),
            ("S5 C5 D5", "555", ""),
            ("DA CA D3", "AA-3", ""),
            ("DT CT HK", "TT-K", ""),
            ("HA HQ H2", "A-Q-2", ""),
            ("H5 H2 H3", "5-3-2", ""),
            ("HK DK S2 D3 CQ DJ D7", "KK-Q-J-7", ""),
            ("SA HA DA DK HK SQ CA", "AAAA-K", "AAAA-x"),
            ("SA SQ ST DT S5 S3 CA", "AQT53 flush", ""),
        ];
        for &(hand, want_long, want_short) in hands {
            let h = cards(hand);
            assert_eq!(describe(&h).unwrap(), want_long, "describe {hand}");
            let want_short = if want_short.is_empty() { want_long } else { want_short };
            assert_eq!(describe_short(&h).unwrap(), want_short, "describe_short {hand}");
        }
    }

    #[test]
    fn test_descriptions_are_order_independent() {
        let mut h = cards("SK HK DK C2 H2");
        // rotate through a few permutations
        for _ in 0..h.len() {
            h.rotate_left(1);
            h.swap(0, 2);
            assert_eq!(describe(&h).unwrap(), "KKK-22");
            assert_eq!(describe_short(&h).unwrap(), "KKK-xx");
        }
    }

    #[test]
    fn test_rankings() {
        // These hands are in strictly descending order of strength. 3-card
        // hands rank alongside 5-card hands with fewer kickers.
        let hands = [
            "HA HK HQ HJ HT",
            "D5 D4 D3 D2 DA",
            "HA SA DA CA C3",
            "HT ST DT CT D2",
            "H2 S2 D2 C2 CK",
            "SK HK DK C2 H2",
            "ST HT CT CA DA",
            "HA HK HQ H2 H3",
            "HA HQ H8 H7 H5",
            "SK SJ S9 S7 S5",
            "CA SK SQ SJ ST",
            "HK HQ DJ CT S9",
            "H6 D5 C4 D3 H2",
            "H5 D4 C3 D2 CA",
            "HA DA CA C3 D2",
            "HA DA CA",
            "HQ DQ CQ C3 D2",
            "HQ DQ CQ",
            "HJ DJ CJ",
            "H2 D2 C2 CA DK",
            "H2 D2 C2",
            "HA DA CK DK H3",
            "HA DA CQ DQ H4",
            "HT DT C8 D8 D2",
            "H9 D9 C7 D7 CA",
            "HA DA CK DQ D2",
            "HA DA CK",
            "HA DA CQ DJ D7",
            "HA DA CQ",
            "HK DK CQ DJ D7",
            "HK DK CQ",
            "H2 D2 CA DK HQ",
            "H2 D2 CA",
            "SA HQ H9",
            "SA HQ H8 H7 H5",
            "SA HQ H8",
            "DK SJ S9 S7 S5",
            "DK SJ S9",
            "S7 D5 H4 S3 S2",
            "S7 D5 H4",
        ];
        let mut prev = u16::MAX;
        let mut prev_hand = "";
        for hand in hands {
            let ev = eval_slow(&cards(hand)).unwrap();
            assert!(ev < prev, "expected {prev_hand} to beat {hand}, got {prev} and {ev}");
            prev = ev;
            prev_hand = hand;
        }
    }

    #[test]
    fn test_quads_raw_rank() {
        // Four aces with a king kicker.
        let h = cards("HA DA CA SA CK");
        let ev = eval_slow_inner(&h, true, false).unwrap();
        assert_eq!(ev.rank, 7 * 16u32.pow(5) + 14 * 16u32.pow(4) + 13 * 16u32.pow(3));
    }

    #[test]
    fn test_score_max_is_royal_flush() {
        assert_eq!(eval_slow(&cards("HA HK HQ HJ HT")).unwrap(), SCORE_MAX);
        // the worst 5-card hand still ranks above some 3-card hands
        assert!(eval_slow(&cards("S7 D5 H4 S3 S2")).unwrap() > 0);
    }

    #[test]
    fn test_replace_affects_equality_not_order() {
        let trips_low = eval_slow_inner(&cards("HQ DQ CQ C3 D2"), false, false).unwrap();
        let trips_high = eval_slow_inner(&cards("HQ DQ CQ CA DK"), false, false).unwrap();
        assert_eq!(trips_low.rank, trips_high.rank);
        let with_kickers = eval_slow_inner(&cards("HQ DQ CQ CA DK"), true, false).unwrap();
        assert!(with_kickers.rank > trips_low.rank);
    }

    #[test]
    fn test_eval_to_hand_round_trip() {
        let hands = [
            "HA HK HQ HJ HT",
            "HA SA DA CA C3",
            "SK HK DK C2 H2",
            "HA DA CK DK H3",
            "CA SK SQ SJ ST",
            "H5 D4 C3 D2 CA",
            "S7 D5 H4 S3 S2",
            "HA DA CA",
            "DT CT HK",
            "H5 H2 H3",
        ];
        for hand in hands {
            let h = cards(hand);
            let ev = eval_slow(&h).unwrap();
            let want = describe_short(&h).unwrap();
            let got = if h.len() == 3 {
                describe_short(&eval_to_hand3(ev).expect("no 3-card exemplar")).unwrap()
            } else {
                describe_short(&eval_to_hand5(ev).expect("no 5-card exemplar")).unwrap()
            };
            assert_eq!(got, want, "round trip of {hand}");
        }
    }

    #[test]
    fn test_eval_to_hand_rejects_out_of_range() {
        assert_eq!(eval_to_hand5(SCORE_MAX + 1), None);
        assert_eq!(eval_to_hand3(u16::MAX), None);
    }

    #[test]
    fn test_wrong_hand_sizes() {
        assert_eq!(eval_slow(&cards("CA CK")[..1]).unwrap_err(), EvalError::HandSize(1));
        assert!(matches!(eval_slow(&cards("CA CK DQ DJ")).unwrap_err(), EvalError::HandSize(4)));
    }
}
