mod tables;

use eval_core::{lookup3, walk5, walk7, Card, EvalError};

use tables::TABLES;

/// Evaluates a 3-card hand, returning its packed rank.
pub fn eval3(hand: &[Card; 3]) -> u16 {
    lookup3(&TABLES.table3, hand)
}

/// Evaluates a 5-card hand, returning a packed rank from 0 to
/// [`SCORE_MAX`](crate::SCORE_MAX) inclusive.
pub fn eval5(hand: &[Card; 5]) -> u16 {
    walk5(&TABLES.table5, hand)
}

/// Evaluates a 7-card hand, returning a packed rank from 0 to
/// [`SCORE_MAX`](crate::SCORE_MAX) inclusive.
pub fn eval7(hand: &[Card; 7]) -> u16 {
    walk7(&TABLES.table7, hand)
}

/// The raw tables behind the optimized evaluators, in 3-, 5-, 7-card order.
/// Useful for persisting them somewhere other than the build directory.
pub fn internal_tables() -> (&'static [i16], &'static [u32], &'static [u32]) {
    (&TABLES.table3, &TABLES.table5, &TABLES.table7)
}

/// Evaluates a 3-, 5- or 7-card hand.
pub fn eval(cards: &[Card]) -> Result<u16, EvalError> {
    match *cards {
        [a, b, c] => Ok(eval3(&[a, b, c])),
        [a, b, c, d, e] => Ok(eval5(&[a, b, c, d, e])),
        [a, b, c, d, e, f, g] => Ok(eval7(&[a, b, c, d, e, f, g])),
        _ => Err(EvalError::HandSize(cards.len())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use eval_core::{eval_slow, Card, SCORE_MAX};
    use rand::prelude::*;

    fn cards(s: &str) -> Vec<Card> {
        s.split(' ').map(|p| Card::parse(p).unwrap()).collect()
    }

    // Applies the perms-th mixing of the hand, following the reference
    // implementation's permutation scheme.
    fn permute<const N: usize>(hand: &[Card; N], perms: usize) -> [Card; N] {
        let mut h = *hand;
        for i in 0..N {
            h.swap(i, i + perms % (N - i));
        }
        h
    }

    #[test]
    fn test_eval3_matches_slow_exhaustively() {
        // Every 3-card hand in every permutation.
        for a in 0..52u8 {
            for b in a + 1..52 {
                for c in b + 1..52 {
                    let hand = [
                        Card::from_index(a).unwrap(),
                        Card::from_index(b).unwrap(),
                        Card::from_index(c).unwrap(),
                    ];
                    let want = eval_slow(&hand).unwrap();
                    for perms in 0..6 {
                        let h = permute(&hand, perms);
                        assert_eq!(eval3(&h), want, "hand {h:?}");
                    }
                }
            }
        }
    }

    #[test]
    fn test_eval5_single_hands() {
        for hand in ["S2 H2 D2 C2 CA", "CT DT HT ST D8"] {
            let h: [Card; 5] = cards(hand).try_into().unwrap();
            let want = eval_slow(&h).unwrap();
            for perms in 0..120 {
                let h = permute(&h, perms);
                assert_eq!(eval5(&h), want, "hand {hand} perm {perms}");
            }
        }
    }

    #[test]
    fn test_eval5_matches_slow_sampled() {
        // A stride through all C(52,5) hands, a few permutations each. The
        // exhaustive version below runs with --ignored.
        let mut count = 0u32;
        for a in 0..52u8 {
            for b in a + 1..52 {
                for c in b + 1..52 {
                    for d in c + 1..52 {
                        for e in d + 1..52 {
                            count += 1;
                            if count % 97 != 0 {
                                continue;
                            }
                            let hand = [a, b, c, d, e].map(|i| Card::from_index(i).unwrap());
                            let want = eval_slow(&hand).unwrap();
                            for perms in (0..120).step_by(30) {
                                let h = permute(&hand, perms);
                                assert_eq!(eval5(&h), want, "hand {hand:?}");
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    #[ignore = "slow: evaluates all 2.6M five-card hands against the reference"]
    fn test_eval5_matches_slow_exhaustively() {
        for a in 0..52u8 {
            for b in a + 1..52 {
                for c in b + 1..52 {
                    for d in c + 1..52 {
                        for e in d + 1..52 {
                            let hand = [a, b, c, d, e].map(|i| Card::from_index(i).unwrap());
                            let want = eval_slow(&hand).unwrap();
                            for perms in (0..120).step_by(10) {
                                let h = permute(&hand, perms);
                                assert_eq!(eval5(&h), want, "hand {hand:?}");
                            }
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn test_eval7_spot_hands() {
        let hands = [
            "HK DK S2 D3 CQ DJ D7",
            "SA HA DA DK HK SQ CA",
            "SA SQ ST DT S5 S3 CA",
            "SA SK SQ SJ ST S9 S8",
            "SA SK SQ CJ ST S9 S8",
        ];
        for hand in hands {
            let h: [Card; 7] = cards(hand).try_into().unwrap();
            assert_eq!(eval7(&h), eval_slow(&h).unwrap(), "hand {hand}");
        }
    }

    #[test]
    fn test_eval7_is_best_of_five_card_subsets() {
        let mut rng = StdRng::seed_from_u64(0x7ca8d);
        let mut deck: Vec<Card> = Card::ALL.to_vec();
        for _ in 0..500 {
            deck.shuffle(&mut rng);
            let h: [Card; 7] = deck[..7].try_into().unwrap();
            let mut best = 0u16;
            for i in 0..3 {
                for j in i + 1..4 {
                    for k in j + 1..5 {
                        for l in k + 1..6 {
                            for m in l + 1..7 {
                                best = best.max(eval5(&[h[i], h[j], h[k], h[l], h[m]]));
                            }
                        }
                    }
                }
            }
            assert_eq!(eval7(&h), best, "hand {h:?}");
        }
    }

    #[test]
    fn test_eval7_order_independent() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        let mut deck: Vec<Card> = Card::ALL.to_vec();
        for _ in 0..200 {
            deck.shuffle(&mut rng);
            let h: [Card; 7] = deck[..7].try_into().unwrap();
            let want = eval7(&h);
            for perms in 0..20 {
                let p = permute(&h, perms * 251);
                assert_eq!(eval7(&p), want, "hand {h:?} perm {perms}");
            }
        }
    }

    #[test]
    fn test_max_score() {
        let royal: [Card; 5] = cards("HA HK HQ HJ HT").try_into().unwrap();
        assert_eq!(eval5(&royal), SCORE_MAX);
    }

    #[test]
    fn test_eval_dispatch() {
        assert!(eval(&cards("CA CK")).is_err());
        assert!(eval(&cards("CA CK DQ DJ H7 S3")).is_err());
        let h = cards("HA HK HQ HJ HT");
        assert_eq!(eval(&h).unwrap(), SCORE_MAX);
        assert_eq!(eval(&cards("HA SA DA")).unwrap(), eval_slow(&cards("HA SA DA")).unwrap());
        let h7 = cards("HK DK S2 D3 CQ DJ D7");
        assert_eq!(eval(&h7).unwrap(), eval_slow(&h7).unwrap());
    }

    #[test]
    fn test_three_card_hands_rank_alongside_five_card_hands() {
        // trip aces (3 cards) lose to quads but beat two pair
        let trips = eval(&cards("HA SA DA")).unwrap();
        let quads = eval(&cards("H2 S2 D2 C2 CK")).unwrap();
        let two_pair = eval(&cards("HA DA CK DK H3")).unwrap();
        assert!(quads > trips);
        assert!(trips > two_pair);
    }
}
