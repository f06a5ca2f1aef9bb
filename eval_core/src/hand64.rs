use lazy_static::lazy_static;

use crate::card::{Card, RANK_TO_CHAR, SUIT_TO_CHAR};

/// Marker bit for an anonymised suit on a canonical card byte. Such a suit
/// cannot take part in a flush, so its identity is irrelevant; the suit bits
/// are cleared when the marker is set.
const X_SUIT: u8 = 0x80;

/// Label used for anonymised suits while assigning canonical suit labels.
const X_LABEL: usize = 4;

/// A hand with up to 7 cards, one card index per byte, the most recently
/// pushed card in byte 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Hand64(pub u64);

impl Hand64 {
    /// Packs a slice of at most 7 cards; the last card lands in byte 0.
    pub fn from_cards(cards: &[Card]) -> Hand64 {
        let mut h = 0u64;
        for c in cards {
            h = (h << 8) | u64::from(c.index());
        }
        Hand64(h)
    }

    fn byte(self, i: usize) -> u8 {
        (self.0 >> (8 * i)) as u8
    }

    /// The i-th card of the hand.
    pub fn card(self, i: usize) -> Card {
        Card::from_index_unchecked(self.byte(i))
    }

    /// The first n cards of the hand. At most 7 cards are returned.
    pub fn cards_n(self, n: usize) -> Vec<Card> {
        (0..n.min(7)).map(|i| self.card(i)).collect()
    }

    /// Appends a card in byte 0, shifting the others up.
    pub fn push(self, c: Card) -> Hand64 {
        Hand64((self.0 << 8) | u64::from(c.index()))
    }

    /// Exchanges the cards at positions i and j.
    pub fn swap_cards(self, i: usize, j: usize) -> Hand64 {
        let (ci, cj) = (self.byte(i), self.byte(j));
        let mut h = self.0;
        h &= !(0xffu64 << (8 * i));
        h &= !(0xffu64 << (8 * j));
        h |= u64::from(ci) << (8 * j);
        h |= u64::from(cj) << (8 * i);
        Hand64(h)
    }

    /// Formats the first n cards, space separated.
    pub fn to_string_n(self, n: usize) -> String {
        let names: Vec<String> = (0..n.min(7)).map(|i| self.card(i).to_string()).collect();
        names.join(" ")
    }

    /// The canonical form of the first n cards, assuming the hand will grow
    /// to final_n cards.
    pub fn canonical(self, n: usize, final_n: usize) -> CanonicalHand64 {
        self.canonical_with_transform(n, final_n).0
    }

    /// Computes the canonical form of the first n cards together with the
    /// suit transform that maps this hand's suits onto the canonical labels.
    ///
    /// Cards are bucketed per suit, suits are ordered by descending card
    /// count and then descending rank bitmap, and relabeled in that order.
    /// A suit that cannot reach five cards even after the remaining
    /// `final_n - n` draws is anonymised: no permutation of such suits can
    /// change the hand's value.
    pub fn canonical_with_transform(self, n: usize, final_n: usize) -> (CanonicalHand64, SuitTransform) {
        #[derive(Clone, Copy, Default)]
        struct CanonSuit {
            suit: u8,   // the original suit
            cards: u16, // bitmap of raw ranks
            n: u8,
        }

        let mut csuits = [CanonSuit::default(); 4];
        for (i, cs) in csuits.iter_mut().enumerate() {
            cs.suit = i as u8;
        }
        for i in 0..n {
            let b = self.byte(i);
            csuits[(b & 3) as usize].cards |= 1 << (b >> 2);
            csuits[(b & 3) as usize].n += 1;
        }
        csuits.sort_by(|a, b| b.n.cmp(&a.n).then(b.cards.cmp(&a.cards)));

        let mut labels = [0usize; 4];
        let mut next_label = 0;
        for i in 0..4 {
            if usize::from(csuits[i].n) + (final_n - n) < 5 {
                labels[i] = X_LABEL;
            } else {
                labels[i] = next_label;
                next_label += 1;
            }
        }

        let mut hs = 0u64;
        for raw in 0..13 {
            for i in 0..4 {
                if (csuits[i].cards >> raw) & 1 == 0 {
                    continue;
                }
                let byte = if labels[i] == X_LABEL {
                    (raw as u64) << 2 | u64::from(X_SUIT)
                } else {
                    (raw as u64) << 2 | labels[i] as u64
                };
                hs = (hs << 8) | byte;
            }
        }

        let mut xf = SuitTransform([0; 4]);
        for i in 0..4 {
            // Anonymised suits are folded into label 3: they can never
            // contribute to a flush, and there are never more than three
            // flush-capable suits, so label 3 is free.
            xf.0[csuits[i].suit as usize] = if labels[i] == X_LABEL { 3 } else { labels[i] as u8 };
        }
        (CanonicalHand64(hs), xf)
    }
}

/// The canonical representative of a hand's suit-permutation class.
///
/// Stored like a [`Hand64`] but with cards sorted (ascending rank emitted
/// last, so byte 0 holds the strongest card), suit labels appearing in order
/// of first use, and anonymised suits carrying the x marker bit instead of a
/// suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct CanonicalHand64(pub u64);

impl CanonicalHand64 {
    /// Appends a card to an n-card canonical hand and returns a concrete
    /// hand (no anonymised suits). Fails if the card is already present or
    /// would be the fifth of its rank.
    pub fn add(self, n: usize, c: Card) -> Option<Hand64> {
        let mut same_rank = 0;
        for i in 0..n {
            let b = Hand64(self.0).byte(i);
            if b == c.index() {
                return None;
            }
            if (b >> 2) & 0xf == c.raw_rank() {
                same_rank += 1;
            }
        }
        if same_rank >= 4 {
            return None;
        }
        Some(CanonicalHand64((self.0 << 8) | u64::from(c.index())).exemplar_inner(n + 1, true))
    }

    /// Returns one concrete n-card hand that canonicalizes back to this
    /// hand.
    pub fn exemplar(self, n: usize) -> Hand64 {
        self.exemplar_inner(n, false)
    }

    // Replaces every anonymised suit with a concrete one. Suits already used
    // by flush-capable cards are avoided entirely, and the remaining suits
    // are cycled so that cards of equal rank come out distinct. With bot_new
    // set, byte 0 holds a freshly appended concrete card: its suit stays
    // available to x cards, but the exact card must not be duplicated.
    fn exemplar_inner(self, n: usize, bot_new: bool) -> Hand64 {
        let mut h = self.0;
        let mut used = 0u8;
        for i in 0..n {
            let b = (h >> (8 * i)) as u8;
            if b & X_SUIT == 0 && (i > 0 || !bot_new) {
                used |= 1 << (b & 3);
            }
        }
        let bot_card = h as u8;
        let mut ns = 0u8;
        for i in 0..n {
            let b = (h >> (8 * i)) as u8;
            if b & X_SUIT == 0 {
                continue;
            }
            let r = b & !(X_SUIT | 3);
            let mut nc = None;
            for _ in 0..4 {
                while (used >> ns) & 1 == 1 {
                    ns = (ns + 1) & 3;
                }
                let cand = r | ns;
                if !bot_new || cand != bot_card {
                    nc = Some(cand);
                    break;
                }
                ns = (ns + 1) & 3;
            }
            let nc = nc.expect("anonymised card has no free suit");
            h &= !(0xffu64 << (8 * i));
            h |= u64::from(nc) << (8 * i);
            ns = (ns + 1) & 3;
        }
        Hand64(h)
    }

    /// Formats the first n cards; anonymised suits print as x.
    pub fn to_string_n(self, n: usize) -> String {
        let mut names = Vec::with_capacity(n);
        for i in 0..n.min(7) {
            let b = Hand64(self.0).byte(i);
            let rank_ch = RANK_TO_CHAR[usize::from((b >> 2) & 0xf)];
            if b & X_SUIT != 0 {
                names.push(format!("x{}", rank_ch));
            } else {
                names.push(format!("{}{}", SUIT_TO_CHAR[usize::from(b & 3)], rank_ch));
            }
        }
        names.join(" ")
    }
}

/// A permutation of the four suits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitTransform(pub [u8; 4]);

impl SuitTransform {
    pub const IDENTITY: SuitTransform = SuitTransform([0, 1, 2, 3]);

    /// The transform equivalent to applying self first and then other.
    pub fn compose(self, other: SuitTransform) -> SuitTransform {
        SuitTransform([
            other.0[self.0[0] as usize],
            other.0[self.0[1] as usize],
            other.0[self.0[2] as usize],
            other.0[self.0[3] as usize],
        ])
    }

    /// Remaps the card's suit.
    pub fn apply(self, c: Card) -> Card {
        Card::from_index_unchecked(self.0[(c.index() & 3) as usize] | (c.index() & !3))
    }

    /// Packs the transform into a byte, two bits per image.
    pub fn to_byte(self) -> SuitTransformByte {
        SuitTransformByte(self.0[0] | self.0[1] << 2 | self.0[2] << 4 | self.0[3] << 6)
    }
}

impl Default for SuitTransform {
    fn default() -> Self {
        SuitTransform::IDENTITY
    }
}

/// A suit permutation packed into a byte, as stored in the flat tables.
/// The identity is `0b11_10_01_00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SuitTransformByte(pub u8);

lazy_static! {
    /// apply() for every (transform, card) pair.
    static ref APPLY_TABLE: [u8; 256 * 64] = {
        let mut t = [0u8; 256 * 64];
        for st in 0..256usize {
            for c in 0..52usize {
                t[st * 64 + c] = SuitTransformByte(st as u8).apply_slow(c as u8);
            }
        }
        t
    };

    /// compose() for every pair of transform bytes.
    static ref COMPOSE_TABLE: [u8; 256 * 256] = {
        let mut t = [0u8; 256 * 256];
        for a in 0..256usize {
            for b in 0..256usize {
                t[a * 256 + b] = SuitTransformByte(a as u8).compose_slow(SuitTransformByte(b as u8));
            }
        }
        t
    };
}

impl SuitTransformByte {
    pub const IDENTITY: SuitTransformByte = SuitTransformByte(0b11_10_01_00);

    fn apply_slow(self, c: u8) -> u8 {
        (self.0 >> (2 * (c & 3))) & 3 | (c & !3)
    }

    fn compose_slow(self, other: SuitTransformByte) -> u8 {
        let mut r = (other.0 >> (2 * (self.0 & 3))) & 3;
        r |= ((other.0 >> (2 * ((self.0 >> 2) & 3))) & 3) << 2;
        r |= ((other.0 >> (2 * ((self.0 >> 4) & 3))) & 3) << 4;
        r |= ((other.0 >> (2 * ((self.0 >> 6) & 3))) & 3) << 6;
        r
    }

    /// Remaps the card's suit.
    #[inline]
    pub fn apply(self, c: Card) -> Card {
        Card::from_index_unchecked(APPLY_TABLE[usize::from(self.0) * 64 + usize::from(c.index())])
    }

    /// The transform equivalent to applying self first and then other.
    #[inline]
    pub fn compose(self, other: SuitTransformByte) -> SuitTransformByte {
        SuitTransformByte(COMPOSE_TABLE[usize::from(self.0) * 256 + usize::from(other.0)])
    }

    /// Unpacks into the four-element form.
    pub fn long(self) -> SuitTransform {
        SuitTransform([self.0 & 3, (self.0 >> 2) & 3, (self.0 >> 4) & 3, (self.0 >> 6) & 3])
    }
}
