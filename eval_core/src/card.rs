use std::fmt;

use thiserror::Error;

/// Number of cards in a standard deck.
pub const CARD_COUNT: u8 = 52;

/// Number of ranks in a standard deck (2 -> A).
pub const RANK_COUNT: u8 = 13;

/// Rank index (0..=12, deuce first) to rank character.
pub const RANK_TO_CHAR: &[char; 13] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'T', 'J', 'Q', 'K', 'A',
];

/// Suit index to suit character.
pub const SUIT_TO_CHAR: &[char; 4] = &['C', 'D', 'H', 'S'];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CardError {
    #[error("illegal card: suit {suit} rank {rank}")]
    InvalidCard { suit: u8, rank: u8 },
    #[error("can't parse card {0:?}")]
    Parse(String),
}

/// A card suit. The numeric value is the low two bits of a card index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u8)]
pub enum Suit {
    Club = 0,
    Diamond = 1,
    Heart = 2,
    Spade = 3,
}

impl Suit {
    /// All four suits in index order.
    pub const ALL: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];

    fn from_char(ch: char) -> Option<Suit> {
        match ch {
            'C' => Some(Suit::Club),
            'D' => Some(Suit::Diamond),
            'H' => Some(Suit::Heart),
            'S' => Some(Suit::Spade),
            _ => None,
        }
    }
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", SUIT_TO_CHAR[*self as usize])
    }
}

/// A single playing card, stored as an index from 0 to 51.
///
/// The low two bits are the suit, the remaining bits the rank offset from
/// deuce: `index = raw_rank << 2 | suit` with `raw_rank` 0 for a deuce up to
/// 12 for an ace. This layout keeps rank extraction and suit remapping to
/// single shifts in the table walkers.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Card(u8);

impl Card {
    /// All 52 cards in index order (rank major).
    pub const ALL: [Card; 52] = {
        let mut cards = [Card(0); 52];
        let mut i = 0;
        while i < 52 {
            cards[i] = Card(i as u8);
            i += 1;
        }
        cards
    };

    /// Constructs a card from a suit and a rank between 2 and 14 (ace).
    pub fn new(suit: Suit, rank: u8) -> Result<Card, CardError> {
        if !(2..=14).contains(&rank) {
            return Err(CardError::InvalidCard { suit: suit as u8, rank });
        }
        Ok(Card(((rank - 2) << 2) | suit as u8))
    }

    /// Constructs a card from its index, if valid.
    pub fn from_index(index: u8) -> Result<Card, CardError> {
        if index < CARD_COUNT {
            Ok(Card(index))
        } else {
            Err(CardError::InvalidCard { suit: index & 3, rank: (index >> 2) + 2 })
        }
    }

    pub(crate) const fn from_index_unchecked(index: u8) -> Card {
        Card(index)
    }

    /// The card index from 0 to 51.
    pub const fn index(self) -> u8 {
        self.0
    }

    /// The card suit.
    pub const fn suit(self) -> Suit {
        match self.0 & 3 {
            0 => Suit::Club,
            1 => Suit::Diamond,
            2 => Suit::Heart,
            _ => Suit::Spade,
        }
    }

    /// The rank strength from 0 (deuce) to 12 (ace).
    pub const fn raw_rank(self) -> u8 {
        self.0 >> 2
    }

    /// The rank from 2 to 14 (ace).
    pub const fn rank(self) -> u8 {
        self.raw_rank() + 2
    }

    /// Parses a card name like `CA`, `Ac` or `aC`; suit and rank may come in
    /// either order and any case.
    pub fn parse(name: &str) -> Result<Card, CardError> {
        let err = || CardError::Parse(name.to_string());
        if !name.is_ascii() || name.len() != 2 {
            return Err(err());
        }
        let up = name.to_ascii_uppercase();
        let mut chars = up.chars();
        let (a, b) = (chars.next().ok_or_else(err)?, chars.next().ok_or_else(err)?);
        make_from_chars(a, b).or_else(|| make_from_chars(b, a)).ok_or_else(err)
    }
}

fn make_from_chars(suit_ch: char, rank_ch: char) -> Option<Card> {
    let suit = Suit::from_char(suit_ch)?;
    let raw = RANK_TO_CHAR.iter().position(|&c| c == rank_ch)? as u8;
    Some(Card((raw << 2) | suit as u8))
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.suit(), RANK_TO_CHAR[self.raw_rank() as usize])
    }
}

impl fmt::Debug for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

/// The full deck in suit-major, rank-minor order.
pub const DECK: [Card; 52] = {
    let mut deck = [Card(0); 52];
    let mut s = 0;
    while s < 4 {
        let mut r = 0;
        while r < 13 {
            deck[s * 13 + r] = Card(((r as u8) << 2) | s as u8);
            r += 1;
        }
        s += 1;
    }
    deck
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_round_trip() {
        for c in Card::ALL {
            assert_eq!(Card::parse(&c.to_string()), Ok(c), "card {}", c);
        }
    }

    #[test]
    fn test_parse_variants() {
        let ace_clubs = Card::new(Suit::Club, 14).unwrap();
        for name in ["CA", "AC", "cA", "Ac", "ca"] {
            assert_eq!(Card::parse(name), Ok(ace_clubs), "name {name}");
        }
        let ten_hearts = Card::new(Suit::Heart, 10).unwrap();
        assert_eq!(Card::parse("Th"), Ok(ten_hearts));
        assert_eq!(Card::parse("HT"), Ok(ten_hearts));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        for name in ["", "C", "CAA", "XZ", "C1", "1C", "é2"] {
            assert!(Card::parse(name).is_err(), "name {name:?}");
        }
    }

    #[test]
    fn test_new_rejects_bad_ranks() {
        assert!(Card::new(Suit::Club, 0).is_err());
        assert!(Card::new(Suit::Club, 1).is_err());
        assert!(Card::new(Suit::Club, 15).is_err());
    }

    #[test]
    fn test_rank_and_suit_accessors() {
        let c = Card::parse("S2").unwrap();
        assert_eq!(c.suit(), Suit::Spade);
        assert_eq!(c.rank(), 2);
        assert_eq!(c.raw_rank(), 0);

        let c = Card::parse("DA").unwrap();
        assert_eq!(c.suit(), Suit::Diamond);
        assert_eq!(c.rank(), 14);
        assert_eq!(c.raw_rank(), 12);
    }

    #[test]
    fn test_deck_is_suit_major() {
        assert_eq!(DECK[0].to_string(), "C2");
        assert_eq!(DECK[12].to_string(), "CA");
        assert_eq!(DECK[13].to_string(), "D2");
        assert_eq!(DECK[51].to_string(), "SA");
        let mut seen = [false; 52];
        for c in DECK {
            assert!(!seen[c.index() as usize]);
            seen[c.index() as usize] = true;
        }
    }
}
