use crate::model::rank::Rank;
use crate::model::suit::Suit;
use core::fmt;
use core::str::FromStr;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize, Serializer};

/// A playing card. Identity is the `(rank, suit)` pair; `revealed` is
/// board state carried with the card as it moves between piles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
    pub revealed: bool,
}

impl Card {
    pub const fn new(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            revealed: false,
        }
    }

    pub const fn face_up(rank: Rank, suit: Suit) -> Self {
        Self {
            rank,
            suit,
            revealed: true,
        }
    }

    pub const fn is_red(self) -> bool {
        self.suit.is_red()
    }

    pub const fn is_king(self) -> bool {
        matches!(self.rank, Rank::King)
    }

    pub const fn is_ace(self) -> bool {
        matches!(self.rank, Rank::Ace)
    }

    pub fn same_face(self, other: Card) -> bool {
        self.rank == other.rank && self.suit == other.suit
    }

    /// Dense index 0..52 (suit-major), independent of facing.
    pub const fn ordinal(self) -> u8 {
        (self.suit as u8) * 13 + (self.rank.value() - 1)
    }

    /// True when `self` may be stacked on `below` in a tableau build:
    /// one rank lower and the opposite color.
    pub fn builds_on(self, below: Card) -> bool {
        self.rank.is_just_below(below.rank) && self.is_red() != below.is_red()
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardParseError {
    token: String,
}

impl fmt::Display for CardParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not a card (expected e.g. QH, 10S, TS)", self.token)
    }
}

impl std::error::Error for CardParseError {}

impl FromStr for Card {
    type Err = CardParseError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let token = raw.trim();
        let err = || CardParseError {
            token: raw.to_string(),
        };
        let mut chars = token.chars();
        let suit_letter = chars.next_back().ok_or_else(err)?;
        let suit = Suit::from_letter(suit_letter).ok_or_else(err)?;
        let rank = Rank::from_token(chars.as_str()).ok_or_else(err)?;
        Ok(Card::new(rank, suit))
    }
}

impl Serialize for Card {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(de::Error::custom)
    }
}
