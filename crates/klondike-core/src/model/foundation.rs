use crate::model::card::Card;
use crate::model::rank::Rank;
use crate::model::suit::Suit;

/// Single-suit pile built up from the Ace. Holds `cards[i].rank == i + 1`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FoundationPile {
    suit: Suit,
    cards: Vec<Card>,
}

impl FoundationPile {
    pub fn new(suit: Suit) -> Self {
        Self {
            suit,
            cards: Vec::with_capacity(13),
        }
    }

    pub(crate) fn with_cards_unchecked(suit: Suit, cards: Vec<Card>) -> Self {
        Self { suit, cards }
    }

    pub fn suit(&self) -> Suit {
        self.suit
    }

    pub fn can_add(&self, card: Card) -> bool {
        card.suit == self.suit && self.next_rank() == Some(card.rank)
    }

    /// Appends `card` when legal. The card's facing is left untouched.
    pub fn add(&mut self, card: Card) -> bool {
        if self.can_add(card) {
            self.cards.push(card);
            true
        } else {
            false
        }
    }

    pub fn peek(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Rank the pile needs next, or `None` once the King is home.
    pub fn next_rank(&self) -> Option<Rank> {
        Rank::from_value(self.cards.len() as u8 + 1)
    }

    pub fn is_complete(&self) -> bool {
        self.cards.len() == Rank::ORDERED.len()
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }
}
