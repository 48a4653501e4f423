use crate::model::card::Card;

pub const DEFAULT_COLUMNS: usize = 7;

/// One fanned tableau column, bottom card first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableauPile {
    cards: Vec<Card>,
}

impl TableauPile {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    /// Builds a column from cards whose facing is already decided (deals,
    /// snapshots). No build rules are checked.
    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Self {
        Self {
            cards: cards.into_iter().collect(),
        }
    }

    pub fn can_add(&self, card: Card) -> bool {
        if self.cards.is_empty() {
            return card.is_king();
        }
        match self.top_revealed() {
            Some(top) => card.builds_on(top),
            None => false,
        }
    }

    /// Places `card` face-up when legal.
    pub fn add(&mut self, mut card: Card) -> bool {
        if !self.can_add(card) {
            return false;
        }
        card.revealed = true;
        self.cards.push(card);
        true
    }

    /// Highest face-up card, scanning down from the physical top.
    pub fn top_revealed(&self) -> Option<Card> {
        self.cards.iter().rev().find(|card| card.revealed).copied()
    }

    pub fn peek(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    /// Flips the physical top face-up if it is face-down. Returns whether a
    /// card was turned.
    pub fn reveal_top(&mut self) -> bool {
        match self.cards.last_mut() {
            Some(card) if !card.revealed => {
                card.revealed = true;
                true
            }
            _ => false,
        }
    }

    /// The maximal face-up suffix.
    pub fn exposed(&self) -> &[Card] {
        let hidden = self
            .cards
            .iter()
            .rposition(|card| !card.revealed)
            .map_or(0, |index| index + 1);
        &self.cards[hidden..]
    }

    pub fn revealed_count(&self) -> usize {
        self.cards.iter().filter(|card| card.revealed).count()
    }

    /// The run `cards[start..]` when it can be lifted as one unit: every
    /// card face-up and each one building on the card beneath it.
    pub fn movable_run(&self, start: usize) -> Option<&[Card]> {
        let run = self.cards.get(start..).filter(|run| !run.is_empty())?;
        if !run.iter().all(|card| card.revealed) {
            return None;
        }
        if run.windows(2).all(|pair| pair[1].builds_on(pair[0])) {
            Some(run)
        } else {
            None
        }
    }

    pub(crate) fn split_off(&mut self, start: usize) -> Vec<Card> {
        self.cards.split_off(start)
    }

    pub(crate) fn extend_face_up(&mut self, run: Vec<Card>) {
        self.cards.extend(run.into_iter().map(|mut card| {
            card.revealed = true;
            card
        }));
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

#[cfg(test)]
mod tests {
    use super::TableauPile;
    use crate::model::card::Card;
    use crate::model::rank::Rank;
    use crate::model::suit::Suit;

    fn king_down_queen_up() -> TableauPile {
        TableauPile::from_cards([
            Card::new(Rank::King, Suit::Spades),
            Card::face_up(Rank::Queen, Suit::Hearts),
        ])
    }

    #[test]
    fn empty_column_only_takes_kings() {
        let pile = TableauPile::new();
        assert!(pile.can_add(Card::new(Rank::King, Suit::Hearts)));
        assert!(!pile.can_add(Card::new(Rank::Queen, Suit::Spades)));
    }

    #[test]
    fn queen_of_hearts_accepts_black_jacks_only() {
        let pile = king_down_queen_up();
        assert!(pile.can_add(Card::new(Rank::Jack, Suit::Spades)));
        assert!(pile.can_add(Card::new(Rank::Jack, Suit::Clubs)));
        assert!(!pile.can_add(Card::new(Rank::Jack, Suit::Hearts)));
        assert!(!pile.can_add(Card::new(Rank::Jack, Suit::Diamonds)));
        for suit in Suit::ALL {
            assert!(!pile.can_add(Card::new(Rank::Ten, suit)));
        }
    }

    #[test]
    fn all_face_down_column_is_never_a_destination() {
        let pile = TableauPile::from_cards([Card::new(Rank::Five, Suit::Spades)]);
        assert!(!pile.can_add(Card::new(Rank::Four, Suit::Hearts)));
        assert!(!pile.can_add(Card::new(Rank::King, Suit::Hearts)));
    }

    #[test]
    fn add_places_card_face_up() {
        let mut pile = king_down_queen_up();
        assert!(pile.add(Card::new(Rank::Jack, Suit::Clubs)));
        assert_eq!(pile.peek().map(|c| c.revealed), Some(true));
        assert_eq!(pile.exposed().len(), 2);
    }

    #[test]
    fn reveal_top_only_flips_face_down_top() {
        let mut pile = king_down_queen_up();
        pile.pop();
        assert!(pile.reveal_top());
        assert!(!pile.reveal_top());
        assert_eq!(pile.exposed().len(), 1);
    }

    #[test]
    fn movable_run_requires_valid_face_up_sequence() {
        let mut pile = king_down_queen_up();
        pile.add(Card::new(Rank::Jack, Suit::Spades));
        assert_eq!(pile.movable_run(1).map(<[Card]>::len), Some(2));
        assert_eq!(pile.movable_run(2).map(<[Card]>::len), Some(1));
        assert!(pile.movable_run(0).is_none());
        assert!(pile.movable_run(3).is_none());
    }
}
