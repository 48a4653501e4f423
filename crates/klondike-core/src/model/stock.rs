use crate::model::card::Card;

/// Face-down draw pile. The top is the end of the sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StockPile {
    cards: Vec<Card>,
}

/// Face-up discard pile fed by the stock. The top is the end of the sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WastePile {
    cards: Vec<Card>,
}

impl StockPile {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Self {
        let mut stock = Self::new();
        for card in cards {
            stock.add(card);
        }
        stock
    }

    pub fn draw(&mut self) -> Option<Card> {
        self.cards.pop()
    }

    pub fn add(&mut self, mut card: Card) {
        card.revealed = false;
        self.cards.push(card);
    }

    /// Move every waste card back into the stock, face-down, so the cards
    /// are drawn again in the order they were first drawn. Returns the
    /// number of cards moved.
    pub fn recycle_from(&mut self, waste: &mut WastePile) -> usize {
        let mut moved = 0;
        while let Some(card) = waste.pop() {
            self.add(card);
            moved += 1;
        }
        moved
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

impl WastePile {
    pub fn new() -> Self {
        Self { cards: Vec::new() }
    }

    pub fn from_cards<I: IntoIterator<Item = Card>>(cards: I) -> Self {
        let mut waste = Self::new();
        for card in cards {
            waste.add(card);
        }
        waste
    }

    pub fn add(&mut self, mut card: Card) {
        card.revealed = true;
        self.cards.push(card);
    }

    pub fn peek(&self) -> Option<Card> {
        self.cards.last().copied()
    }

    pub fn pop(&mut self) -> Option<Card> {
        self.cards.pop()
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
