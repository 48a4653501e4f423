pub mod card;
pub mod deck;
pub mod foundation;
pub mod rank;
pub mod state;
pub mod stock;
pub mod suit;
pub mod tableau;
