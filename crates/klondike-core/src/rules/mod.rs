//! Advisor move vocabulary, legal-move generation and the transition
//! function producing successor states.

pub mod apply;
pub mod generate;
pub mod moves;

pub use apply::apply;
pub use generate::legal_moves;
pub use moves::{Move, MoveCategory};
