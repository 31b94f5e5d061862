mod card;
mod error;
mod game;
mod hand;
mod moves;
mod rules;
mod shoe;
mod strategy;

pub use card::Rank;
pub use error::GameError;
pub use game::{Game, GamePhase, HandResult};
pub use hand::{
    can_split_cards, hand_totals, is_blackjack, is_busted, is_soft_hand, Hand, HandOutcome,
};
pub use moves::{legal_moves, Move, MoveSet, SplitBudget};
pub use rules::{PayoutRatio, TableRules};
pub use shoe::{Shoe, CARDS_PER_DECK};
pub use strategy::{optimal_move, BasicStrategy, Decision, RandomStrategy, Strategy};
