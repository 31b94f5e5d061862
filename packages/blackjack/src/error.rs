use thiserror::Error;

use crate::Move;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// The shoe ran out mid-round. Deck count is too small for the volume of
    /// play; the caller must not retry.
    #[error("Cannot draw from an empty shoe")]
    EmptyShoe,
    #[error("Illegal move {attempted:?}, legal moves are {legal:?}")]
    IllegalMove { attempted: Move, legal: Vec<Move> },
    #[error("Invalid bet: {0}")]
    InvalidBet(u64),
    #[error("No hand is in play")]
    NoActiveHand,
    #[error("Invalid card symbol '{0}'")]
    InvalidCard(char),
}
