use blackjack::GameError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimError {
    #[error(transparent)]
    Game(#[from] GameError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Bankroll {bankroll} cannot cover a bet of {bet}")]
    Bankrupt { bankroll: i64, bet: u64 },
}
