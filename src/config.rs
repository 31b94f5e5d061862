use std::str::FromStr;

use blackjack::TableRules;
use serde::{Deserialize, Serialize};

use crate::SimError;

/// How the simulated player picks moves
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StrategyKind {
    /// Uniform over the legal moves
    #[default]
    Random,
    /// Basic strategy chart
    Basic,
}

impl FromStr for StrategyKind {
    type Err = SimError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "random" => Ok(StrategyKind::Random),
            "basic" => Ok(StrategyKind::Basic),
            _ => Err(SimError::Config(format!(
                "unknown strategy '{s}', expected random or basic"
            ))),
        }
    }
}

/// How bets are sized between rounds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BettingConfig {
    /// Always the table's default bet
    #[default]
    Flat,
    /// Default bet times the floored true count, between 1 and `max_units`
    CountSpread { max_units: u64 },
}

/// Batch simulation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub rules: TableRules,

    /// Independent games (each with its own shoe and bankroll)
    pub games: u32,

    /// Rounds dealt per game
    pub rounds_per_game: u64,

    /// Fraction of the shoe dealt before reshuffling
    pub penetration: f64,

    /// Reshuffle early when fewer cards than this remain
    pub min_cards: usize,

    pub strategy: StrategyKind,

    pub betting: BettingConfig,

    /// Seed for reproducible runs; game `i` uses `seed + i`
    pub seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            rules: TableRules::default(),
            games: 1,
            rounds_per_game: 1000,
            penetration: 0.75,
            min_cards: 20,
            strategy: StrategyKind::Random,
            betting: BettingConfig::Flat,
            seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), SimError> {
        self.rules.validate()?;

        if self.games == 0 {
            return Err(SimError::Config("at least one game is required".to_string()));
        }
        if self.rounds_per_game == 0 {
            return Err(SimError::Config("rounds per game must be positive".to_string()));
        }
        if !(self.penetration > 0.0 && self.penetration <= 1.0) {
            return Err(SimError::Config(format!(
                "penetration must be in (0, 1], got {}",
                self.penetration
            )));
        }
        if let BettingConfig::CountSpread { max_units: 0 } = self.betting {
            return Err(SimError::Config("max units must be at least 1".to_string()));
        }
        Ok(())
    }
}
