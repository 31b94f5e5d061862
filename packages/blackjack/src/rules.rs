use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Blackjack payout multiplier as a ratio
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayoutRatio {
    pub numerator: u16,
    pub denominator: u16,
}

impl PayoutRatio {
    pub const THREE_TO_TWO: Self = Self {
        numerator: 3,
        denominator: 2,
    };
    pub const SIX_TO_FIVE: Self = Self {
        numerator: 6,
        denominator: 5,
    };
    pub const ONE_TO_ONE: Self = Self {
        numerator: 1,
        denominator: 1,
    };

    pub fn new(numerator: u16, denominator: u16) -> Result<Self, GameError> {
        if denominator == 0 {
            return Err(GameError::Config(
                "payout denominator cannot be zero".to_string(),
            ));
        }
        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Winnings on `bet`, truncated to whole chips and capped at `u64::MAX`.
    pub fn calculate_payout(&self, bet: u64) -> u64 {
        let winnings =
            u128::from(bet) * u128::from(self.numerator) / u128::from(self.denominator.max(1));
        u64::try_from(winnings).unwrap_or(u64::MAX)
    }

    pub fn multiplier(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }
}

impl Default for PayoutRatio {
    fn default() -> Self {
        Self::THREE_TO_TWO
    }
}

impl fmt::Display for PayoutRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.numerator, self.denominator)
    }
}

/// Parses `"N:D"`, e.g. `"3:2"`.
impl FromStr for PayoutRatio {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GameError::Config(format!("invalid payout ratio '{s}', expected N:D"));
        let (num, den) = s.split_once(':').ok_or_else(invalid)?;
        let num: u16 = num.trim().parse().map_err(|_| invalid())?;
        let den: u16 = den.trim().parse().map_err(|_| invalid())?;
        Self::new(num, den)
    }
}

/// Configurable table rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableRules {
    /// Number of decks in the shoe
    pub num_decks: u8,

    /// Blackjack payout multiplier (commonly 3:2 or 6:5)
    pub blackjack_payout: PayoutRatio,

    /// Bankroll the player sits down with
    pub starting_bankroll: i64,

    /// Bet used when the caller does not size one
    pub default_bet: u64,

    /// Dealer hits soft 17
    pub dealer_hits_soft_17: bool,
}

impl Default for TableRules {
    fn default() -> Self {
        Self {
            num_decks: 6,
            blackjack_payout: PayoutRatio::THREE_TO_TWO,
            starting_bankroll: 1000,
            default_bet: 50,
            dealer_hits_soft_17: true,
        }
    }
}

impl TableRules {
    /// Single deck rules (often found in casinos, but with 6:5 blackjack)
    pub fn single_deck() -> Self {
        Self {
            num_decks: 1,
            blackjack_payout: PayoutRatio::SIX_TO_FIVE,
            ..Self::default()
        }
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if self.num_decks == 0 {
            return Err(GameError::Config("at least one deck is required".to_string()));
        }
        if self.blackjack_payout.denominator == 0 {
            return Err(GameError::Config(
                "payout denominator cannot be zero".to_string(),
            ));
        }
        if self.default_bet == 0 {
            return Err(GameError::Config("default bet must be positive".to_string()));
        }
        Ok(())
    }
}
