use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::GameError;

/// Card rank. Suits never matter to the game, so a shoe is a multiset of ranks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// One deck's worth of ranks, in symbol order.
    pub const ALL: [Rank; 13] = [
        Rank::Two,
        Rank::Three,
        Rank::Four,
        Rank::Five,
        Rank::Six,
        Rank::Seven,
        Rank::Eight,
        Rank::Nine,
        Rank::Ten,
        Rank::Jack,
        Rank::Queen,
        Rank::King,
        Rank::Ace,
    ];

    pub fn symbol(&self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }

    pub fn from_symbol(symbol: char) -> Option<Self> {
        match symbol.to_ascii_uppercase() {
            '2' => Some(Rank::Two),
            '3' => Some(Rank::Three),
            '4' => Some(Rank::Four),
            '5' => Some(Rank::Five),
            '6' => Some(Rank::Six),
            '7' => Some(Rank::Seven),
            '8' => Some(Rank::Eight),
            '9' => Some(Rank::Nine),
            'T' => Some(Rank::Ten),
            'J' => Some(Rank::Jack),
            'Q' => Some(Rank::Queen),
            'K' => Some(Rank::King),
            'A' => Some(Rank::Ace),
            _ => None,
        }
    }

    /// Point value used for hand totals. Aces are 1 here; promotion to 11
    /// happens in `Hand::totals`.
    pub fn point_value(&self) -> u8 {
        match self {
            Rank::Ace => 1,
            Rank::Two => 2,
            Rank::Three => 3,
            Rank::Four => 4,
            Rank::Five => 5,
            Rank::Six => 6,
            Rank::Seven => 7,
            Rank::Eight => 8,
            Rank::Nine => 9,
            _ => 10, // Ten, Jack, Queen, King
        }
    }

    /// Hi-Lo count value.
    pub fn count_value(&self) -> i32 {
        match self {
            Rank::Two | Rank::Three | Rank::Four | Rank::Five | Rank::Six => 1,
            Rank::Seven | Rank::Eight | Rank::Nine => 0,
            _ => -1,
        }
    }

    pub fn is_ace(&self) -> bool {
        matches!(self, Rank::Ace)
    }

    /// Parse a run of symbols such as `"A2A"`. Whitespace is ignored.
    pub fn parse_many(symbols: &str) -> Result<Vec<Rank>, GameError> {
        symbols
            .chars()
            .filter(|c| !c.is_whitespace())
            .map(|c| Rank::from_symbol(c).ok_or(GameError::InvalidCard(c)))
            .collect()
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

impl FromStr for Rank {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Rank::from_symbol(c).ok_or(GameError::InvalidCard(c)),
            (Some(c), Some(_)) => Err(GameError::InvalidCard(c)),
            (None, _) => Err(GameError::InvalidCard(' ')),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deck_has_thirteen_distinct_ranks() {
        let mut symbols: Vec<char> = Rank::ALL.iter().map(|r| r.symbol()).collect();
        symbols.dedup();
        assert_eq!(symbols.len(), 13);
        assert_eq!(symbols.iter().collect::<String>(), "23456789TJQKA");
    }

    #[test]
    fn test_symbol_round_trip() {
        for rank in Rank::ALL {
            assert_eq!(Rank::from_symbol(rank.symbol()), Some(rank));
        }
        assert_eq!(Rank::from_symbol('j'), Some(Rank::Jack));
        assert_eq!(Rank::from_symbol('1'), None);
    }

    #[test]
    fn test_point_values() {
        assert_eq!(Rank::Ace.point_value(), 1);
        assert_eq!(Rank::Seven.point_value(), 7);
        assert_eq!(Rank::King.point_value(), 10);
        assert_eq!(Rank::Ten.point_value(), 10);
    }

    #[test]
    fn test_hi_lo_values_balance_over_a_deck() {
        let total: i32 = Rank::ALL.iter().map(|r| r.count_value()).sum();
        assert_eq!(total, 0);
        assert_eq!(Rank::Five.count_value(), 1);
        assert_eq!(Rank::Eight.count_value(), 0);
        assert_eq!(Rank::Ace.count_value(), -1);
    }

    #[test]
    fn test_parse_many() {
        let ranks = Rank::parse_many("A 2 a").unwrap();
        assert_eq!(ranks, vec![Rank::Ace, Rank::Two, Rank::Ace]);
        assert_eq!(Rank::parse_many("AX"), Err(GameError::InvalidCard('X')));
    }

    #[test]
    fn test_from_str_rejects_multiple_symbols() {
        assert_eq!("Q".parse::<Rank>(), Ok(Rank::Queen));
        assert!("QK".parse::<Rank>().is_err());
        assert!("".parse::<Rank>().is_err());
    }
}
