use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{GameError, Rank};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HandOutcome {
    Blackjack,
    Win,
    Push,
    Loss,
    Bust,
}

/// Lowest and highest totals of a run of cards.
///
/// Lowest counts every Ace as 1. Highest promotes Aces to 11, one at a time,
/// for as long as the total stays at or under 21.
pub fn hand_totals(cards: &[Rank]) -> (u16, u16) {
    let lowest = cards
        .iter()
        .fold(0u16, |total, c| total.saturating_add(c.point_value().into()));
    let mut highest = lowest;

    for _ in cards.iter().filter(|c| c.is_ace()) {
        if highest > 11 {
            break;
        }
        highest += 10;
    }

    (lowest, highest)
}

/// Check if a hand is soft (has an ace counted as 11)
pub fn is_soft_hand(cards: &[Rank]) -> bool {
    let (lowest, highest) = hand_totals(cards);
    highest != lowest
}

/// Check if a hand is busted
pub fn is_busted(cards: &[Rank]) -> bool {
    hand_totals(cards).0 > 21
}

/// Check if a hand is blackjack (21 with 2 cards)
pub fn is_blackjack(cards: &[Rank]) -> bool {
    cards.len() == 2 && hand_totals(cards).1 == 21
}

/// Check if two cards can be split (same rank)
pub fn can_split_cards(card1: &Rank, card2: &Rank) -> bool {
    card1 == card2
}

/// One party's cards. Player hands carry a bet; the dealer's does not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Rank>,
    pub bet: Option<u64>,
    pub doubled: bool,
    /// Set on both hands produced by splitting a pair of Aces.
    pub split_aces: bool,
}

impl Hand {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bet(bet: u64) -> Self {
        Self {
            bet: Some(bet),
            ..Self::default()
        }
    }

    pub fn from_cards(cards: Vec<Rank>) -> Self {
        Self {
            cards,
            ..Self::default()
        }
    }

    pub fn add_card(&mut self, card: Rank) {
        self.cards.push(card);
    }

    /// `(lowest, highest)`, recomputed from the cards on every call.
    pub fn totals(&self) -> (u16, u16) {
        hand_totals(&self.cards)
    }

    pub fn lowest(&self) -> u16 {
        self.totals().0
    }

    pub fn highest(&self) -> u16 {
        self.totals().1
    }

    pub fn is_soft(&self) -> bool {
        is_soft_hand(&self.cards)
    }

    pub fn is_bust(&self) -> bool {
        is_busted(&self.cards)
    }

    pub fn is_blackjack(&self) -> bool {
        is_blackjack(&self.cards)
    }

    pub fn can_split(&self) -> bool {
        self.cards.len() == 2 && can_split_cards(&self.cards[0], &self.cards[1])
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn bet_amount(&self) -> u64 {
        self.bet.unwrap_or(0)
    }
}

impl FromStr for Hand {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Hand::from_cards(Rank::parse_many(s)?))
    }
}

impl fmt::Display for Hand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbols: String = self.cards.iter().map(|c| c.symbol()).collect();
        let (lowest, highest) = self.totals();
        if lowest == highest {
            write!(f, "{symbols} ({highest})")
        } else {
            write!(f, "{symbols} ({lowest}/{highest})")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hand(symbols: &str) -> Hand {
        symbols.parse().unwrap()
    }

    #[test]
    fn test_totals_simple() {
        assert_eq!(hand("23").totals(), (5, 5));
        assert_eq!(hand("KQ").totals(), (20, 20));
    }

    #[test]
    fn test_totals_empty_hand_is_zero() {
        assert_eq!(Hand::new().totals(), (0, 0));
        assert!(!Hand::new().is_blackjack());
    }

    #[test]
    fn test_totals_ace_jack() {
        assert_eq!(hand("AJ").totals(), (11, 21));
    }

    #[test]
    fn test_totals_promotes_only_one_of_two_aces() {
        assert_eq!(hand("A2A").totals(), (4, 14));
        assert_eq!(hand("AA9").totals(), (11, 21));
    }

    #[test]
    fn test_totals_hard_ace() {
        assert_eq!(hand("A69").totals(), (16, 16));
    }

    #[test]
    fn test_highest_never_below_lowest() {
        for symbols in ["", "A", "AA", "AAAA", "5A", "T9A", "KQJ", "A2A", "66"] {
            let (lowest, highest) = hand(symbols).totals();
            assert!(highest >= lowest, "{symbols}");
            if !symbols.contains('A') {
                assert_eq!(highest, lowest, "{symbols}");
            }
        }
    }

    #[test]
    fn test_long_hand_totals() {
        let long = hand(&"T".repeat(26));
        assert_eq!(long.totals(), (260, 260));
        assert!(long.is_bust());

        let aces = hand(&"A".repeat(300));
        assert_eq!(aces.totals(), (300, 300));

        let huge = Hand::from_cards(vec![Rank::King; 10_000]);
        let (lowest, highest) = huge.totals();
        assert_eq!(lowest, u16::MAX);
        assert!(highest >= lowest);
    }

    #[test]
    fn test_is_blackjack_requires_two_cards() {
        assert!(hand("AJ").is_blackjack());
        assert!(hand("AT").is_blackjack());
        assert!(!hand("2J").is_blackjack());
        assert!(!hand("2J9").is_blackjack());
        assert!(!hand("A2").is_blackjack());
    }

    #[test]
    fn test_is_bust() {
        assert!(hand("KQ5").is_bust());
        assert!(hand("TJT").is_bust());
        assert!(!hand("KQ").is_bust());
        assert!(!hand("AK9").is_bust());
    }

    #[test]
    fn test_is_soft() {
        assert!(hand("A6").is_soft());
        assert!(!hand("A69").is_soft());
        assert!(!hand("KQ").is_soft());
    }

    #[test]
    fn test_can_split_same_rank_only() {
        assert!(hand("88").can_split());
        assert!(!hand("89").can_split());
        assert!(!hand("KQ").can_split());
        assert!(!hand("882").can_split());
    }

    #[test]
    fn test_add_card_updates_totals() {
        let mut h = Hand::with_bet(10);
        h.add_card(Rank::Ace);
        assert_eq!(h.totals(), (1, 11));
        h.add_card(Rank::Six);
        assert_eq!(h.totals(), (7, 17));
        h.add_card(Rank::King);
        assert_eq!(h.totals(), (17, 17));
        assert_eq!(h.bet_amount(), 10);
    }

    #[test]
    fn test_display() {
        assert_eq!(hand("A6").to_string(), "A6 (7/17)");
        assert_eq!(hand("KQ").to_string(), "KQ (20)");
    }
}
