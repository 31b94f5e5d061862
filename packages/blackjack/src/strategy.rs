use rand::rngs::StdRng;
use rand::seq::IteratorRandom;
use rand::{Rng, SeedableRng};

use crate::hand::{can_split_cards, hand_totals, is_soft_hand};
use crate::{Hand, Move, MoveSet, Rank};

/// What a strategy sees when the engine needs a choice for hand 0.
#[derive(Debug, Clone, Copy)]
pub struct Decision<'a> {
    pub hand: &'a Hand,
    pub dealer_up_card: Option<Rank>,
    pub legal: &'a MoveSet,
    pub true_count: f64,
}

/// Picks a move for the hand in play. Returning a move outside
/// `decision.legal` makes the engine reject it with `GameError::IllegalMove`.
pub trait Strategy {
    fn choose(&mut self, decision: &Decision<'_>) -> Move;
}

impl<F> Strategy for F
where
    F: FnMut(&Decision<'_>) -> Move,
{
    fn choose(&mut self, decision: &Decision<'_>) -> Move {
        self(decision)
    }
}

/// Uniform choice over the legal set. Baseline for simulations.
#[derive(Debug, Clone)]
pub struct RandomStrategy<R> {
    rng: R,
}

impl<R: Rng> RandomStrategy<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }
}

impl RandomStrategy<StdRng> {
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> Strategy for RandomStrategy<R> {
    fn choose(&mut self, decision: &Decision<'_>) -> Move {
        decision
            .legal
            .iter()
            .copied()
            .choose(&mut self.rng)
            .unwrap_or(Move::Stand)
    }
}

/// Basic strategy chart for a dealer that hits soft 17.
#[derive(Debug, Clone, Copy, Default)]
pub struct BasicStrategy;

impl Strategy for BasicStrategy {
    fn choose(&mut self, decision: &Decision<'_>) -> Move {
        let preferred = match decision.dealer_up_card {
            Some(up) => optimal_move(
                &decision.hand.cards,
                up,
                decision.legal.contains(&Move::Double),
                decision.legal.contains(&Move::Split),
            ),
            None => Move::Stand,
        };

        if decision.legal.contains(&preferred) {
            preferred
        } else {
            decision.legal.iter().next().copied().unwrap_or(Move::Stand)
        }
    }
}

/// Get the optimal move based on basic strategy
pub fn optimal_move(
    player_cards: &[Rank],
    dealer_up_card: Rank,
    can_double: bool,
    can_split: bool,
) -> Move {
    let (_, player_value) = hand_totals(player_cards);
    let dealer_value = match dealer_up_card {
        Rank::Ace => 11,
        other => other.point_value(),
    };
    let is_soft = is_soft_hand(player_cards);

    if can_split && player_cards.len() == 2 && can_split_cards(&player_cards[0], &player_cards[1]) {
        match player_cards[0] {
            // Always split Aces and 8s
            Rank::Ace | Rank::Eight => return Move::Split,
            // Split 9s except against 7, 10, or Ace
            Rank::Nine if !matches!(dealer_value, 7 | 10 | 11) => return Move::Split,
            Rank::Two | Rank::Three | Rank::Six | Rank::Seven if (2..=7).contains(&dealer_value) => {
                return Move::Split
            }
            // Never split 10s, 5s, 4s
            _ => {}
        }
    }

    if can_double {
        let double = if is_soft {
            match player_value {
                19 => dealer_value == 6,
                18 => (2..=6).contains(&dealer_value),
                17 => (3..=6).contains(&dealer_value),
                15 | 16 => (4..=6).contains(&dealer_value),
                13 | 14 => (5..=6).contains(&dealer_value),
                _ => false,
            }
        } else {
            match player_value {
                11 => true,
                10 => dealer_value <= 9,
                9 => (3..=6).contains(&dealer_value),
                _ => false,
            }
        };
        if double {
            return Move::Double;
        }
    }

    if is_soft {
        match player_value {
            19..=21 => Move::Stand,
            18 if dealer_value >= 9 => Move::Hit,
            18 => Move::Stand,
            _ => Move::Hit,
        }
    } else {
        match player_value {
            17..=21 => Move::Stand,
            13..=16 if (2..=6).contains(&dealer_value) => Move::Stand,
            12 if (4..=6).contains(&dealer_value) => Move::Stand,
            _ => Move::Hit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{legal_moves, SplitBudget};

    fn ranks(symbols: &str) -> Vec<Rank> {
        Rank::parse_many(symbols).unwrap()
    }

    fn decide<S: Strategy>(strategy: &mut S, symbols: &str, up: Rank) -> Move {
        let hand: Hand = symbols.parse().unwrap();
        let legal = legal_moves(&hand, &SplitBudget::default());
        strategy.choose(&Decision {
            hand: &hand,
            dealer_up_card: Some(up),
            legal: &legal,
            true_count: 0.0,
        })
    }

    #[test]
    fn test_always_split_aces_and_eights() {
        assert_eq!(optimal_move(&ranks("AA"), Rank::Ten, true, true), Move::Split);
        assert_eq!(optimal_move(&ranks("88"), Rank::Ace, true, true), Move::Split);
    }

    #[test]
    fn test_never_split_tens() {
        assert_eq!(optimal_move(&ranks("TT"), Rank::Six, true, true), Move::Stand);
    }

    #[test]
    fn test_nines_against_seven_stand() {
        assert_eq!(optimal_move(&ranks("99"), Rank::Seven, true, true), Move::Stand);
        assert_eq!(optimal_move(&ranks("99"), Rank::Six, true, true), Move::Split);
    }

    #[test]
    fn test_double_eleven() {
        assert_eq!(optimal_move(&ranks("65"), Rank::Ten, true, false), Move::Double);
        assert_eq!(optimal_move(&ranks("65"), Rank::Ten, false, false), Move::Hit);
    }

    #[test]
    fn test_soft_doubling() {
        assert_eq!(optimal_move(&ranks("A7"), Rank::Four, true, false), Move::Double);
        assert_eq!(optimal_move(&ranks("A7"), Rank::Four, false, false), Move::Stand);
        assert_eq!(optimal_move(&ranks("A7"), Rank::Nine, false, false), Move::Hit);
    }

    #[test]
    fn test_hard_totals() {
        assert_eq!(optimal_move(&ranks("T6"), Rank::Six, false, false), Move::Stand);
        assert_eq!(optimal_move(&ranks("T6"), Rank::Seven, false, false), Move::Hit);
        assert_eq!(optimal_move(&ranks("T2"), Rank::Three, false, false), Move::Hit);
        assert_eq!(optimal_move(&ranks("T2"), Rank::Four, false, false), Move::Stand);
        assert_eq!(optimal_move(&ranks("T7"), Rank::Ace, false, false), Move::Stand);
    }

    #[test]
    fn test_basic_strategy_respects_legal_set() {
        let mut strategy = BasicStrategy;
        assert_eq!(decide(&mut strategy, "65", Rank::Ten), Move::Double);
        assert_eq!(decide(&mut strategy, "352", Rank::Ten), Move::Hit);
        assert_eq!(decide(&mut strategy, "88", Rank::Six), Move::Split);
    }

    #[test]
    fn test_random_strategy_stays_legal() {
        let mut strategy = RandomStrategy::seeded(11);
        for _ in 0..200 {
            let mv = decide(&mut strategy, "66", Rank::Nine);
            assert!(matches!(mv, Move::Hit | Move::Stand | Move::Double | Move::Split));
        }
    }

    #[test]
    fn test_closure_strategy() {
        let mut always_stand = |_: &Decision<'_>| Move::Stand;
        assert_eq!(decide(&mut always_stand, "T2", Rank::Two), Move::Stand);
    }
}
