use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::Hand;

/// Player moves. `Blackjack` and `Bust` are terminal resolutions that appear
/// alone in a legal set; the rest are choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Move {
    Blackjack,
    Bust,
    Hit,
    Stand,
    Double,
    Split,
}

impl Move {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Move::Blackjack | Move::Bust)
    }
}

pub type MoveSet = BTreeSet<Move>;

/// Table-wide split tracking for the current round.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SplitBudget {
    pub split_once: bool,
    pub split_twice: bool,
}

impl SplitBudget {
    /// The first split is always allowed. A second needs a hand that did not
    /// come from splitting Aces.
    pub fn allows(&self, hand: &Hand) -> bool {
        if !self.split_once {
            return true;
        }
        !self.split_twice && !hand.split_aces
    }

    pub fn record_split(&mut self) {
        if self.split_once {
            self.split_twice = true;
        } else {
            self.split_once = true;
        }
    }
}

/// Moves currently legal for `hand`.
pub fn legal_moves(hand: &Hand, budget: &SplitBudget) -> MoveSet {
    if hand.is_blackjack() {
        return MoveSet::from([Move::Blackjack]);
    }
    if hand.is_bust() {
        return MoveSet::from([Move::Bust]);
    }
    // A doubled hand has taken its one card
    if hand.doubled {
        return MoveSet::from([Move::Stand]);
    }

    let mut moves = MoveSet::from([Move::Hit, Move::Stand]);
    if hand.len() == 2 {
        moves.insert(Move::Double);
    }
    if hand.can_split() && budget.allows(hand) {
        moves.insert(Move::Split);
    }
    moves
}
