use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{GameError, Rank};

pub const CARDS_PER_DECK: usize = 13;

/// Shuffled multiset of ranks plus the Hi-Lo count of everything drawn so far.
///
/// Cards come off the end of `cards`. Every draw moves exactly one card to the
/// discard pile, so `remaining() + discarded()` never changes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shoe {
    cards: Vec<Rank>,
    discard: Vec<Rank>,
    running_count: i32,
}

impl Shoe {
    pub fn new(num_decks: u8) -> Result<Self, GameError> {
        Self::with_rng(num_decks, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(num_decks: u8, rng: &mut R) -> Result<Self, GameError> {
        if num_decks == 0 {
            return Err(GameError::Config("at least one deck is required".to_string()));
        }

        let mut cards: Vec<Rank> = (0..num_decks)
            .flat_map(|_| Rank::ALL.iter().copied())
            .collect();
        cards.shuffle(rng);

        Ok(Self {
            cards,
            discard: Vec::new(),
            running_count: 0,
        })
    }

    /// Shoe whose draws come out in exactly `draw_order`.
    pub fn stacked<I: IntoIterator<Item = Rank>>(draw_order: I) -> Self {
        let mut cards: Vec<Rank> = draw_order.into_iter().collect();
        cards.reverse();
        Self {
            cards,
            discard: Vec::new(),
            running_count: 0,
        }
    }

    pub fn draw(&mut self) -> Result<Rank, GameError> {
        let card = self.cards.pop().ok_or(GameError::EmptyShoe)?;
        self.discard.push(card);
        self.running_count += card.count_value();
        Ok(card)
    }

    pub fn remaining(&self) -> usize {
        self.cards.len()
    }

    pub fn discarded(&self) -> usize {
        self.discard.len()
    }

    pub fn discard_pile(&self) -> &[Rank] {
        &self.discard
    }

    pub fn size(&self) -> usize {
        self.cards.len() + self.discard.len()
    }

    /// Fraction of the shoe already dealt.
    pub fn penetration(&self) -> f64 {
        match self.size() {
            0 => 0.0,
            size => self.discard.len() as f64 / size as f64,
        }
    }

    pub fn running_count(&self) -> i32 {
        self.running_count
    }

    /// Remaining cards in decks, rounded to the nearest quarter deck and never
    /// below one quarter.
    pub fn decks_remaining(&self) -> f64 {
        let decks = self.cards.len() as f64 / CARDS_PER_DECK as f64;
        ((decks * 4.0).round() / 4.0).max(0.25)
    }

    pub fn true_count(&self) -> f64 {
        self.running_count as f64 / self.decks_remaining()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand_chacha::{rand_core::SeedableRng, ChaCha8Rng};

    #[test]
    fn test_shoe_setup() {
        let shoe = Shoe::new(1).unwrap();
        assert_eq!(shoe.remaining(), CARDS_PER_DECK);

        let shoe = Shoe::new(2).unwrap();
        assert_eq!(shoe.remaining(), 2 * CARDS_PER_DECK);
        assert_eq!(shoe.running_count(), 0);
        assert_eq!(shoe.discarded(), 0);
    }

    #[test]
    fn test_shoe_holds_every_rank_per_deck() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut shoe = Shoe::with_rng(6, &mut rng).unwrap();
        let mut drawn = Vec::new();
        while shoe.remaining() > 0 {
            drawn.push(shoe.draw().unwrap());
        }
        for rank in Rank::ALL {
            assert_eq!(drawn.iter().filter(|&&c| c == rank).count(), 6);
        }
    }

    #[test]
    fn test_zero_decks_is_config_error() {
        assert!(matches!(Shoe::new(0), Err(GameError::Config(_))));
    }

    #[test]
    fn test_seeded_shoes_match() {
        let a = Shoe::with_rng(2, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        let b = Shoe::with_rng(2, &mut ChaCha8Rng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_draw_until_empty() {
        let mut shoe = Shoe::new(1).unwrap();
        for _ in 0..CARDS_PER_DECK {
            shoe.draw().unwrap();
            assert_eq!(shoe.remaining() + shoe.discarded(), CARDS_PER_DECK);
        }
        assert_eq!(shoe.remaining(), 0);
        assert_eq!(shoe.discarded(), CARDS_PER_DECK);
        assert_eq!(shoe.draw(), Err(GameError::EmptyShoe));
        assert_eq!(shoe.discarded(), CARDS_PER_DECK);
    }

    #[test]
    fn test_full_deck_count_returns_to_zero() {
        let mut shoe = Shoe::new(1).unwrap();
        while shoe.remaining() > 0 {
            shoe.draw().unwrap();
        }
        assert_eq!(shoe.running_count(), 0);
    }

    #[test]
    fn test_stacked_draw_order() {
        let mut shoe = Shoe::stacked(Rank::parse_many("A2K").unwrap());
        assert_eq!(shoe.draw(), Ok(Rank::Ace));
        assert_eq!(shoe.draw(), Ok(Rank::Two));
        assert_eq!(shoe.draw(), Ok(Rank::King));
        assert_eq!(shoe.discard_pile(), &[Rank::Ace, Rank::Two, Rank::King]);
    }

    #[test]
    fn test_running_count_tracks_draws() {
        let mut shoe = Shoe::stacked(Rank::parse_many("2345K8").unwrap());
        for _ in 0..4 {
            shoe.draw().unwrap();
        }
        assert_eq!(shoe.running_count(), 4);
        shoe.draw().unwrap();
        assert_eq!(shoe.running_count(), 3);
        shoe.draw().unwrap();
        assert_eq!(shoe.running_count(), 3);
    }

    #[test]
    fn test_true_count_uses_quarter_decks() {
        // 2 low cards dealt, 26 left = exactly 2 decks
        let mut order = Rank::parse_many("23").unwrap();
        order.extend(std::iter::repeat(Rank::Nine).take(26));
        let mut shoe = Shoe::stacked(order);
        shoe.draw().unwrap();
        shoe.draw().unwrap();
        assert_eq!(shoe.decks_remaining(), 2.0);
        assert!((shoe.true_count() - 1.0).abs() < 1e-9);

        // 16 cards = 1.23 decks, rounds to 1.25
        let mut shoe = Shoe::stacked(std::iter::repeat(Rank::Nine).take(16));
        assert_eq!(shoe.decks_remaining(), 1.25);
        shoe.draw().unwrap();
        assert_eq!(shoe.decks_remaining(), 1.25);
    }

    #[test]
    fn test_decks_remaining_floor() {
        let mut shoe = Shoe::stacked(Rank::parse_many("2").unwrap());
        shoe.draw().unwrap();
        assert_eq!(shoe.decks_remaining(), 0.25);
        assert!((shoe.true_count() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_penetration() {
        let mut shoe = Shoe::stacked(Rank::parse_many("2345").unwrap());
        assert_eq!(shoe.penetration(), 0.0);
        shoe.draw().unwrap();
        assert!((shoe.penetration() - 0.25).abs() < 1e-9);
    }
}
