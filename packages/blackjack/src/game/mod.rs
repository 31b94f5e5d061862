use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::{
    legal_moves, Decision, GameError, Hand, HandOutcome, Move, MoveSet, PayoutRatio, Rank, Shoe,
    SplitBudget, Strategy, TableRules,
};

/// Current phase of the round
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    NotStarted,
    PlayerTurn,
    Settled,
}

/// A settled player hand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandResult {
    pub cards: Vec<Rank>,
    pub bet: u64,
    pub outcome: HandOutcome,
    /// Signed bankroll change from this hand.
    pub net: i64,
}

/// One player at one table, playing rounds out of a single shoe.
///
/// `player_hands[0]` is always the hand in play; splits are appended and
/// settled hands are removed from the front.
#[derive(Debug, Clone)]
pub struct Game {
    rules: TableRules,
    shoe: Shoe,
    player_hands: VecDeque<Hand>,
    dealer_hand: Hand,
    split_budget: SplitBudget,
    bankroll: i64,
    bet: u64,
    hands_dealt: u64,
    dealer_resolved: bool,
    results: Vec<HandResult>,
    phase: GamePhase,
}

impl Game {
    pub fn new(
        num_decks: u8,
        blackjack_payout: PayoutRatio,
        starting_bankroll: i64,
    ) -> Result<Self, GameError> {
        Self::from_rules(TableRules {
            num_decks,
            blackjack_payout,
            starting_bankroll,
            ..TableRules::default()
        })
    }

    pub fn from_rules(rules: TableRules) -> Result<Self, GameError> {
        Self::with_rng(rules, &mut rand::thread_rng())
    }

    pub fn with_rng<R: Rng + ?Sized>(rules: TableRules, rng: &mut R) -> Result<Self, GameError> {
        rules.validate()?;
        let shoe = Shoe::with_rng(rules.num_decks, rng)?;
        Self::with_shoe(rules, shoe)
    }

    /// Table using a prepared shoe, e.g. `Shoe::stacked`.
    pub fn with_shoe(rules: TableRules, shoe: Shoe) -> Result<Self, GameError> {
        rules.validate()?;
        Ok(Self {
            rules,
            shoe,
            player_hands: VecDeque::new(),
            dealer_hand: Hand::new(),
            split_budget: SplitBudget::default(),
            bankroll: rules.starting_bankroll,
            bet: 0,
            hands_dealt: 0,
            dealer_resolved: false,
            results: Vec::new(),
            phase: GamePhase::NotStarted,
        })
    }

    pub fn rules(&self) -> &TableRules {
        &self.rules
    }

    pub fn shoe(&self) -> &Shoe {
        &self.shoe
    }

    pub fn player_hands(&self) -> &VecDeque<Hand> {
        &self.player_hands
    }

    pub fn dealer_hand(&self) -> &Hand {
        &self.dealer_hand
    }

    /// The dealer's face-up card (second card dealt to the dealer).
    pub fn dealer_up_card(&self) -> Option<Rank> {
        self.dealer_hand.cards.get(1).copied()
    }

    pub fn bankroll(&self) -> i64 {
        self.bankroll
    }

    /// Bet the current round was opened with.
    pub fn bet(&self) -> u64 {
        self.bet
    }

    pub fn hands_dealt(&self) -> u64 {
        self.hands_dealt
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn split_budget(&self) -> SplitBudget {
        self.split_budget
    }

    pub fn running_count(&self) -> i32 {
        self.shoe.running_count()
    }

    pub fn true_count(&self) -> f64 {
        self.shoe.true_count()
    }

    /// Hands settled so far in the current round, in settlement order.
    pub fn results(&self) -> &[HandResult] {
        &self.results
    }

    pub fn round_net(&self) -> i64 {
        self.results.iter().map(|r| r.net).sum()
    }

    /// Legal moves for the hand in play, empty when no hand is in play.
    pub fn current_legal_moves(&self) -> MoveSet {
        self.player_hands
            .front()
            .map(|hand| legal_moves(hand, &self.split_budget))
            .unwrap_or_default()
    }

    /// Replace the shoe with a freshly shuffled one. The count starts over;
    /// bankroll is kept.
    pub fn reshuffle<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), GameError> {
        self.shoe = Shoe::with_rng(self.rules.num_decks, rng)?;
        log::debug!("Reshuffled {} decks", self.rules.num_decks);
        Ok(())
    }

    /// Start a round: player, dealer (down), player, dealer (up).
    pub fn deal_hand(&mut self, bet: u64) -> Result<(), GameError> {
        self.check_bet(bet)?;
        // All four cards must be available before the last round is cleared
        if self.shoe.remaining() < 4 {
            return Err(GameError::EmptyShoe);
        }

        self.player_hands.clear();
        self.dealer_hand = Hand::new();
        self.split_budget = SplitBudget::default();
        self.dealer_resolved = false;
        self.results.clear();
        self.bet = bet;

        let mut player = Hand::with_bet(bet);
        player.add_card(self.shoe.draw()?);
        self.dealer_hand.add_card(self.shoe.draw()?);
        player.add_card(self.shoe.draw()?);
        self.dealer_hand.add_card(self.shoe.draw()?);

        log::debug!("Dealt {player} against dealer up card {:?}", self.dealer_up_card());
        self.player_hands.push_back(player);
        self.hands_dealt += 1;
        self.phase = GamePhase::PlayerTurn;
        Ok(())
    }

    /// Apply one move to the hand in play.
    ///
    /// The move is checked against the legal set before anything is touched,
    /// so an `IllegalMove` error leaves the game unchanged. Returns the
    /// settled result when the move resolved the hand.
    pub fn play_move(&mut self, mv: Move) -> Result<Option<HandResult>, GameError> {
        let hand = self.player_hands.front().ok_or(GameError::NoActiveHand)?;
        let legal = legal_moves(hand, &self.split_budget);
        if !legal.contains(&mv) {
            return Err(GameError::IllegalMove {
                attempted: mv,
                legal: legal.into_iter().collect(),
            });
        }
        log::debug!("Hand {hand}: {mv:?}");

        match mv {
            Move::Blackjack => {
                let bet = hand.bet_amount();
                let winnings = self.rules.blackjack_payout.calculate_payout(bet);
                let net = i64::try_from(winnings).map_err(|_| GameError::InvalidBet(bet))?;
                Ok(Some(self.settle_front(HandOutcome::Blackjack, net)))
            }
            Move::Bust => {
                let stake = stake(hand)?;
                Ok(Some(self.settle_front(HandOutcome::Bust, -stake)))
            }
            Move::Stand => {
                let stake = stake(hand)?;
                self.play_dealer()?;
                let outcome = self.compare_with_dealer();
                let net = match outcome {
                    HandOutcome::Win => stake,
                    HandOutcome::Loss => -stake,
                    _ => 0,
                };
                Ok(Some(self.settle_front(outcome, net)))
            }
            Move::Hit => {
                let card = self.shoe.draw()?;
                self.front_mut()?.add_card(card);
                Ok(None)
            }
            Move::Double => {
                let bet = hand.bet_amount();
                let doubled = bet.checked_mul(2).ok_or(GameError::InvalidBet(bet))?;
                let card = self.shoe.draw()?;
                let hand = self.front_mut()?;
                hand.bet = Some(doubled);
                hand.doubled = true;
                hand.add_card(card);
                Ok(None)
            }
            Move::Split => {
                self.split_front()?;
                Ok(None)
            }
        }
    }

    /// Play the round out.
    ///
    /// `first` is applied to the hand in play if given. After that, forced
    /// moves (a single legal move) are applied directly and every other
    /// choice goes to `strategy`, until no hands remain. Returns the round's
    /// settled hands.
    pub fn play_hand<S>(
        &mut self,
        first: Option<Move>,
        strategy: &mut S,
    ) -> Result<&[HandResult], GameError>
    where
        S: Strategy + ?Sized,
    {
        if let Some(mv) = first {
            self.play_move(mv)?;
        }

        while let Some(hand) = self.player_hands.front() {
            let legal = legal_moves(hand, &self.split_budget);
            let mv = match legal.iter().next() {
                Some(&only) if legal.len() == 1 => only,
                _ => strategy.choose(&Decision {
                    hand,
                    dealer_up_card: self.dealer_up_card(),
                    legal: &legal,
                    true_count: self.shoe.true_count(),
                }),
            };
            self.play_move(mv)?;
        }

        Ok(&self.results)
    }

    /// Dealer draws to 17, and also draws on a 17 holding an Ace when the rules
    /// say so. Runs at most once per round; later calls draw nothing.
    pub fn play_dealer(&mut self) -> Result<(), GameError> {
        if self.dealer_resolved {
            return Ok(());
        }
        while self.dealer_should_hit() {
            let card = self.shoe.draw()?;
            self.dealer_hand.add_card(card);
        }
        self.dealer_resolved = true;
        log::debug!("Dealer finishes on {}", self.dealer_hand);
        Ok(())
    }

    pub fn dealer_should_hit(&self) -> bool {
        let highest = self.dealer_hand.highest();
        let has_ace = self.dealer_hand.cards.iter().any(|c| c.is_ace());
        highest <= 16 || (highest == 17 && self.rules.dealer_hits_soft_17 && has_ace)
    }

    /// A bet must be positive, and both its doubled amount and its blackjack
    /// winnings must fit the signed bankroll.
    fn check_bet(&self, bet: u64) -> Result<(), GameError> {
        let doubled = bet.checked_mul(2).and_then(|b| i64::try_from(b).ok());
        let winnings = i64::try_from(self.rules.blackjack_payout.calculate_payout(bet)).ok();
        if bet == 0 || doubled.is_none() || winnings.is_none() {
            return Err(GameError::InvalidBet(bet));
        }
        Ok(())
    }

    fn front_mut(&mut self) -> Result<&mut Hand, GameError> {
        self.player_hands.front_mut().ok_or(GameError::NoActiveHand)
    }

    fn compare_with_dealer(&self) -> HandOutcome {
        let Some(hand) = self.player_hands.front() else {
            return HandOutcome::Push;
        };
        let (dealer_lowest, dealer_highest) = self.dealer_hand.totals();
        let player_highest = hand.highest();

        if player_highest == dealer_highest {
            HandOutcome::Push
        } else if player_highest > dealer_highest || dealer_lowest > 21 {
            HandOutcome::Win
        } else {
            HandOutcome::Loss
        }
    }

    fn split_front(&mut self) -> Result<(), GameError> {
        // Both new cards must be available before the hand is torn apart
        if self.shoe.remaining() < 2 {
            return Err(GameError::EmptyShoe);
        }

        let hand = self.front_mut()?;
        let second = hand.cards.pop().ok_or(GameError::NoActiveHand)?;
        let aces = second.is_ace();
        hand.split_aces = aces;

        let mut new_hand = Hand::with_bet(hand.bet_amount());
        new_hand.split_aces = aces;
        new_hand.add_card(second);

        let card = self.shoe.draw()?;
        self.front_mut()?.add_card(card);
        new_hand.add_card(self.shoe.draw()?);

        self.player_hands.push_back(new_hand);
        self.split_budget.record_split();
        Ok(())
    }

    fn settle_front(&mut self, outcome: HandOutcome, net: i64) -> HandResult {
        let hand = self.player_hands.pop_front().unwrap_or_default();
        self.bankroll = self.bankroll.saturating_add(net);

        let result = HandResult {
            bet: hand.bet_amount(),
            cards: hand.cards,
            outcome,
            net,
        };
        log::debug!("Settled {:?} for {:+}, bankroll {}", outcome, net, self.bankroll);
        self.results.push(result.clone());

        if self.player_hands.is_empty() {
            self.phase = GamePhase::Settled;
        }
        result
    }
}

fn stake(hand: &Hand) -> Result<i64, GameError> {
    let bet = hand.bet_amount();
    i64::try_from(bet).map_err(|_| GameError::InvalidBet(bet))
}
