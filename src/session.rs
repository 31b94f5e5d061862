use blackjack::{Game, HandOutcome, HandResult, Strategy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{BetContext, BetSizing, SimError, SimulationConfig};

/// One dealt round as seen by the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoundReport {
    pub round: u64,
    pub bet: u64,
    /// True count when the bet was sized
    pub true_count: f64,
    pub reshuffled: bool,
    pub results: Vec<HandResult>,
    pub net: i64,
    pub bankroll: i64,
}

/// Running totals over many rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    pub rounds: u64,
    pub hands: u64,
    pub wins: u64,
    pub losses: u64,
    pub pushes: u64,
    pub blackjacks: u64,
    pub busts: u64,
    pub splits: u64,
    pub reshuffles: u64,
    /// Sum of final hand bets, doubles included
    pub wagered: u64,
    pub net: i64,
}

impl Tally {
    pub fn record(&mut self, report: &RoundReport) {
        self.rounds += 1;
        self.splits += report.results.len().saturating_sub(1) as u64;
        if report.reshuffled {
            self.reshuffles += 1;
        }
        for result in &report.results {
            self.hands += 1;
            self.wagered += result.bet;
            self.net += result.net;
            match result.outcome {
                HandOutcome::Win => self.wins += 1,
                HandOutcome::Loss => self.losses += 1,
                HandOutcome::Push => self.pushes += 1,
                HandOutcome::Blackjack => self.blackjacks += 1,
                HandOutcome::Bust => self.busts += 1,
            }
        }
    }

    pub fn merge(&mut self, other: &Tally) {
        self.rounds += other.rounds;
        self.hands += other.hands;
        self.wins += other.wins;
        self.losses += other.losses;
        self.pushes += other.pushes;
        self.blackjacks += other.blackjacks;
        self.busts += other.busts;
        self.splits += other.splits;
        self.reshuffles += other.reshuffles;
        self.wagered += other.wagered;
        self.net += other.net;
    }

    /// Player return per unit wagered. Negative means the house is ahead.
    pub fn player_edge(&self) -> f64 {
        match self.wagered {
            0 => 0.0,
            wagered => self.net as f64 / wagered as f64,
        }
    }
}

/// Drives repeated rounds on one table: reshuffles at the cut card, sizes bets
/// from the count and hands decisions to a strategy.
pub struct Session<S> {
    game: Game,
    strategy: S,
    sizing: Box<dyn BetSizing>,
    penetration: f64,
    min_cards: usize,
    rng: ChaCha8Rng,
    rounds_played: u64,
}

impl<S: Strategy> Session<S> {
    pub fn new(config: &SimulationConfig, strategy: S) -> Result<Self, SimError> {
        config.validate()?;

        let mut rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        let game = Game::with_rng(config.rules, &mut rng)?;

        Ok(Self {
            game,
            strategy,
            sizing: config.betting.sizing(),
            penetration: config.penetration,
            min_cards: config.min_cards,
            rng,
            rounds_played: 0,
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    pub fn rounds_played(&self) -> u64 {
        self.rounds_played
    }

    fn needs_reshuffle(&self) -> bool {
        let shoe = self.game.shoe();
        shoe.penetration() >= self.penetration || shoe.remaining() < self.min_cards
    }

    pub fn play_round(&mut self) -> Result<RoundReport, SimError> {
        let reshuffled = self.needs_reshuffle();
        if reshuffled {
            self.game.reshuffle(&mut self.rng)?;
        }

        let true_count = self.game.true_count();
        let bankroll = self.game.bankroll();
        let wanted = self.sizing.bet(&BetContext {
            true_count,
            bankroll,
            unit: self.game.rules().default_bet,
        });
        let bet = wanted.min(bankroll.max(0) as u64);
        if bet == 0 {
            return Err(SimError::Bankrupt {
                bankroll,
                bet: wanted,
            });
        }

        self.game.deal_hand(bet)?;
        let results = self.game.play_hand(None, &mut self.strategy)?.to_vec();
        self.rounds_played += 1;

        let report = RoundReport {
            round: self.rounds_played,
            bet,
            true_count,
            reshuffled,
            net: results.iter().map(|r| r.net).sum(),
            results,
            bankroll: self.game.bankroll(),
        };
        log::debug!(
            "Round {}: bet {} at true count {:+.2}, net {:+}, bankroll {}",
            report.round,
            report.bet,
            report.true_count,
            report.net,
            report.bankroll
        );
        Ok(report)
    }

    /// Play up to `rounds` rounds. Running out of bankroll ends the session
    /// early and is reported through the returned flag, not as an error.
    pub fn run(&mut self, rounds: u64) -> Result<(Tally, bool), SimError> {
        let mut tally = Tally::default();

        for _ in 0..rounds {
            match self.play_round() {
                Ok(report) => tally.record(&report),
                Err(SimError::Bankrupt { bankroll, bet }) => {
                    log::warn!(
                        "Bankroll {bankroll} cannot cover a bet of {bet} after {} rounds",
                        tally.rounds
                    );
                    return Ok((tally, true));
                }
                Err(e) => return Err(e),
            }
        }

        log::info!(
            "Session finished: {} rounds, net {:+}, bankroll {}",
            tally.rounds,
            tally.net,
            self.game.bankroll()
        );
        Ok((tally, false))
    }
}
