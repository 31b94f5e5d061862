use blackjack::{BasicStrategy, RandomStrategy};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::{Session, SimError, SimulationConfig, StrategyKind, Tally};

/// Outcome of one independent game: a fresh shoe and bankroll played for
/// `rounds_per_game` rounds or until the bankroll runs out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameReport {
    pub index: u32,
    pub seed: Option<u64>,
    pub tally: Tally,
    pub starting_bankroll: i64,
    pub final_bankroll: i64,
    pub bankrupt: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub config: SimulationConfig,
    pub games: u32,
    pub bankrupt_games: u32,
    pub tally: Tally,
    pub starting_bankroll: i64,
    pub final_bankroll: i64,
    /// Player return per unit wagered across every game
    pub player_edge: f64,
}

/// Plays a batch of games described by a [`SimulationConfig`].
#[derive(Debug, Clone)]
pub struct Runner {
    config: SimulationConfig,
    games: Vec<GameReport>,
}

impl Runner {
    pub fn new(config: SimulationConfig) -> Result<Self, SimError> {
        config.validate()?;
        Ok(Self {
            config,
            games: Vec::new(),
        })
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn games(&self) -> &[GameReport] {
        &self.games
    }

    /// Play the next game and keep its report.
    pub fn play_a_game(&mut self) -> Result<&GameReport, SimError> {
        let index = self.games.len() as u32;
        let seed = self.config.seed.map(|seed| seed.wrapping_add(index as u64));
        let config = SimulationConfig {
            seed,
            ..self.config.clone()
        };

        log::info!(
            "Game {}: {} rounds, {:?} strategy, {:?} betting",
            index + 1,
            config.rounds_per_game,
            config.strategy,
            config.betting
        );

        let (tally, bankrupt, final_bankroll) = match config.strategy {
            StrategyKind::Random => {
                // Decisions draw from their own stream so the shoe order only
                // depends on the seed
                let rng = match seed {
                    Some(seed) => ChaCha8Rng::seed_from_u64(seed ^ u64::MAX),
                    None => ChaCha8Rng::from_entropy(),
                };
                let mut session = Session::new(&config, RandomStrategy::new(rng))?;
                let (tally, bankrupt) = session.run(config.rounds_per_game)?;
                (tally, bankrupt, session.game().bankroll())
            }
            StrategyKind::Basic => {
                let mut session = Session::new(&config, BasicStrategy)?;
                let (tally, bankrupt) = session.run(config.rounds_per_game)?;
                (tally, bankrupt, session.game().bankroll())
            }
        };

        self.games.push(GameReport {
            index,
            seed,
            tally,
            starting_bankroll: config.rules.starting_bankroll,
            final_bankroll,
            bankrupt,
        });
        self.games
            .last()
            .ok_or_else(|| SimError::Config("no game was recorded".to_string()))
    }

    /// Play every remaining game and summarize the batch.
    pub fn run(&mut self) -> Result<SimulationSummary, SimError> {
        while (self.games.len() as u32) < self.config.games {
            self.play_a_game()?;
        }
        let summary = self.summary();
        log::info!(
            "Played {} games: net {:+} over {} wagered, edge {:+.4}",
            summary.games,
            summary.tally.net,
            summary.tally.wagered,
            summary.player_edge
        );
        Ok(summary)
    }

    /// Summary of the games played so far.
    pub fn summary(&self) -> SimulationSummary {
        let mut tally = Tally::default();
        for game in &self.games {
            tally.merge(&game.tally);
        }

        SimulationSummary {
            config: self.config.clone(),
            games: self.games.len() as u32,
            bankrupt_games: self.games.iter().filter(|g| g.bankrupt).count() as u32,
            starting_bankroll: self.games.iter().map(|g| g.starting_bankroll).sum(),
            final_bankroll: self.games.iter().map(|g| g.final_bankroll).sum(),
            player_edge: tally.player_edge(),
            tally,
        }
    }
}
