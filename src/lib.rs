pub mod betting;
pub mod config;
pub mod error;
pub mod runner;
pub mod session;

pub use crate::betting::{BetContext, BetSizing, CountSpread, FlatBet};
pub use crate::config::{BettingConfig, SimulationConfig, StrategyKind};
pub use crate::error::SimError;
pub use crate::runner::{GameReport, Runner, SimulationSummary};
pub use crate::session::{RoundReport, Session, Tally};
