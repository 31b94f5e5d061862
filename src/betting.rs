use crate::BettingConfig;

/// What a bet sizer sees between rounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BetContext {
    pub true_count: f64,
    pub bankroll: i64,
    /// Table default bet; one betting unit
    pub unit: u64,
}

pub trait BetSizing {
    fn bet(&self, ctx: &BetContext) -> u64;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FlatBet;

impl BetSizing for FlatBet {
    fn bet(&self, ctx: &BetContext) -> u64 {
        ctx.unit
    }
}

/// One unit at a true count of 1 or less, then one more unit per whole point
/// of true count, capped at `max_units`.
#[derive(Debug, Clone, Copy)]
pub struct CountSpread {
    pub max_units: u64,
}

impl BetSizing for CountSpread {
    fn bet(&self, ctx: &BetContext) -> u64 {
        let max_units = self.max_units.max(1);
        let units = ctx.true_count.floor().clamp(1.0, max_units as f64) as u64;
        ctx.unit * units
    }
}

impl BettingConfig {
    pub fn sizing(&self) -> Box<dyn BetSizing> {
        match *self {
            BettingConfig::Flat => Box::new(FlatBet),
            BettingConfig::CountSpread { max_units } => Box::new(CountSpread { max_units }),
        }
    }
}
