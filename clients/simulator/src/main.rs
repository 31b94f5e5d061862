use blackjack::{PayoutRatio, TableRules};
use blackjack_sim::{BettingConfig, Runner, SimulationConfig, StrategyKind};
use clap::Parser;

#[derive(Parser)]
#[command(
    name = "blackjack-simulator",
    about = "Simulate blackjack rounds from a counted shoe and report the results"
)]
struct Args {
    /// Use a preset: default, single_deck
    #[arg(long, env = "SIM_PRESET")]
    preset: Option<String>,

    /// Number of decks in the shoe
    #[arg(long, env = "SIM_DECKS", default_value = "6")]
    decks: u8,

    /// Blackjack payout ratio (e.g. "3:2", "6:5", "1:1")
    #[arg(long, env = "SIM_PAYOUT", default_value = "3:2")]
    payout: PayoutRatio,

    /// Dealer hits soft 17
    #[arg(long, env = "SIM_H17", default_value_t = true, action = clap::ArgAction::Set)]
    dealer_hits_soft_17: bool,

    /// Starting bankroll per game
    #[arg(long, env = "SIM_BANKROLL", default_value = "1000")]
    bankroll: i64,

    /// Betting unit
    #[arg(long, env = "SIM_BET", default_value = "50")]
    bet: u64,

    /// Rounds dealt per game
    #[arg(long, env = "SIM_ROUNDS", default_value = "1000")]
    rounds: u64,

    /// Independent games to play
    #[arg(long, env = "SIM_GAMES", default_value = "1")]
    games: u32,

    /// Player strategy: random, basic
    #[arg(long, env = "SIM_STRATEGY", default_value = "random")]
    strategy: StrategyKind,

    /// Bet sizing: flat, count
    #[arg(long, env = "SIM_BETTING", default_value = "flat")]
    betting: String,

    /// Largest bet in units when betting by the count
    #[arg(long, env = "SIM_MAX_UNITS", default_value = "8")]
    max_units: u64,

    /// Fraction of the shoe dealt before reshuffling
    #[arg(long, env = "SIM_PENETRATION", default_value = "0.75")]
    penetration: f64,

    /// Seed for a reproducible run
    #[arg(long, env = "SIM_SEED")]
    seed: Option<u64>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let mut rules = match args.preset.as_deref() {
        None => TableRules {
            num_decks: args.decks,
            blackjack_payout: args.payout,
            ..TableRules::default()
        },
        Some("default") => TableRules::default(),
        Some("single_deck") => TableRules::single_deck(),
        Some(preset) => {
            log::error!("Unknown preset '{preset}'. Available: default, single_deck");
            std::process::exit(1);
        }
    };
    rules.dealer_hits_soft_17 = args.dealer_hits_soft_17;
    rules.starting_bankroll = args.bankroll;
    rules.default_bet = args.bet;

    let betting = match args.betting.as_str() {
        "flat" => BettingConfig::Flat,
        "count" => BettingConfig::CountSpread {
            max_units: args.max_units,
        },
        other => {
            log::error!("Unknown betting '{other}'. Available: flat, count");
            std::process::exit(1);
        }
    };

    let config = SimulationConfig {
        rules,
        games: args.games,
        rounds_per_game: args.rounds,
        penetration: args.penetration,
        strategy: args.strategy,
        betting,
        seed: args.seed,
        ..SimulationConfig::default()
    };

    log::info!(
        "{} decks, blackjack pays {}, dealer {} soft 17",
        rules.num_decks,
        rules.blackjack_payout,
        if rules.dealer_hits_soft_17 { "hits" } else { "stands on" }
    );

    let summary = match Runner::new(config).and_then(|mut runner| runner.run()) {
        Ok(summary) => summary,
        Err(e) => {
            log::error!("Simulation failed: {e}");
            std::process::exit(1);
        }
    };

    match serde_json::to_string_pretty(&summary) {
        Ok(json) => println!("{json}"),
        Err(e) => {
            log::error!("Failed to serialize summary: {e}");
            std::process::exit(1);
        }
    }
}
