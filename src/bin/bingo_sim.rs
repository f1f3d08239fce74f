//! Round simulator: deal cards, call numbers until a card completes the
//! chosen pattern, then settle the bets. Useful for eyeballing engine
//! behavior and for reproducing rounds from a seed.

use bingo_engine::{
    evaluator, CardGenerator, EngineConfig, NumberCaller, Pattern, RoundManager,
};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(name = "bingo-sim")]
#[command(about = "Simulate one bingo round end to end", long_about = None)]
struct Args {
    /// RNG seed; omit for a random round
    #[arg(long)]
    seed: Option<u64>,

    /// Number of cards in play
    #[arg(long, default_value = "4")]
    cards: usize,

    /// Pattern name from the built-in catalog
    #[arg(long, default_value = "top-row")]
    pattern: String,

    /// Stake placed on each card
    #[arg(long, default_value = "10.0")]
    stake: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = EngineConfig::default();
    config.validate()?;

    let catalog = Pattern::builtin_catalog();
    let pattern = catalog
        .iter()
        .find(|p| p.name == args.pattern)
        .cloned()
        .ok_or_else(|| {
            let names: Vec<_> = catalog.iter().map(|p| p.name.as_str()).collect();
            format!("unknown pattern '{}'; known: {}", args.pattern, names.join(", "))
        })?;
    let pattern_id = pattern.id;

    let seed = args.seed.unwrap_or_else(rand::random);
    tracing::info!(seed, cards = args.cards, pattern = %pattern.name, "starting round");

    let mut generator = CardGenerator::from_seed(seed);
    let mut caller = NumberCaller::from_seed(seed.wrapping_add(1));
    let cards: Vec<_> = (0..args.cards).map(|_| generator.generate()).collect();

    let manager = RoundManager::new(config.rounds.clone());
    let round_id = manager.create_round("simulated round", vec![pattern]);
    manager.activate(round_id)?;

    let round = manager.round_snapshot(round_id)?;
    let mut bets = cards
        .iter()
        .map(|card| {
            bingo_engine::settlement::place_bet(&round, pattern_id, vec![card.clone()], args.stake)
        })
        .collect::<Result<Vec<_>, _>>()?;

    let mut winners = Vec::new();
    while winners.is_empty() {
        let Some(called) = manager.call_next(round_id, &mut caller)? else {
            break;
        };
        tracing::debug!(call = %called, "called");

        for (index, card) in cards.iter().enumerate() {
            if manager.verify_claim(round_id, card, pattern_id)? {
                winners.push(index);
            }
        }
    }

    let calls = manager.ledger_snapshot(round_id)?.len();
    manager.complete(round_id)?;
    let round = manager.round_snapshot(round_id)?;

    for (index, bet) in bets.iter_mut().enumerate() {
        let record = bingo_engine::settlement::settle(bet, &round, &config.payout)?;
        tracing::info!(
            card = index,
            status = ?record.status,
            net = record.net_winnings,
            "settled"
        );
    }

    if winners.is_empty() {
        tracing::warn!(calls, "pool exhausted with no winner");
    } else {
        let ledger = round.ledger();
        for &index in &winners {
            let missing = evaluator::uncovered(&cards[index], &round.patterns[0].mask, ledger);
            debug_assert!(missing.is_empty());
            tracing::info!(card = index, calls, "winner");
        }
    }

    Ok(())
}
