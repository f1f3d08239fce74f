//! Bingo Engine - domain core of a pattern-bingo gambling platform
//!
//! Card generation, pattern masks, the per-round called-number ledger, the
//! win-verification kernel, number calling, round coordination, and bet
//! settlement. HTTP, persistence, and auth are external collaborators: they
//! feed data in and carry verdicts out, but never appear here.
//!
//! The kernel operations (`CardGenerator::generate`, `evaluator::verify`)
//! are pure and safe to invoke concurrently; the only shared mutable state
//! is each round's ledger, which `RoundManager` guards with per-round
//! serialized appends and snapshot reads.

pub mod config;
pub mod errors;
pub mod game;
pub mod round;
pub mod settlement;

pub use config::{EngineConfig, PayoutConfig, RoundConfig};
pub use errors::{EngineError, EngineResult};
pub use game::{
    evaluator, CalledNumber, CalledNumberLedger, CardGenerator, CardLayout, Cell, Column,
    NumberCaller, Pattern, PatternMask,
};
pub use round::{Round, RoundManager, RoundStatus};
pub use settlement::{Bet, BetStatus, SettlementRecord};
