//! Error types for the bingo engine.
//!
//! Contract violations (malformed cards, patterns, out-of-range numbers) are
//! rejected at construction time with a concern-specific error; a no-win
//! verdict or an exhausted number pool is never an error.

use crate::game::card::Column;
use uuid::Uuid;

/// Card construction and deserialization errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CardError {
    #[error("number {number} is outside the {column} column range {min}-{max}")]
    OutOfRange {
        column: Column,
        number: u8,
        min: u8,
        max: u8,
    },

    #[error("number {number} appears twice in the {column} column")]
    DuplicateInColumn { column: Column, number: u8 },

    #[error("center cell (row 2, col 2) must be the free cell")]
    CenterNotFree,

    #[error("free cell found at row {row}, col {col}; only the center may be free")]
    MisplacedFree { row: usize, col: usize },

    #[error("{column} column has {len} cells, expected 5")]
    BadColumnLength { column: Column, len: usize },

    #[error("unrecognized cell marker '{0}'")]
    BadCellMarker(String),
}

/// Pattern construction errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PatternError {
    #[error("pattern requires no cells; a mask must cover at least one cell")]
    EmptyMask,

    #[error("pattern position ({row}, {col}) is outside the 5x5 grid")]
    PositionOutOfBounds { row: usize, col: usize },
}

/// Called-number ledger errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    #[error("number {0} has already been called this round")]
    DuplicateCall(u8),

    #[error("number {0} is outside the callable range 1-75")]
    NumberOutOfRange(u8),
}

/// Round lifecycle and claim errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RoundError {
    #[error("round {0} not found")]
    NotFound(Uuid),

    #[error("round {id} is not active (status: {status})")]
    NotActive { id: Uuid, status: String },

    #[error("round {id} does not offer pattern {pattern_id}")]
    PatternNotOffered { id: Uuid, pattern_id: Uuid },

    #[error("round {0} has already completed")]
    AlreadyCompleted(Uuid),

    #[error(transparent)]
    Ledger(#[from] LedgerError),
}

/// Bet placement and settlement errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BetError {
    #[error("stake {amount} is below the round minimum {min}")]
    StakeTooLow { amount: f64, min: f64 },

    #[error("stake {amount} exceeds the round maximum {max}")]
    StakeTooHigh { amount: f64, max: f64 },

    #[error("bet has no cards attached")]
    NoCards,

    #[error("bet belongs to round {expected}, not round {actual}")]
    WrongRound { expected: Uuid, actual: Uuid },

    #[error("bet {0} has already been settled")]
    AlreadySettled(Uuid),
}

/// Configuration validation errors
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {field}: {value} ({reason})")]
    InvalidValue {
        field: &'static str,
        value: f64,
        reason: &'static str,
    },
}

/// Root error type for all engine operations
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    #[error("card error: {0}")]
    Card(#[from] CardError),

    #[error("pattern error: {0}")]
    Pattern(#[from] PatternError),

    #[error("ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("round error: {0}")]
    Round(#[from] RoundError),

    #[error("bet error: {0}")]
    Bet(#[from] BetError),

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}

/// Convenience alias for engine results
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_carries_context() {
        let err = CardError::OutOfRange {
            column: Column::B,
            number: 20,
            min: 1,
            max: 15,
        };
        let msg = err.to_string();
        assert!(msg.contains("20"));
        assert!(msg.contains("B"));
        assert!(msg.contains("1-15"));
    }

    #[test]
    fn test_error_conversion_to_root() {
        let err: EngineError = LedgerError::DuplicateCall(42).into();
        match err {
            EngineError::Ledger(LedgerError::DuplicateCall(42)) => {}
            other => panic!("unexpected conversion: {other:?}"),
        }
    }

    #[test]
    fn test_round_error_wraps_ledger_error() {
        let err: RoundError = LedgerError::NumberOutOfRange(90).into();
        assert!(err.to_string().contains("90"));
    }
}
