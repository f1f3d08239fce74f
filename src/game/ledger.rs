//! Per-round called-number ledger: ordered, append-only, duplicate-free.

use crate::errors::LedgerError;
use crate::game::card::{Column, MAX_NUMBER};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// One called number with its column band and call time.
///
/// Column and number stay separate fields; the combined "B1" style label is
/// produced only at the presentation boundary via `Display`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CalledNumber {
    pub number: u8,
    pub column: Column,
    pub called_at: DateTime<Utc>,
}

impl CalledNumber {
    fn new(number: u8, called_at: DateTime<Utc>) -> Result<Self, LedgerError> {
        let column = Column::of_number(number).ok_or(LedgerError::NumberOutOfRange(number))?;
        Ok(Self {
            number,
            column,
            called_at,
        })
    }
}

impl fmt::Display for CalledNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.column, self.number)
    }
}

impl<'de> Deserialize<'de> for CalledNumber {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        // The column is derived from the number, never trusted from the
        // persisted form; a stored column that contradicts the number is
        // silently corrected, an out-of-range number is rejected.
        #[derive(Deserialize)]
        struct Repr {
            number: u8,
            called_at: DateTime<Utc>,
        }

        let repr = Repr::deserialize(deserializer)?;
        CalledNumber::new(repr.number, repr.called_at).map_err(D::Error::custom)
    }
}

/// Append-only record of the numbers called in one round, in call order.
///
/// Grows monotonically while a round is active and is never truncated;
/// freezing at round end is enforced by the round layer, not here.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CalledNumberLedger {
    entries: Vec<CalledNumber>,
    #[serde(skip)]
    seen: HashSet<u8>,
}

impl<'de> Deserialize<'de> for CalledNumberLedger {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::Error;

        #[derive(Deserialize)]
        struct Repr {
            entries: Vec<CalledNumber>,
        }

        // Replaying through `append` holds persisted ledgers to the same
        // invariants as live ones: no duplicates, no out-of-range numbers.
        let repr = Repr::deserialize(deserializer)?;
        let mut ledger = CalledNumberLedger::new();
        for entry in repr.entries {
            ledger
                .append(entry.number, entry.called_at)
                .map_err(D::Error::custom)?;
        }
        Ok(ledger)
    }
}

impl CalledNumberLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `number` with the given call time. Duplicate and out-of-range
    /// numbers are rejected; past entries are never touched.
    pub fn append(
        &mut self,
        number: u8,
        called_at: DateTime<Utc>,
    ) -> Result<CalledNumber, LedgerError> {
        if self.seen.contains(&number) {
            return Err(LedgerError::DuplicateCall(number));
        }
        let entry = CalledNumber::new(number, called_at)?;
        self.seen.insert(number);
        self.entries.push(entry);
        Ok(entry)
    }

    /// Whether `number` has been called so far
    pub fn contains(&self, number: u8) -> bool {
        self.seen.contains(&number)
    }

    /// Entries in call order
    pub fn entries(&self) -> &[CalledNumber] {
        &self.entries
    }

    /// Called numbers in call order
    pub fn numbers(&self) -> impl Iterator<Item = u8> + '_ {
        self.entries.iter().map(|e| e.number)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Numbers not yet called, in ascending order
    pub fn remaining(&self) -> Vec<u8> {
        (1..=MAX_NUMBER).filter(|n| !self.contains(*n)).collect()
    }

    /// Whether every callable number has been called
    pub fn is_exhausted(&self) -> bool {
        self.entries.len() == MAX_NUMBER as usize
    }
}
