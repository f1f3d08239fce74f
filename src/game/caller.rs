//! Number calling: uniform selection over the uncalled remainder.

use crate::errors::LedgerError;
use crate::game::ledger::{CalledNumber, CalledNumberLedger};
use chrono::Utc;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

/// Draws the next number for a round from an injected randomness source.
///
/// Duplicate protection lives in the ledger; the caller only ever picks from
/// the remaining universe, so its appends cannot collide.
pub struct NumberCaller<R: Rng> {
    rng: R,
}

impl NumberCaller<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }

    pub fn from_seed(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> NumberCaller<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Call one more number, uniformly at random over the numbers not yet in
    /// the ledger, and append it with the current time. Returns `None` once
    /// all 75 numbers have been called; exhaustion is a normal outcome.
    pub fn call_next(&mut self, ledger: &mut CalledNumberLedger) -> Option<CalledNumber> {
        let remaining = ledger.remaining();
        let number = *remaining.choose(&mut self.rng)?;

        // Cannot collide: the pick came from the complement of the ledger.
        match ledger.append(number, Utc::now()) {
            Ok(entry) => {
                tracing::info!(call = %entry, total_called = ledger.len(), "number called");
                Some(entry)
            }
            Err(e) => {
                tracing::error!(number, error = %e, "append of freshly drawn number rejected");
                None
            }
        }
    }

    /// Manually call a specific number (the admin call path). Subject to the
    /// same duplicate and range rejection as any other append.
    pub fn call_specific(
        &mut self,
        ledger: &mut CalledNumberLedger,
        number: u8,
    ) -> Result<CalledNumber, LedgerError> {
        let entry = ledger.append(number, Utc::now())?;
        tracing::info!(call = %entry, total_called = ledger.len(), "number called manually");
        Ok(entry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::card::MAX_NUMBER;
    use std::collections::HashSet;

    #[test]
    fn test_no_duplicates_until_exhaustion() {
        let mut caller = NumberCaller::from_seed(11);
        let mut ledger = CalledNumberLedger::new();
        let mut seen = HashSet::new();

        for _ in 0..MAX_NUMBER {
            let entry = caller.call_next(&mut ledger).expect("pool not exhausted");
            assert!(seen.insert(entry.number), "duplicate {}", entry.number);
        }

        assert_eq!(seen.len(), MAX_NUMBER as usize);
        assert!(ledger.is_exhausted());
        assert!(caller.call_next(&mut ledger).is_none());
    }

    #[test]
    fn test_calls_stay_in_range() {
        let mut caller = NumberCaller::from_seed(12);
        let mut ledger = CalledNumberLedger::new();
        for _ in 0..20 {
            let entry = caller.call_next(&mut ledger).unwrap();
            assert!((1..=MAX_NUMBER).contains(&entry.number));
        }
    }

    #[test]
    fn test_seeded_caller_is_deterministic() {
        let draw = |seed| {
            let mut caller = NumberCaller::from_seed(seed);
            let mut ledger = CalledNumberLedger::new();
            (0..10)
                .map(|_| caller.call_next(&mut ledger).unwrap().number)
                .collect::<Vec<_>>()
        };
        assert_eq!(draw(99), draw(99));
    }

    #[test]
    fn test_call_specific_rejects_duplicate() {
        let mut caller = NumberCaller::from_seed(13);
        let mut ledger = CalledNumberLedger::new();

        let entry = caller.call_specific(&mut ledger, 40).unwrap();
        assert_eq!(entry.to_string(), "N40");
        assert_eq!(
            caller.call_specific(&mut ledger, 40),
            Err(LedgerError::DuplicateCall(40))
        );
    }

    #[test]
    fn test_call_specific_rejects_out_of_range() {
        let mut caller = NumberCaller::from_seed(14);
        let mut ledger = CalledNumberLedger::new();
        assert_eq!(
            caller.call_specific(&mut ledger, 80),
            Err(LedgerError::NumberOutOfRange(80))
        );
    }
}
