//! Round lifecycle and the concurrent round registry.
//!
//! Each round owns its called-number ledger. The registry keeps rounds
//! behind per-round `RwLock`s inside a `DashMap`: number calls take the
//! write lock, so appends are serialized per round; win checks read a
//! ledger snapshot and evaluate without holding any lock, which is sound
//! because a snapshot is always a prefix of the final ledger and verdicts
//! are monotonic under appends.

use crate::config::RoundConfig;
use crate::errors::RoundError;
use crate::game::caller::NumberCaller;
use crate::game::card::CardLayout;
use crate::game::evaluator;
use crate::game::ledger::{CalledNumber, CalledNumberLedger};
use crate::game::pattern::Pattern;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoundStatus {
    Scheduled,
    Active,
    Completed,
}

impl fmt::Display for RoundStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundStatus::Scheduled => write!(f, "scheduled"),
            RoundStatus::Active => write!(f, "active"),
            RoundStatus::Completed => write!(f, "completed"),
        }
    }
}

/// One bingo round: its offered patterns, bet limits, and call ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub id: Uuid,
    pub name: String,
    pub status: RoundStatus,
    pub patterns: Vec<Pattern>,
    pub min_bet: f64,
    pub max_bet: f64,
    pub commission_rate: f64,
    pub opened_at: Option<DateTime<Utc>>,
    pub closed_at: Option<DateTime<Utc>>,
    ledger: CalledNumberLedger,
}

impl Round {
    fn new(name: String, patterns: Vec<Pattern>, limits: &RoundConfig) -> Self {
        Self {
            id: Uuid::new_v4(),
            name,
            status: RoundStatus::Scheduled,
            patterns,
            min_bet: limits.min_bet,
            max_bet: limits.max_bet,
            commission_rate: limits.commission_rate,
            opened_at: None,
            closed_at: None,
            ledger: CalledNumberLedger::new(),
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == RoundStatus::Active
    }

    pub fn ledger(&self) -> &CalledNumberLedger {
        &self.ledger
    }

    /// Pattern offered by this round, if any
    pub fn pattern(&self, pattern_id: Uuid) -> Option<&Pattern> {
        self.patterns.iter().find(|p| p.id == pattern_id)
    }

    fn ensure_active(&self) -> Result<(), RoundError> {
        if self.is_active() {
            Ok(())
        } else {
            Err(RoundError::NotActive {
                id: self.id,
                status: self.status.to_string(),
            })
        }
    }
}

/// Thread-safe registry of rounds keyed by round id.
pub struct RoundManager {
    rounds: DashMap<Uuid, Arc<RwLock<Round>>>,
    limits: RoundConfig,
}

impl RoundManager {
    pub fn new(limits: RoundConfig) -> Self {
        Self {
            rounds: DashMap::new(),
            limits,
        }
    }

    /// Create a scheduled round offering the given patterns
    pub fn create_round(&self, name: impl Into<String>, patterns: Vec<Pattern>) -> Uuid {
        let round = Round::new(name.into(), patterns, &self.limits);
        let id = round.id;
        tracing::info!(round_id = %id, name = %round.name, "round created");
        self.rounds.insert(id, Arc::new(RwLock::new(round)));
        id
    }

    fn round(&self, id: Uuid) -> Result<Arc<RwLock<Round>>, RoundError> {
        self.rounds
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(RoundError::NotFound(id))
    }

    /// Open a scheduled round for play
    pub fn activate(&self, id: Uuid) -> Result<(), RoundError> {
        let round = self.round(id)?;
        let mut round = round.write().unwrap();
        match round.status {
            RoundStatus::Scheduled => {
                round.status = RoundStatus::Active;
                round.opened_at = Some(Utc::now());
                tracing::info!(round_id = %id, "round activated");
                Ok(())
            }
            RoundStatus::Active => Ok(()),
            RoundStatus::Completed => Err(RoundError::AlreadyCompleted(id)),
        }
    }

    /// End an active round; its ledger is frozen from here on.
    pub fn complete(&self, id: Uuid) -> Result<(), RoundError> {
        let round = self.round(id)?;
        let mut round = round.write().unwrap();
        round.ensure_active()?;
        round.status = RoundStatus::Completed;
        round.closed_at = Some(Utc::now());
        tracing::info!(round_id = %id, calls = round.ledger.len(), "round completed");
        Ok(())
    }

    pub fn status(&self, id: Uuid) -> Result<RoundStatus, RoundError> {
        Ok(self.round(id)?.read().unwrap().status)
    }

    /// Call the next random number for an active round. The write lock
    /// serializes appends per round; `Ok(None)` means the pool is exhausted.
    pub fn call_next<R: Rng>(
        &self,
        id: Uuid,
        caller: &mut NumberCaller<R>,
    ) -> Result<Option<CalledNumber>, RoundError> {
        let round = self.round(id)?;
        let mut round = round.write().unwrap();
        round.ensure_active()?;
        Ok(caller.call_next(&mut round.ledger))
    }

    /// Manually call a specific number for an active round
    pub fn call_specific<R: Rng>(
        &self,
        id: Uuid,
        caller: &mut NumberCaller<R>,
        number: u8,
    ) -> Result<CalledNumber, RoundError> {
        let round = self.round(id)?;
        let mut round = round.write().unwrap();
        round.ensure_active()?;
        Ok(caller.call_specific(&mut round.ledger, number)?)
    }

    /// Point-in-time copy of a round's ledger for lock-free evaluation
    pub fn ledger_snapshot(&self, id: Uuid) -> Result<CalledNumberLedger, RoundError> {
        Ok(self.round(id)?.read().unwrap().ledger.clone())
    }

    /// Point-in-time copy of the whole round record
    pub fn round_snapshot(&self, id: Uuid) -> Result<Round, RoundError> {
        Ok(self.round(id)?.read().unwrap().clone())
    }

    /// Check a win claim: the round must be active and must offer the
    /// claimed pattern; the verdict itself comes from the kernel, run
    /// against a ledger snapshot taken under the read lock.
    pub fn verify_claim(
        &self,
        id: Uuid,
        card: &CardLayout,
        pattern_id: Uuid,
    ) -> Result<bool, RoundError> {
        let round = self.round(id)?;
        let (mask, ledger) = {
            let round = round.read().unwrap();
            round.ensure_active()?;
            let pattern = round
                .pattern(pattern_id)
                .ok_or(RoundError::PatternNotOffered { id, pattern_id })?;
            (pattern.mask.clone(), round.ledger.clone())
        };

        let won = evaluator::verify(card, &mask, &ledger);
        tracing::debug!(round_id = %id, %pattern_id, won, calls = ledger.len(), "claim evaluated");
        Ok(won)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::generator::CardGenerator;
    use crate::game::pattern::PatternMask;

    fn manager_with_round() -> (RoundManager, Uuid, Uuid) {
        let manager = RoundManager::new(RoundConfig::default());
        let pattern = Pattern::new("top-row", PatternMask::row(0).unwrap());
        let pattern_id = pattern.id;
        let round_id = manager.create_round("evening round", vec![pattern]);
        (manager, round_id, pattern_id)
    }

    #[test]
    fn test_lifecycle_transitions() {
        let (manager, id, _) = manager_with_round();
        assert_eq!(manager.status(id).unwrap(), RoundStatus::Scheduled);

        manager.activate(id).unwrap();
        assert_eq!(manager.status(id).unwrap(), RoundStatus::Active);

        manager.complete(id).unwrap();
        assert_eq!(manager.status(id).unwrap(), RoundStatus::Completed);

        assert_eq!(
            manager.activate(id),
            Err(RoundError::AlreadyCompleted(id))
        );
    }

    #[test]
    fn test_unknown_round_not_found() {
        let (manager, _, _) = manager_with_round();
        let missing = Uuid::new_v4();
        assert_eq!(manager.status(missing), Err(RoundError::NotFound(missing)));
    }

    #[test]
    fn test_calls_rejected_unless_active() {
        let (manager, id, _) = manager_with_round();
        let mut caller = NumberCaller::from_seed(1);

        assert!(matches!(
            manager.call_next(id, &mut caller),
            Err(RoundError::NotActive { .. })
        ));

        manager.activate(id).unwrap();
        assert!(manager.call_next(id, &mut caller).unwrap().is_some());

        manager.complete(id).unwrap();
        assert!(matches!(
            manager.call_next(id, &mut caller),
            Err(RoundError::NotActive { .. })
        ));
        // Ledger frozen at one entry.
        assert_eq!(manager.ledger_snapshot(id).unwrap().len(), 1);
    }

    #[test]
    fn test_manual_call_duplicate_surfaces_ledger_error() {
        let (manager, id, _) = manager_with_round();
        manager.activate(id).unwrap();
        let mut caller = NumberCaller::from_seed(2);

        manager.call_specific(id, &mut caller, 12).unwrap();
        assert!(matches!(
            manager.call_specific(id, &mut caller, 12),
            Err(RoundError::Ledger(_))
        ));
    }

    #[test]
    fn test_claim_rejected_for_inactive_round() {
        let (manager, id, pattern_id) = manager_with_round();
        let card = CardGenerator::from_seed(3).generate();

        assert!(matches!(
            manager.verify_claim(id, &card, pattern_id),
            Err(RoundError::NotActive { .. })
        ));
    }

    #[test]
    fn test_claim_rejected_for_unoffered_pattern() {
        let (manager, id, _) = manager_with_round();
        manager.activate(id).unwrap();
        let card = CardGenerator::from_seed(4).generate();
        let other = Uuid::new_v4();

        assert_eq!(
            manager.verify_claim(id, &card, other),
            Err(RoundError::PatternNotOffered {
                id,
                pattern_id: other
            })
        );
    }

    #[test]
    fn test_claim_verdict_follows_ledger() {
        let (manager, id, pattern_id) = manager_with_round();
        manager.activate(id).unwrap();
        let card = CardGenerator::from_seed(5).generate();
        let mut caller = NumberCaller::from_seed(5);

        assert!(!manager.verify_claim(id, &card, pattern_id).unwrap());

        // Call every top-row number on the card.
        for col in 0..5 {
            if let crate::game::card::Cell::Number(n) = card.cell(0, col) {
                manager.call_specific(id, &mut caller, n).unwrap();
            }
        }
        assert!(manager.verify_claim(id, &card, pattern_id).unwrap());
    }

    #[test]
    fn test_concurrent_calls_never_duplicate() {
        use std::sync::atomic::{AtomicUsize, Ordering};

        let (manager, id, _) = manager_with_round();
        manager.activate(id).unwrap();
        let manager = Arc::new(manager);
        let exhausted = Arc::new(AtomicUsize::new(0));

        std::thread::scope(|scope| {
            for seed in 0..4 {
                let manager = manager.clone();
                let exhausted = exhausted.clone();
                scope.spawn(move || {
                    let mut caller = NumberCaller::from_seed(seed);
                    loop {
                        match manager.call_next(id, &mut caller) {
                            Ok(Some(_)) => {}
                            Ok(None) => {
                                exhausted.fetch_add(1, Ordering::SeqCst);
                                break;
                            }
                            Err(e) => panic!("call failed: {e}"),
                        }
                    }
                });
            }
        });

        let ledger = manager.ledger_snapshot(id).unwrap();
        assert!(ledger.is_exhausted());
        let unique: std::collections::HashSet<u8> = ledger.numbers().collect();
        assert_eq!(unique.len(), 75);
        assert_eq!(exhausted.load(Ordering::SeqCst), 4);
    }
}
