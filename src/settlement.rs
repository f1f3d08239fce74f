//! Bet placement and settlement: turning a kernel verdict into a payout.

use crate::config::PayoutConfig;
use crate::errors::{BetError, EngineResult, RoundError};
use crate::game::card::CardLayout;
use crate::game::evaluator;
use crate::round::Round;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BetStatus {
    Active,
    Won,
    Lost,
}

/// A stake on one pattern across one or more cards in a round.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Bet {
    pub id: Uuid,
    pub round_id: Uuid,
    pub pattern_id: Uuid,
    pub amount: f64,
    pub cards: Vec<CardLayout>,
    pub status: BetStatus,
    pub winnings: f64,
    pub placed_at: DateTime<Utc>,
    pub settled_at: Option<DateTime<Utc>>,
}

/// Outcome of settling one bet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SettlementRecord {
    pub bet_id: Uuid,
    pub status: BetStatus,
    /// Index into the bet's cards of the first winning card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub winning_card: Option<usize>,
    pub gross_winnings: f64,
    pub commission: f64,
    pub net_winnings: f64,
    pub settled_at: DateTime<Utc>,
}

/// Place a bet against a round snapshot. The round must be active and must
/// offer the chosen pattern; the stake must fall inside the round's limits.
pub fn place_bet(
    round: &Round,
    pattern_id: Uuid,
    cards: Vec<CardLayout>,
    amount: f64,
) -> EngineResult<Bet> {
    if !round.is_active() {
        return Err(RoundError::NotActive {
            id: round.id,
            status: round.status.to_string(),
        }
        .into());
    }
    if round.pattern(pattern_id).is_none() {
        return Err(RoundError::PatternNotOffered {
            id: round.id,
            pattern_id,
        }
        .into());
    }
    if cards.is_empty() {
        return Err(BetError::NoCards.into());
    }
    if amount < round.min_bet {
        return Err(BetError::StakeTooLow {
            amount,
            min: round.min_bet,
        }
        .into());
    }
    if amount > round.max_bet {
        return Err(BetError::StakeTooHigh {
            amount,
            max: round.max_bet,
        }
        .into());
    }

    let bet = Bet {
        id: Uuid::new_v4(),
        round_id: round.id,
        pattern_id,
        amount,
        cards,
        status: BetStatus::Active,
        winnings: 0.0,
        placed_at: Utc::now(),
        settled_at: None,
    };
    tracing::info!(bet_id = %bet.id, round_id = %round.id, amount, "bet placed");
    Ok(bet)
}

/// Settle a bet against the round's ledger: any winning card pays
/// `amount x multiplier`, less the round's commission. The snapshot must be
/// of the round the bet was placed in, and settlement is one-shot; a
/// settled bet cannot be settled again.
pub fn settle(
    bet: &mut Bet,
    round: &Round,
    payout: &PayoutConfig,
) -> EngineResult<SettlementRecord> {
    if bet.round_id != round.id {
        return Err(BetError::WrongRound {
            expected: bet.round_id,
            actual: round.id,
        }
        .into());
    }
    if bet.status != BetStatus::Active {
        return Err(BetError::AlreadySettled(bet.id).into());
    }
    let pattern = round.pattern(bet.pattern_id).ok_or(RoundError::PatternNotOffered {
        id: round.id,
        pattern_id: bet.pattern_id,
    })?;

    let winning_card = bet
        .cards
        .iter()
        .position(|card| evaluator::verify(card, &pattern.mask, round.ledger()));

    let settled_at = Utc::now();
    let record = match winning_card {
        Some(index) => {
            let gross = bet.amount * payout.win_multiplier;
            let commission = gross * round.commission_rate;
            let net = gross - commission;
            bet.status = BetStatus::Won;
            bet.winnings = net;
            SettlementRecord {
                bet_id: bet.id,
                status: BetStatus::Won,
                winning_card: Some(index),
                gross_winnings: gross,
                commission,
                net_winnings: net,
                settled_at,
            }
        }
        None => {
            bet.status = BetStatus::Lost;
            bet.winnings = 0.0;
            SettlementRecord {
                bet_id: bet.id,
                status: BetStatus::Lost,
                winning_card: None,
                gross_winnings: 0.0,
                commission: 0.0,
                net_winnings: 0.0,
                settled_at,
            }
        }
    };

    bet.settled_at = Some(settled_at);
    tracing::info!(
        bet_id = %bet.id,
        status = ?record.status,
        net = record.net_winnings,
        "bet settled"
    );
    Ok(record)
}
