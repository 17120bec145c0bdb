//! Close-time fee breakdown
//!
//! Computed once from the final pools and frozen into the market's
//! `Settlement`. Burn and foundation shares leave the escrow at close; the
//! rest stays behind for pull withdrawals.

use solana_program::program_error::ProgramError;

use crate::{
    math::{bps_of, checked_add, checked_sub},
    state::{MarketConfig, MarketResult, PayoutBasis, Settlement, Side},
};

/// How a dispute ended, for fee routing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeSettlement {
    Undisputed,
    /// Ruling overturned the verifiers
    Confirmed { price: u128 },
    /// Ruling matched the verifiers
    Rejected { price: u128 },
}

/// Dispute-driven transfers executed at close
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DisputePayouts {
    pub to_dispute_creator: u128,
    pub to_arbitrator: u128,
}

impl DisputePayouts {
    pub fn total(&self) -> Result<u128, ProgramError> {
        checked_add(self.to_dispute_creator, self.to_arbitrator)
    }
}

/// Inputs the fee engine reads from the market
#[derive(Debug, Clone, Copy)]
pub struct PoolSnapshot {
    pub side_a_total: u128,
    pub side_b_total: u128,
    pub verification_count: usize,
}

pub fn compute_settlement(
    config: &MarketConfig,
    pools: &PoolSnapshot,
    result: MarketResult,
    dispute: DisputeSettlement,
) -> Result<(Settlement, DisputePayouts), ProgramError> {
    let total = checked_add(pools.side_a_total, pools.side_b_total)?;
    let valid = pools.verification_count > 0;

    let burn = bps_of(total, config.burn_fee_bps)?;
    let foundation = bps_of(total, config.foundation_fee_bps)?;
    let (market_creator, verification) = if valid {
        (
            bps_of(total, config.market_creator_fee_bps)?,
            bps_of(total, config.verification_fee_bps)?,
        )
    } else {
        (0, 0)
    };

    let after_protocol = checked_sub(checked_sub(total, burn)?, foundation)?;
    let prediction_pool = checked_sub(checked_sub(after_protocol, market_creator)?, verification)?;

    let (verifier_pool, payouts) = match dispute {
        DisputeSettlement::Undisputed => (verification, DisputePayouts::default()),
        DisputeSettlement::Confirmed { price } => {
            let creator_share = verification / 2;
            (
                0,
                DisputePayouts {
                    to_dispute_creator: checked_add(price, creator_share)?,
                    to_arbitrator: verification - creator_share,
                },
            )
        }
        DisputeSettlement::Rejected { price } => (
            verification,
            DisputePayouts {
                to_dispute_creator: 0,
                to_arbitrator: price,
            },
        ),
    };

    let basis = if !valid {
        PayoutBasis::Refund
    } else {
        match result.winner() {
            Some(side) if winning_stake(pools, side) > 0 => PayoutBasis::Winner(side),
            // Nobody backed the winner: pay everyone back from their own side
            _ => PayoutBasis::ProRata,
        }
    };

    let settlement = Settlement {
        total,
        burn,
        foundation,
        market_creator,
        verification,
        prediction_pool: if valid { prediction_pool } else { after_protocol },
        verifier_pool,
        basis,
        valid,
    };

    Ok((settlement, payouts))
}

fn winning_stake(pools: &PoolSnapshot, side: Side) -> u128 {
    match side {
        Side::A => pools.side_a_total,
        Side::B => pools.side_b_total,
    }
}
