use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, msg, program_error::ProgramError};

use crate::{
    constants::{
        BPS_DENOMINATOR, DEFAULT_BURN_FEE_BPS, DEFAULT_DISPUTE_PERIOD, DEFAULT_DISPUTE_PRICE,
        DEFAULT_FOUNDATION_FEE_BPS, DEFAULT_MARKET_CREATOR_FEE_BPS, DEFAULT_VERIFICATION_FEE_BPS,
        DEFAULT_VERIFICATION_PERIOD, MAX_TOTAL_FEE_BPS, MIN_WINNING_THRESHOLD_BPS,
    },
    error::MarketError,
};

/// Fee and period parameters in effect for one market.
///
/// The protocol registry owns the live copy; a market takes a snapshot when
/// it is initialized and never reads the registry's copy again.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketConfig {
    /// Tokens escrowed to open a dispute
    pub dispute_price: u128,

    /// Seconds after verification end during which a dispute may be opened
    pub dispute_period: UnixTimestamp,

    /// Seconds the verification window stays open
    pub verification_period: UnixTimestamp,

    pub burn_fee_bps: u16,
    pub foundation_fee_bps: u16,
    pub market_creator_fee_bps: u16,
    pub verification_fee_bps: u16,

    /// Share of tallied power a side needs to win, in basis points.
    /// 5000 means strictly more than the other side. A supermajority such as
    /// 6667 turns a 30 vs 20 tally into a draw.
    pub winning_threshold_bps: u16,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            dispute_price: DEFAULT_DISPUTE_PRICE,
            dispute_period: DEFAULT_DISPUTE_PERIOD,
            verification_period: DEFAULT_VERIFICATION_PERIOD,
            burn_fee_bps: DEFAULT_BURN_FEE_BPS,
            foundation_fee_bps: DEFAULT_FOUNDATION_FEE_BPS,
            market_creator_fee_bps: DEFAULT_MARKET_CREATOR_FEE_BPS,
            verification_fee_bps: DEFAULT_VERIFICATION_FEE_BPS,
            winning_threshold_bps: MIN_WINNING_THRESHOLD_BPS,
        }
    }
}

impl MarketConfig {
    pub const LEN: usize = 16 + // dispute_price
        8 + // dispute_period
        8 + // verification_period
        2 * 4 + // fee bps
        2; // winning_threshold_bps

    pub fn total_fee_bps(&self) -> u32 {
        self.burn_fee_bps as u32
            + self.foundation_fee_bps as u32
            + self.market_creator_fee_bps as u32
            + self.verification_fee_bps as u32
    }

    pub fn validate(&self) -> Result<(), ProgramError> {
        if self.total_fee_bps() > MAX_TOTAL_FEE_BPS as u32 {
            msg!(
                "Total fee {} bps exceeds cap {} bps",
                self.total_fee_bps(),
                MAX_TOTAL_FEE_BPS
            );
            return Err(MarketError::InvalidFeeConfig.into());
        }

        if self.winning_threshold_bps < MIN_WINNING_THRESHOLD_BPS
            || self.winning_threshold_bps as u128 >= BPS_DENOMINATOR
        {
            msg!("Winning threshold {} bps out of range", self.winning_threshold_bps);
            return Err(MarketError::InvalidFeeConfig.into());
        }

        if self.dispute_period <= 0 || self.verification_period <= 0 {
            return Err(MarketError::InvalidTimeline.into());
        }

        Ok(())
    }

    /// Apply a partial update, returning the new config only if it validates
    pub fn updated(&self, update: &ConfigUpdate) -> Result<Self, ProgramError> {
        let mut next = *self;
        if let Some(v) = update.dispute_price {
            next.dispute_price = v;
        }
        if let Some(v) = update.dispute_period {
            next.dispute_period = v;
        }
        if let Some(v) = update.verification_period {
            next.verification_period = v;
        }
        if let Some(v) = update.burn_fee_bps {
            next.burn_fee_bps = v;
        }
        if let Some(v) = update.foundation_fee_bps {
            next.foundation_fee_bps = v;
        }
        if let Some(v) = update.market_creator_fee_bps {
            next.market_creator_fee_bps = v;
        }
        if let Some(v) = update.verification_fee_bps {
            next.verification_fee_bps = v;
        }
        if let Some(v) = update.winning_threshold_bps {
            next.winning_threshold_bps = v;
        }
        next.validate()?;
        Ok(next)
    }
}

/// Partial protocol config update
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigUpdate {
    pub dispute_price: Option<u128>,
    pub dispute_period: Option<UnixTimestamp>,
    pub verification_period: Option<UnixTimestamp>,
    pub burn_fee_bps: Option<u16>,
    pub foundation_fee_bps: Option<u16>,
    pub market_creator_fee_bps: Option<u16>,
    pub verification_fee_bps: Option<u16>,
    pub winning_threshold_bps: Option<u16>,
}
