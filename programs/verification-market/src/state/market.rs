//! Market account
//!
//! One `Market` per prediction event. It owns its prediction map and
//! verification log; the config is a snapshot copied at initialization.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use sha3::{Digest, Keccak256};
use solana_program::{
    clock::UnixTimestamp, program_error::ProgramError, pubkey::Pubkey,
};

use crate::{
    constants::BPS_DENOMINATOR,
    error::MarketError,
    math::checked_add,
    state::{
        config::MarketConfig,
        stake::{ClaimStatus, PredictionEntry, Side, VerificationEntry},
    },
};

pub const MARKET_DISCRIMINATOR: [u8; 8] = [86, 69, 82, 95, 77, 75, 84, 49]; // "VER_MKT1"

/// Frozen outcome. Numeric values match the emitted codes.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketResult {
    None = 0,
    WinnerA = 1,
    WinnerB = 2,
    Draw = 3,
}

impl MarketResult {
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn winner(self) -> Option<Side> {
        match self {
            MarketResult::WinnerA => Some(Side::A),
            MarketResult::WinnerB => Some(Side::B),
            _ => None,
        }
    }
}

/// Arbitrator ruling
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisputeOutcome {
    ConfirmA = 1,
    ConfirmB = 2,
    Reject = 3,
    Draw = 4,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisputeState {
    pub creator: Pubkey,
    /// Price escrowed when the dispute was opened
    pub price: u128,
    pub opened_at: UnixTimestamp,
    /// Ruling differed from the verification-implied result
    pub confirmed: bool,
    pub solved: bool,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrivilegeStatus {
    /// Power held in `reserved_power`, no side chosen
    Reserved,
    /// Converted into a verification entry
    Converted,
    /// Never converted; instrument returned after close
    Reclaimed,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrivilegeSlot {
    pub staker: Pubkey,
    pub attestation_id: u64,
    pub power: u128,
    pub status: PrivilegeStatus,
}

/// How the prediction pool is paid out
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayoutBasis {
    /// Winning side's predictors share the pool by stake
    Winner(Side),
    /// Every predictor reclaims from their own side's sub-pool
    ProRata,
    /// Invalid market: predictions pay nothing, refunds are open
    Refund,
}

/// Amounts frozen when the market closes
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Settlement {
    pub total: u128,
    pub burn: u128,
    pub foundation: u128,
    pub market_creator: u128,
    pub verification: u128,
    /// Remainder shared by predictors (or refunded on invalid markets)
    pub prediction_pool: u128,
    /// Share of the verification fee left for verifiers
    pub verifier_pool: u128,
    pub basis: PayoutBasis,
    pub valid: bool,
}

/// Lifecycle phase derived from timestamps and flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarketPhase {
    Predicting,
    AwaitingVerification,
    Verifying,
    DisputeWindow,
    DisputeOpen,
    ReadyToClose,
    Closed,
}

#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq)]
pub struct Market {
    /// Account discriminator
    pub discriminator: [u8; 8],

    pub is_initialized: bool,

    /// Escrow address holding tokens and instruments
    pub address: Pubkey,

    pub content_hash: [u8; 32],
    pub creator: Pubkey,

    /// Creator-designation instrument; its holder collects the creator fee
    pub creator_pass: u64,

    pub config: MarketConfig,

    pub prediction_end_time: UnixTimestamp,
    pub verification_start_time: UnixTimestamp,

    pub side_a_total: u128,
    pub side_b_total: u128,

    pub verified_a: u128,
    pub verified_b: u128,
    pub reserved_power: u128,

    pub result: MarketResult,
    pub closed: bool,

    pub dispute: Option<DisputeState>,
    pub privilege: Option<PrivilegeSlot>,

    pub predictions: BTreeMap<Pubkey, PredictionEntry>,
    pub verifications: Vec<VerificationEntry>,

    pub settlement: Option<Settlement>,
    pub creator_fee_claim: ClaimStatus,
}

/// Read-only snapshot for clients
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarketSummary {
    pub side_a_total: u128,
    pub side_b_total: u128,
    pub verified_a: u128,
    pub verified_b: u128,
    pub reserved_power: u128,
    pub verification_count: usize,
    pub predictor_count: usize,
    pub result: MarketResult,
    pub closed: bool,
}

impl Default for Market {
    fn default() -> Self {
        Self {
            discriminator: [0u8; 8],
            is_initialized: false,
            address: Pubkey::default(),
            content_hash: [0u8; 32],
            creator: Pubkey::default(),
            creator_pass: 0,
            config: MarketConfig::default(),
            prediction_end_time: 0,
            verification_start_time: 0,
            side_a_total: 0,
            side_b_total: 0,
            verified_a: 0,
            verified_b: 0,
            reserved_power: 0,
            result: MarketResult::None,
            closed: false,
            dispute: None,
            privilege: None,
            predictions: BTreeMap::new(),
            verifications: Vec::new(),
            settlement: None,
            creator_fee_claim: ClaimStatus::Unclaimed,
        }
    }
}

impl Market {
    /// Keccak-256 of the market question
    pub fn content_hash_of(question: &str) -> [u8; 32] {
        let mut hasher = Keccak256::new();
        hasher.update(question.as_bytes());
        hasher.finalize().into()
    }

    pub fn validate(&self) -> Result<(), ProgramError> {
        if !self.is_initialized {
            return Err(MarketError::NotInitialized.into());
        }
        if self.discriminator != MARKET_DISCRIMINATOR {
            return Err(ProgramError::InvalidAccountData);
        }
        Ok(())
    }

    pub fn verification_end_time(&self) -> UnixTimestamp {
        self.verification_start_time
            .saturating_add(self.config.verification_period)
    }

    pub fn dispute_end_time(&self) -> UnixTimestamp {
        self.verification_end_time()
            .saturating_add(self.config.dispute_period)
    }

    pub fn total_pool(&self) -> Result<u128, ProgramError> {
        checked_add(self.side_a_total, self.side_b_total)
    }

    pub fn side_total(&self, side: Side) -> u128 {
        match side {
            Side::A => self.side_a_total,
            Side::B => self.side_b_total,
        }
    }

    pub fn verified(&self, side: Side) -> u128 {
        match side {
            Side::A => self.verified_a,
            Side::B => self.verified_b,
        }
    }

    pub(crate) fn verified_mut(&mut self, side: Side) -> &mut u128 {
        match side {
            Side::A => &mut self.verified_a,
            Side::B => &mut self.verified_b,
        }
    }

    /// verified_a + verified_b + reserved_power
    pub fn committed_power(&self) -> Result<u128, ProgramError> {
        checked_add(checked_add(self.verified_a, self.verified_b)?, self.reserved_power)
    }

    pub fn is_fully_verified(&self) -> Result<bool, ProgramError> {
        Ok(self.committed_power()? >= self.total_pool()?)
    }

    /// Result implied by the verification tally alone
    pub fn implied_result(&self) -> MarketResult {
        let tallied = self.verified_a.saturating_add(self.verified_b);
        if tallied == 0 {
            return MarketResult::Draw;
        }

        let threshold = self.config.winning_threshold_bps as u128;
        let clears = |power: u128| {
            power.saturating_mul(BPS_DENOMINATOR) > threshold.saturating_mul(tallied)
        };

        if clears(self.verified_a) {
            MarketResult::WinnerA
        } else if clears(self.verified_b) {
            MarketResult::WinnerB
        } else {
            MarketResult::Draw
        }
    }

    /// Lifecycle phase at `now`. The dispute window ends with the last second
    /// `open_dispute` accepts, so at exactly `dispute_end_time` this reports
    /// `ReadyToClose` although `close_market` only succeeds one second later.
    pub fn phase(&self, now: UnixTimestamp) -> MarketPhase {
        if self.closed {
            return MarketPhase::Closed;
        }
        if let Some(dispute) = &self.dispute {
            if !dispute.solved {
                return MarketPhase::DisputeOpen;
            }
        }
        if now < self.prediction_end_time {
            MarketPhase::Predicting
        } else if now < self.verification_start_time {
            MarketPhase::AwaitingVerification
        } else if now < self.verification_end_time() {
            MarketPhase::Verifying
        } else if now < self.dispute_end_time() {
            MarketPhase::DisputeWindow
        } else {
            MarketPhase::ReadyToClose
        }
    }

    pub fn summary(&self) -> MarketSummary {
        MarketSummary {
            side_a_total: self.side_a_total,
            side_b_total: self.side_b_total,
            verified_a: self.verified_a,
            verified_b: self.verified_b,
            reserved_power: self.reserved_power,
            verification_count: self.verifications.len(),
            predictor_count: self.predictions.len(),
            result: self.result,
            closed: self.closed,
        }
    }

    pub fn prediction(&self, account: &Pubkey) -> Option<&PredictionEntry> {
        self.predictions.get(account)
    }

    pub fn verification(&self, entry_index: u64) -> Result<&VerificationEntry, ProgramError> {
        usize::try_from(entry_index)
            .ok()
            .and_then(|i| self.verifications.get(i))
            .ok_or_else(|| MarketError::InvalidEntryIndex.into())
    }

    pub(crate) fn require_open(&self) -> Result<(), ProgramError> {
        self.validate()?;
        if self.closed {
            return Err(MarketError::MarketIsClosed.into());
        }
        Ok(())
    }

    pub(crate) fn require_closed(&self) -> Result<&Settlement, ProgramError> {
        self.validate()?;
        match (&self.settlement, self.closed) {
            (Some(settlement), true) => Ok(settlement),
            _ => Err(MarketError::MarketIsNotClosedYet.into()),
        }
    }
}
