use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{program_error::ProgramError, pubkey::Pubkey};

use crate::{error::MarketError, math::checked_add};

/// One of the two mutually exclusive outcomes
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Side::A => Side::B,
            Side::B => Side::A,
        }
    }
}

impl From<bool> for Side {
    /// `true` attests side A
    fn from(side_a: bool) -> Self {
        if side_a {
            Side::A
        } else {
            Side::B
        }
    }
}

/// Pull-payment state of a ledger entry
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimStatus {
    Unclaimed,
    Claimed,
}

impl Default for ClaimStatus {
    fn default() -> Self {
        ClaimStatus::Unclaimed
    }
}

impl ClaimStatus {
    /// Flip to `Claimed`, failing if already claimed
    pub fn claim(&mut self) -> Result<(), ProgramError> {
        match self {
            ClaimStatus::Unclaimed => {
                *self = ClaimStatus::Claimed;
                Ok(())
            }
            ClaimStatus::Claimed => Err(MarketError::AlreadyWithdrawn.into()),
        }
    }

    pub fn is_claimed(&self) -> bool {
        *self == ClaimStatus::Claimed
    }
}

/// Accumulated prediction stake of one account
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PredictionEntry {
    pub amount_a: u128,
    pub amount_b: u128,
    pub claim: ClaimStatus,
}

impl PredictionEntry {
    pub fn amount(&self, side: Side) -> u128 {
        match side {
            Side::A => self.amount_a,
            Side::B => self.amount_b,
        }
    }

    pub fn total(&self) -> Result<u128, ProgramError> {
        checked_add(self.amount_a, self.amount_b)
    }

    pub fn accumulate(&mut self, amount_a: u128, amount_b: u128) -> Result<(), ProgramError> {
        self.amount_a = checked_add(self.amount_a, amount_a)?;
        self.amount_b = checked_add(self.amount_b, amount_b)?;
        Ok(())
    }
}

/// Append-only verification log record. Only `claim` changes after append.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerificationEntry {
    pub verifier: Pubkey,
    /// Power consumed from the instrument
    pub power: u128,
    pub attestation_id: u64,
    pub side: Side,
    /// Converted from a privilege reservation
    pub privileged: bool,
    pub claim: ClaimStatus,
}

impl VerificationEntry {
    pub const LEN: usize = 32 + 16 + 8 + 1 + 1 + 1;
}
