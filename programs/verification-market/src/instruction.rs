use borsh::{BorshDeserialize, BorshSerialize};
use solana_program::{clock::UnixTimestamp, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    error::MarketError,
    state::{DisputeOutcome, Side},
};

/// Market operations. The signer of the enclosing call is the caller of
/// every variant.
#[derive(BorshSerialize, BorshDeserialize, Debug, Clone, PartialEq, Eq)]
pub enum MarketInstruction {
    /// Factory only, once per market
    Initialize {
        address: Pubkey,
        content_hash: [u8; 32],
        creator: Pubkey,
        creator_pass: u64,
        prediction_end_time: UnixTimestamp,
        verification_start_time: UnixTimestamp,
    },

    /// Stake on either or both sides before prediction end
    Predict { amount_a: u128, amount_b: u128 },

    /// Attest a side with an owned instrument during verification
    Verify { attestation_id: u64, side: Side },

    /// Reserve an instrument's power before verification starts
    StakeForPrivilege { attestation_id: u64 },

    /// Spend the reservation on a side
    PrivilegeVerify { side: Side },

    /// Escrow the dispute price during the dispute window
    OpenDispute { content_hash: [u8; 32] },

    /// Arbitrator only; closes the market
    ResolveDispute { outcome: DisputeOutcome },

    CloseMarket,

    WithdrawPredictionReward,

    WithdrawVerificationReward { entry_index: u64, reclaim_power: bool },

    /// Creator pass holder only
    WithdrawCreatorFee,

    /// Invalid markets only
    WithdrawRefund,

    ReclaimPrivilegeStake,
}

impl MarketInstruction {
    pub fn unpack(input: &[u8]) -> Result<Self, ProgramError> {
        Self::try_from_slice(input).map_err(|_| MarketError::InvalidInstruction.into())
    }

    pub fn pack(&self) -> Result<Vec<u8>, ProgramError> {
        self.try_to_vec()
            .map_err(|e| ProgramError::BorshIoError(e.to_string()))
    }
}
