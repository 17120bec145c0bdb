//! Pull-payment rewards
//!
//! Views return 0 whenever nothing is owed. Withdrawals pay
//! `min(owed, escrow balance)` so truncation dust can never push the escrow
//! below zero, and flip the entry's claim status exactly once.

use solana_program::{msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    error::MarketError,
    events::{self, Event},
    math::{checked_add, checked_sub, mul_div},
    ports::MarketServices,
    state::{
        Market, MarketResult, PayoutBasis, PredictionEntry, PrivilegeSlot, PrivilegeStatus,
        Settlement, Side, VerificationEntry,
    },
};

impl Market {
    /// Prediction reward owed to `account`; 0 before close, on invalid
    /// markets and after withdrawal
    pub fn calculate_prediction_reward(&self, account: &Pubkey) -> Result<u128, ProgramError> {
        let settlement = match self.frozen_settlement() {
            Some(settlement) => settlement,
            None => return Ok(0),
        };
        match self.predictions.get(account) {
            Some(entry) if !entry.claim.is_claimed() => self.prediction_payout(settlement, entry),
            _ => Ok(0),
        }
    }

    pub fn withdraw_prediction_reward(
        &mut self,
        services: &mut MarketServices,
        account: &Pubkey,
    ) -> Result<u128, ProgramError> {
        self.require_closed()?;
        let entry = self
            .predictions
            .get(account)
            .copied()
            .ok_or(MarketError::NothingToWithdraw)?;
        if entry.claim.is_claimed() {
            return Err(MarketError::AlreadyWithdrawn.into());
        }

        let reward = self.calculate_prediction_reward(account)?;
        if reward == 0 {
            return Err(MarketError::NothingToWithdraw.into());
        }

        let paid = self.pay_out(services, account, reward)?;
        self.claim_prediction(account)?;

        events::PredictionRewardWithdrawn {
            market: self.address,
            account: *account,
            amount: paid,
        }
        .emit();

        Ok(paid)
    }

    /// Refund owed to `account` by an invalid market
    pub fn calculate_refund(&self, account: &Pubkey) -> Result<u128, ProgramError> {
        let settlement = match self.frozen_settlement() {
            Some(settlement) if settlement.basis == PayoutBasis::Refund => settlement,
            _ => return Ok(0),
        };
        match self.predictions.get(account) {
            Some(entry) if !entry.claim.is_claimed() => {
                mul_div(settlement.prediction_pool, entry.total()?, settlement.total)
            }
            _ => Ok(0),
        }
    }

    pub fn withdraw_refund(
        &mut self,
        services: &mut MarketServices,
        account: &Pubkey,
    ) -> Result<u128, ProgramError> {
        let settlement = self.require_closed()?;
        if settlement.valid {
            return Err(MarketError::MarketIsValid.into());
        }
        let entry = self
            .predictions
            .get(account)
            .copied()
            .ok_or(MarketError::NothingToWithdraw)?;
        if entry.claim.is_claimed() {
            return Err(MarketError::AlreadyWithdrawn.into());
        }

        let refund = self.calculate_refund(account)?;
        if refund == 0 {
            return Err(MarketError::NothingToWithdraw.into());
        }

        let paid = self.pay_out(services, account, refund)?;
        self.claim_prediction(account)?;

        events::RefundWithdrawn {
            market: self.address,
            account: *account,
            amount: paid,
        }
        .emit();

        Ok(paid)
    }

    /// Token reward owed to verification entry `entry_index`
    pub fn calculate_verification_reward(&self, entry_index: u64) -> Result<u128, ProgramError> {
        let entry = self.verification(entry_index)?;
        let settlement = match self.frozen_settlement() {
            Some(settlement) => settlement,
            None => return Ok(0),
        };
        if entry.claim.is_claimed() {
            return Ok(0);
        }
        self.verification_payout(settlement, entry)
    }

    /// Settle a verification entry. Winning entries get their instrument back
    /// and the reward either as tokens or, with `reclaim_power`, as added
    /// instrument power. Losing entries forfeit the consumed power.
    pub fn withdraw_verification_reward(
        &mut self,
        services: &mut MarketServices,
        caller: &Pubkey,
        entry_index: u64,
        reclaim_power: bool,
    ) -> Result<u128, ProgramError> {
        self.require_closed()?;
        let entry = *self.verification(entry_index)?;
        if entry.verifier != *caller {
            return Err(MarketError::IncorrectOwner.into());
        }
        if entry.claim.is_claimed() {
            return Err(MarketError::AlreadyWithdrawn.into());
        }

        let reward = self.calculate_verification_reward(entry_index)?;
        let id = entry.attestation_id;

        let paid = if self.is_losing(&entry) {
            let instrument_power = services.attestations.power_of(id)?;
            if instrument_power <= entry.power {
                services.attestations.burn(id)?;
                msg!("Instrument {} burned after losing verification", id);
            } else {
                services.attestations.decrease_power(id, entry.power)?;
                services
                    .attestations
                    .transfer_custody(id, &self.address, caller)?;
            }
            0
        } else {
            let payout = reward.min(services.tokens.balance_of(&self.address));
            services
                .attestations
                .transfer_custody(id, &self.address, caller)?;
            if payout > 0 {
                if reclaim_power {
                    services.tokens.burn(&self.address, payout)?;
                    services.attestations.increase_power(id, payout)?;
                } else {
                    services.tokens.transfer(&self.address, caller, payout)?;
                }
            }
            payout
        };

        self.verifications[entry_index as usize].claim.claim()?;

        events::VerificationRewardWithdrawn {
            market: self.address,
            verifier: *caller,
            entry_index,
            amount: paid,
            reclaim_power,
        }
        .emit();

        Ok(paid)
    }

    /// Creator fee, payable to whoever holds the creator pass now
    pub fn withdraw_creator_fee(
        &mut self,
        services: &mut MarketServices,
        caller: &Pubkey,
    ) -> Result<u128, ProgramError> {
        let settlement = *self.require_closed()?;
        if services.creator_passes.owner_of(self.creator_pass)? != *caller {
            return Err(MarketError::OnlyCreatorPassHolder.into());
        }
        if !settlement.valid {
            return Err(MarketError::OnlyForValidMarkets.into());
        }
        if self.creator_fee_claim.is_claimed() {
            return Err(MarketError::AlreadyWithdrawn.into());
        }
        if settlement.market_creator == 0 {
            return Err(MarketError::NothingToWithdraw.into());
        }

        let paid = self.pay_out(services, caller, settlement.market_creator)?;
        self.creator_fee_claim.claim()?;

        events::CreatorFeeWithdrawn {
            market: self.address,
            recipient: *caller,
            amount: paid,
        }
        .emit();

        Ok(paid)
    }

    /// Return an unconverted privilege instrument after close
    pub fn reclaim_privilege_stake(
        &mut self,
        services: &mut MarketServices,
        caller: &Pubkey,
    ) -> Result<(), ProgramError> {
        self.require_closed()?;
        let slot = self.privilege.ok_or(MarketError::NoPrivilegeStake)?;
        if slot.staker != *caller {
            return Err(MarketError::OnlyPrivilegeStaker.into());
        }
        if slot.status != PrivilegeStatus::Reserved {
            return Err(MarketError::PrivilegeAlreadyUsed.into());
        }
        let reserved_power = checked_sub(self.reserved_power, slot.power)?;

        services
            .attestations
            .transfer_custody(slot.attestation_id, &self.address, caller)?;

        self.reserved_power = reserved_power;
        self.privilege = Some(PrivilegeSlot {
            status: PrivilegeStatus::Reclaimed,
            ..slot
        });

        events::PrivilegeReclaimed {
            market: self.address,
            staker: slot.staker,
            attestation_id: slot.attestation_id,
        }
        .emit();

        Ok(())
    }

    fn frozen_settlement(&self) -> Option<&Settlement> {
        if self.closed {
            self.settlement.as_ref()
        } else {
            None
        }
    }

    fn prediction_payout(
        &self,
        settlement: &Settlement,
        entry: &PredictionEntry,
    ) -> Result<u128, ProgramError> {
        match settlement.basis {
            PayoutBasis::Refund => Ok(0),
            PayoutBasis::Winner(side) => mul_div(
                settlement.prediction_pool,
                entry.amount(side),
                self.side_total(side),
            ),
            PayoutBasis::ProRata => {
                let mut payout = 0u128;
                for side in [Side::A, Side::B] {
                    let side_total = self.side_total(side);
                    if side_total == 0 {
                        continue;
                    }
                    let sub_pool =
                        mul_div(settlement.prediction_pool, side_total, settlement.total)?;
                    payout = checked_add(payout, mul_div(sub_pool, entry.amount(side), side_total)?)?;
                }
                Ok(payout)
            }
        }
    }

    fn verification_payout(
        &self,
        settlement: &Settlement,
        entry: &VerificationEntry,
    ) -> Result<u128, ProgramError> {
        let pool = settlement.verifier_pool;
        let side_pool = match self.result {
            MarketResult::WinnerA | MarketResult::WinnerB => {
                if self.is_losing(entry) {
                    return Ok(0);
                }
                pool
            }
            MarketResult::Draw => match entry.side {
                Side::A => pool / 2,
                Side::B => pool - pool / 2,
            },
            MarketResult::None => return Ok(0),
        };
        mul_div(side_pool, entry.power, self.verified(entry.side))
    }

    fn is_losing(&self, entry: &VerificationEntry) -> bool {
        self.result
            .winner()
            .map_or(false, |winner| winner != entry.side)
    }

    /// Transfer `min(owed, escrow balance)` from the escrow to `to`
    fn pay_out(
        &self,
        services: &mut MarketServices,
        to: &Pubkey,
        owed: u128,
    ) -> Result<u128, ProgramError> {
        let balance = services.tokens.balance_of(&self.address);
        let payout = owed.min(balance);
        if payout < owed {
            msg!("Payout capped at escrow balance: owed {}, paying {}", owed, payout);
        }
        if payout > 0 {
            services.tokens.transfer(&self.address, to, payout)?;
        }
        Ok(payout)
    }

    fn claim_prediction(&mut self, account: &Pubkey) -> Result<(), ProgramError> {
        self.predictions
            .get_mut(account)
            .ok_or(MarketError::NothingToWithdraw)?
            .claim
            .claim()
    }
}
