//! Prediction and verification stakes
//!
//! Every operation runs its checks first and only then calls out to the
//! token/instrument services and mutates the market.

use solana_program::{
    clock::UnixTimestamp, entrypoint::ProgramResult, msg, program_error::ProgramError,
    pubkey::Pubkey,
};

use crate::{
    error::MarketError,
    events::{self, Event},
    math::{checked_add, checked_sub},
    ports::{MarketServices, Role},
    state::{ClaimStatus, Market, PrivilegeSlot, PrivilegeStatus, Side, VerificationEntry},
};

impl Market {
    /// Stake `amount_a` on side A and `amount_b` on side B
    pub fn predict(
        &mut self,
        services: &mut MarketServices,
        account: &Pubkey,
        now: UnixTimestamp,
        amount_a: u128,
        amount_b: u128,
    ) -> ProgramResult {
        self.require_open()?;

        if now >= self.prediction_end_time {
            return Err(MarketError::PredictionWindowClosed.into());
        }

        let amount = checked_add(amount_a, amount_b)?;
        if amount == 0 {
            return Err(MarketError::ZeroAmount.into());
        }

        let side_a_total = checked_add(self.side_a_total, amount_a)?;
        let side_b_total = checked_add(self.side_b_total, amount_b)?;
        let mut entry = self.predictions.get(account).copied().unwrap_or_default();
        entry.accumulate(amount_a, amount_b)?;

        services.tokens.transfer(account, &self.address, amount)?;

        self.side_a_total = side_a_total;
        self.side_b_total = side_b_total;
        self.predictions.insert(*account, entry);

        for (side, value) in [(Side::A, amount_a), (Side::B, amount_b)] {
            if value > 0 {
                events::Predict {
                    market: self.address,
                    account: *account,
                    side,
                    amount: value,
                }
                .emit();
            }
        }

        msg!(
            "Prediction recorded: A={} B={} pools A={} B={}",
            amount_a,
            amount_b,
            self.side_a_total,
            self.side_b_total
        );

        Ok(())
    }

    /// Power still accepted for `side`: the opposite side's stake not yet
    /// covered, bounded by the room left before full verification.
    pub fn verification_capacity(&self, side: Side) -> Result<u128, ProgramError> {
        let needed = self
            .side_total(side.opposite())
            .saturating_sub(self.verified(side));
        let room = self.total_pool()?.saturating_sub(self.committed_power()?);
        Ok(needed.min(room))
    }

    /// Attest `side` with the caller's instrument
    pub fn verify(
        &mut self,
        services: &mut MarketServices,
        verifier: &Pubkey,
        now: UnixTimestamp,
        attestation_id: u64,
        side: Side,
    ) -> Result<u64, ProgramError> {
        self.require_open()?;
        self.require_verification_window(now)?;

        if services.attestations.owner_of(attestation_id)? != *verifier {
            return Err(MarketError::IncorrectOwner.into());
        }

        if self.is_fully_verified()? {
            return Err(MarketError::MarketFullyVerified.into());
        }

        let power = services.attestations.power_of(attestation_id)?;
        let contributed = self.consumable_power(power, side)?;

        services
            .attestations
            .transfer_custody(attestation_id, verifier, &self.address)?;

        let entry_index = self.append_verification(VerificationEntry {
            verifier: *verifier,
            power: contributed,
            attestation_id,
            side,
            privileged: false,
            claim: ClaimStatus::Unclaimed,
        })?;

        events::Verify {
            market: self.address,
            verifier: *verifier,
            entry_index,
            attestation_id,
            side,
            power: contributed,
        }
        .emit();

        if contributed < power {
            msg!(
                "Instrument {} contributed {} of {} power",
                attestation_id,
                contributed,
                power
            );
        }

        Ok(entry_index)
    }

    /// Reserve an instrument's full power before verification opens
    pub fn stake_for_privilege(
        &mut self,
        services: &mut MarketServices,
        caller: &Pubkey,
        now: UnixTimestamp,
        attestation_id: u64,
    ) -> ProgramResult {
        self.require_open()?;

        if now >= self.verification_start_time {
            return Err(MarketError::PrivilegeWindowClosed.into());
        }
        if self.privilege.is_some() {
            return Err(MarketError::PrivilegeSlotOccupied.into());
        }

        let staker = services.attestations.owner_of(attestation_id)?;
        if staker != *caller && services.registry.role_of(caller) != Role::Operator {
            return Err(MarketError::IncorrectOwner.into());
        }

        let power = services.attestations.power_of(attestation_id)?;
        if power == 0 || power < services.registry.minimum_mint_power() {
            msg!(
                "Privilege instrument power {} below minimum {}",
                power,
                services.registry.minimum_mint_power()
            );
            return Err(MarketError::InsufficientPower.into());
        }
        let reserved_power = checked_add(self.reserved_power, power)?;

        services
            .attestations
            .transfer_custody(attestation_id, &staker, &self.address)?;

        self.reserved_power = reserved_power;
        self.privilege = Some(PrivilegeSlot {
            staker,
            attestation_id,
            power,
            status: PrivilegeStatus::Reserved,
        });

        events::PrivilegeStaked {
            market: self.address,
            staker,
            attestation_id,
            power,
        }
        .emit();

        Ok(())
    }

    /// Convert the privilege reservation into a verification of `side`
    pub fn privilege_verify(
        &mut self,
        caller: &Pubkey,
        now: UnixTimestamp,
        side: Side,
    ) -> Result<u64, ProgramError> {
        self.require_open()?;
        self.require_verification_window(now)?;

        let slot = self.privilege.ok_or(MarketError::NoPrivilegeStake)?;
        if slot.staker != *caller {
            return Err(MarketError::OnlyPrivilegeStaker.into());
        }
        if slot.status != PrivilegeStatus::Reserved {
            return Err(MarketError::PrivilegeAlreadyUsed.into());
        }

        // Reserved power already counts toward full verification; only the
        // side's need bounds the conversion.
        let reserved_power = checked_sub(self.reserved_power, slot.power)?;
        let needed = self
            .side_total(side.opposite())
            .saturating_sub(self.verified(side));
        let contributed = slot.power.min(needed);
        if contributed == 0 {
            return Err(MarketError::SideFullyVerified.into());
        }

        self.reserved_power = reserved_power;
        let entry_index = self.append_verification(VerificationEntry {
            verifier: slot.staker,
            power: contributed,
            attestation_id: slot.attestation_id,
            side,
            privileged: true,
            claim: ClaimStatus::Unclaimed,
        })?;
        self.privilege = Some(PrivilegeSlot {
            status: PrivilegeStatus::Converted,
            ..slot
        });

        events::PrivilegeVerify {
            market: self.address,
            staker: slot.staker,
            entry_index,
            side,
            power: contributed,
        }
        .emit();

        Ok(entry_index)
    }

    fn require_verification_window(&self, now: UnixTimestamp) -> ProgramResult {
        if now < self.verification_start_time {
            return Err(MarketError::VerificationNotStarted.into());
        }
        if now >= self.verification_end_time() {
            return Err(MarketError::VerificationClosed.into());
        }
        Ok(())
    }

    fn consumable_power(&self, power: u128, side: Side) -> Result<u128, ProgramError> {
        if power == 0 {
            return Err(MarketError::InsufficientPower.into());
        }
        let contributed = power.min(self.verification_capacity(side)?);
        if contributed == 0 {
            return Err(MarketError::SideFullyVerified.into());
        }
        Ok(contributed)
    }

    fn append_verification(&mut self, entry: VerificationEntry) -> Result<u64, ProgramError> {
        let tally = checked_add(self.verified(entry.side), entry.power)?;
        *self.verified_mut(entry.side) = tally;
        self.verifications.push(entry);
        Ok((self.verifications.len() - 1) as u64)
    }
}
