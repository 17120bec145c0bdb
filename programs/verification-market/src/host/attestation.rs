use std::collections::HashMap;

use solana_program::{entrypoint::ProgramResult, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::ports::{AttestationService, InstrumentOwnership};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Instrument {
    pub owner: Pubkey,
    pub power: u128,
}

/// Instrument ledger. Also serves as the creator-pass ledger (power unused).
#[derive(Debug, Default, Clone)]
pub struct InMemoryAttestationLedger {
    instruments: HashMap<u64, Instrument>,
    next_id: u64,
    burned: Vec<u64>,
}

impl InMemoryAttestationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, owner: &Pubkey, power: u128) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.instruments.insert(
            id,
            Instrument {
                owner: *owner,
                power,
            },
        );
        id
    }

    pub fn instrument(&self, id: u64) -> Option<&Instrument> {
        self.instruments.get(&id)
    }

    pub fn is_burned(&self, id: u64) -> bool {
        self.burned.contains(&id)
    }

    fn get_mut(&mut self, id: u64) -> Result<&mut Instrument, ProgramError> {
        self.instruments.get_mut(&id).ok_or(ProgramError::InvalidArgument)
    }
}

impl InstrumentOwnership for InMemoryAttestationLedger {
    fn owner_of(&self, id: u64) -> Result<Pubkey, ProgramError> {
        self.instruments
            .get(&id)
            .map(|i| i.owner)
            .ok_or(ProgramError::InvalidArgument)
    }
}

impl AttestationService for InMemoryAttestationLedger {
    fn power_of(&self, id: u64) -> Result<u128, ProgramError> {
        self.instruments
            .get(&id)
            .map(|i| i.power)
            .ok_or(ProgramError::InvalidArgument)
    }

    fn transfer_custody(&mut self, id: u64, from: &Pubkey, to: &Pubkey) -> ProgramResult {
        let instrument = self.get_mut(id)?;
        if instrument.owner != *from {
            msg!("Instrument {} not held by {}", id, from);
            return Err(ProgramError::IllegalOwner);
        }
        instrument.owner = *to;
        Ok(())
    }

    fn increase_power(&mut self, id: u64, amount: u128) -> ProgramResult {
        let instrument = self.get_mut(id)?;
        instrument.power = instrument
            .power
            .checked_add(amount)
            .ok_or(ProgramError::ArithmeticOverflow)?;
        Ok(())
    }

    fn decrease_power(&mut self, id: u64, amount: u128) -> ProgramResult {
        let instrument = self.get_mut(id)?;
        instrument.power = instrument
            .power
            .checked_sub(amount)
            .ok_or(ProgramError::InsufficientFunds)?;
        Ok(())
    }

    fn burn(&mut self, id: u64) -> ProgramResult {
        self.instruments
            .remove(&id)
            .ok_or(ProgramError::InvalidArgument)?;
        self.burned.push(id);
        Ok(())
    }
}
