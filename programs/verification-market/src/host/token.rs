use std::collections::HashMap;

use solana_program::{entrypoint::ProgramResult, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{constants::BURN_SINK, ports::TokenService};

/// One observable token movement. Burns are recorded as transfers to the
/// null sink.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferRecord {
    pub from: Pubkey,
    pub to: Pubkey,
    pub amount: u128,
}

#[derive(Debug, Default, Clone)]
pub struct InMemoryTokenLedger {
    balances: HashMap<Pubkey, u128>,
    total_supply: u128,
    transfers: Vec<TransferRecord>,
}

impl InMemoryTokenLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mint(&mut self, to: &Pubkey, amount: u128) {
        *self.balances.entry(*to).or_insert(0) += amount;
        self.total_supply += amount;
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn transfers(&self) -> &[TransferRecord] {
        &self.transfers
    }

    /// Amounts received by `to`, in order
    pub fn received_by(&self, to: &Pubkey) -> Vec<u128> {
        self.transfers
            .iter()
            .filter(|t| t.to == *to)
            .map(|t| t.amount)
            .collect()
    }

    fn debit(&mut self, from: &Pubkey, amount: u128) -> ProgramResult {
        let balance = self.balances.entry(*from).or_insert(0);
        if *balance < amount {
            msg!("Insufficient token balance: have {}, need {}", balance, amount);
            return Err(ProgramError::InsufficientFunds);
        }
        *balance -= amount;
        Ok(())
    }
}

impl TokenService for InMemoryTokenLedger {
    fn balance_of(&self, owner: &Pubkey) -> u128 {
        self.balances.get(owner).copied().unwrap_or(0)
    }

    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> ProgramResult {
        self.debit(from, amount)?;
        *self.balances.entry(*to).or_insert(0) += amount;
        self.transfers.push(TransferRecord {
            from: *from,
            to: *to,
            amount,
        });
        Ok(())
    }

    fn burn(&mut self, holder: &Pubkey, amount: u128) -> ProgramResult {
        self.debit(holder, amount)?;
        self.total_supply -= amount;
        self.transfers.push(TransferRecord {
            from: *holder,
            to: BURN_SINK,
            amount,
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_transfer_leaves_no_trace() {
        let alice = Pubkey::new_unique();
        let bob = Pubkey::new_unique();
        let mut ledger = InMemoryTokenLedger::new();
        ledger.mint(&alice, 10);

        assert_eq!(
            ledger.transfer(&alice, &bob, 11),
            Err(ProgramError::InsufficientFunds)
        );
        assert_eq!(ledger.balance_of(&alice), 10);
        assert!(ledger.transfers().is_empty());

        ledger.transfer(&alice, &bob, 4).unwrap();
        ledger.burn(&bob, 1).unwrap();
        assert_eq!(ledger.balance_of(&bob), 3);
        assert_eq!(ledger.total_supply(), 9);
        assert_eq!(ledger.received_by(&BURN_SINK), vec![1]);
    }
}
