//! Collaborator interfaces
//!
//! Token balances, attestation instruments and the protocol registry live
//! outside the market. The market reaches them only through these traits,
//! bundled in a `MarketServices` context passed to every operation.

use solana_program::{entrypoint::ProgramResult, program_error::ProgramError, pubkey::Pubkey};

use crate::state::MarketConfig;

/// Fungible stake token
pub trait TokenService {
    fn balance_of(&self, owner: &Pubkey) -> u128;

    /// Move `amount` from `from` to `to`. Fails without side effects when the
    /// balance is short.
    fn transfer(&mut self, from: &Pubkey, to: &Pubkey, amount: u128) -> ProgramResult;

    /// Destroy `amount` held by `holder`
    fn burn(&mut self, holder: &Pubkey, amount: u128) -> ProgramResult;
}

/// Ownership lookup shared by every instrument ledger
pub trait InstrumentOwnership {
    fn owner_of(&self, id: u64) -> Result<Pubkey, ProgramError>;
}

/// Reputation-power instruments used to verify markets
pub trait AttestationService: InstrumentOwnership {
    fn power_of(&self, id: u64) -> Result<u128, ProgramError>;

    fn transfer_custody(&mut self, id: u64, from: &Pubkey, to: &Pubkey) -> ProgramResult;

    fn increase_power(&mut self, id: u64, amount: u128) -> ProgramResult;

    fn decrease_power(&mut self, id: u64, amount: u128) -> ProgramResult;

    fn burn(&mut self, id: u64) -> ProgramResult;
}

/// Capability an identity holds in the protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    None,
    Factory,
    Operator,
    Arbitrator,
}

pub trait ProtocolRegistry {
    /// Snapshot of the config new markets copy
    fn current_config(&self) -> MarketConfig;

    fn role_of(&self, who: &Pubkey) -> Role;

    fn arbitrator(&self) -> Pubkey;

    fn foundation_wallet(&self) -> Pubkey;

    /// Minimum power an instrument needs to take the privilege slot
    fn minimum_mint_power(&self) -> u128;
}

/// Everything a market operation may call out to
pub struct MarketServices<'a> {
    pub tokens: &'a mut dyn TokenService,
    pub attestations: &'a mut dyn AttestationService,
    pub creator_passes: &'a dyn InstrumentOwnership,
    pub registry: &'a dyn ProtocolRegistry,
}
