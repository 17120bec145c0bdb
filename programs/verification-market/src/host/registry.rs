use std::collections::HashMap;

use solana_program::{entrypoint::ProgramResult, msg, program_error::ProgramError, pubkey::Pubkey};

use crate::{
    ports::{ProtocolRegistry, Role},
    state::{ConfigUpdate, MarketConfig},
};

/// Protocol registry with an owner-controlled config and role table
#[derive(Debug, Clone)]
pub struct StaticRegistry {
    owner: Pubkey,
    config: MarketConfig,
    roles: HashMap<Pubkey, Role>,
    arbitrator: Pubkey,
    foundation: Pubkey,
    minimum_mint_power: u128,
}

impl StaticRegistry {
    pub fn new(owner: Pubkey, factory: Pubkey, arbitrator: Pubkey, foundation: Pubkey) -> Self {
        let mut roles = HashMap::new();
        roles.insert(factory, Role::Factory);
        roles.insert(arbitrator, Role::Arbitrator);
        Self {
            owner,
            config: MarketConfig::default(),
            roles,
            arbitrator,
            foundation,
            minimum_mint_power: 0,
        }
    }

    pub fn grant_role(&mut self, caller: &Pubkey, who: Pubkey, role: Role) -> ProgramResult {
        self.require_owner(caller)?;
        self.roles.insert(who, role);
        Ok(())
    }

    /// Affects markets initialized afterwards only
    pub fn update_config(&mut self, caller: &Pubkey, update: &ConfigUpdate) -> ProgramResult {
        self.require_owner(caller)?;
        self.config = self.config.updated(update)?;
        msg!("Protocol config updated: total fee {} bps", self.config.total_fee_bps());
        Ok(())
    }

    pub fn set_minimum_mint_power(&mut self, caller: &Pubkey, power: u128) -> ProgramResult {
        self.require_owner(caller)?;
        self.minimum_mint_power = power;
        Ok(())
    }

    fn require_owner(&self, caller: &Pubkey) -> ProgramResult {
        if *caller != self.owner {
            return Err(ProgramError::MissingRequiredSignature);
        }
        Ok(())
    }
}

impl ProtocolRegistry for StaticRegistry {
    fn current_config(&self) -> MarketConfig {
        self.config
    }

    fn role_of(&self, who: &Pubkey) -> Role {
        self.roles.get(who).copied().unwrap_or(Role::None)
    }

    fn arbitrator(&self) -> Pubkey {
        self.arbitrator
    }

    fn foundation_wallet(&self) -> Pubkey {
        self.foundation
    }

    fn minimum_mint_power(&self) -> u128 {
        self.minimum_mint_power
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_owner_updates_config() {
        let owner = Pubkey::new_unique();
        let mut registry = StaticRegistry::new(
            owner,
            Pubkey::new_unique(),
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        );
        let update = ConfigUpdate {
            burn_fee_bps: Some(200),
            ..Default::default()
        };

        assert_eq!(
            registry.update_config(&Pubkey::new_unique(), &update),
            Err(ProgramError::MissingRequiredSignature)
        );
        registry.update_config(&owner, &update).unwrap();
        assert_eq!(registry.current_config().burn_fee_bps, 200);
    }

    #[test]
    fn test_roles() {
        let owner = Pubkey::new_unique();
        let factory = Pubkey::new_unique();
        let arbitrator = Pubkey::new_unique();
        let operator = Pubkey::new_unique();
        let mut registry = StaticRegistry::new(owner, factory, arbitrator, Pubkey::new_unique());
        registry.grant_role(&owner, operator, Role::Operator).unwrap();

        assert_eq!(registry.role_of(&factory), Role::Factory);
        assert_eq!(registry.role_of(&arbitrator), Role::Arbitrator);
        assert_eq!(registry.role_of(&operator), Role::Operator);
        assert_eq!(registry.role_of(&Pubkey::new_unique()), Role::None);
    }
}
