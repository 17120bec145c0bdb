#![allow(dead_code)]

use solana_program::{clock::UnixTimestamp, pubkey::Pubkey};
use verification_market::{
    constants::TOKEN_UNIT,
    host::{InMemoryAttestationLedger, InMemoryTokenLedger, StaticRegistry},
    ports::{MarketServices, TokenService},
    state::{ConfigUpdate, Market},
    MarketParams,
};

pub const NOW: UnixTimestamp = 1_000;
pub const PREDICTION_END: UnixTimestamp = 2_000;
pub const VERIFICATION_START: UnixTimestamp = 3_000;

pub const QUESTION: &str = "Will the bridge open before the end of the year?";

pub fn tokens(whole: u128) -> u128 {
    whole * TOKEN_UNIT
}

/// Protocol collaborators plus the identities every scenario needs
pub struct TestEnv {
    pub tokens: InMemoryTokenLedger,
    pub attestations: InMemoryAttestationLedger,
    pub passes: InMemoryAttestationLedger,
    pub registry: StaticRegistry,
    pub owner: Pubkey,
    pub factory: Pubkey,
    pub arbitrator: Pubkey,
    pub foundation: Pubkey,
    pub creator: Pubkey,
    pub escrow: Pubkey,
}

impl TestEnv {
    pub fn new() -> Self {
        let owner = Pubkey::new_unique();
        let factory = Pubkey::new_unique();
        let arbitrator = Pubkey::new_unique();
        let foundation = Pubkey::new_unique();
        Self {
            tokens: InMemoryTokenLedger::new(),
            attestations: InMemoryAttestationLedger::new(),
            passes: InMemoryAttestationLedger::new(),
            registry: StaticRegistry::new(owner, factory, arbitrator, foundation),
            owner,
            factory,
            arbitrator,
            foundation,
            creator: Pubkey::new_unique(),
            escrow: Pubkey::new_unique(),
        }
    }

    pub fn services(&mut self) -> MarketServices<'_> {
        MarketServices {
            tokens: &mut self.tokens,
            attestations: &mut self.attestations,
            creator_passes: &self.passes,
            registry: &self.registry,
        }
    }

    pub fn update_config(&mut self, update: ConfigUpdate) {
        let owner = self.owner;
        self.registry.update_config(&owner, &update).unwrap();
    }

    pub fn params(&mut self) -> MarketParams {
        let creator = self.creator;
        MarketParams {
            address: self.escrow,
            content_hash: Market::content_hash_of(QUESTION),
            creator,
            creator_pass: self.passes.mint(&creator, 0),
            prediction_end_time: PREDICTION_END,
            verification_start_time: VERIFICATION_START,
        }
    }

    pub fn create_market(&mut self) -> Market {
        let params = self.params();
        let factory = self.factory;
        let mut market = Market::default();
        market
            .initialize(&self.registry, &factory, NOW, params)
            .unwrap();
        market
    }

    /// Fresh account holding `amount` tokens
    pub fn funded(&mut self, amount: u128) -> Pubkey {
        let account = Pubkey::new_unique();
        self.tokens.mint(&account, amount);
        account
    }

    /// Fresh account holding one instrument of `power`
    pub fn verifier(&mut self, power: u128) -> (Pubkey, u64) {
        let account = Pubkey::new_unique();
        let id = self.attestations.mint(&account, power);
        (account, id)
    }

    pub fn balance(&self, who: &Pubkey) -> u128 {
        self.tokens.balance_of(who)
    }
}

pub fn verification_time(market: &Market) -> UnixTimestamp {
    market.verification_start_time + 1
}

pub fn dispute_time(market: &Market) -> UnixTimestamp {
    market.verification_end_time()
}

pub fn close_time(market: &Market) -> UnixTimestamp {
    market.dispute_end_time() + 1
}
