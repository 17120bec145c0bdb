// Binary prediction market settlement
// Predictors stake tokens on side A or B, verifiers attest the outcome with
// NFT power, an arbitrator settles disputes, and the close-time fee engine
// splits the pool among winners, verifiers, the creator and the protocol.

pub mod constants;
pub mod dispute;
pub mod error;
pub mod events;
pub mod host;
pub mod instruction;
pub mod lifecycle;
pub mod math;
pub mod ports;
pub mod processor;
pub mod settlement;
pub mod stake_ledger;
pub mod state;

pub use error::MarketError;
pub use lifecycle::MarketParams;
pub use processor::Processor;

solana_program::declare_id!("VerMkt1111111111111111111111111111111111111");
