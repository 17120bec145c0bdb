//! Settlement engine: fee breakdown at close and reward withdrawals after

pub mod fees;
pub mod rewards;

pub use fees::*;
