//! In-memory reference host
//!
//! Stand-ins for the token ledger, the instrument ledgers and the protocol
//! registry. They honor the port contracts (failed calls leave no trace) and
//! record enough history for tests and simulations to inspect.

pub mod attestation;
pub mod registry;
pub mod token;

pub use attestation::*;
pub use registry::*;
pub use token::*;
