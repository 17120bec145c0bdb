pub mod config;
pub mod market;
pub mod stake;

pub use config::*;
pub use market::*;
pub use stake::*;
