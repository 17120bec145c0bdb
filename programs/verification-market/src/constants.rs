//! Protocol-wide constants

use solana_program::pubkey::Pubkey;

/// Basis point denominator (10000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

/// Cap on the sum of all close-time fees
pub const MAX_TOTAL_FEE_BPS: u16 = 1_000;

/// Lowest allowed winning threshold: strict simple majority
pub const MIN_WINNING_THRESHOLD_BPS: u16 = 5_000;

/// One whole token in base units (18 decimals)
pub const TOKEN_UNIT: u128 = 1_000_000_000_000_000_000;

pub const SECONDS_PER_DAY: i64 = 86_400;

// Default fee schedule
pub const DEFAULT_BURN_FEE_BPS: u16 = 100; // 1%
pub const DEFAULT_FOUNDATION_FEE_BPS: u16 = 100; // 1%
pub const DEFAULT_MARKET_CREATOR_FEE_BPS: u16 = 50; // 0.5%
pub const DEFAULT_VERIFICATION_FEE_BPS: u16 = 250; // 2.5%

pub const DEFAULT_DISPUTE_PRICE: u128 = 1_000 * TOKEN_UNIT;
pub const DEFAULT_DISPUTE_PERIOD: i64 = SECONDS_PER_DAY;
pub const DEFAULT_VERIFICATION_PERIOD: i64 = SECONDS_PER_DAY;

/// Null sink that receives burned tokens
pub const BURN_SINK: Pubkey = Pubkey::new_from_array([0u8; 32]);
