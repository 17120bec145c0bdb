//! Checked integer arithmetic for token amounts
//!
//! All amounts are u128 base units. Division truncates; the dust stays in
//! the market escrow. Products of two 18-decimal amounts overflow u128, so
//! `mul_div` widens to 256 bits before dividing.

use solana_program::program_error::ProgramError;

use crate::{constants::BPS_DENOMINATOR, error::MarketError};

const LOW_64: u128 = u64::MAX as u128;

/// 256-bit intermediate product as two u128 halves
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct U256 {
    pub hi: u128,
    pub lo: u128,
}

impl U256 {
    /// Full product of two u128 values
    pub fn mul(a: u128, b: u128) -> Self {
        let (a_hi, a_lo) = (a >> 64, a & LOW_64);
        let (b_hi, b_lo) = (b >> 64, b & LOW_64);

        let ll = a_lo * b_lo;
        let lh = a_lo * b_hi;
        let hl = a_hi * b_lo;
        let hh = a_hi * b_hi;

        // < 3 * 2^64, cannot overflow
        let mid = (ll >> 64) + (lh & LOW_64) + (hl & LOW_64);

        Self {
            hi: hh + (lh >> 64) + (hl >> 64) + (mid >> 64),
            lo: (ll & LOW_64) | (mid << 64),
        }
    }

    /// Quotient by a u128 divisor, `None` if it does not fit in u128
    pub fn checked_div(self, divisor: u128) -> Option<u128> {
        if divisor == 0 || self.hi >= divisor {
            return None;
        }

        // Shift-subtract long division; the remainder stays below `divisor`
        let mut remainder = self.hi;
        let mut quotient = 0u128;
        for bit in (0..128).rev() {
            let carry = remainder >> 127;
            remainder = (remainder << 1) | ((self.lo >> bit) & 1);
            quotient <<= 1;
            if carry == 1 || remainder >= divisor {
                remainder = remainder.wrapping_sub(divisor);
                quotient |= 1;
            }
        }
        Some(quotient)
    }
}

pub fn checked_add(a: u128, b: u128) -> Result<u128, ProgramError> {
    a.checked_add(b).ok_or_else(|| MarketError::ArithmeticOverflow.into())
}

pub fn checked_sub(a: u128, b: u128) -> Result<u128, ProgramError> {
    a.checked_sub(b).ok_or_else(|| MarketError::ArithmeticOverflow.into())
}

/// `value * numerator / denominator`, truncating
pub fn mul_div(value: u128, numerator: u128, denominator: u128) -> Result<u128, ProgramError> {
    if denominator == 0 {
        return Err(MarketError::DivisionByZero.into());
    }
    U256::mul(value, numerator)
        .checked_div(denominator)
        .ok_or_else(|| MarketError::ArithmeticOverflow.into())
}

/// Share of `value` expressed in basis points
pub fn bps_of(value: u128, bps: u16) -> Result<u128, ProgramError> {
    mul_div(value, bps as u128, BPS_DENOMINATOR)
}
