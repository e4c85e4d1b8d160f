//! # Safe Math Operations
//!
//! Overflow-checked arithmetic. Every failure surfaces as an
//! `ArithmeticFault` naming the operation; nothing saturates or wraps.

use ethnum::U256;

use crate::errors::{LaunchpadError, LaunchpadResult};

/// Macro to generate safe arithmetic functions
macro_rules! safe_arith {
    ($fn_name:ident, $type:ty, $checked_method:ident) => {
        /// Checked binary operation, faulting instead of wrapping
        pub fn $fn_name(a: $type, b: $type) -> LaunchpadResult<$type> {
            a.$checked_method(b)
                .ok_or(LaunchpadError::arithmetic(stringify!($fn_name)))
        }
    };
}

safe_arith!(safe_add_u128, u128, checked_add);
safe_arith!(safe_sub_u128, u128, checked_sub);

safe_arith!(safe_add_u256, U256, checked_add);
safe_arith!(safe_mul_u256, U256, checked_mul);

/// Rounding mode for division operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Round down (towards zero)
    Down,
    /// Round up (away from zero)
    Up,
}

/// Narrow a 256-bit intermediate back to u128
pub fn u256_to_u128(value: U256) -> LaunchpadResult<u128> {
    let (hi, lo) = value.into_words();
    if hi != 0 {
        return Err(LaunchpadError::arithmetic("u256_to_u128"));
    }
    Ok(lo)
}

/// `a * b / denominator` with a 256-bit intermediate
pub fn mul_div(a: u128, b: u128, denominator: u128, rounding: Rounding) -> LaunchpadResult<u128> {
    if denominator == 0 {
        return Err(LaunchpadError::arithmetic("mul_div"));
    }
    let product = safe_mul_u256(U256::new(a), U256::new(b))?;
    let denominator = U256::new(denominator);
    let quotient = product / denominator;
    let quotient = match rounding {
        Rounding::Down => quotient,
        Rounding::Up if product % denominator != U256::ZERO => safe_add_u256(quotient, U256::ONE)?,
        Rounding::Up => quotient,
    };
    u256_to_u128(quotient)
}

/// Portion of `value` expressed in basis points, rounded down
pub fn safe_calculate_bps(value: u128, bps: u16) -> LaunchpadResult<u128> {
    mul_div(value, bps as u128, crate::constants::BPS_DENOMINATOR, Rounding::Down)
}
