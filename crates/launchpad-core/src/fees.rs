//! # Fee Ledger
//!
//! Trading fees are charged on the native side of every trade: on the input
//! of a buy before pricing, on the output of a sell after pricing. Each fee
//! is split between the token's creator and the platform operator.
//!
//! Creator shares live on the token's record; the platform share is a single
//! registry-wide counter held here.

use serde::{Deserialize, Serialize};

use crate::constants::{BPS_DENOMINATOR, DEFAULT_CREATOR_FEE_SHARE_BPS, DEFAULT_FEE_BPS};
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::math::curve::gross_for_net;
use crate::math::safe_math::{safe_add_u128, safe_calculate_bps, safe_sub_u128};

// ============================================================================
// Fee Schedule
// ============================================================================

/// Fee rate and creator/platform split
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    /// Fee charged on the native side of a trade (basis points)
    pub fee_bps: u16,
    /// Share of each fee credited to the token creator (basis points)
    pub creator_share_bps: u16,
}

/// One trade's fee, already split
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeBreakdown {
    pub total: u128,
    pub creator: u128,
    pub platform: u128,
}

impl Default for FeeSchedule {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
            creator_share_bps: DEFAULT_CREATOR_FEE_SHARE_BPS,
        }
    }
}

impl FeeSchedule {
    pub fn new(fee_bps: u16, creator_share_bps: u16) -> LaunchpadResult<Self> {
        let schedule = Self { fee_bps, creator_share_bps };
        schedule.validate()?;
        Ok(schedule)
    }

    pub fn validate(&self) -> LaunchpadResult<()> {
        // A 100% fee would leave nothing to price and makes exact quotes unsolvable
        if self.fee_bps as u128 >= BPS_DENOMINATOR {
            return Err(LaunchpadError::invalid_config(
                "fee_bps",
                &self.fee_bps.to_string(),
                "less than 10000",
            ));
        }
        if self.creator_share_bps as u128 > BPS_DENOMINATOR {
            return Err(LaunchpadError::invalid_config(
                "creator_fee_share_bps",
                &self.creator_share_bps.to_string(),
                "at most 10000",
            ));
        }
        Ok(())
    }

    /// Fee owed on `amount`, floored, with the platform taking the remainder
    pub fn fee_on(&self, amount: u128) -> LaunchpadResult<FeeBreakdown> {
        let total = safe_calculate_bps(amount, self.fee_bps)?;
        let creator = safe_calculate_bps(total, self.creator_share_bps)?;
        let platform = safe_sub_u128(total, creator)?;
        Ok(FeeBreakdown { total, creator, platform })
    }

    /// Split `amount` into (fee, amount net of fee)
    pub fn deduct(&self, amount: u128) -> LaunchpadResult<(FeeBreakdown, u128)> {
        let fee = self.fee_on(amount)?;
        let net = safe_sub_u128(amount, fee.total)?;
        Ok((fee, net))
    }

    /// Amount which still leaves at least `net` after the fee
    pub fn gross_for_net(&self, net: u128) -> LaunchpadResult<u128> {
        gross_for_net(net, self.fee_bps)
    }
}

// ============================================================================
// Platform Fee Ledger
// ============================================================================

/// Registry-wide fee counters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeeLedger {
    /// Platform fees awaiting withdrawal
    platform_fees: u128,
    /// Every fee ever charged, creator and platform shares alike
    lifetime_fees: u128,
}

impl FeeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn platform_fees(&self) -> u128 {
        self.platform_fees
    }

    pub fn lifetime_fees(&self) -> u128 {
        self.lifetime_fees
    }

    /// Accrue one trade's fee; returns the prior counters for rollback
    pub fn accrue(&mut self, fee: &FeeBreakdown) -> LaunchpadResult<(u128, u128)> {
        let prior = (self.platform_fees, self.lifetime_fees);
        let platform_fees = safe_add_u128(self.platform_fees, fee.platform)?;
        let lifetime_fees = safe_add_u128(self.lifetime_fees, fee.total)?;
        self.platform_fees = platform_fees;
        self.lifetime_fees = lifetime_fees;
        Ok(prior)
    }

    /// Zero the platform counter and hand back what it held
    pub fn take_platform_fees(&mut self) -> LaunchpadResult<u128> {
        if self.platform_fees == 0 {
            return Err(LaunchpadError::NoFeesToWithdraw);
        }
        Ok(std::mem::take(&mut self.platform_fees))
    }

    pub(crate) fn restore(&mut self, platform_fees: u128, lifetime_fees: u128) {
        self.platform_fees = platform_fees;
        self.lifetime_fees = lifetime_fees;
    }
}
