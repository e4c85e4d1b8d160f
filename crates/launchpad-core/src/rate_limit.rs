//! # Rate Limiter
//!
//! Two independent counters keyed by personhood, not by account:
//! - a creation cooldown per person
//! - a purchase cap per person per token while the token is young
//!
//! Entries are never deleted. Launch-window counters simply stop being
//! consulted once the window has closed.

use std::collections::HashMap;

use ethnum::U256;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::constants::{
    DEFAULT_CREATION_COOLDOWN_SECS, DEFAULT_LAUNCH_WINDOW_CAP, DEFAULT_LAUNCH_WINDOW_SECS,
};
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::math::safe_math::safe_add_u128;
use crate::types::TokenHandle;

/// Personhood key: a nullifier hash, or a widened address when unverified
pub type PersonKey = U256;

/// Window lengths and the launch-window purchase cap
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitPolicy {
    pub creation_cooldown_secs: u64,
    pub launch_window_secs: u64,
    pub launch_window_cap: u128,
}

impl Default for RateLimitPolicy {
    fn default() -> Self {
        Self {
            creation_cooldown_secs: DEFAULT_CREATION_COOLDOWN_SECS,
            launch_window_secs: DEFAULT_LAUNCH_WINDOW_SECS,
            launch_window_cap: DEFAULT_LAUNCH_WINDOW_CAP,
        }
    }
}

/// Creation cooldown for one person
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CooldownStatus {
    pub can_create: bool,
    /// Earliest creation time, 0 when creation is allowed now
    pub next_creation_time: u64,
}

/// Per-person creation and launch-window state
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    policy: RateLimitPolicy,
    last_creation: HashMap<PersonKey, u64>,
    launch_purchases: HashMap<(PersonKey, TokenHandle), u128>,
}

impl RateLimiter {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            policy,
            last_creation: HashMap::new(),
            launch_purchases: HashMap::new(),
        }
    }

    pub fn policy(&self) -> &RateLimitPolicy {
        &self.policy
    }

    // ========================================================================
    // Creation Cooldown
    // ========================================================================

    pub fn last_creation(&self, key: &PersonKey) -> Option<u64> {
        self.last_creation.get(key).copied()
    }

    pub fn creation_cooldown(&self, key: &PersonKey, now: u64) -> CooldownStatus {
        match self.last_creation(key) {
            None => CooldownStatus { can_create: true, next_creation_time: 0 },
            Some(last) => {
                let next = last.saturating_add(self.policy.creation_cooldown_secs);
                if now >= next {
                    CooldownStatus { can_create: true, next_creation_time: 0 }
                } else {
                    CooldownStatus { can_create: false, next_creation_time: next }
                }
            }
        }
    }

    pub fn ensure_can_create(&self, key: &PersonKey, now: u64) -> LaunchpadResult<()> {
        let status = self.creation_cooldown(key, now);
        debug!(key = %key, now, ?status, "creation cooldown check");
        if status.can_create {
            Ok(())
        } else {
            Err(LaunchpadError::TokenCreationCooldownNotMet {
                next_allowed_at: status.next_creation_time,
                now,
            })
        }
    }

    /// Anchor the cooldown at `now`, returning the previous anchor
    pub fn record_creation(&mut self, key: PersonKey, now: u64) -> Option<u64> {
        self.last_creation.insert(key, now)
    }

    pub(crate) fn restore_creation(&mut self, key: PersonKey, prior: Option<u64>) {
        match prior {
            Some(at) => self.last_creation.insert(key, at),
            None => self.last_creation.remove(&key),
        };
    }

    // ========================================================================
    // Launch-Window Cap
    // ========================================================================

    pub fn in_launch_window(&self, created_at: u64, now: u64) -> bool {
        now.saturating_sub(created_at) < self.policy.launch_window_secs
    }

    pub fn launch_purchases(&self, key: &PersonKey, token: &TokenHandle) -> u128 {
        self.launch_purchases.get(&(*key, *token)).copied().unwrap_or(0)
    }

    /// Units `key` may still buy of `token`; unlimited once the window closes
    pub fn remaining_launch_allowance(
        &self,
        key: &PersonKey,
        token: &TokenHandle,
        created_at: u64,
        now: u64,
    ) -> u128 {
        if !self.in_launch_window(created_at, now) {
            return u128::MAX;
        }
        self.policy
            .launch_window_cap
            .saturating_sub(self.launch_purchases(key, token))
    }

    /// Validate a purchase of `amount` against the cap
    ///
    /// Returns the new cumulative total to record, or `None` when the
    /// launch window has closed and nothing needs recording.
    pub fn check_purchase(
        &self,
        key: &PersonKey,
        token: &TokenHandle,
        created_at: u64,
        now: u64,
        amount: u128,
    ) -> LaunchpadResult<Option<u128>> {
        if !self.in_launch_window(created_at, now) {
            return Ok(None);
        }
        let purchased = self.launch_purchases(key, token);
        let total = safe_add_u128(purchased, amount)?;
        debug!(
            token = %token,
            purchased,
            amount,
            cap = self.policy.launch_window_cap,
            "launch window check"
        );
        if total > self.policy.launch_window_cap {
            return Err(LaunchpadError::InvalidMintAmount {
                token: *token,
                requested: amount,
                remaining: self.policy.launch_window_cap.saturating_sub(purchased),
            });
        }
        Ok(Some(total))
    }

    /// Store a cumulative total, returning the previous one
    pub fn record_purchase(&mut self, key: PersonKey, token: TokenHandle, total: u128) -> Option<u128> {
        self.launch_purchases.insert((key, token), total)
    }

    pub(crate) fn restore_purchase(&mut self, key: PersonKey, token: TokenHandle, prior: Option<u128>) {
        match prior {
            Some(total) => self.launch_purchases.insert((key, token), total),
            None => self.launch_purchases.remove(&(key, token)),
        };
    }
}
