//! # Registry State
//!
//! Everything the registry owns: token records and their ledgers, fee
//! counters, rate-limit entries, consumed nullifiers and native balances.
//!
//! Reads are free. Every write goes through a method that takes the
//! running operation's [`Journal`] and records its own undo before
//! touching anything.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::bank::NativeLedger;
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::fees::{FeeBreakdown, FeeLedger};
use crate::identity::NullifierRegistry;
use crate::journal::Journal;
use crate::math::curve::{market_cap, spot_price};
use crate::math::safe_math::safe_add_u128;
use crate::rate_limit::{PersonKey, RateLimitPolicy, RateLimiter};
use crate::token::LaunchpadToken;
use crate::types::field::u128_dec;
use crate::types::{Address, TokenHandle};

// ============================================================================
// Token Record
// ============================================================================

/// Curve and bookkeeping state of one launched token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub token: TokenHandle,
    pub creator: Address,
    pub name: String,
    pub symbol: String,
    pub metadata_uri: String,
    #[serde(with = "u128_dec")]
    pub virtual_eth_reserves: u128,
    #[serde(with = "u128_dec")]
    pub virtual_token_reserves: u128,
    /// Native currency held in custody for this curve
    #[serde(with = "u128_dec")]
    pub real_eth_reserves: u128,
    #[serde(with = "u128_dec")]
    pub total_supply: u128,
    /// Creator fees awaiting withdrawal
    #[serde(with = "u128_dec")]
    pub creator_fees: u128,
    pub created_at: u64,
}

impl TokenRecord {
    pub fn spot_price(&self) -> LaunchpadResult<u128> {
        spot_price(self.virtual_eth_reserves, self.virtual_token_reserves)
    }

    pub fn market_cap(&self) -> LaunchpadResult<u128> {
        market_cap(self.spot_price()?, self.total_supply)
    }
}

// ============================================================================
// Launchpad State
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct LaunchpadState {
    records: HashMap<TokenHandle, TokenRecord>,
    ledgers: HashMap<TokenHandle, LaunchpadToken>,
    token_index: Vec<TokenHandle>,
    nonce: u64,
    fees: FeeLedger,
    limiter: RateLimiter,
    nullifiers: NullifierRegistry,
    bank: NativeLedger,
}

impl LaunchpadState {
    pub fn new(policy: RateLimitPolicy) -> Self {
        Self {
            limiter: RateLimiter::new(policy),
            ..Self::default()
        }
    }

    // ========================================================================
    // Reads
    // ========================================================================

    pub fn record(&self, token: &TokenHandle) -> LaunchpadResult<&TokenRecord> {
        self.records
            .get(token)
            .ok_or(LaunchpadError::TokenNotFound { token: *token })
    }

    pub fn ledger(&self, token: &TokenHandle) -> LaunchpadResult<&LaunchpadToken> {
        self.ledgers
            .get(token)
            .ok_or(LaunchpadError::TokenNotFound { token: *token })
    }

    pub fn contains(&self, token: &TokenHandle) -> bool {
        self.records.contains_key(token)
    }

    pub fn token_index(&self) -> &[TokenHandle] {
        &self.token_index
    }

    /// Number of tokens ever created, used to derive the next handle
    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn fees(&self) -> &FeeLedger {
        &self.fees
    }

    pub fn limiter(&self) -> &RateLimiter {
        &self.limiter
    }

    pub fn nullifiers(&self) -> &NullifierRegistry {
        &self.nullifiers
    }

    pub fn bank(&self) -> &NativeLedger {
        &self.bank
    }

    /// Native currency the registry owes: curve reserves plus unwithdrawn fees
    pub fn custody_obligations(&self) -> LaunchpadResult<u128> {
        let mut total = self.fees.platform_fees();
        for record in self.records.values() {
            total = safe_add_u128(total, record.real_eth_reserves)?;
            total = safe_add_u128(total, record.creator_fees)?;
        }
        Ok(total)
    }

    // ========================================================================
    // Registry Writes
    // ========================================================================

    pub fn register_token(
        &mut self,
        journal: &mut Journal,
        record: TokenRecord,
        ledger: LaunchpadToken,
    ) -> LaunchpadResult<()> {
        let token = record.token;
        let nonce = self
            .nonce
            .checked_add(1)
            .ok_or(LaunchpadError::arithmetic("register_token"))?;

        journal.record(move |state| {
            state.records.remove(&token);
            state.ledgers.remove(&token);
            state.token_index.retain(|handle| *handle != token);
            state.nonce -= 1;
        });
        self.records.insert(token, record);
        self.ledgers.insert(token, ledger);
        self.token_index.push(token);
        self.nonce = nonce;
        Ok(())
    }

    /// Apply `update` to a copy of the record and store it only on success
    pub fn update_record<F>(&mut self, journal: &mut Journal, token: &TokenHandle, update: F) -> LaunchpadResult<()>
    where
        F: FnOnce(&mut TokenRecord) -> LaunchpadResult<()>,
    {
        let original = self.record(token)?.clone();
        let mut updated = original.clone();
        update(&mut updated)?;

        let handle = *token;
        journal.record(move |state| {
            state.records.insert(handle, original);
        });
        self.records.insert(handle, updated);
        Ok(())
    }

    // ========================================================================
    // Token Ledger Writes
    // ========================================================================

    fn snapshot_ledger(
        &self,
        journal: &mut Journal,
        token: &TokenHandle,
        accounts: &[Address],
        allowance: Option<(Address, Address)>,
    ) -> LaunchpadResult<()> {
        let ledger = self.ledger(token)?;
        let balances: Vec<(Address, u128)> = accounts
            .iter()
            .map(|account| (*account, ledger.balance_of(account)))
            .collect();
        let total_supply = ledger.total_supply();
        let allowance = allowance.map(|(owner, spender)| (owner, spender, ledger.allowance(&owner, &spender)));

        let handle = *token;
        journal.record(move |state| {
            if let Some(ledger) = state.ledgers.get_mut(&handle) {
                for (account, balance) in balances.into_iter().rev() {
                    ledger.restore_balance(account, balance);
                }
                ledger.restore_total_supply(total_supply);
                if let Some((owner, spender, amount)) = allowance {
                    ledger.restore_allowance(owner, spender, amount);
                }
            }
        });
        Ok(())
    }

    fn ledger_mut(&mut self, token: &TokenHandle) -> LaunchpadResult<&mut LaunchpadToken> {
        self.ledgers
            .get_mut(token)
            .ok_or(LaunchpadError::TokenNotFound { token: *token })
    }

    pub fn mint(
        &mut self,
        journal: &mut Journal,
        token: &TokenHandle,
        minter: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        self.snapshot_ledger(journal, token, &[*to], None)?;
        self.ledger_mut(token)?.mint(minter, to, amount)
    }

    pub fn burn(
        &mut self,
        journal: &mut Journal,
        token: &TokenHandle,
        minter: &Address,
        from: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        self.snapshot_ledger(journal, token, &[*from], None)?;
        self.ledger_mut(token)?.burn(minter, from, amount)
    }

    pub fn transfer_tokens(
        &mut self,
        journal: &mut Journal,
        token: &TokenHandle,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        self.snapshot_ledger(journal, token, &[*from, *to], None)?;
        self.ledger_mut(token)?.transfer(from, to, amount)
    }

    pub fn approve_tokens(
        &mut self,
        journal: &mut Journal,
        token: &TokenHandle,
        owner: &Address,
        spender: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        self.snapshot_ledger(journal, token, &[], Some((*owner, *spender)))?;
        self.ledger_mut(token)?.approve(owner, spender, amount);
        Ok(())
    }

    pub fn transfer_tokens_from(
        &mut self,
        journal: &mut Journal,
        token: &TokenHandle,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        self.snapshot_ledger(journal, token, &[*owner, *to], Some((*owner, *spender)))?;
        self.ledger_mut(token)?.transfer_from(spender, owner, to, amount)
    }

    // ========================================================================
    // Native Currency Writes
    // ========================================================================

    pub fn deposit(&mut self, journal: &mut Journal, account: &Address, amount: u128) -> LaunchpadResult<()> {
        let holder = *account;
        let balance = self.bank.balance_of(account);
        let total_issued = self.bank.total_issued();
        journal.record(move |state| {
            state.bank.restore_balance(holder, balance);
            state.bank.restore_total_issued(total_issued);
        });
        self.bank.deposit(account, amount)
    }

    pub fn transfer_native(
        &mut self,
        journal: &mut Journal,
        from: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        let snapshot = [
            (*from, self.bank.balance_of(from)),
            (*to, self.bank.balance_of(to)),
        ];
        journal.record(move |state| {
            for (account, balance) in snapshot.into_iter().rev() {
                state.bank.restore_balance(account, balance);
            }
        });
        self.bank.transfer(from, to, amount)
    }

    // ========================================================================
    // Fee Writes
    // ========================================================================

    pub fn accrue_platform_fees(&mut self, journal: &mut Journal, fee: &FeeBreakdown) -> LaunchpadResult<()> {
        let (platform_fees, lifetime_fees) = self.fees.accrue(fee)?;
        journal.record(move |state| state.fees.restore(platform_fees, lifetime_fees));
        Ok(())
    }

    pub fn take_platform_fees(&mut self, journal: &mut Journal) -> LaunchpadResult<u128> {
        let lifetime_fees = self.fees.lifetime_fees();
        let amount = self.fees.take_platform_fees()?;
        journal.record(move |state| state.fees.restore(amount, lifetime_fees));
        Ok(amount)
    }

    // ========================================================================
    // Identity And Rate-Limit Writes
    // ========================================================================

    pub fn consume_nullifier(&mut self, journal: &mut Journal, nullifier_hash: ethnum::U256) {
        if self.nullifiers.consume(nullifier_hash) {
            journal.record(move |state| state.nullifiers.release(&nullifier_hash));
        }
    }

    pub fn record_creation(&mut self, journal: &mut Journal, key: PersonKey, now: u64) {
        let prior = self.limiter.record_creation(key, now);
        journal.record(move |state| state.limiter.restore_creation(key, prior));
    }

    pub fn record_purchase(&mut self, journal: &mut Journal, key: PersonKey, token: TokenHandle, total: u128) {
        let prior = self.limiter.record_purchase(key, token, total);
        journal.record(move |state| state.limiter.restore_purchase(key, token, prior));
    }
}
