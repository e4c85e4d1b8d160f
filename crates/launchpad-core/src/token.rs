//! # Launchpad Token
//!
//! Fungible balance ledger owned by the registry. Each launched token gets
//! one. Only the minter (the registry) may mint or burn; holders move
//! balances with `transfer`, `approve` and `transfer_from`.

use std::collections::HashMap;

use serde::Serialize;

use crate::constants::TOKEN_DECIMALS;
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::math::safe_math::{safe_add_u128, safe_sub_u128};
use crate::types::{Address, TokenHandle};

// ============================================================================
// Metadata Validation
// ============================================================================

/// Validate a ticker symbol: 1 to `max_len` characters
pub fn validate_symbol(symbol: &str, max_len: usize) -> LaunchpadResult<()> {
    let len = symbol.chars().count();
    if len == 0 || len > max_len {
        return Err(LaunchpadError::InvalidSymbol {
            symbol: symbol.to_string(),
            max_len,
        });
    }
    Ok(())
}

/// Validate a display name; `None` leaves names unbounded but non-empty
pub fn validate_name(name: &str, max_len: Option<usize>) -> LaunchpadResult<()> {
    let len = name.chars().count();
    let too_long = max_len.map_or(false, |max| len > max);
    if len == 0 || too_long {
        return Err(LaunchpadError::InvalidName {
            name: name.to_string(),
            max_len: max_len.unwrap_or(usize::MAX),
        });
    }
    Ok(())
}

// ============================================================================
// Token Ledger
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LaunchpadToken {
    address: TokenHandle,
    name: String,
    symbol: String,
    decimals: u8,
    minter: Address,
    total_supply: u128,
    #[serde(skip)]
    balances: HashMap<Address, u128>,
    #[serde(skip)]
    allowances: HashMap<(Address, Address), u128>,
}

impl LaunchpadToken {
    pub fn new(address: TokenHandle, name: &str, symbol: &str, minter: Address) -> Self {
        Self {
            address,
            name: name.to_string(),
            symbol: symbol.to_string(),
            decimals: TOKEN_DECIMALS,
            minter,
            total_supply: 0,
            balances: HashMap::new(),
            allowances: HashMap::new(),
        }
    }

    pub fn address(&self) -> TokenHandle {
        self.address
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    pub fn minter(&self) -> Address {
        self.minter
    }

    pub fn total_supply(&self) -> u128 {
        self.total_supply
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> u128 {
        self.allowances.get(&(*owner, *spender)).copied().unwrap_or(0)
    }

    /// Number of accounts holding a non-zero balance
    pub fn holder_count(&self) -> usize {
        self.balances.values().filter(|balance| **balance > 0).count()
    }

    // ========================================================================
    // Minter Operations
    // ========================================================================

    pub fn mint(&mut self, caller: &Address, to: &Address, amount: u128) -> LaunchpadResult<()> {
        self.ensure_minter(caller, "mint")?;
        let total_supply = safe_add_u128(self.total_supply, amount)?;
        let balance = safe_add_u128(self.balance_of(to), amount)?;
        self.total_supply = total_supply;
        self.balances.insert(*to, balance);
        Ok(())
    }

    pub fn burn(&mut self, caller: &Address, from: &Address, amount: u128) -> LaunchpadResult<()> {
        self.ensure_minter(caller, "burn")?;
        let balance = self.debit_checked(from, amount)?;
        let total_supply = safe_sub_u128(self.total_supply, amount)?;
        self.balances.insert(*from, balance);
        self.total_supply = total_supply;
        Ok(())
    }

    fn ensure_minter(&self, caller: &Address, action: &'static str) -> LaunchpadResult<()> {
        if *caller != self.minter {
            return Err(LaunchpadError::unauthorized(*caller, action));
        }
        Ok(())
    }

    // ========================================================================
    // Holder Operations
    // ========================================================================

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> LaunchpadResult<()> {
        let from_balance = self.debit_checked(from, amount)?;
        self.balances.insert(*from, from_balance);
        // Self-transfers read the balance just written
        let to_balance = safe_add_u128(self.balance_of(to), amount)?;
        self.balances.insert(*to, to_balance);
        Ok(())
    }

    pub fn approve(&mut self, owner: &Address, spender: &Address, amount: u128) {
        self.allowances.insert((*owner, *spender), amount);
    }

    pub fn transfer_from(
        &mut self,
        spender: &Address,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        let available = self.allowance(owner, spender);
        if available < amount {
            return Err(LaunchpadError::InsufficientAllowance {
                owner: *owner,
                spender: *spender,
                available,
                required: amount,
            });
        }
        self.transfer(owner, to, amount)?;
        // An unlimited approval is never drawn down
        if available != u128::MAX {
            self.allowances.insert((*owner, *spender), available - amount);
        }
        Ok(())
    }

    fn debit_checked(&self, account: &Address, amount: u128) -> LaunchpadResult<u128> {
        let available = self.balance_of(account);
        available
            .checked_sub(amount)
            .ok_or(LaunchpadError::InsufficientTokenBalance {
                account: *account,
                available,
                required: amount,
            })
    }

    // ========================================================================
    // Rollback Support
    // ========================================================================

    pub(crate) fn restore_balance(&mut self, account: Address, balance: u128) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }

    pub(crate) fn restore_allowance(&mut self, owner: Address, spender: Address, amount: u128) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }

    pub(crate) fn restore_total_supply(&mut self, total_supply: u128) {
        self.total_supply = total_supply;
    }
}
