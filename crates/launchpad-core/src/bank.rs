//! # Native Currency Ledger
//!
//! Balances of the base currency in wei. The registry's own account holds
//! custody of curve reserves and accrued fees.

use std::collections::HashMap;

use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::math::safe_math::safe_add_u128;
use crate::types::Address;

#[derive(Debug, Clone, Default)]
pub struct NativeLedger {
    balances: HashMap<Address, u128>,
    total_issued: u128,
}

impl NativeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, account: &Address) -> u128 {
        self.balances.get(account).copied().unwrap_or(0)
    }

    /// Currency brought into the ledger through deposits
    pub fn total_issued(&self) -> u128 {
        self.total_issued
    }

    /// Credit newly deposited currency to `account`
    pub fn deposit(&mut self, account: &Address, amount: u128) -> LaunchpadResult<()> {
        let total_issued = safe_add_u128(self.total_issued, amount)?;
        let balance = safe_add_u128(self.balance_of(account), amount)?;
        self.total_issued = total_issued;
        self.balances.insert(*account, balance);
        Ok(())
    }

    pub fn transfer(&mut self, from: &Address, to: &Address, amount: u128) -> LaunchpadResult<()> {
        let available = self.balance_of(from);
        if available < amount {
            return Err(LaunchpadError::InsufficientFunds {
                account: *from,
                available,
                required: amount,
            });
        }
        self.balances.insert(*from, available - amount);
        let credited = safe_add_u128(self.balance_of(to), amount)?;
        self.balances.insert(*to, credited);
        Ok(())
    }

    pub(crate) fn restore_balance(&mut self, account: Address, balance: u128) {
        if balance == 0 {
            self.balances.remove(&account);
        } else {
            self.balances.insert(account, balance);
        }
    }

    pub(crate) fn restore_total_issued(&mut self, total_issued: u128) {
        self.total_issued = total_issued;
    }
}
