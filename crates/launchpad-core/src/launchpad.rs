//! # Launchpad Registry
//!
//! Sequences every operation: verify identity, check rate limits, price on
//! the curve, move reserves, mint or burn, move value, accrue fees, emit.
//!
//! Each mutating call runs inside [`Launchpad::atomically`]. Writes are
//! journaled as they happen, so a failure at any step restores the state
//! and drops the staged events. Fee counters are zeroed before the payout
//! transfer is made.

use std::sync::Arc;

use ethnum::U256;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::LaunchpadConfig;
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::events::{EventLog, EventRecord, LaunchpadEvent};
use crate::fees::{FeeBreakdown, FeeSchedule};
use crate::identity::{ActionKind, IdentityGate, IdentityProof, NullifierPolicy, ProofVerifier};
use crate::journal::Journal;
use crate::math::curve::{
    eth_out, eth_required_for_tokens, reserves_after_buy, reserves_after_sell, spot_price, tokens_out,
};
use crate::math::safe_math::{safe_add_u128, safe_sub_u128};
use crate::rate_limit::{CooldownStatus, PersonKey};
use crate::state::{LaunchpadState, TokenRecord};
use crate::token::{validate_name, validate_symbol, LaunchpadToken};
use crate::types::field::u128_dec;
use crate::types::{Address, TokenHandle};

// ============================================================================
// Receipts And Quotes
// ============================================================================

/// Outcome of a committed purchase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuyReceipt {
    pub token: TokenHandle,
    #[serde(with = "u128_dec")]
    pub token_amount: u128,
    /// Value kept by the registry, fee included
    #[serde(with = "u128_dec")]
    pub eth_spent: u128,
    pub fee: FeeBreakdown,
    /// Excess value returned to the buyer
    #[serde(with = "u128_dec")]
    pub refund: u128,
}

/// Outcome of a committed sale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SellReceipt {
    pub token: TokenHandle,
    #[serde(with = "u128_dec")]
    pub token_amount: u128,
    /// Curve output before the fee
    #[serde(with = "u128_dec")]
    pub eth_out: u128,
    pub fee: FeeBreakdown,
    #[serde(with = "u128_dec")]
    pub eth_received: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuyQuote {
    #[serde(with = "u128_dec")]
    pub token_amount: u128,
    pub fee: FeeBreakdown,
    /// Spot price once the purchase lands
    #[serde(with = "u128_dec")]
    pub price_after: u128,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SellQuote {
    #[serde(with = "u128_dec")]
    pub eth_out: u128,
    pub fee: FeeBreakdown,
    #[serde(with = "u128_dec")]
    pub eth_received: u128,
    #[serde(with = "u128_dec")]
    pub price_after: u128,
}

/// Who is acting, and which nullifier verified for it
#[derive(Debug, Clone)]
struct Personhood {
    key: PersonKey,
    verified: Option<(U256, String)>,
}

/// A purchase priced and ready to settle
#[derive(Debug, Clone, Copy)]
struct BuyFill {
    /// Value kept, fee included
    gross: u128,
    /// Value the caller sent
    sent: u128,
    fee: FeeBreakdown,
    /// Value entering the curve
    net: u128,
    tokens: u128,
}

// ============================================================================
// Launchpad
// ============================================================================

pub struct Launchpad {
    /// Registry account; custody of reserves and fees, minter of every token
    address: Address,
    operator: Address,
    config: LaunchpadConfig,
    fees: FeeSchedule,
    gate: Option<IdentityGate>,
    clock: Arc<dyn Clock>,
    state: LaunchpadState,
    journal: Journal,
    events: EventLog,
}

impl std::fmt::Debug for Launchpad {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Launchpad")
            .field("address", &self.address)
            .field("operator", &self.operator)
            .field("tokens", &self.state.token_index().len())
            .field("gate", &self.gate)
            .finish_non_exhaustive()
    }
}

impl Launchpad {
    /// Registry without identity verification, driven by wall-clock time
    pub fn new(address: Address, operator: Address, config: LaunchpadConfig) -> LaunchpadResult<Self> {
        config.validate()?;
        Ok(Self {
            address,
            operator,
            fees: config.fee_schedule(),
            state: LaunchpadState::new(config.rate_limit_policy()),
            config,
            gate: None,
            clock: Arc::new(SystemClock),
            journal: Journal::new(),
            events: EventLog::new(),
        })
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Gate creations and purchases (and sells, if configured) on proofs
    pub fn with_verifier(mut self, verifier: Arc<dyn ProofVerifier>) -> Self {
        self.gate = Some(IdentityGate::new(verifier, self.config.identity.clone()));
        self
    }

    // ========================================================================
    // Transactions
    // ========================================================================

    /// Run `body` as one all-or-nothing transaction
    fn atomically<T, F>(&mut self, operation: &'static str, body: F) -> LaunchpadResult<T>
    where
        F: FnOnce(&mut Self) -> LaunchpadResult<T>,
    {
        match body(self) {
            Ok(value) => {
                self.journal.commit();
                self.events.commit();
                Ok(value)
            }
            Err(err) => {
                let undone = self.journal.rollback(&mut self.state);
                self.events.discard();
                warn!(operation, error = %err, undone, "operation rolled back");
                Err(err)
            }
        }
    }

    /// Resolve who is acting, verifying and consuming their proof if gated
    fn authorize(
        &mut self,
        caller: &Address,
        kind: ActionKind,
        proof: Option<&IdentityProof>,
    ) -> LaunchpadResult<Personhood> {
        // Unverified nullifiers are caller-chosen, so they never key the limits
        let Some(gate) = self.gate.as_ref() else {
            return Ok(Personhood {
                key: caller.to_u256(),
                verified: None,
            });
        };
        let proof = proof.ok_or_else(|| LaunchpadError::IdentityProofRequired {
            action: gate.action_name(kind).to_string(),
        })?;

        if self.config.nullifier_policy == NullifierPolicy::SingleUse {
            self.state.nullifiers().ensure_unused(&proof.nullifier_hash)?;
        }
        gate.verify(caller, kind, proof)?;
        let action = gate.action_name(kind).to_string();
        debug!(caller = %caller, %kind, nullifier = %proof.nullifier_hash, "identity verified");

        self.state.consume_nullifier(&mut self.journal, proof.nullifier_hash);
        Ok(Personhood {
            key: proof.nullifier_hash,
            verified: Some((proof.nullifier_hash, action)),
        })
    }

    fn emit_verified(&mut self, person: &Personhood) {
        if let Some((nullifier_hash, action)) = &person.verified {
            self.events.emit(LaunchpadEvent::WorldIdVerified {
                nullifier_hash: *nullifier_hash,
                action: action.clone(),
            });
        }
    }

    // ========================================================================
    // Native Currency
    // ========================================================================

    /// Credit newly deposited native currency to `account`
    pub fn deposit(&mut self, account: &Address, amount: u128) -> LaunchpadResult<()> {
        self.atomically("deposit", |lp| {
            lp.state.deposit(&mut lp.journal, account, amount)?;
            debug!(account = %account, amount, "deposit");
            Ok(())
        })
    }

    // ========================================================================
    // Token Creation
    // ========================================================================

    pub fn create_token(
        &mut self,
        caller: &Address,
        name: &str,
        symbol: &str,
        metadata_uri: &str,
        proof: Option<&IdentityProof>,
    ) -> LaunchpadResult<TokenHandle> {
        self.atomically("create_token", |lp| {
            lp.create_token_inner(caller, name, symbol, metadata_uri, proof)
        })
    }

    fn create_token_inner(
        &mut self,
        caller: &Address,
        name: &str,
        symbol: &str,
        metadata_uri: &str,
        proof: Option<&IdentityProof>,
    ) -> LaunchpadResult<TokenHandle> {
        let now = self.clock.now();
        let person = self.authorize(caller, ActionKind::CreateToken, proof)?;
        self.state.limiter().ensure_can_create(&person.key, now)?;
        validate_symbol(symbol, self.config.max_symbol_len)?;
        validate_name(name, self.config.max_name_len)?;

        let token = self.address.derive_child(self.state.nonce());
        let record = TokenRecord {
            token,
            creator: *caller,
            name: name.to_string(),
            symbol: symbol.to_string(),
            metadata_uri: metadata_uri.to_string(),
            virtual_eth_reserves: self.config.initial_virtual_eth,
            virtual_token_reserves: self.config.initial_virtual_tokens,
            real_eth_reserves: 0,
            total_supply: 0,
            creator_fees: 0,
            created_at: now,
        };
        let ledger = LaunchpadToken::new(token, name, symbol, self.address);
        self.state.register_token(&mut self.journal, record, ledger)?;
        self.state.record_creation(&mut self.journal, person.key, now);

        self.events.emit(LaunchpadEvent::TokenCreated {
            creator: *caller,
            token,
            name: name.to_string(),
            symbol: symbol.to_string(),
            metadata_uri: metadata_uri.to_string(),
        });
        self.emit_verified(&person);

        info!(token = %token, creator = %caller, symbol, "token created");
        Ok(token)
    }

    // ========================================================================
    // Purchases
    // ========================================================================

    /// Spend exactly `eth_amount` on `token`
    pub fn buy_tokens(
        &mut self,
        caller: &Address,
        token: &TokenHandle,
        eth_amount: u128,
        proof: Option<&IdentityProof>,
    ) -> LaunchpadResult<BuyReceipt> {
        self.atomically("buy_tokens", |lp| {
            let record = lp.state.record(token)?.clone();
            if eth_amount == 0 {
                return Err(LaunchpadError::ZeroAmount { context: "eth_amount" });
            }
            let person = lp.authorize(caller, ActionKind::BuyToken, proof)?;

            let (fee, net) = lp.fees.deduct(eth_amount)?;
            let tokens = tokens_out(record.virtual_eth_reserves, record.virtual_token_reserves, net)?;
            if tokens == 0 {
                return Err(LaunchpadError::ZeroAmount { context: "tokens_out" });
            }
            let fill = BuyFill { gross: eth_amount, sent: eth_amount, fee, net, tokens };
            lp.settle_buy(caller, &record, &person, fill)
        })
    }

    /// Buy exactly `token_amount`, paying from `eth_sent` and refunding the rest
    pub fn buy_tokens_exact(
        &mut self,
        caller: &Address,
        token: &TokenHandle,
        token_amount: u128,
        eth_sent: u128,
        proof: Option<&IdentityProof>,
    ) -> LaunchpadResult<BuyReceipt> {
        self.atomically("buy_tokens_exact", |lp| {
            let record = lp.state.record(token)?.clone();
            if token_amount == 0 {
                return Err(LaunchpadError::ZeroAmount { context: "token_amount" });
            }
            let person = lp.authorize(caller, ActionKind::BuyToken, proof)?;

            let net_required = eth_required_for_tokens(
                record.virtual_eth_reserves,
                record.virtual_token_reserves,
                token_amount,
            )?;
            let gross = lp.fees.gross_for_net(net_required)?;
            if eth_sent < gross {
                return Err(LaunchpadError::InsufficientEthSent { required: gross, sent: eth_sent });
            }
            let (fee, net) = lp.fees.deduct(gross)?;
            let fill = BuyFill { gross, sent: eth_sent, fee, net, tokens: token_amount };
            lp.settle_buy(caller, &record, &person, fill)
        })
    }

    fn settle_buy(
        &mut self,
        caller: &Address,
        record: &TokenRecord,
        person: &Personhood,
        fill: BuyFill,
    ) -> LaunchpadResult<BuyReceipt> {
        let token = record.token;
        let now = self.clock.now();
        let launch_total = self.state.limiter().check_purchase(
            &person.key,
            &token,
            record.created_at,
            now,
            fill.tokens,
        )?;
        if let Some(total) = launch_total {
            self.state.record_purchase(&mut self.journal, person.key, token, total);
        }

        self.state.transfer_native(&mut self.journal, caller, &self.address, fill.sent)?;
        self.state.update_record(&mut self.journal, &token, |r| {
            let (eth_reserves, token_reserves) =
                reserves_after_buy(r.virtual_eth_reserves, r.virtual_token_reserves, fill.net, fill.tokens)?;
            r.virtual_eth_reserves = eth_reserves;
            r.virtual_token_reserves = token_reserves;
            r.real_eth_reserves = safe_add_u128(r.real_eth_reserves, fill.net)?;
            r.total_supply = safe_add_u128(r.total_supply, fill.tokens)?;
            r.creator_fees = safe_add_u128(r.creator_fees, fill.fee.creator)?;
            Ok(())
        })?;
        self.state.accrue_platform_fees(&mut self.journal, &fill.fee)?;
        self.state.mint(&mut self.journal, &token, &self.address, caller, fill.tokens)?;

        let refund = safe_sub_u128(fill.sent, fill.gross)?;
        if refund > 0 {
            self.state.transfer_native(&mut self.journal, &self.address, caller, refund)?;
        }

        self.events.emit(LaunchpadEvent::TokensBought {
            token,
            buyer: *caller,
            eth_amount: fill.gross,
            token_amount: fill.tokens,
        });
        self.emit_verified(person);

        info!(
            token = %token,
            buyer = %caller,
            eth = fill.gross,
            tokens = fill.tokens,
            fee = fill.fee.total,
            refund,
            "tokens bought"
        );
        Ok(BuyReceipt {
            token,
            token_amount: fill.tokens,
            eth_spent: fill.gross,
            fee: fill.fee,
            refund,
        })
    }

    // ========================================================================
    // Sales
    // ========================================================================

    /// Sell `token_amount` back to the curve; `proof` is only read when sells are gated
    pub fn sell_tokens(
        &mut self,
        caller: &Address,
        token: &TokenHandle,
        token_amount: u128,
        proof: Option<&IdentityProof>,
    ) -> LaunchpadResult<SellReceipt> {
        self.atomically("sell_tokens", |lp| lp.sell_tokens_inner(caller, token, token_amount, proof))
    }

    fn sell_tokens_inner(
        &mut self,
        caller: &Address,
        token: &TokenHandle,
        token_amount: u128,
        proof: Option<&IdentityProof>,
    ) -> LaunchpadResult<SellReceipt> {
        let record = self.state.record(token)?.clone();
        if token_amount == 0 {
            return Err(LaunchpadError::ZeroAmount { context: "token_amount" });
        }
        let person = if self.config.verify_sells {
            Some(self.authorize(caller, ActionKind::SellToken, proof)?)
        } else {
            None
        };

        let available = self.state.ledger(token)?.balance_of(caller);
        if available < token_amount {
            return Err(LaunchpadError::InsufficientTokenBalance {
                account: *caller,
                available,
                required: token_amount,
            });
        }

        let gross = eth_out(record.virtual_eth_reserves, record.virtual_token_reserves, token_amount)?;
        if gross == 0 {
            return Err(LaunchpadError::ZeroAmount { context: "eth_out" });
        }
        if gross > record.real_eth_reserves {
            return Err(LaunchpadError::InsufficientReserves {
                token: *token,
                available: record.real_eth_reserves,
                required: gross,
            });
        }
        let (fee, net) = self.fees.deduct(gross)?;

        self.state.burn(&mut self.journal, token, &self.address, caller, token_amount)?;
        self.state.update_record(&mut self.journal, token, |r| {
            let (eth_reserves, token_reserves) =
                reserves_after_sell(r.virtual_eth_reserves, r.virtual_token_reserves, token_amount, gross)?;
            r.virtual_eth_reserves = eth_reserves;
            r.virtual_token_reserves = token_reserves;
            r.real_eth_reserves = safe_sub_u128(r.real_eth_reserves, gross)?;
            r.total_supply = safe_sub_u128(r.total_supply, token_amount)?;
            r.creator_fees = safe_add_u128(r.creator_fees, fee.creator)?;
            Ok(())
        })?;
        self.state.accrue_platform_fees(&mut self.journal, &fee)?;
        self.state.transfer_native(&mut self.journal, &self.address, caller, net)?;

        self.events.emit(LaunchpadEvent::TokensSold {
            token: *token,
            seller: *caller,
            token_amount,
            eth_amount: net,
        });
        if let Some(person) = &person {
            self.emit_verified(person);
        }

        info!(token = %token, seller = %caller, tokens = token_amount, eth = net, fee = fee.total, "tokens sold");
        Ok(SellReceipt {
            token: *token,
            token_amount,
            eth_out: gross,
            fee,
            eth_received: net,
        })
    }

    // ========================================================================
    // Fee Withdrawal
    // ========================================================================

    pub fn withdraw_creator_fees(&mut self, caller: &Address, token: &TokenHandle) -> LaunchpadResult<u128> {
        self.atomically("withdraw_creator_fees", |lp| {
            let record = lp.state.record(token)?;
            if record.creator != *caller {
                return Err(LaunchpadError::unauthorized(*caller, "withdraw creator fees"));
            }
            let amount = record.creator_fees;
            if amount == 0 {
                return Err(LaunchpadError::NoFeesToWithdraw);
            }

            // Counter first, payout second
            lp.state.update_record(&mut lp.journal, token, |r| {
                r.creator_fees = 0;
                Ok(())
            })?;
            lp.state.transfer_native(&mut lp.journal, &lp.address, caller, amount)?;

            lp.events.emit(LaunchpadEvent::CreatorFeesWithdrawn {
                token: *token,
                creator: *caller,
                amount,
            });
            info!(token = %token, creator = %caller, amount, "creator fees withdrawn");
            Ok(amount)
        })
    }

    pub fn withdraw_platform_fees(&mut self, caller: &Address) -> LaunchpadResult<u128> {
        self.atomically("withdraw_platform_fees", |lp| {
            if *caller != lp.operator {
                return Err(LaunchpadError::unauthorized(*caller, "withdraw platform fees"));
            }
            let amount = lp.state.take_platform_fees(&mut lp.journal)?;
            lp.state.transfer_native(&mut lp.journal, &lp.address, caller, amount)?;

            lp.events.emit(LaunchpadEvent::PlatformFeesWithdrawn {
                operator: *caller,
                amount,
            });
            info!(operator = %caller, amount, "platform fees withdrawn");
            Ok(amount)
        })
    }

    // ========================================================================
    // Token Ledger Passthroughs
    // ========================================================================

    pub fn transfer_tokens(
        &mut self,
        caller: &Address,
        token: &TokenHandle,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        self.atomically("transfer_tokens", |lp| {
            lp.state.transfer_tokens(&mut lp.journal, token, caller, to, amount)
        })
    }

    pub fn approve_tokens(
        &mut self,
        caller: &Address,
        token: &TokenHandle,
        spender: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        self.atomically("approve_tokens", |lp| {
            lp.state.approve_tokens(&mut lp.journal, token, caller, spender, amount)
        })
    }

    pub fn transfer_tokens_from(
        &mut self,
        caller: &Address,
        token: &TokenHandle,
        owner: &Address,
        to: &Address,
        amount: u128,
    ) -> LaunchpadResult<()> {
        self.atomically("transfer_tokens_from", |lp| {
            lp.state.transfer_tokens_from(&mut lp.journal, token, caller, owner, to, amount)
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn operator(&self) -> Address {
        self.operator
    }

    pub fn config(&self) -> &LaunchpadConfig {
        &self.config
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        self.fees
    }

    pub fn now(&self) -> u64 {
        self.clock.now()
    }

    pub fn state(&self) -> &LaunchpadState {
        &self.state
    }

    /// Rate-limit key for `caller`: the proof's nullifier when a verifier is
    /// configured, else the widened address
    pub fn personhood_key(&self, caller: &Address, proof: Option<&IdentityProof>) -> PersonKey {
        match (self.gate.as_ref(), proof) {
            (Some(_), Some(proof)) => proof.nullifier_hash,
            _ => caller.to_u256(),
        }
    }

    pub fn token_record(&self, token: &TokenHandle) -> LaunchpadResult<&TokenRecord> {
        self.state.record(token)
    }

    pub fn token(&self, token: &TokenHandle) -> LaunchpadResult<&LaunchpadToken> {
        self.state.ledger(token)
    }

    pub fn token_balance(&self, token: &TokenHandle, account: &Address) -> LaunchpadResult<u128> {
        Ok(self.state.ledger(token)?.balance_of(account))
    }

    pub fn all_tokens(&self) -> &[TokenHandle] {
        self.state.token_index()
    }

    pub fn token_count(&self) -> usize {
        self.state.token_index().len()
    }

    pub fn is_token(&self, token: &TokenHandle) -> bool {
        self.state.contains(token)
    }

    /// Spot price in wei per whole token
    pub fn token_price(&self, token: &TokenHandle) -> LaunchpadResult<u128> {
        self.state.record(token)?.spot_price()
    }

    pub fn market_cap(&self, token: &TokenHandle) -> LaunchpadResult<u128> {
        self.state.record(token)?.market_cap()
    }

    pub fn creation_cooldown(&self, key: &PersonKey) -> CooldownStatus {
        self.state.limiter().creation_cooldown(key, self.clock.now())
    }

    pub fn remaining_launch_allowance(&self, key: &PersonKey, token: &TokenHandle) -> LaunchpadResult<u128> {
        let record = self.state.record(token)?;
        Ok(self
            .state
            .limiter()
            .remaining_launch_allowance(key, token, record.created_at, self.clock.now()))
    }

    /// Value to send for exactly `token_amount`, fee included
    pub fn eth_required_for_tokens(&self, token: &TokenHandle, token_amount: u128) -> LaunchpadResult<u128> {
        let record = self.state.record(token)?;
        let net = eth_required_for_tokens(
            record.virtual_eth_reserves,
            record.virtual_token_reserves,
            token_amount,
        )?;
        let gross = self.fees.gross_for_net(net)?;
        debug!(token = %token, token_amount, net, gross, "exact purchase quote");
        Ok(gross)
    }

    pub fn quote_buy(&self, token: &TokenHandle, eth_amount: u128) -> LaunchpadResult<BuyQuote> {
        let record = self.state.record(token)?;
        let (fee, net) = self.fees.deduct(eth_amount)?;
        let token_amount = tokens_out(record.virtual_eth_reserves, record.virtual_token_reserves, net)?;
        let (eth_reserves, token_reserves) =
            reserves_after_buy(record.virtual_eth_reserves, record.virtual_token_reserves, net, token_amount)?;
        let quote = BuyQuote {
            token_amount,
            fee,
            price_after: spot_price(eth_reserves, token_reserves)?,
        };
        debug!(token = %token, eth_amount, ?quote, "buy quote");
        Ok(quote)
    }

    pub fn quote_sell(&self, token: &TokenHandle, token_amount: u128) -> LaunchpadResult<SellQuote> {
        let record = self.state.record(token)?;
        let gross = eth_out(record.virtual_eth_reserves, record.virtual_token_reserves, token_amount)?;
        let (fee, net) = self.fees.deduct(gross)?;
        let (eth_reserves, token_reserves) =
            reserves_after_sell(record.virtual_eth_reserves, record.virtual_token_reserves, token_amount, gross)?;
        let quote = SellQuote {
            eth_out: gross,
            fee,
            eth_received: net,
            price_after: spot_price(eth_reserves, token_reserves)?,
        };
        debug!(token = %token, token_amount, ?quote, "sell quote");
        Ok(quote)
    }

    pub fn platform_fees(&self) -> u128 {
        self.state.fees().platform_fees()
    }

    pub fn creator_fees(&self, token: &TokenHandle) -> LaunchpadResult<u128> {
        Ok(self.state.record(token)?.creator_fees)
    }

    /// Every fee charged so far, withdrawn or not
    pub fn lifetime_fees(&self) -> u128 {
        self.state.fees().lifetime_fees()
    }

    pub fn native_balance(&self, account: &Address) -> u128 {
        self.state.bank().balance_of(account)
    }

    /// Native currency held by the registry account
    pub fn custody_balance(&self) -> u128 {
        self.state.bank().balance_of(&self.address)
    }

    /// Curve reserves plus every unwithdrawn fee
    pub fn custody_obligations(&self) -> LaunchpadResult<u128> {
        self.state.custody_obligations()
    }

    pub fn is_nullifier_used(&self, nullifier_hash: &U256) -> bool {
        self.state.nullifiers().is_used(nullifier_hash)
    }

    pub fn events(&self) -> &[EventRecord] {
        self.events.published()
    }

    pub fn events_since(&self, sequence: u64) -> &[EventRecord] {
        self.events.since(sequence)
    }
}
