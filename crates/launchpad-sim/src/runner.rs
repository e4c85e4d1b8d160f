//! Drives a [`Launchpad`] through a scenario on a manual clock.

use std::collections::BTreeMap;
use std::sync::Arc;

use launchpad_core::types::field::u128_dec;
use launchpad_core::{
    AcceptAllVerifier, Address, BuyReceipt, EventRecord, IdentityProof, Launchpad, LaunchpadConfig,
    LaunchpadError, ManualClock, SellReceipt, TokenHandle, U256,
};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{SimError, SimResult};
use crate::scenario::{Action, Scenario, Step};

/// Base of the addresses handed out to named accounts
const ACCOUNT_BASE: u64 = 0x1000;

/// Maps scenario account names to addresses
#[derive(Debug, Clone)]
pub struct AccountBook {
    registry: Address,
    operator: Address,
    named: BTreeMap<String, Address>,
}

impl AccountBook {
    pub fn new(registry: Address, operator: Address) -> Self {
        Self {
            registry,
            operator,
            named: BTreeMap::new(),
        }
    }

    /// Address for `name`, allocating one on first use
    pub fn resolve(&mut self, name: &str) -> Address {
        match name {
            "registry" => self.registry,
            "operator" => self.operator,
            _ => {
                let next = ACCOUNT_BASE + self.named.len() as u64;
                *self
                    .named
                    .entry(name.to_string())
                    .or_insert_with(|| Address::from_low_u64_be(next))
            }
        }
    }

    pub fn named(&self) -> &BTreeMap<String, Address> {
        &self.named
    }
}

/// What a successful step produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    Funded {
        account: Address,
        #[serde(with = "u128_dec")]
        amount: u128,
    },
    Advanced {
        now: u64,
    },
    Created {
        token: TokenHandle,
    },
    Bought(BuyReceipt),
    Sold(SellReceipt),
    Transferred,
    Withdrawn {
        #[serde(with = "u128_dec")]
        amount: u128,
    },
}

/// A step that did not go as the scenario said it would
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepFailure {
    pub index: usize,
    pub action: &'static str,
    pub error: String,
}

/// End-of-run view of one token
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenSummary {
    pub label: String,
    pub token: TokenHandle,
    pub symbol: String,
    pub creator: Address,
    #[serde(with = "u128_dec")]
    pub price: u128,
    #[serde(with = "u128_dec")]
    pub market_cap: u128,
    #[serde(with = "u128_dec")]
    pub total_supply: u128,
    #[serde(with = "u128_dec")]
    pub real_eth_reserves: u128,
    #[serde(with = "u128_dec")]
    pub creator_fees: u128,
    pub holders: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub scenario: String,
    pub steps: usize,
    /// Steps that failed exactly as the scenario expected
    pub expected_failures: usize,
    pub failures: Vec<StepFailure>,
    pub tokens: Vec<TokenSummary>,
    #[serde(with = "u128_dec")]
    pub platform_fees: u128,
    #[serde(with = "u128_dec")]
    pub lifetime_fees: u128,
    pub accounts: BTreeMap<String, Address>,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Scenario runner
pub struct Runner {
    name: String,
    launchpad: Launchpad,
    clock: ManualClock,
    accounts: AccountBook,
    /// Token labels in creation order
    tokens: Vec<(String, TokenHandle)>,
    fail_fast: bool,
}

impl Runner {
    /// Registry account used by every simulation
    pub const REGISTRY: Address = Address([0x1a; 20]);

    /// Operator account used by every simulation
    pub const OPERATOR: Address = Address([0x0f; 20]);

    /// Build a runner for `scenario`; `config` overrides the scenario's own
    pub fn new(scenario: &Scenario, config: Option<LaunchpadConfig>, fail_fast: bool) -> SimResult<Self> {
        let config = config.or_else(|| scenario.config.clone()).unwrap_or_default();
        let clock = ManualClock::new(scenario.start_time);
        let mut launchpad =
            Launchpad::new(Self::REGISTRY, Self::OPERATOR, config)?.with_clock(Arc::new(clock.clone()));
        if scenario.gated {
            launchpad = launchpad.with_verifier(Arc::new(AcceptAllVerifier));
        }

        info!(
            scenario = %scenario.name,
            gated = scenario.gated,
            start_time = scenario.start_time,
            "runner initialized"
        );
        Ok(Self {
            name: scenario.name.clone(),
            launchpad,
            clock,
            accounts: AccountBook::new(Self::REGISTRY, Self::OPERATOR),
            tokens: Vec::new(),
            fail_fast,
        })
    }

    pub fn launchpad(&self) -> &Launchpad {
        &self.launchpad
    }

    pub fn events(&self) -> &[EventRecord] {
        self.launchpad.events()
    }

    pub fn token(&self, label: &str) -> SimResult<TokenHandle> {
        self.tokens
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, token)| *token)
            .ok_or_else(|| SimError::UnknownToken(label.to_string()))
    }

    /// Run every step, then check custody
    pub fn run(&mut self, steps: &[Step]) -> SimResult<RunReport> {
        let mut failures = Vec::new();
        let mut expected_failures = 0;

        for (index, step) in steps.iter().enumerate() {
            let action = step.action.name();
            let result = self.execute(&step.action)?;

            let failure = match (result, step.expect_error.as_deref()) {
                (Ok(outcome), None) => {
                    debug!(index, action, ?outcome, "step completed");
                    None
                }
                (Err(err), Some(expected)) if err.kind() == expected => {
                    debug!(index, action, error = %err, "step failed as expected");
                    expected_failures += 1;
                    None
                }
                (Err(err), None) => Some(SimError::StepFailed { index, action, source: err }),
                (Err(err), Some(expected)) => Some(SimError::WrongError {
                    index,
                    action,
                    expected: expected.to_string(),
                    actual: err.kind().to_string(),
                }),
                (Ok(_), Some(expected)) => Some(SimError::UnexpectedSuccess {
                    index,
                    action,
                    expected: expected.to_string(),
                }),
            };

            if let Some(err) = failure {
                if self.fail_fast {
                    return Err(err);
                }
                warn!(index, action, error = %err, "step did not go as scripted");
                failures.push(StepFailure { index, action, error: err.to_string() });
            }
        }

        self.check_custody()?;
        let report = RunReport {
            scenario: self.name.clone(),
            steps: steps.len(),
            expected_failures,
            failures,
            tokens: self.summaries()?,
            platform_fees: self.launchpad.platform_fees(),
            lifetime_fees: self.launchpad.lifetime_fees(),
            accounts: self.accounts.named().clone(),
        };
        info!(
            scenario = %report.scenario,
            steps = report.steps,
            failures = report.failures.len(),
            tokens = report.tokens.len(),
            "scenario finished"
        );
        Ok(report)
    }

    /// Apply one action; the inner result is the registry's verdict
    fn execute(&mut self, action: &Action) -> SimResult<Result<StepOutcome, LaunchpadError>> {
        let outcome = match action {
            Action::Fund { account, amount } => {
                let account = self.accounts.resolve(account);
                self.launchpad
                    .deposit(&account, *amount)
                    .map(|()| StepOutcome::Funded { account, amount: *amount })
            }
            Action::Advance { secs } => Ok(StepOutcome::Advanced { now: self.clock.advance(*secs) }),
            Action::Create { account, name, symbol, metadata_uri, label, nullifier } => {
                let caller = self.accounts.resolve(account);
                let proof = nullifier.map(proof);
                let created = self
                    .launchpad
                    .create_token(&caller, name, symbol, metadata_uri, proof.as_ref());
                if let Ok(token) = &created {
                    let label = label.clone().unwrap_or_else(|| symbol.clone());
                    self.tokens.push((label, *token));
                }
                created.map(|token| StepOutcome::Created { token })
            }
            Action::Buy { account, token, amount, nullifier } => {
                let caller = self.accounts.resolve(account);
                let token = self.token(token)?;
                let proof = nullifier.map(proof);
                self.launchpad
                    .buy_tokens(&caller, &token, *amount, proof.as_ref())
                    .map(StepOutcome::Bought)
            }
            Action::BuyExact { account, token, tokens, max_eth, nullifier } => {
                let caller = self.accounts.resolve(account);
                let token = self.token(token)?;
                let proof = nullifier.map(proof);
                self.launchpad
                    .buy_tokens_exact(&caller, &token, *tokens, *max_eth, proof.as_ref())
                    .map(StepOutcome::Bought)
            }
            Action::Sell { account, token, tokens, nullifier } => {
                let caller = self.accounts.resolve(account);
                let token = self.token(token)?;
                let amount = match tokens {
                    Some(amount) => *amount,
                    None => self.launchpad.token_balance(&token, &caller)?,
                };
                let proof = nullifier.map(proof);
                self.launchpad
                    .sell_tokens(&caller, &token, amount, proof.as_ref())
                    .map(StepOutcome::Sold)
            }
            Action::Transfer { from, to, token, tokens } => {
                let from = self.accounts.resolve(from);
                let to = self.accounts.resolve(to);
                let token = self.token(token)?;
                self.launchpad
                    .transfer_tokens(&from, &token, &to, *tokens)
                    .map(|()| StepOutcome::Transferred)
            }
            Action::WithdrawCreatorFees { account, token } => {
                let caller = self.accounts.resolve(account);
                let token = self.token(token)?;
                self.launchpad
                    .withdraw_creator_fees(&caller, &token)
                    .map(|amount| StepOutcome::Withdrawn { amount })
            }
            Action::WithdrawPlatformFees { account } => {
                let caller = self.accounts.resolve(account);
                self.launchpad
                    .withdraw_platform_fees(&caller)
                    .map(|amount| StepOutcome::Withdrawn { amount })
            }
        };
        Ok(outcome)
    }

    fn check_custody(&self) -> SimResult<()> {
        let held = self.launchpad.custody_balance();
        let owed = self.launchpad.custody_obligations()?;
        if held != owed {
            return Err(SimError::CustodyMismatch { held, owed });
        }
        Ok(())
    }

    fn summaries(&self) -> SimResult<Vec<TokenSummary>> {
        self.tokens
            .iter()
            .map(|(label, token)| {
                let record = self.launchpad.token_record(token)?;
                Ok(TokenSummary {
                    label: label.clone(),
                    token: *token,
                    symbol: record.symbol.clone(),
                    creator: record.creator,
                    price: record.spot_price()?,
                    market_cap: record.market_cap()?,
                    total_supply: record.total_supply,
                    real_eth_reserves: record.real_eth_reserves,
                    creator_fees: record.creator_fees,
                    holders: self.launchpad.token(token)?.holder_count(),
                })
            })
            .collect()
    }
}

fn proof(nullifier: u64) -> IdentityProof {
    IdentityProof::with_nullifier(U256::new(nullifier as u128))
}
