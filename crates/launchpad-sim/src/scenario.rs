//! Scenario files: a starting configuration plus an ordered list of steps.
//!
//! Accounts and tokens are referred to by name. `operator` and `registry`
//! are reserved account names; any other name gets a fresh address on first
//! use. Tokens are named by the `label` given when they are created, or by
//! their symbol when no label is given.
//!
//! ```json
//! {
//!   "name": "launch-and-trade",
//!   "steps": [
//!     { "action": "fund", "account": "alice", "amount": "1000000000000000000" },
//!     { "action": "create", "account": "alice", "name": "Alpha", "symbol": "ALPHA" },
//!     { "action": "buy", "account": "alice", "token": "ALPHA", "amount": "10000000000000000" },
//!     { "action": "create", "account": "alice", "name": "Beta", "symbol": "BETA",
//!       "expect_error": "TokenCreationCooldownNotMet" }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use launchpad_core::types::field::u128_dec;
use launchpad_core::LaunchpadConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SimError, SimResult};

/// 2023-11-14T22:13:20Z
pub const DEFAULT_START_TIME: u64 = 1_700_000_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub name: String,

    /// Unix time of the first step
    #[serde(default = "default_start_time")]
    pub start_time: u64,

    /// Require identity proofs (every proof verifies)
    #[serde(default)]
    pub gated: bool,

    /// Registry configuration; defaults when omitted
    #[serde(default)]
    pub config: Option<LaunchpadConfig>,

    pub steps: Vec<Step>,
}

fn default_start_time() -> u64 {
    DEFAULT_START_TIME
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Step {
    #[serde(flatten)]
    pub action: Action,

    /// Error kind this step must fail with
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expect_error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Action {
    Fund {
        account: String,
        #[serde(with = "u128_dec")]
        amount: u128,
    },
    Advance {
        secs: u64,
    },
    Create {
        account: String,
        name: String,
        symbol: String,
        #[serde(default)]
        metadata_uri: String,
        #[serde(default)]
        label: Option<String>,
        #[serde(default)]
        nullifier: Option<u64>,
    },
    Buy {
        account: String,
        token: String,
        #[serde(with = "u128_dec")]
        amount: u128,
        #[serde(default)]
        nullifier: Option<u64>,
    },
    BuyExact {
        account: String,
        token: String,
        #[serde(with = "u128_dec")]
        tokens: u128,
        #[serde(with = "u128_dec")]
        max_eth: u128,
        #[serde(default)]
        nullifier: Option<u64>,
    },
    Sell {
        account: String,
        token: String,
        /// Whole balance when omitted
        #[serde(default, with = "opt_u128_dec")]
        tokens: Option<u128>,
        #[serde(default)]
        nullifier: Option<u64>,
    },
    Transfer {
        from: String,
        to: String,
        token: String,
        #[serde(with = "u128_dec")]
        tokens: u128,
    },
    WithdrawCreatorFees {
        account: String,
        token: String,
    },
    WithdrawPlatformFees {
        account: String,
    },
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Fund { .. } => "fund",
            Self::Advance { .. } => "advance",
            Self::Create { .. } => "create",
            Self::Buy { .. } => "buy",
            Self::BuyExact { .. } => "buy_exact",
            Self::Sell { .. } => "sell",
            Self::Transfer { .. } => "transfer",
            Self::WithdrawCreatorFees { .. } => "withdraw_creator_fees",
            Self::WithdrawPlatformFees { .. } => "withdraw_platform_fees",
        }
    }
}

impl Scenario {
    /// Load a scenario from a JSON file
    pub fn load(path: impl AsRef<Path>) -> SimResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> SimResult<Self> {
        let scenario: Scenario = serde_json::from_str(content)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reject scenarios that could never run cleanly
    pub fn validate(&self) -> SimResult<()> {
        if self.steps.is_empty() {
            return Err(SimError::InvalidScenario(format!("'{}' has no steps", self.name)));
        }

        if let Some(config) = &self.config {
            config.validate()?;
        }

        let mut labels = Vec::new();
        for (index, step) in self.steps.iter().enumerate() {
            if let Action::Create { label, symbol, .. } = &step.action {
                // Creations expected to fail never register their label
                if step.expect_error.is_some() {
                    continue;
                }
                let label = label.as_deref().unwrap_or(symbol);
                if labels.contains(&label) {
                    return Err(SimError::InvalidScenario(format!(
                        "step {} reuses token label '{}'",
                        index, label
                    )));
                }
                labels.push(label);
            }
        }
        Ok(())
    }
}

/// `u128_dec` for optional amounts
mod opt_u128_dec {
    use super::*;
    use serde::{Deserializer, Serializer};

    #[derive(Deserialize)]
    struct Amount(#[serde(with = "u128_dec")] u128);

    pub fn serialize<S: Serializer>(value: &Option<u128>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(amount) => u128_dec::serialize(amount, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u128>, D::Error> {
        Ok(Option::<Amount>::deserialize(deserializer)?.map(|Amount(amount)| amount))
    }
}
