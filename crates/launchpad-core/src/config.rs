//! # Launchpad Configuration
//!
//! Every tunable of the registry, loadable from TOML. Omitted keys take the
//! defaults from [`crate::constants`].
//!
//! ```toml
//! fee_bps = 100
//! creator_fee_share_bps = 5000
//! launch_window_cap = "100000000000000000000"
//! verify_sells = false
//! nullifier_policy = "single_use"
//!
//! [identity]
//! app_id = "app_launchpad"
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::*;
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::fees::FeeSchedule;
use crate::identity::{IdentityConfig, NullifierPolicy};
use crate::rate_limit::RateLimitPolicy;
use crate::types::field::u128_dec;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LaunchpadConfig {
    /// Trading fee in basis points
    pub fee_bps: u16,

    /// Creator share of each fee in basis points
    pub creator_fee_share_bps: u16,

    /// Virtual native reserves seeded into each new curve (wei)
    #[serde(with = "u128_dec")]
    pub initial_virtual_eth: u128,

    /// Virtual token reserves seeded into each new curve (base units)
    #[serde(with = "u128_dec")]
    pub initial_virtual_tokens: u128,

    pub creation_cooldown_secs: u64,

    pub launch_window_secs: u64,

    /// Units one person may buy of one token inside its launch window
    #[serde(with = "u128_dec")]
    pub launch_window_cap: u128,

    pub max_symbol_len: usize,

    /// Name bound; `None` accepts any non-empty name
    pub max_name_len: Option<usize>,

    /// Require a sell-action proof on sells
    pub verify_sells: bool,

    pub nullifier_policy: NullifierPolicy,

    pub identity: IdentityConfig,
}

impl Default for LaunchpadConfig {
    fn default() -> Self {
        Self {
            fee_bps: DEFAULT_FEE_BPS,
            creator_fee_share_bps: DEFAULT_CREATOR_FEE_SHARE_BPS,
            initial_virtual_eth: INITIAL_VIRTUAL_ETH_RESERVES,
            initial_virtual_tokens: INITIAL_VIRTUAL_TOKEN_RESERVES,
            creation_cooldown_secs: DEFAULT_CREATION_COOLDOWN_SECS,
            launch_window_secs: DEFAULT_LAUNCH_WINDOW_SECS,
            launch_window_cap: DEFAULT_LAUNCH_WINDOW_CAP,
            max_symbol_len: DEFAULT_MAX_SYMBOL_LEN,
            max_name_len: Some(DEFAULT_MAX_NAME_LEN),
            verify_sells: false,
            nullifier_policy: NullifierPolicy::SingleUse,
            identity: IdentityConfig::default(),
        }
    }
}

impl LaunchpadConfig {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> LaunchpadResult<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            LaunchpadError::invalid_config("path", &path.display().to_string(), &format!("a readable file ({})", e))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parse and validate TOML text
    pub fn from_toml_str(content: &str) -> LaunchpadResult<Self> {
        let config: LaunchpadConfig = toml::from_str(content).map_err(|e| {
            LaunchpadError::invalid_config("toml", e.message(), "a valid launchpad configuration")
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> LaunchpadResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| LaunchpadError::invalid_config("toml", &e.to_string(), "a serializable configuration"))
    }

    /// Validate configuration
    pub fn validate(&self) -> LaunchpadResult<()> {
        self.fee_schedule().validate()?;

        if self.initial_virtual_eth == 0 {
            return Err(LaunchpadError::invalid_config("initial_virtual_eth", "0", "greater than 0"));
        }

        if self.initial_virtual_tokens == 0 {
            return Err(LaunchpadError::invalid_config("initial_virtual_tokens", "0", "greater than 0"));
        }

        if self.creation_cooldown_secs == 0 {
            return Err(LaunchpadError::invalid_config("creation_cooldown_secs", "0", "greater than 0"));
        }

        if self.launch_window_secs == 0 {
            return Err(LaunchpadError::invalid_config("launch_window_secs", "0", "greater than 0"));
        }

        if self.launch_window_cap == 0 {
            return Err(LaunchpadError::invalid_config("launch_window_cap", "0", "greater than 0"));
        }

        if self.max_symbol_len == 0 {
            return Err(LaunchpadError::invalid_config("max_symbol_len", "0", "greater than 0"));
        }

        if self.max_name_len == Some(0) {
            return Err(LaunchpadError::invalid_config("max_name_len", "0", "greater than 0 or omitted"));
        }

        let identity = &self.identity;
        if identity.app_id.is_empty() {
            return Err(LaunchpadError::invalid_config("identity.app_id", "empty", "non-empty string"));
        }
        let actions = [&identity.create_action, &identity.buy_action, &identity.sell_action];
        if actions.iter().any(|action| action.is_empty()) {
            return Err(LaunchpadError::invalid_config("identity actions", "empty", "non-empty strings"));
        }
        if actions[0] == actions[1] || actions[0] == actions[2] || actions[1] == actions[2] {
            return Err(LaunchpadError::invalid_config(
                "identity actions",
                &format!("{:?}", actions),
                "distinct action identifiers",
            ));
        }

        Ok(())
    }

    pub fn fee_schedule(&self) -> FeeSchedule {
        FeeSchedule {
            fee_bps: self.fee_bps,
            creator_share_bps: self.creator_fee_share_bps,
        }
    }

    pub fn rate_limit_policy(&self) -> RateLimitPolicy {
        RateLimitPolicy {
            creation_cooldown_secs: self.creation_cooldown_secs,
            launch_window_secs: self.launch_window_secs,
            launch_window_cap: self.launch_window_cap,
        }
    }
}
