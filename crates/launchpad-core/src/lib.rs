//! # Launchpad Core - Personhood-Gated Token Launchpad
//!
//! A token factory and automated market maker in one registry. Any verified
//! person may launch a fungible token, which then trades against the native
//! currency on a constant-product bonding curve over virtual reserves.
//!
//! - `math`: curve pricing and overflow-checked arithmetic
//! - `token`: per-token balance ledgers, minted only by the registry
//! - `identity`: proof-of-personhood adapter and nullifier bookkeeping
//! - `rate_limit`: creation cooldowns and launch-window purchase caps
//! - `fees`: fee schedule and platform fee counter
//! - `launchpad`: the registry that sequences every operation atomically

pub mod bank;
pub mod clock;
pub mod config;
pub mod constants;
pub mod errors;
pub mod events;
pub mod fees;
pub mod identity;
pub mod journal;
pub mod launchpad;
pub mod math;
pub mod rate_limit;
pub mod state;
pub mod token;
pub mod types;

// Re-export commonly used items
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::LaunchpadConfig;
pub use constants::*;
pub use errors::{LaunchpadError, LaunchpadResult};
pub use events::{EventRecord, LaunchpadEvent};
pub use fees::{FeeBreakdown, FeeSchedule};
pub use identity::{
    AcceptAllVerifier, ActionKind, IdentityConfig, IdentityProof, NullifierPolicy, ProofVerifier,
    RejectingVerifier, VerifierError,
};
pub use launchpad::{BuyQuote, BuyReceipt, Launchpad, SellQuote, SellReceipt};
pub use rate_limit::{CooldownStatus, PersonKey};
pub use state::TokenRecord;
pub use token::LaunchpadToken;
pub use types::*;
