//! # Launchpad Events
//!
//! Domain events emitted by committed operations. An operation stages its
//! events while it runs; they are numbered and published only if the
//! operation commits, and dropped if it rolls back.

use ethnum::U256;
use serde::{Deserialize, Serialize};

use crate::types::field::{u128_dec, u256_hex};
use crate::types::{Address, TokenHandle};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event")]
pub enum LaunchpadEvent {
    TokenCreated {
        creator: Address,
        token: TokenHandle,
        name: String,
        symbol: String,
        metadata_uri: String,
    },
    TokensBought {
        token: TokenHandle,
        buyer: Address,
        /// Value spent including the fee, excluding any refund
        #[serde(with = "u128_dec")]
        eth_amount: u128,
        #[serde(with = "u128_dec")]
        token_amount: u128,
    },
    TokensSold {
        token: TokenHandle,
        seller: Address,
        #[serde(with = "u128_dec")]
        token_amount: u128,
        /// Value paid out after the fee
        #[serde(with = "u128_dec")]
        eth_amount: u128,
    },
    WorldIdVerified {
        #[serde(with = "u256_hex")]
        nullifier_hash: U256,
        action: String,
    },
    CreatorFeesWithdrawn {
        token: TokenHandle,
        creator: Address,
        #[serde(with = "u128_dec")]
        amount: u128,
    },
    PlatformFeesWithdrawn {
        operator: Address,
        #[serde(with = "u128_dec")]
        amount: u128,
    },
}

impl LaunchpadEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::TokenCreated { .. } => "TokenCreated",
            Self::TokensBought { .. } => "TokensBought",
            Self::TokensSold { .. } => "TokensSold",
            Self::WorldIdVerified { .. } => "WorldIdVerified",
            Self::CreatorFeesWithdrawn { .. } => "CreatorFeesWithdrawn",
            Self::PlatformFeesWithdrawn { .. } => "PlatformFeesWithdrawn",
        }
    }

    /// Token the event concerns, if any
    pub fn token(&self) -> Option<TokenHandle> {
        match self {
            Self::TokenCreated { token, .. }
            | Self::TokensBought { token, .. }
            | Self::TokensSold { token, .. }
            | Self::CreatorFeesWithdrawn { token, .. } => Some(*token),
            Self::WorldIdVerified { .. } | Self::PlatformFeesWithdrawn { .. } => None,
        }
    }
}

/// A published event and its position in the log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventRecord {
    pub sequence: u64,
    #[serde(flatten)]
    pub event: LaunchpadEvent,
}

#[derive(Debug, Clone, Default)]
pub struct EventLog {
    next_sequence: u64,
    pending: Vec<LaunchpadEvent>,
    published: Vec<EventRecord>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage an event for the running operation
    pub fn emit(&mut self, event: LaunchpadEvent) {
        self.pending.push(event);
    }

    /// Publish staged events, returning how many were published
    pub fn commit(&mut self) -> usize {
        let count = self.pending.len();
        for event in self.pending.drain(..) {
            self.published.push(EventRecord {
                sequence: self.next_sequence,
                event,
            });
            self.next_sequence += 1;
        }
        count
    }

    /// Drop staged events
    pub fn discard(&mut self) {
        self.pending.clear();
    }

    pub fn pending(&self) -> &[LaunchpadEvent] {
        &self.pending
    }

    pub fn published(&self) -> &[EventRecord] {
        &self.published
    }

    /// Published events with `sequence >= from`
    pub fn since(&self, from: u64) -> &[EventRecord] {
        let start = self.published.partition_point(|record| record.sequence < from);
        &self.published[start..]
    }
}
