//! # Launchpad Error Types
//!
//! Every failure aborts the whole operation and rolls back any state it
//! touched. Variants carry the offending parameters so callers can report
//! them without re-deriving context.

use ethnum::U256;
use thiserror::Error;

use crate::types::Address;

/// Errors raised by the launchpad engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LaunchpadError {
    // ========================================================================
    // Identity Errors
    // ========================================================================

    #[error("Identity verification failed for nullifier {nullifier_hash:#x} (action {action}): {reason}")]
    IdentityVerificationFailed {
        nullifier_hash: U256,
        action: String,
        reason: String,
    },

    #[error("Identity proof required for action {action}")]
    IdentityProofRequired { action: String },

    #[error("Nullifier {nullifier_hash:#x} has already been used")]
    NullifierAlreadyUsed { nullifier_hash: U256 },

    // ========================================================================
    // Rate Limit Errors
    // ========================================================================

    #[error("Token creation cooldown not met: next creation allowed at {next_allowed_at} (now {now})")]
    TokenCreationCooldownNotMet { next_allowed_at: u64, now: u64 },

    #[error("Invalid mint amount {requested} for token {token}: launch window allows {remaining} more")]
    InvalidMintAmount {
        token: Address,
        requested: u128,
        remaining: u128,
    },

    // ========================================================================
    // Registry Errors
    // ========================================================================

    #[error("Token {token} does not exist")]
    TokenNotFound { token: Address },

    #[error("Invalid symbol {symbol:?}: length must be between 1 and {max_len}")]
    InvalidSymbol { symbol: String, max_len: usize },

    #[error("Invalid name {name:?}: length must be between 1 and {max_len}")]
    InvalidName { name: String, max_len: usize },

    #[error("Amount must be greater than zero ({context})")]
    ZeroAmount { context: &'static str },

    // ========================================================================
    // Balance Errors
    // ========================================================================

    #[error("Insufficient ETH sent: required {required}, sent {sent}")]
    InsufficientEthSent { required: u128, sent: u128 },

    #[error("Insufficient token balance for {account}: has {available}, needs {required}")]
    InsufficientTokenBalance {
        account: Address,
        available: u128,
        required: u128,
    },

    #[error("Insufficient allowance for {spender} on {owner}: has {available}, needs {required}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        available: u128,
        required: u128,
    },

    #[error("Insufficient funds in {account}: has {available}, needs {required}")]
    InsufficientFunds {
        account: Address,
        available: u128,
        required: u128,
    },

    #[error("Insufficient curve reserves for token {token}: holds {available}, needs {required}")]
    InsufficientReserves {
        token: Address,
        available: u128,
        required: u128,
    },

    // ========================================================================
    // Authorization Errors
    // ========================================================================

    #[error("Unauthorized: {caller} cannot {action}")]
    Unauthorized { caller: Address, action: &'static str },

    #[error("No fees to withdraw")]
    NoFeesToWithdraw,

    // ========================================================================
    // Math Errors
    // ========================================================================

    #[error("Arithmetic fault in {operation}")]
    ArithmeticFault { operation: &'static str },

    // ========================================================================
    // Configuration Errors
    // ========================================================================

    #[error("Invalid configuration for '{field}': got {value}, expected {expected}")]
    InvalidConfig {
        field: String,
        value: String,
        expected: String,
    },
}

/// Result type using launchpad errors
pub type LaunchpadResult<T> = Result<T, LaunchpadError>;

// Helper functions for creating specific errors
impl LaunchpadError {
    /// Create an arithmetic fault for the named operation
    pub fn arithmetic(operation: &'static str) -> Self {
        Self::ArithmeticFault { operation }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(field: &str, value: &str, expected: &str) -> Self {
        Self::InvalidConfig {
            field: field.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }

    /// Create an unauthorized error
    pub fn unauthorized(caller: Address, action: &'static str) -> Self {
        Self::Unauthorized { caller, action }
    }

    /// Short machine-readable kind, matching the error taxonomy names
    pub fn kind(&self) -> &'static str {
        match self {
            Self::IdentityVerificationFailed { .. } => "IdentityVerificationFailed",
            Self::IdentityProofRequired { .. } => "IdentityProofRequired",
            Self::NullifierAlreadyUsed { .. } => "NullifierAlreadyUsed",
            Self::TokenCreationCooldownNotMet { .. } => "TokenCreationCooldownNotMet",
            Self::InvalidMintAmount { .. } => "InvalidMintAmount",
            Self::TokenNotFound { .. } => "TokenNotFound",
            Self::InvalidSymbol { .. } => "InvalidSymbol",
            Self::InvalidName { .. } => "InvalidName",
            Self::ZeroAmount { .. } => "ZeroAmount",
            Self::InsufficientEthSent { .. } => "InsufficientEthSent",
            Self::InsufficientTokenBalance { .. } => "InsufficientTokenBalance",
            Self::InsufficientAllowance { .. } => "InsufficientAllowance",
            Self::InsufficientFunds { .. } => "InsufficientFunds",
            Self::InsufficientReserves { .. } => "InsufficientReserves",
            Self::Unauthorized { .. } => "Unauthorized",
            Self::NoFeesToWithdraw => "NoFeesToWithdraw",
            Self::ArithmeticFault { .. } => "ArithmeticFault",
            Self::InvalidConfig { .. } => "InvalidConfig",
        }
    }
}
