//! # Launchpad Constants
//!
//! Fundamental constants for the launchpad including:
//! - Fixed-point scale of the native currency and launched tokens
//! - Virtual reserve seeds of every new bonding curve
//! - Fee structure parameters
//! - Rate-limit windows and caps
//! - Identity action identifiers

// ============================================================================
// Mathematical Constants
// ============================================================================

/// Decimal places of the native currency and of every launched token
pub const TOKEN_DECIMALS: u8 = 18;

/// One whole unit (10^18 base units)
pub const PRECISION: u128 = 1_000_000_000_000_000_000;

/// Basis points denominator (10,000 = 100%)
pub const BPS_DENOMINATOR: u128 = 10_000;

// ============================================================================
// Bonding Curve Seeds
// ============================================================================

/// Virtual native reserves seeded into every new curve (200,000 ETH)
pub const INITIAL_VIRTUAL_ETH_RESERVES: u128 = 200_000 * PRECISION;

/// Virtual token reserves seeded into every new curve (1,000,000,000 tokens)
pub const INITIAL_VIRTUAL_TOKEN_RESERVES: u128 = 1_000_000_000 * PRECISION;

// ============================================================================
// Fee Structure Constants
// ============================================================================

/// Trading fee (1%)
pub const DEFAULT_FEE_BPS: u16 = 100;

/// Creator share of the trading fee (50%), remainder goes to the platform
pub const DEFAULT_CREATOR_FEE_SHARE_BPS: u16 = 5_000;

// ============================================================================
// Rate Limit Constants (in seconds)
// ============================================================================

/// One day
pub const SECONDS_PER_DAY: u64 = 86_400;

/// Minimum time between two creations by the same person
pub const DEFAULT_CREATION_COOLDOWN_SECS: u64 = SECONDS_PER_DAY;

/// Length of the anti-whale launch window after a token is created
pub const DEFAULT_LAUNCH_WINDOW_SECS: u64 = SECONDS_PER_DAY;

/// Units one person may buy of one token inside its launch window (100 tokens)
pub const DEFAULT_LAUNCH_WINDOW_CAP: u128 = 100 * PRECISION;

// ============================================================================
// Validation Constants
// ============================================================================

/// Maximum symbol length in characters
pub const DEFAULT_MAX_SYMBOL_LEN: usize = 10;

/// Maximum name length in characters
pub const DEFAULT_MAX_NAME_LEN: usize = 50;

// ============================================================================
// Identity Constants
// ============================================================================

/// Merkle group of orb-verified identities
pub const ORB_GROUP_ID: u8 = 1;

/// Action identifier for token creation proofs
pub const CREATE_TOKEN_ACTION: &str = "create-token";

/// Action identifier for purchase proofs
pub const BUY_TOKEN_ACTION: &str = "buy-token";

/// Action identifier for sale proofs (only used when sells are gated)
pub const SELL_TOKEN_ACTION: &str = "sell-token";

/// Number of field elements in a Groth16 proof
pub const PROOF_WORDS: usize = 8;

// ============================================================================
// Helper Functions
// ============================================================================

/// Convert whole units into base units
pub const fn units(whole: u128) -> u128 {
    whole * PRECISION
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constants_validity() {
        assert_eq!(PRECISION, 10u128.pow(TOKEN_DECIMALS as u32));
        assert!(DEFAULT_FEE_BPS as u128 <= BPS_DENOMINATOR);
        assert!(DEFAULT_CREATOR_FEE_SHARE_BPS as u128 <= BPS_DENOMINATOR);
        assert_eq!(INITIAL_VIRTUAL_ETH_RESERVES, 200_000_000_000_000_000_000_000);
    }

    #[test]
    fn test_units_helper() {
        assert_eq!(units(100), DEFAULT_LAUNCH_WINDOW_CAP);
        assert_eq!(units(0), 0);
    }

    #[test]
    fn test_actions_are_distinct() {
        assert_ne!(CREATE_TOKEN_ACTION, BUY_TOKEN_ACTION);
        assert_ne!(BUY_TOKEN_ACTION, SELL_TOKEN_ACTION);
    }
}
