//! # Core Type Definitions
//!
//! Primitive identifiers shared by every launchpad component.

pub mod address;
pub mod field;

// Re-export all types
pub use address::*;
pub use field::parse_u256;

/// 256-bit unsigned integer used for field elements and curve intermediates
pub use ethnum::U256;
