//! # Mathematical Functions
//!
//! Pure, overflow-checked arithmetic for bonding-curve pricing.

pub mod curve;
pub mod safe_math;

// Re-export commonly used functions
pub use curve::*;
pub use safe_math::*;
