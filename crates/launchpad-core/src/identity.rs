//! # Identity Gate
//!
//! Adapter between the registry and an external proof-of-personhood
//! verifier (World ID style).
//!
//! The registry speaks in terms of `(root, nullifier, action, proof)`. The
//! verifier wants field elements, so the gate derives:
//! - `signal_hash = hash_to_field(caller)`
//! - `external_nullifier = hash_to_field(hash_to_field(app_id) || action)`
//!
//! with `hash_to_field(x) = keccak256(x) >> 8`. Every action gets its own
//! external nullifier, so a proof minted for one action never verifies for
//! another.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use ethnum::U256;
use serde::{Deserialize, Serialize};
use sha3::{Digest, Keccak256};
use thiserror::Error;

use crate::constants::{
    BUY_TOKEN_ACTION, CREATE_TOKEN_ACTION, ORB_GROUP_ID, PROOF_WORDS, SELL_TOKEN_ACTION,
};
use crate::errors::{LaunchpadError, LaunchpadResult};
use crate::types::field::{u256_hex, u256_hex_array};
use crate::types::Address;

// ============================================================================
// Verifier Capability
// ============================================================================

/// Failure reported by a proof verifier
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VerifierError {
    #[error("invalid proof: {0}")]
    InvalidProof(String),

    #[error("verifier unavailable: {0}")]
    Unavailable(String),
}

/// Zero-knowledge membership verifier
pub trait ProofVerifier: Send + Sync {
    fn verify_proof(
        &self,
        root: U256,
        group_id: U256,
        signal_hash: U256,
        nullifier_hash: U256,
        external_nullifier_hash: U256,
        proof: &[U256; PROOF_WORDS],
    ) -> Result<(), VerifierError>;
}

/// Accepts every proof. For local simulation and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAllVerifier;

impl ProofVerifier for AcceptAllVerifier {
    fn verify_proof(
        &self,
        _root: U256,
        _group_id: U256,
        _signal_hash: U256,
        _nullifier_hash: U256,
        _external_nullifier_hash: U256,
        _proof: &[U256; PROOF_WORDS],
    ) -> Result<(), VerifierError> {
        Ok(())
    }
}

/// Rejects every proof with a fixed reason
#[derive(Debug, Clone)]
pub struct RejectingVerifier {
    reason: String,
}

impl RejectingVerifier {
    pub fn new(reason: impl Into<String>) -> Self {
        Self { reason: reason.into() }
    }
}

impl ProofVerifier for RejectingVerifier {
    fn verify_proof(
        &self,
        _root: U256,
        _group_id: U256,
        _signal_hash: U256,
        _nullifier_hash: U256,
        _external_nullifier_hash: U256,
        _proof: &[U256; PROOF_WORDS],
    ) -> Result<(), VerifierError> {
        Err(VerifierError::InvalidProof(self.reason.clone()))
    }
}

// ============================================================================
// Proof Inputs
// ============================================================================

/// Proof bundle supplied by a caller
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdentityProof {
    #[serde(with = "u256_hex")]
    pub root: U256,
    #[serde(with = "u256_hex")]
    pub nullifier_hash: U256,
    #[serde(with = "u256_hex_array")]
    pub proof: [U256; PROOF_WORDS],
}

impl IdentityProof {
    pub fn new(root: U256, nullifier_hash: U256, proof: [U256; PROOF_WORDS]) -> Self {
        Self { root, nullifier_hash, proof }
    }

    /// Proof with a zero root and zero proof words, identified only by its nullifier
    pub fn with_nullifier(nullifier_hash: U256) -> Self {
        Self::new(U256::ZERO, nullifier_hash, [U256::ZERO; PROOF_WORDS])
    }
}

/// Gated action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    CreateToken,
    BuyToken,
    SellToken,
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::CreateToken => "create",
            Self::BuyToken => "buy",
            Self::SellToken => "sell",
        };
        f.write_str(label)
    }
}

/// What happens to a nullifier after it has verified once
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NullifierPolicy {
    /// Each nullifier verifies at most once, across all actions
    #[default]
    SingleUse,
    /// Nullifiers identify a person and may be presented repeatedly.
    /// This gives up global replay protection; only the rate limits still apply.
    Reusable,
}

// ============================================================================
// Field Hashing
// ============================================================================

/// keccak256(bytes) shifted right by 8 bits so it fits the SNARK scalar field
pub fn hash_to_field(bytes: &[u8]) -> U256 {
    let digest: [u8; 32] = Keccak256::digest(bytes).into();
    U256::from_be_bytes(digest) >> 8
}

/// External nullifier binding an app id to an action
pub fn external_nullifier(app_id: &str, action: &str) -> U256 {
    let app_hash = hash_to_field(app_id.as_bytes());
    let mut packed = app_hash.to_be_bytes().to_vec();
    packed.extend_from_slice(action.as_bytes());
    hash_to_field(&packed)
}

/// Signal hash binding a proof to the account submitting it
pub fn signal_hash(caller: &Address) -> U256 {
    hash_to_field(caller.as_bytes())
}

// ============================================================================
// Identity Gate
// ============================================================================

/// Action identifiers for one application
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdentityConfig {
    pub app_id: String,
    pub create_action: String,
    pub buy_action: String,
    pub sell_action: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            app_id: "app_launchpad".to_string(),
            create_action: CREATE_TOKEN_ACTION.to_string(),
            buy_action: BUY_TOKEN_ACTION.to_string(),
            sell_action: SELL_TOKEN_ACTION.to_string(),
        }
    }
}

impl IdentityConfig {
    pub fn action(&self, kind: ActionKind) -> &str {
        match kind {
            ActionKind::CreateToken => &self.create_action,
            ActionKind::BuyToken => &self.buy_action,
            ActionKind::SellToken => &self.sell_action,
        }
    }
}

/// Verifier plus the precomputed external nullifier of each action
#[derive(Clone)]
pub struct IdentityGate {
    verifier: Arc<dyn ProofVerifier>,
    config: IdentityConfig,
    group_id: U256,
    create_nullifier: U256,
    buy_nullifier: U256,
    sell_nullifier: U256,
}

impl fmt::Debug for IdentityGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IdentityGate")
            .field("config", &self.config)
            .field("group_id", &self.group_id)
            .finish_non_exhaustive()
    }
}

impl IdentityGate {
    pub fn new(verifier: Arc<dyn ProofVerifier>, config: IdentityConfig) -> Self {
        let create_nullifier = external_nullifier(&config.app_id, &config.create_action);
        let buy_nullifier = external_nullifier(&config.app_id, &config.buy_action);
        let sell_nullifier = external_nullifier(&config.app_id, &config.sell_action);
        Self {
            verifier,
            config,
            group_id: U256::new(ORB_GROUP_ID as u128),
            create_nullifier,
            buy_nullifier,
            sell_nullifier,
        }
    }

    pub fn config(&self) -> &IdentityConfig {
        &self.config
    }

    pub fn action_name(&self, kind: ActionKind) -> &str {
        self.config.action(kind)
    }

    pub fn external_nullifier(&self, kind: ActionKind) -> U256 {
        match kind {
            ActionKind::CreateToken => self.create_nullifier,
            ActionKind::BuyToken => self.buy_nullifier,
            ActionKind::SellToken => self.sell_nullifier,
        }
    }

    /// Verify `proof` for `caller` performing `kind`
    pub fn verify(&self, caller: &Address, kind: ActionKind, proof: &IdentityProof) -> LaunchpadResult<()> {
        self.verifier
            .verify_proof(
                proof.root,
                self.group_id,
                signal_hash(caller),
                proof.nullifier_hash,
                self.external_nullifier(kind),
                &proof.proof,
            )
            .map_err(|err| LaunchpadError::IdentityVerificationFailed {
                nullifier_hash: proof.nullifier_hash,
                action: self.action_name(kind).to_string(),
                reason: err.to_string(),
            })
    }
}

// ============================================================================
// Nullifier Registry
// ============================================================================

/// Every nullifier that has verified at least once
#[derive(Debug, Clone, Default)]
pub struct NullifierRegistry {
    used: HashSet<U256>,
}

impl NullifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_used(&self, nullifier_hash: &U256) -> bool {
        self.used.contains(nullifier_hash)
    }

    pub fn ensure_unused(&self, nullifier_hash: &U256) -> LaunchpadResult<()> {
        if self.is_used(nullifier_hash) {
            return Err(LaunchpadError::NullifierAlreadyUsed {
                nullifier_hash: *nullifier_hash,
            });
        }
        Ok(())
    }

    /// Mark as used; true when the nullifier was new
    pub fn consume(&mut self, nullifier_hash: U256) -> bool {
        self.used.insert(nullifier_hash)
    }

    pub(crate) fn release(&mut self, nullifier_hash: &U256) {
        self.used.remove(nullifier_hash);
    }

    pub fn len(&self) -> usize {
        self.used.len()
    }

    pub fn is_empty(&self) -> bool {
        self.used.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Captures the inputs of the last verification
    #[derive(Default)]
    struct RecordingVerifier {
        seen: Mutex<Vec<(U256, U256, U256)>>,
    }

    impl ProofVerifier for RecordingVerifier {
        fn verify_proof(
            &self,
            _root: U256,
            group_id: U256,
            signal_hash: U256,
            _nullifier_hash: U256,
            external_nullifier_hash: U256,
            _proof: &[U256; PROOF_WORDS],
        ) -> Result<(), VerifierError> {
            self.seen
                .lock()
                .unwrap()
                .push((group_id, signal_hash, external_nullifier_hash));
            Ok(())
        }
    }

    #[test]
    fn test_hash_to_field_fits_in_248_bits() {
        let hashed = hash_to_field(b"anything");
        assert_eq!(hashed >> 248, U256::ZERO);
        assert_ne!(hashed, U256::ZERO);
    }

    #[test]
    fn test_actions_have_distinct_external_nullifiers() {
        let create = external_nullifier("app_launchpad", CREATE_TOKEN_ACTION);
        let buy = external_nullifier("app_launchpad", BUY_TOKEN_ACTION);
        assert_ne!(create, buy);
        assert_ne!(create, external_nullifier("app_other", CREATE_TOKEN_ACTION));
    }

    #[test]
    fn test_gate_passes_derived_inputs() {
        let verifier = Arc::new(RecordingVerifier::default());
        let gate = IdentityGate::new(verifier.clone(), IdentityConfig::default());
        let caller = Address::from_low_u64_be(9);

        gate.verify(&caller, ActionKind::BuyToken, &IdentityProof::with_nullifier(U256::ONE))
            .unwrap();

        let seen = verifier.seen.lock().unwrap();
        assert_eq!(
            seen[0],
            (
                U256::ONE,
                signal_hash(&caller),
                external_nullifier("app_launchpad", BUY_TOKEN_ACTION)
            )
        );
    }

    #[test]
    fn test_rejection_maps_to_verification_failure() {
        let gate = IdentityGate::new(
            Arc::new(RejectingVerifier::new("bad root")),
            IdentityConfig::default(),
        );
        let err = gate
            .verify(
                &Address::ZERO,
                ActionKind::CreateToken,
                &IdentityProof::with_nullifier(U256::new(3)),
            )
            .unwrap_err();
        assert_eq!(
            err,
            LaunchpadError::IdentityVerificationFailed {
                nullifier_hash: U256::new(3),
                action: CREATE_TOKEN_ACTION.to_string(),
                reason: "invalid proof: bad root".to_string(),
            }
        );
    }

    #[test]
    fn test_nullifier_registry() {
        let mut registry = NullifierRegistry::new();
        assert!(registry.ensure_unused(&U256::ONE).is_ok());
        assert!(registry.consume(U256::ONE));
        assert!(!registry.consume(U256::ONE));
        assert_eq!(
            registry.ensure_unused(&U256::ONE),
            Err(LaunchpadError::NullifierAlreadyUsed { nullifier_hash: U256::ONE })
        );
        registry.release(&U256::ONE);
        assert!(registry.is_empty());
    }

    #[test]
    fn test_proof_json_uses_hex() {
        let proof = IdentityProof::with_nullifier(U256::new(0xabc));
        let json = serde_json::to_value(&proof).unwrap();
        assert_eq!(json["nullifier_hash"], "0xabc");
        assert_eq!(json["proof"].as_array().unwrap().len(), PROOF_WORDS);
        let back: IdentityProof = serde_json::from_value(json).unwrap();
        assert_eq!(back, proof);
    }
}
