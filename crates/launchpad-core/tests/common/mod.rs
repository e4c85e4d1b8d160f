//! Shared fixtures for launchpad integration tests
#![allow(dead_code)]

use std::sync::Arc;

pub use launchpad_core::*;

/// Common test constants
pub mod test_constants {
    use launchpad_core::PRECISION;

    /// 2023-11-14T22:13:20Z
    pub const START_TIME: u64 = 1_700_000_000;

    pub const DAY: u64 = 86_400;

    pub const DEFAULT_FUNDING: u128 = 1_000 * PRECISION;

    /// 0.0001 ETH, roughly half a token at the seeded price
    pub const SMALL_BUY: u128 = 100_000_000_000_000;

    /// 0.01 ETH, roughly fifty tokens at the seeded price
    pub const MEDIUM_BUY: u128 = 10_000_000_000_000_000;
}

use test_constants::*;

/// Pre-configured accounts
pub struct TestAccounts {
    pub registry: Address,
    pub operator: Address,
    pub alice: Address,
    pub bob: Address,
    pub charlie: Address,
}

impl Default for TestAccounts {
    fn default() -> Self {
        Self {
            registry: Address::from_low_u64_be(0x1a0c),
            operator: Address::from_low_u64_be(0x0917),
            alice: Address::from_low_u64_be(0xa11ce),
            bob: Address::from_low_u64_be(0xb0b),
            charlie: Address::from_low_u64_be(0xc4a7),
        }
    }
}

/// Launchpad under test plus the clock driving it
pub struct TestContext {
    pub launchpad: Launchpad,
    pub clock: ManualClock,
    pub accounts: TestAccounts,
}

impl TestContext {
    /// Ungated registry with default config and funded users
    pub fn new() -> Self {
        Self::builder().build()
    }

    pub fn builder() -> TestContextBuilder {
        TestContextBuilder::default()
    }

    pub fn advance(&self, secs: u64) -> u64 {
        self.clock.advance(secs)
    }

    /// Create a token as `creator` and return its handle
    pub fn launch(&mut self, creator: Address, proof: Option<&IdentityProof>) -> TokenHandle {
        self.launchpad
            .create_token(&creator, "Test", "TST", "ipfs://test", proof)
            .expect("token creation should succeed")
    }

    pub fn balance(&self, token: &TokenHandle, account: &Address) -> u128 {
        self.launchpad.token_balance(token, account).expect("token exists")
    }

    pub fn assert_custody_balanced(&self) {
        assert_eq!(
            self.launchpad.custody_balance(),
            self.launchpad.custody_obligations().expect("obligations fit"),
            "registry custody must equal reserves plus unwithdrawn fees"
        );
    }

    pub fn assert_supply_consistent(&self, token: &TokenHandle) {
        let record = self.launchpad.token_record(token).expect("record exists");
        let ledger = self.launchpad.token(token).expect("ledger exists");
        assert_eq!(record.total_supply, ledger.total_supply());
    }
}

pub struct TestContextBuilder {
    config: LaunchpadConfig,
    verifier: Option<Arc<dyn ProofVerifier>>,
    funding: u128,
}

impl Default for TestContextBuilder {
    fn default() -> Self {
        Self {
            config: LaunchpadConfig::default(),
            verifier: None,
            funding: DEFAULT_FUNDING,
        }
    }
}

impl TestContextBuilder {
    pub fn config(mut self, config: LaunchpadConfig) -> Self {
        self.config = config;
        self
    }

    pub fn verifier(mut self, verifier: impl ProofVerifier + 'static) -> Self {
        self.verifier = Some(Arc::new(verifier));
        self
    }

    pub fn accept_all(self) -> Self {
        self.verifier(AcceptAllVerifier)
    }

    pub fn funding(mut self, funding: u128) -> Self {
        self.funding = funding;
        self
    }

    pub fn build(self) -> TestContext {
        let accounts = TestAccounts::default();
        let clock = ManualClock::new(START_TIME);
        let mut launchpad = Launchpad::new(accounts.registry, accounts.operator, self.config)
            .expect("valid config")
            .with_clock(Arc::new(clock.clone()));
        if let Some(verifier) = self.verifier {
            launchpad = launchpad.with_verifier(verifier);
        }
        for account in [accounts.alice, accounts.bob, accounts.charlie] {
            launchpad.deposit(&account, self.funding).expect("deposit");
        }
        TestContext { launchpad, clock, accounts }
    }
}

/// Proof carrying only a nullifier; accepted by `AcceptAllVerifier`
pub fn proof(nullifier: u64) -> IdentityProof {
    IdentityProof::with_nullifier(U256::new(nullifier as u128))
}
