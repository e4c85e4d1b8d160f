//! Error types for the scenario runner

use launchpad_core::LaunchpadError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimError {
    #[error("Invalid scenario: {0}")]
    InvalidScenario(String),

    #[error("Unknown token label '{0}'")]
    UnknownToken(String),

    #[error("Step {index} ({action}) failed: {source}")]
    StepFailed {
        index: usize,
        action: &'static str,
        #[source]
        source: LaunchpadError,
    },

    #[error("Step {index} ({action}) succeeded, expected {expected}")]
    UnexpectedSuccess {
        index: usize,
        action: &'static str,
        expected: String,
    },

    #[error("Step {index} ({action}) failed with {actual}, expected {expected}")]
    WrongError {
        index: usize,
        action: &'static str,
        expected: String,
        actual: String,
    },

    #[error("Custody imbalance: registry holds {held}, owes {owed}")]
    CustodyMismatch { held: u128, owed: u128 },

    #[error("Launchpad error: {0}")]
    Launchpad(#[from] LaunchpadError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type SimResult<T> = Result<T, SimError>;
