pub mod error;
pub mod runner;
pub mod scenario;

pub use error::{SimError, SimResult};
pub use runner::{AccountBook, RunReport, Runner, StepFailure, StepOutcome, TokenSummary};
pub use scenario::{Action, Scenario, Step};
