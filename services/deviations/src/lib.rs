pub mod engine;
pub mod ledger;


pub use engine::{DeviationCandidate, DeviationEngine};
pub use ledger::{DeviationLedger, LedgerError};
