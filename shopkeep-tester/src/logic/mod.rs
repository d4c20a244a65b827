pub mod audit;
pub mod reports;
pub mod seeds;

pub use audit::{AuditResult, run_audits};
pub use seeds::resolve_seed_inputs;
