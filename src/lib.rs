//! Sponsorship matching and allocation engine.
//!
//! Pairs users requesting sponsored access with subscribers offering spare
//! sponsorship capacity, scores each pairing, and commits the winning match
//! exactly once even when allocations race. HTTP surfaces, billing providers,
//! and persistence drivers are collaborators behind the traits in
//! [`sponsorship::repository`]; this crate owns only the decision logic.

pub mod config;
pub mod sponsorship;
pub mod telemetry;
