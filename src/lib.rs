//! Generational evolutionary-optimization engine.
//!
//! Evolves a fixed-size population of candidate solutions toward lower
//! fitness. Everything problem-specific (encoding, scoring, variation,
//! termination) lives in a plugin implementing [`ga::GaProblem`]; the
//! engine supplies the loop:
//!
//! - **Replacement**: elitist or non-elitist generational replacement
//! - **Selection**: roulette, deterministic tournament, probabilistic
//!   tournament, or a caller-supplied function
//! - **Events**: typed lifecycle listeners for instrumentation and
//!   local-search hybridization
//! - **Determinism**: every draw comes from one seeded
//!   [`random::RandomStream`] per run
//!
//! Reference plugins live in [`problems`]; [`sweep`] runs many independent
//! seeds, in parallel with the `parallel` feature.

pub mod error;
pub mod ga;
pub mod problems;
pub mod random;
pub mod sweep;

pub use error::{EngineError, Result};
