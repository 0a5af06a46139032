//! Generational genetic-algorithm engine.
//!
//! A problem plugin implements [`GaProblem`]; [`GaEngine`] runs the
//! generational loop over it, choosing parents with a [`SelectionMethod`]
//! and announcing every step as an [`Event`] on its [`EventBus`].
//!
//! # Key Types
//!
//! - [`EngineConfig`]: seed, population size, operator rates, tournament parameters
//! - [`GaEngine`]: owns the run state and executes the loop
//! - [`EventBus`] / [`EventKind`]: lifecycle listeners (`on`, `once`, `off`)
//! - [`local_search_hook`]: ready-made hybridization listener
//!
//! # Submodules
//!
//! - [`operators`]: permutation crossover and mutation helpers
//!
//! # References
//!
//! - Holland (1975), *Adaptation in Natural and Artificial Systems*
//! - Goldberg (1989), *Genetic Algorithms in Search, Optimization, and Machine Learning*

mod config;
mod engine;
mod events;
mod hybrid;
pub mod operators;
mod selection;
mod types;

pub use config::EngineConfig;
pub use engine::{GaEngine, Ranked};
pub use events::{
    Event, EventBus, EventContext, EventKind, Listener, ListenerId, ProblemEvent,
};
pub use hybrid::local_search_hook;
pub use selection::{
    deterministic_tournament, probabilistic_tournament, roulette, CustomSelection,
    SelectionMethod,
};
pub use types::{Fitness, GaProblem, RunState};
