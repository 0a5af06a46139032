//! Error taxonomy for engine runs.

use crate::ga::EventKind;

/// Errors raised by the engine.
///
/// Configuration problems are reported by [`GaEngine::new`] or at the top
/// of [`GaEngine::start`], before any generation runs. Plugin and listener
/// failures abort the run where they happen; the engine never retries and
/// never patches up a partially built population.
///
/// [`GaEngine::new`]: crate::ga::GaEngine::new
/// [`GaEngine::start`]: crate::ga::GaEngine::start
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("plugin operation `{operation}` failed: {source}")]
    Plugin {
        operation: &'static str,
        #[source]
        source: anyhow::Error,
    },

    #[error("listener for `{event}` failed: {source}")]
    Listener {
        event: EventKind,
        #[source]
        source: anyhow::Error,
    },

    #[error("population size mismatch: expected {expected}, got {actual}")]
    PopulationSize { expected: usize, actual: usize },

    #[error("selection returned index {index} for a population of {len}")]
    SelectionOutOfRange { index: usize, len: usize },
}

impl EngineError {
    pub(crate) fn plugin(operation: &'static str) -> impl FnOnce(anyhow::Error) -> Self {
        move |source| EngineError::Plugin { operation, source }
    }

    /// Whether this error was raised before any generation executed.
    pub fn is_configuration(&self) -> bool {
        matches!(self, EngineError::Configuration(_))
    }
}

pub type Result<T> = std::result::Result<T, EngineError>;
