//! Engine configuration.
//!
//! [`EngineConfig`] holds the per-run parameters. It is fixed for the
//! duration of a run; the engine keeps its own copy.

use crate::error::{EngineError, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for the generational engine.
///
/// # Defaults
///
/// ```
/// use genloop::ga::EngineConfig;
///
/// let config = EngineConfig::default();
/// assert_eq!(config.population_size, 100);
/// assert_eq!(config.tournament_size, 3);
/// ```
///
/// # Builder Pattern
///
/// ```
/// use genloop::ga::EngineConfig;
///
/// let config = EngineConfig::default()
///     .with_seed(42)
///     .with_population_size(50)
///     .with_crossover_rate(0.8)
///     .with_mutation_rate(0.05);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Seed of the run's [`RandomStream`](crate::random::RandomStream).
    pub seed: u64,

    /// Number of individuals in every generation. Must be positive.
    pub population_size: usize,

    /// Probability of mutating a crossover child (0.0–1.0).
    pub mutation_rate: f64,

    /// Probability of applying crossover to a selected pair (0.0–1.0).
    ///
    /// When crossover is not applied, the parents are copied unchanged.
    pub crossover_rate: f64,

    /// Number of contestants in tournament selection.
    ///
    /// Must not exceed `population_size` when a tournament method is used.
    pub tournament_size: usize,

    /// Probability of picking the best contestant in a probabilistic
    /// tournament. Rank `i` wins with probability `p·(1-p)^i`.
    pub tournament_probability: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: 0,
            population_size: 100,
            mutation_rate: 0.1,
            crossover_rate: 0.9,
            tournament_size: 3,
            tournament_probability: 0.75,
        }
    }
}

impl EngineConfig {
    /// Creates a configuration from the four core parameters.
    pub fn new(seed: u64, population_size: usize, mutation_rate: f64, crossover_rate: f64) -> Self {
        Self {
            seed,
            population_size,
            mutation_rate,
            crossover_rate,
            ..Self::default()
        }
    }

    /// Sets the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Sets the population size.
    pub fn with_population_size(mut self, n: usize) -> Self {
        self.population_size = n;
        self
    }

    /// Sets the mutation rate.
    pub fn with_mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = rate;
        self
    }

    /// Sets the crossover rate.
    pub fn with_crossover_rate(mut self, rate: f64) -> Self {
        self.crossover_rate = rate;
        self
    }

    /// Sets the tournament size.
    pub fn with_tournament_size(mut self, k: usize) -> Self {
        self.tournament_size = k;
        self
    }

    /// Sets the probabilistic-tournament win probability.
    pub fn with_tournament_probability(mut self, p: f64) -> Self {
        self.tournament_probability = p;
        self
    }

    /// Validates the configuration.
    ///
    /// Rates are not clamped: an out-of-range value is a configuration
    /// error, not something to silently repair.
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(EngineError::Configuration(
                "population_size must be positive".into(),
            ));
        }
        check_unit_rate("mutation_rate", self.mutation_rate)?;
        check_unit_rate("crossover_rate", self.crossover_rate)?;
        if self.tournament_size == 0 {
            return Err(EngineError::Configuration(
                "tournament_size must be at least 1".into(),
            ));
        }
        let p = self.tournament_probability;
        if !(p > 0.0 && p <= 1.0) {
            return Err(EngineError::Configuration(format!(
                "tournament_probability must be in (0, 1], got {p}"
            )));
        }
        Ok(())
    }
}

fn check_unit_rate(name: &str, rate: f64) -> Result<()> {
    if (0.0..=1.0).contains(&rate) {
        Ok(())
    } else {
        Err(EngineError::Configuration(format!(
            "{name} must be in [0, 1], got {rate}"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EngineConfig::default();
        assert_eq!(config.seed, 0);
        assert_eq!(config.population_size, 100);
        assert!((config.mutation_rate - 0.1).abs() < 1e-10);
        assert!((config.crossover_rate - 0.9).abs() < 1e-10);
        assert_eq!(config.tournament_size, 3);
        assert!((config.tournament_probability - 0.75).abs() < 1e-10);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_new_keeps_tournament_defaults() {
        let config = EngineConfig::new(7, 20, 0.05, 0.9);
        assert_eq!(config.seed, 7);
        assert_eq!(config.population_size, 20);
        assert_eq!(config.tournament_size, 3);
    }

    #[test]
    fn test_builder_pattern() {
        let config = EngineConfig::default()
            .with_seed(42)
            .with_population_size(200)
            .with_mutation_rate(0.05)
            .with_crossover_rate(0.8)
            .with_tournament_size(5)
            .with_tournament_probability(0.6);

        assert_eq!(config.seed, 42);
        assert_eq!(config.population_size, 200);
        assert!((config.mutation_rate - 0.05).abs() < 1e-10);
        assert!((config.crossover_rate - 0.8).abs() < 1e-10);
        assert_eq!(config.tournament_size, 5);
        assert!((config.tournament_probability - 0.6).abs() < 1e-10);
    }

    #[test]
    fn test_validate_zero_population() {
        let err = EngineConfig::default()
            .with_population_size(0)
            .validate()
            .unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_validate_rates_out_of_range() {
        assert!(EngineConfig::default()
            .with_mutation_rate(1.5)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_crossover_rate(-0.1)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_crossover_rate(f64::NAN)
            .validate()
            .is_err());
    }

    #[test]
    fn test_validate_rate_bounds_inclusive() {
        let config = EngineConfig::default()
            .with_mutation_rate(0.0)
            .with_crossover_rate(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_tournament_parameters() {
        assert!(EngineConfig::default()
            .with_tournament_size(0)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_tournament_probability(0.0)
            .validate()
            .is_err());
        assert!(EngineConfig::default()
            .with_tournament_probability(1.0)
            .validate()
            .is_ok());
    }
}
