//! Parent selection strategies.
//!
//! Each strategy maps a fitness vector to the index of the chosen parent.
//! The built-in functions are pure apart from the random draws they make
//! on the supplied generator.
//!
//! # References
//!
//! - Goldberg & Deb (1991), "A Comparative Analysis of Selection Schemes
//!   Used in Genetic Algorithms"
//! - Blickle & Thiele (1996), "A Comparison of Selection Schemes used in
//!   Evolutionary Algorithms"

use super::config::EngineConfig;
use super::types::Fitness;
use crate::error::{EngineError, Result};
use crate::random::RandomStream;
use rand::Rng;
use std::str::FromStr;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Externally supplied selection function.
///
/// Receives the current fitness vector and the run's random stream and
/// returns the index of the chosen parent.
pub type CustomSelection<F> = Box<dyn FnMut(&[F], &mut RandomStream) -> usize + Send>;

/// Which selection strategy a run uses.
///
/// # Examples
///
/// ```
/// use genloop::ga::SelectionMethod;
///
/// let method: SelectionMethod = "deterministic_tournament".parse().unwrap();
/// assert_eq!(method, SelectionMethod::DeterministicTournament);
/// assert_eq!(SelectionMethod::default(), SelectionMethod::Roulette);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SelectionMethod {
    /// Fitness-proportionate selection over the raw fitness values.
    #[default]
    Roulette,

    /// Best of `tournament_size` distinct contestants.
    DeterministicTournament,

    /// Rank `i` of `tournament_size` contestants wins with
    /// probability `p·(1-p)^i`.
    ProbabilisticTournament,

    /// A caller-supplied [`CustomSelection`].
    Custom,
}

impl SelectionMethod {
    /// The snake_case name of the method.
    pub fn name(&self) -> &'static str {
        match self {
            SelectionMethod::Roulette => "roulette",
            SelectionMethod::DeterministicTournament => "deterministic_tournament",
            SelectionMethod::ProbabilisticTournament => "probabilistic_tournament",
            SelectionMethod::Custom => "custom",
        }
    }
}

impl std::fmt::Display for SelectionMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SelectionMethod {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "roulette" => Ok(SelectionMethod::Roulette),
            "deterministic_tournament" => Ok(SelectionMethod::DeterministicTournament),
            "probabilistic_tournament" => Ok(SelectionMethod::ProbabilisticTournament),
            "custom" => Ok(SelectionMethod::Custom),
            other => Err(EngineError::Configuration(format!(
                "unknown selection method `{other}`"
            ))),
        }
    }
}

/// A resolved, ready-to-run selection strategy.
pub(crate) enum Selector<F> {
    Roulette,
    DeterministicTournament { k: usize },
    ProbabilisticTournament { k: usize, p: f64 },
    Custom(CustomSelection<F>),
}

impl<F: Fitness> Selector<F> {
    /// Resolves `method` against the configuration.
    ///
    /// Fails with [`EngineError::Configuration`] when the method needs a
    /// callable that was not supplied, or when the tournament is larger
    /// than the population.
    pub(crate) fn resolve(
        method: SelectionMethod,
        custom: Option<CustomSelection<F>>,
        config: &EngineConfig,
    ) -> Result<Self> {
        let tournament_fits = || {
            if config.tournament_size > config.population_size {
                Err(EngineError::Configuration(format!(
                    "tournament_size {} exceeds population_size {}",
                    config.tournament_size, config.population_size
                )))
            } else {
                Ok(())
            }
        };

        match method {
            SelectionMethod::Roulette => Ok(Selector::Roulette),
            SelectionMethod::DeterministicTournament => {
                tournament_fits()?;
                Ok(Selector::DeterministicTournament {
                    k: config.tournament_size,
                })
            }
            SelectionMethod::ProbabilisticTournament => {
                tournament_fits()?;
                Ok(Selector::ProbabilisticTournament {
                    k: config.tournament_size,
                    p: config.tournament_probability,
                })
            }
            SelectionMethod::Custom => custom.map(Selector::Custom).ok_or_else(|| {
                EngineError::Configuration(
                    "selection method `custom` requires a selection callable".into(),
                )
            }),
        }
    }

    /// Picks one parent index.
    pub(crate) fn select(&mut self, fitness: &[F], rng: &mut RandomStream) -> Result<usize> {
        let idx = match self {
            Selector::Roulette => roulette(fitness, rng),
            Selector::DeterministicTournament { k } => deterministic_tournament(fitness, *k, rng)?,
            Selector::ProbabilisticTournament { k, p } => {
                probabilistic_tournament(fitness, *k, *p, rng)?
            }
            Selector::Custom(f) => f(fitness, rng),
        };
        if idx >= fitness.len() {
            return Err(EngineError::SelectionOutOfRange {
                index: idx,
                len: fitness.len(),
            });
        }
        Ok(idx)
    }
}

/// Roulette wheel selection over the raw fitness values.
///
/// Draws `u` uniformly in `[0, total)` and returns the first index whose
/// running sum strictly exceeds `u`.
///
/// The wheel is proportional to the fitness values as given, so under
/// minimization larger scores receive larger slices. Plugins that want
/// "better gets more" should pass a transformed vector through a
/// [`CustomSelection`].
///
/// When the total is zero, negative or not finite there is no meaningful
/// wheel, and an index is drawn uniformly instead. If rounding leaves the
/// draw unmatched the last index is returned.
///
/// # Panics
/// Panics if `fitness` is empty.
pub fn roulette<F: Fitness, R: Rng>(fitness: &[F], rng: &mut R) -> usize {
    assert!(!fitness.is_empty(), "cannot select from empty population");
    let n = fitness.len();

    let total: f64 = fitness.iter().map(|f| f.to_f64()).sum();
    if !(total > 0.0 && total.is_finite()) {
        return rng.random_range(0..n);
    }

    let threshold = rng.random_range(0.0..total);
    let mut cumulative = 0.0;
    for (i, f) in fitness.iter().enumerate() {
        cumulative += f.to_f64();
        if cumulative > threshold {
            return i;
        }
    }

    n - 1
}

/// Deterministic tournament: the best of `k` distinct contestants.
///
/// Contestants are drawn uniformly without replacement. Ties on fitness
/// go to the contestant drawn first.
pub fn deterministic_tournament<F: Fitness, R: Rng>(
    fitness: &[F],
    k: usize,
    rng: &mut R,
) -> Result<usize> {
    let contestants = ranked_sample(fitness, k, rng)?;
    Ok(contestants[0])
}

/// Probabilistic tournament over `k` distinct contestants.
///
/// Contestants are ranked best first and offered in that order; each one
/// wins its own uniform draw with probability `p`. Rank `i` is therefore
/// chosen with probability `p·(1-p)^i`. If every draw fails, the worst
/// contestant is returned.
pub fn probabilistic_tournament<F: Fitness, R: Rng>(
    fitness: &[F],
    k: usize,
    p: f64,
    rng: &mut R,
) -> Result<usize> {
    if !(p > 0.0 && p <= 1.0) {
        return Err(EngineError::InvalidArgument(format!(
            "tournament probability must be in (0, 1], got {p}"
        )));
    }
    let contestants = ranked_sample(fitness, k, rng)?;

    for &idx in &contestants {
        if rng.random::<f64>() < p {
            return Ok(idx);
        }
    }

    Ok(contestants[k - 1])
}

/// Samples `k` distinct indices and sorts them by fitness, best first.
fn ranked_sample<F: Fitness, R: Rng>(fitness: &[F], k: usize, rng: &mut R) -> Result<Vec<usize>> {
    let n = fitness.len();
    if k == 0 || k > n {
        return Err(EngineError::InvalidArgument(format!(
            "tournament size {k} must be in 1..={n}"
        )));
    }

    let mut sampled = rand::seq::index::sample(rng, n, k).into_vec();
    sampled.sort_by(|&a, &b| {
        fitness[a]
            .partial_cmp(&fitness[b])
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    Ok(sampled)
}
