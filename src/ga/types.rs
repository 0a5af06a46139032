//! Core trait definitions for the GA engine.
//!
//! [`GaProblem`] is the contract between the generic engine and a
//! problem-specific plugin. The engine never looks inside an individual;
//! it only orders individuals by the [`Fitness`] the plugin assigns.

use rand::Rng;

/// Marker trait for fitness values.
///
/// Lower fitness is considered better (minimization). Both integer and
/// real scores are supported; the conversion to `f64` is used only by
/// fitness-proportionate selection and for logging.
pub trait Fitness: PartialOrd + Copy + Send + Sync + std::fmt::Debug + 'static {
    /// Converts the fitness to `f64`.
    fn to_f64(self) -> f64;
}

impl Fitness for f64 {
    fn to_f64(self) -> f64 {
        self
    }
}

impl Fitness for f32 {
    fn to_f64(self) -> f64 {
        self as f64
    }
}

macro_rules! impl_integer_fitness {
    ($($t:ty),*) => {
        $(
            impl Fitness for $t {
                fn to_f64(self) -> f64 {
                    self as f64
                }
            }
        )*
    };
}

impl_integer_fitness!(i32, i64, u32, u64, usize);

/// Read-only view of the run, as seen by termination checks and listeners.
#[derive(Debug)]
pub struct RunState<'a, T, F> {
    /// Completed generations so far.
    pub gen: usize,
    /// Current population.
    pub population: &'a [T],
    /// Fitness of each individual, index-aligned with `population`.
    pub fitness: &'a [F],
}

impl<T, F: Fitness> RunState<'_, T, F> {
    /// Best (lowest) fitness in the current population.
    pub fn best_fitness(&self) -> Option<F> {
        self.fitness
            .iter()
            .copied()
            .reduce(|best, f| if f < best { f } else { best })
    }

    /// Index of the best individual. Ties resolve to the earliest index.
    pub fn best_index(&self) -> Option<usize> {
        best_index(self.fitness)
    }
}

// Manual impls: derive would require `T: Clone` / `T: Copy`.
impl<T, F> Clone for RunState<'_, T, F> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T, F> Copy for RunState<'_, T, F> {}

/// Defines an optimization problem for the engine.
///
/// A plugin covers:
///
/// 1. **Initialization**: [`generate_population`](GaProblem::generate_population)
/// 2. **Evaluation**: [`fitness`](GaProblem::fitness)
/// 3. **Variation**: [`crossover`](GaProblem::crossover) and [`mutate`](GaProblem::mutate)
/// 4. **Termination**: [`end_condition`](GaProblem::end_condition)
/// 5. **Improvement** (optional): [`local_search`](GaProblem::local_search)
///
/// Every operation is fallible. An error aborts the run and reaches the
/// caller of [`GaEngine::start`](super::GaEngine::start) unchanged apart
/// from the operation name.
///
/// # Example
///
/// ```ignore
/// struct Zeros { len: usize }
///
/// impl GaProblem for Zeros {
///     type Individual = Vec<bool>;
///     type Fitness = usize;
///
///     fn generate_population<R: Rng>(&self, size: usize, rng: &mut R) -> anyhow::Result<Vec<Vec<bool>>> {
///         Ok((0..size).map(|_| (0..self.len).map(|_| rng.random_bool(0.5)).collect()).collect())
///     }
///     fn fitness(&self, bits: &Vec<bool>) -> anyhow::Result<usize> {
///         Ok(bits.iter().filter(|b| !**b).count())
///     }
///     // crossover, mutate, end_condition ...
/// }
/// ```
pub trait GaProblem: Send + Sync {
    /// The candidate solution type. Opaque to the engine.
    type Individual: Clone + Send + std::fmt::Debug;

    /// The score type. Lower is better.
    type Fitness: Fitness;

    /// Produces exactly `size` individuals.
    fn generate_population<R: Rng>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> anyhow::Result<Vec<Self::Individual>>;

    /// Scores an individual. Must not depend on anything but its input.
    ///
    /// The score must be ordered against itself; a NaN aborts the run.
    fn fitness(&self, individual: &Self::Individual) -> anyhow::Result<Self::Fitness>;

    /// Produces one child from two parents without altering either.
    fn crossover<R: Rng>(
        &self,
        parent1: &Self::Individual,
        parent2: &Self::Individual,
        rng: &mut R,
    ) -> anyhow::Result<Self::Individual>;

    /// Produces a mutated version of `individual`.
    fn mutate<R: Rng>(
        &self,
        individual: Self::Individual,
        rng: &mut R,
    ) -> anyhow::Result<Self::Individual>;

    /// Consulted once per generation boundary. Returns `true` to halt.
    fn end_condition(
        &self,
        state: &RunState<'_, Self::Individual, Self::Fitness>,
    ) -> anyhow::Result<bool>;

    /// Best-effort local improvement of a single individual.
    ///
    /// The engine never calls this on its own; it is meant for
    /// hybridization hooks such as [`local_search_hook`](super::local_search_hook).
    /// The default returns the individual unchanged.
    fn local_search(&self, individual: &Self::Individual) -> anyhow::Result<Self::Individual> {
        Ok(individual.clone())
    }
}

/// Whether `fitness` can be ordered at all. False for NaN.
pub(crate) fn is_comparable<F: PartialOrd>(fitness: &F) -> bool {
    fitness.partial_cmp(fitness).is_some()
}

/// Index of the lowest fitness, first one on ties.
pub(crate) fn best_index<F: Fitness>(fitness: &[F]) -> Option<usize> {
    let mut best: Option<usize> = None;
    for (i, f) in fitness.iter().enumerate() {
        if best.is_none_or(|b| *f < fitness[b]) {
            best = Some(i);
        }
    }
    best
}

/// Pairs fitness with individuals and sorts ascending by fitness.
///
/// The sort is stable, so equal scores keep population order.
pub(crate) fn rank<T: Clone, F: Fitness>(population: &[T], fitness: &[F]) -> Vec<(F, T)> {
    let mut ranked: Vec<(F, T)> = fitness
        .iter()
        .copied()
        .zip(population.iter().cloned())
        .collect();
    ranked.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
    ranked
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_fitness_converts() {
        assert_eq!(3usize.to_f64(), 3.0);
        assert_eq!((-4i64).to_f64(), -4.0);
        assert_eq!(1.5f32.to_f64(), 1.5);
    }

    #[test]
    fn test_best_index_first_on_ties() {
        assert_eq!(best_index(&[3, 1, 2, 1]), Some(1));
        assert_eq!(best_index::<u32>(&[]), None);
    }

    #[test]
    fn test_nan_is_not_comparable() {
        assert!(is_comparable(&0.0f64));
        assert!(is_comparable(&f64::INFINITY));
        assert!(!is_comparable(&f64::NAN));
        assert!(is_comparable(&3usize));
    }

    #[test]
    fn test_rank_is_ascending_and_stable() {
        let pop = vec!['a', 'b', 'c', 'd'];
        let fit = vec![2.0, 1.0, 2.0, 0.5];
        let ranked = rank(&pop, &fit);
        let order: Vec<char> = ranked.iter().map(|(_, c)| *c).collect();
        assert_eq!(order, vec!['d', 'b', 'a', 'c']);
    }

    #[test]
    fn test_run_state_best() {
        let pop = vec![10, 20, 30];
        let fit = vec![5u32, 2, 9];
        let state = RunState {
            gen: 4,
            population: &pop,
            fitness: &fit,
        };
        assert_eq!(state.best_fitness(), Some(2));
        assert_eq!(state.best_index(), Some(1));
    }
}
