//! Independent runs across seeds.
//!
//! Every run builds its own engine, so nothing is shared between runs. With
//! the `parallel` feature the runs are spread over rayon's thread pool;
//! otherwise they execute one after another. Either way the results come
//! back in seed order.

use crate::error::Result;
use crate::random::RandomStream;
use tracing::debug;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Runs `run(seed)` for every seed and collects the outcomes in seed order.
///
/// A failing run does not stop the others; its error is returned in its slot.
///
/// ```ignore
/// let outcomes = sweep::run_seeds(&[1, 2, 3], |seed| {
///     let mut engine = GaEngine::new(ZeroCount::new(20, 200), EngineConfig::new(seed, 20, 0.05, 0.9))?;
///     let ranked = engine.start(true, SelectionMethod::DeterministicTournament, None)?;
///     Ok(ranked[0].0)
/// });
/// ```
pub fn run_seeds<T, B>(seeds: &[u64], run: B) -> Vec<Result<T>>
where
    T: Send,
    B: Fn(u64) -> Result<T> + Sync,
{
    debug!(runs = seeds.len(), parallel = cfg!(feature = "parallel"), "starting sweep");

    #[cfg(feature = "parallel")]
    let outcomes = seeds.par_iter().map(|&seed| run(seed)).collect();

    #[cfg(not(feature = "parallel"))]
    let outcomes = seeds.iter().map(|&seed| run(seed)).collect();

    outcomes
}

/// Derives `count` run seeds from one master seed.
///
/// Each seed comes from a [`RandomStream::fork`] of the master stream, so the
/// same master always yields the same list.
pub fn derive_seeds(master: u64, count: usize) -> Vec<u64> {
    let mut stream = RandomStream::new(master);
    (0..count).map(|_| stream.fork().seed()).collect()
}

/// Fraction of successful outcomes accepted by `solved`.
///
/// Errors count as unsolved. Returns 0 for an empty sweep.
pub fn success_rate<T>(outcomes: &[Result<T>], solved: impl Fn(&T) -> bool) -> f64 {
    if outcomes.is_empty() {
        return 0.0;
    }
    let hits = outcomes
        .iter()
        .filter(|outcome| outcome.as_ref().is_ok_and(&solved))
        .count();
    hits as f64 / outcomes.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::EngineError;
    use crate::ga::{EngineConfig, GaEngine, SelectionMethod};
    use crate::problems::ZeroCount;

    fn best_zero_count(seed: u64) -> Result<usize> {
        let config = EngineConfig::new(seed, 20, 0.05, 0.9);
        let mut engine = GaEngine::new(ZeroCount::new(12, 100), config)?;
        let ranked = engine.start(true, SelectionMethod::DeterministicTournament, None)?;
        Ok(ranked[0].0)
    }

    #[test]
    fn test_results_follow_seed_order() {
        let seeds = [5, 3, 9, 1];
        let outcomes = run_seeds(&seeds, |seed| Ok(seed * 10));
        let values: Vec<u64> = outcomes.into_iter().map(|r| r.unwrap()).collect();
        assert_eq!(values, vec![50, 30, 90, 10]);
    }

    #[test]
    fn test_runs_match_individual_runs() {
        let seeds: Vec<u64> = (0..8).collect();
        let swept = run_seeds(&seeds, best_zero_count);
        for (seed, outcome) in seeds.iter().zip(&swept) {
            assert_eq!(
                *outcome.as_ref().unwrap(),
                best_zero_count(*seed).unwrap(),
                "seed {seed} differs when swept"
            );
        }
    }

    #[test]
    fn test_failures_stay_in_their_slot() {
        let outcomes = run_seeds(&[1, 2, 3], |seed| {
            if seed == 2 {
                Err(EngineError::InvalidArgument("seed 2".into()))
            } else {
                Ok(seed)
            }
        });
        assert!(outcomes[0].is_ok());
        assert!(matches!(outcomes[1], Err(EngineError::InvalidArgument(_))));
        assert!(outcomes[2].is_ok());
        assert!((success_rate(&outcomes, |_| true) - 2.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn test_derive_seeds_reproducible() {
        let a = derive_seeds(17, 6);
        assert_eq!(a, derive_seeds(17, 6));
        assert_ne!(a, derive_seeds(18, 6));
        assert_eq!(a.len(), 6);
        assert_eq!(&derive_seeds(17, 3)[..], &a[..3]);
    }

    #[test]
    fn test_success_rate_empty() {
        let outcomes: Vec<Result<usize>> = Vec::new();
        assert_eq!(success_rate(&outcomes, |_| true), 0.0);
    }
}
