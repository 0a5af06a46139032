//! Bit strings scored by how many zero bits they hold.
//!
//! The minimization twin of OneMax: the optimum is the all-ones string
//! with fitness 0.

use crate::ga::{GaProblem, RunState};
use rand::Rng;

/// Zero-counting problem with a generation budget.
#[derive(Debug, Clone)]
pub struct ZeroCount {
    /// Bits per individual.
    pub len: usize,
    /// Generation budget.
    pub max_generations: usize,
}

impl ZeroCount {
    pub fn new(len: usize, max_generations: usize) -> Self {
        Self {
            len,
            max_generations,
        }
    }
}

impl GaProblem for ZeroCount {
    type Individual = Vec<bool>;
    type Fitness = usize;

    fn generate_population<R: Rng>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> anyhow::Result<Vec<Vec<bool>>> {
        Ok((0..size)
            .map(|_| (0..self.len).map(|_| rng.random_bool(0.5)).collect())
            .collect())
    }

    fn fitness(&self, bits: &Vec<bool>) -> anyhow::Result<usize> {
        Ok(bits.iter().filter(|&&b| !b).count())
    }

    /// Single-point crossover: head of `parent1`, tail of `parent2`.
    fn crossover<R: Rng>(
        &self,
        parent1: &Vec<bool>,
        parent2: &Vec<bool>,
        rng: &mut R,
    ) -> anyhow::Result<Vec<bool>> {
        anyhow::ensure!(
            parent1.len() == parent2.len(),
            "parents differ in length: {} vs {}",
            parent1.len(),
            parent2.len()
        );
        if parent1.is_empty() {
            return Ok(Vec::new());
        }
        let point = rng.random_range(0..parent1.len());
        let mut child = parent1[..point].to_vec();
        child.extend_from_slice(&parent2[point..]);
        Ok(child)
    }

    /// Flips one random bit.
    fn mutate<R: Rng>(&self, mut bits: Vec<bool>, rng: &mut R) -> anyhow::Result<Vec<bool>> {
        if !bits.is_empty() {
            let idx = rng.random_range(0..bits.len());
            bits[idx] = !bits[idx];
        }
        Ok(bits)
    }

    fn end_condition(&self, state: &RunState<'_, Vec<bool>, usize>) -> anyhow::Result<bool> {
        Ok(state.best_fitness() == Some(0) || state.gen >= self.max_generations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::RandomStream;

    #[test]
    fn test_fitness_counts_zeros() {
        let problem = ZeroCount::new(4, 10);
        assert_eq!(problem.fitness(&vec![true, false, false, true]).unwrap(), 2);
        assert_eq!(problem.fitness(&vec![true; 4]).unwrap(), 0);
    }

    #[test]
    fn test_crossover_splices_parents() {
        let problem = ZeroCount::new(6, 10);
        let mut rng = RandomStream::new(42);
        let ones = vec![true; 6];
        let zeros = vec![false; 6];
        for _ in 0..50 {
            let child = problem.crossover(&ones, &zeros, &mut rng).unwrap();
            assert_eq!(child.len(), 6);
            let head = child.iter().take_while(|&&b| b).count();
            assert!(child[head..].iter().all(|&b| !b), "not a single splice: {child:?}");
        }
    }

    #[test]
    fn test_crossover_rejects_mismatched_parents() {
        let problem = ZeroCount::new(3, 10);
        let mut rng = RandomStream::new(1);
        assert!(problem
            .crossover(&vec![true; 3], &vec![true; 2], &mut rng)
            .is_err());
    }

    #[test]
    fn test_mutate_flips_exactly_one_bit() {
        let problem = ZeroCount::new(8, 10);
        let mut rng = RandomStream::new(5);
        let bits = vec![false; 8];
        let mutated = problem.mutate(bits.clone(), &mut rng).unwrap();
        let flipped = mutated.iter().zip(&bits).filter(|(a, b)| a != b).count();
        assert_eq!(flipped, 1);
    }
}
