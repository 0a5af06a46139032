//! N-Queens as permutation search.
//!
//! A board is a permutation `q` of `0..n`: the queen of column `i` sits on
//! row `q[i]`. Rows and columns can never clash, so the fitness is the
//! number of queen pairs sharing a diagonal.

use crate::error::{EngineError, Result};
use crate::ga::operators::{prefix_crossover, random_permutation, swap_mutation};
use crate::ga::{local_search_hook, EngineConfig, EventKind, GaEngine, GaProblem, RunState};
use rand::Rng;

/// Children scoring at most this many conflicts are handed to local search.
pub const LOCAL_SEARCH_THRESHOLD: usize = 2;

/// The N-Queens problem with a generation budget.
#[derive(Debug, Clone)]
pub struct NQueens {
    n: usize,
    iterations: usize,
}

impl NQueens {
    /// Creates an `n`-queens instance that stops after `iterations` generations.
    ///
    /// `n` must be greater than 3 and `iterations` positive.
    pub fn new(n: usize, iterations: usize) -> Result<Self> {
        if n <= 3 {
            return Err(EngineError::Configuration(format!(
                "n-queens needs n > 3, got {n}"
            )));
        }
        if iterations == 0 {
            return Err(EngineError::Configuration(
                "iterations must be positive".into(),
            ));
        }
        Ok(Self { n, iterations })
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// Builds an engine for this instance.
    ///
    /// With `hybrid` set, children close to a solution are improved by
    /// [`local_search`](GaProblem::local_search) as they are created.
    pub fn into_engine(self, config: EngineConfig, hybrid: bool) -> Result<GaEngine<Self>> {
        let mut engine = GaEngine::new(self, config)?;
        if hybrid {
            engine.on(
                EventKind::NewIndividual,
                local_search_hook::<Self>(LOCAL_SEARCH_THRESHOLD),
            );
        }
        Ok(engine)
    }

    /// Number of queen pairs attacking each other along a diagonal.
    pub fn conflicts(board: &[usize]) -> usize {
        let mut count = 0;
        for i in 0..board.len() {
            for j in i + 1..board.len() {
                if board[i].abs_diff(board[j]) == j - i {
                    count += 1;
                }
            }
        }
        count
    }
}

impl GaProblem for NQueens {
    type Individual = Vec<usize>;
    type Fitness = usize;

    fn generate_population<R: Rng>(
        &self,
        size: usize,
        rng: &mut R,
    ) -> anyhow::Result<Vec<Vec<usize>>> {
        Ok((0..size).map(|_| random_permutation(self.n, rng)).collect())
    }

    fn fitness(&self, board: &Vec<usize>) -> anyhow::Result<usize> {
        anyhow::ensure!(
            board.len() == self.n,
            "board has {} columns, expected {}",
            board.len(),
            self.n
        );
        Ok(Self::conflicts(board))
    }

    fn crossover<R: Rng>(
        &self,
        parent1: &Vec<usize>,
        parent2: &Vec<usize>,
        rng: &mut R,
    ) -> anyhow::Result<Vec<usize>> {
        Ok(prefix_crossover(parent1, parent2, rng))
    }

    fn mutate<R: Rng>(&self, board: Vec<usize>, rng: &mut R) -> anyhow::Result<Vec<usize>> {
        Ok(swap_mutation(&board, rng))
    }

    fn end_condition(&self, state: &RunState<'_, Vec<usize>, usize>) -> anyhow::Result<bool> {
        let solved = state.fitness.contains(&0);
        Ok(solved || state.gen >= self.iterations)
    }

    /// First-improvement hill climbing over pairwise swaps.
    ///
    /// Repeats until no single swap lowers the conflict count, or a
    /// solution is reached.
    fn local_search(&self, board: &Vec<usize>) -> anyhow::Result<Vec<usize>> {
        let mut current = board.clone();
        let mut current_conflicts = self.fitness(&current)?;

        'climb: while current_conflicts > 0 {
            for i in 0..self.n {
                for j in i + 1..self.n {
                    current.swap(i, j);
                    let candidate = Self::conflicts(&current);
                    if candidate < current_conflicts {
                        current_conflicts = candidate;
                        continue 'climb;
                    }
                    current.swap(i, j);
                }
            }
            break;
        }

        Ok(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ga::SelectionMethod;

    #[test]
    fn test_new_rejects_small_boards() {
        assert!(NQueens::new(3, 10).unwrap_err().is_configuration());
        assert!(NQueens::new(8, 0).unwrap_err().is_configuration());
        assert_eq!(NQueens::new(4, 1).unwrap().n(), 4);
    }

    #[test]
    fn test_conflicts() {
        // Known 4-queens solution.
        assert_eq!(NQueens::conflicts(&[1, 3, 0, 2]), 0);
        // Main diagonal: every pair conflicts.
        assert_eq!(NQueens::conflicts(&[0, 1, 2, 3]), 6);
        assert_eq!(NQueens::conflicts(&[0, 2, 1, 3]), 2);
    }

    #[test]
    fn test_fitness_rejects_wrong_length() {
        let problem = NQueens::new(5, 10).unwrap();
        assert!(problem.fitness(&vec![0, 1, 2]).is_err());
    }

    #[test]
    fn test_local_search_never_worsens() {
        let problem = NQueens::new(8, 10).unwrap();
        let mut rng = crate::random::RandomStream::new(11);
        for board in problem.generate_population(50, &mut rng).unwrap() {
            let before = NQueens::conflicts(&board);
            let after_board = problem.local_search(&board).unwrap();
            let after = NQueens::conflicts(&after_board);
            assert!(after <= before);
            let mut sorted = after_board.clone();
            sorted.sort_unstable();
            assert_eq!(sorted, (0..8).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_local_search_keeps_solution() {
        let problem = NQueens::new(4, 10).unwrap();
        let solved = vec![2, 0, 3, 1];
        assert_eq!(problem.local_search(&solved).unwrap(), solved);
    }

    #[test]
    fn test_end_condition() {
        let problem = NQueens::new(4, 5).unwrap();
        let population = vec![vec![0, 1, 2, 3]];
        let unsolved = RunState {
            gen: 1,
            population: &population,
            fitness: &[6],
        };
        assert!(!problem.end_condition(&unsolved).unwrap());

        let solved = RunState {
            fitness: &[0],
            ..unsolved
        };
        assert!(problem.end_condition(&solved).unwrap());

        let exhausted = RunState {
            gen: 5,
            ..unsolved
        };
        assert!(problem.end_condition(&exhausted).unwrap());
    }

    #[test]
    fn test_hybrid_elitist_run_solves_eight_queens() {
        let problem = NQueens::new(8, 300).unwrap();
        let config = EngineConfig::new(42, 60, 0.1, 0.9);
        let mut engine = problem.into_engine(config, true).unwrap();

        let ranked = engine
            .start(true, SelectionMethod::DeterministicTournament, None)
            .unwrap();

        assert_eq!(ranked.len(), 60);
        assert!(engine.gen() <= 300);
        // Ranked ascending, and every stored fitness matches its board.
        for pair in ranked.windows(2) {
            assert!(pair[0].0 <= pair[1].0);
        }
        for (fitness, board) in &ranked {
            assert_eq!(*fitness, NQueens::conflicts(board));
        }
        assert_eq!(ranked[0].0, 0, "hybrid run should find a solution");
    }
}
