//! Permutation operators for plugins with permutation encodings.
//!
//! All functions work on `&[usize]` permutations of `0..n`, draw only from
//! the generator they are given, and return fresh vectors so the parents
//! stay untouched.
//!
//! # References
//!
//! - Cicirello (2023), "Genetic Operators for Permutation Representation"

use rand::seq::SliceRandom;
use rand::Rng;

/// A uniformly shuffled permutation of `0..n`.
pub fn random_permutation<R: Rng>(n: usize, rng: &mut R) -> Vec<usize> {
    let mut perm: Vec<usize> = (0..n).collect();
    perm.shuffle(rng);
    perm
}

/// One-point order-preserving crossover.
///
/// Copies the first `k` genes of `parent1`, then appends the genes of
/// `parent2` that are not yet present, in `parent2`'s order. The cut `k`
/// is drawn from `1..=n-2`, so both parents contribute whenever `n >= 3`.
///
/// # Panics
/// Panics if the parents have different lengths.
pub fn prefix_crossover<R: Rng>(parent1: &[usize], parent2: &[usize], rng: &mut R) -> Vec<usize> {
    let n = parent1.len();
    assert_eq!(n, parent2.len(), "parents must have equal length");
    if n < 3 {
        return parent1.to_vec();
    }

    let k = rng.random_range(1..=n - 2);
    let mut used = vec![false; n];
    let mut child = Vec::with_capacity(n);
    for &gene in &parent1[..k] {
        used[gene] = true;
        child.push(gene);
    }
    child.extend(parent2.iter().copied().filter(|&gene| !used[gene]));
    child
}

/// Returns a copy of `perm` with two random positions exchanged.
///
/// Both positions are drawn independently, so they may coincide.
pub fn swap_mutation<R: Rng>(perm: &[usize], rng: &mut R) -> Vec<usize> {
    let mut out = perm.to_vec();
    let n = out.len();
    if n >= 2 {
        let i = rng.random_range(0..n);
        let j = rng.random_range(0..n);
        out.swap(i, j);
    }
    out
}
